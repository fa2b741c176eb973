//! Incremental map traversal: forward-only, cursor-driven decoding of wire
//! maps without materializing them.
//!
//! [`Decoder::read_map`] hands the caller one [`MapKey`] per entry. The
//! caller decodes the key to obtain a [`MapValue`], then decodes or skips
//! the value. Each cursor is consumed at most once; whatever the caller
//! leaves unconsumed skips itself on drop, so the stream is always
//! positioned at the next entry when the handler returns.

use crate::constants::Tag;
use crate::decode::Decode;
use crate::decoder::Decoder;
use crate::error::PackError;

impl<'a> Decoder<'a> {
    /// Visits every entry of the map at the cursor, in wire order.
    ///
    /// The traversal itself always covers all `N` entries; duplicate keys
    /// are passed through untouched. Errors from the handler, from entry
    /// decoding, and from drop-driven auto-skips all propagate.
    ///
    /// ```
    /// use wirepack::{to_bytes, Decoder, MapEntry, WireMap};
    ///
    /// let bytes = to_bytes(&WireMap((
    ///     MapEntry::new("a", 1i64),
    ///     MapEntry::new("b", 2i64),
    /// )));
    /// let mut dec = Decoder::new(&bytes);
    /// let mut sum = 0;
    /// dec.read_map(|mut key| {
    ///     let (name, mut value) = key.read::<String>()?;
    ///     if name == "a" {
    ///         sum += value.read::<i64>()?;
    ///     }
    ///     Ok(()) // "b" is skipped automatically
    /// })
    /// .unwrap();
    /// assert_eq!(sum, 1);
    /// ```
    pub fn read_map<F>(&mut self, mut handler: F) -> Result<(), PackError>
    where
        F: for<'s> FnMut(MapKey<'s, 'a>) -> Result<(), PackError>,
    {
        let count = self.read_map_hdr()?;
        for _ in 0..count {
            handler(MapKey {
                stream: &mut *self,
                consumed: false,
            })?;
            self.take_deferred()?;
        }
        Ok(())
    }
}

/// Cursor over one pending map key.
///
/// Constructed only by [`Decoder::read_map`]; never outlives the entry it
/// belongs to.
pub struct MapKey<'s, 'a> {
    stream: &'s mut Decoder<'a>,
    consumed: bool,
}

impl<'s, 'a> MapKey<'s, 'a> {
    /// Tag of the pending key, without consuming anything.
    pub fn tag(&self) -> Result<Tag, PackError> {
        self.stream.peek_tag()
    }

    /// Decodes the key and returns it together with the cursor for its
    /// value. At most one consumption per key.
    pub fn read<K: Decode>(&mut self) -> Result<(K, MapValue<'_, 'a>), PackError> {
        if self.consumed {
            return Err(PackError::DoubleConsume("key"));
        }
        let key = K::decode(&mut *self.stream)?;
        self.consumed = true;
        Ok((
            key,
            MapValue {
                stream: &mut *self.stream,
                consumed: false,
            },
        ))
    }

    /// Discards the whole entry: key and value both.
    pub fn skip(&mut self) -> Result<(), PackError> {
        if self.consumed {
            return Err(PackError::DoubleConsume("key"));
        }
        self.stream.skip_value()?;
        self.stream.skip_value()?;
        self.consumed = true;
        Ok(())
    }
}

impl Drop for MapKey<'_, '_> {
    fn drop(&mut self) {
        if self.consumed || self.stream.is_poisoned() {
            return;
        }
        // Key was never decoded, so its value never got a cursor: both
        // must go before the next entry starts.
        match self.stream.skip_value() {
            Ok(()) => {
                if let Err(err) = self.stream.skip_value() {
                    self.stream.defer(err);
                }
            }
            Err(err) => self.stream.defer(err),
        }
    }
}

/// Cursor over one pending map value, bound to the entry whose key was
/// just decoded.
pub struct MapValue<'s, 'a> {
    stream: &'s mut Decoder<'a>,
    consumed: bool,
}

impl<'s, 'a> MapValue<'s, 'a> {
    /// Tag of the pending value, without consuming anything.
    pub fn tag(&self) -> Result<Tag, PackError> {
        self.stream.peek_tag()
    }

    /// Decodes the value. At most one consumption per value.
    pub fn read<V: Decode>(&mut self) -> Result<V, PackError> {
        if self.consumed {
            return Err(PackError::DoubleConsume("value"));
        }
        let value = V::decode(&mut *self.stream)?;
        self.consumed = true;
        Ok(value)
    }

    /// Discards the value without producing anything.
    pub fn skip(&mut self) -> Result<(), PackError> {
        if self.consumed {
            return Err(PackError::DoubleConsume("value"));
        }
        self.stream.skip_value()?;
        self.consumed = true;
        Ok(())
    }

    /// Traverses the value as a nested map, entry by entry.
    ///
    /// Counts as this cursor's one consumption.
    pub fn read_entries<F>(&mut self, handler: F) -> Result<(), PackError>
    where
        F: for<'t> FnMut(MapKey<'t, 'a>) -> Result<(), PackError>,
    {
        if self.consumed {
            return Err(PackError::DoubleConsume("value"));
        }
        self.stream.read_map(handler)?;
        self.consumed = true;
        Ok(())
    }
}

impl Drop for MapValue<'_, '_> {
    fn drop(&mut self) {
        if self.consumed || self.stream.is_poisoned() {
            return;
        }
        if let Err(err) = self.stream.skip_value() {
            self.stream.defer(err);
        }
    }
}
