//! Tag-checked, position-advancing reads over a borrowed byte range.

use wirepack_buffers::Reader;

use crate::constants::Tag;
use crate::error::PackError;

/// Decodes typed values from an encoded byte range.
///
/// Every read validates the tag at the cursor against the set accepted for
/// the requested type, then advances past exactly the bytes it consumed.
/// After any error the decoder is poisoned: all further operations fail
/// with [`PackError::Poisoned`] instead of returning stale data.
pub struct Decoder<'a> {
    pub(crate) reader: Reader<'a>,
    poisoned: bool,
    deferred: Option<PackError>,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            reader: Reader::new(data),
            poisoned: false,
            deferred: None,
        }
    }

    /// Number of bytes left between the cursor and the end of the range.
    pub fn remaining(&self) -> usize {
        self.reader.size()
    }

    /// Whether a prior error has invalidated this decoder.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Classifies the next value without consuming anything.
    pub fn peek_tag(&self) -> Result<Tag, PackError> {
        if self.poisoned {
            return Err(PackError::Poisoned);
        }
        Ok(Tag::of(self.reader.try_peek()?))
    }

    /// Runs a fallible read, poisoning the decoder if it fails.
    fn run<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, PackError>,
    ) -> Result<T, PackError> {
        if self.poisoned {
            return Err(PackError::Poisoned);
        }
        match f(self) {
            Ok(value) => Ok(value),
            Err(err) => {
                self.poisoned = true;
                Err(err)
            }
        }
    }

    /// Fails with `err` and poisons the decoder.
    pub(crate) fn fail<T>(&mut self, err: PackError) -> Result<T, PackError> {
        self.poisoned = true;
        Err(err)
    }

    /// Parks an error raised where it cannot propagate (cursor drops).
    /// The first parked error wins.
    pub(crate) fn defer(&mut self, err: PackError) {
        self.deferred.get_or_insert(err);
    }

    /// Re-raises a parked error, if any.
    pub(crate) fn take_deferred(&mut self) -> Result<(), PackError> {
        match self.deferred.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Builds the error for a tag outside the accepted set. Extension
    /// values are a format-support gap, reported as their own kind.
    fn mismatch(&self, byte: u8, expected: &'static str) -> PackError {
        match Tag::of(byte) {
            Tag::Ext => PackError::UnsupportedTag { marker: byte },
            found => PackError::TypeMismatch { found, expected },
        }
    }

    pub fn read_nil(&mut self) -> Result<(), PackError> {
        self.run(|d| {
            let byte = d.reader.try_peek()?;
            if byte == 0xc0 {
                d.reader.try_skip(1)?;
                Ok(())
            } else {
                Err(d.mismatch(byte, "nil"))
            }
        })
    }

    pub fn read_bool(&mut self) -> Result<bool, PackError> {
        self.run(|d| {
            let byte = d.reader.try_peek()?;
            match byte {
                0xc2 => {
                    d.reader.try_skip(1)?;
                    Ok(false)
                }
                0xc3 => {
                    d.reader.try_skip(1)?;
                    Ok(true)
                }
                _ => Err(d.mismatch(byte, "bool")),
            }
        })
    }

    /// Reads an integer from the unsigned markers only. A wire-negative
    /// value never decodes into an unsigned target.
    fn read_uint_any(&mut self) -> Result<u64, PackError> {
        let byte = self.reader.try_peek()?;
        match byte {
            0x00..=0x7f => {
                self.reader.try_skip(1)?;
                Ok(byte as u64)
            }
            0xcc => {
                self.reader.try_skip(1)?;
                Ok(self.reader.try_u8()? as u64)
            }
            0xcd => {
                self.reader.try_skip(1)?;
                Ok(self.reader.try_u16()? as u64)
            }
            0xce => {
                self.reader.try_skip(1)?;
                Ok(self.reader.try_u32()? as u64)
            }
            0xcf => {
                self.reader.try_skip(1)?;
                self.reader.try_u64().map_err(PackError::from)
            }
            _ => Err(self.mismatch(byte, "uint")),
        }
    }

    /// Reads an integer from either the signed or the unsigned markers, so
    /// non-negative wire values decode into signed targets.
    fn read_int_any(&mut self) -> Result<i128, PackError> {
        let byte = self.reader.try_peek()?;
        match byte {
            0x00..=0x7f => {
                self.reader.try_skip(1)?;
                Ok(byte as i128)
            }
            0xe0..=0xff => {
                self.reader.try_skip(1)?;
                Ok((byte as i8) as i128)
            }
            0xcc => {
                self.reader.try_skip(1)?;
                Ok(self.reader.try_u8()? as i128)
            }
            0xcd => {
                self.reader.try_skip(1)?;
                Ok(self.reader.try_u16()? as i128)
            }
            0xce => {
                self.reader.try_skip(1)?;
                Ok(self.reader.try_u32()? as i128)
            }
            0xcf => {
                self.reader.try_skip(1)?;
                Ok(self.reader.try_u64()? as i128)
            }
            0xd0 => {
                self.reader.try_skip(1)?;
                Ok(self.reader.try_i8()? as i128)
            }
            0xd1 => {
                self.reader.try_skip(1)?;
                Ok(self.reader.try_i16()? as i128)
            }
            0xd2 => {
                self.reader.try_skip(1)?;
                Ok(self.reader.try_i32()? as i128)
            }
            0xd3 => {
                self.reader.try_skip(1)?;
                Ok(self.reader.try_i64()? as i128)
            }
            _ => Err(self.mismatch(byte, "int or uint")),
        }
    }

    pub fn read_f32(&mut self) -> Result<f32, PackError> {
        self.run(|d| {
            let byte = d.reader.try_peek()?;
            match byte {
                0xca => {
                    d.reader.try_skip(1)?;
                    d.reader.try_f32().map_err(PackError::from)
                }
                0xcb => {
                    d.reader.try_skip(1)?;
                    Ok(d.reader.try_f64()? as f32)
                }
                _ => Err(d.mismatch(byte, "float or double")),
            }
        })
    }

    pub fn read_f64(&mut self) -> Result<f64, PackError> {
        self.run(|d| {
            let byte = d.reader.try_peek()?;
            match byte {
                0xcb => {
                    d.reader.try_skip(1)?;
                    d.reader.try_f64().map_err(PackError::from)
                }
                0xca => {
                    d.reader.try_skip(1)?;
                    Ok(d.reader.try_f32()? as f64)
                }
                _ => Err(d.mismatch(byte, "float or double")),
            }
        })
    }

    /// Reads a text string. Accepts only the `str` markers.
    pub fn read_str(&mut self) -> Result<String, PackError> {
        self.run(|d| {
            let byte = d.reader.try_peek()?;
            let len = match byte {
                0xa0..=0xbf => {
                    d.reader.try_skip(1)?;
                    (byte & 0x1f) as usize
                }
                0xd9 => {
                    d.reader.try_skip(1)?;
                    d.reader.try_u8()? as usize
                }
                0xda => {
                    d.reader.try_skip(1)?;
                    d.reader.try_u16()? as usize
                }
                0xdb => {
                    d.reader.try_skip(1)?;
                    d.reader.try_u32()? as usize
                }
                _ => return Err(d.mismatch(byte, "str")),
            };
            Ok(d.reader.try_utf8(len)?.to_owned())
        })
    }

    /// Reads a byte blob. Accepts `bin` and `str` markers interchangeably;
    /// text targets stay strict, byte targets do not.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>, PackError> {
        self.run(|d| {
            let byte = d.reader.try_peek()?;
            let len = match byte {
                0xc4 => {
                    d.reader.try_skip(1)?;
                    d.reader.try_u8()? as usize
                }
                0xc5 => {
                    d.reader.try_skip(1)?;
                    d.reader.try_u16()? as usize
                }
                0xc6 => {
                    d.reader.try_skip(1)?;
                    d.reader.try_u32()? as usize
                }
                0xa0..=0xbf => {
                    d.reader.try_skip(1)?;
                    (byte & 0x1f) as usize
                }
                0xd9 => {
                    d.reader.try_skip(1)?;
                    d.reader.try_u8()? as usize
                }
                0xda => {
                    d.reader.try_skip(1)?;
                    d.reader.try_u16()? as usize
                }
                0xdb => {
                    d.reader.try_skip(1)?;
                    d.reader.try_u32()? as usize
                }
                _ => return Err(d.mismatch(byte, "bin or str")),
            };
            Ok(d.reader.try_buf(len)?.to_vec())
        })
    }

    /// Reads an array header and returns the authoritative element count.
    pub fn read_array_hdr(&mut self) -> Result<usize, PackError> {
        self.run(|d| {
            let byte = d.reader.try_peek()?;
            match byte {
                0x90..=0x9f => {
                    d.reader.try_skip(1)?;
                    Ok((byte & 0xf) as usize)
                }
                0xdc => {
                    d.reader.try_skip(1)?;
                    Ok(d.reader.try_u16()? as usize)
                }
                0xdd => {
                    d.reader.try_skip(1)?;
                    Ok(d.reader.try_u32()? as usize)
                }
                _ => Err(d.mismatch(byte, "array")),
            }
        })
    }

    /// Reads a map header and returns the authoritative entry count.
    pub fn read_map_hdr(&mut self) -> Result<usize, PackError> {
        self.run(|d| {
            let byte = d.reader.try_peek()?;
            match byte {
                0x80..=0x8f => {
                    d.reader.try_skip(1)?;
                    Ok((byte & 0xf) as usize)
                }
                0xde => {
                    d.reader.try_skip(1)?;
                    Ok(d.reader.try_u16()? as usize)
                }
                0xdf => {
                    d.reader.try_skip(1)?;
                    Ok(d.reader.try_u32()? as usize)
                }
                _ => Err(d.mismatch(byte, "map")),
            }
        })
    }

    /// Consumes and discards one complete value of whatever shape is next,
    /// recursing through arrays and maps.
    pub fn skip_value(&mut self) -> Result<(), PackError> {
        self.run(|d| d.skip_one())
    }

    fn skip_one(&mut self) -> Result<(), PackError> {
        let byte = self.reader.try_u8()?;
        match byte {
            0x00..=0x7f | 0xe0..=0xff | 0xc0 | 0xc2 | 0xc3 => {}
            0x80..=0x8f => {
                for _ in 0..2 * (byte & 0xf) as usize {
                    self.skip_one()?;
                }
            }
            0x90..=0x9f => {
                for _ in 0..(byte & 0xf) as usize {
                    self.skip_one()?;
                }
            }
            0xa0..=0xbf => self.reader.try_skip((byte & 0x1f) as usize)?,
            0xc4 | 0xd9 => {
                let n = self.reader.try_u8()? as usize;
                self.reader.try_skip(n)?;
            }
            0xc5 | 0xda => {
                let n = self.reader.try_u16()? as usize;
                self.reader.try_skip(n)?;
            }
            0xc6 | 0xdb => {
                let n = self.reader.try_u32()? as usize;
                self.reader.try_skip(n)?;
            }
            0xca => self.reader.try_skip(4)?,
            0xcb => self.reader.try_skip(8)?,
            0xcc | 0xd0 => self.reader.try_skip(1)?,
            0xcd | 0xd1 => self.reader.try_skip(2)?,
            0xce | 0xd2 => self.reader.try_skip(4)?,
            0xcf | 0xd3 => self.reader.try_skip(8)?,
            0xdc => {
                let n = self.reader.try_u16()? as usize;
                for _ in 0..n {
                    self.skip_one()?;
                }
            }
            0xdd => {
                let n = self.reader.try_u32()? as usize;
                for _ in 0..n {
                    self.skip_one()?;
                }
            }
            0xde => {
                let n = self.reader.try_u16()? as usize;
                for _ in 0..2 * n {
                    self.skip_one()?;
                }
            }
            0xdf => {
                let n = self.reader.try_u32()? as usize;
                for _ in 0..2 * n {
                    self.skip_one()?;
                }
            }
            _ => return Err(PackError::UnsupportedTag { marker: byte }),
        }
        Ok(())
    }
}

macro_rules! impl_fitted_read {
    ($($name:ident: $ty:ty => $raw:ident),+ $(,)?) => {
        impl<'a> Decoder<'a> {
            $(pub fn $name(&mut self) -> Result<$ty, PackError> {
                self.run(|d| {
                    let value = d.$raw()?;
                    <$ty>::try_from(value).map_err(|_| PackError::IntegerOverflow {
                        value: value as i128,
                        target: stringify!($ty),
                    })
                })
            })+
        }
    };
}

impl_fitted_read! {
    read_u8: u8 => read_uint_any,
    read_u16: u16 => read_uint_any,
    read_u32: u32 => read_uint_any,
    read_u64: u64 => read_uint_any,
    read_i8: i8 => read_int_any,
    read_i16: i16 => read_int_any,
    read_i32: i32 => read_int_any,
    read_i64: i64 => read_int_any,
}
