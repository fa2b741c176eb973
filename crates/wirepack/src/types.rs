//! Wrapper shapes that steer encoding and decoding.

/// Borrowed byte blob, encoded as `bin` rather than as an array of integers.
///
/// Used for pre-serialized payloads on the output side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bin<'a>(pub &'a [u8]);

/// Owned byte blob.
///
/// Encodes as `bin`; decodes from either a `bin` or a `str` payload. The
/// text type `String` stays strict and accepts only `str` — callers that
/// depend on that strictness must not be handed loosened semantics.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bytes(pub Vec<u8>);

/// A value carried as a complete, independently decodable sub-message
/// inside a binary blob of the outer stream.
///
/// Encoding runs a fresh encoder over the inner value and emits the whole
/// result as one `bin` blob; decoding extracts the blob and runs a fresh
/// decoder scoped to exactly those bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Embedded<T>(pub T);

impl<T> Embedded<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

/// Decode target that discards one value of whatever shape is next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skip;

/// One map entry with a construction-time inclusion flag.
///
/// When the flag is false, neither key nor value bytes are emitted and the
/// entry does not count toward the map's declared length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapEntry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) include: bool,
}

impl<K, V> MapEntry<K, V> {
    /// An always-included entry.
    pub fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            include: true,
        }
    }

    /// An entry that is left out of the wire map entirely when `include`
    /// is false.
    pub fn when(key: K, value: V, include: bool) -> Self {
        Self {
            key,
            value,
            include,
        }
    }
}

/// A wire map built from a tuple of [`MapEntry`] values.
///
/// The declared length is the number of *included* entries, counted before
/// any entry is written. Nested entry tuples flatten in declaration order,
/// so concatenating maps is tuple composition — nothing is reordered or
/// counted twice.
///
/// ```
/// use wirepack::{to_bytes, MapEntry, WireMap};
///
/// let map = WireMap((
///     MapEntry::new("id", 7u32),
///     MapEntry::when("note", "skipped", false),
/// ));
/// let bytes = to_bytes(&map);
/// assert_eq!(bytes[0], 0x81); // fixmap, one entry
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireMap<T>(pub T);

impl<T> WireMap<T> {
    /// Concatenates two maps into one, preserving declaration order.
    pub fn concat<U>(self, other: WireMap<U>) -> WireMap<(T, U)> {
        WireMap((self.0, other.0))
    }
}
