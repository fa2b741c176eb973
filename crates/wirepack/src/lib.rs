//! Typed streaming MessagePack codec.
//!
//! Maps statically-typed values to and from the compact self-describing
//! MessagePack wire format: tagged scalars, strings, binary blobs, arrays,
//! and maps with length prefixes. Decoding is strict — a tag that does not
//! match the requested type is an error, never a coercion.
//!
//! ```
//! use wirepack::{from_bytes, to_bytes};
//!
//! let bytes = to_bytes(&(42u32, "towel", Some(7i64)));
//! let (answer, item, count): (u32, String, Option<i64>) = from_bytes(&bytes).unwrap();
//! assert_eq!(answer, 42);
//! assert_eq!(item, "towel");
//! assert_eq!(count, Some(7));
//! ```

pub mod constants;
pub mod decode;
pub mod decoder;
pub mod encode;
pub mod encoder;
pub mod error;
pub mod map;
pub mod rpc;
pub mod types;

pub use constants::Tag;
pub use decode::Decode;
pub use decoder::Decoder;
pub use encode::{Encode, MapEntries};
pub use encoder::Encoder;
pub use error::PackError;
pub use map::{MapKey, MapValue};
pub use types::{Bin, Bytes, Embedded, MapEntry, Skip, WireMap};

/// Encodes a single value into an owned byte buffer.
pub fn to_bytes<T: Encode + ?Sized>(value: &T) -> Vec<u8> {
    let mut encoder = Encoder::new();
    encoder.push(value);
    encoder.finish()
}

/// Decodes a single value from the front of `bytes`.
pub fn from_bytes<T: Decode>(bytes: &[u8]) -> Result<T, PackError> {
    let mut decoder = Decoder::new(bytes);
    T::decode(&mut decoder)
}
