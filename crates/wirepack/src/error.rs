//! Decode-side error taxonomy.

use thiserror::Error;
use wirepack_buffers::BufferError;

use crate::constants::Tag;

/// Errors surfaced by the typed decoder and the map traversal protocol.
///
/// Wire-format problems (`EndOfStream`, `TypeMismatch`, `LengthMismatch`,
/// `UnsupportedTag`, `InvalidUtf8`, `IntegerOverflow`) indicate bad or
/// unexpected input bytes. `DoubleConsume` is a logic error: a map cursor
/// was consumed twice, which signals a handler bug rather than bad data.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PackError {
    /// An operation needed at least one more byte than was available.
    #[error("unexpected end of stream")]
    EndOfStream,
    /// The tag at the cursor is outside the set accepted for the request.
    #[error("type {found}, expected {expected}")]
    TypeMismatch { found: Tag, expected: &'static str },
    /// A fixed-arity tuple decode saw a different array count.
    #[error("bad tuple size: {found}, expected: {expected}")]
    LengthMismatch { found: usize, expected: usize },
    /// An extension-tagged value was encountered; those are never decodable.
    #[error("unsupported extension value (marker 0x{marker:02x})")]
    UnsupportedTag { marker: u8 },
    /// A map key or value cursor was consumed a second time.
    #[error("{0} cursor consumed twice")]
    DoubleConsume(&'static str),
    /// A wire integer does not fit the requested target width.
    #[error("integer {value} does not fit {target}")]
    IntegerOverflow { value: i128, target: &'static str },
    /// A string payload is not valid UTF-8.
    #[error("string payload is not valid utf-8")]
    InvalidUtf8,
    /// The decoder was used again after a prior error.
    #[error("decoder used after a prior error")]
    Poisoned,
}

impl From<BufferError> for PackError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer => PackError::EndOfStream,
            BufferError::InvalidUtf8 => PackError::InvalidUtf8,
        }
    }
}
