//! Byte buffer primitives: an auto-growing [`Writer`] and a bounds-checked
//! [`Reader`] over a borrowed slice.

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

use thiserror::Error;

/// Failure of a bounds-checked buffer read.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    #[error("read past the end of the buffer")]
    EndOfBuffer,
    #[error("buffer contents are not valid utf-8")]
    InvalidUtf8,
}
