//! Transport contract consumed by the connector.

use thiserror::Error;

/// Failure reported by the transport or by the remote peer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection-level failure: connect, send, or receive.
    #[error("transport failure: {0}")]
    Connection(String),
    /// The remote side signaled an error; the message is carried verbatim
    /// and never interpreted by the codec.
    #[error("remote error: {0}")]
    Remote(String),
}

/// A connection that exchanges one request for one reply.
///
/// Request framing — the call envelope carrying the function name and the
/// already-encoded argument tuple — belongs to the implementor. The
/// connector only supplies the name and the argument bytes, and expects
/// the reply payload back as a single encoded value.
pub trait Transport {
    fn send_request(&mut self, name: &str, args: &[u8]) -> Result<(), TransportError>;
    fn receive_reply(&mut self) -> Result<Vec<u8>, TransportError>;
}
