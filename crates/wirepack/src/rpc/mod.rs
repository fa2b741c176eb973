//! Client-side RPC boundary: the transport contract and the connector
//! that composes typed calls over it.

pub mod connector;
pub mod transport;

pub use connector::{CallError, Connector, Reply};
pub use transport::{Transport, TransportError};
