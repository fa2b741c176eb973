//! Typed remote calls over a [`Transport`].

use log::debug;
use thiserror::Error;

use super::transport::{Transport, TransportError};
use crate::constants::Tag;
use crate::decode::Decode;
use crate::decoder::Decoder;
use crate::encode::Encode;
use crate::encoder::Encoder;
use crate::error::PackError;

/// Failure of a remote call: the transport/remote side, or decoding of the
/// reply payload.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CallError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Decode(#[from] PackError),
}

/// Client-side call composition: encode the argument tuple, exchange one
/// request for one reply, decode the result.
pub struct Connector<T: Transport> {
    transport: T,
}

impl<T: Transport> Connector<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Calls `name` with `args` and decodes the reply as `R`.
    ///
    /// Arguments are conventionally a tuple, so they travel as a wire
    /// array of positional values; replies likewise.
    pub fn call<A: Encode, R: Decode>(&mut self, name: &str, args: &A) -> Result<R, CallError> {
        let reply = self.call_raw(name, args)?;
        Ok(reply.parse()?)
    }

    /// Calls `name` with `args`, returning the raw reply for incremental
    /// parsing.
    pub fn call_raw<A: Encode>(&mut self, name: &str, args: &A) -> Result<Reply, CallError> {
        let mut encoder = Encoder::new();
        encoder.push(args);
        let encoded = encoder.finish();
        debug!("call `{name}`: sending {} argument bytes", encoded.len());
        self.transport.send_request(name, &encoded)?;
        let data = self.transport.receive_reply()?;
        debug!("call `{name}`: received {} reply bytes", data.len());
        Ok(Reply { data })
    }

    /// Consumes the connector, returning the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }
}

/// An owned reply payload, decoded on demand.
pub struct Reply {
    data: Vec<u8>,
}

impl Reply {
    /// Decodes the whole reply as `R`.
    pub fn parse<R: Decode>(&self) -> Result<R, PackError> {
        let mut decoder = Decoder::new(&self.data);
        R::decode(&mut decoder)
    }

    /// Tag of the reply's top-level value.
    pub fn tag(&self) -> Result<Tag, PackError> {
        Decoder::new(&self.data).peek_tag()
    }

    /// The raw reply bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }
}
