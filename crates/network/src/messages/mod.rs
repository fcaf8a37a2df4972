//! The handful of messages `SimpleNode` speaks: version/verack handshake,
//! ping/pong keepalive, header and inventory exchange, bloom filter loading,
//! and a [`generic::GenericMessage`] escape hatch for anything else.

pub mod generic;
pub mod getdata;
pub mod headers;
pub mod simple;
pub mod version;

pub use generic::GenericMessage;
pub use getdata::{DataType, GetDataMessage};
pub use headers::{GetHeadersMessage, HeadersMessage};
pub use simple::{FilterLoadMessage, PingMessage, PongMessage, VerAckMessage};
pub use version::VersionMessage;

use crate::error::Error;

/// A message with a fixed command name, parseable from and serializable to
/// its envelope payload.
pub trait NetworkMessage: Sized {
    const COMMAND: &'static str;

    fn parse(payload: &[u8]) -> Result<Self, Error>;
    fn serialize(&self) -> Vec<u8>;
}
