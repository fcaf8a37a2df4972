//! The Bitcoin peer-to-peer wire protocol: the envelope framing, the
//! message set a lightweight client needs, and `SimpleNode`, a blocking
//! single-peer connection.

pub mod envelope;
pub mod error;
pub mod messages;
pub mod node;

pub use envelope::Envelope;
pub use error::Error;
pub use messages::NetworkMessage;
pub use node::SimpleNode;
