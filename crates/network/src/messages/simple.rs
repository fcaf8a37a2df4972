//! The fixed-shape messages: an empty verack, an 8-byte nonce for
//! ping/pong, and the filterload payload `btc-block`'s `BloomFilter`
//! builds.

use crate::error::Error;
use crate::messages::NetworkMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VerAckMessage;

impl NetworkMessage for VerAckMessage {
    const COMMAND: &'static str = "verack";

    fn parse(_payload: &[u8]) -> Result<Self, Error> {
        Ok(VerAckMessage)
    }

    fn serialize(&self) -> Vec<u8> {
        Vec::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingMessage {
    pub nonce: [u8; 8],
}

impl NetworkMessage for PingMessage {
    const COMMAND: &'static str = "ping";

    fn parse(payload: &[u8]) -> Result<Self, Error> {
        Ok(PingMessage {
            nonce: read_nonce(payload)?,
        })
    }

    fn serialize(&self) -> Vec<u8> {
        self.nonce.to_vec()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PongMessage {
    pub nonce: [u8; 8],
}

impl NetworkMessage for PongMessage {
    const COMMAND: &'static str = "pong";

    fn parse(payload: &[u8]) -> Result<Self, Error> {
        Ok(PongMessage {
            nonce: read_nonce(payload)?,
        })
    }

    fn serialize(&self) -> Vec<u8> {
        self.nonce.to_vec()
    }
}

fn read_nonce(payload: &[u8]) -> Result<[u8; 8], Error> {
    let (nonce, _) = btc_common::endian::read_array::<8>(payload)?;
    Ok(nonce)
}

/// The `filterload` payload, already shaped by
/// `btc_block::BloomFilter::filterload_payload`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterLoadMessage {
    pub payload: Vec<u8>,
}

impl NetworkMessage for FilterLoadMessage {
    const COMMAND: &'static str = "filterload";

    fn parse(payload: &[u8]) -> Result<Self, Error> {
        Ok(FilterLoadMessage {
            payload: payload.to_vec(),
        })
    }

    fn serialize(&self) -> Vec<u8> {
        self.payload.clone()
    }
}
