//! Requesting and receiving block headers.

use btc_block::BlockHeader;
use btc_common::endian::{read_array, read_u32_le, reverse32};
use btc_common::varint::{encode_varint, read_varint};

use crate::error::Error;
use crate::messages::NetworkMessage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetHeadersMessage {
    pub version: u32,
    pub num_hashes: u64,
    /// Big-endian display order.
    pub start_block: [u8; 32],
    /// Big-endian display order; all-zero means "peer's best known tip".
    pub end_block: [u8; 32],
}

impl GetHeadersMessage {
    pub fn new(start_block: [u8; 32]) -> Self {
        GetHeadersMessage {
            version: 70015,
            num_hashes: 1,
            start_block,
            end_block: [0u8; 32],
        }
    }
}

impl NetworkMessage for GetHeadersMessage {
    const COMMAND: &'static str = "getheaders";

    fn parse(payload: &[u8]) -> Result<Self, Error> {
        let (version, rest) = read_u32_le(payload)?;
        let (num_hashes, rest) = read_varint(rest)?;
        let (start_block_wire, rest) = read_array::<32>(rest)?;
        let (end_block_wire, _) = read_array::<32>(rest)?;
        Ok(GetHeadersMessage {
            version,
            num_hashes,
            start_block: reverse32(start_block_wire),
            end_block: reverse32(end_block_wire),
        })
    }

    fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.version.to_le_bytes());
        encode_varint(self.num_hashes, &mut out);
        out.extend_from_slice(&reverse32(self.start_block));
        out.extend_from_slice(&reverse32(self.end_block));
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadersMessage {
    pub headers: Vec<BlockHeader>,
}

impl NetworkMessage for HeadersMessage {
    const COMMAND: &'static str = "headers";

    fn parse(payload: &[u8]) -> Result<Self, Error> {
        let (num_headers, mut rest) = read_varint(payload)?;
        let mut headers = Vec::with_capacity(num_headers as usize);
        for i in 0..num_headers {
            let (header, next) = BlockHeader::parse(rest)?;
            let (tx_count, next) = read_varint(next)?;
            if tx_count != 0 {
                return Err(Error::UnexpectedTransactions(i as usize));
            }
            headers.push(header);
            rest = next;
        }
        Ok(HeadersMessage { headers })
    }

    fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        encode_varint(self.headers.len() as u64, &mut out);
        for header in &self.headers {
            out.extend_from_slice(&header.serialize());
            out.push(0x00);
        }
        out
    }
}
