//! The 80-byte block header: version, previous-block hash, merkle root,
//! timestamp, compact target ("bits"), and nonce.

use btc_common::bits::bits_to_target;
use btc_common::endian::{read_array, read_u32_le, reverse32};
use btc_common::hash::hash256;
use num_bigint::BigUint;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub version: u32,
    /// Big-endian display order (the wire format stores this reversed).
    pub prev_block: [u8; 32],
    /// Big-endian display order (the wire format stores this reversed).
    pub merkle_root: [u8; 32],
    pub timestamp: u32,
    pub bits: u32,
    pub nonce: u32,
}

impl BlockHeader {
    pub fn parse(buf: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (version, rest) = read_u32_le(buf)?;
        let (prev_block_wire, rest) = read_array::<32>(rest)?;
        let (merkle_root_wire, rest) = read_array::<32>(rest)?;
        let (timestamp, rest) = read_u32_le(rest)?;
        let (bits, rest) = read_u32_le(rest)?;
        let (nonce, rest) = read_u32_le(rest)?;
        Ok((
            BlockHeader {
                version,
                prev_block: reverse32(prev_block_wire),
                merkle_root: reverse32(merkle_root_wire),
                timestamp,
                bits,
                nonce,
            },
            rest,
        ))
    }

    pub fn serialize(&self) -> [u8; 80] {
        let mut out = [0u8; 80];
        out[0..4].copy_from_slice(&self.version.to_le_bytes());
        out[4..36].copy_from_slice(&reverse32(self.prev_block));
        out[36..68].copy_from_slice(&reverse32(self.merkle_root));
        out[68..72].copy_from_slice(&self.timestamp.to_le_bytes());
        out[72..76].copy_from_slice(&self.bits.to_le_bytes());
        out[76..80].copy_from_slice(&self.nonce.to_le_bytes());
        out
    }

    /// The header hash, reversed into conventional big-endian display order.
    pub fn hash(&self) -> [u8; 32] {
        reverse32(hash256(&self.serialize()))
    }

    pub fn bip9(&self) -> bool {
        self.version >> 29 == 0b001
    }

    pub fn bip91(&self) -> bool {
        (self.version >> 4) & 1 == 1
    }

    pub fn bip141(&self) -> bool {
        (self.version >> 1) & 1 == 1
    }

    pub fn target(&self) -> BigUint {
        bits_to_target(self.bits)
    }

    pub fn difficulty(&self) -> BigUint {
        let max_target = BigUint::from(0xffffu32) * BigUint::from(256u32).pow(0x1d - 3);
        max_target / self.target()
    }

    pub fn check_pow(&self) -> bool {
        BigUint::from_bytes_be(&self.hash()) < self.target()
    }
}
