//! BIP37 merkle blocks: a block header plus the minimal set of transaction
//! hashes and flag bits an SPV client needs to prove a transaction's
//! inclusion without downloading the whole block.

use std::collections::VecDeque;

use btc_common::endian::{read_array, read_u32_le, reverse32};
use btc_common::varint::{encode_varint, read_varint};

use crate::bitfield::{bit_field_to_bytes, bytes_to_bit_field};
use crate::error::Error;
use crate::merkle_tree::MerkleTree;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleBlock {
    pub version: u32,
    /// Big-endian display order.
    pub prev_block: [u8; 32],
    /// Big-endian display order.
    pub merkle_root: [u8; 32],
    pub timestamp: u32,
    pub bits: u32,
    pub nonce: u32,
    pub total: u32,
    /// Big-endian display order, in the order the server sent them.
    pub hashes: Vec<[u8; 32]>,
    pub flags: Vec<bool>,
}

impl MerkleBlock {
    pub fn parse(buf: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (version, rest) = read_u32_le(buf)?;
        let (prev_block_wire, rest) = read_array::<32>(rest)?;
        let (merkle_root_wire, rest) = read_array::<32>(rest)?;
        let (timestamp, rest) = read_u32_le(rest)?;
        let (bits, rest) = read_u32_le(rest)?;
        let (nonce, rest) = read_u32_le(rest)?;
        let (total, rest) = read_u32_le(rest)?;

        let (num_hashes, mut rest) = read_varint(rest)?;
        let mut hashes = Vec::with_capacity(num_hashes as usize);
        for _ in 0..num_hashes {
            let (hash_wire, next) = read_array::<32>(rest)?;
            hashes.push(reverse32(hash_wire));
            rest = next;
        }

        let (flags_len, rest) = read_varint(rest)?;
        let (flag_bytes, rest) = split(rest, flags_len as usize)?;

        Ok((
            MerkleBlock {
                version,
                prev_block: reverse32(prev_block_wire),
                merkle_root: reverse32(merkle_root_wire),
                timestamp,
                bits,
                nonce,
                total,
                hashes,
                flags: bytes_to_bit_field(flag_bytes),
            },
            rest,
        ))
    }

    pub fn serialize(&self) -> Result<Vec<u8>, Error> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(&reverse32(self.prev_block));
        out.extend_from_slice(&reverse32(self.merkle_root));
        out.extend_from_slice(&self.timestamp.to_le_bytes());
        out.extend_from_slice(&self.bits.to_le_bytes());
        out.extend_from_slice(&self.nonce.to_le_bytes());
        out.extend_from_slice(&self.total.to_le_bytes());
        encode_varint(self.hashes.len() as u64, &mut out);
        for hash in &self.hashes {
            out.extend_from_slice(&reverse32(*hash));
        }
        let flag_bytes = bit_field_to_bytes(&self.flags)?;
        encode_varint(flag_bytes.len() as u64, &mut out);
        out.extend_from_slice(&flag_bytes);
        Ok(out)
    }

    /// Recomputes the merkle root from `hashes`/`flags` and checks it
    /// against `merkle_root`. The hashes the tree consumes are in their
    /// internal little-endian order, so each is reversed before replay.
    pub fn is_valid(&self) -> Result<bool, Error> {
        let mut flag_bits: VecDeque<bool> = self.flags.iter().copied().collect();
        let mut hashes: VecDeque<[u8; 32]> = self.hashes.iter().map(|h| reverse32(*h)).collect();
        let mut tree = MerkleTree::new(self.total as usize);
        let root = tree.populate_tree(&mut flag_bits, &mut hashes)?;
        Ok(reverse32(root) == self.merkle_root)
    }
}

fn split(buf: &[u8], n: usize) -> Result<(&[u8], &[u8]), Error> {
    if buf.len() < n {
        return Err(btc_common::Error::eof(n - buf.len()).into());
    }
    Ok(buf.split_at(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use btc_common::merkle::merkle_root;

    fn hash_of(byte: u8) -> [u8; 32] {
        [byte; 32]
    }

    fn sample(total: u32, leaves: &[[u8; 32]]) -> MerkleBlock {
        MerkleBlock {
            version: 1,
            prev_block: [0u8; 32],
            merkle_root: merkle_root(leaves).expect("non-empty"),
            timestamp: 0,
            bits: 0x1d00ffff,
            nonce: 0,
            total,
            hashes: leaves.to_vec(),
            flags: vec![true; 2 * leaves.len() as usize - 1],
        }
    }

    #[test]
    fn round_trips_through_parse_and_serialize() {
        let block = sample(2, &[hash_of(1), hash_of(2)]);
        let encoded = block.serialize().expect("serialize");
        let (decoded, rest) = MerkleBlock::parse(&encoded).expect("parse");
        assert_eq!(decoded, block);
        assert!(rest.is_empty());
    }

    #[test]
    fn is_valid_confirms_a_correct_root() {
        let block = sample(2, &[hash_of(1), hash_of(2)]);
        assert!(block.is_valid().expect("populate"));
    }

    #[test]
    fn is_valid_rejects_a_tampered_root() {
        let mut block = sample(2, &[hash_of(1), hash_of(2)]);
        block.merkle_root = hash_of(0xff);
        assert!(!block.is_valid().expect("populate"));
    }
}
