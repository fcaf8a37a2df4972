//! BIP37 bloom filters: a probabilistic set of watched items an SPV client
//! hands to a peer so the peer can filter the blocks and transactions it
//! relays down to the ones that might match.

use btc_common::murmur3::murmur3_32;
use btc_common::varint::encode_varint;

use crate::bitfield::bit_field_to_bytes;
use crate::error::Error;

const BIP37_CONSTANT: u32 = 0xfba4c795;

#[derive(Debug, Clone)]
pub struct BloomFilter {
    size: u32,
    function_count: u32,
    tweak: u32,
    bit_field: Vec<bool>,
}

impl BloomFilter {
    pub fn new(size: u32, function_count: u32, tweak: u32) -> Self {
        BloomFilter {
            size,
            function_count,
            tweak,
            bit_field: vec![false; size as usize * 8],
        }
    }

    /// Sets the `function_count` bits `item` hashes to.
    pub fn add(&mut self, item: &[u8]) {
        for i in 0..self.function_count {
            let seed = (i.wrapping_mul(BIP37_CONSTANT)).wrapping_add(self.tweak);
            let h = murmur3_32(item, seed);
            let bit = (h as usize) % self.bit_field.len();
            self.bit_field[bit] = true;
        }
    }

    pub fn filter_bytes(&self) -> Result<Vec<u8>, Error> {
        bit_field_to_bytes(&self.bit_field)
    }

    /// The raw `filterload` payload: size, filter bytes, function count,
    /// tweak, and a trailing flag byte (BIP37 `BLOOM_UPDATE_*`, default
    /// `BLOOM_UPDATE_ALL`). `btc-network` wraps this in the `filterload`
    /// command envelope.
    pub fn filterload_payload(&self, flag: u8) -> Result<Vec<u8>, Error> {
        let mut out = Vec::new();
        encode_varint(self.size as u64, &mut out);
        out.extend_from_slice(&self.filter_bytes()?);
        out.extend_from_slice(&self.function_count.to_le_bytes());
        out.extend_from_slice(&self.tweak.to_le_bytes());
        out.push(flag);
        Ok(out)
    }
}
