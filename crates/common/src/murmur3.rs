//! MurmurHash3 (x86, 32-bit), the hash family BIP37 bloom filters use to
//! derive their `function_count` independent hash functions from a single
//! seed.

const C1: u32 = 0xcc9e2d51;
const C2: u32 = 0x1b873593;

/// 32-bit MurmurHash3 over `data` with the given `seed`.
pub fn murmur3_32(data: &[u8], seed: u32) -> u32 {
    let mut h1 = seed;
    let chunks = data.chunks_exact(4);
    let tail = chunks.remainder();

    for chunk in chunks {
        let mut k1 = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        k1 = k1.wrapping_mul(C1);
        k1 = k1.rotate_left(15);
        k1 = k1.wrapping_mul(C2);

        h1 ^= k1;
        h1 = h1.rotate_left(13);
        h1 = h1.wrapping_mul(5).wrapping_add(0xe6546b64);
    }

    let mut k1 = 0u32;
    for (i, &byte) in tail.iter().enumerate().rev() {
        k1 ^= (byte as u32) << (8 * i);
    }
    if !tail.is_empty() {
        k1 = k1.wrapping_mul(C1);
        k1 = k1.rotate_left(15);
        k1 = k1.wrapping_mul(C2);
        h1 ^= k1;
    }

    h1 ^= data.len() as u32;
    h1 ^= h1 >> 16;
    h1 = h1.wrapping_mul(0x85ebca6b);
    h1 ^= h1 >> 13;
    h1 = h1.wrapping_mul(0xc2b2ae35);
    h1 ^= h1 >> 16;
    h1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_with_zero_seed_is_zero() {
        assert_eq!(murmur3_32(b"", 0), 0);
    }

    #[test]
    fn is_deterministic() {
        assert_eq!(murmur3_32(b"bitcoin", 42), murmur3_32(b"bitcoin", 42));
    }

    #[test]
    fn seed_changes_output() {
        assert_ne!(murmur3_32(b"bitcoin", 1), murmur3_32(b"bitcoin", 2));
    }

    #[test]
    fn handles_inputs_of_every_tail_length() {
        for len in 0..=8 {
            let data = vec![0xABu8; len];
            // Must not panic for any tail length (0..=3 bytes remainder).
            let _ = murmur3_32(&data, 11);
        }
    }
}
