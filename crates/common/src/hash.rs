//! The two composite hash functions Bitcoin uses everywhere: `hash256`
//! (double SHA-256, for block/tx ids and checksums) and `hash160`
//! (SHA-256 then RIPEMD-160, for addresses and P2PKH/P2SH script hashes).

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// `SHA256(SHA256(data))`.
pub fn hash256(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    second.into()
}

/// `RIPEMD160(SHA256(data))`.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let sha = Sha256::digest(data);
    let ripe = Ripemd160::digest(sha);
    ripe.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash256_is_32_bytes() {
        assert_eq!(hash256(b"").len(), 32);
    }

    #[test]
    fn hash160_is_20_bytes() {
        let got = hash160(b"hello");
        assert_eq!(got.len(), 20);
    }

    #[test]
    fn hash256_is_deterministic() {
        assert_eq!(hash256(b"bitcoin"), hash256(b"bitcoin"));
        assert_ne!(hash256(b"bitcoin"), hash256(b"Bitcoin"));
    }
}
