//! Base58Check: the address/WIF encoding used throughout Bitcoin. Encodes an
//! arbitrary byte string as a base-58 big integer, preserving leading zero
//! bytes as leading `1`s, and Base58Check additionally appends/verifies a
//! 4-byte `hash256` checksum.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::error::Error;
use crate::hash::hash256;

const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Plain Base58 encoding (no checksum).
pub fn encode_base58(bytes: &[u8]) -> String {
    let leading_zeros = bytes.iter().take_while(|&&b| b == 0).count();
    let mut num = BigUint::from_bytes_be(bytes);
    let mut digits = Vec::new();
    while !num.is_zero() {
        let (quotient, remainder) = (&num / 58u32, &num % 58u32);
        let idx: u32 = remainder.try_into().unwrap_or(0);
        digits.push(ALPHABET[idx as usize]);
        num = quotient;
    }
    let mut out = vec![b'1'; leading_zeros];
    out.extend(digits.into_iter().rev());
    String::from_utf8(out).unwrap_or_default()
}

/// Base58Check: `encode_base58(bytes || hash256(bytes)[..4])`.
pub fn encode_base58_checksum(bytes: &[u8]) -> String {
    let checksum = hash256(bytes);
    let mut payload = bytes.to_vec();
    payload.extend_from_slice(&checksum[..4]);
    encode_base58(&payload)
}

/// Decodes a Base58Check string, verifying the trailing 4-byte checksum and
/// returning the payload with the checksum stripped off.
pub fn decode_base58_check(s: &str) -> Result<Vec<u8>, Error> {
    let mut num = BigUint::zero();
    for c in s.bytes() {
        let digit = ALPHABET
            .iter()
            .position(|&a| a == c)
            .ok_or_else(|| Error::InvalidBase58(format!("character {:?} not in alphabet", c as char)))?;
        num = num * 58u32 + digit;
    }
    let leading_ones = s.bytes().take_while(|&b| b == b'1').count();

    let mut bytes = num.to_bytes_be();
    let mut combined = vec![0u8; leading_ones];
    combined.append(&mut bytes);

    if combined.len() < 4 {
        return Err(Error::InvalidBase58("payload shorter than checksum".into()));
    }
    let (payload, checksum) = combined.split_at(combined.len() - 4);
    let expected = hash256(payload);
    if &expected[..4] != checksum {
        return Err(Error::BadChecksum);
    }
    Ok(payload.to_vec())
}

/// Encodes a 20-byte hash160 as a P2PKH address (prefix `0x00` mainnet,
/// `0x6f` testnet).
pub fn h160_to_p2pkh_address(h160: &[u8; 20], testnet: bool) -> String {
    let prefix: u8 = if testnet { 0x6f } else { 0x00 };
    let mut payload = vec![prefix];
    payload.extend_from_slice(h160);
    encode_base58_checksum(&payload)
}

/// Encodes a 20-byte hash160 as a P2SH address (prefix `0x05` mainnet,
/// `0xc4` testnet).
pub fn h160_to_p2sh_address(h160: &[u8; 20], testnet: bool) -> String {
    let prefix: u8 = if testnet { 0xc4 } else { 0x05 };
    let mut payload = vec![prefix];
    payload.extend_from_slice(h160);
    encode_base58_checksum(&payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_leading_zero_bytes_as_leading_ones() {
        let bytes = [0u8, 0, 1, 2, 3];
        let encoded = encode_base58(&bytes);
        assert!(encoded.starts_with("11"));
    }

    #[test]
    fn base58check_round_trips() {
        let payload = vec![0x00u8; 20];
        let encoded = encode_base58_checksum(&payload);
        let decoded = decode_base58_check(&encoded).expect("decode");
        assert_eq!(decoded, payload);
    }

    #[test]
    fn base58check_rejects_bad_checksum() {
        let payload = vec![1u8; 20];
        let mut encoded = encode_base58_checksum(&payload);
        encoded.push('1');
        assert!(decode_base58_check(&encoded).is_err());
    }

    #[test]
    fn p2pkh_address_prefix_differs_by_network() {
        let h160 = [0x42u8; 20];
        let mainnet = h160_to_p2pkh_address(&h160, false);
        let testnet = h160_to_p2pkh_address(&h160, true);
        assert_ne!(mainnet, testnet);
    }

    #[test]
    fn p2sh_and_p2pkh_addresses_differ() {
        let h160 = [0x11u8; 20];
        assert_ne!(
            h160_to_p2pkh_address(&h160, false),
            h160_to_p2sh_address(&h160, false)
        );
    }
}
