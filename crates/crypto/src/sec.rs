//! SEC (Standards for Efficient Cryptography) public-key encoding, and the
//! Base58Check address derived from it.

use num_bigint::BigUint;

use crate::error::Error;
use crate::secp256k1::{s256_field, s256_point, to_32_be, S256Point};

fn coords(point: &S256Point) -> Result<(&BigUint, &BigUint), Error> {
    point
        .coords
        .as_ref()
        .map(|(x, y)| (&x.num, &y.num))
        .ok_or_else(|| Error::MalformedSec("cannot encode the point at infinity".into()))
}

/// Encodes `point` in SEC format: uncompressed (`0x04‖X‖Y`) or compressed
/// (`0x02`/`0x03`‖X` depending on Y's parity).
pub fn encode(point: &S256Point, compressed: bool) -> Result<Vec<u8>, Error> {
    let (x, y) = coords(point)?;
    let mut out = Vec::with_capacity(if compressed { 33 } else { 65 });
    if compressed {
        out.push(if y.bit(0) { 0x03 } else { 0x02 });
        out.extend_from_slice(&to_32_be(x));
    } else {
        out.push(0x04);
        out.extend_from_slice(&to_32_be(x));
        out.extend_from_slice(&to_32_be(y));
    }
    Ok(out)
}

/// Decodes a SEC-encoded public key, in either compressed or uncompressed
/// form.
pub fn parse(data: &[u8]) -> Result<S256Point, Error> {
    match data.first() {
        Some(0x04) => {
            if data.len() != 65 {
                return Err(Error::MalformedSec("uncompressed SEC must be 65 bytes".into()));
            }
            let x = BigUint::from_bytes_be(&data[1..33]);
            let y = BigUint::from_bytes_be(&data[33..65]);
            s256_point(x, y)
        }
        Some(prefix @ (0x02 | 0x03)) => {
            if data.len() != 33 {
                return Err(Error::MalformedSec("compressed SEC must be 33 bytes".into()));
            }
            let x_num = BigUint::from_bytes_be(&data[1..33]);
            let x = s256_field(x_num.clone())?;
            let alpha = x.mul(&x)?.mul(&x)?.add(&s256_field(BigUint::from(7u32))?)?;
            let beta = crate::secp256k1::field_sqrt(&alpha);
            let beta_is_even = !beta.num.bit(0);
            let (even_y, odd_y) = if beta_is_even {
                (beta.clone(), s256_field(&beta.prime - &beta.num)?)
            } else {
                (s256_field(&beta.prime - &beta.num)?, beta.clone())
            };
            // prefix - 2: 0x02 ⇒ even y, 0x03 ⇒ odd y.
            let want_odd = (*prefix as u32 - 2) == 1;
            let y = if want_odd { odd_y } else { even_y };
            s256_point(x_num, y.num)
        }
        _ => Err(Error::MalformedSec("unrecognized SEC prefix byte".into())),
    }
}

/// `RIPEMD160(SHA256(sec))` — the basis of a P2PKH address.
pub fn hash160(point: &S256Point, compressed: bool) -> Result<[u8; 20], Error> {
    Ok(btc_common::hash160(&encode(point, compressed)?))
}

/// The Base58Check P2PKH address for `point`.
pub fn address(point: &S256Point, compressed: bool, testnet: bool) -> Result<String, Error> {
    let h160 = hash160(point, compressed)?;
    Ok(btc_common::base58::h160_to_p2pkh_address(&h160, testnet))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secp256k1::scalar_base_mul;

    #[test]
    fn sec_round_trips_uncompressed_and_compressed() {
        let point = scalar_base_mul(&BigUint::from(999u32));
        let uncompressed = encode(&point, false).expect("encode");
        assert_eq!(uncompressed[0], 0x04);
        assert_eq!(parse(&uncompressed).expect("parse"), point);

        let compressed = encode(&point, true).expect("encode");
        assert!(compressed[0] == 0x02 || compressed[0] == 0x03);
        assert_eq!(parse(&compressed).expect("parse"), point);
    }

    #[test]
    fn address_matches_known_vector_for_secret_888_cubed() {
        let secret = BigUint::from(888u64) * BigUint::from(888u64) * BigUint::from(888u64);
        let point = scalar_base_mul(&secret);
        assert_eq!(
            address(&point, true, false).expect("address"),
            "148dY81A9BmdpMhvYEVznrM45kWN32vSCN"
        );
        assert_eq!(
            address(&point, true, true).expect("address"),
            "mieaqB68xDCtbUBYFoUNcmZNwk74xcBfTP"
        );
    }
}
