//! Deterministic-k ECDSA signing and verification over secp256k1.

use hmac::{Hmac, Mac};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use sha2::Sha256;

use crate::error::Error;
use crate::sec;
use crate::secp256k1::{self, generator, order, scalar_base_mul, scalar_mul, to_32_be, S256Point};
use crate::signature::Signature;

type HmacSha256 = Hmac<Sha256>;

fn hmac(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// RFC6979-style deterministic nonce generation for ECDSA over secp256k1,
/// using HMAC-SHA256 as the PRF.
pub fn deterministic_k(secret: &BigUint, z: &BigUint) -> BigUint {
    let n = order();
    let mut z = z.clone();
    if z > n {
        z -= &n;
    }
    let z_bytes = to_32_be(&z);
    let secret_bytes = to_32_be(secret);

    let mut k = vec![0u8; 32];
    let mut v = vec![1u8; 32];

    let mut data = v.clone();
    data.push(0x00);
    data.extend_from_slice(&secret_bytes);
    data.extend_from_slice(&z_bytes);
    k = hmac(&k, &data);
    v = hmac(&k, &v);

    let mut data = v.clone();
    data.push(0x01);
    data.extend_from_slice(&secret_bytes);
    data.extend_from_slice(&z_bytes);
    k = hmac(&k, &data);
    v = hmac(&k, &v);

    loop {
        v = hmac(&k, &v);
        let candidate = BigUint::from_bytes_be(&v);
        if candidate >= BigUint::one() && candidate < n {
            return candidate;
        }
        let mut data = v.clone();
        data.push(0x00);
        k = hmac(&k, &data);
        v = hmac(&k, &v);
    }
}

/// A secp256k1 private key: a scalar in `[1, n)` plus its cached public
/// point `secret·G`.
#[derive(Debug, Clone)]
pub struct PrivateKey {
    pub secret: BigUint,
    pub point: S256Point,
}

impl PrivateKey {
    pub fn new(secret: BigUint) -> Result<Self, Error> {
        if secret.is_zero() || secret >= order() {
            return Err(Error::ValueOutOfRange {
                num: secret.to_string(),
                prime: order().to_string(),
            });
        }
        let point = scalar_base_mul(&secret);
        Ok(PrivateKey { secret, point })
    }

    pub fn hex(&self) -> String {
        format!("{:064x}", self.secret)
    }

    /// Signs the integer `z`, producing a low-S-normalized signature.
    pub fn sign(&self, z: &BigUint) -> Signature {
        let n = order();
        loop {
            let k = deterministic_k(&self.secret, z);
            let r_point = generator().scalar_mul(&k);
            let r = match &r_point.coords {
                Some((x, _)) => x.num.clone(),
                None => continue,
            };
            if r.is_zero() {
                continue;
            }
            let k_inv = mod_pow(&k, &n - BigUint::from(2u32), &n);
            let mut s = (z + &r * &self.secret) % &n;
            s = (s * k_inv) % &n;
            if s.is_zero() {
                continue;
            }
            let half = &n / BigUint::from(2u32);
            if s > half {
                s = &n - &s;
            }
            return Signature::new(r, s);
        }
    }

    pub fn wif(&self, compressed: bool, testnet: bool) -> String {
        let prefix: u8 = if testnet { 0xef } else { 0x80 };
        let mut payload = vec![prefix];
        payload.extend_from_slice(&to_32_be(&self.secret));
        if compressed {
            payload.push(0x01);
        }
        btc_common::base58::encode_base58_checksum(&payload)
    }
}

fn mod_pow(base: &BigUint, exponent: BigUint, modulus: &BigUint) -> BigUint {
    base.modpow(&exponent, modulus)
}

/// Verifies a signature against `z` and the public point `point`.
pub fn verify(point: &S256Point, z: &BigUint, sig: &Signature) -> bool {
    let n = order();
    if sig.r.is_zero() || sig.r >= n || sig.s.is_zero() || sig.s >= n {
        return false;
    }
    let s_inv = mod_pow(&sig.s, &n - BigUint::from(2u32), &n);
    let u = (z * &s_inv) % &n;
    let v = (&sig.r * &s_inv) % &n;
    let total = match scalar_base_mul(&u).add(&scalar_mul(point, &v)) {
        Ok(p) => p,
        Err(_) => return false,
    };
    match &total.coords {
        Some((x, _)) => x.num == sig.r,
        None => false,
    }
}

/// Re-exports the secp256k1 module path `sec::parse`/`sec::encode` for the
/// common case of signing with a freshly-parsed SEC public key.
pub fn public_key_from_sec(data: &[u8]) -> Result<S256Point, Error> {
    sec::parse(data)
}

pub use secp256k1::order as group_order;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify_round_trips() {
        let secret = BigUint::from(12345u64);
        let priv_key = PrivateKey::new(secret).expect("valid secret");
        let z = BigUint::from(999999u64);
        let sig = priv_key.sign(&z);
        assert!(verify(&priv_key.point, &z, &sig));
    }

    #[test]
    fn signature_is_low_s() {
        let priv_key = PrivateKey::new(BigUint::from(42u64)).expect("valid secret");
        let z = BigUint::from(12345678u64);
        let sig = priv_key.sign(&z);
        assert!(sig.s <= &order() / BigUint::from(2u32));
    }

    #[test]
    fn verify_known_vector() {
        let x = BigUint::parse_bytes(
            b"887387e452b8eacc4acfde10d9aaf7f6d9a0f975aabb10d006e4da568744d06c",
            16,
        )
        .expect("valid hex");
        let y = BigUint::parse_bytes(
            b"61de6d95231cd89026e286df3b6ae4a894a3378e393e93a0f45b666329a0ae34",
            16,
        )
        .expect("valid hex");
        let point = crate::secp256k1::s256_point(x, y).expect("on curve");

        let z = BigUint::parse_bytes(
            b"ec208baa0fc1c19f708a9ca96fdeff3ac3f230bb4a7ba4aede4942ad003c0f60",
            16,
        )
        .expect("valid hex");
        let r = BigUint::parse_bytes(
            b"ac8d1c87e51d0d441be8b3dd5b05c8795b48875dffe00b7ffcfac23010d3a395",
            16,
        )
        .expect("valid hex");
        let s = BigUint::parse_bytes(
            b"68342ceff8935ededd102dd876ffd6ba72d6a427a3edb13d26eb0781cb423c4",
            16,
        )
        .expect("valid hex");

        assert!(verify(&point, &z, &Signature::new(r, s)));
    }

    #[test]
    fn verify_rejects_out_of_range_r_and_s() {
        let priv_key = PrivateKey::new(BigUint::from(7u64)).expect("valid secret");
        let bad = Signature::new(BigUint::zero(), BigUint::from(1u32));
        assert!(!verify(&priv_key.point, &BigUint::from(1u32), &bad));
    }
}
