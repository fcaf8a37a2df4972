//! The concrete curve Bitcoin uses: `y² = x³ + 7` over `p = 2²⁵⁶ − 2³² − 977`,
//! with generator `G` and group order `n`.

use num_bigint::{BigInt, BigUint};
use num_traits::{Num, One};

use crate::error::Error;
use crate::field::FieldElement;
use crate::point::Point;

const A: u32 = 0;
const B: u32 = 7;

/// `p = 2²⁵⁶ − 2³² − 977`.
pub fn prime() -> BigUint {
    (BigUint::one() << 256u32) - (BigUint::one() << 32u32) - BigUint::from(977u32)
}

/// The group order `n`.
pub fn order() -> BigUint {
    BigUint::from_str_radix(
        "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141",
        16,
    )
    .expect("static hex literal parses")
}

fn gx() -> BigUint {
    BigUint::from_str_radix(
        "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",
        16,
    )
    .expect("static hex literal parses")
}

fn gy() -> BigUint {
    BigUint::from_str_radix(
        "483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8",
        16,
    )
    .expect("static hex literal parses")
}

/// A [`FieldElement`] specialized to secp256k1's prime field.
pub fn s256_field(num: BigUint) -> Result<FieldElement, Error> {
    FieldElement::new(num % prime(), prime())
}

fn curve_params() -> (FieldElement, FieldElement) {
    let a = FieldElement::new(BigUint::from(A), prime()).expect("0 is in range");
    let b = FieldElement::new(BigUint::from(B), prime()).expect("7 is in range");
    (a, b)
}

/// A point on secp256k1: `y² = x³ + 7`.
pub type S256Point = Point;

/// Builds the point `(x, y)` on secp256k1, or an error if it's not on the
/// curve.
pub fn s256_point(x: BigUint, y: BigUint) -> Result<S256Point, Error> {
    let (a, b) = curve_params();
    Point::new(s256_field(x)?, s256_field(y)?, a, b)
}

/// The point at infinity on secp256k1.
pub fn s256_infinity() -> S256Point {
    let (a, b) = curve_params();
    Point::infinity(a, b)
}

/// The generator point `G`.
pub fn generator() -> S256Point {
    s256_point(gx(), gy()).expect("G is on the curve by construction")
}

/// `secret·G`, with the scalar reduced modulo the group order `n` first.
pub fn scalar_base_mul(secret: &BigUint) -> S256Point {
    let reduced = secret % order();
    generator().scalar_mul(&reduced)
}

/// `scalar·P`, with the scalar reduced modulo the group order `n` first.
pub fn scalar_mul(point: &S256Point, scalar: &BigUint) -> S256Point {
    let reduced = scalar % order();
    point.scalar_mul(&reduced)
}

/// Square root in the secp256k1 field: valid because `p ≡ 3 (mod 4)`, so
/// `sqrt(v) = v^((p+1)/4)`.
pub fn field_sqrt(v: &FieldElement) -> FieldElement {
    let exponent = BigInt::from((prime() + BigUint::one()) / BigUint::from(4u32));
    v.pow(&exponent)
}

/// Encodes a scalar as fixed-width 32-byte big-endian, the width every
/// secp256k1 integer (private key, sighash, SEC coordinate) serializes to.
pub fn to_32_be(num: &BigUint) -> [u8; 32] {
    let bytes = num.to_bytes_be();
    let mut out = [0u8; 32];
    let start = 32 - bytes.len();
    out[start..].copy_from_slice(&bytes);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_times_generator_is_infinity() {
        let point = scalar_base_mul(&order());
        assert!(point.is_infinity());
    }

    #[test]
    fn known_secret_to_pubkey_vectors() {
        let cases: [(u64, &str, &str); 2] = [
            (
                7,
                "5cbdf0646e5db4eaa398f365f2ea7a0e3d419b7e0330e39ce92bddedcac4f9bc",
                "6aebca40ba255960a3178d6d861a54dba813d0b813fde7b5a5082628087264da",
            ),
            (
                1485,
                "c982196a7466fbbbb0e27a940b6af926c1a74d5ad07128c82824a11b5398afda",
                "7a91f9eae64438afb9ce6448a1c133db2d8fb9254e4546b6f001637d50901f55",
            ),
        ];
        for (secret, x_hex, y_hex) in cases {
            let x = BigUint::from_str_radix(x_hex, 16).expect("valid hex");
            let y = BigUint::from_str_radix(y_hex, 16).expect("valid hex");
            let expected = s256_point(x, y).expect("on curve");
            let got = scalar_base_mul(&BigUint::from(secret));
            assert_eq!(got, expected);
        }
    }
}
