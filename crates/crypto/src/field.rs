//! A generic element of `Z/pZ`, used both directly (for the textbook curve
//! tests over small primes) and specialized by [`crate::secp256k1::S256Field`].

use std::fmt;

use num_bigint::{BigInt, BigUint};
use num_traits::{One, Signed, Zero};

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldElement {
    pub num: BigUint,
    pub prime: BigUint,
}

impl FieldElement {
    pub fn new(num: BigUint, prime: BigUint) -> Result<Self, Error> {
        if num >= prime {
            return Err(Error::ValueOutOfRange {
                num: num.to_string(),
                prime: prime.to_string(),
            });
        }
        Ok(FieldElement { num, prime })
    }

    fn same_field(&self, other: &FieldElement) -> Result<(), Error> {
        if self.prime != other.prime {
            return Err(Error::DomainMismatch);
        }
        Ok(())
    }

    pub fn add(&self, other: &FieldElement) -> Result<FieldElement, Error> {
        self.same_field(other)?;
        let num = (&self.num + &other.num) % &self.prime;
        Ok(FieldElement { num, prime: self.prime.clone() })
    }

    pub fn sub(&self, other: &FieldElement) -> Result<FieldElement, Error> {
        self.same_field(other)?;
        let num = (&self.prime + &self.num - &other.num) % &self.prime;
        Ok(FieldElement { num, prime: self.prime.clone() })
    }

    pub fn mul(&self, other: &FieldElement) -> Result<FieldElement, Error> {
        self.same_field(other)?;
        let num = (&self.num * &other.num) % &self.prime;
        Ok(FieldElement { num, prime: self.prime.clone() })
    }

    pub fn scale(&self, coefficient: &BigUint) -> FieldElement {
        let num = (coefficient * &self.num) % &self.prime;
        FieldElement { num, prime: self.prime.clone() }
    }

    /// Exponentiation with the exponent normalized modulo `p - 1`, so
    /// negative exponents (used for modular inverses) work the same as
    /// Python's `pow` with Fermat's little theorem.
    pub fn pow(&self, exponent: &BigInt) -> FieldElement {
        let modulus = &self.prime - BigUint::one();
        let modulus_signed = BigInt::from(modulus.clone());
        let mut reduced = exponent % &modulus_signed;
        if reduced.is_negative() {
            reduced += &modulus_signed;
        }
        let reduced = reduced
            .to_biguint()
            .unwrap_or_else(BigUint::zero);
        let num = self.num.modpow(&reduced, &self.prime);
        FieldElement { num, prime: self.prime.clone() }
    }

    pub fn div(&self, other: &FieldElement) -> Result<FieldElement, Error> {
        self.same_field(other)?;
        let exponent = BigInt::from(&other.prime - BigUint::from(2u32));
        let inverse = other.pow(&exponent);
        self.mul(&inverse)
    }

    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement_{}({})", self.prime, self.num)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fe(num: u64, prime: u64) -> FieldElement {
        FieldElement::new(BigUint::from(num), BigUint::from(prime)).expect("valid element")
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(FieldElement::new(BigUint::from(31u32), BigUint::from(31u32)).is_err());
    }

    #[test]
    fn add_wraps_modulo_prime() {
        assert_eq!(fe(2, 31).add(&fe(15, 31)).unwrap(), fe(17, 31));
        assert_eq!(fe(17, 31).add(&fe(21, 31)).unwrap(), fe(7, 31));
    }

    #[test]
    fn sub_wraps_modulo_prime() {
        assert_eq!(fe(29, 31).sub(&fe(4, 31)).unwrap(), fe(25, 31));
        assert_eq!(fe(15, 31).sub(&fe(30, 31)).unwrap(), fe(16, 31));
    }

    #[test]
    fn mul_wraps_modulo_prime() {
        assert_eq!(fe(24, 31).mul(&fe(19, 31)).unwrap(), fe(22, 31));
    }

    #[test]
    fn pow_handles_negative_exponents() {
        let a = fe(17, 31);
        assert_eq!(a.pow(&BigInt::from(3)), fe(15, 31));
        assert_eq!(fe(17, 31).pow(&BigInt::from(-3)), fe(29, 31));
    }

    #[test]
    fn div_matches_fermat_inverse() {
        assert_eq!(fe(3, 31).div(&fe(24, 31)).unwrap(), fe(4, 31));
    }

    #[test]
    fn different_primes_are_a_domain_mismatch() {
        assert_eq!(fe(1, 31).add(&fe(1, 37)), Err(Error::DomainMismatch));
    }
}
