//! An ECDSA `(r, s)` signature and its DER encoding.

use num_bigint::BigUint;

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub r: BigUint,
    pub s: BigUint,
}

impl Signature {
    pub fn new(r: BigUint, s: BigUint) -> Self {
        Signature { r, s }
    }

    /// DER-encodes `r` and `s` as minimal big-endian integers, each wrapped
    /// in an ASN.1 INTEGER tag, then the whole pair in a SEQUENCE.
    pub fn der(&self) -> Vec<u8> {
        let mut result = Vec::new();
        result.extend(der_encode_integer(&self.r));
        result.extend(der_encode_integer(&self.s));
        let mut out = vec![0x30u8, result.len() as u8];
        out.extend(result);
        out
    }

    /// Parses a strict DER signature, rejecting any structural mismatch.
    pub fn parse_der(data: &[u8]) -> Result<Self, Error> {
        let mut cursor = data;
        cursor = expect_tag(cursor, 0x30)?;
        let (seq_len, rest) = read_length(cursor)?;
        if rest.len() != seq_len {
            return Err(Error::MalformedSignature(
                "sequence length does not match remaining input".into(),
            ));
        }
        let mut body = rest;

        body = expect_tag(body, 0x02)?;
        let (r_len, rest) = read_length(body)?;
        if rest.len() < r_len {
            return Err(Error::MalformedSignature("r length exceeds input".into()));
        }
        let r = BigUint::from_bytes_be(&rest[..r_len]);
        body = &rest[r_len..];

        body = expect_tag(body, 0x02)?;
        let (s_len, rest) = read_length(body)?;
        if rest.len() < s_len {
            return Err(Error::MalformedSignature("s length exceeds input".into()));
        }
        let s = BigUint::from_bytes_be(&rest[..s_len]);
        body = &rest[s_len..];

        if !body.is_empty() {
            return Err(Error::MalformedSignature("trailing bytes after s".into()));
        }
        Ok(Signature { r, s })
    }
}

fn der_encode_integer(value: &BigUint) -> Vec<u8> {
    let mut bytes = value.to_bytes_be();
    if bytes.is_empty() {
        bytes.push(0);
    }
    if bytes[0] & 0x80 != 0 {
        bytes.insert(0, 0x00);
    }
    let mut out = vec![0x02u8, bytes.len() as u8];
    out.extend(bytes);
    out
}

fn expect_tag(data: &[u8], tag: u8) -> Result<&[u8], Error> {
    match data.split_first() {
        Some((&byte, rest)) if byte == tag => Ok(rest),
        _ => Err(Error::MalformedSignature(format!("expected ASN.1 tag {tag:#x}"))),
    }
}

fn read_length(data: &[u8]) -> Result<(usize, &[u8]), Error> {
    let (&len, rest) = data
        .split_first()
        .ok_or_else(|| Error::MalformedSignature("missing length byte".into()))?;
    Ok((len as usize, rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn der_round_trips_small_values() {
        let sig = Signature::new(BigUint::from(1u32), BigUint::from(2u32));
        let encoded = sig.der();
        let decoded = Signature::parse_der(&encoded).expect("parse");
        assert_eq!(decoded, sig);
    }

    #[test]
    fn der_prepends_zero_byte_for_high_bit_values() {
        let high = BigUint::from_bytes_be(&[0xff; 32]);
        let sig = Signature::new(high.clone(), high);
        let encoded = sig.der();
        let decoded = Signature::parse_der(&encoded).expect("parse");
        assert_eq!(decoded, sig);
    }

    #[test]
    fn parse_der_rejects_wrong_outer_tag() {
        let mut bytes = Signature::new(BigUint::from(1u32), BigUint::from(1u32)).der();
        bytes[0] = 0x31;
        assert!(Signature::parse_der(&bytes).is_err());
    }

    #[test]
    fn parse_der_rejects_trailing_bytes() {
        let mut bytes = Signature::new(BigUint::from(1u32), BigUint::from(1u32)).der();
        bytes.push(0xff);
        assert!(Signature::parse_der(&bytes).is_err());
    }
}
