//! Domain-local analogue of `ethrex_rlp`'s `RLPDecode`/`RLPEncode`: a pair of
//! traits that consume/produce a byte cursor rather than an owned buffer,
//! so struct-level `decode` implementations can chain field after field
//! without re-slicing by hand.

use crate::error::Error;
use crate::varint::{encode_varint, read_varint};

/// Anything parseable from a prefix of a byte slice, Bitcoin wire style.
///
/// Mirrors `RLPDecode::decode_unfinished`: implementors consume only as much
/// of `buf` as they need and return the unconsumed remainder, so callers can
/// decode a struct field by field without tracking offsets themselves.
pub trait BtcDecode: Sized {
    fn decode(buf: &[u8]) -> Result<(Self, &[u8]), Error>;

    /// Decodes `buf` and requires every byte to have been consumed.
    fn decode_exact(buf: &[u8]) -> Result<Self, Error> {
        let (value, rest) = Self::decode(buf)?;
        if !rest.is_empty() {
            return Err(Error::TrailingBytes(rest.len()));
        }
        Ok(value)
    }
}

/// The encode half of [`BtcDecode`]: appends a wire representation to `out`.
pub trait BtcEncode {
    fn encode(&self, out: &mut Vec<u8>);

    fn encode_to_vec(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode(&mut out);
        out
    }
}

impl BtcDecode for u8 {
    fn decode(buf: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (&byte, rest) = buf.split_first().ok_or(Error::eof(1))?;
        Ok((byte, rest))
    }
}

impl BtcEncode for u8 {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(*self);
    }
}

impl<const N: usize> BtcDecode for [u8; N] {
    fn decode(buf: &[u8]) -> Result<(Self, &[u8]), Error> {
        crate::endian::read_array::<N>(buf)
    }
}

impl<const N: usize> BtcEncode for [u8; N] {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self);
    }
}

/// Reads a CompactSize item count followed by that many `T`s — the pattern
/// used for tx input/output lists, headers lists, and merkle-block hash
/// lists.
pub fn decode_vec<T: BtcDecode>(buf: &[u8]) -> Result<(Vec<T>, &[u8]), Error> {
    let (count, mut rest) = read_varint(buf)?;
    let mut items = Vec::with_capacity(count.min(1 << 20) as usize);
    for _ in 0..count {
        let (item, tail) = T::decode(rest)?;
        items.push(item);
        rest = tail;
    }
    Ok((items, rest))
}

/// Encodes a CompactSize count followed by each item's encoding.
pub fn encode_vec<T: BtcEncode>(items: &[T], out: &mut Vec<u8>) {
    encode_varint(items.len() as u64, out);
    for item in items {
        item.encode(out);
    }
}

/// Reads a CompactSize length followed by that many raw bytes (a
/// `var_str`/pushdata-style byte string).
pub fn decode_var_bytes(buf: &[u8]) -> Result<(Vec<u8>, &[u8]), Error> {
    let (len, rest) = read_varint(buf)?;
    let len = len as usize;
    if rest.len() < len {
        return Err(Error::eof(len - rest.len()));
    }
    let (bytes, rest) = rest.split_at(len);
    Ok((bytes.to_vec(), rest))
}

/// Encodes `bytes` as a CompactSize length followed by the raw bytes.
pub fn encode_var_bytes(bytes: &[u8], out: &mut Vec<u8>) {
    encode_varint(bytes.len() as u64, out);
    out.extend_from_slice(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_u8() {
        let (v, rest) = u8::decode(&[9, 1, 2]).expect("decode");
        assert_eq!(v, 9);
        assert_eq!(rest, &[1, 2]);
    }

    #[test]
    fn decode_exact_rejects_trailing_bytes() {
        assert_eq!(
            u8::decode_exact(&[1, 2]).unwrap_err(),
            Error::TrailingBytes(1)
        );
    }

    #[test]
    fn var_bytes_round_trip() {
        let data = vec![1u8, 2, 3, 4, 5];
        let mut out = Vec::new();
        encode_var_bytes(&data, &mut out);
        let (decoded, rest) = decode_var_bytes(&out).expect("decode");
        assert_eq!(decoded, data);
        assert!(rest.is_empty());
    }

    #[test]
    fn vec_round_trip() {
        let items: Vec<u8> = vec![10, 20, 30];
        let mut out = Vec::new();
        encode_vec(&items, &mut out);
        let (decoded, rest): (Vec<u8>, &[u8]) = decode_vec(&out).expect("decode");
        assert_eq!(decoded, items);
        assert!(rest.is_empty());
    }
}
