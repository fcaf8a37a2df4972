//! Little-endian fixed-width integer helpers and the big-endian "display"
//! convention Bitcoin uses for hashes (`hash256` output is reversed before
//! being printed or compared against a block/tx id string).

use crate::error::Error;

pub fn read_u16_le(buf: &[u8]) -> Result<(u16, &[u8]), Error> {
    let (bytes, rest) = split(buf, 2)?;
    Ok((u16::from_le_bytes([bytes[0], bytes[1]]), rest))
}

pub fn read_u32_le(buf: &[u8]) -> Result<(u32, &[u8]), Error> {
    let (bytes, rest) = split(buf, 4)?;
    let mut arr = [0u8; 4];
    arr.copy_from_slice(bytes);
    Ok((u32::from_le_bytes(arr), rest))
}

pub fn read_i32_le(buf: &[u8]) -> Result<(i32, &[u8]), Error> {
    let (value, rest) = read_u32_le(buf)?;
    Ok((value as i32, rest))
}

pub fn read_u64_le(buf: &[u8]) -> Result<(u64, &[u8]), Error> {
    let (bytes, rest) = split(buf, 8)?;
    let mut arr = [0u8; 8];
    arr.copy_from_slice(bytes);
    Ok((u64::from_le_bytes(arr), rest))
}

pub fn read_i64_le(buf: &[u8]) -> Result<(i64, &[u8]), Error> {
    let (value, rest) = read_u64_le(buf)?;
    Ok((value as i64, rest))
}

pub fn read_array<const N: usize>(buf: &[u8]) -> Result<([u8; N], &[u8]), Error> {
    let (bytes, rest) = split(buf, N)?;
    let mut arr = [0u8; N];
    arr.copy_from_slice(bytes);
    Ok((arr, rest))
}

fn split(buf: &[u8], n: usize) -> Result<(&[u8], &[u8]), Error> {
    if buf.len() < n {
        return Err(Error::eof(n - buf.len()));
    }
    Ok(buf.split_at(n))
}

/// Reverses a 32-byte hash between its internal little-endian byte order and
/// the big-endian order used when displaying or comparing block/tx ids.
pub fn reverse32(bytes: [u8; 32]) -> [u8; 32] {
    let mut out = bytes;
    out.reverse();
    out
}
