//! A `Script` is a length-prefixed list of [`Command`]s: the same bytes
//! serve as `script_sig`/`script_pubkey` in a transaction and as the
//! `filterload`-adjacent payloads `btc-block` builds.

use std::fmt;

use btc_common::varint::{encode_varint, read_varint};

use crate::command::Command;
use crate::error::Error;
use crate::opcode::{OP_PUSHDATA1, OP_PUSHDATA2, OP_PUSHDATA4};

pub const MAX_ELEMENT_SIZE: usize = 520;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Script {
    pub commands: Vec<Command>,
}

impl Script {
    pub fn new(commands: Vec<Command>) -> Self {
        Script { commands }
    }

    /// Parses a varint-prefixed script payload, consuming exactly that many
    /// bytes and returning the unconsumed remainder.
    pub fn decode(buf: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (length, rest) = read_varint(buf)?;
        let length = length as usize;
        if rest.len() < length {
            return Err(Error::ParseError("script payload shorter than declared length".into()));
        }
        let (payload, rest) = rest.split_at(length);
        let commands = parse_commands(payload, length)?;
        Ok((Script { commands }, rest))
    }

    /// Serializes the raw command payload, without the varint length prefix.
    pub fn raw_serialize(&self) -> Result<Vec<u8>, Error> {
        let mut out = Vec::new();
        for command in &self.commands {
            match command {
                Command::Op(op) => out.push(*op),
                Command::Element(bytes) => {
                    let len = bytes.len();
                    if len > MAX_ELEMENT_SIZE {
                        return Err(Error::ElementTooLarge(len));
                    }
                    if len <= 75 {
                        out.push(len as u8);
                    } else if len <= 255 {
                        out.push(OP_PUSHDATA1);
                        out.push(len as u8);
                    } else {
                        out.push(OP_PUSHDATA2);
                        out.extend_from_slice(&(len as u16).to_le_bytes());
                    }
                    out.extend_from_slice(bytes);
                }
            }
        }
        Ok(out)
    }

    /// Serializes with the varint length prefix, the form that appears
    /// inside a transaction.
    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        let payload = self.raw_serialize()?;
        let mut out = Vec::new();
        encode_varint(payload.len() as u64, &mut out);
        out.extend(payload);
        Ok(out)
    }

    /// Appends another script's commands, the way a P2SH redeem script is
    /// spliced onto the pending command list during evaluation.
    pub fn extend(&mut self, other: Script) {
        self.commands.extend(other.commands);
    }
}

fn parse_commands(payload: &[u8], length: usize) -> Result<Vec<Command>, Error> {
    let mut commands = Vec::new();
    let mut count = 0usize;
    let mut cursor = payload;
    while count < length {
        let (&current, rest) = cursor
            .split_first()
            .ok_or_else(|| Error::ParseError("truncated script".into()))?;
        cursor = rest;
        count += 1;

        if (1..=75).contains(&current) {
            let n = current as usize;
            take_element(&mut cursor, n, &mut count, &mut commands)?;
        } else if current == OP_PUSHDATA1 {
            let (&n, rest) = cursor
                .split_first()
                .ok_or_else(|| Error::ParseError("truncated OP_PUSHDATA1 length".into()))?;
            cursor = rest;
            count += 1;
            take_element(&mut cursor, n as usize, &mut count, &mut commands)?;
        } else if current == OP_PUSHDATA2 {
            if cursor.len() < 2 {
                return Err(Error::ParseError("truncated OP_PUSHDATA2 length".into()));
            }
            let (len_bytes, rest) = cursor.split_at(2);
            let n = u16::from_le_bytes([len_bytes[0], len_bytes[1]]) as usize;
            cursor = rest;
            count += 2;
            take_element(&mut cursor, n, &mut count, &mut commands)?;
        } else if current == OP_PUSHDATA4 {
            if cursor.len() < 4 {
                return Err(Error::ParseError("truncated OP_PUSHDATA4 length".into()));
            }
            let (len_bytes, rest) = cursor.split_at(4);
            let mut arr = [0u8; 4];
            arr.copy_from_slice(len_bytes);
            let n = u32::from_le_bytes(arr) as usize;
            cursor = rest;
            count += 4;
            take_element(&mut cursor, n, &mut count, &mut commands)?;
        } else {
            commands.push(Command::Op(current));
        }
    }
    if count != length {
        return Err(Error::ParseError("script length accounting mismatch".into()));
    }
    Ok(commands)
}

fn take_element(
    cursor: &mut &[u8],
    n: usize,
    count: &mut usize,
    commands: &mut Vec<Command>,
) -> Result<(), Error> {
    if n > MAX_ELEMENT_SIZE {
        return Err(Error::ElementTooLarge(n));
    }
    if cursor.len() < n {
        return Err(Error::ParseError("truncated script push data".into()));
    }
    let (data, rest) = cursor.split_at(n);
    commands.push(Command::Element(data.to_vec()));
    *cursor = rest;
    *count += n;
    Ok(())
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.commands.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_p2pkh_script_pubkey() {
        let script = Script::new(vec![
            Command::Op(crate::opcode::OP_DUP),
            Command::Op(crate::opcode::OP_HASH160),
            Command::Element(vec![0x11; 20]),
            Command::Op(crate::opcode::OP_EQUALVERIFY),
            Command::Op(crate::opcode::OP_CHECKSIG),
        ]);
        let encoded = script.encode().expect("encode");
        let (decoded, rest) = Script::decode(&encoded).expect("decode");
        assert_eq!(decoded, script);
        assert!(rest.is_empty());
    }

    #[test]
    fn uses_pushdata1_for_elements_over_75_bytes() {
        let script = Script::new(vec![Command::Element(vec![0xab; 100])]);
        let raw = script.raw_serialize().expect("serialize");
        assert_eq!(raw[0], OP_PUSHDATA1);
        assert_eq!(raw[1], 100);
    }

    #[test]
    fn rejects_elements_over_520_bytes() {
        let script = Script::new(vec![Command::Element(vec![0u8; 521])]);
        assert!(matches!(script.raw_serialize(), Err(Error::ElementTooLarge(521))));
    }

    #[test]
    fn display_prints_opcode_names_and_hex_data() {
        let script = Script::new(vec![Command::Op(crate::opcode::OP_DUP), Command::Element(vec![1, 2])]);
        assert_eq!(script.to_string(), "OP_DUP 0102");
    }
}
