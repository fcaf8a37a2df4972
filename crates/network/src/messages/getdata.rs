//! Inventory requests: a list of (type, identifier) pairs asking a peer to
//! send full transactions, blocks, filtered blocks, or compact blocks.

use btc_common::endian::{read_array, read_u32_le, reverse32};
use btc_common::varint::{encode_varint, read_varint};

use crate::error::Error;
use crate::messages::NetworkMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Tx,
    Block,
    FilteredBlock,
    CompactBlock,
}

impl DataType {
    fn code(self) -> u32 {
        match self {
            DataType::Tx => 1,
            DataType::Block => 2,
            DataType::FilteredBlock => 3,
            DataType::CompactBlock => 4,
        }
    }

    fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(DataType::Tx),
            2 => Some(DataType::Block),
            3 => Some(DataType::FilteredBlock),
            4 => Some(DataType::CompactBlock),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetDataMessage {
    /// Big-endian display order identifiers.
    data: Vec<(u32, [u8; 32])>,
}

impl GetDataMessage {
    pub fn new() -> Self {
        GetDataMessage::default()
    }

    pub fn add_data(&mut self, data_type: DataType, identifier: [u8; 32]) {
        self.data.push((data_type.code(), identifier));
    }

    pub fn entries(&self) -> impl Iterator<Item = (Option<DataType>, [u8; 32])> + '_ {
        self.data
            .iter()
            .map(|&(code, id)| (DataType::from_code(code), id))
    }
}

impl NetworkMessage for GetDataMessage {
    const COMMAND: &'static str = "getdata";

    fn parse(payload: &[u8]) -> Result<Self, Error> {
        let (count, mut rest) = read_varint(payload)?;
        let mut data = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let (code, next) = read_u32_le(rest)?;
            let (identifier_wire, next) = read_array::<32>(next)?;
            data.push((code, reverse32(identifier_wire)));
            rest = next;
        }
        Ok(GetDataMessage { data })
    }

    fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        encode_varint(self.data.len() as u64, &mut out);
        for &(code, identifier) in &self.data {
            out.extend_from_slice(&code.to_le_bytes());
            out.extend_from_slice(&reverse32(identifier));
        }
        out
    }
}
