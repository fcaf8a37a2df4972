//! A transaction input: an outpoint (`prev_tx`, `prev_index`) plus the
//! unlocking script and sequence number.

use std::fmt;

use btc_common::codec::{BtcDecode, BtcEncode};
use btc_common::endian::{read_array, read_u32_le, reverse32};
use btc_common::Error as CommonError;
use btc_script::Script;

use crate::error::Error;
use crate::fetcher::TxFetcher;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxIn {
    /// The previous transaction's id, in the usual big-endian display order
    /// (the wire format stores this reversed).
    pub prev_tx: [u8; 32],
    pub prev_index: u32,
    pub script_sig: Script,
    pub sequence: u32,
}

impl TxIn {
    pub fn new(prev_tx: [u8; 32], prev_index: u32, script_sig: Script, sequence: u32) -> Self {
        TxIn {
            prev_tx,
            prev_index,
            script_sig,
            sequence,
        }
    }

    fn prev_tx_id(&self) -> String {
        hex::encode(self.prev_tx)
    }

    /// Looks up the referenced output's amount via `fetcher`.
    pub fn value(&self, fetcher: &TxFetcher) -> Result<u64, Error> {
        let tx = fetcher.fetch(&self.prev_tx_id())?;
        tx.tx_outs
            .get(self.prev_index as usize)
            .map(|out| out.amount)
            .ok_or_else(|| Error::Malformed("prev_index out of range for fetched tx".into()))
    }

    /// Looks up the referenced output's `script_pubkey` via `fetcher`.
    pub fn script_pubkey(&self, fetcher: &TxFetcher) -> Result<Script, Error> {
        let tx = fetcher.fetch(&self.prev_tx_id())?;
        tx.tx_outs
            .get(self.prev_index as usize)
            .map(|out| out.script_pubkey.clone())
            .ok_or_else(|| Error::Malformed("prev_index out of range for fetched tx".into()))
    }
}

impl BtcDecode for TxIn {
    fn decode(buf: &[u8]) -> Result<(Self, &[u8]), CommonError> {
        let (prev_tx_wire, rest) = read_array::<32>(buf)?;
        let prev_tx = reverse32(prev_tx_wire);
        let (prev_index, rest) = read_u32_le(rest)?;
        let (script_sig, rest) =
            Script::decode(rest).map_err(|e| CommonError::malformed(e.to_string()))?;
        let (sequence, rest) = read_u32_le(rest)?;
        Ok((
            TxIn {
                prev_tx,
                prev_index,
                script_sig,
                sequence,
            },
            rest,
        ))
    }
}

impl BtcEncode for TxIn {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&reverse32(self.prev_tx));
        out.extend_from_slice(&self.prev_index.to_le_bytes());
        out.extend(
            self.script_sig
                .encode()
                .expect("script_sig elements are validated on construction"),
        );
        out.extend_from_slice(&self.sequence.to_le_bytes());
    }
}

impl fmt::Display for TxIn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prev_tx_id(), self.prev_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use btc_script::Command;

    #[test]
    fn round_trips_through_decode_and_encode() {
        let tx_in = TxIn::new(
            [0x11; 32],
            7,
            Script::new(vec![Command::Element(vec![1, 2, 3])]),
            0xffffffff,
        );
        let mut out = Vec::new();
        tx_in.encode(&mut out);
        let (decoded, rest) = TxIn::decode(&out).expect("decode");
        assert_eq!(decoded, tx_in);
        assert!(rest.is_empty());
    }

    #[test]
    fn display_matches_python_repr_shape() {
        let tx_in = TxIn::new([0xab; 32], 3, Script::default(), 0);
        assert_eq!(tx_in.to_string(), format!("{}:3", hex::encode([0xab; 32])));
    }
}
