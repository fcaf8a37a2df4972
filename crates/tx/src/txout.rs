//! A transaction output: an amount in satoshi plus the locking script.

use std::fmt;

use btc_common::codec::{BtcDecode, BtcEncode};
use btc_common::endian::read_u64_le;
use btc_common::Error as CommonError;
use btc_script::Script;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOut {
    pub amount: u64,
    pub script_pubkey: Script,
}

impl TxOut {
    pub fn new(amount: u64, script_pubkey: Script) -> Self {
        TxOut { amount, script_pubkey }
    }
}

impl BtcDecode for TxOut {
    fn decode(buf: &[u8]) -> Result<(Self, &[u8]), CommonError> {
        let (amount, rest) = read_u64_le(buf)?;
        let (script_pubkey, rest) =
            Script::decode(rest).map_err(|e| CommonError::malformed(e.to_string()))?;
        Ok((TxOut { amount, script_pubkey }, rest))
    }
}

impl BtcEncode for TxOut {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.amount.to_le_bytes());
        out.extend(
            self.script_pubkey
                .encode()
                .expect("script_pubkey elements are validated on construction"),
        );
    }
}

impl fmt::Display for TxOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.amount, self.script_pubkey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use btc_script::Command;

    #[test]
    fn round_trips_through_decode_and_encode() {
        let tx_out = TxOut::new(5_000_000_000, Script::new(vec![Command::Op(0x76)]));
        let mut out = Vec::new();
        tx_out.encode(&mut out);
        let (decoded, rest) = TxOut::decode(&out).expect("decode");
        assert_eq!(decoded, tx_out);
        assert!(rest.is_empty());
    }
}
