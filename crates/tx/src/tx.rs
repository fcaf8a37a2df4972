//! Legacy (pre-segwit) Bitcoin transactions: parse/serialize, signature
//! hashing, per-input verification and signing.

use std::fmt;

use btc_common::codec::{decode_vec, encode_vec, BtcEncode};
use btc_common::endian::read_u32_le;
use btc_common::hash::hash256;
use btc_common::varint::encode_varint;
use btc_crypto::ecdsa::PrivateKey;
use btc_crypto::sec;
use btc_script::{evaluate, patterns, Command, Script};
use num_bigint::BigUint;
use tracing::warn;

use crate::error::Error;
use crate::fetcher::TxFetcher;
use crate::txin::TxIn;
use crate::txout::TxOut;

const SIGHASH_ALL: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tx {
    pub version: u32,
    pub tx_ins: Vec<TxIn>,
    pub tx_outs: Vec<TxOut>,
    pub locktime: u32,
    pub testnet: bool,
}

impl Tx {
    pub fn new(version: u32, tx_ins: Vec<TxIn>, tx_outs: Vec<TxOut>, locktime: u32, testnet: bool) -> Self {
        Tx {
            version,
            tx_ins,
            tx_outs,
            locktime,
            testnet,
        }
    }

    /// Parses a legacy transaction. Rejects segwit-marked input (byte 4 of
    /// the stream is the `0x00` witness marker) rather than silently
    /// discarding the witness data.
    pub fn parse(buf: &[u8], testnet: bool) -> Result<(Self, &[u8]), Error> {
        let (version, rest) = read_u32_le(buf)?;
        if rest.first() == Some(&0u8) {
            warn!("rejecting segwit-marked transaction during legacy parse");
            return Err(Error::WitnessNotSupported);
        }
        let (tx_ins, rest): (Vec<TxIn>, &[u8]) = decode_vec(rest)?;
        if tx_ins.is_empty() {
            return Err(Error::EmptyInputs);
        }
        let (tx_outs, rest): (Vec<TxOut>, &[u8]) = decode_vec(rest)?;
        if tx_outs.is_empty() {
            return Err(Error::EmptyOutputs);
        }
        let (locktime, rest) = read_u32_le(rest)?;
        Ok((
            Tx {
                version,
                tx_ins,
                tx_outs,
                locktime,
                testnet,
            },
            rest,
        ))
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.version.to_le_bytes());
        encode_vec(&self.tx_ins, &mut out);
        encode_vec(&self.tx_outs, &mut out);
        out.extend_from_slice(&self.locktime.to_le_bytes());
        out
    }

    /// The transaction hash, reversed into the conventional display order.
    pub fn hash(&self) -> [u8; 32] {
        let mut digest = hash256(&self.serialize());
        digest.reverse();
        digest
    }

    pub fn id(&self) -> String {
        hex::encode(self.hash())
    }

    /// The fee in satoshi: sum of input values minus sum of output amounts.
    /// Negative values are returned rather than rejected; `verify` is what
    /// enforces non-negativity.
    pub fn fee(&self, fetcher: &TxFetcher) -> Result<i64, Error> {
        let mut in_amount: i64 = 0;
        for tx_in in &self.tx_ins {
            in_amount += tx_in.value(fetcher)? as i64;
        }
        let out_amount: i64 = self.tx_outs.iter().map(|out| out.amount as i64).sum();
        Ok(in_amount - out_amount)
    }

    /// The integer `z` to sign/verify for input `input_index`.
    pub fn sig_hash(
        &self,
        input_index: usize,
        redeem_script: Option<&Script>,
        fetcher: &TxFetcher,
    ) -> Result<BigUint, Error> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.version.to_le_bytes());
        encode_varint(self.tx_ins.len() as u64, &mut out);
        for (idx, tx_in) in self.tx_ins.iter().enumerate() {
            let script_sig = if idx == input_index {
                match redeem_script {
                    Some(script) => script.clone(),
                    None => tx_in.script_pubkey(fetcher)?,
                }
            } else {
                Script::default()
            };
            let signing_in = TxIn::new(tx_in.prev_tx, tx_in.prev_index, script_sig, tx_in.sequence);
            signing_in.encode(&mut out);
        }
        encode_vec(&self.tx_outs, &mut out);
        out.extend_from_slice(&self.locktime.to_le_bytes());
        out.extend_from_slice(&SIGHASH_ALL.to_le_bytes());
        let digest = hash256(&out);
        Ok(BigUint::from_bytes_be(&digest))
    }

    /// Whether input `input_index` has a valid unlocking script against its
    /// referenced output.
    pub fn verify_input(&self, input_index: usize, fetcher: &TxFetcher) -> Result<bool, Error> {
        let tx_in = &self.tx_ins[input_index];
        let script_pubkey = tx_in.script_pubkey(fetcher)?;
        let redeem_script = if patterns::is_p2sh(&script_pubkey) {
            let raw = match tx_in.script_sig.commands.last() {
                Some(Command::Element(bytes)) => bytes.clone(),
                _ => {
                    return Err(Error::Malformed(
                        "P2SH script_sig is missing its redeem script element".into(),
                    ))
                }
            };
            let mut prefixed = Vec::new();
            encode_varint(raw.len() as u64, &mut prefixed);
            prefixed.extend_from_slice(&raw);
            let (redeem, _) = Script::decode(&prefixed)?;
            Some(redeem)
        } else {
            None
        };
        let z = self.sig_hash(input_index, redeem_script.as_ref(), fetcher)?;
        let mut combined = tx_in.script_sig.clone();
        combined.extend(script_pubkey);
        Ok(evaluate(&combined, &z)?)
    }

    /// Checks the fee is non-negative and every input verifies. Does not
    /// check UTXO liveness — that's a node-layer concern.
    pub fn verify(&self, fetcher: &TxFetcher) -> Result<bool, Error> {
        if self.fee(fetcher)? < 0 {
            return Ok(false);
        }
        for i in 0..self.tx_ins.len() {
            if !self.verify_input(i, fetcher)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Signs input `input_index` with `priv_key` (P2PKH-style, SIGHASH_ALL),
    /// then re-verifies the input and returns the result.
    pub fn sign_input(
        &mut self,
        input_index: usize,
        priv_key: &PrivateKey,
        fetcher: &TxFetcher,
    ) -> Result<bool, Error> {
        let z = self.sig_hash(input_index, None, fetcher)?;
        let mut der = priv_key.sign(&z).der();
        der.push(SIGHASH_ALL as u8);
        let sec_pubkey = sec::encode(&priv_key.point, true)?;
        self.tx_ins[input_index].script_sig =
            Script::new(vec![Command::Element(der), Command::Element(sec_pubkey)]);
        self.verify_input(input_index, fetcher)
    }

    pub fn is_coinbase(&self) -> bool {
        self.tx_ins.len() == 1
            && self.tx_ins[0].prev_tx == [0u8; 32]
            && self.tx_ins[0].prev_index == 0xffffffff
    }

    /// BIP34 block height embedded in the coinbase `script_sig`'s first
    /// pushed element, or `None` if this isn't a coinbase transaction.
    pub fn coinbase_height(&self) -> Option<i64> {
        if !self.is_coinbase() {
            return None;
        }
        match self.tx_ins[0].script_sig.commands.first() {
            Some(Command::Element(bytes)) => Some(btc_script::numbers::decode_num(bytes)),
            _ => None,
        }
    }
}

impl fmt::Display for Tx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "tx: {}", self.id())?;
        writeln!(f, "version: {}", self.version)?;
        writeln!(f, "tx_ins:")?;
        for tx_in in &self.tx_ins {
            writeln!(f, "{tx_in}")?;
        }
        writeln!(f, "tx_outs:")?;
        for tx_out in &self.tx_outs {
            writeln!(f, "{tx_out}")?;
        }
        write!(f, "locktime: {}", self.locktime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use btc_crypto::ecdsa::PrivateKey;
    use num_bigint::BigUint;

    fn funding_and_spending(amount: u64) -> (Tx, TxFetcher, PrivateKey) {
        let priv_key = PrivateKey::new(BigUint::from(424242u64)).expect("valid secret");
        let sec_pubkey = sec::encode(&priv_key.point, true).expect("encode");
        let h160 = btc_common::hash160(&sec_pubkey);
        let script_pubkey = Script::new(vec![
            Command::Op(btc_script::opcode::OP_DUP),
            Command::Op(btc_script::opcode::OP_HASH160),
            Command::Element(h160.to_vec()),
            Command::Op(btc_script::opcode::OP_EQUALVERIFY),
            Command::Op(btc_script::opcode::OP_CHECKSIG),
        ]);
        let funding_tx = Tx::new(
            1,
            vec![TxIn::new([0x01; 32], 0, Script::default(), 0xffffffff)],
            vec![TxOut::new(amount, script_pubkey)],
            0,
            false,
        );

        let mut fetcher = TxFetcher::new();
        let funding_id = funding_tx.id();
        fetcher
            .insert(&funding_id, &funding_tx.serialize(), false)
            .expect("insert funding tx");

        let mut prev_tx = [0u8; 32];
        hex::decode_to_slice(&funding_id, &mut prev_tx).expect("valid hex id");
        let spending_tx = Tx::new(
            1,
            vec![TxIn::new(prev_tx, 0, Script::default(), 0xffffffff)],
            vec![TxOut::new(amount - 1000, Script::default())],
            0,
            false,
        );
        (spending_tx, fetcher, priv_key)
    }

    #[test]
    fn sign_then_verify_input_round_trips() {
        let (mut tx, fetcher, priv_key) = funding_and_spending(10_000);
        assert!(tx.sign_input(0, &priv_key, &fetcher).expect("sign"));
        assert!(tx.verify_input(0, &fetcher).expect("verify"));
    }

    #[test]
    fn verify_rejects_negative_fee() {
        let (mut tx, fetcher, priv_key) = funding_and_spending(500);
        tx.tx_outs[0].amount = 10_000; // spend more than was funded
        tx.sign_input(0, &priv_key, &fetcher).expect("sign");
        assert!(!tx.verify(&fetcher).expect("verify"));
    }

    #[test]
    fn parse_rejects_segwit_marker() {
        let mut raw = vec![1, 0, 0, 0]; // version
        raw.push(0x00); // segwit marker
        raw.push(0x01); // flag
        assert!(matches!(Tx::parse(&raw, false), Err(Error::WitnessNotSupported)));
    }

    #[test]
    fn coinbase_detection_and_height() {
        let script_sig = Script::new(vec![Command::Element(btc_script::numbers::encode_num(125_552))]);
        let tx = Tx::new(
            1,
            vec![TxIn::new([0u8; 32], 0xffffffff, script_sig, 0xffffffff)],
            vec![TxOut::new(5_000_000_000, Script::default())],
            0,
            false,
        );
        assert!(tx.is_coinbase());
        assert_eq!(tx.coinbase_height(), Some(125_552));
    }
}
