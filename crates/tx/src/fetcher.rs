//! A process-wide cache of previously-seen transactions, keyed by id.
//!
//! Populating the cache from the network is a node-layer concern (the
//! original source did it over HTTP); this crate only owns the cache
//! itself, `insert`, and a JSON disk format compatible with it.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::error::Error;
use crate::tx::Tx;

#[derive(Debug, Default)]
pub struct TxFetcher {
    cache: HashMap<String, Tx>,
}

impl TxFetcher {
    pub fn new() -> Self {
        TxFetcher::default()
    }

    /// Returns the cached transaction for `tx_id`, or `Error::FetchError` if
    /// it hasn't been inserted yet.
    pub fn fetch(&self, tx_id: &str) -> Result<&Tx, Error> {
        self.cache
            .get(tx_id)
            .ok_or_else(|| Error::FetchError(tx_id.to_string()))
    }

    /// Parses `raw` as a legacy transaction and inserts it under `tx_id`,
    /// verifying the computed id matches what was requested.
    pub fn insert(&mut self, tx_id: &str, raw: &[u8], testnet: bool) -> Result<(), Error> {
        let (tx, _) = Tx::parse(raw, testnet)?;
        if tx.id() != tx_id {
            return Err(Error::IdMismatch {
                fetched: tx.id(),
                requested: tx_id.to_string(),
            });
        }
        self.cache.insert(tx_id.to_string(), tx);
        Ok(())
    }

    /// Loads a `{tx_id_hex: raw_tx_hex}` JSON object from disk into the
    /// cache. A witness-flagged entry fails the same way `Tx::parse` fails
    /// on a live fetch — this loader does not strip the segwit marker.
    pub fn load_cache(&mut self, path: &Path) -> Result<(), Error> {
        let data = std::fs::read_to_string(path).map_err(|e| Error::Io(e.to_string()))?;
        let disk_cache: HashMap<String, String> =
            serde_json::from_str(&data).map_err(|e| Error::Json(e.to_string()))?;
        for (tx_id, raw_hex) in disk_cache {
            let raw = hex::decode(&raw_hex).map_err(|e| Error::Malformed(e.to_string()))?;
            let (tx, _) = Tx::parse(&raw, false)?;
            self.cache.insert(tx_id, tx);
        }
        debug!(count = self.cache.len(), "loaded tx fetcher cache from disk");
        Ok(())
    }

    /// Dumps the cache to disk as a `{tx_id_hex: raw_tx_hex}` JSON object.
    pub fn dump_cache(&self, path: &Path) -> Result<(), Error> {
        let to_dump: HashMap<&str, String> = self
            .cache
            .iter()
            .map(|(id, tx)| (id.as_str(), hex::encode(tx.serialize())))
            .collect();
        let serialized =
            serde_json::to_string_pretty(&to_dump).map_err(|e| Error::Json(e.to_string()))?;
        std::fs::write(path, serialized).map_err(|e| Error::Io(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use btc_script::{Command, Script};
    use crate::txin::TxIn;
    use crate::txout::TxOut;

    fn sample_tx() -> Tx {
        Tx::new(
            1,
            vec![TxIn::new([0x22; 32], 0, Script::new(vec![Command::Element(vec![1])]), 0xffffffff)],
            vec![TxOut::new(100, Script::new(vec![Command::Op(0x51)]))],
            0,
            false,
        )
    }

    #[test]
    fn insert_then_fetch_round_trips() {
        let mut fetcher = TxFetcher::new();
        let tx = sample_tx();
        let id = tx.id();
        fetcher.insert(&id, &tx.serialize(), false).expect("insert");
        assert_eq!(fetcher.fetch(&id).expect("fetch").id(), id);
    }

    #[test]
    fn insert_rejects_id_mismatch() {
        let mut fetcher = TxFetcher::new();
        let tx = sample_tx();
        assert!(fetcher.insert("deadbeef", &tx.serialize(), false).is_err());
    }

    #[test]
    fn fetch_missing_id_fails() {
        let fetcher = TxFetcher::new();
        assert!(matches!(fetcher.fetch("00"), Err(Error::FetchError(_))));
    }

    #[test]
    fn dump_then_load_round_trips() {
        let dir = std::env::temp_dir().join(format!("btc-tx-fetcher-test-{:?}", std::thread::current().id()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join("cache.json");

        let mut fetcher = TxFetcher::new();
        let tx = sample_tx();
        let id = tx.id();
        fetcher.insert(&id, &tx.serialize(), false).expect("insert");
        fetcher.dump_cache(&path).expect("dump");

        let mut reloaded = TxFetcher::new();
        reloaded.load_cache(&path).expect("load");
        assert_eq!(reloaded.fetch(&id).expect("fetch").id(), id);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
