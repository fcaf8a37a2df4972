//! Legacy Bitcoin transactions: `TxIn`/`TxOut`/`Tx` parsing and
//! serialization, signature hashing, per-input verification and signing,
//! and the `TxFetcher` cache that resolves previous outputs.

pub mod error;
pub mod fetcher;
pub mod txin;
pub mod txout;
pub mod tx;

pub use error::Error;
pub use fetcher::TxFetcher;
pub use tx::Tx;
pub use txin::TxIn;
pub use txout::TxOut;
