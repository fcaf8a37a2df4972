//! Bitcoin Script: parsing, serialization, and stack evaluation.
//!
//! A [`Script`] is a flat list of [`Command`]s. [`eval::evaluate`] runs a
//! script against a sighash integer, splicing in BIP16 P2SH redeem scripts
//! as they're recognized. [`patterns`] recognizes the two standard output
//! templates this workspace builds scripts for.
//!
//! Locktime-dependent opcodes (`OP_CHECKLOCKTIMEVERIFY`, `OP_CHECKSEQUENCEVERIFY`)
//! are not implemented: evaluation only has access to the sighash integer,
//! not the spending transaction's locktime or the input's sequence number,
//! so they're unrecognized opcodes here rather than silent no-ops.

pub mod command;
pub mod error;
pub mod eval;
pub mod numbers;
pub mod opcode;
pub mod patterns;
pub mod script;

pub use command::Command;
pub use error::Error;
pub use eval::evaluate;
pub use patterns::{is_p2pkh, is_p2sh};
pub use script::Script;
