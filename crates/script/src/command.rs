//! A Script command is either an opcode byte or a pushed data element — a
//! tagged sum, not a subclass hierarchy.

use std::fmt;

use crate::opcode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Op(u8),
    Element(Vec<u8>),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Op(op) => write!(f, "{}", opcode::name(*op)),
            Command::Element(bytes) => write!(f, "{}", hex::encode(bytes)),
        }
    }
}
