use thiserror::Error;

/// Errors shared by every layer that parses or encodes wire/consensus data:
/// hashing helpers, varints, Base58Check, and compact-bits targets.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    #[error("unexpected end of input, needed at least {needed} more byte(s)")]
    UnexpectedEof { needed: usize },

    #[error("invalid Base58Check payload: {0}")]
    InvalidBase58(String),

    #[error("Base58Check checksum mismatch")]
    BadChecksum,

    #[error("varint encodes a value too large to round-trip through u64")]
    VarIntOverflow,

    #[error("trailing {0} byte(s) left over after decoding")]
    TrailingBytes(usize),

    #[error("{0}")]
    Malformed(String),
}

impl Error {
    pub fn eof(needed: usize) -> Self {
        Error::UnexpectedEof { needed }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Error::Malformed(msg.into())
    }
}
