use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    #[error("bit field length {0} is not a multiple of 8")]
    BitFieldNotByteAligned(usize),

    #[error("ran out of flag bits while populating the merkle tree")]
    FlagBitsExhausted,

    #[error("ran out of hashes while populating the merkle tree")]
    HashesExhausted,

    #[error("merkle tree was not fully consumed: {0} flag bit(s) / {1} hash(es) left over")]
    TrailingInput(usize, usize),

    #[error("computed merkle root does not match the block header's")]
    MerkleRootMismatch,

    #[error(transparent)]
    Common(#[from] btc_common::Error),
}
