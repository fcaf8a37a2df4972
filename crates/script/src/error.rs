use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    #[error("script parse error: {0}")]
    ParseError(String),

    #[error("script element of {0} byte(s) exceeds the 520-byte limit")]
    ElementTooLarge(usize),

    #[error("script evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error(transparent)]
    Common(#[from] btc_common::Error),

    #[error(transparent)]
    Crypto(#[from] btc_crypto::Error),
}
