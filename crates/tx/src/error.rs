use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    #[error("transaction needs at least one input")]
    EmptyInputs,

    #[error("transaction needs at least one output")]
    EmptyOutputs,

    #[error("segregated witness transactions are not supported")]
    WitnessNotSupported,

    #[error("could not resolve previous transaction {0}")]
    FetchError(String),

    #[error("fetched transaction id {fetched} does not match requested id {requested}")]
    IdMismatch { fetched: String, requested: String },

    #[error("{0}")]
    Malformed(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("cache file is not valid JSON: {0}")]
    Json(String),

    #[error(transparent)]
    Common(#[from] btc_common::Error),

    #[error(transparent)]
    Crypto(#[from] btc_crypto::Error),

    #[error(transparent)]
    Script(#[from] btc_script::Error),
}
