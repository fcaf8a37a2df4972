use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    #[error("field value {num} is not in range [0, {prime})")]
    ValueOutOfRange { num: String, prime: String },

    #[error("cannot combine field elements or points from different domains")]
    DomainMismatch,

    #[error("point ({x}, {y}) is not on the curve")]
    NotOnCurve { x: String, y: String },

    #[error("scalar {0} is not in range [1, n)")]
    ScalarOutOfRange(String),

    #[error("malformed DER signature: {0}")]
    MalformedSignature(String),

    #[error("malformed SEC-encoded public key: {0}")]
    MalformedSec(String),

    #[error("malformed WIF-encoded private key: {0}")]
    MalformedWif(String),

    #[error(transparent)]
    Base58(#[from] btc_common::Error),
}
