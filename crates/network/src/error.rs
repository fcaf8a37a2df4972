use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("network magic did not match the expected {expected} (testnet={testnet})")]
    BadMagic { expected: String, testnet: bool },

    #[error("envelope checksum mismatch")]
    BadChecksum,

    #[error("relay byte {0:#04x} is neither 0x00 nor 0x01")]
    InvalidRelayByte(u8),

    #[error("headers message carried a non-zero tx count for header {0}")]
    UnexpectedTransactions(usize),

    #[error("connection error: {0}")]
    Io(String),

    #[error(transparent)]
    Common(#[from] btc_common::Error),

    #[error(transparent)]
    Block(#[from] btc_block::Error),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}
