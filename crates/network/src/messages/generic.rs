//! An escape hatch for sending a command/payload pair this crate doesn't
//! model as its own type, e.g. a `filterload` payload built by
//! `btc_block::BloomFilter::filterload_payload`.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericMessage {
    pub command: String,
    pub payload: Vec<u8>,
}

impl GenericMessage {
    pub fn new(command: impl Into<String>, payload: Vec<u8>) -> Self {
        GenericMessage {
            command: command.into(),
            payload,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn serialize(&self) -> Vec<u8> {
        self.payload.clone()
    }
}
