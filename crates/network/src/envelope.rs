//! The network message envelope: magic ‖ command ‖ length ‖ checksum ‖
//! payload.

use std::io::Read;

use btc_common::endian::read_u32_le;
use btc_common::hash::hash256;

use crate::error::Error;

pub const NETWORK_MAGIC: [u8; 4] = [0xf9, 0xbe, 0xb4, 0xd9];
pub const TESTNET_NETWORK_MAGIC: [u8; 4] = [0x0b, 0x11, 0x09, 0x07];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub command: String,
    pub payload: Vec<u8>,
    pub testnet: bool,
}

impl Envelope {
    pub fn new(command: impl Into<String>, payload: Vec<u8>, testnet: bool) -> Self {
        Envelope {
            command: command.into(),
            payload,
            testnet,
        }
    }

    fn magic(&self) -> [u8; 4] {
        if self.testnet {
            TESTNET_NETWORK_MAGIC
        } else {
            NETWORK_MAGIC
        }
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(24 + self.payload.len());
        out.extend_from_slice(&self.magic());
        let mut command_field = [0u8; 12];
        let command_bytes = self.command.as_bytes();
        command_field[..command_bytes.len()].copy_from_slice(command_bytes);
        out.extend_from_slice(&command_field);
        out.extend_from_slice(&(self.payload.len() as u32).to_le_bytes());
        out.extend_from_slice(&hash256(&self.payload)[..4]);
        out.extend_from_slice(&self.payload);
        out
    }

    /// Reads one framed envelope off `reader`, validating the magic and
    /// checksum.
    pub fn read_from<R: Read>(reader: &mut R, testnet: bool) -> Result<Self, Error> {
        let expected_magic = if testnet {
            TESTNET_NETWORK_MAGIC
        } else {
            NETWORK_MAGIC
        };
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != expected_magic {
            return Err(Error::BadMagic {
                expected: hex::encode(expected_magic),
                testnet,
            });
        }

        let mut command_field = [0u8; 12];
        reader.read_exact(&mut command_field)?;
        let command_len = command_field.iter().position(|&b| b == 0).unwrap_or(12);
        let command = String::from_utf8_lossy(&command_field[..command_len]).into_owned();

        let mut len_bytes = [0u8; 4];
        reader.read_exact(&mut len_bytes)?;
        let (payload_len, _) = read_u32_le(&len_bytes)?;

        let mut checksum = [0u8; 4];
        reader.read_exact(&mut checksum)?;

        let mut payload = vec![0u8; payload_len as usize];
        reader.read_exact(&mut payload)?;
        if hash256(&payload)[..4] != checksum {
            return Err(Error::BadChecksum);
        }

        Ok(Envelope {
            command,
            payload,
            testnet,
        })
    }
}

impl std::fmt::Display for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.command, hex::encode(&self.payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_serialize_and_read_from() {
        let envelope = Envelope::new("verack", Vec::new(), false);
        let encoded = envelope.serialize();
        let parsed = Envelope::read_from(&mut &encoded[..], false).expect("parse");
        assert_eq!(parsed, envelope);
    }

    #[test]
    fn rejects_the_wrong_network_magic() {
        let encoded = Envelope::new("verack", Vec::new(), false).serialize();
        let err = Envelope::read_from(&mut &encoded[..], true).unwrap_err();
        assert!(matches!(err, Error::BadMagic { .. }));
    }

    #[test]
    fn rejects_a_tampered_payload() {
        let mut encoded = Envelope::new("ping", vec![1, 2, 3, 4, 5, 6, 7, 8], false).serialize();
        let last = encoded.len() - 1;
        encoded[last] ^= 0xff;
        let err = Envelope::read_from(&mut &encoded[..], false).unwrap_err();
        assert!(matches!(err, Error::BadChecksum));
    }

    #[test]
    fn command_field_is_zero_padded_to_twelve_bytes() {
        let encoded = Envelope::new("tx", Vec::new(), false).serialize();
        assert_eq!(&encoded[4..6], b"tx");
        assert_eq!(&encoded[6..16], &[0u8; 10]);
    }
}
