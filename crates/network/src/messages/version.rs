use btc_common::endian::{read_u32_le, read_u64_le};
use btc_common::varint::{encode_varint, read_varint};

use crate::error::Error;
use crate::messages::NetworkMessage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionMessage {
    pub version: u32,
    pub services: u64,
    pub timestamp: u64,
    pub receiver_services: u64,
    pub receiver_ip: [u8; 4],
    pub receiver_port: u16,
    pub sender_services: u64,
    pub sender_ip: [u8; 4],
    pub sender_port: u16,
    pub nonce: u64,
    pub user_agent: String,
    pub latest_block: u32,
    pub relay: bool,
}

impl Default for VersionMessage {
    fn default() -> Self {
        VersionMessage {
            version: 70015,
            services: 0,
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            receiver_services: 0,
            receiver_ip: [0, 0, 0, 0],
            receiver_port: 8333,
            sender_services: 0,
            sender_ip: [0, 0, 0, 0],
            sender_port: 8333,
            nonce: rand::random(),
            user_agent: "/btc-network:0.1/".to_string(),
            latest_block: 0,
            relay: false,
        }
    }
}

impl NetworkMessage for VersionMessage {
    const COMMAND: &'static str = "version";

    fn parse(payload: &[u8]) -> Result<Self, Error> {
        let (version, rest) = read_u32_le(payload)?;
        let (services, rest) = read_u64_le(rest)?;
        let (timestamp, rest) = read_u64_le(rest)?;

        let (receiver_services, rest) = read_u64_le(rest)?;
        let (receiver_mapped, rest) = split(rest, 16)?;
        let receiver_ip = [
            receiver_mapped[12],
            receiver_mapped[13],
            receiver_mapped[14],
            receiver_mapped[15],
        ];
        let (receiver_port_bytes, rest) = split(rest, 2)?;
        let receiver_port = u16::from_be_bytes([receiver_port_bytes[0], receiver_port_bytes[1]]);

        let (sender_services, rest) = read_u64_le(rest)?;
        let (sender_mapped, rest) = split(rest, 16)?;
        let sender_ip = [
            sender_mapped[12],
            sender_mapped[13],
            sender_mapped[14],
            sender_mapped[15],
        ];
        let (sender_port_bytes, rest) = split(rest, 2)?;
        let sender_port = u16::from_be_bytes([sender_port_bytes[0], sender_port_bytes[1]]);

        let (nonce, rest) = read_u64_le(rest)?;
        let (user_agent_len, rest) = read_varint(rest)?;
        let (user_agent_bytes, rest) = split(rest, user_agent_len as usize)?;
        let user_agent = String::from_utf8_lossy(user_agent_bytes).into_owned();

        let (latest_block, rest) = read_u32_le(rest)?;
        let (relay_byte, _) = split(rest, 1)?;
        let relay = match relay_byte[0] {
            0x00 => false,
            0x01 => true,
            other => return Err(Error::InvalidRelayByte(other)),
        };

        Ok(VersionMessage {
            version,
            services,
            timestamp,
            receiver_services,
            receiver_ip,
            receiver_port,
            sender_services,
            sender_ip,
            sender_port,
            nonce,
            user_agent,
            latest_block,
            relay,
        })
    }

    fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(&self.services.to_le_bytes());
        out.extend_from_slice(&self.timestamp.to_le_bytes());

        out.extend_from_slice(&self.receiver_services.to_le_bytes());
        out.extend_from_slice(&[0u8; 10]);
        out.extend_from_slice(&[0xff, 0xff]);
        out.extend_from_slice(&self.receiver_ip);
        out.extend_from_slice(&self.receiver_port.to_be_bytes());

        out.extend_from_slice(&self.sender_services.to_le_bytes());
        out.extend_from_slice(&[0u8; 10]);
        out.extend_from_slice(&[0xff, 0xff]);
        out.extend_from_slice(&self.sender_ip);
        out.extend_from_slice(&self.sender_port.to_be_bytes());

        out.extend_from_slice(&self.nonce.to_le_bytes());
        encode_varint(self.user_agent.len() as u64, &mut out);
        out.extend_from_slice(self.user_agent.as_bytes());
        out.extend_from_slice(&self.latest_block.to_le_bytes());
        out.push(self.relay as u8);
        out
    }
}

fn split(buf: &[u8], n: usize) -> Result<(&[u8], &[u8]), Error> {
    if buf.len() < n {
        return Err(btc_common::Error::eof(n - buf.len()).into());
    }
    Ok(buf.split_at(n))
}
