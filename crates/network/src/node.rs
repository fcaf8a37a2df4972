//! A minimal peer connection: opens a TCP stream, does the version/verack
//! handshake, and lets callers send and wait for framed messages.

use std::io::{BufReader, Write};
use std::net::TcpStream;

use tracing::{debug, trace, warn};

use crate::envelope::Envelope;
use crate::error::Error;
use crate::messages::{NetworkMessage, PingMessage, PongMessage, VerAckMessage, VersionMessage};

pub struct SimpleNode {
    writer: TcpStream,
    reader: BufReader<TcpStream>,
    testnet: bool,
}

impl SimpleNode {
    /// Opens a TCP connection to `host:port`, defaulting to 8333 (mainnet)
    /// or 18333 (testnet) when `port` is `None`.
    pub fn connect(host: &str, port: Option<u16>, testnet: bool) -> Result<Self, Error> {
        let port = port.unwrap_or(if testnet { 18333 } else { 8333 });
        debug!(host, port, testnet, "connecting to peer");
        let stream = TcpStream::connect((host, port))?;
        let reader = BufReader::new(stream.try_clone()?);
        Ok(SimpleNode {
            writer: stream,
            reader,
            testnet,
        })
    }

    /// Sends the version message and loops until both a peer version and a
    /// verack have been seen, auto-replying verack/pong along the way.
    pub fn handshake(&mut self) -> Result<(), Error> {
        debug!("starting handshake");
        self.send(&VersionMessage::default())?;
        let mut verack_received = false;
        let mut version_received = false;
        while !(verack_received && version_received) {
            let envelope = self.wait_for(&[VerAckMessage::COMMAND, VersionMessage::COMMAND])?;
            if envelope.command == VerAckMessage::COMMAND {
                verack_received = true;
            } else {
                version_received = true;
            }
        }
        debug!("handshake complete");
        Ok(())
    }

    pub fn send<M: NetworkMessage>(&mut self, message: &M) -> Result<(), Error> {
        let envelope = Envelope::new(M::COMMAND, message.serialize(), self.testnet);
        trace!(command = M::COMMAND, "sending message");
        self.writer.write_all(&envelope.serialize())?;
        Ok(())
    }

    /// Sends a command/payload pair not modeled by [`NetworkMessage`], e.g.
    /// a `btc_block::BloomFilter::filterload_payload` wrapped in a
    /// `crate::messages::GenericMessage`.
    pub fn send_raw(&mut self, command: &str, payload: Vec<u8>) -> Result<(), Error> {
        let envelope = Envelope::new(command, payload, self.testnet);
        trace!(command, "sending raw message");
        self.writer.write_all(&envelope.serialize())?;
        Ok(())
    }

    pub fn read(&mut self) -> Result<Envelope, Error> {
        let envelope = Envelope::read_from(&mut self.reader, self.testnet).inspect_err(|e| {
            warn!(error = %e, "failed to parse incoming envelope");
        })?;
        trace!(command = %envelope.command, "received message");
        Ok(envelope)
    }

    /// Reads envelopes until one matches a command in `commands`,
    /// auto-replying verack to a peer version and pong to a ping along the
    /// way. Returns the raw envelope; callers parse it with the concrete
    /// message type they asked for.
    pub fn wait_for(&mut self, commands: &[&str]) -> Result<Envelope, Error> {
        loop {
            let envelope = self.read()?;
            if envelope.command == VersionMessage::COMMAND {
                trace!("auto-replying verack to peer version");
                self.send(&VerAckMessage)?;
            } else if envelope.command == PingMessage::COMMAND {
                let ping = PingMessage::parse(&envelope.payload)?;
                trace!("auto-replying pong to peer ping");
                self.send(&PongMessage { nonce: ping.nonce })?;
            }
            if commands.contains(&envelope.command.as_str()) {
                return Ok(envelope);
            }
        }
    }
}
