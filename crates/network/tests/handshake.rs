//! Drives `SimpleNode::handshake` against a loopback TCP peer that plays the
//! other side of the version/verack exchange, plus a ping/pong auto-reply.

use std::io::Write;
use std::net::TcpListener;

use btc_network::messages::{NetworkMessage, PingMessage, PongMessage, VerAckMessage, VersionMessage};
use btc_network::{Envelope, SimpleNode};

#[test]
fn handshake_completes_against_a_cooperative_peer() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let peer = std::thread::spawn(move || {
        let (mut socket, _) = listener.accept().expect("accept");

        // Peer receives our version, replies with its own version then verack.
        let incoming = Envelope::read_from(&mut socket, false).expect("read version");
        assert_eq!(incoming.command, VersionMessage::COMMAND);

        let their_version = Envelope::new(
            VersionMessage::COMMAND,
            VersionMessage::default().serialize(),
            false,
        );
        socket
            .write_all(&their_version.serialize())
            .expect("send version");

        let verack = Envelope::new(VerAckMessage::COMMAND, VerAckMessage.serialize(), false);
        socket.write_all(&verack.serialize()).expect("send verack");

        // Expect our verack reply to their version.
        let reply = Envelope::read_from(&mut socket, false).expect("read verack reply");
        assert_eq!(reply.command, VerAckMessage::COMMAND);
    });

    let mut node = SimpleNode::connect(
        &addr.ip().to_string(),
        Some(addr.port()),
        false,
    )
    .expect("connect");
    node.handshake().expect("handshake");

    peer.join().expect("peer thread");
}

#[test]
fn wait_for_auto_replies_pong_to_a_ping() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let peer = std::thread::spawn(move || {
        let (mut socket, _) = listener.accept().expect("accept");

        let ping = Envelope::new(
            PingMessage::COMMAND,
            PingMessage { nonce: [9; 8] }.serialize(),
            false,
        );
        socket.write_all(&ping.serialize()).expect("send ping");

        let reply = Envelope::read_from(&mut socket, false).expect("read pong");
        assert_eq!(reply.command, PongMessage::COMMAND);
        let pong = PongMessage::parse(&reply.payload).expect("parse pong");
        assert_eq!(pong.nonce, [9; 8]);

        let verack = Envelope::new(VerAckMessage::COMMAND, VerAckMessage.serialize(), false);
        socket.write_all(&verack.serialize()).expect("send verack");
    });

    let mut node = SimpleNode::connect(&addr.ip().to_string(), Some(addr.port()), false)
        .expect("connect");
    let envelope = node
        .wait_for(&[VerAckMessage::COMMAND])
        .expect("wait_for");
    assert_eq!(envelope.command, VerAckMessage::COMMAND);

    peer.join().expect("peer thread");
}
