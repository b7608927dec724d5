//! Integration tests for two peers talking over a real TCP connection.
//!
//! Each test binds a host on a random local port, runs the client peer on
//! a second thread, and checks what each side sees.
//!
//! Run with `RUST_LOG=subs=debug` to see every packet both peers exchange.

#![cfg(feature = "tcp")]

use std::thread;

use subs::prelude::*;
use tracing_subscriber::EnvFilter;

/// Routes `tracing` output through the test harness. Safe to call from
/// every test; only the first call installs the subscriber.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn text_stream(transport: TcpTransport, config: &StreamConfig) -> Stream<TcpTransport> {
    Stream::with_config(transport, TextPacker, config.validator(), config)
}

/// Binds a host, runs `client` against it on another thread, and returns
/// the host-side stream plus the client's join handle.
fn start<F, R>(client: F) -> (Stream<TcpTransport>, thread::JoinHandle<R>)
where
    F: FnOnce(Stream<TcpTransport>) -> R + Send + 'static,
    R: Send + 'static,
{
    init_logging();
    let host = TcpHost::bind("127.0.0.1:0").expect("should bind");
    let addr = host.local_addr().expect("should have local addr");

    let handle = thread::spawn(move || {
        let stream = Stream::connect(addr, &StreamConfig::default())
            .expect("client should connect");
        client(stream)
    });

    let transport = host.accept().expect("should accept");
    (text_stream(transport, &StreamConfig::default()), handle)
}

#[test]
fn test_ready_handshake_and_one_turn() {
    // Strict alternation: neither side writes twice in a row, so every
    // read holds exactly one packet.
    let (mut host, client) = start(|mut stream| {
        stream.send(&Packet::ready(PROTOCOL_VERSION)).unwrap();
        let ready = stream.receive_expecting(PacketType::Ready).unwrap();
        assert_eq!(ready, Packet::ready(PROTOCOL_VERSION));

        stream.send(&Packet::attempt(PROTOCOL_VERSION, 3, 4)).unwrap();
        stream.receive_expecting(PacketType::Answer).unwrap()
    });

    let ready = host.receive_expecting(PacketType::Ready).unwrap();
    assert_eq!(ready.version(), PROTOCOL_VERSION);
    host.send(&Packet::ready(PROTOCOL_VERSION)).unwrap();

    let attempt = host.receive_expecting(PacketType::Attempt).unwrap();
    let (x, y) = attempt.coordinates().unwrap();
    host.send(&Packet::answer(PROTOCOL_VERSION, Status::Incorrect, x, y))
        .unwrap();

    let answer = client.join().expect("client thread should finish");
    assert_eq!(
        answer,
        Packet::answer(PROTOCOL_VERSION, Status::Incorrect, 3, 4)
    );
}

#[test]
fn test_peer_with_other_version_is_rejected() {
    let (mut host, client) = start(|stream| {
        // Bypass our own validator by writing raw bytes for version 0.9.
        let (mut transport, _, _) = stream.into_inner();
        transport
            .send(b"VERSION: 0.9\nTYPE: ATTEMPT\nX-COOR: 3\nY-COOR: 4")
            .unwrap();
        transport
    });

    let err = host.receive().unwrap_err();
    assert!(matches!(
        err,
        SubsError::Protocol(ProtocolError::InvalidPacket(_))
    ));

    // Keep the client's socket open until we've read.
    drop(client.join().unwrap());
}

#[test]
fn test_malformed_packet_then_recovery() {
    let (mut host, client) = start(|mut stream| {
        stream.transport_mut().send(b"X-COOR: abc").unwrap();
        // Wait for the host's complaint before sending the real packet,
        // so the two writes can't be coalesced into one read.
        let complaint = stream.receive().unwrap();
        assert_eq!(complaint.status(), Some(Status::Unexpected));
        stream.send(&Packet::ready(PROTOCOL_VERSION)).unwrap();
    });

    let err = host.receive().unwrap_err();
    assert!(err.is_packet_error());
    host.send(&Packet::error(PROTOCOL_VERSION, Status::Unexpected))
        .unwrap();

    let ready = host.receive().unwrap();
    assert_eq!(ready.packet_type(), PacketType::Ready);

    client.join().unwrap();
}

#[test]
fn test_closed_peer_is_a_transport_error() {
    let (mut host, client) = start(|stream| {
        stream.transport().shutdown().unwrap();
    });
    client.join().unwrap();

    let err = host.receive().unwrap_err();
    assert!(err.is_transport_error());
    assert!(matches!(
        err,
        SubsError::Transport(TransportError::ConnectionClosed)
    ));
}

#[test]
fn test_close_notice_is_terminating() {
    let (mut host, client) = start(|mut stream| {
        stream
            .send(&Packet::error(PROTOCOL_VERSION, Status::Closed))
            .unwrap();
    });

    let packet = host.receive_expecting(PacketType::Attempt).unwrap();
    assert!(packet.is_terminating());
    client.join().unwrap();
}
