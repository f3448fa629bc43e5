//! End-to-end tests for `GameClient` against a scripted loopback server.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{Event, RecordingSink};
use emberlink::{
    ClientConfig, ConnectionState, GameClient, OutboundMessage,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

async fn loopback_listener() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("should bind");
    let addr = listener.local_addr().expect("addr").to_string();
    (listener, addr)
}

fn client_with_sink() -> (GameClient, Arc<RecordingSink>) {
    common::init_tracing();
    let sink = Arc::new(RecordingSink::new());
    let client = GameClient::new(
        ClientConfig {
            connect_timeout: Duration::from_secs(2),
        },
        Arc::clone(&sink) as Arc<dyn emberlink::GameStateSink>,
    );
    (client, sink)
}

/// Waits (bounded) until the client reports Disconnected.
async fn wait_for_disconnect(client: &GameClient) {
    let mut state = client.state();
    tokio::time::timeout(Duration::from_secs(3), async {
        state
            .wait_for(|s| *s == ConnectionState::Disconnected)
            .await
            .expect("state channel open");
    })
    .await
    .expect("client should reach Disconnected");
}

#[tokio::test]
async fn test_error_message_notifies_and_disconnects() {
    let (listener, addr) = loopback_listener().await;

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        // ErrorMessage opcode, length-prefixed "oops!".
        stream
            .write_all(&[0x02, 0x00, 0x05, b'o', b'o', b'p', b's', b'!'])
            .await
            .expect("server write");
        // Hold the socket open; the *client* must initiate the close.
        tokio::time::sleep(Duration::from_secs(3)).await;
    });

    let (client, sink) = client_with_sink();
    client.connect(&addr).await.expect("connect");
    wait_for_disconnect(&client).await;

    let events = sink.events();
    assert_eq!(
        events,
        vec![Event::Notify("oops!".into()), Event::ConnectionLost]
    );
}

#[tokio::test]
async fn test_byte_at_a_time_delivery_decodes_identically() {
    let (listener, addr) = loopback_listener().await;

    let stream_bytes: Vec<u8> = {
        let mut buf = emberlink::PacketBuffer::new();
        buf.write_byte(0x00); // Logged
        buf.write_byte(0x05); // UpdateStrength
        buf.write_byte(18);
        buf.write_byte(0x03); // ConsoleMessage
        buf.write_string("fair winds");
        buf.write_byte(1);
        buf.write_byte(0x10); // Disconnect
        buf.as_bytes().to_vec()
    };

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        for byte in stream_bytes {
            stream.write_all(&[byte]).await.expect("server write");
            stream.flush().await.expect("flush");
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        tokio::time::sleep(Duration::from_secs(2)).await;
    });

    let (client, sink) = client_with_sink();
    client.connect(&addr).await.expect("connect");
    wait_for_disconnect(&client).await;

    assert_eq!(
        sink.events(),
        vec![
            Event::SetConnected(true),
            Event::SetStrength(18),
            Event::Console("fair winds".into(), 1),
            Event::ConnectionLost,
        ]
    );
}

#[tokio::test]
async fn test_unknown_opcode_tears_the_connection_down() {
    let (listener, addr) = loopback_listener().await;

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        stream.write_all(&[0xFF]).await.expect("server write");
        tokio::time::sleep(Duration::from_secs(2)).await;
    });

    let (client, sink) = client_with_sink();
    client.connect(&addr).await.expect("connect");
    wait_for_disconnect(&client).await;

    let events = sink.events();
    assert_eq!(events.len(), 2);
    match &events[0] {
        Event::Notify(text) => {
            assert!(text.contains("unknown opcode 0xFF"), "got: {text}");
        }
        other => panic!("expected a notify first, got {other:?}"),
    }
    assert_eq!(events[1], Event::ConnectionLost);
}

#[tokio::test]
async fn test_invalid_utf8_tears_the_connection_down() {
    let (listener, addr) = loopback_listener().await;

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        // ErrorMessage carrying two bytes of invalid UTF-8.
        stream
            .write_all(&[0x02, 0x00, 0x02, 0xFF, 0xFE])
            .await
            .expect("server write");
        // Hold the socket open; the client must tear down on its own.
        tokio::time::sleep(Duration::from_secs(3)).await;
    });

    let (client, sink) = client_with_sink();
    client.connect(&addr).await.expect("connect");
    wait_for_disconnect(&client).await;

    let events = sink.events();
    assert_eq!(events.len(), 2);
    match &events[0] {
        Event::Notify(text) => {
            assert!(
                text.contains("malformed string"),
                "got: {text}"
            );
        }
        other => panic!("expected a notify first, got {other:?}"),
    }
    assert_eq!(events[1], Event::ConnectionLost);
}

#[tokio::test]
async fn test_outbound_messages_reach_the_server_intact() {
    let (listener, addr) = loopback_listener().await;

    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        let mut seen = Vec::new();
        let mut buf = [0u8; 64];
        // Ping (1) + Talk (7) + Walk (2) = 10 bytes total.
        while seen.len() < 10 {
            let n = stream.read(&mut buf).await.expect("server read");
            if n == 0 {
                break;
            }
            seen.extend_from_slice(&buf[..n]);
        }
        seen
    });

    let (client, _sink) = client_with_sink();
    client.connect(&addr).await.expect("connect");

    client
        .send(&OutboundMessage::Ping)
        .await
        .expect("send ping");
    client
        .send(&OutboundMessage::Talk("ahoy".into()))
        .await
        .expect("send talk");
    client
        .send(&OutboundMessage::Walk(emberlink::Heading::North))
        .await
        .expect("send walk");

    let seen = server.await.expect("server task");
    assert_eq!(
        seen,
        vec![
            0x03, // Ping
            0x01, 0x00, 0x04, b'a', b'h', b'o', b'y', // Talk
            0x02, 1, // Walk north
        ]
    );

    client.disconnect();
    wait_for_disconnect(&client).await;
}

#[tokio::test]
async fn test_queued_quit_reaches_the_wire_before_disconnect() {
    let (listener, addr) = loopback_listener().await;

    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        let mut seen = Vec::new();
        let mut buf = [0u8; 16];
        // Read until the client shuts the socket down.
        loop {
            let n = stream.read(&mut buf).await.expect("server read");
            if n == 0 {
                break;
            }
            seen.extend_from_slice(&buf[..n]);
        }
        seen
    });

    let (client, _sink) = client_with_sink();
    client.connect(&addr).await.expect("connect");

    // A disconnect on the heels of a send must not drop the queued
    // message; an orderly Quit still reaches the server.
    client.send(&OutboundMessage::Quit).await.expect("send quit");
    client.disconnect();
    wait_for_disconnect(&client).await;

    let seen = server.await.expect("server task");
    assert_eq!(seen, vec![0x04]);
}

#[tokio::test]
async fn test_disconnect_is_idempotent_and_notifies_sink_once() {
    let (listener, addr) = loopback_listener().await;

    tokio::spawn(async move {
        let (_stream, _) = listener.accept().await.expect("accept");
        tokio::time::sleep(Duration::from_secs(3)).await;
    });

    let (client, sink) = client_with_sink();
    client.connect(&addr).await.expect("connect");
    assert_eq!(client.current_state(), ConnectionState::Connected);

    client.disconnect();
    client.disconnect();
    wait_for_disconnect(&client).await;
    client.disconnect(); // already down: a no-op

    // A deliberate local disconnect is quiet: no error notification,
    // exactly one connection_lost.
    assert_eq!(sink.events(), vec![Event::ConnectionLost]);
}

#[tokio::test]
async fn test_server_close_surfaces_one_notification() {
    let (listener, addr) = loopback_listener().await;

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        drop(stream);
    });

    let (client, sink) = client_with_sink();
    client.connect(&addr).await.expect("connect");
    wait_for_disconnect(&client).await;

    assert_eq!(
        sink.events(),
        vec![
            Event::Notify("Connection closed by server".into()),
            Event::ConnectionLost
        ]
    );
}

#[tokio::test]
async fn test_send_without_connection_fails() {
    let (client, _sink) = client_with_sink();
    let result = client.send(&OutboundMessage::Ping).await;
    assert!(matches!(
        result,
        Err(emberlink::EmberlinkError::NotConnected)
    ));
}

#[tokio::test]
async fn test_connect_while_connected_is_rejected() {
    let (listener, addr) = loopback_listener().await;
    tokio::spawn(async move {
        let (_stream, _) = listener.accept().await.expect("accept");
        tokio::time::sleep(Duration::from_secs(2)).await;
    });

    let (client, _sink) = client_with_sink();
    client.connect(&addr).await.expect("first connect");

    let second = client.connect(&addr).await;
    assert!(matches!(
        second,
        Err(emberlink::EmberlinkError::AlreadyConnected)
    ));

    client.disconnect();
    wait_for_disconnect(&client).await;
}
