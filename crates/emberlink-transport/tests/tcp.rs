//! Integration tests for the TCP transport.
//!
//! These spin up a real loopback listener and verify that bytes flow
//! both ways, that a clean peer close surfaces as `Ok(None)`, and that
//! `close()` unblocks a pending `recv`.

use std::time::Duration;

use emberlink_transport::{Connection, TcpConnection};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Helper: binds a loopback listener on an OS-assigned port and returns
/// it together with its address string.
async fn loopback_listener() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("should bind");
    let addr = listener.local_addr().expect("should have addr").to_string();
    (listener, addr)
}

#[tokio::test]
async fn test_send_and_recv_round_trip() {
    let (listener, addr) = loopback_listener().await;

    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        let mut buf = [0u8; 16];
        let n = stream.read(&mut buf).await.expect("server read");
        assert_eq!(&buf[..n], b"ping");
        stream.write_all(b"pong").await.expect("server write");
    });

    let conn = TcpConnection::connect(&addr, CONNECT_TIMEOUT)
        .await
        .expect("should connect");

    conn.send(b"ping").await.expect("send should succeed");

    let chunk = conn
        .recv()
        .await
        .expect("recv should succeed")
        .expect("server should have sent data");
    assert_eq!(chunk, b"pong");

    server.await.expect("server task");
}

#[tokio::test]
async fn test_peer_close_yields_none() {
    let (listener, addr) = loopback_listener().await;

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        drop(stream); // immediate close
    });

    let conn = TcpConnection::connect(&addr, CONNECT_TIMEOUT)
        .await
        .expect("should connect");

    assert!(conn.recv().await.expect("recv should succeed").is_none());
}

#[tokio::test]
async fn test_close_unblocks_pending_recv() {
    let (listener, addr) = loopback_listener().await;

    tokio::spawn(async move {
        // Accept and then sit silent so the client's recv blocks.
        let (_stream, _) = listener.accept().await.expect("accept");
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let conn = std::sync::Arc::new(
        TcpConnection::connect(&addr, CONNECT_TIMEOUT)
            .await
            .expect("should connect"),
    );

    let receiver = {
        let conn = std::sync::Arc::clone(&conn);
        tokio::spawn(async move { conn.recv().await })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    conn.close().await.expect("close should succeed");

    let result = tokio::time::timeout(Duration::from_secs(1), receiver)
        .await
        .expect("recv should unblock promptly")
        .expect("task should not panic");
    assert!(result.expect("recv after close is not an error").is_none());
}

#[tokio::test]
async fn test_close_racing_recv_never_strands_the_receiver() {
    // Repeat with no settling sleep so close() lands at arbitrary
    // points relative to recv()'s registration for the close signal.
    for _ in 0..20 {
        let (listener, addr) = loopback_listener().await;

        tokio::spawn(async move {
            let (_stream, _) = listener.accept().await.expect("accept");
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let conn = std::sync::Arc::new(
            TcpConnection::connect(&addr, CONNECT_TIMEOUT)
                .await
                .expect("should connect"),
        );

        let receiver = {
            let conn = std::sync::Arc::clone(&conn);
            tokio::spawn(async move { conn.recv().await })
        };

        conn.close().await.expect("close should succeed");

        let result = tokio::time::timeout(Duration::from_secs(1), receiver)
            .await
            .expect("recv should never be stranded by a racing close")
            .expect("task should not panic");
        assert!(result.expect("recv after close is not an error").is_none());
    }
}

#[tokio::test]
async fn test_close_is_idempotent_and_send_after_close_fails() {
    let (listener, addr) = loopback_listener().await;
    tokio::spawn(async move {
        let (_stream, _) = listener.accept().await.expect("accept");
        tokio::time::sleep(Duration::from_secs(1)).await;
    });

    let conn = TcpConnection::connect(&addr, CONNECT_TIMEOUT)
        .await
        .expect("should connect");

    conn.close().await.expect("first close");
    conn.close().await.expect("second close is a no-op");

    assert!(conn.send(b"late").await.is_err());
}

#[tokio::test]
async fn test_connect_timeout_is_reported() {
    // RFC 5737 TEST-NET address: packets go nowhere, so the connect
    // attempt hangs until the timeout fires.
    let result = TcpConnection::connect(
        "192.0.2.1:7666",
        Duration::from_millis(100),
    )
    .await;

    match result {
        Err(e) => {
            // Either a fast refusal or our timeout, depending on the
            // host network; both are connect-phase failures.
            let text = e.to_string();
            assert!(
                text.contains("connect"),
                "unexpected error text: {text}"
            );
        }
        Ok(_) => panic!("connect to TEST-NET should not succeed"),
    }
}
