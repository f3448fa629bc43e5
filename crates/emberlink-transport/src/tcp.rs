//! TCP transport implementation on top of `tokio::net::TcpStream`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::{Mutex, Notify};

use crate::{Connection, TransportError};

/// How many bytes one `recv` call pulls off the socket at most. Game
/// messages are tiny; the receive buffer upstairs reassembles anything
/// larger than a single read.
const RECV_CHUNK_SIZE: usize = 4096;

/// A TCP-based [`Connection`] to the game server.
///
/// The stream is split into owned halves so the read-loop task and the
/// writer task never contend on one lock: `recv` locks only the read
/// half, `send` only the write half.
pub struct TcpConnection {
    reader: Mutex<OwnedReadHalf>,
    writer: Mutex<OwnedWriteHalf>,
    closed: AtomicBool,
    close_signal: Notify,
}

impl TcpConnection {
    /// Connects to the server at `addr`, failing after `timeout`.
    pub async fn connect(
        addr: &str,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let stream =
            match tokio::time::timeout(timeout, TcpStream::connect(addr))
                .await
            {
                Ok(Ok(stream)) => stream,
                Ok(Err(e)) => return Err(TransportError::ConnectFailed(e)),
                Err(_) => {
                    return Err(TransportError::ConnectTimedOut(timeout));
                }
            };

        // Latency matters more than throughput for a chatty game
        // protocol, so send each message immediately.
        if let Err(e) = stream.set_nodelay(true) {
            tracing::debug!(error = %e, "set_nodelay failed, continuing");
        }

        tracing::info!(addr, "connected to server");

        let (reader, writer) = stream.into_split();
        Ok(Self {
            reader: Mutex::new(reader),
            writer: Mutex::new(writer),
            closed: AtomicBool::new(false),
            close_signal: Notify::new(),
        })
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl Connection for TcpConnection {
    async fn send(&self, data: &[u8]) -> Result<(), TransportError> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }
        let mut writer = self.writer.lock().await;
        writer
            .write_all(data)
            .await
            .map_err(TransportError::SendFailed)?;
        writer.flush().await.map_err(TransportError::SendFailed)
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, TransportError> {
        // Register for the close signal before checking the flag:
        // `notify_waiters` only wakes already-registered waiters, so
        // a close() landing between an unregistered check and the
        // select would otherwise strand this recv forever.
        let closed = self.close_signal.notified();
        tokio::pin!(closed);
        closed.as_mut().enable();
        if self.is_closed() {
            return Ok(None);
        }

        let mut chunk = vec![0u8; RECV_CHUNK_SIZE];

        // Race the blocking read against close(): closing the
        // connection must unblock a pending recv.
        let read = async {
            let mut reader = self.reader.lock().await;
            reader.read(&mut chunk).await
        };
        tokio::select! {
            result = read => match result {
                Ok(0) => Ok(None),
                Ok(n) => {
                    chunk.truncate(n);
                    Ok(Some(chunk))
                }
                Err(e) => Err(TransportError::ReceiveFailed(e)),
            },
            _ = &mut closed => Ok(None),
        }
    }

    async fn close(&self) -> Result<(), TransportError> {
        // Idempotent: only the first close shuts the socket down.
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.close_signal.notify_waiters();

        let mut writer = self.writer.lock().await;
        if let Err(e) = writer.shutdown().await {
            // The peer may already be gone; that still counts as closed.
            tracing::debug!(error = %e, "socket shutdown failed");
        }
        tracing::info!("connection closed");
        Ok(())
    }
}
