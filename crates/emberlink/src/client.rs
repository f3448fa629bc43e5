//! `GameClient`: the connection manager.
//!
//! Owns the socket, the persistent receive buffer, and the connection
//! state machine. One tokio task runs the read loop and performs all
//! dispatch — exactly one handler executes at a time, always on that
//! task, so handlers need no locking among themselves. A second task
//! drains the outbound queue, so sends from the UI side can never
//! interleave with each other mid-message on the wire.

use std::sync::Arc;
use std::time::Duration;

use emberlink_protocol::{OutboundMessage, PacketBuffer};
use emberlink_transport::{Connection, TcpConnection};
use tokio::sync::{Mutex, mpsc, watch};

use crate::control::ConnectionControl;
use crate::dispatch::PacketRegistry;
use crate::error::EmberlinkError;
use crate::handlers;
use crate::sink::GameStateSink;

/// Configuration for client behavior.
///
/// Sensible defaults are provided; embedders override just the fields
/// they care about.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// How long a connect attempt may take before it is abandoned.
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
        }
    }
}

/// The connection lifecycle.
///
/// ```text
/// Disconnected ──(connect)──→ Connecting ──(socket ready)──→ Connected
///       ↑                          │                             │
///       └──────(connect failed)────┴──(disconnect / fatal error)─┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No connection; the initial and final state.
    #[default]
    Disconnected,
    /// A connect attempt is in flight.
    Connecting,
    /// The socket is up and the read loop is running.
    Connected,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
        };
        f.write_str(name)
    }
}

/// The client-side connection manager.
///
/// Construction wires the dependency graph explicitly: the sink and the
/// [`ConnectionControl`] are injected into every handler when the
/// registry is built, so tests can substitute fakes at any seam and no
/// component ever reaches for a process-wide singleton.
pub struct GameClient {
    config: ClientConfig,
    sink: Arc<dyn GameStateSink>,
    registry: Arc<PacketRegistry>,
    control: ConnectionControl,
    state_tx: watch::Sender<ConnectionState>,
    outbound: Mutex<Option<mpsc::UnboundedSender<Vec<u8>>>>,
}

impl GameClient {
    /// Creates a client with the standard handler registry.
    pub fn new(config: ClientConfig, sink: Arc<dyn GameStateSink>) -> Self {
        let control = ConnectionControl::new();
        let registry = Arc::new(handlers::default_registry(
            Arc::clone(&sink),
            control.clone(),
        ));
        Self::with_registry(config, sink, registry, control)
    }

    /// Creates a client around a custom registry.
    ///
    /// `control` must be the same handle the registry's handlers were
    /// built with — a handler-initiated disconnect works by signaling
    /// the handle the read loop watches.
    pub fn with_registry(
        config: ClientConfig,
        sink: Arc<dyn GameStateSink>,
        registry: Arc<PacketRegistry>,
        control: ConnectionControl,
    ) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            config,
            sink,
            registry,
            control,
            state_tx,
            outbound: Mutex::new(None),
        }
    }

    /// A receiver for observing connection-state transitions (the
    /// thread-safe publish point the UI side watches).
    pub fn state(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    /// The current connection state.
    pub fn current_state(&self) -> ConnectionState {
        *self.state_tx.borrow()
    }

    /// The disconnect handle shared with the handlers.
    pub fn control(&self) -> ConnectionControl {
        self.control.clone()
    }

    /// Connects to the server and starts the read loop.
    ///
    /// Returns once the socket is established and the background tasks
    /// are running; message processing continues until the server
    /// closes, a fatal protocol error occurs, or
    /// [`disconnect`](Self::disconnect) is called.
    pub async fn connect(&self, addr: &str) -> Result<(), EmberlinkError> {
        // Atomic Disconnected → Connecting gate; a second connect while
        // one is live is an embedder bug, reported not absorbed.
        let started = self.state_tx.send_if_modified(|state| {
            if *state == ConnectionState::Disconnected {
                *state = ConnectionState::Connecting;
                true
            } else {
                false
            }
        });
        if !started {
            return Err(EmberlinkError::AlreadyConnected);
        }

        self.control.reset();

        let conn = match TcpConnection::connect(
            addr,
            self.config.connect_timeout,
        )
        .await
        {
            Ok(conn) => Arc::new(conn),
            Err(e) => {
                self.state_tx.send_replace(ConnectionState::Disconnected);
                return Err(e.into());
            }
        };

        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        *self.outbound.lock().await = Some(outbound_tx);

        self.state_tx.send_replace(ConnectionState::Connected);

        let writer = tokio::spawn(writer_loop(
            Arc::clone(&conn),
            self.control.clone(),
            outbound_rx,
        ));
        tokio::spawn(read_loop(
            conn,
            Arc::clone(&self.registry),
            Arc::clone(&self.sink),
            self.control.clone(),
            self.state_tx.clone(),
            writer,
        ));

        Ok(())
    }

    /// Requests disconnection.
    ///
    /// Idempotent, cheap, and safe to call from anywhere — including
    /// from within a handler via its [`ConnectionControl`] clone. The
    /// actual teardown (socket close, state transition, sink
    /// notification) happens once, on the read-loop task.
    pub fn disconnect(&self) {
        if self.current_state() == ConnectionState::Disconnected {
            return;
        }
        self.control.request_disconnect();
    }

    /// Queues an outbound message.
    ///
    /// The message is serialized into a fresh buffer here and written
    /// to the wire as one unit by the writer task, so concurrent
    /// senders never interleave mid-message.
    pub async fn send(
        &self,
        message: &OutboundMessage,
    ) -> Result<(), EmberlinkError> {
        let guard = self.outbound.lock().await;
        let tx = guard.as_ref().ok_or(EmberlinkError::NotConnected)?;
        tx.send(message.encode().as_bytes().to_vec())
            .map_err(|_| EmberlinkError::NotConnected)
    }
}

/// Writes queued outbound messages to the socket, one at a time.
async fn writer_loop(
    conn: Arc<TcpConnection>,
    control: ConnectionControl,
    mut outbound_rx: mpsc::UnboundedReceiver<Vec<u8>>,
) {
    loop {
        tokio::select! {
            _ = control.closed() => {
                // Flush anything queued before the disconnect request —
                // an orderly Quit must still reach the wire.
                outbound_rx.close();
                while let Ok(bytes) = outbound_rx.try_recv() {
                    if let Err(e) = conn.send(&bytes).await {
                        tracing::debug!(error = %e, "flush on close failed");
                        break;
                    }
                }
                break;
            }
            message = outbound_rx.recv() => match message {
                Some(bytes) => {
                    if let Err(e) = conn.send(&bytes).await {
                        tracing::debug!(error = %e, "outbound send failed");
                        control.request_disconnect();
                        break;
                    }
                }
                None => break, // client dropped
            },
        }
    }
}

/// The read loop: accumulate socket chunks into the persistent receive
/// buffer, dispatch every complete message, stop on `InsufficientData`
/// until more bytes arrive, tear down on anything fatal.
async fn read_loop(
    conn: Arc<TcpConnection>,
    registry: Arc<PacketRegistry>,
    sink: Arc<dyn GameStateSink>,
    control: ConnectionControl,
    state_tx: watch::Sender<ConnectionState>,
    writer: tokio::task::JoinHandle<()>,
) {
    let mut receive = PacketBuffer::new();

    // `Some(reason)` carries the single human-readable disconnect
    // notification for abnormal endings; handler-requested closes have
    // already surfaced their own message.
    let failure: Option<String> = loop {
        tokio::select! {
            _ = control.closed() => break None,
            chunk = conn.recv() => match chunk {
                Ok(Some(bytes)) => {
                    receive.write_bytes(&bytes);
                    match drain_messages(&registry, &control, &mut receive) {
                        Ok(()) => {}
                        Err(e) => {
                            tracing::warn!(error = %e, "fatal protocol error");
                            break Some(format!("Connection lost: {e}"));
                        }
                    }
                }
                Ok(None) => break Some("Connection closed by server".into()),
                Err(e) => {
                    tracing::warn!(error = %e, "transport failure");
                    break Some(format!("Connection lost: {e}"));
                }
            },
        }
    };

    // Single teardown routine for every ending, fatal or orderly. The
    // writer gets to flush its queue before the socket is closed.
    control.request_disconnect();
    if writer.await.is_err() {
        tracing::debug!("writer task ended abnormally");
    }
    if let Err(e) = conn.close().await {
        tracing::debug!(error = %e, "close failed during teardown");
    }
    state_tx.send_replace(ConnectionState::Disconnected);
    if let Some(reason) = failure {
        sink.notify(&reason);
    }
    sink.connection_lost();
    tracing::info!("read loop exited");
}

/// Dispatches buffered messages in arrival order until the buffer runs
/// dry, the next message is incomplete, or a handler requested
/// disconnection (after which no further handler may run).
fn drain_messages(
    registry: &PacketRegistry,
    control: &ConnectionControl,
    receive: &mut PacketBuffer,
) -> Result<(), crate::dispatch::DispatchError> {
    while let Some(opcode) = receive.peek_byte() {
        if control.is_closing() {
            break;
        }
        match registry.dispatch(opcode, receive) {
            Ok(()) => {
                tracing::trace!(opcode, "message dispatched");
            }
            Err(e) if e.is_transient() => {
                // Expected under partial reads; wait for more bytes.
                tracing::trace!(opcode, "message incomplete, waiting");
                break;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_has_a_connect_timeout() {
        let config = ClientConfig::default();
        assert!(config.connect_timeout > Duration::ZERO);
    }

    #[test]
    fn test_state_display_names() {
        assert_eq!(ConnectionState::Disconnected.to_string(), "disconnected");
        assert_eq!(ConnectionState::Connecting.to_string(), "connecting");
        assert_eq!(ConnectionState::Connected.to_string(), "connected");
    }
}
