//! Transport abstraction layer for Emberlink.
//!
//! Provides the [`Connection`] trait that abstracts over the persistent
//! stream the client holds to the game server, plus the real TCP
//! implementation ([`TcpConnection`]). The protocol layer above sees
//! only "chunks of bytes in, chunks of bytes out" — framing, opcodes,
//! and field decoding all live upstairs. Keeping the seam here lets the
//! client core be driven by an in-memory fake in tests.

#![allow(async_fn_in_trait)]

mod error;
mod tcp;

pub use error::TransportError;
pub use tcp::TcpConnection;

/// A single bidirectional byte-stream connection to the server.
///
/// `Send + Sync + 'static` because the client core shares one
/// connection between its read-loop task and its writer task.
pub trait Connection: Send + Sync + 'static {
    /// Sends an entire buffer to the server.
    ///
    /// One call writes one complete protocol message; the transport
    /// must not interleave bytes from concurrent `send` calls.
    async fn send(&self, data: &[u8]) -> Result<(), TransportError>;

    /// Receives the next chunk of bytes from the server.
    ///
    /// A chunk is whatever the socket had ready — it can hold a partial
    /// message, exactly one, or several; delimiting messages is the
    /// caller's job. Returns `Ok(None)` when the peer closed the
    /// stream cleanly.
    async fn recv(&self) -> Result<Option<Vec<u8>>, TransportError>;

    /// Closes the connection. Must be idempotent, and must cause a
    /// blocked [`recv`](Self::recv) on the same connection to return.
    async fn close(&self) -> Result<(), TransportError>;
}
