//! # Emberlink
//!
//! Client-side protocol core for a stateful, binary, message-oriented
//! game protocol over a persistent TCP connection.
//!
//! The crate is organized along the data path:
//!
//! ```text
//! socket bytes → GameClient read loop → PacketBuffer → PacketRegistry
//!              → PacketHandler → GameStateSink (your game state / UI)
//! ```
//!
//! An embedder implements [`GameStateSink`] over its game-state model,
//! constructs a [`GameClient`], and calls
//! [`connect`](GameClient::connect). Everything else — framing messages
//! out of the byte stream, routing opcodes to handlers, surviving
//! partial reads, and tearing the connection down on protocol errors —
//! happens inside the core.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use emberlink::{ClientConfig, GameClient, GameStateSink, OutboundMessage};
//!
//! struct MySink;
//! impl GameStateSink for MySink {
//!     fn notify(&self, message: &str) { eprintln!("server: {message}"); }
//!     fn connection_lost(&self) { eprintln!("offline"); }
//! }
//!
//! # async fn run() -> Result<(), emberlink::EmberlinkError> {
//! let client = GameClient::new(ClientConfig::default(), Arc::new(MySink));
//! client.connect("play.example.net:7666").await?;
//! client.send(&OutboundMessage::Ping).await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod control;
mod dispatch;
mod error;
mod handler;
pub mod handlers;
mod sink;

pub use client::{ClientConfig, ConnectionState, GameClient};
pub use control::ConnectionControl;
pub use dispatch::{DispatchError, PacketRegistry, RegistryBuilder};
pub use error::EmberlinkError;
pub use handler::PacketHandler;
pub use sink::{GameStateSink, Panel, font};

// Re-export the wire-level types embedders interact with directly.
pub use emberlink_protocol::{
    ClientPacket, Heading, OutboundMessage, PacketBuffer, ProtocolError,
    ServerPacket,
};
pub use emberlink_transport::TransportError;
