//! Wire protocol for Emberlink.
//!
//! This crate defines the byte-level "language" the client speaks with
//! the game server:
//!
//! - **Buffer** ([`PacketBuffer`]) — the growable, cursor-based byte
//!   sequence used to stage inbound and outbound data, with typed
//!   sequential reads and writes and the copy-then-commit operations
//!   handlers rely on.
//! - **Opcodes** ([`ServerPacket`], [`ClientPacket`]) — the one-byte
//!   discriminators that open every message.
//! - **Outbound builders** ([`OutboundMessage`]) — client-to-server
//!   messages serialized opcode-first into fresh buffers.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while decoding,
//!   split into transient ("not enough bytes yet") and fatal
//!   ("stream desynchronized").
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw socket chunks) and
//! dispatch (per-opcode handlers). It knows nothing about sockets or
//! game state — only how typed fields map to bytes.
//!
//! ```text
//! Transport (chunks) → Protocol (PacketBuffer) → Dispatch (handlers)
//! ```

mod buffer;
mod error;
mod opcode;
mod outbound;

pub use buffer::PacketBuffer;
pub use error::ProtocolError;
pub use opcode::{ClientPacket, ServerPacket};
pub use outbound::{Heading, OutboundMessage};
