//! Client-to-server message builders.
//!
//! Each outbound message serializes into a fresh [`PacketBuffer`] —
//! opcode byte first, then its fields — and is handed to the writer
//! task as one atomic unit, so concurrent senders can never interleave
//! mid-message on the wire.

use crate::{ClientPacket, PacketBuffer};

/// A compass direction for [`OutboundMessage::Walk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Heading {
    North = 1,
    East = 2,
    South = 3,
    West = 4,
}

/// Everything the client can say to the server.
///
/// A deliberately small catalogue — enough to log in, move, talk, and
/// measure latency. Each variant's `encode` output starts with the
/// matching [`ClientPacket`] opcode.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundMessage {
    /// Log in with an existing character. The three trailing bytes are
    /// the client version the server checks against.
    LoginExisting {
        name: String,
        password: String,
        version_major: u8,
        version_minor: u8,
        version_patch: u8,
    },
    /// Open-world chat line.
    Talk(String),
    /// Move one tile.
    Walk(Heading),
    /// Latency probe.
    Ping,
    /// Orderly quit.
    Quit,
}

impl OutboundMessage {
    /// Serializes this message into a fresh buffer, opcode included.
    pub fn encode(&self) -> PacketBuffer {
        let mut buffer = PacketBuffer::new();
        match self {
            OutboundMessage::LoginExisting {
                name,
                password,
                version_major,
                version_minor,
                version_patch,
            } => {
                buffer.write_byte(ClientPacket::LoginExisting.as_byte());
                buffer.write_string(name);
                buffer.write_string(password);
                buffer.write_byte(*version_major);
                buffer.write_byte(*version_minor);
                buffer.write_byte(*version_patch);
            }
            OutboundMessage::Talk(text) => {
                buffer.write_byte(ClientPacket::Talk.as_byte());
                buffer.write_string(text);
            }
            OutboundMessage::Walk(heading) => {
                buffer.write_byte(ClientPacket::Walk.as_byte());
                buffer.write_byte(*heading as u8);
            }
            OutboundMessage::Ping => {
                buffer.write_byte(ClientPacket::Ping.as_byte());
            }
            OutboundMessage::Quit => {
                buffer.write_byte(ClientPacket::Quit.as_byte());
            }
        }
        buffer
    }
}
