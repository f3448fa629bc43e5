//! Opcode tables for both directions of the wire.
//!
//! Every message starts with a single opcode byte that determines the
//! shape of the rest of the payload. Server-to-client and
//! client-to-server opcodes are independent number spaces, so each gets
//! its own enum. The numeric values are part of the wire contract —
//! changing one is a protocol break, which is why they are written out
//! explicitly rather than left to the compiler.

use std::fmt;

/// Opcodes the server sends to the client.
///
/// One registry entry exists per value; dispatching a byte that maps to
/// no variant is a fatal protocol error, because a variable-length
/// message with an unknown shape cannot be skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ServerPacket {
    /// Login accepted; the character is now in the world.
    Logged = 0x00,
    /// Close any open dialog windows.
    RemoveAllDialogs = 0x01,
    /// Human-readable error; the server closes the session after it.
    ErrorMessage = 0x02,
    /// A line for the game console, with a font style byte.
    ConsoleMessage = 0x03,
    /// A line for the commerce window's chat area.
    CommerceChat = 0x04,
    /// Absolute strength attribute value.
    UpdateStrength = 0x05,
    /// Absolute dexterity attribute value.
    UpdateDexterity = 0x06,
    /// Absolute gold amount.
    UpdateGold = 0x07,
    /// Absolute experience amount.
    UpdateExp = 0x08,
    /// Current hit points.
    UpdateHp = 0x09,
    /// Current mana points.
    UpdateMana = 0x0A,
    /// Current stamina points.
    UpdateSta = 0x0B,
    /// Toggle the sailing/navigation flag.
    NavigateToggle = 0x0C,
    /// The blindness effect wore off.
    BlindNoMore = 0x0D,
    /// A forum post: forum type byte, then title, author, body strings.
    AddForumMessage = 0x0E,
    /// Open the game-master panel.
    ShowGmPanel = 0x0F,
    /// Server-initiated orderly close.
    Disconnect = 0x10,
    /// Reply to a client [`ClientPacket::Ping`].
    Pong = 0x11,
}

impl ServerPacket {
    /// Maps a raw opcode byte back to its variant, or `None` for bytes
    /// the protocol does not define.
    pub fn from_byte(value: u8) -> Option<Self> {
        use ServerPacket::*;
        Some(match value {
            0x00 => Logged,
            0x01 => RemoveAllDialogs,
            0x02 => ErrorMessage,
            0x03 => ConsoleMessage,
            0x04 => CommerceChat,
            0x05 => UpdateStrength,
            0x06 => UpdateDexterity,
            0x07 => UpdateGold,
            0x08 => UpdateExp,
            0x09 => UpdateHp,
            0x0A => UpdateMana,
            0x0B => UpdateSta,
            0x0C => NavigateToggle,
            0x0D => BlindNoMore,
            0x0E => AddForumMessage,
            0x0F => ShowGmPanel,
            0x10 => Disconnect,
            0x11 => Pong,
            _ => return None,
        })
    }

    /// The raw wire value.
    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for ServerPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}(0x{:02X})", self, self.as_byte())
    }
}

/// Opcodes the client sends to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ClientPacket {
    /// Log in with an existing character.
    LoginExisting = 0x00,
    /// Say something in the open world.
    Talk = 0x01,
    /// Move one tile in a direction.
    Walk = 0x02,
    /// Latency probe; the server answers with Pong.
    Ping = 0x03,
    /// Orderly quit.
    Quit = 0x04,
}

impl ClientPacket {
    /// The raw wire value.
    pub fn as_byte(self) -> u8 {
        self as u8
    }
}
