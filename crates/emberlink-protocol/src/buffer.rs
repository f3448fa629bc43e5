//! The shared staging buffer for inbound and outbound packet bytes.
//!
//! A [`PacketBuffer`] is a growable byte sequence with a read cursor.
//! The connection manager appends raw socket chunks to the back; packet
//! handlers consume typed fields from the front. Because the transport
//! is a stream, a message can arrive split across any number of chunks,
//! so every read must be able to say "not yet" without damaging the
//! buffer.
//!
//! # The peek-and-rollback discipline
//!
//! Handlers never parse the live receive buffer directly. The pattern,
//! shared by every handler, is:
//!
//! ```text
//! if data.check_bytes(MIN) { return Err(InsufficientData) }  // cheap gate
//! let mut working = PacketBuffer::new();
//! working.copy_from(data);          // deep copy of the unread tail
//! ... destructive reads on `working` ...
//! data.copy_from(&working);         // commit: also trims consumed bytes
//! ```
//!
//! If a read on `working` fails part-way because the tail of the message
//! hasn't arrived, the handler simply returns the error — `data` was
//! never touched, so retrying later with more bytes appended reproduces
//! the exact same parse. Only a fully successful parse commits, and the
//! commit direction doubles as garbage collection: `copy_from` keeps
//! only the unread remainder, so consumed messages never pile up at the
//! front of the live buffer.

use crate::ProtocolError;

/// A growable byte buffer with cursor-based sequential typed access.
///
/// All multi-byte integers and floats use big-endian (network) byte
/// order. Strings are a `u16` big-endian length prefix followed by that
/// many bytes of UTF-8.
///
/// Reads are all-or-nothing per field: a failed read leaves the cursor
/// exactly where it was, including for multi-part fields such as
/// strings (the length prefix is not consumed unless the whole string
/// is available and valid).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PacketBuffer {
    data: Vec<u8>,
    cursor: usize,
}

impl PacketBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of unread bytes from the cursor to the end.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// Total bytes held, read and unread.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` if the buffer holds no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Non-consuming precondition used by every handler before any
    /// destructive read: returns `true` when fewer than `n` unread
    /// bytes remain, meaning "not enough data yet — bail out and retry
    /// once more bytes arrive". Never changes cursor or content.
    pub fn check_bytes(&self, n: usize) -> bool {
        self.remaining() < n
    }

    /// `Result`-shaped form of [`check_bytes`](Self::check_bytes) for
    /// use with `?`: fails with `InsufficientData` when fewer than `n`
    /// unread bytes remain, otherwise does nothing. Non-consuming.
    pub fn require(&self, n: usize) -> Result<(), ProtocolError> {
        if self.check_bytes(n) {
            return Err(ProtocolError::InsufficientData {
                needed: n,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    /// Non-consuming look at the next unread byte (the opcode peek the
    /// dispatch loop uses for framing). `None` when nothing is unread.
    pub fn peek_byte(&self) -> Option<u8> {
        self.data.get(self.cursor).copied()
    }

    /// Replaces this buffer's content and cursor with a deep copy of
    /// `other`'s *remaining unread* bytes, cursor reset to zero.
    ///
    /// Used in both directions of the peek-and-rollback discipline:
    /// taking a working copy before a speculative parse, and committing
    /// the working copy back after the parse succeeds. The commit
    /// direction permanently discards everything `other` already
    /// consumed, which keeps the live receive buffer bounded across
    /// messages.
    pub fn copy_from(&mut self, other: &PacketBuffer) {
        self.data.clear();
        self.data.extend_from_slice(&other.data[other.cursor..]);
        self.cursor = 0;
    }

    /// A view of the unread bytes. Mostly useful in tests and logging.
    pub fn unread(&self) -> &[u8] {
        &self.data[self.cursor..]
    }

    // -----------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------

    /// Borrows the next `n` unread bytes and advances the cursor, or
    /// fails with `InsufficientData` leaving the cursor untouched.
    fn take(&mut self, n: usize) -> Result<&[u8], ProtocolError> {
        if self.remaining() < n {
            return Err(ProtocolError::InsufficientData {
                needed: n,
                available: self.remaining(),
            });
        }
        let start = self.cursor;
        self.cursor += n;
        Ok(&self.data[start..start + n])
    }

    /// Reads one unsigned byte.
    pub fn read_byte(&mut self) -> Result<u8, ProtocolError> {
        Ok(self.take(1)?[0])
    }

    /// Reads a signed 16-bit big-endian integer.
    pub fn read_short(&mut self) -> Result<i16, ProtocolError> {
        let bytes = self.take(2)?;
        Ok(i16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Reads a signed 32-bit big-endian integer.
    pub fn read_int(&mut self) -> Result<i32, ProtocolError> {
        let bytes = self.take(4)?;
        Ok(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads a 32-bit IEEE-754 float (big-endian bit pattern).
    pub fn read_float(&mut self) -> Result<f32, ProtocolError> {
        let bytes = self.take(4)?;
        Ok(f32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads one byte as a boolean: zero is `false`, anything else is
    /// `true`.
    pub fn read_bool(&mut self) -> Result<bool, ProtocolError> {
        Ok(self.read_byte()? != 0)
    }

    /// Reads a length-prefixed UTF-8 string: a `u16` big-endian byte
    /// count, then that many bytes of payload.
    ///
    /// Atomic: if the prefix or any payload byte is missing, nothing is
    /// consumed and `InsufficientData` is returned (needed = prefix +
    /// declared length, so the caller can see the full requirement).
    /// Invalid UTF-8 yields `MalformedString` — also without consuming,
    /// though by then the connection is lost anyway.
    pub fn read_string(&mut self) -> Result<String, ProtocolError> {
        let available = self.remaining();
        if available < 2 {
            return Err(ProtocolError::InsufficientData {
                needed: 2,
                available,
            });
        }
        let len = u16::from_be_bytes([
            self.data[self.cursor],
            self.data[self.cursor + 1],
        ]) as usize;
        if available < 2 + len {
            return Err(ProtocolError::InsufficientData {
                needed: 2 + len,
                available,
            });
        }
        let start = self.cursor + 2;
        let text = std::str::from_utf8(&self.data[start..start + len])?;
        let owned = text.to_owned();
        self.cursor += 2 + len;
        Ok(owned)
    }

    // -----------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------
    //
    // Writes append at the end and never fail — the buffer grows as
    // needed. They are the mirror image of the reads above, used both
    // by outbound message builders and by the read loop appending raw
    // socket chunks.

    /// Appends one byte.
    pub fn write_byte(&mut self, value: u8) {
        self.data.push(value);
    }

    /// Appends a signed 16-bit big-endian integer.
    pub fn write_short(&mut self, value: i16) {
        self.data.extend_from_slice(&value.to_be_bytes());
    }

    /// Appends a signed 32-bit big-endian integer.
    pub fn write_int(&mut self, value: i32) {
        self.data.extend_from_slice(&value.to_be_bytes());
    }

    /// Appends a 32-bit float (big-endian bit pattern).
    pub fn write_float(&mut self, value: f32) {
        self.data.extend_from_slice(&value.to_be_bytes());
    }

    /// Appends a boolean as one byte (1 or 0).
    pub fn write_bool(&mut self, value: bool) {
        self.data.push(u8::from(value));
    }

    /// Appends a `u16`-length-prefixed UTF-8 string.
    ///
    /// Protocol strings are chat lines and names; a value longer than
    /// `u16::MAX` bytes cannot be represented on the wire and is
    /// truncated at a character boundary below that limit.
    pub fn write_string(&mut self, value: &str) {
        let mut bytes = value.as_bytes();
        if bytes.len() > u16::MAX as usize {
            let mut end = u16::MAX as usize;
            while !value.is_char_boundary(end) {
                end -= 1;
            }
            bytes = &value.as_bytes()[..end];
        }
        self.data.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
        self.data.extend_from_slice(bytes);
    }

    /// Appends a raw chunk as-is (socket bytes arriving off the wire).
    pub fn write_bytes(&mut self, chunk: &[u8]) {
        self.data.extend_from_slice(chunk);
    }

    /// The full byte content, ignoring the cursor. Outbound builders
    /// use this to hand a finished message to the writer task.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}
