//! The opcode → handler registry and the dispatch operation.
//!
//! The registry is built once at client construction and never mutated
//! afterwards: every opcode the server may legally send has exactly one
//! handler, and an unregistered opcode is a protocol error, not a
//! silent skip — with no generic length field there is no safe way to
//! step over an unrecognized, variable-length message.

use std::collections::HashMap;

use emberlink_protocol::{PacketBuffer, ProtocolError, ServerPacket};

use crate::handler::PacketHandler;

/// Errors that can occur while routing a message to its handler.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The handler failed to decode its payload. Transient if the
    /// inner error is `InsufficientData`, fatal otherwise.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// No handler is registered for this opcode. Fatal: the stream
    /// position after an unknown message is unknowable.
    #[error("unknown opcode 0x{0:02X}: no handler registered")]
    UnknownOpcode(u8),
}

impl DispatchError {
    /// `true` when the correct response is "wait for more bytes and
    /// retry the identical dispatch", `false` when the connection must
    /// come down.
    pub fn is_transient(&self) -> bool {
        matches!(self, DispatchError::Protocol(p) if p.is_transient())
    }
}

/// Immutable mapping from opcode byte to its [`PacketHandler`].
///
/// Built through [`RegistryBuilder`]; once built there is no way to
/// add, remove, or replace a handler for the life of the process.
pub struct PacketRegistry {
    handlers: HashMap<u8, Box<dyn PacketHandler>>,
}

impl PacketRegistry {
    /// Starts building a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder {
            handlers: HashMap::new(),
        }
    }

    /// Routes one message to its handler and invokes it.
    ///
    /// Processes at most one opcode per call — draining every complete
    /// message currently buffered is the connection manager's loop, not
    /// the dispatcher's. On a transient error the shared buffer is
    /// guaranteed byte-identical to before the call (the handler
    /// contract), so the caller can retry once more bytes arrive.
    pub fn dispatch(
        &self,
        opcode: u8,
        buffer: &mut PacketBuffer,
    ) -> Result<(), DispatchError> {
        let handler = self
            .handlers
            .get(&opcode)
            .ok_or(DispatchError::UnknownOpcode(opcode))?;
        handler.handle(buffer)
    }

    /// Whether a handler is registered for `opcode`.
    pub fn handles(&self, opcode: u8) -> bool {
        self.handlers.contains_key(&opcode)
    }
}

/// Builder for a [`PacketRegistry`].
pub struct RegistryBuilder {
    handlers: HashMap<u8, Box<dyn PacketHandler>>,
}

impl RegistryBuilder {
    /// Registers `handler` for `opcode`.
    ///
    /// # Panics
    ///
    /// Panics if the opcode already has a handler. Registration happens
    /// once at startup from static wiring code; a duplicate is a
    /// programming error best caught immediately.
    pub fn register(
        mut self,
        opcode: ServerPacket,
        handler: impl PacketHandler + 'static,
    ) -> Self {
        let previous = self
            .handlers
            .insert(opcode.as_byte(), Box::new(handler));
        assert!(
            previous.is_none(),
            "duplicate handler registered for {opcode}"
        );
        self
    }

    /// Finishes the build.
    pub fn build(self) -> PacketRegistry {
        PacketRegistry {
            handlers: self.handlers,
        }
    }
}
