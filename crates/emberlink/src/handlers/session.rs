//! Handlers for login, logout, and other session-level messages.

use std::sync::Arc;

use emberlink_protocol::PacketBuffer;

use crate::control::ConnectionControl;
use crate::dispatch::DispatchError;
use crate::handler::PacketHandler;
use crate::sink::{GameStateSink, font};

/// `Logged` — login accepted, the character is in the world.
pub struct LoggedHandler {
    sink: Arc<dyn GameStateSink>,
}

impl LoggedHandler {
    pub fn new(sink: &Arc<dyn GameStateSink>) -> Self {
        Self {
            sink: Arc::clone(sink),
        }
    }
}

impl PacketHandler for LoggedHandler {
    fn handle(&self, data: &mut PacketBuffer) -> Result<(), DispatchError> {
        data.require(1)?;

        let mut buffer = PacketBuffer::new();
        buffer.copy_from(data);
        buffer.read_byte()?; // opcode

        self.sink.set_connected(true);

        data.copy_from(&buffer);
        Ok(())
    }
}

/// `ErrorMessage` — a human-readable server error. The server drops the
/// session after sending it, so the handler disconnects its own
/// connection once the message is surfaced.
pub struct ErrorMessageHandler {
    sink: Arc<dyn GameStateSink>,
    control: ConnectionControl,
}

impl ErrorMessageHandler {
    pub fn new(
        sink: &Arc<dyn GameStateSink>,
        control: ConnectionControl,
    ) -> Self {
        Self {
            sink: Arc::clone(sink),
            control,
        }
    }
}

impl PacketHandler for ErrorMessageHandler {
    fn handle(&self, data: &mut PacketBuffer) -> Result<(), DispatchError> {
        // Opcode plus at least the two-byte string length prefix.
        data.require(3)?;

        let mut buffer = PacketBuffer::new();
        buffer.copy_from(data);
        buffer.read_byte()?; // opcode

        let message = buffer.read_string()?;
        self.sink.notify(&message);
        self.control.request_disconnect();

        data.copy_from(&buffer);
        Ok(())
    }
}

/// `Disconnect` — server-initiated orderly close.
pub struct DisconnectHandler {
    control: ConnectionControl,
}

impl DisconnectHandler {
    pub fn new(control: ConnectionControl) -> Self {
        Self { control }
    }
}

impl PacketHandler for DisconnectHandler {
    fn handle(&self, data: &mut PacketBuffer) -> Result<(), DispatchError> {
        data.require(1)?;

        let mut buffer = PacketBuffer::new();
        buffer.copy_from(data);
        buffer.read_byte()?; // opcode

        tracing::info!("server requested disconnect");
        self.control.request_disconnect();

        data.copy_from(&buffer);
        Ok(())
    }
}

/// `Pong` — answer to our latency probe.
pub struct PongHandler {
    sink: Arc<dyn GameStateSink>,
}

impl PongHandler {
    pub fn new(sink: &Arc<dyn GameStateSink>) -> Self {
        Self {
            sink: Arc::clone(sink),
        }
    }
}

impl PacketHandler for PongHandler {
    fn handle(&self, data: &mut PacketBuffer) -> Result<(), DispatchError> {
        data.require(1)?;

        let mut buffer = PacketBuffer::new();
        buffer.copy_from(data);
        buffer.read_byte()?; // opcode

        self.sink.console_message("Pong!", font::INFO);

        data.copy_from(&buffer);
        Ok(())
    }
}

/// `RemoveAllDialogs` — close every open dialog window.
pub struct RemoveAllDialogsHandler {
    sink: Arc<dyn GameStateSink>,
}

impl RemoveAllDialogsHandler {
    pub fn new(sink: &Arc<dyn GameStateSink>) -> Self {
        Self {
            sink: Arc::clone(sink),
        }
    }
}

impl PacketHandler for RemoveAllDialogsHandler {
    fn handle(&self, data: &mut PacketBuffer) -> Result<(), DispatchError> {
        data.require(1)?;

        let mut buffer = PacketBuffer::new();
        buffer.copy_from(data);
        buffer.read_byte()?; // opcode

        self.sink.clear_dialogs();

        data.copy_from(&buffer);
        Ok(())
    }
}
