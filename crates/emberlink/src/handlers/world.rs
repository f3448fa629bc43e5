//! Handlers for world-effect messages: sailing, blindness, GM tools.

use std::sync::Arc;

use emberlink_protocol::PacketBuffer;

use crate::dispatch::DispatchError;
use crate::handler::PacketHandler;
use crate::sink::{GameStateSink, Panel};

/// `NavigateToggle` — flips the sailing state (board/leave a boat).
pub struct NavigateToggleHandler {
    sink: Arc<dyn GameStateSink>,
}

impl NavigateToggleHandler {
    pub fn new(sink: &Arc<dyn GameStateSink>) -> Self {
        Self {
            sink: Arc::clone(sink),
        }
    }
}

impl PacketHandler for NavigateToggleHandler {
    fn handle(&self, data: &mut PacketBuffer) -> Result<(), DispatchError> {
        data.require(1)?;

        let mut buffer = PacketBuffer::new();
        buffer.copy_from(data);
        buffer.read_byte()?; // opcode

        self.sink.toggle_sailing();

        data.copy_from(&buffer);
        Ok(())
    }
}

/// `BlindNoMore` — the blindness effect wore off.
pub struct BlindNoMoreHandler {
    sink: Arc<dyn GameStateSink>,
}

impl BlindNoMoreHandler {
    pub fn new(sink: &Arc<dyn GameStateSink>) -> Self {
        Self {
            sink: Arc::clone(sink),
        }
    }
}

impl PacketHandler for BlindNoMoreHandler {
    fn handle(&self, data: &mut PacketBuffer) -> Result<(), DispatchError> {
        data.require(1)?;

        let mut buffer = PacketBuffer::new();
        buffer.copy_from(data);
        buffer.read_byte()?; // opcode

        self.sink.set_blind(false);

        data.copy_from(&buffer);
        Ok(())
    }
}

/// `ShowGmPanel` — open the game-master tools panel.
pub struct ShowGmPanelHandler {
    sink: Arc<dyn GameStateSink>,
}

impl ShowGmPanelHandler {
    pub fn new(sink: &Arc<dyn GameStateSink>) -> Self {
        Self {
            sink: Arc::clone(sink),
        }
    }
}

impl PacketHandler for ShowGmPanelHandler {
    fn handle(&self, data: &mut PacketBuffer) -> Result<(), DispatchError> {
        data.require(1)?;

        let mut buffer = PacketBuffer::new();
        buffer.copy_from(data);
        buffer.read_byte()?; // opcode

        self.sink.show_panel(Panel::GameMaster);

        data.copy_from(&buffer);
        Ok(())
    }
}
