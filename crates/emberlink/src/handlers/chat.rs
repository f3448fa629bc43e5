//! Handlers for console, commerce, and forum text messages.

use std::sync::Arc;

use emberlink_protocol::PacketBuffer;

use crate::dispatch::DispatchError;
use crate::handler::PacketHandler;
use crate::sink::GameStateSink;

/// `ConsoleMessage` — a line for the game console with a font style.
pub struct ConsoleMessageHandler {
    sink: Arc<dyn GameStateSink>,
}

impl ConsoleMessageHandler {
    pub fn new(sink: &Arc<dyn GameStateSink>) -> Self {
        Self {
            sink: Arc::clone(sink),
        }
    }
}

impl PacketHandler for ConsoleMessageHandler {
    fn handle(&self, data: &mut PacketBuffer) -> Result<(), DispatchError> {
        // Opcode, string length prefix, font byte.
        data.require(4)?;

        let mut buffer = PacketBuffer::new();
        buffer.copy_from(data);
        buffer.read_byte()?; // opcode

        let text = buffer.read_string()?;
        let font = buffer.read_byte()?;
        self.sink.console_message(&text, font);

        data.copy_from(&buffer);
        Ok(())
    }
}

/// `CommerceChat` — a line for the commerce window's chat area.
///
/// Upstream, the line may carry `~`-separated RGB color markup that the
/// legacy client parsed into rich text. That parsing was never finished
/// in the source this protocol derives from, so the text is forwarded
/// to the console as-is and the markup, when present, is left for the
/// UI to ignore.
pub struct CommerceChatHandler {
    sink: Arc<dyn GameStateSink>,
}

impl CommerceChatHandler {
    pub fn new(sink: &Arc<dyn GameStateSink>) -> Self {
        Self {
            sink: Arc::clone(sink),
        }
    }
}

impl PacketHandler for CommerceChatHandler {
    fn handle(&self, data: &mut PacketBuffer) -> Result<(), DispatchError> {
        data.require(4)?;

        let mut buffer = PacketBuffer::new();
        buffer.copy_from(data);
        buffer.read_byte()?; // opcode

        let chat = buffer.read_string()?;
        let font = buffer.read_byte()?;

        if chat.contains('~') {
            tracing::debug!(line = %chat, "commerce chat color markup ignored");
        }
        self.sink.console_message(&chat, font);

        data.copy_from(&buffer);
        Ok(())
    }
}

/// `AddForumMessage` — a forum post: forum type, title, author, body.
///
/// The forum UI never made it into this client generation, so the
/// handler's only job is to consume the message correctly — a skipped
/// variable-length payload would desynchronize every message after it.
/// The decoded post is logged and dropped.
pub struct AddForumMessageHandler;

impl AddForumMessageHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AddForumMessageHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketHandler for AddForumMessageHandler {
    fn handle(&self, data: &mut PacketBuffer) -> Result<(), DispatchError> {
        // Opcode, forum type byte, three string length prefixes.
        data.require(8)?;

        let mut buffer = PacketBuffer::new();
        buffer.copy_from(data);
        buffer.read_byte()?; // opcode

        let forum_type = buffer.read_byte()?;
        let title = buffer.read_string()?;
        let author = buffer.read_string()?;
        let body = buffer.read_string()?;
        tracing::debug!(
            forum_type,
            %title,
            %author,
            body_len = body.len(),
            "forum post received and dropped (no forum UI)"
        );

        data.copy_from(&buffer);
        Ok(())
    }
}
