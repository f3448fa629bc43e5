//! The built-in handler catalogue: one handler per server opcode.
//!
//! Handlers are small and uniform on purpose — every one is the same
//! gate / copy / read / apply / commit shape described on
//! [`PacketHandler`](crate::PacketHandler), differing only in which
//! fields it reads and which sink setters it calls. They are grouped by
//! the part of the game they touch rather than one file per opcode.

mod chat;
mod session;
mod stats;
mod world;

pub use chat::{
    AddForumMessageHandler, CommerceChatHandler, ConsoleMessageHandler,
};
pub use session::{
    DisconnectHandler, ErrorMessageHandler, LoggedHandler, PongHandler,
    RemoveAllDialogsHandler,
};
pub use stats::{
    UpdateDexterityHandler, UpdateExpHandler, UpdateGoldHandler,
    UpdateHpHandler, UpdateManaHandler, UpdateStaHandler,
    UpdateStrengthHandler,
};
pub use world::{
    BlindNoMoreHandler, NavigateToggleHandler, ShowGmPanelHandler,
};

use std::sync::Arc;

use emberlink_protocol::ServerPacket;

use crate::control::ConnectionControl;
use crate::dispatch::PacketRegistry;
use crate::sink::GameStateSink;

/// Builds the standard registry covering every [`ServerPacket`] opcode,
/// with each handler wired to the given sink and control handle.
pub fn default_registry(
    sink: Arc<dyn GameStateSink>,
    control: ConnectionControl,
) -> PacketRegistry {
    PacketRegistry::builder()
        .register(ServerPacket::Logged, LoggedHandler::new(&sink))
        .register(
            ServerPacket::RemoveAllDialogs,
            RemoveAllDialogsHandler::new(&sink),
        )
        .register(
            ServerPacket::ErrorMessage,
            ErrorMessageHandler::new(&sink, control.clone()),
        )
        .register(
            ServerPacket::ConsoleMessage,
            ConsoleMessageHandler::new(&sink),
        )
        .register(
            ServerPacket::CommerceChat,
            CommerceChatHandler::new(&sink),
        )
        .register(
            ServerPacket::UpdateStrength,
            UpdateStrengthHandler::new(&sink),
        )
        .register(
            ServerPacket::UpdateDexterity,
            UpdateDexterityHandler::new(&sink),
        )
        .register(ServerPacket::UpdateGold, UpdateGoldHandler::new(&sink))
        .register(ServerPacket::UpdateExp, UpdateExpHandler::new(&sink))
        .register(ServerPacket::UpdateHp, UpdateHpHandler::new(&sink))
        .register(ServerPacket::UpdateMana, UpdateManaHandler::new(&sink))
        .register(ServerPacket::UpdateSta, UpdateStaHandler::new(&sink))
        .register(
            ServerPacket::NavigateToggle,
            NavigateToggleHandler::new(&sink),
        )
        .register(ServerPacket::BlindNoMore, BlindNoMoreHandler::new(&sink))
        .register(
            ServerPacket::AddForumMessage,
            AddForumMessageHandler::new(),
        )
        .register(ServerPacket::ShowGmPanel, ShowGmPanelHandler::new(&sink))
        .register(
            ServerPacket::Disconnect,
            DisconnectHandler::new(control.clone()),
        )
        .register(ServerPacket::Pong, PongHandler::new(&sink))
        .build()
}
