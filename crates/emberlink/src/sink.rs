//! The game-state sink: the one boundary where the network task's
//! mutations become visible to the rest of the program.
//!
//! Handlers run on the read-loop task; the UI/render side lives on its
//! own thread. Rather than letting handlers reach into a process-wide
//! singleton, every handler receives an `Arc<dyn GameStateSink>` at
//! construction. Implementations synchronize internally (a mutex, an
//! atomic swap, a message queue — their choice): this trait is the one
//! shared-mutable crossing in the core, so it is the one place that
//! needs it. Setter calls must be cheap and non-blocking; a slow sink
//! would stall the entire inbound message stream.

/// Font style constants carried by console messages. The numeric values
/// travel on the wire; the UI maps them to actual colors and faces.
pub mod font {
    /// Regular talk text.
    pub const DEFAULT: u8 = 0;
    /// Informational system lines.
    pub const INFO: u8 = 1;
    /// Warnings and combat notices.
    pub const WARNING: u8 = 2;
}

/// UI panels a server message can ask the client to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    /// The game-master tools panel.
    GameMaster,
}

/// External mutable game state, as seen from the protocol layer.
///
/// Plain setters — the core does not validate semantic ranges beyond
/// what decoding enforces; values are applied as received. "Set
/// absolute value" setters are naturally idempotent; the message-style
/// channels ([`console_message`](Self::console_message),
/// [`notify`](Self::notify)) are not, and the dispatch discipline
/// guarantees they run at most once per wire message.
///
/// Most methods default to a no-op so lightweight embedders only
/// implement what their UI surfaces. [`notify`](Self::notify) and
/// [`connection_lost`](Self::connection_lost) are required: every
/// client must surface protocol errors and the loss of the connection.
pub trait GameStateSink: Send + Sync {
    /// A user-facing dialog-level message (server errors, login
    /// rejections, the disconnect notice).
    fn notify(&self, message: &str);

    /// The connection is gone — explicit disconnect, transport failure,
    /// or fatal protocol error alike. Called exactly once per
    /// connection, after the socket is closed.
    fn connection_lost(&self);

    /// Login state changed.
    fn set_connected(&self, _connected: bool) {}

    /// Absolute strength attribute.
    fn set_strength(&self, _value: u8) {}

    /// Absolute dexterity attribute.
    fn set_dexterity(&self, _value: u8) {}

    /// Absolute gold amount.
    fn set_gold(&self, _amount: i32) {}

    /// Absolute experience amount.
    fn set_experience(&self, _amount: i32) {}

    /// Current hit points.
    fn set_health(&self, _current: i16) {}

    /// Current mana points.
    fn set_mana(&self, _current: i16) {}

    /// Current stamina points.
    fn set_stamina(&self, _current: i16) {}

    /// Flip the sailing/navigation state.
    fn toggle_sailing(&self) {}

    /// Blindness effect on or off.
    fn set_blind(&self, _blind: bool) {}

    /// A line for the game console, with one of the [`font`] styles.
    fn console_message(&self, _text: &str, _font: u8) {}

    /// Close all open dialog windows.
    fn clear_dialogs(&self) {}

    /// Open a UI panel.
    fn show_panel(&self, _panel: Panel) {}
}
