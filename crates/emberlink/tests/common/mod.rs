//! Shared test fakes: a sink that records every call it receives.

use std::sync::Mutex;

use emberlink::{GameStateSink, Panel};

/// Installs a log subscriber once per test binary so `RUST_LOG` works
/// when a test needs debugging. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env(),
        )
        .with_test_writer()
        .try_init();
}

/// One observed sink call, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Notify(String),
    ConnectionLost,
    SetConnected(bool),
    SetStrength(u8),
    SetDexterity(u8),
    SetGold(i32),
    SetExperience(i32),
    SetHealth(i16),
    SetMana(i16),
    SetStamina(i16),
    ToggleSailing,
    SetBlind(bool),
    Console(String, u8),
    ClearDialogs,
    ShowPanel(Panel),
}

/// A [`GameStateSink`] that appends every call to an internal log.
///
/// The mutex is the sink's own synchronization — exactly the interior-
/// mutability arrangement a real UI-facing sink would use, since the
/// network task writes while the test (standing in for the UI thread)
/// reads.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Event>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().expect("sink lock").clone()
    }

    fn record(&self, event: Event) {
        self.events.lock().expect("sink lock").push(event);
    }
}

impl GameStateSink for RecordingSink {
    fn notify(&self, message: &str) {
        self.record(Event::Notify(message.to_owned()));
    }

    fn connection_lost(&self) {
        self.record(Event::ConnectionLost);
    }

    fn set_connected(&self, connected: bool) {
        self.record(Event::SetConnected(connected));
    }

    fn set_strength(&self, value: u8) {
        self.record(Event::SetStrength(value));
    }

    fn set_dexterity(&self, value: u8) {
        self.record(Event::SetDexterity(value));
    }

    fn set_gold(&self, amount: i32) {
        self.record(Event::SetGold(amount));
    }

    fn set_experience(&self, amount: i32) {
        self.record(Event::SetExperience(amount));
    }

    fn set_health(&self, current: i16) {
        self.record(Event::SetHealth(current));
    }

    fn set_mana(&self, current: i16) {
        self.record(Event::SetMana(current));
    }

    fn set_stamina(&self, current: i16) {
        self.record(Event::SetStamina(current));
    }

    fn toggle_sailing(&self) {
        self.record(Event::ToggleSailing);
    }

    fn set_blind(&self, blind: bool) {
        self.record(Event::SetBlind(blind));
    }

    fn console_message(&self, text: &str, font: u8) {
        self.record(Event::Console(text.to_owned(), font));
    }

    fn clear_dialogs(&self) {
        self.record(Event::ClearDialogs);
    }

    fn show_panel(&self, panel: Panel) {
        self.record(Event::ShowPanel(panel));
    }
}
