//! A minimal console client: connects, logs in, and prints everything
//! the server pushes at us.
//!
//! ```sh
//! cargo run -p console-client -- 127.0.0.1:7666 myname mypassword
//! ```

use std::sync::Arc;
use std::time::Duration;

use emberlink::{
    ClientConfig, ConnectionState, GameClient, GameStateSink,
    OutboundMessage, Panel, font,
};

/// A sink that renders game state straight to stdout. No interior state
/// to guard here — println is already serialized — but a real UI sink
/// would hold its model behind a mutex or channel at exactly this
/// boundary.
struct ConsoleSink;

impl GameStateSink for ConsoleSink {
    fn notify(&self, message: &str) {
        println!("*** {message}");
    }

    fn connection_lost(&self) {
        println!("--- connection lost");
    }

    fn set_connected(&self, connected: bool) {
        println!("--- {}", if connected { "logged in" } else { "logged out" });
    }

    fn set_strength(&self, value: u8) {
        println!("    STR = {value}");
    }

    fn set_dexterity(&self, value: u8) {
        println!("    DEX = {value}");
    }

    fn set_gold(&self, amount: i32) {
        println!("    gold = {amount}");
    }

    fn set_experience(&self, amount: i32) {
        println!("    exp = {amount}");
    }

    fn set_health(&self, current: i16) {
        println!("    hp = {current}");
    }

    fn set_mana(&self, current: i16) {
        println!("    mana = {current}");
    }

    fn set_stamina(&self, current: i16) {
        println!("    stamina = {current}");
    }

    fn console_message(&self, text: &str, font: u8) {
        let tag = match font {
            font::DEFAULT => "chat",
            font::INFO => "info",
            font::WARNING => "warn",
            _ => "?",
        };
        println!("[{tag}] {text}");
    }

    fn show_panel(&self, panel: Panel) {
        println!("--- server opened panel {panel:?}");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let addr = args.next().unwrap_or_else(|| "127.0.0.1:7666".into());
    let name = args.next().unwrap_or_else(|| "wanderer".into());
    let password = args.next().unwrap_or_default();

    let client = GameClient::new(ClientConfig::default(), Arc::new(ConsoleSink));
    let mut state = client.state();

    client.connect(&addr).await?;
    client
        .send(&OutboundMessage::LoginExisting {
            name,
            password,
            version_major: 0,
            version_minor: 1,
            version_patch: 0,
        })
        .await?;

    // Probe latency every few seconds until the connection ends or the
    // user hits Ctrl-C.
    let pinger = async {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            if client.send(&OutboundMessage::Ping).await.is_err() {
                break;
            }
        }
    };

    tokio::select! {
        _ = pinger => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted, quitting");
            let _ = client.send(&OutboundMessage::Quit).await;
            client.disconnect();
        }
        result = state.wait_for(|s| *s == ConnectionState::Disconnected) => {
            result?;
        }
    }

    Ok(())
}
