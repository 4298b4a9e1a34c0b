// Hide console window on Windows release builds
#![cfg_attr(
    all(target_os = "windows", not(debug_assertions)),
    windows_subsystem = "windows"
)]

//! MicDeck Companion App - Entry Point
//!
//! Discovers the macropad's serial port, starts the link worker, and
//! runs the protocol loop until the link closes. A broken link is
//! terminal for the run; relaunch to reconnect.

use anyhow::{Context, Result};
use clap::Parser;
use micdeck::actions::AppLauncher;
use micdeck::audio;
use micdeck::core::config::Config;
use micdeck::core::events::LinkEvent;
use micdeck::core::state::AppState;
use micdeck::link::{discover, LinkWorker};
use micdeck::protocol::handler::ProtocolHandler;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "micdeck", about = "MicDeck macropad companion")]
struct Cli {
    /// Serial port to use, overriding discovery (e.g. COM6)
    #[arg(long)]
    port: Option<String>,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    info!("Starting MicDeck companion app");

    let config = Config::load()?;

    // CLI argument beats the configured preference
    let preferred = cli.port.or_else(|| config.serial.preferred_port.clone());
    let port = discover(preferred.as_deref()).context("No usable serial port")?;
    info!("Using port: {}", port);

    let state = Arc::new(RwLock::new(AppState::new()));
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<LinkEvent>();

    let worker = LinkWorker::start(config.serial.clone(), port, event_tx);

    let handler = ProtocolHandler::new(
        audio::default_endpoint(),
        AppLauncher,
        worker.writer(),
        config.action.launch_path.clone(),
        Arc::clone(&state),
    );

    // Single consumer: lines arrive in wire order
    while let Some(event) = event_rx.blocking_recv() {
        let closed = event == LinkEvent::Disconnected;
        handler.handle_event(event);
        if closed {
            break;
        }
    }

    warn!("Serial link closed, exiting");
    worker.stop(Duration::from_secs(1));

    Ok(())
}
