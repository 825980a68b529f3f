//! HackFlow - a terminal front-end for the hackathon portal.
//!
//! Keeps the login session across runs and only shows pages the current
//! session may see: `/` and `/profile` need a login, `/login` and
//! `/register` are for visitors.

mod app;
mod commands;
mod nav;
mod render;

use std::path::Path;

use anyhow::Result;
use hackflow_core::Config;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{prompt, App, AppState};
use commands::Command;

/// Log file name prefix inside the data directory
const LOG_FILE_PREFIX: &str = "hackflow.log";

/// Initialize the tracing subscriber for logging.
///
/// Logs go to a daily file under `log_dir` so they never interleave with
/// prompts. The returned guard flushes the writer when dropped.
fn init_tracing(log_dir: &Path) -> WorkerGuard {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let (config, config_error) = match Config::load() {
        Ok(c) => (c, None),
        Err(e) => (Config::default(), Some(e)),
    };
    let data_dir = Config::data_dir();

    let _log_guard = init_tracing(&data_dir.join("logs"));
    info!("HackFlow starting");
    if let Some(e) = config_error {
        warn!(error = %e, "Failed to load config, using defaults");
    }

    let start_path = std::env::args().nth(1).unwrap_or_else(|| "/".to_string());
    let mut app = App::new(config, data_dir, &start_path)?;

    let result = run_app(&mut app).await;

    info!("HackFlow shutting down");
    result
}

async fn run_app(app: &mut App) -> Result<()> {
    println!("Type 'help' for commands.");
    loop {
        // Guards run on every render
        println!("\n{}\n", app.render_current());

        let Some(line) = prompt(format!("{}> ", app.navigator.current())).await? else {
            // End of input
            return Ok(());
        };

        match Command::parse(&line) {
            Ok(command) => app.handle(command).await?,
            Err(e) => println!("{}", e),
        }

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
