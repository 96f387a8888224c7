//! Arena server entry point.
//!
//! Loads the game configuration and match definitions, starts one worker per
//! match, then reads JSON requests from stdin and streams JSON events to
//! stdout until stdin closes.
mod config;
mod logging;
mod stdio;

use anyhow::{Context, Result};
use config::ServerConfig;
use runtime::Runtime;
use tokio::io::BufReader;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ServerConfig::from_env();
    logging::setup_logging(config.log_dir.as_deref())?;

    let game_config = config.load_game_config()?;
    let matches = config.load_matches()?;
    tracing::info!(
        data_dir = %config.data_dir.display(),
        matches = matches.len(),
        "content loaded"
    );

    let mut builder = Runtime::builder().config(config.runtime_config(game_config));
    for definition in matches {
        builder = builder.with_match(definition.access_code, definition.state);
    }
    let runtime = builder.build().await.context("Failed to start runtime")?;
    tracing::info!(matches = ?runtime.registry().match_ids().await, "runtime started");

    let (line_tx, line_rx) = mpsc::channel(config.event_buffer);
    let writer = stdio::spawn_writer(tokio::io::stdout(), line_rx);
    let forwarders = stdio::forward_events(&runtime, line_tx.clone());

    stdio::serve(&runtime, BufReader::new(tokio::io::stdin()), line_tx).await?;
    tracing::info!("stdin closed, shutting down");

    runtime.shutdown().await?;
    for forwarder in forwarders {
        forwarder.abort();
        // Cancelled forwarders release their line senders, letting the writer drain
        let _ = forwarder.await;
    }
    writer.await.context("Event writer panicked")??;
    Ok(())
}
