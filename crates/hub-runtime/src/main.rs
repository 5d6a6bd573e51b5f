//! # Hub Runtime
//!
//! Reads newline-delimited JSON envelopes from stdin and writes one JSON
//! response per line to stdout. Logs go to stderr.
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry
//! 2. Load configuration from the environment
//! 3. Validate the access key and HMAC secret are set
//! 4. Open stores and wire services
//! 5. Serve until stdin closes or Ctrl+C
//!
//! Each request runs on its own task, so responses may be written out of
//! order; callers correlate them by envelope `id`.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info};

use hub_runtime::{DispatchResponse, Dispatcher, HubConfig, HubContainer};
use hub_telemetry::{init_telemetry, log_event, TelemetryConfig};

/// Responses waiting to be written.
const RESPONSE_QUEUE_DEPTH: usize = 1024;

#[tokio::main]
async fn main() -> Result<()> {
    init_telemetry(&TelemetryConfig::from_env()).context("Failed to init telemetry")?;

    let config = HubConfig::from_env().context("Failed to load configuration")?;
    config.validate_for_production()?;

    let container = HubContainer::new(config).context("Failed to initialize hub container")?;
    let dispatcher = Dispatcher::new(Arc::new(container));

    let (tx, rx) = mpsc::channel::<DispatchResponse>(RESPONSE_QUEUE_DEPTH);
    let writer = tokio::spawn(write_responses(rx));

    log_event!(info, "runtime", "Hub is serving on stdin/stdout");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    info!("stdin closed");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let dispatcher = dispatcher.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let response = dispatcher.dispatch_line(&line).await;
                    if tx.send(response).await.is_err() {
                        error!("Response writer stopped");
                    }
                });
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    // In-flight tasks hold their own senders; the writer drains until the
    // last one finishes.
    drop(tx);
    writer.await.context("Response writer panicked")??;

    log_event!(info, "runtime", "Shutdown complete");
    Ok(())
}

async fn write_responses(mut rx: mpsc::Receiver<DispatchResponse>) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    while let Some(response) = rx.recv().await {
        let mut line = serde_json::to_vec(&response)?;
        line.push(b'\n');
        stdout.write_all(&line).await?;
        stdout.flush().await?;
    }
    Ok(())
}
