//! Tracing setup for the `treehouse` binary.
//!
//! Every run writes to `<cache>/treehouse/logs/<session>/client.log` so
//! `cargo xtask tail-logs` can follow it; `--verbose` mirrors to stderr.
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_FILE: &str = "client.log";

/// Installs the global subscriber and returns the log session id.
///
/// `RUST_LOG` overrides the default `info` filter.
pub fn setup_logging(session_id: &Option<String>, verbose: bool) -> Result<String> {
    let session_id = session_id.clone().unwrap_or_else(generated_session_id);
    let dir = session_dir(&session_id);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(&dir, LOG_FILE));
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // ANSI colours stay in the file; tail-logs prints them as-is.
    let file_layer = fmt::layer().with_writer(file_writer).with_ansi(true);
    let stderr_layer = verbose.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    // The writer must outlive main.
    std::mem::forget(guard);

    tracing::info!("Log session {} at {}", session_id, dir.join(LOG_FILE).display());
    Ok(session_id)
}

fn session_dir(session_id: &str) -> PathBuf {
    client_bootstrap::paths::log_dir().join(session_id)
}

fn generated_session_id() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    format!("session_{}", secs)
}
