use std::fs::OpenOptions;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding a filter directive, e.g. `postbell_core=debug`.
pub const LOG_FILTER_ENV: &str = "POSTBELL_LOG";

/// Environment variable overriding the configured log file.
pub const LOG_FILE_ENV: &str = "POSTBELL_LOG_FILE";

/// Install the global subscriber.
///
/// The terminal belongs to the UI, so logs only ever go to a file: the one in
/// `POSTBELL_LOG_FILE`, else `log_file`. Without either, no subscriber is
/// installed and events are discarded.
pub fn init_tracing(log_file: Option<&Path>, default_level: &str) -> Result<()> {
    let log_path = std::env::var_os(LOG_FILE_ENV)
        .map(std::path::PathBuf::from)
        .or_else(|| log_file.map(Path::to_path_buf));

    let Some(log_path) = log_path else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("Invalid log filter")?;

    let file_layer = fmt::layer()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;
    Ok(())
}
