//! Tracing subscriber setup. The terminal belongs to the UI, so log lines go
//! to a file in the data directory instead of stderr.
//!
//! Filter priority: `LIBROS_LOG`, then `RUST_LOG`, then `info`.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "LIBROS_LOG";
const DEFAULT_DIRECTIVE: &str = "info";

/// Install the global subscriber, appending to `log_path`.
pub fn init_logging(log_path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("failed to install tracing subscriber")
}

fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}
