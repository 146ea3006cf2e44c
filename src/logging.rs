use color_eyre::Result;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, LoggingConfig};

pub const LOG_FILE_NAME: &str = "blockview.log";

/// Sets up file logging. The terminal belongs to the UI, so nothing is written
/// to stdout or stderr. Keep the returned guard alive until exit.
pub fn init(config: &LoggingConfig) -> Result<(WorkerGuard, PathBuf)> {
    let log_dir = match &config.directory {
        Some(directory) => directory.clone(),
        None => Config::default_log_dir()?,
    };
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter(&config.filter))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .try_init()?;

    Ok((guard, log_path(&log_dir)))
}

/// `RUST_LOG` wins over the configured filter.
fn filter(configured: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new("blockview=info"))
}

fn log_path(log_dir: &Path) -> PathBuf {
    log_dir.join(LOG_FILE_NAME)
}
