//! Logging initialization and configuration.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::{Error, Result};
use crate::version;

/// Default filter used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "info,ugly_platform=debug,ugly_host=debug";

/// Logger configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Filter directive in `EnvFilter` syntax. Falls back to `RUST_LOG`,
    /// then to a built-in default.
    pub filter: Option<String>,
    /// Log file, truncated at startup. `None` logs to stdout only.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: None,
            file: Some(PathBuf::from(version::LOG_FILENAME)),
        }
    }
}

/// Initialize the logging system with tracing.
///
/// This sets up tracing-subscriber with:
/// - Environment-based filtering (RUST_LOG)
/// - A console layer
/// - An optional file layer written off-thread
///
/// The returned guard flushes the file writer when dropped and must be kept
/// alive for the lifetime of the program. When a global subscriber is
/// already installed the call does nothing and returns `None`; the existing
/// log file is left untouched.
pub fn init_logging(config: &LogConfig) -> Option<WorkerGuard> {
    if tracing::dispatcher::has_been_set() {
        tracing::warn!("Logging already initialized");
        return None;
    }

    let filter = match &config.filter {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };

    let console = fmt::layer().with_target(true);

    let (file_layer, guard, stale_error) = match &config.file {
        Some(path) => {
            let stale_error = remove_stale_log(path).err();
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path.file_name().unwrap_or(path.as_os_str());
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard), stale_error)
        }
        None => (None, None, None),
    };

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .is_ok();

    if let Some(e) = stale_error {
        tracing::error!("Cannot remove log file: {}", e);
    }

    tracing::info!("----- {} Log", version::ENGINE_NAME);
    tracing::info!("----- Version: {}", version::VERSION);

    if installed { guard } else { None }
}

fn remove_stale_log(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(Error::Io(e)),
        _ => Ok(()),
    }
}
