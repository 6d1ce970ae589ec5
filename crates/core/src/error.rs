//! Error types for the host.

use thiserror::Error;

/// Main error type shared by the host crates.
#[derive(Error, Debug)]
pub enum Error {
    /// Window system initialization or window creation errors
    #[error("Window error: {0}")]
    Window(String),

    /// Input subsystem errors
    #[error("Input error: {0}")]
    Input(String),

    /// IO errors, e.g. removing a stale log file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using the host's Error type.
pub type Result<T> = std::result::Result<T, Error>;
