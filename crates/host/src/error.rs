//! Host startup errors.

use thiserror::Error;

use ugly_rhi::RhiError;

/// Reason a [`Host::run`](crate::Host::run) call failed.
///
/// Every variant has its own negative exit status.
#[derive(Error, Debug)]
pub enum HostError {
    #[error("Invalid application")]
    MissingApplication,

    #[error("Host has already run")]
    InvalidState,

    #[error("Failed to create window: {0}")]
    Window(#[source] ugly_core::Error),

    #[error("Failed to init input manager: {0}")]
    Input(#[source] ugly_core::Error),

    #[error("Failed to init graphics device manager: {0}")]
    Device(#[from] RhiError),

    #[error("Failed to initialize application: {0:#}")]
    Application(anyhow::Error),
}

impl HostError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            HostError::MissingApplication => -1,
            HostError::Window(_) => -2,
            HostError::Input(_) => -3,
            HostError::Device(_) => -4,
            HostError::Application(_) => -5,
            HostError::InvalidState => -6,
        }
    }
}
