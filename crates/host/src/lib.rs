//! Lifecycle orchestration for the UglyEngine host.
//!
//! The [`Host`] owns the window system, the input manager, the graphics
//! device and one [`Application`], and drives them through
//! `Created → Initializing → Running → ShuttingDown → Terminated`.

mod application;
mod config;
mod error;
mod host;

pub use application::{Application, Context};
pub use config::HostConfig;
pub use error::HostError;
pub use host::{Host, HostState};

pub use ugly_platform::{ButtonAction, ButtonState, KeyCode};
