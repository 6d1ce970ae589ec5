//! Core utilities for the UglyEngine host.
//!
//! This crate provides foundational types and utilities used across the host:
//! - Error types and result aliases
//! - Logging initialization
//! - Frame timing
//! - Build-time version constants

mod error;
mod logging;
mod timer;
pub mod version;

pub use error::{Error, Result};
pub use logging::{LogConfig, init_logging};
pub use timer::Timer;
