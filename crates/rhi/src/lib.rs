//! Vulkan abstraction layer (Render Hardware Interface).
//!
//! This crate brings up a Vulkan device using the `ash` crate:
//! - Instance creation with optional validation layers
//! - Debug messenger routed to the log
//! - Physical device selection
//! - Logical device and graphics queue creation

mod error;

pub mod device;
pub mod instance;
pub mod manager;
pub mod physical_device;

pub use error::{RhiError, RhiResult};
pub use manager::{DeviceConfig, GraphicsDevice, GraphicsDeviceManager};
pub use physical_device::QueueFamilyIndices;

// Re-export ash types that users might need
pub use ash::vk;
