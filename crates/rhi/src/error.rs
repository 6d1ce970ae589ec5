//! RHI-specific error types.

use thiserror::Error;

/// RHI-specific error type.
#[derive(Error, Debug)]
pub enum RhiError {
    /// Vulkan API error
    #[error("Vulkan error: {0}")]
    VulkanError(#[from] ash::vk::Result),

    /// Failed to load Vulkan
    #[error("Failed to load Vulkan: {0}")]
    LoadingError(#[from] ash::LoadingError),

    /// Validation was requested but some layers are not installed
    #[error("Validation layers are active but not available: {}", .0.join(", "))]
    MissingValidationLayers(Vec<String>),

    /// The instance exposes no physical device at all
    #[error("No physical device found")]
    NoPhysicalDevice,

    /// No physical device has a graphics queue family
    #[error("No suitable physical device found")]
    NoSuitableGpu,

    /// The window system could not report its surface extensions
    #[error("Platform extensions unavailable: {0}")]
    PlatformExtensions(String),

    /// A pipeline stage ran before the stage it depends on
    #[error("Not initialized: {0}")]
    NotInitialized(&'static str),
}

/// Result type alias for RHI operations.
pub type RhiResult<T> = std::result::Result<T, RhiError>;
