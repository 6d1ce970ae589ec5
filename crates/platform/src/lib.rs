//! Platform abstraction layer for the UglyEngine host.
//!
//! This crate provides platform-specific functionality:
//! - Window management via winit
//! - Named input buttons and key bindings
//! - Vulkan instance extensions for the window surface

mod button;
mod input;
mod window;

pub use button::{ButtonAction, ButtonState, InputButton};
pub use input::{InputManager, KeyAction, KeyCode, KeySink};
pub use window::{WindowSystem, WinitWindowSystem};
