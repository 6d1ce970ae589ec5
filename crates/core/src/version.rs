//! Build-time name and version constants.

/// Engine name embedded in log banners and the Vulkan application info.
pub const ENGINE_NAME: &str = "UglyEngine";

/// Default log file name.
pub const LOG_FILENAME: &str = "UglyEngine.log";

/// Full version string, e.g. `0.0.2`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const VERSION_MAJOR: u32 = parse_u32(env!("CARGO_PKG_VERSION_MAJOR"));
pub const VERSION_MINOR: u32 = parse_u32(env!("CARGO_PKG_VERSION_MINOR"));
pub const VERSION_PATCH: u32 = parse_u32(env!("CARGO_PKG_VERSION_PATCH"));

const fn parse_u32(s: &str) -> u32 {
    let bytes = s.as_bytes();
    let mut value = 0u32;
    let mut i = 0;
    while i < bytes.len() {
        value = value * 10 + (bytes[i] - b'0') as u32;
        i += 1;
    }
    value
}
