use ugly_rhi::DeviceConfig;

/// Host settings fixed at construction.
#[derive(Debug, Clone)]
pub struct HostConfig {
    pub display_width: u32,
    pub display_height: u32,
    pub device: DeviceConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            display_width: 1280,
            display_height: 720,
            device: DeviceConfig::default(),
        }
    }
}
