//! Vulkan logical device and queue creation.

use std::ffi::c_char;

use ash::vk;
use tracing::{debug, error, info};

use crate::error::{RhiError, RhiResult};
use crate::physical_device::QueueFamilyIndices;

/// Priority of the single graphics queue.
static QUEUE_PRIORITIES: [f32; 1] = [1.0];

/// Queue requests for the logical device: one queue from the graphics family.
pub fn queue_create_infos(
    indices: &QueueFamilyIndices,
) -> RhiResult<Vec<vk::DeviceQueueCreateInfo<'static>>> {
    let family = indices
        .graphics_family
        .ok_or(RhiError::NotInitialized("graphics queue family"))?;

    Ok(vec![
        vk::DeviceQueueCreateInfo::default()
            .queue_family_index(family)
            .queue_priorities(&QUEUE_PRIORITIES),
    ])
}

/// Creates the logical device and retrieves its graphics queue.
///
/// No device extensions and no optional features are enabled. `layers` are
/// the instance's validation layers, passed through for older loaders that
/// still honor device layers.
pub fn create_logical_device(
    instance: &ash::Instance,
    physical_device: vk::PhysicalDevice,
    indices: &QueueFamilyIndices,
    layers: &[*const c_char],
) -> RhiResult<(ash::Device, vk::Queue)> {
    let queue_create_infos = queue_create_infos(indices)?;
    let features = vk::PhysicalDeviceFeatures::default();

    #[allow(deprecated)]
    let create_info = vk::DeviceCreateInfo::default()
        .queue_create_infos(&queue_create_infos)
        .enabled_features(&features)
        .enabled_layer_names(layers);

    let device = unsafe {
        instance
            .create_device(physical_device, &create_info, None)
            .map_err(|e| {
                error!("Failed to create logical device");
                RhiError::from(e)
            })?
    };

    info!("Logical device created");

    let family = queue_create_infos[0].queue_family_index;
    let graphics_queue = unsafe { device.get_device_queue(family, 0) };
    debug!("Graphics queue retrieved from family {}", family);

    Ok((device, graphics_queue))
}
