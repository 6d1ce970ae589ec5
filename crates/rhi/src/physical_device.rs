//! Physical device (GPU) selection.
//!
//! The selection is deliberately simple:
//! 1. Enumerate all available GPUs
//! 2. Scan each GPU's queue families for graphics support
//! 3. Take the first GPU that has one
//!
//! There is no ranking by device type, memory or limits.

use ash::vk;
use tracing::{debug, info, warn};

use crate::error::{RhiError, RhiResult};

/// Queue family indices needed by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueueFamilyIndices {
    /// Index of the queue family that supports graphics operations.
    pub graphics_family: Option<u32>,
}

impl QueueFamilyIndices {
    /// Checks if every required queue family was found.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.graphics_family.is_some()
    }
}

/// Scans queue families in index order.
///
/// The scan never stops early, so when several families support graphics the
/// highest index is the one recorded.
pub fn find_queue_families(families: &[vk::QueueFamilyProperties]) -> QueueFamilyIndices {
    let mut indices = QueueFamilyIndices::default();

    for (i, family) in families.iter().enumerate() {
        if family.queue_flags.contains(vk::QueueFlags::GRAPHICS) {
            indices.graphics_family = Some(i as u32);
        }
    }

    indices
}

/// Returns the first device whose queue families are complete.
///
/// `queue_families_of` is queried once per device, in order, until a match.
///
/// # Errors
///
/// [`RhiError::NoPhysicalDevice`] when `devices` is empty and
/// [`RhiError::NoSuitableGpu`] when no device qualifies.
pub fn select_first_suitable<D: Copy>(
    devices: &[D],
    mut queue_families_of: impl FnMut(D) -> Vec<vk::QueueFamilyProperties>,
) -> RhiResult<(usize, QueueFamilyIndices)> {
    if devices.is_empty() {
        warn!("No physical device found");
        return Err(RhiError::NoPhysicalDevice);
    }

    for (i, &device) in devices.iter().enumerate() {
        let indices = find_queue_families(&queue_families_of(device));
        if indices.is_complete() {
            return Ok((i, indices));
        }
        debug!("GPU #{} skipped: no graphics queue family", i);
    }

    warn!("No suitable physical device found");
    Err(RhiError::NoSuitableGpu)
}

/// Picks the physical device the logical device will be created on.
pub fn pick_physical_device(
    instance: &ash::Instance,
) -> RhiResult<(vk::PhysicalDevice, QueueFamilyIndices)> {
    let devices = unsafe { instance.enumerate_physical_devices()? };
    info!("Found {} GPU(s)", devices.len());

    let (index, indices) = select_first_suitable(&devices, |device| unsafe {
        instance.get_physical_device_queue_family_properties(device)
    })?;
    let device = devices[index];

    let properties = unsafe { instance.get_physical_device_properties(device) };
    let name = properties
        .device_name_as_c_str()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "Unknown Device".to_owned());
    info!(
        "Selected GPU: '{}' ({}), graphics queue family {:?}",
        name,
        device_type_name(properties.device_type),
        indices.graphics_family
    );

    Ok((device, indices))
}

/// Returns a human-readable string for the device type.
fn device_type_name(device_type: vk::PhysicalDeviceType) -> &'static str {
    match device_type {
        vk::PhysicalDeviceType::DISCRETE_GPU => "Discrete GPU",
        vk::PhysicalDeviceType::INTEGRATED_GPU => "Integrated GPU",
        vk::PhysicalDeviceType::VIRTUAL_GPU => "Virtual GPU",
        vk::PhysicalDeviceType::CPU => "CPU",
        _ => "Other",
    }
}
