//! Graphics device bring-up pipeline.
//!
//! [`GraphicsDeviceManager`] runs a fixed sequence of stages, each failing
//! fast:
//!
//! 1. create the instance (optionally with validation layers)
//! 2. register the debug messenger when validation is enabled
//! 3. pick the first physical device with a graphics queue family
//! 4. create the logical device and fetch its graphics queue
//!
//! Shutdown destroys whatever was created, in exact reverse order.

use std::ffi::{CStr, CString};

use ash::{Entry, vk};
use tracing::{error, info};

use crate::device::create_logical_device;
use crate::error::{RhiError, RhiResult};
use crate::instance::{create_debug_messenger, create_instance, enabled_layer_names};
use crate::physical_device::{QueueFamilyIndices, pick_physical_device};

/// The Khronos validation layer name.
const VALIDATION_LAYER_NAME: &CStr = c"VK_LAYER_KHRONOS_validation";

/// Graphics device settings.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Enable validation layers and the debug messenger.
    pub enable_validation: bool,
    /// Layers that must all be present when validation is enabled.
    pub validation_layers: Vec<CString>,
    /// Name reported in the Vulkan application info.
    pub application_name: String,
    /// `(major, minor, patch)` reported in the Vulkan application info.
    pub application_version: (u32, u32, u32),
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            enable_validation: cfg!(debug_assertions),
            validation_layers: vec![VALIDATION_LAYER_NAME.to_owned()],
            application_name: "UglyEngine application".to_owned(),
            application_version: (1, 0, 0),
        }
    }
}

/// Graphics subsystem contract driven by the host.
pub trait GraphicsDevice {
    /// Construct an uninitialized device; no API objects are created yet.
    fn new(config: &DeviceConfig) -> Self
    where
        Self: Sized;

    /// Run the bring-up pipeline. `platform_extensions` are the instance
    /// extensions the window system needs for its surface.
    fn initialize(&mut self, platform_extensions: &[&'static CStr]) -> RhiResult<()>;

    /// Destroy everything `initialize` created. Safe to call after a failed
    /// or missing `initialize`, and more than once.
    fn shutdown(&mut self);
}

type DebugMessenger = (ash::ext::debug_utils::Instance, vk::DebugUtilsMessengerEXT);

/// Slots for the objects the bring-up stages create, in creation order.
struct CreatedHandles<I, M, D> {
    instance: Option<I>,
    /// Present iff validation is enabled and the messenger was registered.
    messenger: Option<M>,
    device: Option<D>,
}

impl<I, M, D> CreatedHandles<I, M, D> {
    const fn empty() -> Self {
        Self {
            instance: None,
            messenger: None,
            device: None,
        }
    }

    /// Hand each filled slot to its destructor, newest first. Empty slots
    /// are skipped and every slot is empty afterwards.
    fn release(
        &mut self,
        destroy_device: impl FnOnce(D),
        destroy_messenger: impl FnOnce(M),
        destroy_instance: impl FnOnce(I),
    ) {
        if let Some(device) = self.device.take() {
            destroy_device(device);
        }
        if let Some(messenger) = self.messenger.take() {
            destroy_messenger(messenger);
        }
        if let Some(instance) = self.instance.take() {
            destroy_instance(instance);
        }
    }
}

/// Owns the Vulkan instance, debug messenger and logical device.
pub struct GraphicsDeviceManager {
    config: DeviceConfig,
    entry: Option<Entry>,
    handles: CreatedHandles<ash::Instance, DebugMessenger, ash::Device>,
    physical_device: vk::PhysicalDevice,
    queue_families: QueueFamilyIndices,
    graphics_queue: vk::Queue,
}

impl GraphicsDeviceManager {
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Whether every stage completed.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.handles.device.is_some()
    }

    /// Returns whether validation layers are enabled.
    #[inline]
    pub fn has_validation(&self) -> bool {
        self.handles.messenger.is_some()
    }

    /// Selected physical device, null until picked.
    #[inline]
    pub fn physical_device(&self) -> vk::PhysicalDevice {
        self.physical_device
    }

    #[inline]
    pub fn queue_families(&self) -> &QueueFamilyIndices {
        &self.queue_families
    }

    /// Returns the graphics queue handle, null until the device exists.
    #[inline]
    pub fn graphics_queue(&self) -> vk::Queue {
        self.graphics_queue
    }

    /// Returns the Vulkan logical device handle.
    #[inline]
    pub fn device(&self) -> Option<&ash::Device> {
        self.handles.device.as_ref()
    }

    fn create_instance(&mut self, platform_extensions: &[&'static CStr]) -> RhiResult<()> {
        let entry = unsafe { Entry::load()? };
        let instance = create_instance(&entry, &self.config, platform_extensions)?;
        self.entry = Some(entry);
        self.handles.instance = Some(instance);
        Ok(())
    }

    fn setup_debug_messenger(&mut self) -> RhiResult<()> {
        if !self.config.enable_validation {
            return Ok(());
        }

        let (Some(entry), Some(instance)) = (&self.entry, &self.handles.instance) else {
            return Err(RhiError::NotInitialized("instance"));
        };
        self.handles.messenger = Some(create_debug_messenger(entry, instance)?);
        Ok(())
    }

    fn pick_physical_device(&mut self) -> RhiResult<()> {
        let instance = self
            .handles
            .instance
            .as_ref()
            .ok_or(RhiError::NotInitialized("instance"))?;

        let (physical_device, queue_families) = pick_physical_device(instance)?;
        self.physical_device = physical_device;
        self.queue_families = queue_families;
        Ok(())
    }

    fn create_logical_device(&mut self) -> RhiResult<()> {
        let instance = self
            .handles
            .instance
            .as_ref()
            .ok_or(RhiError::NotInitialized("instance"))?;
        if self.physical_device == vk::PhysicalDevice::null() {
            return Err(RhiError::NotInitialized("physical device"));
        }

        let layers = enabled_layer_names(&self.config);
        let (device, graphics_queue) =
            create_logical_device(instance, self.physical_device, &self.queue_families, &layers)?;
        self.handles.device = Some(device);
        self.graphics_queue = graphics_queue;
        Ok(())
    }
}

impl GraphicsDevice for GraphicsDeviceManager {
    fn new(config: &DeviceConfig) -> Self {
        Self {
            config: config.clone(),
            entry: None,
            handles: CreatedHandles::empty(),
            physical_device: vk::PhysicalDevice::null(),
            queue_families: QueueFamilyIndices::default(),
            graphics_queue: vk::Queue::null(),
        }
    }

    fn initialize(&mut self, platform_extensions: &[&'static CStr]) -> RhiResult<()> {
        info!("--- Initialize graphics device manager");

        self.create_instance(platform_extensions)?;
        self.setup_debug_messenger()?;
        self.pick_physical_device()?;
        self.create_logical_device()?;

        Ok(())
    }

    fn shutdown(&mut self) {
        info!("--- Shutdown graphics device manager");

        self.handles.release(
            |device| {
                unsafe {
                    if let Err(e) = device.device_wait_idle() {
                        error!("Failed to wait for device idle during shutdown: {:?}", e);
                    }
                    device.destroy_device(None);
                }
                info!("Logical device destroyed");
            },
            |(debug_utils, messenger)| {
                unsafe { debug_utils.destroy_debug_utils_messenger(messenger, None) };
                info!("Debug messenger destroyed");
            },
            |instance| {
                unsafe { instance.destroy_instance(None) };
                info!("Vulkan instance destroyed");
            },
        );

        self.graphics_queue = vk::Queue::null();
        self.physical_device = vk::PhysicalDevice::null();
        self.queue_families = QueueFamilyIndices::default();
        self.entry = None;
    }
}

impl Drop for GraphicsDeviceManager {
    fn drop(&mut self) {
        if self.handles.instance.is_some() {
            self.shutdown();
        }
    }
}
