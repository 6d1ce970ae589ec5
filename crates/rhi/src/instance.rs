//! Vulkan instance management.
//!
//! This module handles VkInstance creation, validation layers, and the debug
//! messenger that routes validation output to the log.

use std::borrow::Cow;
use std::ffi::{CStr, CString, c_char};

use ash::{Entry, vk};
use tracing::{error, info, warn};

use ugly_core::version;

use crate::error::{RhiError, RhiResult};
use crate::manager::DeviceConfig;

/// Engine name embedded in the application info.
const ENGINE_NAME: &CStr = c"UglyEngine";

/// Creates the Vulkan instance described by `config`.
///
/// When validation is enabled every requested layer must be installed, the
/// debug-utils extension is appended to `platform_extensions`, and a debug
/// messenger create info is chained so instance creation and destruction are
/// validated too.
pub fn create_instance(
    entry: &Entry,
    config: &DeviceConfig,
    platform_extensions: &[&'static CStr],
) -> RhiResult<ash::Instance> {
    info!("Validation layers enabled: {}", config.enable_validation);

    if config.enable_validation {
        let available = unsafe { entry.enumerate_instance_layer_properties()? };
        let missing = missing_layers(&config.validation_layers, &available);
        if !missing.is_empty() {
            error!("Validation layers are active but not available");
            return Err(RhiError::MissingValidationLayers(
                missing.iter().map(|l| l.to_string_lossy().into_owned()).collect(),
            ));
        }
    }

    let application_name = CString::new(config.application_name.replace('\0', "")).unwrap_or_default();
    let (major, minor, patch) = config.application_version;
    let app_info = vk::ApplicationInfo::default()
        .application_name(&application_name)
        .application_version(vk::make_api_version(0, major, minor, patch))
        .engine_name(ENGINE_NAME)
        .engine_version(vk::make_api_version(
            0,
            version::VERSION_MAJOR,
            version::VERSION_MINOR,
            version::VERSION_PATCH,
        ))
        .api_version(vk::API_VERSION_1_0);

    let extensions = required_extensions(platform_extensions, config.enable_validation);
    let extension_names: Vec<*const c_char> = extensions.iter().map(|e| e.as_ptr()).collect();
    let layer_names = enabled_layer_names(config);

    log_available_extensions(entry);

    let mut debug_info = debug_messenger_create_info();
    let mut create_info = vk::InstanceCreateInfo::default()
        .application_info(&app_info)
        .enabled_extension_names(&extension_names)
        .enabled_layer_names(&layer_names);
    if config.enable_validation {
        create_info = create_info.push_next(&mut debug_info);
    }

    let instance = unsafe {
        entry.create_instance(&create_info, None).map_err(|e| {
            error!("Failed to create vulkan instance");
            RhiError::from(e)
        })?
    };

    info!(
        "Vulkan instance created with {} extension(s) and {} layer(s)",
        extension_names.len(),
        layer_names.len()
    );

    Ok(instance)
}

/// Registers the validation message callback on `instance`.
pub fn create_debug_messenger(
    entry: &Entry,
    instance: &ash::Instance,
) -> RhiResult<(ash::ext::debug_utils::Instance, vk::DebugUtilsMessengerEXT)> {
    let debug_utils = ash::ext::debug_utils::Instance::new(entry, instance);
    let create_info = debug_messenger_create_info();

    let messenger = unsafe {
        debug_utils
            .create_debug_utils_messenger(&create_info, None)
            .map_err(|e| {
                error!("Failed to create debug messenger");
                RhiError::from(e)
            })?
    };

    info!("Debug messenger created successfully");
    Ok((debug_utils, messenger))
}

/// Layers to enable on the instance and device, empty unless validation is on.
pub fn enabled_layer_names(config: &DeviceConfig) -> Vec<*const c_char> {
    if config.enable_validation {
        config.validation_layers.iter().map(|l| l.as_ptr()).collect()
    } else {
        Vec::new()
    }
}

/// Platform surface extensions plus debug-utils when validation is enabled.
pub fn required_extensions(
    platform_extensions: &[&'static CStr],
    enable_validation: bool,
) -> Vec<&'static CStr> {
    let mut extensions = platform_extensions.to_vec();
    if enable_validation {
        extensions.push(ash::ext::debug_utils::NAME);
    }
    extensions
}

/// Requested layers absent from `available`, in request order.
pub fn missing_layers<'a>(
    requested: &'a [CString],
    available: &[vk::LayerProperties],
) -> Vec<&'a CStr> {
    requested
        .iter()
        .map(CString::as_c_str)
        .filter(|wanted| {
            !available
                .iter()
                .any(|layer| layer.layer_name_as_c_str().is_ok_and(|name| name == *wanted))
        })
        .collect()
}

/// Messenger settings shared by the instance chain and the standalone messenger.
pub fn debug_messenger_create_info<'a>() -> vk::DebugUtilsMessengerCreateInfoEXT<'a> {
    vk::DebugUtilsMessengerCreateInfoEXT::default()
        .message_severity(
            vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE
                | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
        )
        .message_type(
            vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
        )
        .pfn_user_callback(Some(debug_callback))
}

fn log_available_extensions(entry: &Entry) {
    match unsafe { entry.enumerate_instance_extension_properties(None) } {
        Ok(available) => log_extension_names(
            available
                .iter()
                .filter_map(|extension| extension.extension_name_as_c_str().ok()),
        ),
        Err(e) => warn!("Could not enumerate instance extensions: {}", e),
    }
}

fn log_extension_names<'a>(names: impl IntoIterator<Item = &'a CStr>) {
    info!("Available extensions:");
    for name in names {
        info!("\t - {}", name.to_string_lossy());
    }
}

fn severity_name(severity: vk::DebugUtilsMessageSeverityFlagsEXT) -> &'static str {
    match severity {
        vk::DebugUtilsMessageSeverityFlagsEXT::ERROR => "Error",
        vk::DebugUtilsMessageSeverityFlagsEXT::WARNING => "Warning",
        vk::DebugUtilsMessageSeverityFlagsEXT::INFO => "Info",
        vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE => "Verbose",
        _ => "Unknown",
    }
}

fn type_name(message_type: vk::DebugUtilsMessageTypeFlagsEXT) -> &'static str {
    match message_type {
        vk::DebugUtilsMessageTypeFlagsEXT::GENERAL => "General",
        vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION => "Validation",
        vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE => "Performance",
        _ => "Unknown",
    }
}

/// Debug callback function for validation layer messages.
///
/// Every message goes to the error log regardless of severity.
///
/// # Safety
///
/// This function is called from the Vulkan driver and must follow the
/// Vulkan specification for debug callbacks.
unsafe extern "system" fn debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT<'_>,
    _user_data: *mut std::ffi::c_void,
) -> vk::Bool32 {
    if p_callback_data.is_null() {
        return vk::FALSE;
    }

    let callback_data = unsafe { &*p_callback_data };
    let message = if callback_data.p_message.is_null() {
        Cow::Borrowed("(no message)")
    } else {
        unsafe { CStr::from_ptr(callback_data.p_message).to_string_lossy() }
    };

    error!(
        "validation layer [{} {}]: {}",
        severity_name(message_severity),
        type_name(message_type),
        message
    );

    // Returning VK_FALSE indicates the call should not be aborted
    vk::FALSE
}
