//! Window management using winit.
//!
//! The host drives windowing through the [`WindowSystem`] trait: create one
//! fixed-size window, query the Vulkan instance extensions its surface needs,
//! then present and poll once per frame. [`WinitWindowSystem`] implements it
//! on top of winit's pump-events extension so the host keeps control of its
//! own loop.

use std::ffi::CStr;
use std::time::Duration;

use raw_window_handle::HasDisplayHandle;
use tracing::{debug, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::error::OsError;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowAttributes, WindowId};

use ugly_core::{Error, Result};

use crate::input::{KeyAction, KeySink};

/// Pumps allowed for the platform to deliver `resumed` after startup.
const MAX_CREATION_PUMPS: usize = 8;

/// Windowing layer consumed by the host.
pub trait WindowSystem {
    /// Initialize the window system and open a fixed-size window.
    fn create_window(&mut self, width: u32, height: u32, title: &str) -> Result<()>;

    /// Instance extensions required to create a surface for the window.
    fn required_instance_extensions(&self) -> Result<Vec<&'static CStr>>;

    /// Whether the user asked to close the window.
    fn should_close(&self) -> bool;

    /// Per-frame buffer swap.
    fn present(&mut self);

    /// Process pending events, forwarding key edges to `sink`.
    fn poll_events(&mut self, sink: &mut dyn KeySink);

    fn destroy_window(&mut self);

    /// Tear down the window system itself.
    fn terminate(&mut self);
}

/// [`WindowSystem`] backed by a winit event loop.
#[derive(Default)]
pub struct WinitWindowSystem {
    event_loop: Option<EventLoop<()>>,
    window: Option<Window>,
    close_requested: bool,
}

impl WinitWindowSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a reference to the underlying winit window.
    pub fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

impl WindowSystem for WinitWindowSystem {
    fn create_window(&mut self, width: u32, height: u32, title: &str) -> Result<()> {
        if self.event_loop.is_none() {
            let event_loop = EventLoop::new()
                .map_err(|e| Error::Window(format!("Failed to initialize window system: {}", e)))?;
            event_loop.set_control_flow(ControlFlow::Poll);
            self.event_loop = Some(event_loop);
        }

        info!("Display size: {}*{}", width, height);
        let attrs = Window::default_attributes()
            .with_title(title)
            .with_inner_size(PhysicalSize::new(width, height))
            .with_resizable(false);

        let mut handler = PumpHandler {
            pending_window: Some(attrs),
            creation_error: None,
            window: &mut self.window,
            close_requested: &mut self.close_requested,
            sink: None,
        };

        let Some(event_loop) = self.event_loop.as_mut() else {
            return Err(Error::Window("Window system is not initialized".into()));
        };

        for _ in 0..MAX_CREATION_PUMPS {
            if let PumpStatus::Exit(code) = event_loop.pump_app_events(Some(Duration::ZERO), &mut handler)
            {
                return Err(Error::Window(format!("Event loop exited during window creation ({})", code)));
            }
            if handler.window.is_some() || handler.creation_error.is_some() {
                break;
            }
        }

        if let Some(e) = handler.creation_error {
            return Err(Error::Window(format!("Failed to create window: {}", e)));
        }
        if self.window.is_none() {
            return Err(Error::Window("Window system never became ready".into()));
        }

        info!("Window created: {}x{}", width, height);
        Ok(())
    }

    fn required_instance_extensions(&self) -> Result<Vec<&'static CStr>> {
        let window = self
            .window
            .as_ref()
            .ok_or_else(|| Error::Window("No window created".into()))?;

        let display_handle = window
            .display_handle()
            .map_err(|e| Error::Window(format!("Failed to get display handle: {}", e)))?;

        let extensions = ash_window::enumerate_required_extensions(display_handle.as_raw())
            .map_err(|e| Error::Window(format!("Failed to enumerate required extensions: {}", e)))?;

        // SAFETY: ash_window returns pointers to static, null-terminated
        // extension name constants.
        let extensions: Vec<&'static CStr> = extensions
            .iter()
            .map(|&ext| unsafe { CStr::from_ptr(ext) })
            .collect();

        debug!("Required Vulkan extensions for surface: {:?}", extensions);
        Ok(extensions)
    }

    fn should_close(&self) -> bool {
        self.close_requested
    }

    fn present(&mut self) {
        if let Some(window) = &self.window {
            window.pre_present_notify();
            window.request_redraw();
        }
    }

    fn poll_events(&mut self, sink: &mut dyn KeySink) {
        let Some(event_loop) = self.event_loop.as_mut() else {
            return;
        };

        let mut handler = PumpHandler {
            pending_window: None,
            creation_error: None,
            window: &mut self.window,
            close_requested: &mut self.close_requested,
            sink: Some(sink),
        };

        if let PumpStatus::Exit(code) = event_loop.pump_app_events(Some(Duration::ZERO), &mut handler) {
            warn!("Event loop exited with code {}", code);
            self.close_requested = true;
        }
    }

    fn destroy_window(&mut self) {
        if self.window.take().is_some() {
            info!("Window destroyed");
        }
    }

    fn terminate(&mut self) {
        self.event_loop = None;
        debug!("Window system terminated");
    }
}

/// Event handler borrowed for the duration of one pump.
struct PumpHandler<'a> {
    pending_window: Option<WindowAttributes>,
    creation_error: Option<OsError>,
    window: &'a mut Option<Window>,
    close_requested: &'a mut bool,
    sink: Option<&'a mut dyn KeySink>,
}

impl ApplicationHandler for PumpHandler<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(attrs) = self.pending_window.take() {
            match event_loop.create_window(attrs) {
                Ok(window) => *self.window = Some(window),
                Err(e) => self.creation_error = Some(e),
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested");
                *self.close_requested = true;
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(sink) = self.sink.as_deref_mut()
                    && let Some((key, action)) = translate_key_event(&event)
                {
                    sink.on_key(key, action);
                }
            }
            _ => {}
        }
    }
}

fn translate_key_event(event: &KeyEvent) -> Option<(winit::keyboard::KeyCode, KeyAction)> {
    let PhysicalKey::Code(key) = event.physical_key else {
        return None;
    };
    Some((key, key_action(event.state, event.repeat)))
}

/// Map a winit element state to a key edge.
fn key_action(state: ElementState, repeat: bool) -> KeyAction {
    match state {
        ElementState::Pressed if repeat => KeyAction::Repeat,
        ElementState::Pressed => KeyAction::Press,
        ElementState::Released => KeyAction::Release,
    }
}
