//! Main host orchestration.
//!
//! # Subsystem order
//!
//! Startup creates, in order:
//! 1. the window
//! 2. the input manager (registers the key hook)
//! 3. the graphics device manager
//! 4. the application
//!
//! and stops at the first failure. Teardown always runs and releases what was
//! built in reverse: application, graphics device, input manager, window,
//! then the window system itself.

use tracing::{error, info};

use ugly_core::{Timer, version};
use ugly_platform::{InputManager, WindowSystem, WinitWindowSystem};
use ugly_rhi::{GraphicsDevice, GraphicsDeviceManager, RhiError};

use crate::application::{Application, Context};
use crate::config::HostConfig;
use crate::error::HostError;

/// Lifecycle position of a [`Host`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostState {
    Created,
    Initializing,
    Running,
    ShuttingDown,
    Terminated,
}

/// Owns every subsystem and drives the frame loop.
///
/// `W` and `G` default to the winit window system and the Vulkan device
/// manager.
pub struct Host<W: WindowSystem = WinitWindowSystem, G: GraphicsDevice = GraphicsDeviceManager> {
    config: HostConfig,
    state: HostState,
    window_system: W,
    window_created: bool,
    input_manager: Option<InputManager>,
    graphics: Option<G>,
    application: Option<Box<dyn Application>>,
    quit: bool,
}

impl Host {
    /// Create a host backed by winit and Vulkan.
    pub fn new(config: HostConfig) -> Self {
        Self::with_window_system(config, WinitWindowSystem::new())
    }
}

impl<W: WindowSystem, G: GraphicsDevice> Host<W, G> {
    /// Create a host over a custom window system.
    pub fn with_window_system(config: HostConfig, window_system: W) -> Self {
        Self {
            config,
            state: HostState::Created,
            window_system,
            window_created: false,
            input_manager: None,
            graphics: None,
            application: None,
            quit: false,
        }
    }

    /// Run `application` until it quits or the window is closed.
    ///
    /// The host takes ownership of the application and drops it during
    /// teardown. A `None` application is rejected before anything is built.
    ///
    /// # Errors
    ///
    /// Returns the first startup stage that failed; see
    /// [`HostError::exit_code`] for the matching status. Subsystems already
    /// built are torn down before returning.
    pub fn run(&mut self, application: Option<Box<dyn Application>>) -> Result<(), HostError> {
        let Some(application) = application else {
            error!("Invalid application");
            return Err(HostError::MissingApplication);
        };

        if self.state != HostState::Created {
            error!("Host cannot run from state {:?}", self.state);
            return Err(HostError::InvalidState);
        }

        info!("----- {} {}", version::ENGINE_NAME, version::VERSION);
        info!("Run application: {}", application.name());
        self.application = Some(application);

        self.state = HostState::Initializing;
        if let Err(e) = self.initialize() {
            error!("Failed to initialize host: {}", e);
            self.shutdown();
            return Err(e);
        }

        self.state = HostState::Running;
        self.main_loop();

        self.shutdown();
        Ok(())
    }

    /// Request the loop to stop at the top of its next iteration.
    pub fn quit(&mut self) {
        self.quit = true;
    }

    #[inline]
    pub fn is_quit_requested(&self) -> bool {
        self.quit
    }

    #[inline]
    pub fn state(&self) -> HostState {
        self.state
    }

    #[inline]
    pub fn display_size(&self) -> (u32, u32) {
        (self.config.display_width, self.config.display_height)
    }

    pub fn input_manager(&self) -> Option<&InputManager> {
        self.input_manager.as_ref()
    }

    pub fn window_system(&self) -> &W {
        &self.window_system
    }

    fn initialize(&mut self) -> Result<(), HostError> {
        info!("--- Initialize host");

        let title = self
            .application
            .as_ref()
            .map(|app| app.name().to_owned())
            .ok_or(HostError::MissingApplication)?;
        let (width, height) = self.display_size();

        self.window_system
            .create_window(width, height, &title)
            .map_err(HostError::Window)?;
        self.window_created = true;

        let input = self.input_manager.insert(InputManager::new());
        input.initialize().map_err(HostError::Input)?;

        let mut device_config = self.config.device.clone();
        device_config.application_name = title;
        let graphics = self.graphics.insert(G::new(&device_config));
        let extensions = self
            .window_system
            .required_instance_extensions()
            .map_err(|e| RhiError::PlatformExtensions(e.to_string()))?;
        graphics.initialize(&extensions)?;

        let display_size = self.display_size();
        let (Some(app), Some(input)) = (self.application.as_mut(), self.input_manager.as_mut())
        else {
            return Err(HostError::InvalidState);
        };
        let mut ctx = Context::new(input, &mut self.quit, display_size);
        app.initialize(&mut ctx).map_err(HostError::Application)?;

        info!("Initialization complete, entering main loop");
        Ok(())
    }

    fn main_loop(&mut self) {
        let display_size = self.display_size();
        let (Some(app), Some(input)) = (self.application.as_mut(), self.input_manager.as_mut())
        else {
            return;
        };

        let mut timer = Timer::new();
        while !self.quit && !self.window_system.should_close() {
            app.update(&mut Context::new(input, &mut self.quit, display_size));
            input.update();

            self.window_system.present();
            self.window_system.poll_events(input);
            timer.tick();
        }

        info!(
            "Main loop finished after {} frame(s) in {:.2} s, {:.3} ms/frame average",
            timer.frame_count(),
            timer.elapsed().as_secs_f64(),
            timer.average_frame_time().as_secs_f64() * 1000.0
        );
    }

    fn shutdown(&mut self) {
        self.state = HostState::ShuttingDown;

        if let Some(mut application) = self.application.take() {
            application.shutdown();
        }

        if let Some(mut graphics) = self.graphics.take() {
            graphics.shutdown();
        }

        if let Some(mut input) = self.input_manager.take() {
            input.shutdown();
        }

        info!("--- Shutdown host");
        if self.window_created {
            self.window_system.destroy_window();
            self.window_created = false;
        }
        self.window_system.terminate();

        self.state = HostState::Terminated;
    }
}
