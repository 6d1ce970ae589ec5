//! Application contract and the context handed to it.

use ugly_platform::{ButtonAction, ButtonState, InputManager, KeyCode};

/// Application contract implemented by programs built on the host.
///
/// The host takes ownership of the application in [`Host::run`](crate::Host::run)
/// and calls `initialize` once, `update` once per frame, and `shutdown` once
/// during teardown (even when startup failed before `initialize` ran).
pub trait Application {
    /// Application name, also used as the window title.
    fn name(&self) -> &str;

    /// Register buttons and bindings. An error aborts startup.
    fn initialize(&mut self, ctx: &mut Context<'_>) -> anyhow::Result<()>;

    /// Called once per frame, before input actions decay.
    fn update(&mut self, ctx: &mut Context<'_>);

    fn shutdown(&mut self) {}
}

/// Host services available to the application.
pub struct Context<'a> {
    input: &'a mut InputManager,
    quit: &'a mut bool,
    display_size: (u32, u32),
}

impl<'a> Context<'a> {
    pub(crate) fn new(input: &'a mut InputManager, quit: &'a mut bool, display_size: (u32, u32)) -> Self {
        Self {
            input,
            quit,
            display_size,
        }
    }

    pub fn create_button(&mut self, name: &str) {
        self.input.create_button(name);
    }

    pub fn bind_key_to_button(&mut self, key: KeyCode, name: &str) {
        self.input.bind_key_to_button(key, name);
    }

    pub fn button_state(&mut self, name: &str) -> ButtonState {
        self.input.button_state(name)
    }

    pub fn button_action(&mut self, name: &str) -> ButtonAction {
        self.input.button_action(name)
    }

    /// Ask the host to stop. The current frame still completes.
    pub fn quit(&mut self) {
        *self.quit = true;
    }

    pub fn display_size(&self) -> (u32, u32) {
        self.display_size
    }
}
