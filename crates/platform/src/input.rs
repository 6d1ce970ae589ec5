//! Named input buttons driven by keyboard events.
//!
//! The [`InputManager`] owns a registry of [`InputButton`]s and a map from
//! physical keys to button names. Key events delivered by the window system
//! update level state and record a one-frame action; [`InputManager::update`]
//! decays those actions once per frame.

use std::collections::HashMap;

use tracing::{debug, error, info, warn};

pub use winit::keyboard::KeyCode;

use ugly_core::Result;

use crate::button::{ButtonAction, ButtonState, InputButton};

/// Raw key edge reported by the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Press,
    Repeat,
    Release,
}

/// Receiver for key events, invoked synchronously from inside
/// [`WindowSystem::poll_events`](crate::WindowSystem::poll_events).
pub trait KeySink {
    fn on_key(&mut self, key: KeyCode, action: KeyAction);
}

/// Registry of input buttons and key bindings.
#[derive(Debug, Default)]
pub struct InputManager {
    buttons: HashMap<String, InputButton>,
    key_bindings: HashMap<KeyCode, String>,
    hooked: bool,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the key hook. After this the manager accepts key events
    /// forwarded by the host's poll call.
    pub fn initialize(&mut self) -> Result<()> {
        info!("Initialize input manager...");
        self.hooked = true;
        Ok(())
    }

    pub fn shutdown(&mut self) {
        info!("Shutdown input manager...");
        self.hooked = false;
    }

    /// Whether [`initialize`](Self::initialize) registered the key hook.
    #[inline]
    pub fn is_hooked(&self) -> bool {
        self.hooked
    }

    /// Decay every pending action back to [`ButtonAction::None`].
    ///
    /// Must run once per frame, after event processing and before the next
    /// poll, so a single physical edge is visible for exactly one frame.
    pub fn update(&mut self) {
        for (name, button) in self.buttons.iter_mut() {
            if button.action() != ButtonAction::None {
                debug!("Button: {} action is set to NONE", name);
                button.set_action(ButtonAction::None);
            }
        }
    }

    /// Apply a key edge to the button bound to `key`. Unbound keys are ignored.
    pub fn process_key_change(&mut self, key: KeyCode, action: KeyAction) {
        let Some(name) = self.key_bindings.get(&key) else {
            return;
        };
        let Some(button) = self.buttons.get_mut(name) else {
            return;
        };

        match action {
            KeyAction::Press => {
                debug!("Button: {} is pressed", name);
                button.set_state(ButtonState::Pressed);
                button.set_action(ButtonAction::Pressed);
            }
            KeyAction::Repeat => {
                debug!("Button: {} is repeated", name);
                button.set_action(ButtonAction::Repeated);
            }
            KeyAction::Release => {
                debug!("Button: {} is released", name);
                button.set_state(ButtonState::Released);
                button.set_action(ButtonAction::Released);
            }
        }
    }

    /// Create a button. Creating an existing button logs an error and
    /// leaves it untouched.
    pub fn create_button(&mut self, name: &str) {
        info!("Create input button: {}", name);

        if self.buttons.contains_key(name) {
            error!("Trying to create a button already existing: {}", name);
            return;
        }

        self.buttons.insert(name.to_owned(), InputButton::new());
    }

    /// Bind `key` to the button `name`, creating the button if needed.
    ///
    /// The first binding of a key wins; later attempts are logged and ignored.
    pub fn bind_key_to_button(&mut self, key: KeyCode, name: &str) {
        info!("Bind key: {:?} to input button: {}", key, name);

        if let Some(bound) = self.key_bindings.get(&key) {
            error!("Key is already bound to button: {}", bound);
            return;
        }

        if !self.buttons.contains_key(name) {
            error!("Button: {} not found. Creating it", name);
            self.create_button(name);
        }

        self.key_bindings.insert(key, name.to_owned());
    }

    /// Current level state of `name`, creating the button if it is unknown.
    pub fn button_state(&mut self, name: &str) -> ButtonState {
        self.button_or_create(name).state()
    }

    /// Action recorded this frame for `name`, creating the button if it is unknown.
    pub fn button_action(&mut self, name: &str) -> ButtonAction {
        self.button_or_create(name).action()
    }

    /// Look up a button without creating it.
    pub fn button(&self, name: &str) -> Option<&InputButton> {
        self.buttons.get(name)
    }

    /// Name of the button bound to `key`, if any.
    pub fn bound_button(&self, key: KeyCode) -> Option<&str> {
        self.key_bindings.get(&key).map(String::as_str)
    }

    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    fn button_or_create(&mut self, name: &str) -> &InputButton {
        if !self.buttons.contains_key(name) {
            warn!("InputButton: {} not found.", name);
            self.create_button(name);
        }
        &self.buttons[name]
    }
}

impl KeySink for InputManager {
    fn on_key(&mut self, key: KeyCode, action: KeyAction) {
        if self.hooked {
            self.process_key_change(key, action);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> InputManager {
        let mut input = InputManager::new();
        input.initialize().unwrap();
        input
    }

    #[test]
    fn test_create_button_defaults() {
        let mut input = manager();
        input.create_button("jump");

        let button = input.button("jump").unwrap();
        assert_eq!(button.state(), ButtonState::Released);
        assert_eq!(button.action(), ButtonAction::None);
    }

    #[test]
    fn test_create_button_twice_keeps_existing_state() {
        let mut input = manager();
        input.bind_key_to_button(KeyCode::Space, "jump");
        input.process_key_change(KeyCode::Space, KeyAction::Press);

        input.create_button("jump");

        assert_eq!(input.button_count(), 1);
        assert_eq!(input.button_state("jump"), ButtonState::Pressed);
        assert_eq!(input.button_action("jump"), ButtonAction::Pressed);
    }

    #[test]
    fn test_bind_creates_missing_button() {
        let mut input = manager();
        assert_eq!(input.button_count(), 0);

        input.bind_key_to_button(KeyCode::Escape, "quit");

        assert_eq!(input.button_count(), 1);
        assert_eq!(input.bound_button(KeyCode::Escape), Some("quit"));
        assert_eq!(input.button("quit"), Some(&InputButton::new()));
    }

    #[test]
    fn test_bind_existing_button_does_not_duplicate() {
        let mut input = manager();
        input.create_button("fire");
        input.bind_key_to_button(KeyCode::KeyF, "fire");
        input.bind_key_to_button(KeyCode::Enter, "fire");

        assert_eq!(input.button_count(), 1);
        assert_eq!(input.bound_button(KeyCode::KeyF), Some("fire"));
        assert_eq!(input.bound_button(KeyCode::Enter), Some("fire"));
    }

    #[test]
    fn test_rebinding_key_keeps_first_binding() {
        let mut input = manager();
        input.bind_key_to_button(KeyCode::KeyW, "forward");
        input.bind_key_to_button(KeyCode::KeyW, "jump");

        assert_eq!(input.bound_button(KeyCode::KeyW), Some("forward"));

        input.process_key_change(KeyCode::KeyW, KeyAction::Press);
        assert_eq!(input.button_state("forward"), ButtonState::Pressed);
        assert_eq!(input.button_state("jump"), ButtonState::Released);
    }

    #[test]
    fn test_press_update_release_update_cycle() {
        let mut input = manager();
        input.bind_key_to_button(KeyCode::Escape, "quit");

        input.process_key_change(KeyCode::Escape, KeyAction::Press);
        assert_eq!(input.button_state("quit"), ButtonState::Pressed);
        assert_eq!(input.button_action("quit"), ButtonAction::Pressed);

        input.update();
        assert_eq!(input.button_state("quit"), ButtonState::Pressed);
        assert_eq!(input.button_action("quit"), ButtonAction::None);

        input.process_key_change(KeyCode::Escape, KeyAction::Release);
        assert_eq!(input.button_state("quit"), ButtonState::Released);
        assert_eq!(input.button_action("quit"), ButtonAction::Released);

        input.update();
        assert_eq!(input.button_state("quit"), ButtonState::Released);
        assert_eq!(input.button_action("quit"), ButtonAction::None);
    }

    #[test]
    fn test_repeat_only_changes_action() {
        let mut input = manager();
        input.bind_key_to_button(KeyCode::ArrowLeft, "left");

        input.process_key_change(KeyCode::ArrowLeft, KeyAction::Repeat);
        assert_eq!(input.button_state("left"), ButtonState::Released);
        assert_eq!(input.button_action("left"), ButtonAction::Repeated);

        input.process_key_change(KeyCode::ArrowLeft, KeyAction::Press);
        input.update();
        input.process_key_change(KeyCode::ArrowLeft, KeyAction::Repeat);
        assert_eq!(input.button_state("left"), ButtonState::Pressed);
        assert_eq!(input.button_action("left"), ButtonAction::Repeated);
    }

    #[test]
    fn test_update_does_not_touch_idle_buttons() {
        let mut input = manager();
        input.bind_key_to_button(KeyCode::KeyA, "a");
        input.process_key_change(KeyCode::KeyA, KeyAction::Press);
        input.update();
        input.update();

        assert_eq!(input.button_state("a"), ButtonState::Pressed);
        assert_eq!(input.button_action("a"), ButtonAction::None);
    }

    #[test]
    fn test_unbound_key_is_ignored() {
        let mut input = manager();
        input.create_button("quit");

        input.process_key_change(KeyCode::KeyQ, KeyAction::Press);

        assert_eq!(input.button_count(), 1);
        assert_eq!(input.button_action("quit"), ButtonAction::None);
    }

    #[test]
    fn test_query_unknown_button_creates_it() {
        let mut input = manager();

        assert_eq!(input.button_state("missing"), ButtonState::Released);
        assert_eq!(input.button_count(), 1);

        assert_eq!(input.button_action("other"), ButtonAction::None);
        assert_eq!(input.button_count(), 2);
    }

    #[test]
    fn test_sink_ignores_events_until_hooked() {
        let mut input = InputManager::new();
        input.bind_key_to_button(KeyCode::Space, "jump");

        input.on_key(KeyCode::Space, KeyAction::Press);
        assert_eq!(input.button_state("jump"), ButtonState::Released);

        input.initialize().unwrap();
        input.on_key(KeyCode::Space, KeyAction::Press);
        assert_eq!(input.button_state("jump"), ButtonState::Pressed);

        input.shutdown();
        input.on_key(KeyCode::Space, KeyAction::Release);
        assert_eq!(input.button_state("jump"), ButtonState::Pressed);
    }
}
