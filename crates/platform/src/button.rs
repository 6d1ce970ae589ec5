//! State holder for one logical input control.

/// Level state of a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    /// The button is held down.
    Pressed,
    /// The button is up.
    #[default]
    Released,
}

/// Transition recorded since the last decay pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonAction {
    /// No transition this frame.
    #[default]
    None,
    /// The button was just pressed.
    Pressed,
    /// The button is held and the platform sent a key repeat.
    Repeated,
    /// The button was just released.
    Released,
}

/// Input button.
///
/// The button can be read in two ways:
/// - as a level: is it pressed or released right now
/// - as an action: was it just pressed, repeated or released this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputButton {
    state: ButtonState,
    action: ButtonAction,
}

impl InputButton {
    /// Create a released button with no pending action.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> ButtonState {
        self.state
    }

    #[inline]
    pub fn set_state(&mut self, state: ButtonState) {
        self.state = state;
    }

    #[inline]
    pub fn action(&self) -> ButtonAction {
        self.action
    }

    #[inline]
    pub fn set_action(&mut self, action: ButtonAction) {
        self.action = action;
    }
}
