//! Per-window key and mouse button state tables
//!
//! The tables are written only by the event pump (through the crate-private
//! `record_*` methods) and read by the public query methods.

use super::keys::{Action, Key, MouseButton, KEY_TABLE_SIZE, MOUSE_BUTTON_COUNT};

/// Outcome of recording a key event against the current table state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyTransition {
    /// The key went from released to pressed
    Pressed,
    /// The key went from pressed to released
    Released,
    /// A press arrived while the key was already pressed
    Repeat,
    /// A release arrived while the key was already released
    Ignored,
}

impl KeyTransition {
    /// Whether the key callback should hear about this transition
    pub(crate) const fn is_visible(self) -> bool {
        matches!(self, Self::Pressed | Self::Released)
    }
}

/// Last-known input state of one window
#[derive(Debug, Clone)]
pub struct InputState {
    keys: [Action; KEY_TABLE_SIZE],
    mouse_buttons: [Action; MOUSE_BUTTON_COUNT],
    cursor: (f64, f64),
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    /// Create a table with every key and button released
    pub fn new() -> Self {
        Self {
            keys: [Action::Release; KEY_TABLE_SIZE],
            mouse_buttons: [Action::Release; MOUSE_BUTTON_COUNT],
            cursor: (0.0, 0.0),
        }
    }

    /// State of a logical key
    pub fn key(&self, key: Key) -> Action {
        self.keys[usize::from(key.code())]
    }

    /// State of a key by numeric code
    ///
    /// # Panics
    /// Panics if `code` is outside `Key::FIRST..=Key::LAST`.
    pub fn key_raw(&self, code: u16) -> Action {
        assert!(
            Key::in_range(code),
            "key code {code} outside supported range {}..={}",
            Key::FIRST,
            Key::LAST
        );
        self.keys[usize::from(code)]
    }

    /// State of a mouse button
    pub fn mouse_button(&self, button: MouseButton) -> Action {
        self.mouse_buttons[button.index()]
    }

    /// State of a mouse button by raw index
    ///
    /// # Panics
    /// Panics if `index` is not 0, 1 or 2.
    pub fn mouse_button_raw(&self, index: i32) -> Action {
        match MouseButton::from_index(index) {
            Some(button) => self.mouse_button(button),
            None => panic!("mouse button index {index} outside supported range 0..=2"),
        }
    }

    /// Last cursor position in surface coordinates
    pub fn cursor_position(&self) -> (f64, f64) {
        self.cursor
    }

    pub(crate) fn record_key(&mut self, key: Key, action: Action) -> KeyTransition {
        let slot = &mut self.keys[usize::from(key.code())];
        let transition = match (*slot, action) {
            (Action::Release, Action::Release) => return KeyTransition::Ignored,
            (Action::Press, Action::Press) => KeyTransition::Repeat,
            (_, Action::Press) => KeyTransition::Pressed,
            (_, Action::Release) => KeyTransition::Released,
        };
        *slot = action;
        transition
    }

    pub(crate) fn record_mouse_button(&mut self, button: MouseButton, action: Action) {
        self.mouse_buttons[button.index()] = action;
    }

    pub(crate) fn record_cursor(&mut self, x: f64, y: f64) {
        self.cursor = (x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_table_is_released() {
        let state = InputState::new();
        for key in Key::ALL {
            assert_eq!(state.key(key), Action::Release);
        }
        for button in MouseButton::ALL {
            assert_eq!(state.mouse_button(button), Action::Release);
        }
        assert_eq!(state.cursor_position(), (0.0, 0.0));
    }

    #[test]
    fn test_press_release_transitions() {
        let mut state = InputState::new();

        assert_eq!(state.record_key(Key::W, Action::Press), KeyTransition::Pressed);
        assert_eq!(state.key(Key::W), Action::Press);

        assert_eq!(state.record_key(Key::W, Action::Press), KeyTransition::Repeat);
        assert_eq!(state.key(Key::W), Action::Press);

        assert_eq!(state.record_key(Key::W, Action::Release), KeyTransition::Released);
        assert_eq!(state.key(Key::W), Action::Release);

        assert_eq!(state.record_key(Key::W, Action::Release), KeyTransition::Ignored);
        assert_eq!(state.key(Key::W), Action::Release);
    }

    #[test]
    fn test_transition_visibility() {
        assert!(KeyTransition::Pressed.is_visible());
        assert!(KeyTransition::Released.is_visible());
        assert!(!KeyTransition::Repeat.is_visible());
        assert!(!KeyTransition::Ignored.is_visible());
    }

    #[test]
    fn test_raw_key_lookup_matches_typed() {
        let mut state = InputState::new();
        state.record_key(Key::RightControl, Action::Press);
        assert_eq!(state.key_raw(403), Action::Press);
        assert_eq!(state.key_raw(32), Action::Release);
    }

    #[test]
    #[should_panic(expected = "outside supported range")]
    fn test_raw_key_out_of_range_panics() {
        InputState::new().key_raw(404);
    }

    #[test]
    fn test_mouse_button_reflects_latest_event() {
        let mut state = InputState::new();
        state.record_mouse_button(MouseButton::Middle, Action::Press);
        assert_eq!(state.mouse_button_raw(2), Action::Press);
        state.record_mouse_button(MouseButton::Middle, Action::Release);
        assert_eq!(state.mouse_button_raw(2), Action::Release);
    }

    #[test]
    #[should_panic(expected = "outside supported range 0..=2")]
    fn test_mouse_button_out_of_range_panics() {
        InputState::new().mouse_button_raw(3);
    }

    #[test]
    fn test_cursor_position() {
        let mut state = InputState::new();
        state.record_cursor(12.5, -3.25);
        assert_eq!(state.cursor_position(), (12.5, -3.25));
    }
}
