//! Input management: keys, buttons, state tables and the keymap cache

pub mod keymap;
pub mod keys;
pub mod state;

pub use keymap::{KeyboardLayout, Keymap, LayoutEntry, LayoutPreset, UNKNOWN_KEY_NAME};
pub use keys::{Action, Key, Modifiers, MouseButton, KEY_TABLE_SIZE, MOUSE_BUTTON_COUNT};
pub use state::InputState;

/// Whether a text-input codepoint is forwarded to character callbacks
///
/// C0 controls (below 32), DEL and the C1 control block (127..=159) are dropped.
pub const fn is_printable_codepoint(codepoint: u32) -> bool {
    !(codepoint < 32 || (codepoint >= 127 && codepoint < 160))
}
