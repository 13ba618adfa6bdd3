//! Event pump dispatch
//!
//! Routes one [`HostEvent`] into the owning window's state tables and
//! callbacks. Polling the host and rebuilding the keymap live in
//! [`crate::WindowSystem::poll_events`]; this module only decides what each
//! event does to a window.

use crate::input::{is_printable_codepoint, Keymap, MouseButton};
use crate::platform::HostEvent;
use crate::window::{WindowId, WindowRegistry};

/// What the pump did with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dispatch {
    /// Applied to a live window
    Handled,
    /// Filtered out or addressed to a window that no longer exists
    Dropped,
    /// The keymap cache must be rebuilt
    LayoutChanged,
}

/// Apply one host event
pub(crate) fn dispatch_event(registry: &mut WindowRegistry, keymap: &Keymap, event: HostEvent) -> Dispatch {
    let Some(id) = event.window() else {
        return Dispatch::LayoutChanged;
    };
    let Some(window) = registry.get_mut(id) else {
        log::trace!("Dropping {event:?} for destroyed window {id:?}");
        return Dispatch::Dropped;
    };

    match event {
        HostEvent::Key { scancode, action, .. } => {
            let Some(key) = keymap.translate(scancode) else {
                log::trace!("Ignoring unmapped scancode {scancode:#x}");
                return Dispatch::Dropped;
            };
            let transition = window.input_mut().record_key(key, action);
            if transition.is_visible() {
                window.callbacks_mut().emit_key(id, key, action);
            }
        }
        HostEvent::Character { codepoint, plain, .. } => {
            if !is_printable_codepoint(codepoint) || !plain {
                return Dispatch::Dropped;
            }
            let Some(character) = char::from_u32(codepoint) else {
                return Dispatch::Dropped;
            };
            window.callbacks_mut().emit_character(id, character);
        }
        HostEvent::MouseButton { button, action, .. } => {
            let Some(button) = MouseButton::from_index(button) else {
                return Dispatch::Dropped;
            };
            window.input_mut().record_mouse_button(button, action);
            window.callbacks_mut().emit_mouse_button(id, button, action);
        }
        HostEvent::CursorMoved { x, y, .. } => {
            window.input_mut().record_cursor(x, y);
        }
        HostEvent::Scroll { dx, dy, .. } => {
            window.callbacks_mut().emit_scroll(id, dx, dy);
        }
        HostEvent::CloseRequested { .. } => {
            log::debug!("Close requested for window {id:?}");
            window.set_should_close(true);
        }
        HostEvent::KeyboardLayoutChanged => return Dispatch::LayoutChanged,
    }

    Dispatch::Handled
}
