//! Per-window input callbacks
//!
//! Each window holds at most one callback per [`CallbackKind`]. Installing a
//! callback hands back the one it replaced so callers can chain to it.

use std::fmt;

use super::WindowId;
use crate::input::{Action, Key, Modifiers, MouseButton};

/// Receives printable text input
pub type CharacterCallback = Box<dyn FnMut(WindowId, char) + Send>;

/// Receives mouse button transitions
pub type MouseButtonCallback = Box<dyn FnMut(WindowId, MouseButton, Action, Modifiers) + Send>;

/// Receives key presses and releases (repeats are not reported)
pub type KeyCallback = Box<dyn FnMut(WindowId, Key, Action) + Send>;

/// Receives scroll offsets
pub type ScrollCallback = Box<dyn FnMut(WindowId, f64, f64) + Send>;

/// The kinds of callback a window can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackKind {
    /// Text input
    Character,
    /// Mouse buttons
    MouseButton,
    /// Keys
    Key,
    /// Scrolling
    Scroll,
}

impl CallbackKind {
    /// Number of callback kinds
    pub const COUNT: usize = 4;

    const fn slot(self) -> usize {
        match self {
            Self::Character => 0,
            Self::MouseButton => 1,
            Self::Key => 2,
            Self::Scroll => 3,
        }
    }
}

/// An installed callback, tagged by kind
pub enum Callback {
    /// Text input callback
    Character(CharacterCallback),
    /// Mouse button callback
    MouseButton(MouseButtonCallback),
    /// Key callback
    Key(KeyCallback),
    /// Scroll callback
    Scroll(ScrollCallback),
}

impl Callback {
    /// Which slot this callback occupies
    pub const fn kind(&self) -> CallbackKind {
        match self {
            Self::Character(_) => CallbackKind::Character,
            Self::MouseButton(_) => CallbackKind::MouseButton,
            Self::Key(_) => CallbackKind::Key,
            Self::Scroll(_) => CallbackKind::Scroll,
        }
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callback").field(&self.kind()).finish()
    }
}

/// Callback slots of one window
#[derive(Default)]
pub struct Callbacks {
    slots: [Option<Callback>; CallbackKind::COUNT],
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let installed: Vec<CallbackKind> = self.slots.iter().flatten().map(Callback::kind).collect();
        f.debug_struct("Callbacks").field("installed", &installed).finish()
    }
}

impl Callbacks {
    /// Install a callback, returning the previous one of the same kind
    pub fn set(&mut self, callback: Callback) -> Option<Callback> {
        self.slots[callback.kind().slot()].replace(callback)
    }

    /// Remove and return the callback of a kind
    pub fn take(&mut self, kind: CallbackKind) -> Option<Callback> {
        self.slots[kind.slot()].take()
    }

    /// Whether a callback of this kind is installed
    pub fn is_set(&self, kind: CallbackKind) -> bool {
        self.slots[kind.slot()].is_some()
    }

    /// Drop every installed callback
    pub fn clear(&mut self) {
        self.slots = Default::default();
    }

    pub(crate) fn emit_character(&mut self, window: WindowId, character: char) {
        if let Some(Callback::Character(callback)) = &mut self.slots[CallbackKind::Character.slot()] {
            callback(window, character);
        }
    }

    pub(crate) fn emit_mouse_button(&mut self, window: WindowId, button: MouseButton, action: Action) {
        if let Some(Callback::MouseButton(callback)) = &mut self.slots[CallbackKind::MouseButton.slot()] {
            callback(window, button, action, Modifiers::empty());
        }
    }

    pub(crate) fn emit_key(&mut self, window: WindowId, key: Key, action: Action) {
        if let Some(Callback::Key(callback)) = &mut self.slots[CallbackKind::Key.slot()] {
            callback(window, key, action);
        }
    }

    pub(crate) fn emit_scroll(&mut self, window: WindowId, dx: f64, dy: f64) {
        if let Some(Callback::Scroll(callback)) = &mut self.slots[CallbackKind::Scroll.slot()] {
            callback(window, dx, dy);
        }
    }
}
