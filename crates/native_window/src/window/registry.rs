//! Registry of live windows
//!
//! Windows live in a slot map arena. A [`WindowId`] carries a generation, so
//! an id kept around after `destroy_window` never resolves to a newer window
//! that reused the slot.

use slotmap::SlotMap;

use super::Window;

slotmap::new_key_type! {
    /// Stable handle to a window, issued at creation and invalidated at destruction
    pub struct WindowId;
}

/// Arena holding every live window
#[derive(Debug, Default)]
pub struct WindowRegistry {
    windows: SlotMap<WindowId, Window>,
}

impl WindowRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a window and return its id
    pub fn insert(&mut self, window: Window) -> WindowId {
        self.windows.insert(window)
    }

    /// Unregister a window, handing it back to the caller
    pub fn remove(&mut self, id: WindowId) -> Option<Window> {
        self.windows.remove(id)
    }

    /// Look up a live window
    pub fn get(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(id)
    }

    /// Look up a live window mutably
    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.get_mut(id)
    }

    /// Whether `id` still refers to a live window
    pub fn contains(&self, id: WindowId) -> bool {
        self.windows.contains_key(id)
    }

    /// Number of live windows
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Whether no window is registered
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Snapshot of every live id
    pub fn ids(&self) -> Vec<WindowId> {
        self.windows.keys().collect()
    }
}
