//! Thread-local "current context" slot
//!
//! Each thread remembers, per window system, at most one window whose
//! rendering context is current on it. Bindings are keyed by the slot id of
//! the owning system, hold a plain [`WindowId`] that never owns the window,
//! and are validated against the registry on every lookup.
//!
//! A slot gets a fresh id every time it is allocated. Bindings left behind on
//! other threads by an earlier allocation are therefore never found again,
//! and two systems sharing a thread never see each other's binding.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::window::WindowId;

static NEXT_SLOT_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static CURRENT: RefCell<HashMap<u64, WindowId>> = RefCell::new(HashMap::new());
}

/// Handle to the per-thread current-context binding of one window system
#[derive(Debug, Default)]
pub struct ContextSlot {
    id: Option<u64>,
}

impl ContextSlot {
    /// A slot that has not been allocated yet
    pub const fn unallocated() -> Self {
        Self { id: None }
    }

    /// Allocate the slot under a fresh id
    ///
    /// # Panics
    /// Panics if the slot is already allocated.
    pub fn allocate(&mut self) {
        assert!(self.id.is_none(), "context slot allocated twice");
        let id = NEXT_SLOT_ID.fetch_add(1, Ordering::Relaxed);
        log::trace!("Allocated context slot {id}");
        self.id = Some(id);
    }

    /// Release the slot, dropping the calling thread's binding
    pub fn release(&mut self) {
        if let Some(id) = self.id.take() {
            CURRENT.with(|current| current.borrow_mut().remove(&id));
            log::trace!("Released context slot {id}");
        }
    }

    /// Whether the slot is allocated
    pub fn is_allocated(&self) -> bool {
        self.id.is_some()
    }

    /// Window this slot has current on the calling thread
    pub fn get(&self) -> Option<WindowId> {
        let id = self.id?;
        CURRENT.with(|current| current.borrow().get(&id).copied())
    }

    /// Bind `window` (or nothing) to the calling thread
    ///
    /// Does nothing on an unallocated slot.
    pub fn set(&self, window: Option<WindowId>) {
        let Some(id) = self.id else {
            return;
        };
        CURRENT.with(|current| {
            let mut current = current.borrow_mut();
            match window {
                Some(window) => current.insert(id, window),
                None => current.remove(&id),
            };
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn window_ids(count: usize) -> Vec<WindowId> {
        let mut map: SlotMap<WindowId, ()> = SlotMap::with_key();
        (0..count).map(|_| map.insert(())).collect()
    }

    #[test]
    fn test_unallocated_slot_is_inert() {
        let slot = ContextSlot::unallocated();
        let ids = window_ids(1);
        slot.set(Some(ids[0]));
        assert_eq!(slot.get(), None);
        assert!(!slot.is_allocated());
    }

    #[test]
    fn test_set_replaces_previous_binding() {
        let mut slot = ContextSlot::unallocated();
        slot.allocate();
        let ids = window_ids(2);

        slot.set(Some(ids[0]));
        assert_eq!(slot.get(), Some(ids[0]));
        slot.set(Some(ids[1]));
        assert_eq!(slot.get(), Some(ids[1]));
        slot.set(None);
        assert_eq!(slot.get(), None);

        slot.release();
    }

    #[test]
    fn test_binding_is_per_thread() {
        let mut slot = ContextSlot::unallocated();
        slot.allocate();
        let ids = window_ids(2);
        slot.set(Some(ids[0]));

        let slot = std::sync::Arc::new(slot);
        let other = std::sync::Arc::clone(&slot);
        let other_id = ids[1];
        let seen_on_other = std::thread::spawn(move || {
            let before = other.get();
            other.set(Some(other_id));
            (before, other.get())
        })
        .join()
        .unwrap();

        assert_eq!(seen_on_other, (None, Some(ids[1])));
        assert_eq!(slot.get(), Some(ids[0]));
    }

    #[test]
    fn test_reallocation_invalidates_old_bindings() {
        let mut slot = ContextSlot::unallocated();
        slot.allocate();
        let ids = window_ids(1);
        slot.set(Some(ids[0]));

        let mut other = ContextSlot::unallocated();
        other.allocate();
        assert_eq!(other.get(), None);

        slot.release();
        slot.allocate();
        assert_eq!(slot.get(), None);
        slot.release();
        other.release();
    }

    #[test]
    fn test_slots_on_one_thread_keep_separate_bindings() {
        let mut first = ContextSlot::unallocated();
        let mut second = ContextSlot::unallocated();
        first.allocate();
        second.allocate();
        let ids = window_ids(2);

        first.set(Some(ids[0]));
        second.set(Some(ids[1]));
        assert_eq!(first.get(), Some(ids[0]));
        assert_eq!(second.get(), Some(ids[1]));

        second.set(None);
        assert_eq!(first.get(), Some(ids[0]));

        first.release();
        assert_eq!(first.get(), None);
        second.release();
    }

    #[test]
    #[should_panic(expected = "allocated twice")]
    fn test_double_allocation_panics() {
        let mut slot = ContextSlot::unallocated();
        slot.allocate();
        slot.allocate();
    }
}
