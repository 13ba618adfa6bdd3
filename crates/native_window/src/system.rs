//! Window system lifecycle and public API
//!
//! [`WindowSystem`] owns all state that would otherwise be process-wide: the
//! host platform, the window registry, the current-context slot, the timer
//! calibration and the keymap cache. It is an explicit object rather than a
//! global, so independent systems can coexist.
//!
//! # Preconditions
//! Methods taking a [`WindowId`] for a window that must be alive panic when
//! the id does not resolve. Use [`WindowSystem::window`] to check first.

use crate::config::{ContextApi, SystemConfig};
use crate::context::ContextSlot;
use crate::error::{WindowError, WindowResult};
use crate::events::{dispatch_event, Dispatch};
use crate::input::{Action, Key, Keymap, MouseButton};
use crate::platform::{ContextHandle, DrawableHandle, HostEvent, Platform, ProcAddress, SurfaceDescriptor};
use crate::time::MonotonicTimer;
use crate::window::{
    Callback, CallbackKind, CharacterCallback, KeyCallback, MouseButtonCallback, ScrollCallback,
    Window, WindowId, WindowRegistry,
};

/// The window subsystem
pub struct WindowSystem<P: Platform> {
    platform: P,
    config: SystemConfig,
    initialized: bool,
    registry: WindowRegistry,
    context_slot: ContextSlot,
    timer: Option<MonotonicTimer>,
    keymap: Keymap,
    pending: Vec<HostEvent>,
}

impl<P: Platform> WindowSystem<P> {
    /// Create an uninitialized system on top of a host platform
    pub fn new(platform: P, config: SystemConfig) -> Self {
        Self {
            platform,
            config,
            initialized: false,
            registry: WindowRegistry::new(),
            context_slot: ContextSlot::unallocated(),
            timer: None,
            keymap: Keymap::empty(),
            pending: Vec::new(),
        }
    }

    /// Bring up the host, keymap cache, context slot and timer
    ///
    /// Calling this on an initialized system does nothing. On failure every
    /// step already taken is undone before the error is returned.
    pub fn initialize(&mut self) -> WindowResult<()> {
        if self.initialized {
            return Ok(());
        }

        self.reset();
        if let Err(err) = self.start() {
            log::warn!("Window system initialization failed: {err}");
            self.terminate();
            return Err(err);
        }

        self.initialized = true;
        log::info!(
            "Window system initialized (layout '{}', context api {:?})",
            self.keymap.layout_name(),
            self.config.context_api
        );
        Ok(())
    }

    /// Destroy every window and release the host
    ///
    /// Does nothing if the system is not initialized.
    pub fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }
        if self.registry.is_empty() {
            log::info!("Shutting down window system");
        } else {
            log::info!("Shutting down window system ({} windows open)", self.registry.len());
        }
        self.terminate();
    }

    /// Whether [`WindowSystem::initialize`] has succeeded and no shutdown followed
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn start(&mut self) -> WindowResult<()> {
        self.platform.initialize()?;

        let layout = self.platform.keyboard_layout();
        self.keymap.rebuild(&layout);

        self.context_slot.allocate();

        let timebase = self.platform.timebase();
        let timer = MonotonicTimer::calibrate(timebase, self.platform.ticks()).ok_or_else(|| {
            WindowError::Initialization(format!(
                "host reported an unusable timebase {}/{}",
                timebase.numer, timebase.denom
            ))
        })?;
        self.timer = Some(timer);
        Ok(())
    }

    fn terminate(&mut self) {
        for id in self.registry.ids() {
            self.destroy_window(id);
        }
        self.platform.terminate();
        self.context_slot.release();
        self.reset();
    }

    /// Clears per-run state; the registry keeps its arena so ids from
    /// earlier runs stay dead
    fn reset(&mut self) {
        self.initialized = false;
        self.timer = None;
        self.keymap = Keymap::empty();
        self.pending.clear();
    }

    // ---------------------------------------------------------------------
    // Windows
    // ---------------------------------------------------------------------

    /// Create a window and, for context-backed windows, its rendering context
    ///
    /// With [`SystemConfig::make_current_on_create`] the new context becomes
    /// current on the calling thread.
    pub fn create_window(&mut self, width: u32, height: u32, title: &str) -> WindowResult<WindowId> {
        if !self.initialized {
            return Err(WindowError::NotInitialized);
        }

        let id = self.registry.insert(Window::new(title));
        if let Err(err) = self.attach_host_resources(id, width, height, title) {
            log::warn!("Creating window '{title}' failed: {err}");
            self.destroy_window(id);
            return Err(err);
        }

        let has_context = self.registry.get(id).is_some_and(Window::has_context);
        if has_context && self.config.make_current_on_create {
            self.make_context_current(Some(id));
        }

        log::info!("Created window {id:?} '{title}' ({width}x{height})");
        Ok(id)
    }

    fn attach_host_resources(&mut self, id: WindowId, width: u32, height: u32, title: &str) -> WindowResult<()> {
        let descriptor = SurfaceDescriptor { width, height, title: title.to_string() };
        let surface = self.platform.create_surface(id, &descriptor)?;

        let window = self.live_window_mut(id);
        window.attach_surface(surface);

        if self.config.context_api == ContextApi::OpenGl {
            let window = self.live_window_mut(id);
            let context = match window.surface_mut() {
                Some(surface) => surface.create_context()?,
                None => return Err(WindowError::ContextCreation("window has no surface".to_string())),
            };
            window.attach_context(context);
        }
        Ok(())
    }

    /// Destroy a window
    ///
    /// Returns `false` (and does nothing) if the id no longer resolves.
    pub fn destroy_window(&mut self, id: WindowId) -> bool {
        let Some(window) = self.registry.get_mut(id) else {
            return false;
        };
        window.callbacks_mut().clear();

        if self.context_slot.get() == Some(id) {
            self.make_context_current(None);
        }

        if let Some(mut window) = self.registry.remove(id) {
            window.release();
        }
        log::debug!("Destroyed window {id:?}");
        true
    }

    /// Look up a live window
    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.registry.get(id)
    }

    /// Number of live windows
    pub fn window_count(&self) -> usize {
        self.registry.len()
    }

    /// Ids of every live window
    pub fn window_ids(&self) -> Vec<WindowId> {
        self.registry.ids()
    }

    /// Whether the window's close flag is set
    pub fn window_should_close(&self, id: WindowId) -> bool {
        self.live_window(id).should_close()
    }

    /// Set or clear the window's close flag
    pub fn set_should_close(&mut self, id: WindowId, should_close: bool) {
        self.live_window_mut(id).set_should_close(should_close);
    }

    /// Title the window was created with
    pub fn window_title(&self, id: WindowId) -> &str {
        self.live_window(id).title()
    }

    /// Logical window size; `(0, 0)` if the host query fails
    pub fn window_size(&self, id: WindowId) -> (u32, u32) {
        self.live_window(id).surface().and_then(|surface| surface.size()).unwrap_or((0, 0))
    }

    /// Framebuffer size in physical pixels; `(0, 0)` if the host query fails
    pub fn framebuffer_size(&self, id: WindowId) -> (u32, u32) {
        self.live_window(id)
            .surface()
            .and_then(|surface| surface.framebuffer_size())
            .unwrap_or((0, 0))
    }

    /// Present the window's contents
    pub fn swap_buffers(&mut self, id: WindowId) {
        let window = self.live_window_mut(id);
        if let Some(context) = window.context_mut() {
            context.swap_buffers();
        } else if let Some(surface) = window.surface_mut() {
            surface.present();
        }
    }

    /// Opaque context handle for graphics code, if the window has a context
    pub fn context_handle(&self, id: WindowId) -> Option<ContextHandle> {
        self.live_window(id).context().map(|context| context.handle())
    }

    /// Drawable for the window's next frame
    pub fn current_drawable(&mut self, id: WindowId) -> Option<DrawableHandle> {
        self.live_window_mut(id).surface_mut()?.current_drawable()
    }

    // ---------------------------------------------------------------------
    // Current context
    // ---------------------------------------------------------------------

    /// Make a window's context current on the calling thread, or clear it with `None`
    ///
    /// Whatever was current on this thread is un-set first.
    ///
    /// # Panics
    /// Panics if `window` does not resolve or has no rendering context.
    pub fn make_context_current(&mut self, window: Option<WindowId>) {
        if let Some(id) = window {
            assert!(
                self.live_window(id).has_context(),
                "window {id:?} has no rendering context to make current"
            );
        }

        if let Some(previous) = self.context_slot.get() {
            if let Some(context) = self.registry.get_mut(previous).and_then(|w| w.context_mut()) {
                context.clear_current();
            }
        }

        if let Some(id) = window {
            if let Some(context) = self.live_window_mut(id).context_mut() {
                context.make_current();
            }
        }

        self.context_slot.set(window);
    }

    /// Window whose context is current on the calling thread
    pub fn current_context(&self) -> Option<WindowId> {
        self.context_slot.get().filter(|id| self.registry.contains(*id))
    }

    /// Resolve a rendering-API entry point through the calling thread's current context
    ///
    /// # Panics
    /// Panics if no context is current on the calling thread.
    pub fn get_proc_address(&self, name: &str) -> Option<ProcAddress> {
        let context = self
            .context_slot
            .get()
            .and_then(|id| self.registry.get(id))
            .and_then(Window::context);
        match context {
            Some(context) => context.proc_address(name),
            None => panic!("get_proc_address('{name}') called with no current context on this thread"),
        }
    }

    // ---------------------------------------------------------------------
    // Events and input
    // ---------------------------------------------------------------------

    /// Drain and dispatch every pending host event without blocking
    pub fn poll_events(&mut self) {
        if !self.initialized {
            return;
        }

        let mut events = std::mem::take(&mut self.pending);
        self.platform.poll_events(&mut events);

        for event in events.drain(..) {
            if dispatch_event(&mut self.registry, &self.keymap, event) == Dispatch::LayoutChanged {
                let layout = self.platform.keyboard_layout();
                log::info!("Keyboard layout changed to '{}', rebuilding keymap", layout.name);
                self.keymap.rebuild(&layout);
            }
        }
        self.pending = events;
    }

    /// State of a key on a window
    pub fn key_state(&self, id: WindowId, key: Key) -> Action {
        self.live_window(id).input().key(key)
    }

    /// State of a mouse button on a window
    pub fn mouse_button_state(&self, id: WindowId, button: MouseButton) -> Action {
        self.live_window(id).input().mouse_button(button)
    }

    /// Last cursor position on a window, in surface coordinates
    pub fn mouse_position(&self, id: WindowId) -> (f64, f64) {
        self.live_window(id).input().cursor_position()
    }

    /// Human-readable key name from the keymap cache
    ///
    /// A recognized `key` replaces `scancode` with its canonical scancode.
    pub fn key_name(&self, key: Option<Key>, scancode: u16) -> &str {
        self.keymap.key_name(key, scancode)
    }

    /// Canonical scancode of a key in the active layout
    pub fn key_scancode(&self, key: Key) -> Option<u16> {
        self.keymap.scancode(key)
    }

    /// The keymap cache
    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    // ---------------------------------------------------------------------
    // Callbacks
    // ---------------------------------------------------------------------

    /// Install a callback, returning the previous one of the same kind
    pub fn set_callback(&mut self, id: WindowId, callback: Callback) -> Option<Callback> {
        self.live_window_mut(id).callbacks_mut().set(callback)
    }

    /// Remove the callback of a kind, returning it
    pub fn clear_callback(&mut self, id: WindowId, kind: CallbackKind) -> Option<Callback> {
        self.live_window_mut(id).callbacks_mut().take(kind)
    }

    /// Install or clear the character callback, returning the previous one
    pub fn set_character_callback(
        &mut self,
        id: WindowId,
        callback: Option<CharacterCallback>,
    ) -> Option<CharacterCallback> {
        match self.swap_callback(id, CallbackKind::Character, callback.map(Callback::Character)) {
            Some(Callback::Character(previous)) => Some(previous),
            _ => None,
        }
    }

    /// Install or clear the mouse button callback, returning the previous one
    pub fn set_mouse_button_callback(
        &mut self,
        id: WindowId,
        callback: Option<MouseButtonCallback>,
    ) -> Option<MouseButtonCallback> {
        match self.swap_callback(id, CallbackKind::MouseButton, callback.map(Callback::MouseButton)) {
            Some(Callback::MouseButton(previous)) => Some(previous),
            _ => None,
        }
    }

    /// Install or clear the key callback, returning the previous one
    pub fn set_key_callback(&mut self, id: WindowId, callback: Option<KeyCallback>) -> Option<KeyCallback> {
        match self.swap_callback(id, CallbackKind::Key, callback.map(Callback::Key)) {
            Some(Callback::Key(previous)) => Some(previous),
            _ => None,
        }
    }

    /// Install or clear the scroll callback, returning the previous one
    pub fn set_scroll_callback(
        &mut self,
        id: WindowId,
        callback: Option<ScrollCallback>,
    ) -> Option<ScrollCallback> {
        match self.swap_callback(id, CallbackKind::Scroll, callback.map(Callback::Scroll)) {
            Some(Callback::Scroll(previous)) => Some(previous),
            _ => None,
        }
    }

    fn swap_callback(&mut self, id: WindowId, kind: CallbackKind, callback: Option<Callback>) -> Option<Callback> {
        match callback {
            Some(callback) => self.set_callback(id, callback),
            None => self.clear_callback(id, kind),
        }
    }

    // ---------------------------------------------------------------------
    // Time
    // ---------------------------------------------------------------------

    /// Seconds since initialization from the host's monotonic tick counter
    ///
    /// Returns `0.0` while the system is not initialized.
    pub fn time(&self) -> f64 {
        self.timer.map_or(0.0, |timer| timer.seconds_at(self.platform.ticks()))
    }

    /// The configuration the system was built with
    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    fn live_window(&self, id: WindowId) -> &Window {
        match self.registry.get(id) {
            Some(window) => window,
            None => panic!("invalid or destroyed window handle {id:?}"),
        }
    }

    fn live_window_mut(&mut self, id: WindowId) -> &mut Window {
        match self.registry.get_mut(id) {
            Some(window) => window,
            None => panic!("invalid or destroyed window handle {id:?}"),
        }
    }
}

impl<P: Platform> Drop for WindowSystem<P> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
