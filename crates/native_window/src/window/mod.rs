//! Window objects
//!
//! A [`Window`] owns its host surface, its optional rendering context, its
//! input state and its callbacks. Applications never hold a `Window`
//! directly; they hold a [`WindowId`] and go through
//! [`crate::WindowSystem`].
//!
//! # Module Organization
//!
//! - **`registry`**: arena of live windows keyed by [`WindowId`]
//! - **`callbacks`**: the per-window callback slots

pub mod callbacks;
pub mod registry;

use std::fmt;

use crate::input::InputState;
use crate::platform::{RenderContext, Surface};

pub use callbacks::{
    Callback, CallbackKind, Callbacks, CharacterCallback, KeyCallback, MouseButtonCallback,
    ScrollCallback,
};
pub use registry::{WindowId, WindowRegistry};

/// One on-screen surface plus its input state
pub struct Window {
    title: String,
    surface: Option<Box<dyn Surface>>,
    context: Option<Box<dyn RenderContext>>,
    input: InputState,
    should_close: bool,
    callbacks: Callbacks,
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("title", &self.title)
            .field("has_surface", &self.surface.is_some())
            .field("has_context", &self.context.is_some())
            .field("should_close", &self.should_close)
            .field("callbacks", &self.callbacks)
            .finish_non_exhaustive()
    }
}

impl Window {
    /// A window with no host resources attached yet
    pub(crate) fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            surface: None,
            context: None,
            input: InputState::new(),
            should_close: false,
            callbacks: Callbacks::default(),
        }
    }

    /// Title the window was created with
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether the close flag is set
    pub fn should_close(&self) -> bool {
        self.should_close
    }

    /// Last-known key, button and cursor state
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Whether a rendering context backs this window
    pub fn has_context(&self) -> bool {
        self.context.is_some()
    }

    /// Whether a callback of this kind is installed
    pub fn has_callback(&self, kind: CallbackKind) -> bool {
        self.callbacks.is_set(kind)
    }

    pub(crate) fn set_should_close(&mut self, should_close: bool) {
        self.should_close = should_close;
    }

    pub(crate) fn attach_surface(&mut self, surface: Box<dyn Surface>) {
        self.surface = Some(surface);
    }

    pub(crate) fn attach_context(&mut self, context: Box<dyn RenderContext>) {
        self.context = Some(context);
    }

    pub(crate) fn surface(&self) -> Option<&dyn Surface> {
        self.surface.as_deref()
    }

    pub(crate) fn surface_mut(&mut self) -> Option<&mut (dyn Surface + 'static)> {
        self.surface.as_deref_mut()
    }

    pub(crate) fn context(&self) -> Option<&dyn RenderContext> {
        self.context.as_deref()
    }

    pub(crate) fn context_mut(&mut self) -> Option<&mut (dyn RenderContext + 'static)> {
        self.context.as_deref_mut()
    }

    pub(crate) fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub(crate) fn callbacks_mut(&mut self) -> &mut Callbacks {
        &mut self.callbacks
    }

    /// Release the context and surface; callbacks go first so none fires mid-teardown
    pub(crate) fn release(&mut self) {
        self.callbacks.clear();
        if let Some(mut context) = self.context.take() {
            context.destroy();
        }
        if let Some(mut surface) = self.surface.take() {
            surface.destroy();
        }
    }
}
