//! Host platform boundary
//!
//! This module defines the traits a host window system must implement. The
//! [`crate::WindowSystem`] never talks to an OS API directly; it goes through
//! these traits instead.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────┐
//! │     Application Code            │
//! └─────────────┬───────────────────┘
//!               │ Uses
//!        ┌──────▼───────┐
//!        │ WindowSystem │ ← Public API (system.rs)
//!        └──────┬───────┘
//!               │ Uses
//!      ┌────────▼────────┐
//!      │ Platform        │ ← Host trait (this module)
//!      │ Surface         │
//!      │ RenderContext   │
//!      └────────┬────────┘
//!               │ Implemented by
//!   ┌───────────▼───────────┐
//!   │ headless::Headless*   │ ← Simulated host (headless.rs)
//!   │ OS hosts              │ ← Future backends
//!   └───────────────────────┘
//! ```

pub mod headless;

use crate::error::WindowResult;
use crate::input::{Action, KeyboardLayout};
use crate::time::Timebase;
use crate::window::WindowId;

pub use headless::{HeadlessController, HeadlessPlatform};

/// Opaque address of a rendering-API entry point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcAddress(pub usize);

/// Opaque rendering-context handle handed to graphics code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextHandle(pub u64);

/// Opaque per-frame drawable handle handed to draw-submission code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawableHandle(pub u64);

/// Parameters for materializing a window surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceDescriptor {
    /// Logical width
    pub width: u32,
    /// Logical height
    pub height: u32,
    /// Title bar text
    pub title: String,
}

/// Raw event read from the host event queue
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// A physical key changed state
    Key {
        /// Target window
        window: WindowId,
        /// Host scancode
        scancode: u16,
        /// New state
        action: Action,
    },
    /// Text input produced a codepoint
    Character {
        /// Target window
        window: WindowId,
        /// Unicode codepoint
        codepoint: u32,
        /// False while a dead-key or IME composition is still in progress
        plain: bool,
    },
    /// A mouse button changed state
    MouseButton {
        /// Target window
        window: WindowId,
        /// Raw host button index
        button: i32,
        /// New state
        action: Action,
    },
    /// The cursor moved within a window
    CursorMoved {
        /// Target window
        window: WindowId,
        /// Horizontal position in surface coordinates
        x: f64,
        /// Vertical position in surface coordinates
        y: f64,
    },
    /// Scroll wheel or trackpad scroll
    Scroll {
        /// Target window
        window: WindowId,
        /// Horizontal offset
        dx: f64,
        /// Vertical offset
        dy: f64,
    },
    /// The user asked to close a window
    CloseRequested {
        /// Target window
        window: WindowId,
    },
    /// The active keyboard layout changed
    KeyboardLayoutChanged,
}

impl HostEvent {
    /// Window the event is addressed to, if any
    pub fn window(&self) -> Option<WindowId> {
        match self {
            Self::Key { window, .. }
            | Self::Character { window, .. }
            | Self::MouseButton { window, .. }
            | Self::CursorMoved { window, .. }
            | Self::Scroll { window, .. }
            | Self::CloseRequested { window } => Some(*window),
            Self::KeyboardLayoutChanged => None,
        }
    }
}

/// Host window system
///
/// One `Platform` backs one [`crate::WindowSystem`]. All calls arrive on the
/// thread that owns the system.
///
/// # Thread Safety
/// Hosts must be `Send` so a system can be moved behind a mutex and shared
/// between rendering threads. Event polling still happens on one thread.
pub trait Platform: Send {
    /// Acquire the host event source and any process-wide host state
    ///
    /// Called once per [`crate::WindowSystem::initialize`]. A failure aborts
    /// initialization.
    fn initialize(&mut self) -> WindowResult<()>;

    /// Release everything acquired by [`Platform::initialize`]
    ///
    /// Must tolerate being called after a failed or partial initialization.
    fn terminate(&mut self);

    /// The keyboard layout currently active on the host
    fn keyboard_layout(&self) -> KeyboardLayout;

    /// Ratio converting [`Platform::ticks`] to nanoseconds
    fn timebase(&self) -> Timebase;

    /// Current value of the host's monotonic tick counter
    fn ticks(&self) -> u64;

    /// Materialize the on-screen surface for a window
    fn create_surface(
        &mut self,
        window: WindowId,
        descriptor: &SurfaceDescriptor,
    ) -> WindowResult<Box<dyn Surface>>;

    /// Move every pending host event into `events` without blocking
    fn poll_events(&mut self, events: &mut Vec<HostEvent>);
}

/// Host surface backing one window
pub trait Surface: Send {
    /// Logical size, or `None` if the host query failed
    fn size(&self) -> Option<(u32, u32)>;

    /// Size in physical pixels, or `None` if the host query failed
    ///
    /// Differs from [`Surface::size`] under content scaling.
    fn framebuffer_size(&self) -> Option<(u32, u32)>;

    /// Create a rendering context bound to this surface
    fn create_context(&mut self) -> WindowResult<Box<dyn RenderContext>>;

    /// Present the surface contents (windows without a context)
    fn present(&mut self);

    /// Drawable for the next frame, if the host has one ready
    fn current_drawable(&mut self) -> Option<DrawableHandle>;

    /// Release the host surface
    fn destroy(&mut self);
}

/// Rendering context attached to a surface
///
/// Plays the role of the per-window "make current / swap / destroy / resolve"
/// operation table.
pub trait RenderContext: Send {
    /// Opaque handle for graphics code
    fn handle(&self) -> ContextHandle;

    /// Bind the context to the calling thread
    fn make_current(&mut self);

    /// Unbind the context from the calling thread
    fn clear_current(&mut self);

    /// Present the back buffer; may block on vsync
    fn swap_buffers(&mut self);

    /// Resolve a rendering-API entry point by name
    fn proc_address(&self, name: &str) -> Option<ProcAddress>;

    /// Release the context
    fn destroy(&mut self);
}
