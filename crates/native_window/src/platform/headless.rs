//! Headless host
//!
//! A simulated window server: surfaces are bookkeeping records, the event
//! queue is filled through a [`HeadlessController`], the keyboard layout and
//! content scale are configurable, and the tick counter is either the real
//! monotonic clock or a manually advanced one.
//!
//! The controller is a cheap, thread-safe clone of the host state, so tests
//! and drivers can keep poking the host after the platform itself has been
//! moved into a [`crate::WindowSystem`].

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use super::{
    ContextHandle, DrawableHandle, HostEvent, Platform, ProcAddress, RenderContext, Surface,
    SurfaceDescriptor,
};
use crate::config::HeadlessConfig;
use crate::error::{WindowError, WindowResult};
use crate::input::{Action, KeyboardLayout};
use crate::time::Timebase;
use crate::window::WindowId;

/// Entry points the headless context can resolve
const KNOWN_PROCS: &[&str] = &[
    "glClear",
    "glClearColor",
    "glViewport",
    "glDrawArrays",
    "glDrawElements",
    "glGenBuffers",
    "glBindBuffer",
    "glBufferData",
    "glCreateShader",
    "glShaderSource",
    "glCompileShader",
    "glCreateProgram",
    "glAttachShader",
    "glLinkProgram",
    "glUseProgram",
    "glGetUniformLocation",
    "glUniformMatrix4fv",
    "glGenVertexArrays",
    "glBindVertexArray",
    "glVertexAttribPointer",
    "glEnableVertexAttribArray",
];

const PROC_BASE_ADDRESS: usize = 0x7000_0000;

/// Bookkeeping for one simulated surface
#[derive(Debug, Clone, PartialEq)]
struct SurfaceRecord {
    width: u32,
    height: u32,
    title: String,
    presented_frames: u64,
    swapped_frames: u64,
    context: Option<u64>,
    context_current: bool,
    drawables_issued: u64,
}

#[derive(Debug)]
enum Clock {
    Real(Instant),
    Manual(u64),
}

#[derive(Debug)]
struct HostState {
    initialized: bool,
    content_scale: f64,
    timebase: Timebase,
    clock: Clock,
    layout: KeyboardLayout,
    queue: VecDeque<HostEvent>,
    surfaces: HashMap<WindowId, SurfaceRecord>,
    next_handle: u64,
    fail_initialize: bool,
    fail_next_surface: bool,
    fail_next_context: bool,
    fail_size_queries: bool,
}

impl HostState {
    fn new(config: &HeadlessConfig) -> Self {
        Self {
            initialized: false,
            content_scale: config.content_scale,
            timebase: config.timebase,
            clock: if config.manual_clock { Clock::Manual(0) } else { Clock::Real(Instant::now()) },
            layout: config.layout.layout(),
            queue: VecDeque::new(),
            surfaces: HashMap::new(),
            next_handle: 1,
            fail_initialize: false,
            fail_next_surface: false,
            fail_next_context: false,
            fail_size_queries: false,
        }
    }

    fn issue_handle(&mut self) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    fn ticks(&self) -> u64 {
        match self.clock {
            Clock::Manual(ticks) => ticks,
            Clock::Real(start) => nanos_to_ticks(start.elapsed(), self.timebase),
        }
    }

    fn scaled(&self, logical: u32) -> u32 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let physical = (f64::from(logical) * self.content_scale).round() as u32;
        physical
    }
}

/// Ticks covering `elapsed`; a timebase with a zero numerator never ticks
fn nanos_to_ticks(elapsed: Duration, timebase: Timebase) -> u64 {
    let scaled = elapsed.as_nanos() * u128::from(timebase.denom);
    scaled
        .checked_div(u128::from(timebase.numer))
        .map_or(0, |ticks| u64::try_from(ticks).unwrap_or(u64::MAX))
}

type SharedHost = Arc<Mutex<HostState>>;

fn lock(host: &SharedHost) -> MutexGuard<'_, HostState> {
    host.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Simulated host platform
#[derive(Debug)]
pub struct HeadlessPlatform {
    host: SharedHost,
}

impl HeadlessPlatform {
    /// Create a headless host and a controller for it
    pub fn new(config: &HeadlessConfig) -> (Self, HeadlessController) {
        let host = Arc::new(Mutex::new(HostState::new(config)));
        let controller = HeadlessController { host: Arc::clone(&host) };
        (Self { host }, controller)
    }

}

impl Platform for HeadlessPlatform {
    fn initialize(&mut self) -> WindowResult<()> {
        let mut host = lock(&self.host);
        if host.fail_initialize {
            return Err(WindowError::Initialization("headless host refused to start".to_string()));
        }
        host.initialized = true;
        log::debug!("Headless host initialized (layout '{}')", host.layout.name);
        Ok(())
    }

    fn terminate(&mut self) {
        let mut host = lock(&self.host);
        host.initialized = false;
        host.queue.clear();
        log::debug!("Headless host terminated");
    }

    fn keyboard_layout(&self) -> KeyboardLayout {
        lock(&self.host).layout.clone()
    }

    fn timebase(&self) -> Timebase {
        lock(&self.host).timebase
    }

    fn ticks(&self) -> u64 {
        lock(&self.host).ticks()
    }

    fn create_surface(
        &mut self,
        window: WindowId,
        descriptor: &SurfaceDescriptor,
    ) -> WindowResult<Box<dyn Surface>> {
        let mut host = lock(&self.host);
        if !host.initialized {
            return Err(WindowError::WindowCreation("headless host is not running".to_string()));
        }
        if std::mem::take(&mut host.fail_next_surface) {
            return Err(WindowError::WindowCreation(format!(
                "headless host refused surface for '{}'",
                descriptor.title
            )));
        }

        host.surfaces.insert(
            window,
            SurfaceRecord {
                width: descriptor.width,
                height: descriptor.height,
                title: descriptor.title.clone(),
                presented_frames: 0,
                swapped_frames: 0,
                context: None,
                context_current: false,
                drawables_issued: 0,
            },
        );

        Ok(Box::new(HeadlessSurface { host: Arc::clone(&self.host), window }))
    }

    fn poll_events(&mut self, events: &mut Vec<HostEvent>) {
        let mut host = lock(&self.host);
        if host.initialized {
            events.extend(host.queue.drain(..));
        }
    }
}

/// Surface record handle held by a window
#[derive(Debug)]
struct HeadlessSurface {
    host: SharedHost,
    window: WindowId,
}

impl Surface for HeadlessSurface {
    fn size(&self) -> Option<(u32, u32)> {
        let host = lock(&self.host);
        if host.fail_size_queries {
            return None;
        }
        host.surfaces.get(&self.window).map(|record| (record.width, record.height))
    }

    fn framebuffer_size(&self) -> Option<(u32, u32)> {
        let host = lock(&self.host);
        if host.fail_size_queries {
            return None;
        }
        host.surfaces
            .get(&self.window)
            .map(|record| (host.scaled(record.width), host.scaled(record.height)))
    }

    fn create_context(&mut self) -> WindowResult<Box<dyn RenderContext>> {
        let mut host = lock(&self.host);
        if std::mem::take(&mut host.fail_next_context) {
            return Err(WindowError::ContextCreation("headless host refused context".to_string()));
        }
        let handle = host.issue_handle();
        let record = host
            .surfaces
            .get_mut(&self.window)
            .ok_or_else(|| WindowError::ContextCreation("surface already destroyed".to_string()))?;
        record.context = Some(handle);

        Ok(Box::new(HeadlessContext { host: Arc::clone(&self.host), window: self.window, handle }))
    }

    fn present(&mut self) {
        if let Some(record) = lock(&self.host).surfaces.get_mut(&self.window) {
            record.presented_frames += 1;
        }
    }

    fn current_drawable(&mut self) -> Option<DrawableHandle> {
        let mut host = lock(&self.host);
        let handle = host.issue_handle();
        let record = host.surfaces.get_mut(&self.window)?;
        record.drawables_issued += 1;
        Some(DrawableHandle(handle))
    }

    fn destroy(&mut self) {
        lock(&self.host).surfaces.remove(&self.window);
    }
}

/// Context record handle held by a window
#[derive(Debug)]
struct HeadlessContext {
    host: SharedHost,
    window: WindowId,
    handle: u64,
}

impl HeadlessContext {
    fn with_record(&self, f: impl FnOnce(&mut SurfaceRecord)) {
        if let Some(record) = lock(&self.host).surfaces.get_mut(&self.window) {
            f(record);
        }
    }
}

impl RenderContext for HeadlessContext {
    fn handle(&self) -> ContextHandle {
        ContextHandle(self.handle)
    }

    fn make_current(&mut self) {
        self.with_record(|record| record.context_current = true);
    }

    fn clear_current(&mut self) {
        self.with_record(|record| record.context_current = false);
    }

    fn swap_buffers(&mut self) {
        self.with_record(|record| record.swapped_frames += 1);
    }

    fn proc_address(&self, name: &str) -> Option<ProcAddress> {
        KNOWN_PROCS
            .iter()
            .position(|known| *known == name)
            .map(|index| ProcAddress(PROC_BASE_ADDRESS + index * 0x10))
    }

    fn destroy(&mut self) {
        self.with_record(|record| {
            record.context = None;
            record.context_current = false;
        });
    }
}

/// Drives a [`HeadlessPlatform`] from the outside
#[derive(Debug, Clone)]
pub struct HeadlessController {
    host: SharedHost,
}

impl HeadlessController {
    /// Queue a raw host event
    pub fn push_event(&self, event: HostEvent) {
        lock(&self.host).queue.push_back(event);
    }

    /// Queue a key event by scancode
    pub fn key(&self, window: WindowId, scancode: u16, action: Action) {
        self.push_event(HostEvent::Key { window, scancode, action });
    }

    /// Queue plain text input
    pub fn text(&self, window: WindowId, text: &str) {
        for character in text.chars() {
            self.codepoint(window, u32::from(character), true);
        }
    }

    /// Queue a single codepoint
    pub fn codepoint(&self, window: WindowId, codepoint: u32, plain: bool) {
        self.push_event(HostEvent::Character { window, codepoint, plain });
    }

    /// Queue a mouse button event by raw index
    pub fn mouse_button(&self, window: WindowId, button: i32, action: Action) {
        self.push_event(HostEvent::MouseButton { window, button, action });
    }

    /// Queue cursor motion
    pub fn cursor(&self, window: WindowId, x: f64, y: f64) {
        self.push_event(HostEvent::CursorMoved { window, x, y });
    }

    /// Queue a scroll
    pub fn scroll(&self, window: WindowId, dx: f64, dy: f64) {
        self.push_event(HostEvent::Scroll { window, dx, dy });
    }

    /// Queue a close request from the window's title bar
    pub fn request_close(&self, window: WindowId) {
        self.push_event(HostEvent::CloseRequested { window });
    }

    /// Switch the active layout and notify the event queue
    pub fn set_layout(&self, layout: KeyboardLayout) {
        let mut host = lock(&self.host);
        host.layout = layout;
        host.queue.push_back(HostEvent::KeyboardLayoutChanged);
    }

    /// Change the display's content scale
    pub fn set_content_scale(&self, scale: f64) {
        lock(&self.host).content_scale = scale;
    }

    /// Resize a surface in logical units
    pub fn resize(&self, window: WindowId, width: u32, height: u32) {
        if let Some(record) = lock(&self.host).surfaces.get_mut(&window) {
            record.width = width;
            record.height = height;
        }
    }

    /// Change the tick ratio reported to the next `initialize`
    pub fn set_timebase(&self, timebase: Timebase) {
        lock(&self.host).timebase = timebase;
    }

    /// Advance a manual clock by raw ticks
    pub fn advance_ticks(&self, ticks: u64) {
        let mut host = lock(&self.host);
        match &mut host.clock {
            Clock::Manual(now) => *now = now.saturating_add(ticks),
            Clock::Real(_) => log::warn!("advance_ticks ignored: headless host uses the real clock"),
        }
    }

    /// Advance a manual clock by a duration
    pub fn advance(&self, elapsed: Duration) {
        let timebase = lock(&self.host).timebase;
        self.advance_ticks(nanos_to_ticks(elapsed, timebase));
    }

    /// Make the next `initialize` fail (or succeed again)
    pub fn fail_initialize(&self, fail: bool) {
        lock(&self.host).fail_initialize = fail;
    }

    /// Make the next surface creation fail
    pub fn fail_next_surface(&self) {
        lock(&self.host).fail_next_surface = true;
    }

    /// Make the next context creation fail
    pub fn fail_next_context(&self) {
        lock(&self.host).fail_next_context = true;
    }

    /// Make size queries fail (or succeed again)
    pub fn fail_size_queries(&self, fail: bool) {
        lock(&self.host).fail_size_queries = fail;
    }

    /// Whether the host is between `initialize` and `terminate`
    pub fn is_initialized(&self) -> bool {
        lock(&self.host).initialized
    }

    /// Number of surfaces still alive on the host
    pub fn surface_count(&self) -> usize {
        lock(&self.host).surfaces.len()
    }

    /// Number of events waiting in the queue
    pub fn pending_events(&self) -> usize {
        lock(&self.host).queue.len()
    }

    /// Title a surface was created with
    pub fn surface_title(&self, window: WindowId) -> Option<String> {
        lock(&self.host).surfaces.get(&window).map(|record| record.title.clone())
    }

    /// Frames presented directly through a surface
    pub fn presented_frames(&self, window: WindowId) -> u64 {
        lock(&self.host).surfaces.get(&window).map_or(0, |record| record.presented_frames)
    }

    /// Frames presented through a surface's context
    pub fn swapped_frames(&self, window: WindowId) -> u64 {
        lock(&self.host).surfaces.get(&window).map_or(0, |record| record.swapped_frames)
    }

    /// Whether the surface's context is bound to some thread
    pub fn is_context_current(&self, window: WindowId) -> bool {
        lock(&self.host).surfaces.get(&window).is_some_and(|record| record.context_current)
    }

    /// Whether the surface still has a context
    pub fn has_context(&self, window: WindowId) -> bool {
        lock(&self.host).surfaces.get(&window).is_some_and(|record| record.context.is_some())
    }
}
