//! # Native Window
//!
//! A small home-grown window, input and timer layer: window lifecycle, a
//! per-thread "current context" slot, keyboard and mouse state tracking,
//! callback dispatch and a monotonic timer, all on top of a host
//! [`platform::Platform`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use native_window::prelude::*;
//!
//! fn main() -> Result<(), WindowError> {
//!     let (platform, _controller) = HeadlessPlatform::new(&HeadlessConfig::default());
//!     let mut system = WindowSystem::new(platform, SystemConfig::default());
//!     system.initialize()?;
//!
//!     let window = system.create_window(640, 480, "demo")?;
//!     system.set_key_callback(window, Some(Box::new(|_, key, action| {
//!         println!("{key:?} {action:?}");
//!     })));
//!
//!     while !system.window_should_close(window) {
//!         system.poll_events();
//!         system.swap_buffers(window);
//!     }
//!
//!     system.shutdown();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

pub mod config;
pub mod context;
pub mod error;
pub mod input;
pub mod logging;
pub mod platform;
pub mod system;
pub mod time;
pub mod window;

mod events;

#[cfg(test)]
mod tests;

pub use error::{WindowError, WindowResult};
pub use system::WindowSystem;
pub use window::WindowId;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        config::{Config, ContextApi, HeadlessConfig, SystemConfig},
        input::{Action, Key, Modifiers, MouseButton},
        platform::{HeadlessController, HeadlessPlatform, Platform},
        time::FrameTimer,
        window::{Callback, CallbackKind},
        WindowError, WindowId, WindowResult, WindowSystem,
    };
}
