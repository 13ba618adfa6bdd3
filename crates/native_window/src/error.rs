//! Window subsystem errors

use thiserror::Error;

/// Window subsystem errors
///
/// Only recoverable failures live here. Precondition violations (stale window
/// ids, out-of-range key codes, querying a proc address with no current
/// context) are programmer errors and panic instead.
#[derive(Error, Debug)]
pub enum WindowError {
    /// Host platform setup failed during initialization
    #[error("Initialization failed: {0}")]
    Initialization(String),

    /// An operation that needs an initialized system was called before `initialize`
    #[error("Window system is not initialized")]
    NotInitialized,

    /// The host could not materialize the window surface
    #[error("Window creation failed: {0}")]
    WindowCreation(String),

    /// The host could not create a rendering context for a surface
    #[error("Context creation failed: {0}")]
    ContextCreation(String),

    /// Any other host platform failure
    #[error("Platform error: {0}")]
    Platform(String),
}

/// Result alias used throughout the window subsystem
pub type WindowResult<T> = Result<T, WindowError>;
