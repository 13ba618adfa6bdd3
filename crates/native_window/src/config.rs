//! # Configuration
//!
//! Serializable settings for the window system and the headless host.
//! Files are loaded through the [`Config`] trait, which picks TOML or RON by
//! file extension.

use serde::{Deserialize, Serialize};

use crate::input::LayoutPreset;
use crate::time::Timebase;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Values that parse but make no sense
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Which kind of rendering context new windows get
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextApi {
    /// An OpenGL-style context with thread-current semantics
    #[default]
    OpenGl,
    /// No context; the surface is presented directly (Metal-style layers)
    None,
}

/// # Window System Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Log filter passed to `env_logger`
    pub log_level: String,
    /// Rendering context attached to new windows
    pub context_api: ContextApi,
    /// Make a new window's context current on the creating thread
    pub make_current_on_create: bool,
}

impl SystemConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            context_api: ContextApi::OpenGl,
            make_current_on_create: true,
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the context kind for new windows
    pub fn with_context_api(mut self, api: ContextApi) -> Self {
        self.context_api = api;
        self
    }

    /// Enable or disable making new contexts current on creation
    pub fn with_make_current_on_create(mut self, enabled: bool) -> Self {
        self.make_current_on_create = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid("log level cannot be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for SystemConfig {}

/// # Headless Host Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlessConfig {
    /// Physical pixels per logical unit
    pub content_scale: f64,
    /// Advance the clock only through the controller
    pub manual_clock: bool,
    /// Tick-to-nanosecond ratio the host reports
    pub timebase: Timebase,
    /// Keyboard layout active at startup
    pub layout: LayoutPreset,
}

impl HeadlessConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self {
            content_scale: 1.0,
            manual_clock: false,
            timebase: Timebase::NANOSECONDS,
            layout: LayoutPreset::UsAnsi,
        }
    }

    /// Set content scale
    pub fn with_content_scale(mut self, scale: f64) -> Self {
        self.content_scale = scale;
        self
    }

    /// Use a manually advanced clock
    pub fn with_manual_clock(mut self, enabled: bool) -> Self {
        self.manual_clock = enabled;
        self
    }

    /// Set the reported timebase
    pub fn with_timebase(mut self, timebase: Timebase) -> Self {
        self.timebase = timebase;
        self
    }

    /// Set the startup keyboard layout
    pub fn with_layout(mut self, layout: LayoutPreset) -> Self {
        self.layout = layout;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.content_scale.is_finite() || self.content_scale <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "content scale must be positive, got {}",
                self.content_scale
            )));
        }
        if self.timebase.nanos_per_tick().is_none() {
            return Err(ConfigError::Invalid("timebase ratio cannot contain zero".to_string()));
        }
        Ok(())
    }
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for HeadlessConfig {}
