//! Configuration loading traits and types.
//!
//! Handler behaviour that can be decided at deployment time lives in
//! [`HandlerConfig`]. Applications embed it in their own TOML-backed
//! configuration and load the whole file through [`ConfigLoader`].
//!
//! # Usage
//!
//! ```rust,no_run
//! use bailout::config::{ConfigError, ConfigLoader, HandlerConfig};
//! use bailout::Handler;
//! use serde::Deserialize;
//! use std::path::Path;
//!
//! #[derive(Debug, Deserialize)]
//! struct MyAppConfig {
//!     handler: HandlerConfig,
//!     port: u16,
//! }
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = MyAppConfig::load(Path::new("config.toml"))?;
//!     let handler = Handler::from_config(&config.handler)?;
//!     bailout::global::install(handler)?;
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Error type for configuration loading and handler installation.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// The process-wide handler was already installed or already used.
    #[error("Process-wide handler is already installed")]
    AlreadyInstalled,
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, detailed tracing information.
    Trace,
    /// Debug information useful during development.
    Debug,
    /// General information about application operation.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for serious problems.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// What a boundary does with an abort it does not convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Escalation {
    /// Re-raise through the host fault mechanism: the original
    /// [`Abort`](crate::Abort) becomes the payload of an unwinding panic.
    #[default]
    Unwind,
    /// Log the abort and terminate the process.
    Exit,
}

/// Default exit code used by [`Escalation::Exit`].
pub const DEFAULT_EXIT_CODE: u8 = 1;

fn default_exit_code() -> u8 {
    DEFAULT_EXIT_CODE
}

/// Deployment-time handler settings.
///
/// The custom assertion factory is code, not configuration; set it with
/// [`HandlerBuilder::assertion_factory`](crate::HandlerBuilder::assertion_factory).
///
/// # TOML Example
///
/// ```toml
/// [handler]
/// escalation = "exit"
/// exit_code = 70
/// trace = false
/// log_level = "debug"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HandlerConfig {
    /// Policy for aborts a boundary re-raises.
    #[serde(default)]
    pub escalation: Escalation,

    /// Process exit code for [`Escalation::Exit`]. Must be non-zero.
    #[serde(default = "default_exit_code")]
    pub exit_code: u8,

    /// Emit a trace event for every raised abort.
    #[serde(default)]
    pub trace: bool,

    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            escalation: Escalation::default(),
            exit_code: DEFAULT_EXIT_CODE,
            trace: false,
            log_level: LogLevel::default(),
        }
    }
}

impl HandlerConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if:
    /// - `exit_code` is zero (termination would report success)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exit_code == 0 {
            return Err(ConfigError::ValidationError(
                "exit_code must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Trait for loading configuration from TOML files.
///
/// This trait provides a default implementation that works with any type
/// implementing `serde::de::DeserializeOwned`.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Any serde-deserializable struct can be loaded.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
