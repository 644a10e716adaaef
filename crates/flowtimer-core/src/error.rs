//! Core error types for flowtimer-core.
//!
//! Errors fall into three groups: precondition violations the user can fix
//! (shown as a transient notice), internal faults (logged, notice, rollback),
//! and best-effort side-effect failures (cues, rendering, mirror surfaces)
//! which are only logged.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for flowtimer-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A command was rejected because the session is not in a state that allows it
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    /// User input could not be understood
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

impl CoreError {
    /// Errors caused by the user rather than by a fault in the timer.
    pub fn is_user_error(&self) -> bool {
        matches!(self, CoreError::Precondition(_) | CoreError::Validation(_))
    }
}

/// Commands rejected by the accrual engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    /// No break balance available to spend.
    #[error("{0}")]
    InsufficientBreakBalance(String),

    /// Work cannot start while a break runs under strict mutual exclusion.
    #[error("Finish your break before starting work")]
    BreakInProgress,

    /// Pause was toggled with no timer running.
    #[error("Nothing is running to pause")]
    NothingToPause,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Unknown workflow selection
    #[error("Unknown workflow '{0}' (expected classic, extended, deep, custom or W-B)")]
    UnknownWorkflow(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Audio cue playback failure. Never surfaced to the user.
#[derive(Error, Debug)]
pub enum CueError {
    #[error("cue output unavailable: {0}")]
    Unavailable(String),

    #[error("cue playback failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Primary display refresh failure.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("render failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Secondary presentation surface failure.
#[derive(Error, Debug)]
pub enum SurfaceError {
    /// The surface went away between the open check and the write.
    #[error("surface closed")]
    Closed,

    #[error("surface write failed: {0}")]
    Write(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
