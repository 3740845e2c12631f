//! Error types for Deckhand operations.
//!
//! This module defines [`DeckhandError`], the primary error type used
//! throughout the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `DeckhandError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `DeckhandError::Other`) for unexpected errors
//! - A failing step is never an error: it is an [`ExitStatus`] folded into the
//!   pipeline's running status
//!
//! [`ExitStatus`]: crate::runner::ExitStatus

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for Deckhand operations.
#[derive(Debug, Error)]
pub enum DeckhandError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// Referenced in-process operation does not exist.
    #[error("Unknown operation: {name}")]
    UnknownOperation { name: String },

    /// A validator was invoked with missing or empty arguments.
    #[error("Validator {validator}: {message}")]
    ValidatorArgument { validator: String, message: String },

    /// Process could not be started or waited on.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Deckhand operations.
pub type Result<T> = std::result::Result<T, DeckhandError>;
