//! Configuration validation rules.
//!
//! This module validates configuration for structural correctness:
//! - Every step names at least one environment
//! - Process steps have a program to run
//! - Filesystem steps have a source and a destination
//! - Install steps name an operation
//! - Validation steps name a path

use crate::config::schema::{DeckhandConfig, StepMeta};
use crate::error::{DeckhandError, Result};

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
    /// Section the offending step belongs to
    pub section: String,
    /// Zero-based index of the step inside its section
    pub index: usize,
}

impl ValidationError {
    fn new(rule: &str, section: &str, index: usize, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            message: message.into(),
            section: section.to_string(),
            index,
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}[{}]: {} ({})",
            self.section, self.index, self.message, self.rule
        )
    }
}

/// Validate a configuration and return all errors.
///
/// This function collects all validation errors rather than stopping
/// at the first one, allowing users to fix multiple issues at once.
pub fn validate_config(config: &DeckhandConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (i, step) in config.install.iter().flatten().enumerate() {
        errors.extend(validate_meta("install", i, &step.meta));
        if step.command.trim().is_empty() {
            errors.push(ValidationError::new(
                "missing-operation",
                "install",
                i,
                "step must name an operation in 'command'",
            ));
        }
    }

    for (i, step) in config.commands.iter().flatten().enumerate() {
        errors.extend(validate_meta("commands", i, &step.meta));
        if step.command.first().is_none_or(|p| p.trim().is_empty()) {
            errors.push(ValidationError::new(
                "missing-command",
                "commands",
                i,
                "step must have a program as the first 'command' token",
            ));
        }
    }

    for (i, step) in config.filesystem.iter().flatten().enumerate() {
        errors.extend(validate_meta("filesystem", i, &step.meta));
        if step.source.trim().is_empty() {
            errors.push(ValidationError::new(
                "missing-source",
                "filesystem",
                i,
                "'source' cannot be empty",
            ));
        }
        if step.destination.trim().is_empty() {
            errors.push(ValidationError::new(
                "missing-destination",
                "filesystem",
                i,
                "'destination' cannot be empty",
            ));
        }
    }

    for (i, step) in config.validate.iter().flatten().enumerate() {
        errors.extend(validate_meta("validate", i, &step.meta));
        if step.path.trim().is_empty() {
            errors.push(ValidationError::new(
                "missing-path",
                "validate",
                i,
                "'path' cannot be empty",
            ));
        }
    }

    errors
}

fn validate_meta(section: &str, index: usize, meta: &StepMeta) -> Option<ValidationError> {
    if meta.environments.iter().all(|e| e.trim().is_empty()) {
        Some(ValidationError::new(
            "missing-environments",
            section,
            index,
            "step must list at least one environment",
        ))
    } else {
        None
    }
}

/// Validate a configuration, failing with every problem found.
pub fn ensure_valid(config: &DeckhandConfig) -> Result<()> {
    let errors = validate_config(config);
    if errors.is_empty() {
        return Ok(());
    }

    let message = errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    Err(DeckhandError::ConfigValidationError { message })
}
