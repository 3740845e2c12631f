//! Configuration loading, parsing, and validation for Deckhand.
//!
//! This module handles all aspects of configuration:
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Validation in [`validator`]
//! - Environment placeholder substitution in [`template`]
//!
//! # Example
//!
//! ```
//! use deckhand::config::load_config;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let state_dir = temp.path().join(".deckhand");
//! fs::create_dir_all(&state_dir).unwrap();
//! fs::write(state_dir.join("config.yml"), "environments: [dev, staging]").unwrap();
//!
//! let config = load_config(temp.path(), None).unwrap();
//! assert!(config.environments.unwrap().contains(&"prod".to_string()));
//! ```

pub mod loader;
pub mod schema;
pub mod template;
pub mod validator;

// Schema re-exports
pub use schema::{
    DeckhandConfig, FilesystemOperation, FilesystemStep, OnError, PathKind, ProcessStep,
    StepMeta, SubCommandStep, ValidationRule, ValidationStep, PROTECTED_ENVIRONMENT,
};

// Loader re-exports
pub use loader::{
    find_project_root, load_config, load_config_file, parse_config, project_config_path,
    ConfigLocation,
};

// Validator re-exports
pub use validator::{ensure_valid, validate_config, ValidationError};

// Template re-exports
pub use template::{replace, replace_all, replace_deep, replace_mapping};
