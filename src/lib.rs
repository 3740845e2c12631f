//! Deckhand - Environment-aware deployment step runner.
//!
//! Deckhand reads a declarative YAML file describing install operations,
//! external commands, filesystem operations and path validations, and runs
//! the steps that apply to one environment in priority order.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, templating and validation
//! - [`error`] - Error types and result aliases
//! - [`operations`] - In-process operations invoked by install steps
//! - [`runner`] - Pipeline gating, ordering, execution and lock handling
//! - [`shell`] - Child process execution
//! - [`steps`] - Step records and their executors
//! - [`ui`] - Spinners, tables and terminal output
//! - [`validators`] - Named path validators
//!
//! # Example
//!
//! ```
//! use deckhand::config::replace;
//!
//! let command = replace("bin/deploy --env={{ env }}", "prod");
//! assert_eq!(command, "bin/deploy --env=prod");
//! ```
//!
//! For file-based config loading, see the integration tests.

pub mod cli;
pub mod config;
pub mod error;
pub mod operations;
pub mod runner;
pub mod shell;
pub mod steps;
pub mod ui;
pub mod validators;

pub use error::{DeckhandError, Result};
