//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. This allows:
//! - Single binary with subcommands (`deckhand install`, `deckhand validate`)
//! - Shared configuration loading
//! - The same commands to run as in-process install operations

pub mod completions;
pub mod dispatcher;
pub mod display;
pub mod echo;
pub mod exec;
pub mod filesystem;
pub mod install;
pub mod list;
pub mod source;
pub mod validate;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
