//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::Path;

use crate::cli::args::{Cli, Commands};
use crate::config::{ConfigLocation, DeckhandConfig};
use crate::error::{DeckhandError, Result};
use crate::runner::ExitStatus;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Result carrying a pipeline status.
    pub fn from_status(status: ExitStatus) -> Self {
        if status.is_success() {
            Self::success()
        } else {
            Self::failure(status.code())
        }
    }

    /// The exit code as a pipeline status.
    pub fn status(&self) -> ExitStatus {
        ExitStatus::from(self.exit_code)
    }

    /// The exit code handed to the operating system.
    ///
    /// Codes outside `0..=255` would wrap, so they become a generic failure.
    pub fn process_code(&self) -> u8 {
        u8::try_from(self.exit_code).unwrap_or(1)
    }
}

/// Load the project configuration, reporting a missing file through `ui`.
///
/// Returns `Ok(None)` when the configuration file does not exist; any other
/// load failure is an error.
pub(crate) fn load_project_config(
    location: &ConfigLocation,
    ui: &mut dyn UserInterface,
) -> Result<Option<DeckhandConfig>> {
    match location.load() {
        Ok(config) => Ok(Some(config)),
        Err(DeckhandError::ConfigNotFound { path }) => {
            ui.error(&format!("No configuration found at {}", path.display()));
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    location: ConfigLocation,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given configuration location.
    pub fn new(location: ConfigLocation) -> Self {
        Self { location }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.location.project_root
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Commands::Install(args) => {
                let cmd = super::install::InstallCommand::new(&self.location, args.clone());
                cmd.execute(ui)
            }
            Commands::Exec(args) => {
                let cmd = super::exec::ExecCommand::new(&self.location, args.clone());
                cmd.execute(ui)
            }
            Commands::Filesystem(args) => {
                let cmd = super::filesystem::FilesystemCommand::new(&self.location, args.clone());
                cmd.execute(ui)
            }
            Commands::Validate(args) => {
                let cmd = super::validate::ValidateCommand::new(&self.location, args.clone());
                cmd.execute(ui)
            }
            Commands::Source(args) => {
                let cmd = super::source::SourceCommand::new(&self.location, args.clone());
                cmd.execute(ui)
            }
            Commands::List(args) => {
                let cmd = super::list::ListCommand::new(&self.location, args.clone());
                cmd.execute(ui)
            }
            Commands::Echo(args) => {
                let cmd = super::echo::EchoCommand::new(args.clone());
                cmd.execute(ui)
            }
            Commands::Completions(args) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui)
            }
        }
    }
}
