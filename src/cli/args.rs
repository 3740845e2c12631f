//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Environment used when none is given on the command line.
pub const DEFAULT_ENVIRONMENT: &str = "dev";

/// Deckhand - Environment-aware deployment step runner.
#[derive(Debug, Parser)]
#[command(name = "deckhand")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default .deckhand/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the install operations for an environment
    Install(PipelineArgs),

    /// Run the configured external commands for an environment
    #[command(alias = "cli")]
    Exec(PipelineArgs),

    /// Run the configured filesystem operations for an environment
    Filesystem(FilesystemArgs),

    /// Check the configured paths for an environment
    Validate(ValidateArgs),

    /// Show the effective configuration
    Source(SourceArgs),

    /// List the steps that would run for an environment
    List(ListArgs),

    /// Succeed or fail on demand (for testing install steps)
    #[command(hide = true)]
    Echo(EchoArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments shared by the executing pipelines.
#[derive(Debug, Clone, PartialEq, Eq, clap::Args)]
pub struct PipelineArgs {
    /// Environment to run for
    #[arg(default_value = DEFAULT_ENVIRONMENT)]
    pub environment: String,

    /// Stream the output of every step
    #[arg(long)]
    pub show_output: bool,
}

impl Default for PipelineArgs {
    fn default() -> Self {
        Self {
            environment: DEFAULT_ENVIRONMENT.to_string(),
            show_output: false,
        }
    }
}

/// Arguments for the `filesystem` command.
#[derive(Debug, Clone, Default, PartialEq, Eq, clap::Args)]
pub struct FilesystemArgs {
    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Run mirror operations
    #[arg(long)]
    pub mirror: bool,

    /// Run symlink operations
    #[arg(long)]
    pub symlink: bool,

    /// Run directory operations
    #[arg(long)]
    pub directory: bool,
}

/// Arguments for the `validate` command.
#[derive(Debug, Clone, PartialEq, Eq, clap::Args)]
pub struct ValidateArgs {
    /// Environment to validate
    #[arg(default_value = DEFAULT_ENVIRONMENT)]
    pub environment: String,

    /// Only report paths that failed a validation
    #[arg(long)]
    pub only_errors: bool,
}

impl Default for ValidateArgs {
    fn default() -> Self {
        Self {
            environment: DEFAULT_ENVIRONMENT.to_string(),
            only_errors: false,
        }
    }
}

/// Arguments for the `source` command.
#[derive(Debug, Clone, Default, PartialEq, Eq, clap::Args)]
pub struct SourceArgs {
    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, PartialEq, Eq, clap::Args)]
pub struct ListArgs {
    /// Environment to list steps for
    #[arg(default_value = DEFAULT_ENVIRONMENT)]
    pub environment: String,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl Default for ListArgs {
    fn default() -> Self {
        Self {
            environment: DEFAULT_ENVIRONMENT.to_string(),
            json: false,
        }
    }
}

/// Arguments for the hidden `echo` command.
#[derive(Debug, Clone, Default, PartialEq, Eq, clap::Args)]
pub struct EchoArgs {
    /// Finish with a failure
    #[arg(long)]
    pub error: bool,

    /// Seconds to wait before finishing
    #[arg(long, default_value_t = 0)]
    pub wait: u64,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}


impl Cli {
    /// Name of the selected subcommand.
    pub fn command_name(&self) -> &'static str {
        match &self.command {
            Commands::Install(_) => "install",
            Commands::Exec(_) => "exec",
            Commands::Filesystem(_) => "filesystem",
            Commands::Validate(_) => "validate",
            Commands::Source(_) => "source",
            Commands::List(_) => "list",
            Commands::Echo(_) => "echo",
            Commands::Completions(_) => "completions",
        }
    }
}
