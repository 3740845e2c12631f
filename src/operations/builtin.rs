//! Builtin operations.
//!
//! Every builtin wraps the CLI command of the same name, so an install step
//! `command: exec` with `arguments: { environment: prod }` behaves like
//! `deckhand exec prod`.

use crate::cli::args::{
    EchoArgs, FilesystemArgs, ListArgs, PipelineArgs, SourceArgs, ValidateArgs,
    DEFAULT_ENVIRONMENT,
};
use crate::cli::commands::echo::EchoCommand;
use crate::cli::commands::exec::ExecCommand;
use crate::cli::commands::filesystem::FilesystemCommand;
use crate::cli::commands::list::ListCommand;
use crate::cli::commands::source::SourceCommand;
use crate::cli::commands::validate::ValidateCommand;
use crate::cli::commands::Command;
use crate::config::ConfigLocation;
use crate::error::Result;
use crate::runner::ExitStatus;
use crate::ui::UserInterface;

use super::{Operation, OperationArgs};

/// Every builtin operation bound to the project at `location`.
pub fn all(location: &ConfigLocation) -> Vec<Box<dyn Operation>> {
    vec![
        Box::new(EchoOperation),
        Box::new(ExecOperation::new(location)),
        Box::new(FilesystemOperation::new(location)),
        Box::new(ValidateOperation::new(location)),
        Box::new(SourceOperation::new(location)),
        Box::new(ListOperation::new(location)),
    ]
}

fn environment(args: &OperationArgs) -> String {
    args.environment()
        .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string())
}

fn pipeline_args(args: &OperationArgs) -> PipelineArgs {
    PipelineArgs {
        environment: environment(args),
        show_output: args.flag("show_output"),
    }
}

/// `echo`: wait, then succeed or fail.
pub struct EchoOperation;

impl Operation for EchoOperation {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn description(&self) -> &'static str {
        "Succeed, or fail with --error, after an optional --wait"
    }

    fn run(&self, args: &OperationArgs, ui: &mut dyn UserInterface) -> Result<ExitStatus> {
        let echo = EchoArgs {
            error: args.flag("error"),
            wait: args.u64("wait")?.unwrap_or(0),
        };
        Ok(EchoCommand::new(echo).execute(ui)?.status())
    }
}

/// `exec` (alias `cli`): run the process pipeline.
pub struct ExecOperation {
    location: ConfigLocation,
}

impl ExecOperation {
    pub fn new(location: &ConfigLocation) -> Self {
        Self {
            location: location.clone(),
        }
    }
}

impl Operation for ExecOperation {
    fn name(&self) -> &'static str {
        "exec"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["cli"]
    }

    fn description(&self) -> &'static str {
        "Run the configured external commands"
    }

    fn run(&self, args: &OperationArgs, ui: &mut dyn UserInterface) -> Result<ExitStatus> {
        let cmd = ExecCommand::new(&self.location, pipeline_args(args));
        Ok(cmd.execute(ui)?.status())
    }
}

/// `filesystem`: run the filesystem pipeline.
pub struct FilesystemOperation {
    location: ConfigLocation,
}

impl FilesystemOperation {
    pub fn new(location: &ConfigLocation) -> Self {
        Self {
            location: location.clone(),
        }
    }
}

impl Operation for FilesystemOperation {
    fn name(&self) -> &'static str {
        "filesystem"
    }

    fn description(&self) -> &'static str {
        "Run the configured filesystem operations"
    }

    fn run(&self, args: &OperationArgs, ui: &mut dyn UserInterface) -> Result<ExitStatus> {
        let fs_args = FilesystemArgs {
            pipeline: pipeline_args(args),
            mirror: args.flag("mirror"),
            symlink: args.flag("symlink"),
            directory: args.flag("directory"),
        };
        let cmd = FilesystemCommand::new(&self.location, fs_args);
        Ok(cmd.execute(ui)?.status())
    }
}

/// `validate`: check the configured paths.
pub struct ValidateOperation {
    location: ConfigLocation,
}

impl ValidateOperation {
    pub fn new(location: &ConfigLocation) -> Self {
        Self {
            location: location.clone(),
        }
    }
}

impl Operation for ValidateOperation {
    fn name(&self) -> &'static str {
        "validate"
    }

    fn description(&self) -> &'static str {
        "Check the configured paths"
    }

    fn run(&self, args: &OperationArgs, ui: &mut dyn UserInterface) -> Result<ExitStatus> {
        let validate = ValidateArgs {
            environment: environment(args),
            only_errors: args.flag("only_errors"),
        };
        let cmd = ValidateCommand::new(&self.location, validate);
        Ok(cmd.execute(ui)?.status())
    }
}

/// `source`: show the effective configuration.
pub struct SourceOperation {
    location: ConfigLocation,
}

impl SourceOperation {
    pub fn new(location: &ConfigLocation) -> Self {
        Self {
            location: location.clone(),
        }
    }
}

impl Operation for SourceOperation {
    fn name(&self) -> &'static str {
        "source"
    }

    fn description(&self) -> &'static str {
        "Show the effective configuration"
    }

    fn run(&self, args: &OperationArgs, ui: &mut dyn UserInterface) -> Result<ExitStatus> {
        let source = SourceArgs {
            json: args.flag("json"),
        };
        let cmd = SourceCommand::new(&self.location, source);
        Ok(cmd.execute(ui)?.status())
    }
}

/// `list`: show the steps that would run.
pub struct ListOperation {
    location: ConfigLocation,
}

impl ListOperation {
    pub fn new(location: &ConfigLocation) -> Self {
        Self {
            location: location.clone(),
        }
    }
}

impl Operation for ListOperation {
    fn name(&self) -> &'static str {
        "list"
    }

    fn description(&self) -> &'static str {
        "List the steps that would run"
    }

    fn run(&self, args: &OperationArgs, ui: &mut dyn UserInterface) -> Result<ExitStatus> {
        let list = ListArgs {
            environment: environment(args),
            json: args.flag("json"),
        };
        let cmd = ListCommand::new(&self.location, list);
        Ok(cmd.execute(ui)?.status())
    }
}
