//! Install command implementation.
//!
//! The `deckhand install` command runs the configured in-process operations
//! for an environment and writes the lock marker when they all succeed.

use crate::cli::args::PipelineArgs;
use crate::config::ConfigLocation;
use crate::error::Result;
use crate::operations::OperationRegistry;
use crate::runner::{PipelineKind, PipelineRunner, PipelineSettings, RunContext};
use crate::steps::SubCommandExecutor;
use crate::ui::UserInterface;

use super::dispatcher::{load_project_config, Command, CommandResult};
use super::display::show_pipeline_header;

/// The install command implementation.
pub struct InstallCommand {
    location: ConfigLocation,
    args: PipelineArgs,
}

impl InstallCommand {
    /// Create a new install command.
    pub fn new(location: &ConfigLocation, args: PipelineArgs) -> Self {
        Self {
            location: location.clone(),
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &PipelineArgs {
        &self.args
    }
}

impl Command for InstallCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(config) = load_project_config(&self.location, ui)? else {
            return Ok(CommandResult::failure(1));
        };

        let environment = &self.args.environment;
        show_pipeline_header(ui, PipelineKind::Install, environment);

        let settings = PipelineSettings::from_config(&config);
        let registry = OperationRegistry::builtin(&self.location);
        let executor = SubCommandExecutor::new(&registry);

        let report = PipelineRunner::new(PipelineKind::Install, &settings).run(
            RunContext::new(environment.as_str(), self.args.show_output),
            config.install.as_deref(),
            &executor,
            ui,
        );

        Ok(CommandResult::from_status(report.status))
    }
}
