//! Exec command implementation.
//!
//! The `deckhand exec` command runs the configured external processes for an
//! environment from the project root.

use crate::cli::args::PipelineArgs;
use crate::config::ConfigLocation;
use crate::error::Result;
use crate::runner::{PipelineKind, PipelineRunner, PipelineSettings, RunContext};
use crate::steps::ProcessExecutor;
use crate::ui::UserInterface;

use super::dispatcher::{load_project_config, Command, CommandResult};
use super::display::show_pipeline_header;

/// The exec command implementation.
pub struct ExecCommand {
    location: ConfigLocation,
    args: PipelineArgs,
}

impl ExecCommand {
    /// Create a new exec command.
    pub fn new(location: &ConfigLocation, args: PipelineArgs) -> Self {
        Self {
            location: location.clone(),
            args,
        }
    }
}

impl Command for ExecCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(config) = load_project_config(&self.location, ui)? else {
            return Ok(CommandResult::failure(1));
        };

        let environment = &self.args.environment;
        show_pipeline_header(ui, PipelineKind::Exec, environment);

        let settings = PipelineSettings::from_config(&config);
        let executor = ProcessExecutor::new(&self.location.project_root);
        let report = PipelineRunner::new(PipelineKind::Exec, &settings).run(
            RunContext::new(environment.as_str(), self.args.show_output),
            config.commands.as_deref(),
            &executor,
            ui,
        );

        Ok(CommandResult::from_status(report.status))
    }
}
