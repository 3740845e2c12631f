//! External process steps.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::config::{template, ProcessStep, StepMeta};
use crate::runner::{ExitStatus, RunContext};
use crate::shell::{display_command, execute, execute_streaming, CommandOptions};
use crate::ui::UserInterface;

use super::{PipelineStep, StepExecutor, StepKind, StepOutcome};

impl PipelineStep for ProcessStep {
    const KIND: StepKind = StepKind::Process;

    fn meta(&self) -> &StepMeta {
        &self.meta
    }

    fn render(&self, environment: &str) -> Self {
        Self {
            meta: self.meta.clone(),
            command: template::replace_all(&self.command, environment),
        }
    }

    fn describe(&self) -> String {
        display_command(&self.command)
    }
}

/// Runs process steps as argv lists from the project root.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    cwd: PathBuf,
}

impl ProcessExecutor {
    /// Executor running processes in `cwd`.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }
}

impl StepExecutor for ProcessExecutor {
    type Step = ProcessStep;

    fn execute(
        &self,
        step: &ProcessStep,
        ctx: &RunContext,
        ui: &mut dyn UserInterface,
    ) -> StepOutcome {
        let step = step.render(&ctx.requested_environment);
        let options = CommandOptions::in_dir(&self.cwd);
        debug!("Running {:?} in {}", step.command, self.cwd.display());

        let result = if ctx.reveal_step_output {
            execute_streaming(&step.command, &options, |line| ui.step_output(&line))
        } else {
            execute(&step.command, &options)
        };

        match result {
            Ok(result) if result.success => StepOutcome::success(),
            Ok(result) => {
                let status = result
                    .exit_code
                    .map_or(ExitStatus::Failure, ExitStatus::from);
                let outcome = StepOutcome::from_status(status);
                match result.last_error_line() {
                    Some(line) if !ctx.reveal_step_output => outcome.with_message(line),
                    _ => outcome,
                }
            }
            Err(e) => {
                warn!("Could not start {}: {}", step.describe(), e);
                StepOutcome::failure(
                    ExitStatus::Failure,
                    format!("could not start '{}'", step.describe()),
                )
            }
        }
    }
}
