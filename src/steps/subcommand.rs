//! Sub-command steps: invoke a registered operation in-process.

use tracing::{debug, warn};

use crate::config::{template, StepMeta, SubCommandStep};
use crate::error::DeckhandError;
use crate::operations::{Lookup, OperationArgs, OperationRegistry};
use crate::runner::{ExitStatus, RunContext};
use crate::ui::{SilentUI, UserInterface};

use super::{PipelineStep, StepExecutor, StepKind, StepOutcome};

impl PipelineStep for SubCommandStep {
    const KIND: StepKind = StepKind::SubCommand;

    fn meta(&self) -> &StepMeta {
        &self.meta
    }

    fn render(&self, environment: &str) -> Self {
        Self {
            meta: self.meta.clone(),
            command: template::replace(&self.command, environment),
            arguments: template::replace_mapping(&self.arguments, environment),
        }
    }

    fn describe(&self) -> String {
        self.command.trim().to_string()
    }
}

/// Runs sub-command steps against an operation registry.
pub struct SubCommandExecutor<'a> {
    registry: &'a OperationRegistry,
}

impl<'a> SubCommandExecutor<'a> {
    /// Executor resolving operation names in `registry`.
    pub fn new(registry: &'a OperationRegistry) -> Self {
        Self { registry }
    }
}

impl StepExecutor for SubCommandExecutor<'_> {
    type Step = SubCommandStep;

    fn execute(
        &self,
        step: &SubCommandStep,
        ctx: &RunContext,
        ui: &mut dyn UserInterface,
    ) -> StepOutcome {
        let step = step.render(&ctx.requested_environment);
        let operation = match self.registry.lookup(&step.command) {
            Lookup::Found(operation) => operation,
            Lookup::NotFound => {
                warn!("No operation named '{}'", step.command);
                let miss = DeckhandError::UnknownOperation {
                    name: step.command.trim().to_string(),
                };
                return StepOutcome::failure(ExitStatus::Invalid, miss.to_string());
            }
        };

        let args = OperationArgs::from_mapping(&step.arguments);
        debug!(
            "Invoking operation {} with {} argument(s)",
            operation.name(),
            args.len()
        );

        let result = if ctx.reveal_step_output {
            operation.run(&args, ui)
        } else {
            operation.run(&args, &mut SilentUI::new())
        };

        match result {
            Ok(status) => StepOutcome::from_status(status),
            Err(e) => StepOutcome::failure(ExitStatus::Failure, e.to_string()),
        }
    }
}
