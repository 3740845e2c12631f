//! Capability executor interface.

use crate::runner::{ExitStatus, RunContext};
use crate::ui::UserInterface;

use super::PipelineStep;

/// What running one step produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// Raw status of the step.
    pub status: ExitStatus,

    /// Human-readable detail, kept for reporting (error text, skipped work).
    pub message: Option<String>,
}

impl StepOutcome {
    /// A successful outcome.
    pub fn success() -> Self {
        Self {
            status: ExitStatus::Success,
            message: None,
        }
    }

    /// An outcome with the given raw status and no detail.
    pub fn from_status(status: ExitStatus) -> Self {
        Self {
            status,
            message: None,
        }
    }

    /// A failing outcome with a message.
    pub fn failure(status: ExitStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
        }
    }

    /// Attach a message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Performs the effect of one step kind.
///
/// Implementations render every templatable field for
/// `ctx.requested_environment` before use and report failures as a status,
/// never as a panic or an error crossing the step boundary.
pub trait StepExecutor {
    /// Step kind this executor runs.
    type Step: PipelineStep;

    /// Run `step` and report its raw outcome.
    fn execute(
        &self,
        step: &Self::Step,
        ctx: &RunContext,
        ui: &mut dyn UserInterface,
    ) -> StepOutcome;
}
