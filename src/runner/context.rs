//! Per-run state threaded through every step.

use crate::config::OnError;

use super::status::ExitStatus;

/// State of one pipeline run.
///
/// Created when a run starts and dropped when it ends. `running_status`
/// only changes through [`RunContext::fold`].
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Environment the run was requested for.
    pub requested_environment: String,
    /// Stream step output (process stdout/stderr, nested operation output).
    pub reveal_step_output: bool,
    running_status: ExitStatus,
}

impl RunContext {
    /// Start a run for `environment` with a successful running status.
    pub fn new(environment: impl Into<String>, reveal_step_output: bool) -> Self {
        Self {
            requested_environment: environment.into(),
            reveal_step_output,
            running_status: ExitStatus::Success,
        }
    }

    /// Current running status.
    pub fn running_status(&self) -> ExitStatus {
        self.running_status
    }

    /// Whether a previous step left the pipeline in a failed state.
    ///
    /// Once halted, remaining steps are reported as not executed.
    pub fn is_halted(&self) -> bool {
        !self.running_status.is_success()
    }

    /// Fold a step's raw status into the running status.
    ///
    /// - `none`: the failure is swallowed and the pipeline stays successful
    /// - `stop`: the raw code becomes the running status as is
    /// - `propagate`: the raw code is mapped to the canonical status space
    pub fn fold(&mut self, policy: OnError, raw: ExitStatus) -> ExitStatus {
        self.running_status = match policy {
            OnError::None => ExitStatus::Success,
            OnError::Stop => raw,
            OnError::Propagate => ExitStatus::from(raw.code()),
        };
        self.running_status
    }
}
