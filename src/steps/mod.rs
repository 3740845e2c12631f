//! Step records and the executors that run them.
//!
//! - [`PipelineStep`] - Common view over every configured step kind
//! - [`StepCollection`] - Ordered, filterable, priority-groupable steps
//! - [`StepExecutor`] - Capability that performs one step's effect
//! - [`ProcessExecutor`], [`FilesystemExecutor`], [`SubCommandExecutor`]
//!
//! # Example
//!
//! ```
//! use deckhand::config::{ProcessStep, StepMeta};
//! use deckhand::steps::{PipelineStep, StepCollection};
//!
//! let steps = vec![
//!     ProcessStep {
//!         meta: StepMeta::new(["dev"]).with_priority(2),
//!         command: vec!["echo".into(), "second".into()],
//!     },
//!     ProcessStep {
//!         meta: StepMeta::new(["dev", "prod"]),
//!         command: vec!["echo".into(), "{{ env }}".into()],
//!     },
//! ];
//!
//! let ordered = StepCollection::from_slice(&steps)
//!     .filter(|s| s.meta().runs_in("dev"))
//!     .group_by_priority_ascending();
//!
//! let labels: Vec<_> = ordered.iter().map(|s| s.label("dev")).collect();
//! assert_eq!(labels, vec!["echo dev", "echo second"]);
//! ```

pub mod collection;
pub mod executor;
pub mod filesystem;
pub mod process;
pub mod subcommand;
pub mod validation;

pub use collection::StepCollection;
pub use executor::{StepExecutor, StepOutcome};
pub use filesystem::FilesystemExecutor;
pub use process::ProcessExecutor;
pub use subcommand::SubCommandExecutor;
pub use validation::PathFacts;

use crate::config::{template, StepMeta};

/// The four configured step kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepKind {
    Process,
    Filesystem,
    SubCommand,
    Validation,
}

impl StepKind {
    /// Configuration section holding steps of this kind.
    pub fn section(&self) -> &'static str {
        match self {
            Self::Process => "commands",
            Self::Filesystem => "filesystem",
            Self::SubCommand => "install",
            Self::Validation => "validate",
        }
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Process => "process",
            Self::Filesystem => "filesystem",
            Self::SubCommand => "sub-command",
            Self::Validation => "validation",
        };
        write!(f, "{}", s)
    }
}

/// Common view over a configured step.
pub trait PipelineStep: Clone {
    /// Kind of this step.
    const KIND: StepKind;

    /// Shared envelope (environments, enabled, priority, error policy).
    fn meta(&self) -> &StepMeta;

    /// A copy with every templatable field rendered for `environment`.
    ///
    /// The receiver is never modified.
    fn render(&self, environment: &str) -> Self;

    /// Short description of what the step does, built from its payload.
    fn describe(&self) -> String;

    /// Display label for `environment`: the configured name, or the
    /// rendered description when no name is set.
    fn label(&self, environment: &str) -> String {
        match &self.meta().name {
            Some(name) => template::replace(name, environment),
            None => self.render(environment).describe(),
        }
    }
}
