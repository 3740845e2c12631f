//! Pipeline orchestration.
//!
//! - [`PipelineRunner`] - Gates, selects, executes and folds one pipeline
//! - [`ValidationRunner`] - Accumulate-all-errors variant for path checks
//! - [`RunContext`] - Per-run state and the error-policy fold
//! - [`LockMarker`] - One-shot marker guarding locked environments
//! - [`ExitStatus`] - Canonical status space shared with the OS

pub mod context;
pub mod lock;
pub mod pipeline;
pub mod status;
pub mod validation;

pub use context::RunContext;
pub use lock::{LockCreation, LockMarker};
pub use pipeline::{
    Conclusion, NoMatchPolicy, PipelineKind, PipelineReport, PipelineRunner, PipelineSettings,
    Selection, StepDisposition, StepRecord,
};
pub use status::ExitStatus;
pub use validation::{RuleResult, ValidationReport, ValidationRunner};
