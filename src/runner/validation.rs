//! Validation pipeline: check every path, accumulate failures.
//!
//! Validation shares the gates of [`PipelineRunner`] but never stops early.
//! Every selected path is checked with every named validator and each path
//! that fails at least one of them is recorded exactly once.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ValidationStep;
use crate::error::Result;
use crate::steps::{PathFacts, PipelineStep};
use crate::ui::{Table, UserInterface};
use crate::validators::{ValidationTarget, ValidatorLookup, ValidatorRegistry};

use super::pipeline::{Conclusion, PipelineKind, PipelineRunner, PipelineSettings, Selection};
use super::status::ExitStatus;

/// Result of one named validator against one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleResult {
    Passed,
    Failed,
    /// No validator is registered under the name.
    Unknown,
}

impl RuleResult {
    fn label(&self) -> &'static str {
        match self {
            Self::Passed => "SUCCESS",
            Self::Failed => "FAILED",
            Self::Unknown => "Validation does not exist",
        }
    }
}

/// Outcome of a validation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub environment: String,
    pub status: ExitStatus,
    pub conclusion: Conclusion,
    /// Paths checked, in execution order.
    pub checked: Vec<String>,
    /// Paths that failed at least one validator.
    pub failing_paths: BTreeSet<String>,
}

/// Runs `validate` steps against a validator registry.
pub struct ValidationRunner<'a> {
    settings: &'a PipelineSettings,
    validators: &'a ValidatorRegistry,
    root: PathBuf,
    only_errors: bool,
}

struct CheckedPath {
    step: ValidationStep,
    facts: PathFacts,
    results: Vec<(String, RuleResult)>,
}

impl<'a> ValidationRunner<'a> {
    /// Runner resolving relative paths against `root`.
    pub fn new(
        settings: &'a PipelineSettings,
        validators: &'a ValidatorRegistry,
        root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            settings,
            validators,
            root: root.into(),
            only_errors: false,
        }
    }

    /// Only report paths that failed a validator.
    pub fn only_errors(mut self, only_errors: bool) -> Self {
        self.only_errors = only_errors;
        self
    }

    /// Validate every selected path for `environment`.
    ///
    /// A validator given malformed arguments aborts the run with `Err`.
    pub fn run(
        &self,
        environment: &str,
        steps: Option<&[ValidationStep]>,
        ui: &mut dyn UserInterface,
    ) -> Result<ValidationReport> {
        let runner = PipelineRunner::new(PipelineKind::Validate, self.settings);
        let ordered = match runner.select(steps, environment, ui) {
            Selection::Ready(ordered) => ordered,
            Selection::Finished(report) => {
                return Ok(ValidationReport {
                    environment: environment.to_string(),
                    status: report.status,
                    conclusion: report.conclusion,
                    checked: Vec::new(),
                    failing_paths: BTreeSet::new(),
                });
            }
        };

        if ui.output_mode().shows_progress() {
            ui.message(&format!("Number of paths to validate: {}", ordered.count()));
        }

        let mut failing_paths = BTreeSet::new();
        let mut checked = Vec::with_capacity(ordered.count());
        for step in ordered.iter() {
            let path = self.check(step, environment)?;
            let failed = path.results.iter().any(|(_, r)| *r == RuleResult::Failed);
            if failed {
                failing_paths.insert(path.step.path.clone());
            }
            if !self.only_errors || failed {
                ui.show_table(&path.table());
            }
            checked.push(path.step.path);
        }

        let status = if failing_paths.is_empty() {
            ui.success("No errors found");
            ExitStatus::Success
        } else {
            ui.error(&format!("Errors found in {} path(s)", failing_paths.len()));
            ExitStatus::Failure
        };

        Ok(ValidationReport {
            environment: environment.to_string(),
            status,
            conclusion: Conclusion::Completed,
            checked,
            failing_paths,
        })
    }

    fn check(&self, step: &ValidationStep, environment: &str) -> Result<CheckedPath> {
        let step = step.render(environment);
        let target = ValidationTarget::new(&step.path, &self.root);
        let facts = PathFacts::inspect(&target.resolved());
        debug!("Validating {}", step.describe());

        let mut results = Vec::with_capacity(step.validations.len());
        for rule in &step.validations {
            let entry = match self.validators.lookup(&rule.name) {
                ValidatorLookup::Found(validator) => {
                    let result = if validator.validate(&rule.parameters, &target)? {
                        RuleResult::Passed
                    } else {
                        RuleResult::Failed
                    };
                    (validator.title().to_string(), result)
                }
                ValidatorLookup::NotFound => {
                    warn!("Unknown validator '{}' for {}", rule.name, step.path);
                    (rule.name.clone(), RuleResult::Unknown)
                }
            };
            results.push(entry);
        }

        Ok(CheckedPath {
            step,
            facts,
            results,
        })
    }
}

impl CheckedPath {
    fn table(&self) -> Table {
        let mut table = Table::new(vec!["Validation", self.step.path.as_str()]);
        table.add_row(vec!["Type".to_string(), self.step.kind.to_string()]);
        table.add_row(vec!["Permissions Integer".to_string(), self.facts.octal()]);
        table.add_row(vec!["Permissions String".to_string(), self.facts.symbolic()]);
        table.add_row(vec![
            "Date Time".to_string(),
            self.facts.modified_display(),
        ]);
        table.add_row(vec![
            "Environments".to_string(),
            self.step.meta.environments.join(", "),
        ]);
        for (name, result) in &self.results {
            table.add_row(vec![name.as_str(), result.label()]);
        }
        table
    }
}
