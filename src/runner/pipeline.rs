//! The staged pipeline: gate, select, execute, fold, finalize.
//!
//! Every run passes the same gates in order and returns at the first one
//! that fails:
//!
//! 1. the requested environment is configured
//! 2. the environment is not locked (lock-checked pipelines only)
//! 3. the step section exists and is not empty
//! 4. some step runs in the environment
//! 5. some of those steps are enabled
//!
//! The survivors are ordered by ascending priority and executed one at a
//! time. Once the running status is a failure the remaining steps are still
//! visited, but reported as not executed.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::DeckhandConfig;
use crate::steps::{PipelineStep, StepCollection, StepExecutor};
use crate::ui::UserInterface;

use super::context::RunContext;
use super::lock::{LockCreation, LockMarker};
use super::status::ExitStatus;

/// What a run does when no step matches the requested environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoMatchPolicy {
    /// Report a generic failure.
    Fail,
    /// Report success with nothing done.
    Succeed,
}

/// The pipelines deckhand runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineKind {
    Install,
    Exec,
    Filesystem,
    Validate,
    /// Reporting only: selects steps but never executes them.
    Listing,
}

impl PipelineKind {
    /// Title used in headers.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Install => "Install",
            Self::Exec => "Exec",
            Self::Filesystem => "Filesystem",
            Self::Validate => "Validate",
            Self::Listing => "List",
        }
    }

    /// Whether a locked environment blocks this pipeline.
    pub fn checks_lock(&self) -> bool {
        matches!(self, Self::Install | Self::Exec | Self::Filesystem)
    }

    /// Whether a successful run writes the lock marker.
    pub fn creates_lock(&self) -> bool {
        matches!(self, Self::Install)
    }

    /// Default policy when no step matches the environment.
    pub fn no_match_policy(&self) -> NoMatchPolicy {
        match self {
            Self::Listing => NoMatchPolicy::Succeed,
            _ => NoMatchPolicy::Fail,
        }
    }
}

impl std::fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title().to_lowercase())
    }
}

/// Environment and lock settings a pipeline is gated on.
///
/// A `None` field is a missing key and fails the matching gate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineSettings {
    pub environments: Option<Vec<String>>,
    pub locks: Option<Vec<String>>,
    pub lockfile: Option<PathBuf>,
}

impl PipelineSettings {
    /// Settings taken from a loaded configuration.
    pub fn from_config(config: &DeckhandConfig) -> Self {
        Self {
            environments: config.environments.clone(),
            locks: config.locks.clone(),
            lockfile: config.lockfile.clone(),
        }
    }

    /// Whether `environment` is in the locked set.
    pub fn is_locked(&self, environment: &str) -> bool {
        self.locks
            .as_ref()
            .is_some_and(|locks| locks.iter().any(|l| l == environment))
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "reason", rename_all = "lowercase")]
pub enum Conclusion {
    /// A gate failed; no step was touched.
    Rejected(String),
    /// A gate found nothing to run.
    Empty(String),
    /// Steps were visited.
    Completed,
}

/// What happened to one visited step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum StepDisposition {
    /// The step ran; `status` is its raw status.
    Executed { status: ExitStatus },
    /// The step ran and failed, but its error policy swallowed the failure.
    Swallowed { status: ExitStatus },
    /// An earlier failure halted the pipeline before this step.
    NotExecuted,
}

/// One visited step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub label: String,
    pub priority: i64,
    #[serde(flatten)]
    pub disposition: StepDisposition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StepRecord {
    /// Whether the step's effect was performed.
    pub fn was_executed(&self) -> bool {
        !matches!(self.disposition, StepDisposition::NotExecuted)
    }
}

/// Result of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub kind: PipelineKind,
    pub environment: String,
    pub status: ExitStatus,
    pub conclusion: Conclusion,
    pub steps: Vec<StepRecord>,
    #[serde(skip)]
    pub lock: Option<LockCreation>,
}

impl PipelineReport {
    fn ended(
        kind: PipelineKind,
        environment: &str,
        status: ExitStatus,
        conclusion: Conclusion,
    ) -> Self {
        Self {
            kind,
            environment: environment.to_string(),
            status,
            conclusion,
            steps: Vec::new(),
            lock: None,
        }
    }

    /// Number of steps whose effect was performed.
    pub fn executed_count(&self) -> usize {
        self.steps.iter().filter(|s| s.was_executed()).count()
    }
}

/// Outcome of the gating and selection stages.
#[derive(Debug)]
pub enum Selection<T> {
    /// Steps to run, in execution order.
    Ready(StepCollection<T>),
    /// The run ended at a gate and its summary has been reported.
    Finished(PipelineReport),
}

/// Runs one kind of pipeline against explicit settings.
#[derive(Debug, Clone)]
pub struct PipelineRunner<'a> {
    kind: PipelineKind,
    settings: &'a PipelineSettings,
    no_match: NoMatchPolicy,
}

impl<'a> PipelineRunner<'a> {
    /// Runner for `kind`, using the kind's default no-match policy.
    pub fn new(kind: PipelineKind, settings: &'a PipelineSettings) -> Self {
        Self {
            kind,
            settings,
            no_match: kind.no_match_policy(),
        }
    }

    /// Override what happens when no step matches the environment.
    pub fn with_no_match_policy(mut self, policy: NoMatchPolicy) -> Self {
        self.no_match = policy;
        self
    }

    /// Kind of pipeline this runner drives.
    pub fn kind(&self) -> PipelineKind {
        self.kind
    }

    /// Pass the gates and return the ordered steps to run.
    ///
    /// When a gate ends the run, its one summary line has already been
    /// written to `ui`.
    pub fn select<T: PipelineStep>(
        &self,
        steps: Option<&[T]>,
        environment: &str,
        ui: &mut dyn UserInterface,
    ) -> Selection<T> {
        match self.gate(steps, environment) {
            Ok(collection) => {
                debug!(
                    "{} pipeline selected {} step(s) for [{}]",
                    self.kind,
                    collection.count(),
                    environment
                );
                Selection::Ready(collection)
            }
            Err(report) => {
                match &report.conclusion {
                    Conclusion::Rejected(reason) => ui.error(reason),
                    Conclusion::Empty(reason) if report.status.is_success() => ui.success(reason),
                    Conclusion::Empty(reason) => ui.error(reason),
                    Conclusion::Completed => {}
                }
                Selection::Finished(report)
            }
        }
    }

    fn gate<T: PipelineStep>(
        &self,
        steps: Option<&[T]>,
        environment: &str,
    ) -> std::result::Result<StepCollection<T>, PipelineReport> {
        let end = |status, conclusion| {
            Err(PipelineReport::ended(
                self.kind,
                environment,
                status,
                conclusion,
            ))
        };

        let Some(environments) = &self.settings.environments else {
            return end(
                ExitStatus::Failure,
                Conclusion::Rejected("Environments configuration cannot be found".into()),
            );
        };
        if !environments.iter().any(|e| e == environment) {
            return end(
                ExitStatus::Invalid,
                Conclusion::Rejected(format!(
                    "The environment [{}] is not found in the configuration",
                    environment
                )),
            );
        }

        if self.kind.checks_lock() {
            if self.settings.locks.is_none() {
                return end(
                    ExitStatus::Failure,
                    Conclusion::Rejected("Lock environments configuration cannot be found".into()),
                );
            }
            let Some(lockfile) = &self.settings.lockfile else {
                return end(
                    ExitStatus::Failure,
                    Conclusion::Rejected("Lock file configuration cannot be found".into()),
                );
            };
            if self.settings.is_locked(environment) && LockMarker::new(lockfile).exists() {
                return end(
                    ExitStatus::Failure,
                    Conclusion::Rejected(format!(
                        "The file [{}] already exists",
                        lockfile.display()
                    )),
                );
            }
        }

        let Some(steps) = steps else {
            return end(
                ExitStatus::Failure,
                Conclusion::Rejected(format!(
                    "The [{}] configuration could not be found",
                    T::KIND.section()
                )),
            );
        };
        if steps.is_empty() {
            return end(
                ExitStatus::Success,
                Conclusion::Empty("No settings to run".into()),
            );
        }

        let matching = StepCollection::from_slice(steps).for_environment(environment);
        if matching.is_empty() {
            let status = match self.no_match {
                NoMatchPolicy::Fail => ExitStatus::Failure,
                NoMatchPolicy::Succeed => ExitStatus::Success,
            };
            return end(
                status,
                Conclusion::Empty(format!("No settings to run in [{}]", environment)),
            );
        }

        let enabled = matching.enabled();
        if enabled.is_empty() {
            return end(
                ExitStatus::Success,
                Conclusion::Empty(format!("No active settings to run in [{}]", environment)),
            );
        }

        Ok(enabled.group_by_priority_ascending())
    }

    /// Run the pipeline for `ctx.requested_environment`.
    ///
    /// Every selected step is visited exactly once. Each gets an "about to
    /// run" notice (or a "not executed" notice once the run is halted) and
    /// a finished notice stating its status. The run ends with one summary
    /// line.
    pub fn run<E: StepExecutor>(
        &self,
        mut ctx: RunContext,
        steps: Option<&[E::Step]>,
        executor: &E,
        ui: &mut dyn UserInterface,
    ) -> PipelineReport {
        let environment = ctx.requested_environment.clone();
        let ordered = match self.select(steps, &environment, ui) {
            Selection::Ready(ordered) => ordered,
            Selection::Finished(report) => return report,
        };

        info!(
            "Running {} {} step(s) for [{}]",
            ordered.count(),
            self.kind,
            environment
        );

        let total = ordered.count();
        let mut records = Vec::with_capacity(total);
        for (index, step) in ordered.iter().enumerate() {
            records.push(self.visit(index, total, step, executor, &mut ctx, ui));
        }

        let status = ctx.running_status();
        let lock = if status.is_success()
            && self.kind.creates_lock()
            && self.settings.is_locked(&environment)
        {
            self.create_lock(ui)
        } else {
            None
        };

        if status.is_success() {
            ui.success("All steps executed successfully");
        } else {
            ui.error(&format!(
                "Not all steps executed successfully (exit code {})",
                status
            ));
        }

        PipelineReport {
            kind: self.kind,
            environment,
            status,
            conclusion: Conclusion::Completed,
            steps: records,
            lock,
        }
    }

    fn visit<E: StepExecutor>(
        &self,
        index: usize,
        total: usize,
        step: &E::Step,
        executor: &E,
        ctx: &mut RunContext,
        ui: &mut dyn UserInterface,
    ) -> StepRecord {
        let meta = step.meta();
        let label = step.label(&ctx.requested_environment);
        let position = format!("[{}/{}]", index + 1, total);

        if ctx.is_halted() {
            ui.skipped(&format!("{} {} [ Not Executed ]", position, label));
            return StepRecord {
                label,
                priority: meta.priority,
                disposition: StepDisposition::NotExecuted,
                message: None,
            };
        }

        ui.step_started(&format!("{} Running {}", position, label));

        let outcome = executor.execute(step, ctx, ui);
        let running = ctx.fold(meta.on_error, outcome.status);

        let disposition = if outcome.status.is_success() {
            ui.success(&format!("{} {}", position, label));
            StepDisposition::Executed {
                status: outcome.status,
            }
        } else {
            let detail = outcome
                .message
                .as_deref()
                .map(|m| format!(": {}", m))
                .unwrap_or_default();
            if running.is_success() {
                warn!("{} failed with {} (ignored)", label, outcome.status);
                ui.warning(&format!(
                    "{} {} failed with exit code {}, ignored{}",
                    position, label, outcome.status, detail
                ));
                StepDisposition::Swallowed {
                    status: outcome.status,
                }
            } else {
                ui.error(&format!(
                    "{} {} failed with exit code {}{}",
                    position, label, outcome.status, detail
                ));
                StepDisposition::Executed {
                    status: outcome.status,
                }
            }
        };

        StepRecord {
            label,
            priority: meta.priority,
            disposition,
            message: outcome.message,
        }
    }

    fn create_lock(&self, ui: &mut dyn UserInterface) -> Option<LockCreation> {
        let lockfile = self.settings.lockfile.as_ref()?;
        match LockMarker::new(lockfile).create() {
            Ok(creation) => Some(creation),
            Err(e) => {
                ui.error(&format!("The lockfile could not be created: {}", e));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OnError, ProcessStep, StepMeta};
    use crate::steps::StepOutcome;
    use crate::ui::{MockUI, OutputMode};
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Executor whose outcome is the exit code in the step's first token.
    #[derive(Default)]
    struct Scripted {
        calls: RefCell<Vec<String>>,
    }

    impl StepExecutor for Scripted {
        type Step = ProcessStep;

        fn execute(
            &self,
            step: &ProcessStep,
            ctx: &RunContext,
            _ui: &mut dyn UserInterface,
        ) -> StepOutcome {
            let step = step.render(&ctx.requested_environment);
            self.calls.borrow_mut().push(step.describe());
            let code: i32 = step.command[0].parse().unwrap_or(0);
            StepOutcome::from_status(ExitStatus::from(code))
        }
    }

    fn step(code: i32, priority: i64, on_error: OnError) -> ProcessStep {
        ProcessStep {
            meta: StepMeta::new(["dev", "prod"])
                .with_priority(priority)
                .with_on_error(on_error),
            command: vec![code.to_string(), format!("p{}", priority)],
        }
    }

    fn settings(lockfile: PathBuf) -> PipelineSettings {
        PipelineSettings {
            environments: Some(vec!["dev".into(), "prod".into()]),
            locks: Some(vec!["prod".into()]),
            lockfile: Some(lockfile),
        }
    }

    fn run(
        kind: PipelineKind,
        settings: &PipelineSettings,
        steps: Option<&[ProcessStep]>,
        env: &str,
    ) -> (PipelineReport, Vec<String>, MockUI) {
        let executor = Scripted::default();
        let mut ui = MockUI::new();
        let report = PipelineRunner::new(kind, settings).run(
            RunContext::new(env, false),
            steps,
            &executor,
            &mut ui,
        );
        (report, executor.calls.into_inner(), ui)
    }

    #[test]
    fn swallowed_failure_lets_later_stop_decide() {
        let temp = TempDir::new().unwrap();
        let settings = settings(temp.path().join("lock"));
        let steps = vec![step(5, 2, OnError::Stop), step(1, 1, OnError::None)];

        let (report, calls, _) = run(PipelineKind::Exec, &settings, Some(&steps[..]), "dev");

        assert_eq!(calls, vec!["1 p1", "5 p2"]);
        assert_eq!(report.status, ExitStatus::Other(5));
        assert_eq!(
            report.steps[0].disposition,
            StepDisposition::Swallowed {
                status: ExitStatus::Failure
            }
        );
        assert_eq!(
            report.steps[1].disposition,
            StepDisposition::Executed {
                status: ExitStatus::Other(5)
            }
        );
    }

    #[test]
    fn failure_halts_remaining_steps() {
        let temp = TempDir::new().unwrap();
        let settings = settings(temp.path().join("lock"));
        let steps = vec![
            step(0, 1, OnError::Propagate),
            step(2, 2, OnError::Propagate),
            step(0, 3, OnError::Propagate),
        ];

        let (report, calls, ui) = run(PipelineKind::Exec, &settings, Some(&steps[..]), "dev");

        assert_eq!(calls.len(), 2);
        assert_eq!(report.status, ExitStatus::Invalid);
        assert_eq!(report.steps.len(), 3);
        assert_eq!(report.executed_count(), 2);
        assert_eq!(report.steps[2].disposition, StepDisposition::NotExecuted);
        assert!(ui.has_skipped("Not Executed"));
        assert!(ui.has_error("Not all steps executed successfully"));
    }

    #[test]
    fn unknown_environment_is_invalid_and_touches_nothing() {
        let temp = TempDir::new().unwrap();
        let settings = settings(temp.path().join("lock"));
        let steps = vec![step(0, 1, OnError::Propagate)];

        let (report, calls, ui) = run(PipelineKind::Exec, &settings, Some(&steps[..]), "qa");

        assert_eq!(report.status, ExitStatus::Invalid);
        assert!(calls.is_empty());
        assert!(ui.has_error("[qa] is not found"));
    }

    #[test]
    fn missing_environments_fails() {
        let settings = PipelineSettings::default();
        let steps = vec![step(0, 1, OnError::Propagate)];

        let (report, calls, _) = run(PipelineKind::Validate, &settings, Some(&steps[..]), "dev");

        assert_eq!(report.status, ExitStatus::Failure);
        assert!(calls.is_empty());
    }

    #[test]
    fn missing_lockfile_fails_lock_checked_pipelines_only() {
        let settings = PipelineSettings {
            environments: Some(vec!["dev".into()]),
            locks: Some(vec!["prod".into()]),
            lockfile: None,
        };
        let steps = vec![step(0, 1, OnError::Propagate)];

        let (report, _, _) = run(PipelineKind::Exec, &settings, Some(&steps[..]), "dev");
        assert_eq!(report.status, ExitStatus::Failure);

        let (report, calls, _) = run(PipelineKind::Validate, &settings, Some(&steps[..]), "dev");
        assert_eq!(report.status, ExitStatus::Success);
        assert_eq!(calls.len(), 1);
    }

    #[test]
    fn existing_lock_blocks_locked_environment() {
        let temp = TempDir::new().unwrap();
        let lockfile = temp.path().join("state/lockfile.lock");
        std::fs::create_dir_all(lockfile.parent().unwrap()).unwrap();
        std::fs::write(&lockfile, "").unwrap();
        let settings = settings(lockfile);
        let steps = vec![step(0, 1, OnError::Propagate)];

        let (report, calls, ui) = run(PipelineKind::Install, &settings, Some(&steps[..]), "prod");
        assert_eq!(report.status, ExitStatus::Failure);
        assert!(calls.is_empty());
        assert!(ui.has_error("already exists"));

        let (report, calls, _) = run(PipelineKind::Install, &settings, Some(&steps[..]), "dev");
        assert!(report.status.is_success());
        assert_eq!(calls.len(), 1);
    }

    #[test]
    fn install_success_creates_lock_once() {
        let temp = TempDir::new().unwrap();
        let lockfile = temp.path().join("state/lockfile.lock");
        let settings = settings(lockfile.clone());
        let steps = vec![step(0, 1, OnError::Propagate)];

        let (report, _, _) = run(PipelineKind::Install, &settings, Some(&steps[..]), "prod");

        assert!(report.status.is_success());
        assert_eq!(report.lock, Some(LockCreation::Created));
        assert!(lockfile.exists());

        let (second, calls, _) = run(PipelineKind::Install, &settings, Some(&steps[..]), "prod");
        assert_eq!(second.status, ExitStatus::Failure);
        assert!(calls.is_empty());
    }

    #[test]
    fn install_failure_leaves_lock_absent() {
        let temp = TempDir::new().unwrap();
        let lockfile = temp.path().join("lockfile.lock");
        let settings = settings(lockfile.clone());
        let steps = vec![step(1, 1, OnError::Propagate)];

        let (report, _, _) = run(PipelineKind::Install, &settings, Some(&steps[..]), "prod");

        assert_eq!(report.status, ExitStatus::Failure);
        assert_eq!(report.lock, None);
        assert!(!lockfile.exists());
    }

    #[test]
    fn exec_never_creates_lock() {
        let temp = TempDir::new().unwrap();
        let lockfile = temp.path().join("lockfile.lock");
        let settings = settings(lockfile.clone());
        let steps = vec![step(0, 1, OnError::Propagate)];

        run(PipelineKind::Exec, &settings, Some(&steps[..]), "prod");

        assert!(!lockfile.exists());
    }

    #[test]
    fn absent_section_fails_and_empty_section_succeeds() {
        let temp = TempDir::new().unwrap();
        let settings = settings(temp.path().join("lock"));

        let (report, _, ui) = run(PipelineKind::Exec, &settings, None, "dev");
        assert_eq!(report.status, ExitStatus::Failure);
        assert!(ui.has_error("[commands] configuration"));

        let (report, _, ui) = run(PipelineKind::Exec, &settings, Some(&[][..]), "dev");
        assert_eq!(report.status, ExitStatus::Success);
        assert!(ui.has_success("No settings to run"));
    }

    #[test]
    fn no_match_is_failure_except_for_listings() {
        let temp = TempDir::new().unwrap();
        let settings = settings(temp.path().join("lock"));
        let mut only_prod = step(0, 1, OnError::Propagate);
        only_prod.meta.environments = vec!["prod".into()];
        let steps = vec![only_prod];

        let (report, _, _) = run(PipelineKind::Install, &settings, Some(&steps[..]), "dev");
        assert_eq!(report.status, ExitStatus::Failure);

        let (report, _, _) = run(PipelineKind::Filesystem, &settings, Some(&steps[..]), "dev");
        assert_eq!(report.status, ExitStatus::Failure);

        let mut ui = MockUI::new();
        let selection = PipelineRunner::new(PipelineKind::Listing, &settings).select(
            Some(&steps[..]),
            "dev",
            &mut ui,
        );
        match selection {
            Selection::Finished(report) => assert!(report.status.is_success()),
            Selection::Ready(_) => panic!("nothing should be selected"),
        }
    }

    #[test]
    fn no_match_policy_is_overridable() {
        let temp = TempDir::new().unwrap();
        let settings = settings(temp.path().join("lock"));
        let mut only_prod = step(0, 1, OnError::Propagate);
        only_prod.meta.environments = vec!["prod".into()];
        let steps = vec![only_prod];
        let mut ui = MockUI::new();

        let report = PipelineRunner::new(PipelineKind::Exec, &settings)
            .with_no_match_policy(NoMatchPolicy::Succeed)
            .run(
                RunContext::new("dev", false),
                Some(&steps[..]),
                &Scripted::default(),
                &mut ui,
            );

        assert!(report.status.is_success());
    }

    #[test]
    fn all_disabled_is_success() {
        let temp = TempDir::new().unwrap();
        let settings = settings(temp.path().join("lock"));
        let mut disabled = step(1, 1, OnError::Propagate);
        disabled.meta.enabled = false;
        let steps = vec![disabled];

        let (report, calls, ui) = run(PipelineKind::Exec, &settings, Some(&steps[..]), "dev");

        assert!(report.status.is_success());
        assert!(calls.is_empty());
        assert!(ui.has_success("No active settings"));
    }

    #[test]
    fn each_step_gets_start_and_finish_notices() {
        let temp = TempDir::new().unwrap();
        let settings = settings(temp.path().join("lock"));
        let steps = vec![step(0, 1, OnError::Propagate), step(0, 2, OnError::Propagate)];

        let (_, _, ui) = run(PipelineKind::Exec, &settings, Some(&steps[..]), "dev");

        assert_eq!(ui.messages().len(), 2);
        assert!(ui.messages()[0].contains("[1/2] Running 0 p1"));
        // two step notices plus the summary
        assert_eq!(ui.successes().len(), 3);
        assert!(ui.has_success("All steps executed successfully"));
    }

    #[test]
    fn quiet_runs_still_announce_each_step() {
        let temp = TempDir::new().unwrap();
        let settings = settings(temp.path().join("lock"));
        let steps = vec![step(0, 1, OnError::Propagate), step(0, 2, OnError::Propagate)];
        let mut ui = MockUI::with_mode(OutputMode::Quiet);

        let report = PipelineRunner::new(PipelineKind::Exec, &settings).run(
            RunContext::new("dev", false),
            Some(&steps[..]),
            &Scripted::default(),
            &mut ui,
        );

        assert!(report.status.is_success());
        assert_eq!(ui.started().len(), 2);
        assert!(ui.started()[1].contains("[2/2] Running 0 p2"));
    }

    #[test]
    fn unlocked_environment_leaves_no_marker() {
        let temp = TempDir::new().unwrap();
        let lockfile = temp.path().join("lock");
        let settings = settings(lockfile.clone());
        let steps = vec![step(0, 1, OnError::Propagate)];

        let (dev, _, _) = run(PipelineKind::Install, &settings, Some(&steps[..]), "dev");
        let (prod, calls, _) = run(PipelineKind::Install, &settings, Some(&steps[..]), "prod");

        assert!(dev.status.is_success());
        assert!(dev.lock.is_none());
        assert!(prod.status.is_success());
        assert_eq!(calls.len(), 1);
        assert!(lockfile.exists());
    }
}
