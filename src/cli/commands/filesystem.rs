//! Filesystem command implementation.
//!
//! The `deckhand filesystem` command runs the configured directory, symlink
//! and mirror operations for an environment. `--mirror`, `--symlink` and
//! `--directory` restrict which operation types run; without any of them
//! every type runs.

use crate::cli::args::FilesystemArgs;
use crate::config::{ConfigLocation, DeckhandConfig, FilesystemOperation, FilesystemStep};
use crate::error::Result;
use crate::runner::{PipelineKind, PipelineRunner, PipelineSettings, RunContext};
use crate::steps::FilesystemExecutor;
use crate::ui::UserInterface;

use super::dispatcher::{load_project_config, Command, CommandResult};
use super::display::show_pipeline_header;

/// The filesystem command implementation.
pub struct FilesystemCommand {
    location: ConfigLocation,
    args: FilesystemArgs,
}

impl FilesystemCommand {
    /// Create a new filesystem command.
    pub fn new(location: &ConfigLocation, args: FilesystemArgs) -> Self {
        Self {
            location: location.clone(),
            args,
        }
    }

    /// Operation types selected by the flags.
    pub fn selected_operations(&self) -> Vec<FilesystemOperation> {
        let flagged: Vec<_> = FilesystemOperation::ALL
            .into_iter()
            .filter(|op| match op {
                FilesystemOperation::Mirror => self.args.mirror,
                FilesystemOperation::Symlink => self.args.symlink,
                FilesystemOperation::Directory => self.args.directory,
            })
            .collect();

        if flagged.is_empty() {
            FilesystemOperation::ALL.to_vec()
        } else {
            flagged
        }
    }
}

impl Command for FilesystemCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(config) = load_project_config(&self.location, ui)? else {
            return Ok(CommandResult::failure(1));
        };

        let environment = &self.args.pipeline.environment;
        show_pipeline_header(ui, PipelineKind::Filesystem, environment);

        let selected = self.selected_operations();
        let steps: Option<Vec<FilesystemStep>> = config.filesystem.as_ref().map(|steps| {
            steps
                .iter()
                .filter(|s| selected.contains(&s.operation))
                .cloned()
                .collect()
        });

        let configured = DeckhandConfig::section_len(&config.filesystem);
        if configured > 0 && steps.as_ref().is_some_and(Vec::is_empty) {
            let titles: Vec<_> = selected.iter().map(|op| op.title()).collect();
            ui.success(&format!(
                "No settings to run for type(s) [{}]",
                titles.join(", ")
            ));
            return Ok(CommandResult::success());
        }

        let settings = PipelineSettings::from_config(&config);
        let executor = FilesystemExecutor::new(&self.location.project_root);
        let report = PipelineRunner::new(PipelineKind::Filesystem, &settings).run(
            RunContext::new(environment.as_str(), self.args.pipeline.show_output),
            steps.as_deref(),
            &executor,
            ui,
        );

        Ok(CommandResult::from_status(report.status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::PipelineArgs;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
filesystem:
  - type: directory
    source: unused
    destination: "var/{{ env }}/cache"
    environments: [dev, prod]
  - type: mirror
    source: assets
    destination: public/assets
    environments: [dev]
    priority: 2
"#;

    fn project() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".deckhand")).unwrap();
        fs::write(temp.path().join(".deckhand/config.yml"), CONFIG).unwrap();
        fs::create_dir_all(temp.path().join("assets")).unwrap();
        fs::write(temp.path().join("assets/app.js"), "ok").unwrap();
        temp
    }

    fn args(env: &str) -> FilesystemArgs {
        FilesystemArgs {
            pipeline: PipelineArgs {
                environment: env.into(),
                show_output: false,
            },
            ..Default::default()
        }
    }

    fn run(temp: &TempDir, args: FilesystemArgs) -> (CommandResult, MockUI) {
        let mut ui = MockUI::new();
        let result = FilesystemCommand::new(&ConfigLocation::new(temp.path()), args)
            .execute(&mut ui)
            .unwrap();
        (result, ui)
    }

    #[test]
    fn no_flags_selects_every_type() {
        let temp = TempDir::new().unwrap();
        let cmd = FilesystemCommand::new(&ConfigLocation::new(temp.path()), args("dev"));
        assert_eq!(cmd.selected_operations(), FilesystemOperation::ALL.to_vec());
    }

    #[test]
    fn runs_all_operations() {
        let temp = project();

        let (result, _) = run(&temp, args("dev"));

        assert!(result.success);
        assert!(temp.path().join("var/dev/cache").is_dir());
        assert_eq!(
            fs::read_to_string(temp.path().join("public/assets/app.js")).unwrap(),
            "ok"
        );
    }

    #[test]
    fn directory_flag_restricts_types() {
        let temp = project();
        let mut args = args("dev");
        args.directory = true;

        let (result, _) = run(&temp, args);

        assert!(result.success);
        assert!(temp.path().join("var/dev/cache").is_dir());
        assert!(!temp.path().join("public").exists());
    }

    #[test]
    fn type_filter_leaving_nothing_succeeds() {
        let temp = project();
        let mut args = args("dev");
        args.symlink = true;

        let (result, ui) = run(&temp, args);

        assert!(result.success);
        assert!(ui.has_success("No settings to run for type(s) [Symlink]"));
    }

    #[test]
    fn no_steps_for_environment_fails() {
        let temp = project();
        fs::write(
            temp.path().join(".deckhand/config.yml"),
            CONFIG.replace("[dev, prod]", "[dev]"),
        )
        .unwrap();

        let (result, ui) = run(&temp, args("prod"));

        assert_eq!(result, CommandResult::failure(1));
        assert!(ui.has_error("No settings to run in [prod]"));
    }
}
