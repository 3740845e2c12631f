//! List command implementation.
//!
//! The `deckhand list` command shows which steps each pipeline would run
//! for an environment, in execution order, without running any of them.

use serde::Serialize;

use crate::cli::args::ListArgs;
use crate::config::{ConfigLocation, OnError};
use crate::error::{DeckhandError, Result};
use crate::runner::{Conclusion, PipelineKind, PipelineRunner, PipelineSettings, Selection};
use crate::steps::{PipelineStep, StepKind};
use crate::ui::{SilentUI, UserInterface};

use super::dispatcher::{load_project_config, Command, CommandResult};
use super::display::{show_pipeline_header, step_line};

/// The list command implementation.
pub struct ListCommand {
    location: ConfigLocation,
    args: ListArgs,
}

/// A step that would run.
#[derive(Debug, Serialize)]
pub struct ListedStep {
    pub label: String,
    pub priority: i64,
    pub on_error: OnError,
}

/// Selection for one configuration section.
#[derive(Debug, Serialize)]
pub struct ListedSection {
    pub section: &'static str,
    pub kind: StepKind,
    pub steps: Vec<ListedStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

enum Listing {
    Section(ListedSection),
    Rejected(CommandResult, String),
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(location: &ConfigLocation, args: ListArgs) -> Self {
        Self {
            location: location.clone(),
            args,
        }
    }

    fn list<T: PipelineStep>(&self, runner: &PipelineRunner<'_>, steps: Option<&[T]>) -> Listing {
        let environment = &self.args.environment;
        match runner.select(steps, environment, &mut SilentUI::new()) {
            Selection::Ready(ordered) => Listing::Section(ListedSection {
                section: T::KIND.section(),
                kind: T::KIND,
                steps: ordered
                    .iter()
                    .map(|step| ListedStep {
                        label: step.label(environment),
                        priority: step.meta().priority,
                        on_error: step.meta().on_error,
                    })
                    .collect(),
                note: None,
            }),
            Selection::Finished(report) => {
                let note = match report.conclusion {
                    Conclusion::Rejected(reason) => {
                        return Listing::Rejected(CommandResult::from_status(report.status), reason)
                    }
                    Conclusion::Empty(reason) => Some(reason),
                    Conclusion::Completed => None,
                };
                Listing::Section(ListedSection {
                    section: T::KIND.section(),
                    kind: T::KIND,
                    steps: Vec::new(),
                    note,
                })
            }
        }
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(config) = load_project_config(&self.location, ui)? else {
            return Ok(CommandResult::failure(1));
        };

        let environment = &self.args.environment;
        let settings = PipelineSettings::from_config(&config);
        let runner = PipelineRunner::new(PipelineKind::Listing, &settings);

        let listings = [
            self.list(&runner, config.install.as_deref()),
            self.list(&runner, config.commands.as_deref()),
            self.list(&runner, config.filesystem.as_deref()),
            self.list(&runner, config.validate.as_deref()),
        ];

        let mut sections = Vec::with_capacity(listings.len());
        for listing in listings {
            match listing {
                Listing::Section(section) => sections.push(section),
                Listing::Rejected(result, reason) => {
                    ui.error(&reason);
                    return Ok(result);
                }
            }
        }

        if self.args.json {
            let json = serde_json::to_string_pretty(&sections)
                .map_err(|e| DeckhandError::Other(e.into()))?;
            ui.message(&json);
            return Ok(CommandResult::success());
        }

        show_pipeline_header(ui, PipelineKind::Listing, environment);
        let mut total = 0;
        for section in &sections {
            ui.message(&format!("{}:", section.section));
            if let Some(note) = &section.note {
                ui.skipped(&format!("  {}", note));
            }
            for step in &section.steps {
                ui.message(&step_line(step.priority, step.on_error, &step.label));
            }
            total += section.steps.len();
        }
        ui.success(&format!("{} step(s) would run in [{}]", total, environment));

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
install:
  - command: echo
    environments: [dev]
    priority: 5
commands:
  - command: [echo, "{{ env }}"]
    environments: [dev, prod]
    priority: 3
  - name: "build {{ env }}"
    command: [make, build]
    environments: [dev]
    on_error: stop
  - command: [echo, disabled]
    environments: [dev]
    enabled: false
"#;

    fn project() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".deckhand")).unwrap();
        fs::write(temp.path().join(".deckhand/config.yml"), CONFIG).unwrap();
        temp
    }

    fn list(temp: &TempDir, env: &str, json: bool) -> (CommandResult, MockUI) {
        let mut ui = MockUI::new();
        let args = ListArgs {
            environment: env.into(),
            json,
        };
        let result = ListCommand::new(&ConfigLocation::new(temp.path()), args)
            .execute(&mut ui)
            .unwrap();
        (result, ui)
    }

    #[test]
    fn lists_steps_in_priority_order() {
        let temp = project();

        let (result, ui) = list(&temp, "dev", false);

        assert!(result.success);
        let build = ui.messages().iter().position(|m| m.ends_with("build dev"));
        let echo = ui.messages().iter().position(|m| m.ends_with("echo dev"));
        assert!(build.unwrap() < echo.unwrap());
        assert!(!ui.has_message("disabled"));
        assert!(ui.has_message("stop      build dev"));
        assert!(ui.has_success("3 step(s) would run in [dev]"));
    }

    #[test]
    fn no_match_is_not_a_failure() {
        let temp = project();

        let (result, ui) = list(&temp, "prod", false);

        assert!(result.success);
        assert!(ui.has_skipped("No settings to run in [prod]"));
        assert!(ui.has_success("1 step(s) would run in [prod]"));
    }

    #[test]
    fn unknown_environment_is_rejected() {
        let temp = project();

        let (result, ui) = list(&temp, "qa", false);

        assert_eq!(result, CommandResult::failure(2));
        assert_eq!(ui.errors().len(), 1);
    }

    #[test]
    fn json_lists_sections() {
        let temp = project();

        let (result, ui) = list(&temp, "dev", true);

        assert!(result.success);
        let value: serde_json::Value = serde_json::from_str(&ui.messages()[0]).unwrap();
        assert_eq!(value[0]["section"], "install");
        assert_eq!(value[1]["kind"], "process");
        assert_eq!(value[1]["steps"][0]["label"], "build dev");
        assert_eq!(value[1]["steps"][0]["on_error"], "stop");
        assert_eq!(value[2]["note"], "No settings to run");
    }
}
