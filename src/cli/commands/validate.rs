//! Validate command implementation.
//!
//! The `deckhand validate` command checks every configured path for an
//! environment against its validators and prints one table per path.

use crate::cli::args::ValidateArgs;
use crate::config::ConfigLocation;
use crate::error::Result;
use crate::runner::{PipelineKind, PipelineSettings, ValidationRunner};
use crate::ui::UserInterface;
use crate::validators::ValidatorRegistry;

use super::dispatcher::{load_project_config, Command, CommandResult};
use super::display::show_pipeline_header;

/// The validate command implementation.
pub struct ValidateCommand {
    location: ConfigLocation,
    args: ValidateArgs,
}

impl ValidateCommand {
    /// Create a new validate command.
    pub fn new(location: &ConfigLocation, args: ValidateArgs) -> Self {
        Self {
            location: location.clone(),
            args,
        }
    }
}

impl Command for ValidateCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(config) = load_project_config(&self.location, ui)? else {
            return Ok(CommandResult::failure(1));
        };

        let environment = &self.args.environment;
        show_pipeline_header(ui, PipelineKind::Validate, environment);

        let settings = PipelineSettings::from_config(&config);
        let validators = ValidatorRegistry::builtin();
        let report = ValidationRunner::new(&settings, &validators, &self.location.project_root)
            .only_errors(self.args.only_errors)
            .run(environment, config.validate.as_deref(), ui)?;

        Ok(CommandResult::from_status(report.status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
validate:
  - path: "config/{{ env }}.yml"
    type: file
    environments: [dev, prod]
    validations:
      - exists
      - is_file
  - path: missing
    type: directory
    environments: [prod]
    validations:
      - exists
"#;

    fn project() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".deckhand")).unwrap();
        fs::write(temp.path().join(".deckhand/config.yml"), CONFIG).unwrap();
        fs::create_dir_all(temp.path().join("config")).unwrap();
        fs::write(temp.path().join("config/dev.yml"), "").unwrap();
        fs::write(temp.path().join("config/prod.yml"), "").unwrap();
        temp
    }

    fn validate(temp: &TempDir, env: &str, only_errors: bool) -> (CommandResult, MockUI) {
        let mut ui = MockUI::new();
        let args = ValidateArgs {
            environment: env.into(),
            only_errors,
        };
        let result = ValidateCommand::new(&ConfigLocation::new(temp.path()), args)
            .execute(&mut ui)
            .unwrap();
        (result, ui)
    }

    #[test]
    fn passing_paths_report_no_errors() {
        let temp = project();

        let (result, ui) = validate(&temp, "dev", false);

        assert!(result.success);
        assert_eq!(ui.headers()[0], "Validate [dev]");
        assert!(ui.has_message("config/dev.yml"));
        assert!(ui.has_success("No errors found"));
    }

    #[test]
    fn missing_path_fails() {
        let temp = project();

        let (result, ui) = validate(&temp, "prod", false);

        assert_eq!(result, CommandResult::failure(1));
        assert!(ui.has_error("Errors found in 1 path(s)"));
    }

    #[test]
    fn only_errors_hides_passing_tables() {
        let temp = project();

        let (_, ui) = validate(&temp, "prod", true);

        assert!(!ui.has_message("config/prod.yml"));
        assert!(ui.has_message("missing"));
    }

    #[test]
    fn unknown_environment_is_invalid() {
        let temp = project();

        let (result, ui) = validate(&temp, "qa", false);

        assert_eq!(result, CommandResult::failure(2));
        assert!(ui.has_error("The environment [qa] is not found in the configuration"));
    }
}
