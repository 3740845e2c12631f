//! Source command implementation.
//!
//! The `deckhand source` command shows the effective configuration after
//! defaults have been applied.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cli::args::SourceArgs;
use crate::config::{ConfigLocation, DeckhandConfig};
use crate::error::{DeckhandError, Result};
use crate::ui::{Table, UserInterface};

use super::dispatcher::{load_project_config, Command, CommandResult};

/// The source command implementation.
pub struct SourceCommand {
    location: ConfigLocation,
    args: SourceArgs,
}

/// Effective configuration as reported by `deckhand source`.
#[derive(Debug, Serialize)]
pub struct SourceSummary {
    pub config_file: PathBuf,
    pub path: Option<PathBuf>,
    pub path_exists: bool,
    pub environments: Vec<String>,
    pub locks: Vec<String>,
    pub lockfile: Option<PathBuf>,
    pub lockfile_exists: bool,
    pub install: usize,
    pub commands: usize,
    pub filesystem: usize,
    pub validate: usize,
}

impl SourceSummary {
    /// Summarize a loaded configuration.
    pub fn new(config_file: PathBuf, config: &DeckhandConfig) -> Self {
        Self {
            config_file,
            path_exists: config.path.as_deref().is_some_and(Path::is_dir),
            path: config.path.clone(),
            environments: config.environments.clone().unwrap_or_default(),
            locks: config.locks.clone().unwrap_or_default(),
            lockfile_exists: config.lockfile.as_deref().is_some_and(Path::exists),
            lockfile: config.lockfile.clone(),
            install: DeckhandConfig::section_len(&config.install),
            commands: DeckhandConfig::section_len(&config.commands),
            filesystem: DeckhandConfig::section_len(&config.filesystem),
            validate: DeckhandConfig::section_len(&config.validate),
        }
    }

    fn table(&self) -> Table {
        let display = |p: &Option<PathBuf>| {
            p.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        };
        let yes_no = |b: bool| if b { "yes" } else { "no" };

        let mut table = Table::new(vec!["Setting", "Value"]);
        table.add_row(vec![
            "Config file".to_string(),
            self.config_file.display().to_string(),
        ]);
        table.add_row(vec!["Path".to_string(), display(&self.path)]);
        table.add_row(vec![
            "Path exists".to_string(),
            yes_no(self.path_exists).to_string(),
        ]);
        table.add_row(vec!["Environments".to_string(), self.environments.join(", ")]);
        table.add_row(vec!["Locks".to_string(), self.locks.join(", ")]);
        table.add_row(vec!["Lockfile".to_string(), display(&self.lockfile)]);
        table.add_row(vec![
            "Lockfile exists".to_string(),
            yes_no(self.lockfile_exists).to_string(),
        ]);
        table.add_row(vec!["Install steps".to_string(), self.install.to_string()]);
        table.add_row(vec!["Commands".to_string(), self.commands.to_string()]);
        table.add_row(vec!["Filesystem steps".to_string(), self.filesystem.to_string()]);
        table.add_row(vec!["Validations".to_string(), self.validate.to_string()]);
        table
    }
}

impl SourceCommand {
    /// Create a new source command.
    pub fn new(location: &ConfigLocation, args: SourceArgs) -> Self {
        Self {
            location: location.clone(),
            args,
        }
    }
}

impl Command for SourceCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(config) = load_project_config(&self.location, ui)? else {
            return Ok(CommandResult::failure(1));
        };

        let summary = SourceSummary::new(self.location.config_path(), &config);

        if self.args.json {
            let json = serde_json::to_string_pretty(&summary)
                .map_err(|e| DeckhandError::Other(e.into()))?;
            ui.message(&json);
        } else {
            ui.show_header("Source");
            ui.show_table(&summary.table());
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".deckhand")).unwrap();
        fs::write(
            temp.path().join(".deckhand/config.yml"),
            r#"
environments: [dev, staging]
commands:
  - command: [echo, hi]
    environments: [dev]
"#,
        )
        .unwrap();
        temp
    }

    fn source(temp: &TempDir, json: bool) -> MockUI {
        let mut ui = MockUI::new();
        let result = SourceCommand::new(&ConfigLocation::new(temp.path()), SourceArgs { json })
            .execute(&mut ui)
            .unwrap();
        assert!(result.success);
        ui
    }

    #[test]
    fn table_shows_effective_settings() {
        let temp = project();

        let ui = source(&temp, false);

        assert!(ui.has_message("prod, dev, staging"));
        assert!(ui.has_message("lockfile.lock"));
        assert!(ui.has_message("Commands"));
    }

    #[test]
    fn json_reports_counts_and_existence() {
        let temp = project();
        fs::write(temp.path().join(".deckhand/lockfile.lock"), "").unwrap();

        let ui = source(&temp, true);

        let value: serde_json::Value = serde_json::from_str(&ui.messages()[0]).unwrap();
        assert_eq!(value["commands"], 1);
        assert_eq!(value["install"], 0);
        assert_eq!(value["path_exists"], true);
        assert_eq!(value["lockfile_exists"], true);
        assert_eq!(value["locks"], serde_json::json!(["prod"]));
    }

    #[test]
    fn missing_config_fails() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();

        let result = SourceCommand::new(&ConfigLocation::new(temp.path()), SourceArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert_eq!(result, CommandResult::failure(1));
    }
}
