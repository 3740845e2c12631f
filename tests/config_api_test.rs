//! Integration tests for configuration loading and templating.

use deckhand::config::{
    load_config, replace_all, replace_deep, validate_config, ConfigLocation, DeckhandConfig,
    FilesystemOperation, OnError, PathKind,
};
use deckhand::steps::{PipelineStep, StepCollection};
use deckhand::DeckhandError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_config(root: &Path, content: &str) {
    fs::create_dir_all(root.join(".deckhand")).unwrap();
    fs::write(root.join(".deckhand/config.yml"), content).unwrap();
}

const FULL_CONFIG: &str = r#"
environments: [dev, staging]
locks: [staging]
lockfile: var/deploy.lock
install:
  - command: deckhand:validate
    environments: staging
    arguments:
      environment: "{{ env }}"
commands:
  - name: migrate
    command: [bin/console, "doctrine:migrations:migrate", "--env={{ env }}"]
    environments: [dev, staging]
    if_error: stop
    priority: 2
filesystem:
  - type: symlink
    source: shared/uploads
    destination: public/uploads
    environments: [staging]
    enable: false
validate:
  - path: var/log
    type: directory
    environments: [dev]
    validations:
      - exists
      - name: filepath_perms
        parameters: { perms: "0775" }
"#;

#[test]
fn loads_every_section_with_defaults_applied() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), FULL_CONFIG);

    let config = load_config(temp.path(), None).unwrap();

    assert_eq!(
        config.environments.as_deref().unwrap(),
        ["prod", "dev", "staging"]
    );
    assert_eq!(config.locks.as_deref().unwrap(), ["prod", "staging"]);
    assert_eq!(
        config.lockfile.as_deref(),
        Some(temp.path().join("var/deploy.lock").as_path())
    );

    let install = config.install.as_ref().unwrap();
    assert_eq!(install[0].meta.environments, ["staging"]);

    let commands = config.commands.as_ref().unwrap();
    assert_eq!(commands[0].meta.on_error, OnError::Stop);
    assert_eq!(commands[0].meta.priority, 2);

    let filesystem = config.filesystem.as_ref().unwrap();
    assert_eq!(filesystem[0].operation, FilesystemOperation::Symlink);
    assert!(!filesystem[0].meta.enabled);

    let validate = config.validate.as_ref().unwrap();
    assert_eq!(validate[0].kind, PathKind::Directory);
    assert_eq!(validate[0].validations[1].name, "filepath_perms");
    assert_eq!(validate[0].validations[1].parameters.len(), 1);
}

#[test]
fn config_location_uses_override() {
    let temp = TempDir::new().unwrap();
    let custom = temp.path().join("deploy.yml");
    fs::write(&custom, "environments: [qa]\n").unwrap();

    let location = ConfigLocation::new(temp.path()).with_override(Some(custom.clone()));

    assert_eq!(location.config_path(), custom);
    let config = location.load().unwrap();
    assert!(config.environments.unwrap().contains(&"qa".to_string()));
}

#[test]
fn structural_problems_are_collected() {
    let config: DeckhandConfig = serde_yaml::from_str(
        r#"
commands:
  - command: []
    environments: []
validate:
  - path: ""
    type: file
    environments: [dev]
"#,
    )
    .unwrap();

    let errors = validate_config(&config);

    assert!(errors.len() >= 3);
}

#[test]
fn invalid_steps_fail_loading() {
    let temp = TempDir::new().unwrap();
    write_config(
        temp.path(),
        "filesystem:\n  - type: directory\n    source: ''\n    destination: ''\n    environments: [dev]\n",
    );

    let result = load_config(temp.path(), None);

    assert!(matches!(
        result,
        Err(DeckhandError::ConfigValidationError { .. })
    ));
}

#[test]
fn templating_is_pure() {
    let argv = vec!["deploy".to_string(), "--env={{env}}".to_string()];
    assert_eq!(replace_all(&argv, "prod"), ["deploy", "--env=prod"]);
    assert_eq!(argv[1], "--env={{env}}");

    let value: serde_yaml::Value =
        serde_yaml::from_str("{ target: \"{{ env }}\", list: [\"a-{{ env }}\", 3] }").unwrap();
    let rendered = replace_deep(&value, "dev");
    assert_eq!(rendered["target"], "dev");
    assert_eq!(rendered["list"][0], "a-dev");
    assert_eq!(rendered["list"][1], 3);
}

#[test]
fn collection_orders_loaded_steps() {
    let temp = TempDir::new().unwrap();
    write_config(
        temp.path(),
        r#"
commands:
  - command: [c]
    environments: [dev]
    priority: 3
  - command: [a]
    environments: [dev]
    priority: 1
  - command: [b]
    environments: [dev]
    priority: 1
  - command: [z]
    environments: [prod]
"#,
    );
    let config = load_config(temp.path(), None).unwrap();
    let commands = config.commands.unwrap();

    let ordered = StepCollection::from_slice(&commands)
        .for_environment("dev")
        .enabled()
        .group_by_priority_ascending();
    let labels: Vec<_> = ordered.iter().map(|s| s.label("dev")).collect();
    assert_eq!(labels, ["a", "b", "c"]);

    let descending: Vec<_> = ordered
        .group_by_priority_descending()
        .iter()
        .map(|s| s.describe())
        .collect();
    assert_eq!(descending, ["c", "a", "b"]);
}
