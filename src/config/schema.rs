//! Configuration schema definitions for Deckhand.
//!
//! This module contains all the struct definitions that map to
//! the YAML configuration file format.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// Environment that is always configured and always locked.
pub const PROTECTED_ENVIRONMENT: &str = "prod";

/// Default state directory, relative to the project root.
pub const DEFAULT_STATE_DIR: &str = ".deckhand";

/// File name of the lock marker inside the state directory.
pub const LOCKFILE_NAME: &str = "lockfile.lock";

/// Root configuration structure for `.deckhand/config.yml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckhandConfig {
    /// State directory holding the lock marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Environments steps may be run against.
    #[serde(
        deserialize_with = "optional_one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub environments: Option<Vec<String>>,

    /// Environments protected by the lock marker.
    #[serde(
        deserialize_with = "optional_one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub locks: Option<Vec<String>>,

    /// Lock marker location (defaults to `<path>/lockfile.lock`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lockfile: Option<PathBuf>,

    /// In-process operations run by `deckhand install`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install: Option<Vec<SubCommandStep>>,

    /// External processes run by `deckhand exec`.
    #[serde(alias = "cli", skip_serializing_if = "Option::is_none")]
    pub commands: Option<Vec<ProcessStep>>,

    /// Filesystem operations run by `deckhand filesystem`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filesystem: Option<Vec<FilesystemStep>>,

    /// Path checks run by `deckhand validate`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validate: Option<Vec<ValidationStep>>,
}

impl DeckhandConfig {
    /// Apply defaults the way an unconfigured project expects them.
    ///
    /// - `path` defaults to `.deckhand` and is anchored at `project_root`
    /// - `environments` defaults to `[dev, prod]`, `locks` to `[prod]`;
    ///   `prod` is always present in both
    /// - `lockfile` defaults to `<path>/lockfile.lock`
    /// - missing step sections become empty lists
    pub fn normalize(&mut self, project_root: &Path) {
        let path = self
            .path
            .take()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR));
        let path = anchor(project_root, path);

        self.environments = Some(with_protected(
            self.environments.take(),
            &["dev", PROTECTED_ENVIRONMENT],
        ));
        self.locks = Some(with_protected(self.locks.take(), &[PROTECTED_ENVIRONMENT]));

        self.lockfile = Some(match self.lockfile.take() {
            Some(lockfile) => anchor(project_root, lockfile),
            None => path.join(LOCKFILE_NAME),
        });
        self.path = Some(path);

        self.install.get_or_insert_with(Vec::new);
        self.commands.get_or_insert_with(Vec::new);
        self.filesystem.get_or_insert_with(Vec::new);
        self.validate.get_or_insert_with(Vec::new);
    }

    /// Number of configured steps in a section (0 when absent).
    pub fn section_len<T>(section: &Option<Vec<T>>) -> usize {
        section.as_ref().map_or(0, Vec::len)
    }
}

fn anchor(project_root: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        project_root.join(path)
    }
}

fn with_protected(configured: Option<Vec<String>>, defaults: &[&str]) -> Vec<String> {
    match configured {
        Some(mut list) if !list.is_empty() => {
            if !list.iter().any(|e| e == PROTECTED_ENVIRONMENT) {
                list.insert(0, PROTECTED_ENVIRONMENT.to_string());
            }
            list
        }
        _ => defaults.iter().map(|s| s.to_string()).collect(),
    }
}

/// How a failing step affects the rest of the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnError {
    /// Swallow the failure; the pipeline continues as if the step succeeded.
    None,
    /// Use the step's raw exit code as the pipeline status.
    Stop,
    /// Map the step's exit code to the canonical status space.
    #[default]
    Propagate,
}

/// Metadata shared by every step kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepMeta {
    /// Optional human-readable label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Environments in which this step is eligible.
    #[serde(deserialize_with = "one_or_many")]
    pub environments: Vec<String>,

    /// Disabled steps are never selected.
    #[serde(default = "default_true", alias = "enable")]
    pub enabled: bool,

    /// Ascending execution order; ties keep declaration order.
    #[serde(default = "default_priority")]
    pub priority: i64,

    /// Error policy.
    #[serde(default, alias = "if_error")]
    pub on_error: OnError,
}

impl StepMeta {
    /// Create metadata eligible in the given environments, with defaults.
    pub fn new<I, S>(environments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: None,
            environments: environments.into_iter().map(Into::into).collect(),
            enabled: true,
            priority: default_priority(),
            on_error: OnError::default(),
        }
    }

    /// Set the priority.
    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    /// Set the error policy.
    pub fn with_on_error(mut self, on_error: OnError) -> Self {
        self.on_error = on_error;
        self
    }

    /// Set the enabled flag.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Whether this step is eligible in `environment`.
    pub fn runs_in(&self, environment: &str) -> bool {
        self.environments.iter().any(|e| e == environment)
    }
}

fn default_true() -> bool {
    true
}

fn default_priority() -> i64 {
    1
}

/// An external process, given as an argv list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessStep {
    #[serde(flatten)]
    pub meta: StepMeta,

    /// Program followed by its arguments; each token may contain `{{ env }}`.
    #[serde(deserialize_with = "one_or_many")]
    pub command: Vec<String>,
}

/// Filesystem operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilesystemOperation {
    /// Create `destination` as a directory.
    Directory,
    /// Make `destination` a symbolic link pointing at `source`.
    Symlink,
    /// Copy `source` recursively into `destination`.
    Mirror,
}

impl FilesystemOperation {
    /// All operation kinds, in display order.
    pub const ALL: [FilesystemOperation; 3] = [Self::Mirror, Self::Symlink, Self::Directory];

    /// Title used in status lines.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Directory => "Directory",
            Self::Symlink => "Symlink",
            Self::Mirror => "Mirror",
        }
    }
}

impl std::fmt::Display for FilesystemOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title().to_lowercase())
    }
}

/// A directory, symlink or mirror operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilesystemStep {
    #[serde(flatten)]
    pub meta: StepMeta,

    #[serde(rename = "type")]
    pub operation: FilesystemOperation,

    pub source: String,

    pub destination: String,
}

/// An in-process operation invoked by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubCommandStep {
    #[serde(flatten)]
    pub meta: StepMeta,

    /// Registered operation name (templatable).
    pub command: String,

    /// Arguments handed to the operation (deep-templated).
    #[serde(default, deserialize_with = "mapping_or_empty")]
    pub arguments: serde_yaml::Mapping,
}

/// Kind of path a validation step describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    Directory,
    File,
    Request,
    Custom,
}

impl std::fmt::Display for PathKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Directory => "directory",
            Self::File => "file",
            Self::Request => "request",
            Self::Custom => "custom",
        };
        write!(f, "{}", s)
    }
}

/// A path checked by a named sequence of validators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationStep {
    #[serde(flatten)]
    pub meta: StepMeta,

    #[serde(alias = "filepath")]
    pub path: String,

    #[serde(rename = "type")]
    pub kind: PathKind,

    #[serde(default)]
    pub validations: Vec<ValidationRule>,
}

/// One validator invocation: a registered name plus its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawValidationRule")]
pub struct ValidationRule {
    pub name: String,

    #[serde(default, skip_serializing_if = "serde_yaml::Mapping::is_empty")]
    pub parameters: serde_yaml::Mapping,
}

impl ValidationRule {
    /// A rule without parameters.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: serde_yaml::Mapping::new(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValidationRule {
    Name(String),
    Full {
        name: String,
        #[serde(default, deserialize_with = "mapping_or_empty")]
        parameters: serde_yaml::Mapping,
    },
}

impl From<RawValidationRule> for ValidationRule {
    fn from(raw: RawValidationRule) -> Self {
        match raw {
            RawValidationRule::Name(name) => Self::named(name),
            RawValidationRule::Full { name, parameters } => Self { name, parameters },
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for Vec<String> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(s) if s.is_empty() => Vec::new(),
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    OneOrMany::deserialize(deserializer).map(Into::into)
}

fn optional_one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<OneOrMany>::deserialize(deserializer).map(|v| v.map(Into::into))
}

fn mapping_or_empty<'de, D>(deserializer: D) -> Result<serde_yaml::Mapping, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::Null => Ok(serde_yaml::Mapping::new()),
        serde_yaml::Value::Mapping(m) => Ok(m),
        other => Err(D::Error::custom(format!(
            "expected a mapping of arguments, found {:?}",
            other
        ))),
    }
}
