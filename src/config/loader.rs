//! Configuration file discovery and loading.
//!
//! The project configuration lives at `.deckhand/config.yml`. A `--config`
//! override replaces discovery entirely. Every loaded configuration is
//! normalized (defaults applied) and structurally validated before the
//! pipelines ever see it.

use crate::config::schema::{DeckhandConfig, DEFAULT_STATE_DIR};
use crate::config::validator::ensure_valid;
use crate::error::{DeckhandError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the project configuration inside the state directory.
pub const CONFIG_FILE_NAME: &str = "config.yml";

/// Default location of the project configuration.
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(DEFAULT_STATE_DIR).join(CONFIG_FILE_NAME)
}

/// Find the project root by walking up from `start`.
///
/// Looks for:
/// 1. `.deckhand` directory (primary indicator)
/// 2. `.git` directory (fallback)
///
/// # Returns
///
/// The path to the project root, or None if not found.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(DEFAULT_STATE_DIR).is_dir() {
            return Some(current);
        }

        if current.join(".git").exists() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load a single config file and parse it into [`DeckhandConfig`].
///
/// The result is neither normalized nor validated.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<DeckhandConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DeckhandError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            DeckhandError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into [`DeckhandConfig`].
///
/// An empty document yields the default configuration.
pub fn parse_config(content: &str, source_path: &Path) -> Result<DeckhandConfig> {
    if content.trim().is_empty() {
        return Ok(DeckhandConfig::default());
    }

    serde_yaml::from_str(content).map_err(|e| DeckhandError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load, normalize and validate the configuration for a project.
///
/// If `config_override` is provided it is loaded instead of
/// `.deckhand/config.yml`.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<DeckhandConfig> {
    let path = match config_override {
        Some(path) => path.to_path_buf(),
        None => project_config_path(project_root),
    };

    debug!("Loading configuration from {}", path.display());

    let mut config = load_config_file(&path)?;
    config.normalize(project_root);
    ensure_valid(&config)?;

    Ok(config)
}

/// Where a project's configuration comes from.
///
/// Commands and nested operations carry this instead of a loaded config so
/// that every run reads the configuration fresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    /// Project root; relative paths in the configuration resolve against it.
    pub project_root: PathBuf,
    /// Explicit configuration file replacing `.deckhand/config.yml`.
    pub config_override: Option<PathBuf>,
}

impl ConfigLocation {
    /// Location using the default configuration path under `project_root`.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            config_override: None,
        }
    }

    /// Use `config_override` instead of the default path when set.
    pub fn with_override(mut self, config_override: Option<PathBuf>) -> Self {
        self.config_override = config_override;
        self
    }

    /// Path of the configuration file that [`ConfigLocation::load`] reads.
    pub fn config_path(&self) -> PathBuf {
        self.config_override
            .clone()
            .unwrap_or_else(|| project_config_path(&self.project_root))
    }

    /// Load, normalize and validate the configuration.
    pub fn load(&self) -> Result<DeckhandConfig> {
        load_config(&self.project_root, self.config_override.as_deref())
    }
}
