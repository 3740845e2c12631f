//! Named path validators used by `validate` steps.
//!
//! A [`ValidatorRegistry`] maps names like `exists` or `filepath_perms` to
//! [`Validator`] values. Looking up an unknown name yields
//! [`ValidatorLookup::NotFound`], which the validation runner reports
//! without failing the path.

pub mod builtin;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_yaml::Mapping;

use crate::error::{DeckhandError, Result};

/// A boolean check against one path.
pub trait Validator {
    /// Name used in configuration.
    fn name(&self) -> &'static str;

    /// Human-readable title for reports.
    fn title(&self) -> &'static str {
        self.name()
    }

    /// Check `target` with the rule's `parameters`.
    ///
    /// `Ok(false)` is an unmet condition. `Err` means the validator was
    /// misconfigured, for example given an empty path.
    fn validate(&self, parameters: &Mapping, target: &ValidationTarget<'_>) -> Result<bool>;
}

/// The path a validator inspects.
#[derive(Debug, Clone, Copy)]
pub struct ValidationTarget<'a> {
    /// Path as configured, already rendered for the environment.
    pub path: &'a str,
    /// Project root that relative paths resolve against.
    pub root: &'a Path,
}

impl<'a> ValidationTarget<'a> {
    /// Target for `path` relative to `root`.
    pub fn new(path: &'a str, root: &'a Path) -> Self {
        Self { path, root }
    }

    /// The path resolved against the project root.
    pub fn resolved(&self) -> PathBuf {
        let path = Path::new(self.path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// The resolved path, or an argument error naming `validator` when the
    /// configured path is empty.
    pub fn require(&self, validator: &str) -> Result<PathBuf> {
        if self.path.trim().is_empty() {
            return Err(DeckhandError::ValidatorArgument {
                validator: validator.to_string(),
                message: "field \"path\" empty".to_string(),
            });
        }
        Ok(self.resolved())
    }
}

/// Result of [`ValidatorRegistry::lookup`].
pub enum ValidatorLookup<'a> {
    Found(&'a dyn Validator),
    NotFound,
}

/// Name to validator mapping.
#[derive(Default)]
pub struct ValidatorRegistry {
    validators: BTreeMap<&'static str, Box<dyn Validator>>,
}

impl ValidatorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every builtin validator.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for validator in builtin::all() {
            registry.register(validator);
        }
        registry
    }

    /// Add a validator, replacing any with the same name.
    pub fn register(&mut self, validator: Box<dyn Validator>) {
        self.validators.insert(validator.name(), validator);
    }

    /// Resolve `name`.
    pub fn lookup(&self, name: &str) -> ValidatorLookup<'_> {
        match self.validators.get(name.trim()) {
            Some(validator) => ValidatorLookup::Found(validator.as_ref()),
            None => ValidatorLookup::NotFound,
        }
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&'static str> {
        self.validators.keys().copied().collect()
    }
}
