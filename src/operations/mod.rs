//! In-process operations invoked by name from `install` steps.
//!
//! An [`OperationRegistry`] maps names to [`Operation`] values. Lookups
//! return a [`Lookup`], so an unknown name is a distinguished miss that the
//! caller reports, never a silent no-op.

pub mod builtin;

use std::collections::BTreeMap;

use serde_yaml::{Mapping, Value};
use tracing::warn;

use crate::config::ConfigLocation;
use crate::error::{DeckhandError, Result};
use crate::runner::ExitStatus;
use crate::ui::UserInterface;

/// Prefix accepted in front of every operation name.
pub const NAME_PREFIX: &str = "deckhand:";

/// Something a sub-command step can invoke.
pub trait Operation {
    /// Registered name.
    fn name(&self) -> &'static str;

    /// Alternative names resolving to this operation.
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// One-line description for listings.
    fn description(&self) -> &'static str;

    /// Run with the given arguments, reporting through `ui`.
    ///
    /// Returns the operation's own exit status. `Err` is reserved for
    /// faults that prevented the operation from producing a status.
    fn run(&self, args: &OperationArgs, ui: &mut dyn UserInterface) -> Result<ExitStatus>;
}

/// Result of [`OperationRegistry::lookup`].
pub enum Lookup<'a> {
    Found(&'a dyn Operation),
    NotFound,
}

/// Name to operation mapping, resolved once per install run.
#[derive(Default)]
pub struct OperationRegistry {
    operations: Vec<Box<dyn Operation>>,
    index: BTreeMap<String, usize>,
}

impl OperationRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every builtin operation for the project at `location`.
    ///
    /// `install` itself is never registered.
    pub fn builtin(location: &ConfigLocation) -> Self {
        let mut registry = Self::new();
        for operation in builtin::all(location) {
            registry.register(operation);
        }
        registry
    }

    /// Add an operation under its name and aliases.
    ///
    /// A later registration replaces an earlier one with the same name.
    pub fn register(&mut self, operation: Box<dyn Operation>) {
        let slot = self.operations.len();
        self.index.insert(operation.name().to_string(), slot);
        for alias in operation.aliases() {
            self.index.insert(alias.to_string(), slot);
        }
        self.operations.push(operation);
    }

    /// Resolve `name` (with or without the `deckhand:` prefix).
    pub fn lookup(&self, name: &str) -> Lookup<'_> {
        let name = name.trim();
        let name = name.strip_prefix(NAME_PREFIX).unwrap_or(name);
        match self.index.get(name) {
            Some(&slot) => Lookup::Found(self.operations[slot].as_ref()),
            None => Lookup::NotFound,
        }
    }

    /// Registered names in sorted order, aliases excluded.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.operations.iter().map(|op| op.name()).collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Whether `name` resolves to an operation.
    pub fn contains(&self, name: &str) -> bool {
        matches!(self.lookup(name), Lookup::Found(_))
    }
}

/// Arguments handed to an operation.
///
/// Keys are normalized so that `--show-output`, `show-output` and
/// `show_output` all name the same argument.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationArgs {
    values: BTreeMap<String, Value>,
}

impl OperationArgs {
    /// Empty arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a YAML mapping. Non-string keys are ignored.
    pub fn from_mapping(mapping: &Mapping) -> Self {
        let mut args = Self::new();
        for (key, value) in mapping {
            match key.as_str() {
                Some(key) => {
                    args.values.insert(normalize_key(key), value.clone());
                }
                None => warn!("Ignoring non-string argument key {:?}", key),
            }
        }
        args
    }

    /// Set a value.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.values.insert(normalize_key(key), value.into());
        self
    }

    /// Whether `key` was given at all.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(&normalize_key(key))
    }

    /// Raw value of `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(&normalize_key(key))
    }

    /// Boolean flag: a bare key (null value) counts as set.
    pub fn flag(&self, key: &str) -> bool {
        match self.get(key) {
            None => false,
            Some(Value::Null) => true,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
            Some(Value::String(s)) => {
                matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "on" | "1")
            }
            Some(_) => false,
        }
    }

    /// Scalar value rendered as a string.
    pub fn string(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Non-negative integer value.
    pub fn u64(&self, key: &str) -> Result<Option<u64>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        let parsed = match value {
            Value::Null => return Ok(None),
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        parsed
            .map(Some)
            .ok_or_else(|| DeckhandError::ConfigValidationError {
                message: format!(
                    "argument '{}' must be a non-negative integer, got {:?}",
                    key, value
                ),
            })
    }

    /// The requested environment (`environment` or `env`).
    pub fn environment(&self) -> Option<String> {
        self.string("environment").or_else(|| self.string("env"))
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no arguments were given.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Normalize an argument key: leading dashes dropped, `-` becomes `_`,
/// lowercase.
pub fn normalize_key(key: &str) -> String {
    key.trim()
        .trim_start_matches('-')
        .replace('-', "_")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;

    struct Fixed(&'static str, i32);

    impl Operation for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        fn aliases(&self) -> &'static [&'static str] {
            &["fixed-alias"]
        }

        fn description(&self) -> &'static str {
            "returns a fixed code"
        }

        fn run(&self, _args: &OperationArgs, _ui: &mut dyn UserInterface) -> Result<ExitStatus> {
            Ok(ExitStatus::from(self.1))
        }
    }

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn keys_are_normalized() {
        assert_eq!(normalize_key("--show-output"), "show_output");
        assert_eq!(normalize_key("show-output"), "show_output");
        assert_eq!(normalize_key("Show_Output"), "show_output");
    }

    #[test]
    fn flags_accept_bare_and_truthy_values() {
        let args = OperationArgs::from_mapping(&mapping(
            "--error: ~\nshow-output: true\nquiet: \"no\"\nverbose: 1",
        ));

        assert!(args.flag("error"));
        assert!(args.flag("--show-output"));
        assert!(!args.flag("quiet"));
        assert!(args.flag("verbose"));
        assert!(!args.flag("missing"));
    }

    #[test]
    fn integers_parse_from_numbers_and_strings() {
        let args = OperationArgs::from_mapping(&mapping("wait: 2\ndelay: \"3\"\nbad: soon"));

        assert_eq!(args.u64("--wait").unwrap(), Some(2));
        assert_eq!(args.u64("delay").unwrap(), Some(3));
        assert_eq!(args.u64("missing").unwrap(), None);
        assert!(args.u64("bad").is_err());
    }

    #[test]
    fn environment_accepts_short_key() {
        let args = OperationArgs::new().with("env", "staging");
        assert_eq!(args.environment().as_deref(), Some("staging"));
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn lookup_resolves_names_prefix_and_aliases() {
        let mut registry = OperationRegistry::new();
        registry.register(Box::new(Fixed("fixed", 3)));
        let mut ui = MockUI::new();

        for name in ["fixed", "deckhand:fixed", " fixed-alias "] {
            match registry.lookup(name) {
                Lookup::Found(op) => {
                    let status = op.run(&OperationArgs::new(), &mut ui).unwrap();
                    assert_eq!(status, ExitStatus::Other(3));
                }
                Lookup::NotFound => panic!("{} should resolve", name),
            }
        }

        assert!(!registry.contains("unknown"));
        assert_eq!(registry.names(), vec!["fixed"]);
    }

    #[test]
    fn builtin_registry_excludes_install() {
        let registry = OperationRegistry::builtin(&ConfigLocation::new("/tmp"));

        assert!(!registry.contains("install"));
        for name in ["echo", "exec", "cli", "filesystem", "validate", "source", "list"] {
            assert!(registry.contains(name), "missing {}", name);
        }
    }
}
