//! Environment placeholder substitution.
//!
//! Step fields may reference the requested environment with `{{ env }}`.
//! Whitespace inside the braces is ignored, so `{{env}}` and `{{  env }}`
//! are the same placeholder.
//!
//! # Example
//!
//! ```yaml
//! command: [php, bin/console, "cache:clear", "--env={{ env }}"]
//! # Requested for prod, runs: php bin/console cache:clear --env=prod
//! ```
//!
//! Substitution is pure: callers get a new value and the input is left as is.
//! [`serde_yaml::Value`] is an owned tree, so [`replace_deep`] always
//! terminates.

use regex::{NoExpand, Regex};
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*env\s*\}\}").unwrap());

/// Replace every environment placeholder in `text` with `environment`.
pub fn replace(text: &str, environment: &str) -> String {
    PLACEHOLDER
        .replace_all(text, NoExpand(environment))
        .into_owned()
}

/// Replace placeholders in every token of an argv-style list.
pub fn replace_all(tokens: &[String], environment: &str) -> Vec<String> {
    tokens.iter().map(|t| replace(t, environment)).collect()
}

/// Replace placeholders in every string leaf of a YAML value.
///
/// Mappings and sequences keep their structure (mapping keys included);
/// numbers, booleans and nulls are returned unchanged.
pub fn replace_deep(value: &serde_yaml::Value, environment: &str) -> serde_yaml::Value {
    use serde_yaml::Value;

    match value {
        Value::String(s) => Value::String(replace(s, environment)),
        Value::Sequence(items) => Value::Sequence(
            items
                .iter()
                .map(|item| replace_deep(item, environment))
                .collect(),
        ),
        Value::Mapping(map) => Value::Mapping(replace_mapping(map, environment)),
        Value::Tagged(tagged) => Value::Tagged(Box::new(serde_yaml::value::TaggedValue {
            tag: tagged.tag.clone(),
            value: replace_deep(&tagged.value, environment),
        })),
        other => other.clone(),
    }
}

/// [`replace_deep`] specialised to a mapping.
pub fn replace_mapping(map: &serde_yaml::Mapping, environment: &str) -> serde_yaml::Mapping {
    map.iter()
        .map(|(k, v)| (k.clone(), replace_deep(v, environment)))
        .collect()
}
