//! Value bindings for placeholders
//!
//! Bindings hold positional values (by order) and named values (by unique key).
//! They can be built in code or loaded from a TOML file:
//!
//! ```toml
//! positional = ["Eric", 74]
//!
//! [named]
//! name = "Eric"
//! age = 74
//! comedian = { name = "Eric Idle", age = 74 }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::value::Value;

/// Errors that can occur when loading bindings
#[derive(Error, Debug)]
pub enum BindingsError {
    #[error("Failed to read bindings file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse bindings TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid assignment '{0}': expected NAME=VALUE")]
    InvalidAssignment(String),
}

/// Positional and named values available to a render
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    positional: Vec<Value>,
    named: HashMap<String, Value>,
}

/// TOML structure for deserializing bindings
#[derive(Deserialize)]
struct TomlBindings {
    #[serde(default)]
    positional: Vec<toml::Value>,
    #[serde(default)]
    named: toml::Table,
}

impl Bindings {
    /// Create empty bindings
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional value
    pub fn with_arg(mut self, value: impl Into<Value>) -> Self {
        self.push(value);
        self
    }

    /// Bind a named value
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.positional.push(value.into());
    }

    /// Bind a named value, returning the value it replaced
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.named.insert(name.into(), value.into())
    }

    /// Look up a named value
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.named.get(name)
    }

    /// Look up a positional value
    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    pub fn positional_len(&self) -> usize {
        self.positional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }

    /// Add every value from `other`; named values in `other` win
    pub fn merge(&mut self, other: Bindings) {
        self.positional.extend(other.positional);
        self.named.extend(other.named);
    }

    /// Load bindings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, BindingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load bindings from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, BindingsError> {
        let parsed: TomlBindings = toml::from_str(content)?;

        let bindings = Bindings {
            positional: parsed.positional.into_iter().map(from_toml).collect(),
            named: parsed
                .named
                .into_iter()
                .map(|(name, value)| (name, from_toml(value)))
                .collect(),
        };
        tracing::debug!(
            positional = bindings.positional.len(),
            named = bindings.named.len(),
            "loaded bindings"
        );
        Ok(bindings)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Bindings {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut bindings = Bindings::new();
        for (name, value) in iter {
            bindings.insert(name, value);
        }
        bindings
    }
}

fn from_toml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::Str(s),
        toml::Value::Integer(n) => Value::Int(n),
        toml::Value::Float(f) => Value::Float(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::Str(dt.to_string()),
        toml::Value::Array(items) => Value::List(items.into_iter().map(from_toml).collect()),
        toml::Value::Table(table) => Value::Map(
            table
                .into_iter()
                .map(|(k, v)| (k, from_toml(v)))
                .collect::<BTreeMap<_, _>>(),
        ),
    }
}

/// Type a command-line value: integers, floats and booleans are recognised,
/// anything else is a string
pub fn infer_value(raw: &str) -> Value {
    if let Ok(n) = raw.parse::<i64>() {
        return Value::Int(n);
    }
    if let Ok(f) = raw.parse::<f64>() {
        if f.is_finite() {
            return Value::Float(f);
        }
    }
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::Str(raw.to_string()),
    }
}

/// Parse a `NAME=VALUE` assignment
pub fn parse_assignment(raw: &str) -> Result<(String, Value), BindingsError> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), infer_value(value))),
        _ => Err(BindingsError::InvalidAssignment(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let bindings = Bindings::new().with_arg("Eric").with_arg(74).with("name", "Eric");
        assert_eq!(bindings.arg(0), Some(&Value::from("Eric")));
        assert_eq!(bindings.arg(1), Some(&Value::from(74)));
        assert_eq!(bindings.arg(2), None);
        assert_eq!(bindings.get("name"), Some(&Value::from("Eric")));
        assert_eq!(bindings.positional_len(), 2);
        assert!(!bindings.is_empty());
        assert!(Bindings::new().is_empty());
    }

    #[test]
    fn test_insert_replaces() {
        let mut bindings = Bindings::new();
        assert_eq!(bindings.insert("age", 73), None);
        assert_eq!(bindings.insert("age", 74), Some(Value::from(73)));
        assert_eq!(bindings.get("age"), Some(&Value::from(74)));
    }

    #[test]
    fn test_from_iterator() {
        let bindings: Bindings = vec![("name", "Eric"), ("profession", "comedian")]
            .into_iter()
            .collect();
        assert_eq!(bindings.get("profession"), Some(&Value::from("comedian")));
    }

    #[test]
    fn test_merge_overrides_named() {
        let mut base = Bindings::new().with_arg(1).with("name", "Eric");
        base.merge(Bindings::new().with_arg(2).with("name", "John"));
        assert_eq!(base.positional_len(), 2);
        assert_eq!(base.get("name"), Some(&Value::from("John")));
    }

    #[test]
    fn test_from_toml_str() {
        let toml = r#"
positional = ["Eric", 74]

[named]
name = "Eric"
age = 74
height = 1.85
funny = true
comedian = { name = "Eric Idle", films = ["Life of Brian"] }
"#;
        let bindings = Bindings::from_toml_str(toml).expect("Should parse");
        assert_eq!(bindings.arg(0), Some(&Value::from("Eric")));
        assert_eq!(bindings.arg(1), Some(&Value::from(74)));
        assert_eq!(bindings.get("height"), Some(&Value::from(1.85)));
        assert_eq!(bindings.get("funny"), Some(&Value::from(true)));

        let comedian = bindings.get("comedian").expect("comedian bound");
        assert_eq!(
            comedian.display_text(),
            r#"{"films": ["Life of Brian"], "name": "Eric Idle"}"#
        );
    }

    #[test]
    fn test_from_toml_str_sections_optional() {
        let bindings = Bindings::from_toml_str("").expect("Should parse");
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let result = Bindings::from_toml_str("positional = [");
        assert!(matches!(result, Err(BindingsError::ParseError(_))));
    }

    #[test]
    fn test_from_missing_file() {
        let result = Bindings::from_file(Path::new("/nonexistent/bindings.toml"));
        assert!(matches!(result, Err(BindingsError::IoError(_))));
    }

    #[test]
    fn test_infer_value() {
        assert_eq!(infer_value("74"), Value::Int(74));
        assert_eq!(infer_value("-2"), Value::Int(-2));
        assert_eq!(infer_value("1.5"), Value::Float(1.5));
        assert_eq!(infer_value("true"), Value::Bool(true));
        assert_eq!(infer_value("Eric"), Value::from("Eric"));
        assert_eq!(infer_value("inf"), Value::from("inf"));
        assert_eq!(infer_value(""), Value::from(""));
    }

    #[test]
    fn test_parse_assignment() {
        let (name, value) = parse_assignment("age=74").expect("Should parse");
        assert_eq!(name, "age");
        assert_eq!(value, Value::Int(74));

        let (name, value) = parse_assignment("motto=a=b").expect("Should parse");
        assert_eq!(name, "motto");
        assert_eq!(value, Value::from("a=b"));

        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=74").is_err());
    }
}
