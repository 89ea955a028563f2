//! Variable bindings supplied by the caller.
//! Values are a closed set of scalars that are stringified at substitution
//! time; a missing key and an explicit null both render as an empty string.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::path::Path;

/// A single bound value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value.into())
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Number(value.into())
    }
}

impl From<f64> for Value {
    /// Non-finite floats have no JSON form and become `Null`.
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Name to value mapping, looked up by exact key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bindings(IndexMap<String, Value>);

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a binding, returning the previous value.
    pub fn insert<K: Into<String>, V: Into<Value>>(&mut self, key: K, value: V) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the string form of a binding, empty when absent or null.
    pub fn render(&self, key: &str) -> Cow<'_, str> {
        match self.0.get(key) {
            None | Some(Value::Null) => Cow::Borrowed(""),
            Some(Value::String(s)) => Cow::Borrowed(s),
            Some(other) => Cow::Owned(other.to_string()),
        }
    }

    /// Merges `other` into `self`; keys in `other` win.
    pub fn extend(&mut self, other: Bindings) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Parses bindings from a JSON or YAML document.
///
/// JSON is tried first, then YAML. Empty content yields empty bindings.
///
/// # Errors
/// * `Error::BindingsError` if the content is neither a JSON nor a YAML
///   mapping of scalar values
pub fn parse_bindings(content: &str) -> Result<Bindings> {
    if content.trim().is_empty() {
        return Ok(Bindings::new());
    }
    match serde_json::from_str(content) {
        Ok(bindings) => Ok(bindings),
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::BindingsError(format!("invalid bindings format: {e}"))),
    }
}

/// Reads and parses a bindings file.
pub fn load_bindings_file<P: AsRef<Path>>(path: P) -> Result<Bindings> {
    let path = path.as_ref();
    debug!("Loading bindings from {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::BindingsError(format!("cannot read '{}': {e}", path.display()))
    })?;
    parse_bindings(&content)
}

/// Parses a `KEY=VALUE` assignment.
///
/// The value is read as a JSON scalar when it is one (`true`, `3`, `null`),
/// otherwise it is kept verbatim as a string.
pub fn parse_assignment(assignment: &str) -> Result<(String, Value)> {
    let (key, raw) = assignment.split_once('=').ok_or_else(|| {
        Error::BindingsError(format!("expected KEY=VALUE, got '{assignment}'"))
    })?;
    if key.is_empty() {
        return Err(Error::BindingsError(format!("empty key in '{assignment}'")));
    }
    let value = match serde_json::from_str::<Value>(raw) {
        Ok(Value::String(_)) | Err(_) => Value::String(raw.to_string()),
        Ok(scalar) => scalar,
    };
    Ok((key.to_string(), value))
}

/// Builds the bindings for a run from an optional data file and inline
/// `KEY=VALUE` assignments.
///
/// # Arguments
/// * `data` - JSON or YAML bindings file, if any
/// * `assignments` - `KEY=VALUE` pairs applied in order after the file
///
/// # Returns
/// * `Result<Bindings>` - File bindings overridden by the assignments
///
/// # Errors
/// * `Error::BindingsError` if the file cannot be read or parsed, or an
///   assignment is malformed
pub fn get_bindings<S: AsRef<str>>(data: Option<&Path>, assignments: &[S]) -> Result<Bindings> {
    let mut bindings = match data {
        Some(path) => load_bindings_file(path)?,
        None => Bindings::new(),
    };
    for assignment in assignments {
        let (key, value) = parse_assignment(assignment.as_ref())?;
        bindings.insert(key, value);
    }
    Ok(bindings)
}
