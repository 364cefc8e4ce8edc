//! Merged configuration mapping
//!
//! A [`Settings`] value is produced once by the resolver at agent
//! construction and read-only afterwards. Values are stored as
//! `serde_json::Value` regardless of whether they came from the YAML base
//! document or a JSON override, so lookups are uniform.

use serde_json::{Map, Value};

/// Immutable configuration mapping for one agent instance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    entries: Map<String, Value>,
}

impl Settings {
    /// Empty settings, the fallback for every resolution failure
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap an already-merged top-level mapping
    pub fn from_map(entries: Map<String, Value>) -> Self {
        Self { entries }
    }

    /// Wrap a JSON value; non-object values yield empty settings
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(entries) => Self { entries },
            _ => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Top-level key lookup
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Dotted-path lookup into nested mappings, e.g. `database.host`
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.entries.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.lookup(path).and_then(Value::as_str)
    }

    pub fn get_u64(&self, path: &str) -> Option<u64> {
        self.lookup(path).and_then(Value::as_u64)
    }

    pub fn get_f64(&self, path: &str) -> Option<f64> {
        self.lookup(path).and_then(Value::as_f64)
    }

    /// A configuration value rendered as a string, accepting either a JSON
    /// string or a number. Used for credentials that appear quoted in one
    /// document and bare in another.
    pub fn get_string_like(&self, path: &str) -> Option<String> {
        match self.lookup(path)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}
