//! Data record projection
//!
//! A [`DataRecord`] wraps one parsed JSON data file. Page families project
//! fields out of it by dotted path (`location.suburb`); everything else about
//! the record is opaque.

use serde_json::Value;

/// One page's content, parsed from a JSON data file
#[derive(Debug, Clone)]
pub struct DataRecord {
    source: String,
    value: Value,
}

impl DataRecord {
    /// Wrap a parsed JSON value; `source` names the originating file in diagnostics
    pub fn new(source: impl Into<String>, value: Value) -> Self {
        Self {
            source: source.into(),
            value,
        }
    }

    /// Parse a record from JSON text
    pub fn parse(source: impl Into<String>, text: &str) -> Result<Self, serde_json::Error> {
        let value = serde_json::from_str(text)?;
        Ok(Self::new(source, value))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Resolve a dotted field path
    pub fn resolve(&self, path: &str) -> Option<&Value> {
        resolve_key(&self.value, path)
    }

    /// Whether the path resolves to a non-null, non-empty value
    pub fn has(&self, path: &str) -> bool {
        match self.resolve(path) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }

    /// Field as text; a missing field degrades to the empty string with a warning
    pub fn text(&self, path: &str) -> String {
        match self.opt_text(path) {
            Some(text) => text,
            None => {
                tracing::warn!(
                    record = %self.source,
                    field = path,
                    "missing optional field, substituting empty string"
                );
                String::new()
            }
        }
    }

    /// Field as text, or `default` when missing (no warning)
    pub fn text_or(&self, path: &str, default: &str) -> String {
        self.opt_text(path)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    /// Field as text when present and scalar
    pub fn opt_text(&self, path: &str) -> Option<String> {
        self.resolve(path).and_then(stringify_value)
    }

    /// Field as a list; missing or non-array fields yield an empty slice
    pub fn list(&self, path: &str) -> &[Value] {
        match self.resolve(path) {
            Some(Value::Array(items)) => items,
            _ => &[],
        }
    }

    /// Required paths that are missing, null or empty strings
    pub fn missing_fields(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|path| !self.has(path))
            .map(|path| path.to_string())
            .collect()
    }
}

/// Resolve a nested key from JSON data
pub(crate) fn resolve_key<'a>(data: &'a Value, key: &str) -> Option<&'a Value> {
    let mut current = data;

    for part in key.split('.') {
        current = match current {
            Value::Object(map) => map.get(part)?,
            _ => return None,
        };
    }

    Some(current)
}

/// Stringify a scalar JSON value for substitution
///
/// Objects, arrays and null have no scalar form.
pub(crate) fn stringify_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Text of `key` inside a list item (an object), or the item itself when it is a scalar
pub fn field_text(item: &Value, key: &str) -> String {
    match item {
        Value::Object(_) => resolve_key(item, key)
            .and_then(stringify_value)
            .unwrap_or_default(),
        other => stringify_value(other).unwrap_or_default(),
    }
}
