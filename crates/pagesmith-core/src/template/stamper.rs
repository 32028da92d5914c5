//! Placeholder substitution over a partial-resolved template

use crate::template::error::TemplateError;
use crate::template::escape::escape_html;
use crate::template::partials::{resolve_partials, PartialSet};
use crate::template::record::DataRecord;

/// A substitution value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    /// User text, HTML-escaped when substituted
    Text(String),
    /// Pre-rendered markup, inserted verbatim
    Html(String),
}

impl Replacement {
    fn render_into(&self, output: &mut String) {
        match self {
            Replacement::Text(text) => output.push_str(&escape_html(text)),
            Replacement::Html(html) => output.push_str(html),
        }
    }
}

/// Ordered placeholder key → value table
///
/// Inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default)]
pub struct Substitutions {
    entries: Vec<(String, Replacement)>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an escaped text value
    pub fn text(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, Replacement::Text(value.into()));
        self
    }

    /// Add a verbatim HTML value
    pub fn html(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, Replacement::Html(value.into()));
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Replacement) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Replacement> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reject keys no `{{KEY}}` marker can ever match
    pub fn validate(&self) -> Result<(), TemplateError> {
        for key in self.keys() {
            if key.trim().is_empty()
                || key != key.trim()
                || key.contains("{{")
                || key.contains("}}")
                || key.starts_with('>')
            {
                return Err(TemplateError::InvalidKey {
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Renders one block placeholder from a record
pub type BlockRenderer = fn(&DataRecord) -> String;

/// Per-family table of block placeholders
#[derive(Debug, Clone, Default)]
pub struct BlockRegistry {
    blocks: Vec<(&'static str, BlockRenderer)>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, key: &'static str, render: BlockRenderer) -> Self {
        self.blocks.retain(|(k, _)| *k != key);
        self.blocks.push((key, render));
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.blocks.iter().map(|(k, _)| *k)
    }

    /// Render every block for `record` as verbatim HTML substitutions
    pub fn render_into(&self, record: &DataRecord, substitutions: &mut Substitutions) {
        for (key, render) in &self.blocks {
            substitutions.insert(*key, Replacement::Html(render(record)));
        }
    }
}

/// Final document text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampedDocument {
    pub text: String,
    /// Partial names that were referenced but not available
    pub missing_partials: Vec<String>,
}

impl StampedDocument {
    /// Keys of `{{KEY}}` markers left in the output
    pub fn unresolved_markers(&self) -> Vec<String> {
        let mut keys = Vec::new();
        let mut remaining = self.text.as_str();
        while let Some(start) = remaining.find("{{") {
            let inner_start = start + 2;
            let Some(close) = remaining[inner_start..].find("}}") else {
                break;
            };
            let key = remaining[inner_start..inner_start + close].trim();
            if !key.is_empty() && !key.contains("{{") && !keys.iter().any(|k| k == key) {
                keys.push(key.to_string());
            }
            remaining = &remaining[inner_start..];
        }
        keys
    }
}

/// Stamps templates against a fixed partial set
#[derive(Debug, Clone, Copy)]
pub struct Stamper<'a> {
    partials: &'a PartialSet,
}

impl<'a> Stamper<'a> {
    pub fn new(partials: &'a PartialSet) -> Self {
        Self { partials }
    }

    /// Resolve partials once; the result can be rendered for many records
    pub fn prepare(&self, template: &str) -> Result<PreparedTemplate, TemplateError> {
        let resolved = resolve_partials(template, self.partials)?;
        Ok(PreparedTemplate {
            text: resolved.text,
            missing_partials: resolved.missing,
        })
    }

    pub fn stamp(
        &self,
        template: &str,
        substitutions: &Substitutions,
    ) -> Result<StampedDocument, TemplateError> {
        self.prepare(template)?.render(substitutions)
    }
}

/// A template whose partial markers are already spliced in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedTemplate {
    text: String,
    missing_partials: Vec<String>,
}

impl PreparedTemplate {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn missing_partials(&self) -> &[String] {
        &self.missing_partials
    }

    /// Substitute every known `{{KEY}}` marker in one pass
    pub fn render(&self, substitutions: &Substitutions) -> Result<StampedDocument, TemplateError> {
        substitutions.validate()?;
        Ok(StampedDocument {
            text: substitute(&self.text, substitutions),
            missing_partials: self.missing_partials.clone(),
        })
    }
}

/// Stamp a template: partial resolution then placeholder substitution
pub fn stamp(
    template: &str,
    partials: &PartialSet,
    substitutions: &Substitutions,
) -> Result<StampedDocument, TemplateError> {
    Stamper::new(partials).stamp(template, substitutions)
}

/// Single scan; substituted values are never rescanned and unknown markers stay literal
fn substitute(text: &str, substitutions: &Substitutions) -> String {
    let mut output = String::with_capacity(text.len());
    let mut remaining = text;

    while let Some(start) = remaining.find("{{") {
        output.push_str(&remaining[..start]);

        let inner_start = start + 2;
        let Some(close) = remaining[inner_start..].find("}}") else {
            // Unclosed marker: keep the tail as written
            output.push_str(&remaining[start..]);
            return output;
        };

        let key = remaining[inner_start..inner_start + close].trim();
        match substitutions.get(key) {
            Some(value) => {
                value.render_into(&mut output);
                remaining = &remaining[inner_start + close + 2..];
            }
            None => {
                output.push_str("{{");
                remaining = &remaining[inner_start..];
            }
        }
    }

    output.push_str(remaining);
    output
}

