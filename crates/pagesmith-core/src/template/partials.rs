//! Partial fragments and `{{>NAME}}` inclusion

use std::collections::BTreeMap;

use crate::template::error::TemplateError;

/// Opening sequence of a partial-inclusion marker
pub(crate) const PARTIAL_OPEN: &str = "{{>";

/// Named, read-only fragments available to a template
#[derive(Debug, Clone, Default)]
pub struct PartialSet {
    fragments: BTreeMap<String, String>,
}

impl PartialSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.fragments.insert(name.into(), content.into());
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(name, content);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fragments.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fragments.keys().map(String::as_str)
    }
}

/// Result of resolving partial markers
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedPartials {
    pub text: String,
    pub missing: Vec<String>,
}

/// Splice every `{{>NAME}}` marker with its fragment in one pass
///
/// Inserted fragments are not rescanned. Unknown names become the empty
/// string and are reported in `missing`.
pub(crate) fn resolve_partials(
    template: &str,
    partials: &PartialSet,
) -> Result<ResolvedPartials, TemplateError> {
    let mut output = String::with_capacity(template.len());
    let mut missing = Vec::new();
    let mut remaining = template;
    let mut line = 1;

    while let Some(start) = remaining.find(PARTIAL_OPEN) {
        let before = &remaining[..start];
        output.push_str(before);
        line += count_newlines(before);

        let name_start = start + PARTIAL_OPEN.len();
        let close = remaining[name_start..]
            .find("}}")
            .ok_or_else(|| TemplateError::MalformedSyntax {
                message: "Unclosed partial marker".to_string(),
                line,
            })?;

        let raw_name = &remaining[name_start..name_start + close];
        let name = raw_name.trim();

        match partials.get(name) {
            Some(fragment) => output.push_str(fragment),
            None => {
                tracing::warn!(partial = name, "partial not found, substituting empty string");
                if !missing.iter().any(|m| m == name) {
                    missing.push(name.to_string());
                }
            }
        }

        line += count_newlines(raw_name);
        remaining = &remaining[name_start + close + 2..];
    }

    output.push_str(remaining);

    Ok(ResolvedPartials {
        text: output,
        missing,
    })
}

pub(crate) fn count_newlines(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'\n').count()
}
