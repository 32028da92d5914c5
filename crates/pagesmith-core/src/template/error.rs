//! Template error types

use std::fmt;

/// Template stamping errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// Malformed marker syntax
    MalformedSyntax {
        /// Error message
        message: String,
        /// Line number where the error occurred
        line: usize,
    },

    /// Placeholder key that can never match a `{{KEY}}` marker
    InvalidKey {
        /// The rejected key
        key: String,
    },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::MalformedSyntax { message, line } => {
                write!(f, "Malformed syntax at line {}: {}", line, message)
            }
            TemplateError::InvalidKey { key } => {
                write!(
                    f,
                    "Invalid placeholder key '{}': keys must be non-empty and must not contain '{{{{', '}}}}' or start with '>'",
                    key
                )
            }
        }
    }
}

impl std::error::Error for TemplateError {}
