//! Template module - the Template Stamper
//!
//! Pure text substitution shared by every page family.
//!
//! ## Syntax
//!
//! - Partial inclusion: `{{>nav.html}}` (name trimmed, looked up in a [`PartialSet`])
//! - Placeholders: `{{KEY}}` or `{{ KEY }}` (spaces optional)
//!
//! ## Semantics
//!
//! - Partials are spliced in one pass; inserted fragments are not rescanned
//!   for further inclusion markers
//! - Placeholders are substituted in one pass over the partial-resolved text,
//!   so placeholders contributed by a partial are filled too
//! - [`Replacement::Text`] values are HTML-escaped, [`Replacement::Html`]
//!   values are inserted verbatim
//! - Unknown markers are left untouched; a missing partial becomes the empty
//!   string and a warning

pub mod error;
pub mod escape;
pub mod partials;
pub mod record;
pub mod stamper;

pub use error::TemplateError;
pub use escape::escape_html;
pub use partials::PartialSet;
pub use record::{field_text, DataRecord};
pub use stamper::{
    stamp, BlockRegistry, BlockRenderer, PreparedTemplate, Replacement, StampedDocument, Stamper,
    Substitutions,
};

#[cfg(test)]
mod tests;
