//! Design-system checks on page templates
//!
//! Advisory only: a template that trips a check still builds.

use std::collections::BTreeSet;
use std::fmt;

/// Distinct hard-coded hex colors tolerated per template
pub const MAX_HEX_COLORS: usize = 3;

/// Lines of `<style>` blocks tolerated per template
pub const MAX_STYLE_LINES: usize = 200;

/// `style="..."` attributes tolerated per template
pub const MAX_INLINE_STYLES: usize = 15;

/// Shared component stylesheet a template with its own styles should import
pub const COMPONENTS_CSS: &str = "/components/page-components.css";

const STYLE_OPEN: &str = "<style>";
const STYLE_CLOSE: &str = "</style>";
const STYLE_ATTR: &str = "style=\"";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleNote {
    HexColors(usize),
    StyleBlockLines(usize),
    InlineStyles(usize),
    MissingComponentsCss,
}

impl StyleNote {
    /// Recommendations are warnings; the missing import is informational
    pub fn is_warning(&self) -> bool {
        !matches!(self, StyleNote::MissingComponentsCss)
    }
}

impl fmt::Display for StyleNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleNote::HexColors(n) => write!(
                f,
                "found {} hardcoded hex colors; consider CSS variables from base.css",
                n
            ),
            StyleNote::StyleBlockLines(n) => write!(
                f,
                "large inline style block ({} lines); consider extracting to component CSS files",
                n
            ),
            StyleNote::InlineStyles(n) => write!(
                f,
                "found {} inline style attributes; consider using CSS classes",
                n
            ),
            StyleNote::MissingComponentsCss => {
                write!(f, "consider importing {} for shared patterns", COMPONENTS_CSS)
            }
        }
    }
}

/// Check one template against the design-system limits
pub fn check_template(template: &str) -> Vec<StyleNote> {
    let mut notes = Vec::new();

    let colors = hex_colors(template);
    if colors.len() > MAX_HEX_COLORS {
        notes.push(StyleNote::HexColors(colors.len()));
    }

    let blocks = style_blocks(template);
    if !blocks.is_empty() {
        let lines = blocks.join("\n").split('\n').count();
        if lines > MAX_STYLE_LINES {
            notes.push(StyleNote::StyleBlockLines(lines));
        }
    }

    let inline = inline_style_count(template);
    if inline > MAX_INLINE_STYLES {
        notes.push(StyleNote::InlineStyles(inline));
    }

    if !blocks.is_empty() && !template.contains(COMPONENTS_CSS) {
        notes.push(StyleNote::MissingComponentsCss);
    }

    notes
}

/// Distinct `#rrggbb` and `#rgb` literals, compared as written
///
/// Six digits match even inside a longer run; three digits only when no
/// further hex digit follows.
pub fn hex_colors(text: &str) -> BTreeSet<&str> {
    let bytes = text.as_bytes();
    let mut colors = BTreeSet::new();

    for (start, _) in text.match_indices('#') {
        let digits = bytes[start + 1..]
            .iter()
            .take_while(|b| b.is_ascii_hexdigit())
            .count();
        let len = match digits {
            n if n >= 6 => 6,
            3 => 3,
            _ => continue,
        };
        colors.insert(&text[start..start + 1 + len]);
    }

    colors
}

/// Every `<style>...</style>` element, tags included
fn style_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut rest = text;
    let mut offset = 0;

    while let Some(open) = rest.find(STYLE_OPEN) {
        let body = open + STYLE_OPEN.len();
        let Some(close) = rest[body..].find(STYLE_CLOSE) else {
            break;
        };
        let end = body + close + STYLE_CLOSE.len();
        blocks.push(&text[offset + open..offset + end]);
        rest = &rest[end..];
        offset += end;
    }

    blocks
}

/// `style="..."` attributes with a non-empty value
fn inline_style_count(text: &str) -> usize {
    let mut count = 0;
    let mut rest = text;

    while let Some(start) = rest.find(STYLE_ATTR) {
        let value = &rest[start + STYLE_ATTR.len()..];
        match value.find('"') {
            Some(0) => rest = value,
            Some(close) => {
                count += 1;
                rest = &value[close + 1..];
            }
            None => break,
        }
    }

    count
}
