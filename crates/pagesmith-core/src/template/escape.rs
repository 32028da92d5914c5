//! HTML escaping for substituted text

/// Escape text for HTML text-node and quoted-attribute context
///
/// Escapes `&`, `<`, `>`, `"` and `'`.
pub fn escape_html(text: &str) -> String {
    html_escape::encode_quoted_attribute(text).into_owned()
}
