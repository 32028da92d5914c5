//! Layered SVG assembly
//!
//! A [`Composition`] lists layers bottom to top. Each becomes a `<g>` holding
//! the inner markup of a component SVG, an embedded image, or literal markup,
//! followed by its animations. The result is a standalone SVG document.

pub mod model;

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::{PagesmithError, Result};
use crate::template::escape_html;

pub use model::{Animation, AnimationElement, Composition, ImageSource, Layer, LayerSource};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#;

/// Render a composition; relative paths resolve against `base_dir`
pub fn assemble(composition: &Composition, base_dir: &Path) -> Result<String> {
    let mut out = String::new();
    out.push_str(XML_DECLARATION);
    out.push('\n');
    out.push_str(&format!(
        "<svg width=\"{}\" height=\"{}\" viewBox=\"{}\" xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\">\n",
        composition.width,
        composition.height,
        escape_html(&composition.view_box())
    ));

    if let Some(title) = &composition.title {
        out.push_str(&format!("    <title>{}</title>\n", escape_html(title)));
    }
    if let Some(style) = &composition.style {
        out.push_str("    <defs>\n        <style><![CDATA[\n");
        out.push_str(&style.replace("]]>", "]]]]><![CDATA[>"));
        out.push_str("\n        ]]></style>\n    </defs>\n");
    }

    for layer in &composition.layers {
        out.push('\n');
        out.push_str(&render_layer(layer, base_dir)?);
    }

    out.push_str("</svg>\n");
    Ok(out)
}

fn render_layer(layer: &Layer, base_dir: &Path) -> Result<String> {
    let transform = match &layer.transform {
        Some(t) => format!(" transform=\"{}\"", escape_html(t)),
        None => String::new(),
    };

    let body = match &layer.source {
        LayerSource::Svg(path) => {
            let path = base_dir.join(path);
            let text = std::fs::read_to_string(&path).map_err(|e| {
                PagesmithError::SvgInvalid(format!("cannot read '{}': {}", path.display(), e))
            })?;
            inner_svg(&text)
                .ok_or_else(|| {
                    PagesmithError::SvgInvalid(format!("'{}' has no <svg> element", path.display()))
                })?
                .trim()
                .to_string()
        }
        LayerSource::Image(image) => {
            let path = base_dir.join(&image.href);
            format!(
                "<image href=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" />",
                data_uri(&path)?,
                image.x,
                image.y,
                image.width,
                image.height
            )
        }
        LayerSource::Markup(markup) => markup.trim().to_string(),
    };

    let mut group = format!("    <g id=\"{}\"{}>\n", escape_html(&layer.id), transform);
    if !body.is_empty() {
        group.push_str(&format!("        {}\n", body));
    }
    for animation in &layer.animations {
        group.push_str(&format!("        {}\n", render_animation(animation)));
    }
    group.push_str("    </g>\n");
    Ok(group)
}

fn render_animation(animation: &Animation) -> String {
    let attributes = [
        ("attributeName", Some(&animation.attribute)),
        ("type", animation.transform_type.as_ref()),
        ("from", animation.from.as_ref()),
        ("to", animation.to.as_ref()),
        ("values", animation.values.as_ref()),
        ("keyTimes", animation.key_times.as_ref()),
        ("dur", Some(&animation.dur)),
        ("begin", animation.begin.as_ref()),
        ("fill", animation.fill.as_ref()),
        ("repeatCount", animation.repeat_count.as_ref()),
        ("additive", animation.additive.as_ref()),
    ];

    let rendered: Vec<String> = attributes
        .iter()
        .filter_map(|(name, value)| value.map(|v| format!("{}=\"{}\"", name, escape_html(v))))
        .collect();
    format!("<{} {} />", animation.element.tag(), rendered.join(" "))
}

/// Markup between the root `<svg ...>` open tag and its closing tag
pub fn inner_svg(text: &str) -> Option<&str> {
    let start = find_svg_open(text)?;
    let open_end = start + text[start..].find('>')?;
    if text[..open_end].ends_with('/') {
        return Some("");
    }
    let close = text.rfind("</svg>")?;
    (close > open_end).then(|| &text[open_end + 1..close])
}

/// Position of the first `<svg` tag, skipping names like `<svgfoo`
fn find_svg_open(text: &str) -> Option<usize> {
    let mut offset = 0;
    while let Some(found) = text[offset..].find("<svg") {
        let index = offset + found;
        match text[index + 4..].chars().next() {
            Some(c) if c.is_whitespace() || c == '>' || c == '/' => return Some(index),
            _ => offset = index + 4,
        }
    }
    None
}

pub fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "svg" => Some("image/svg+xml"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

pub fn data_uri(path: &Path) -> Result<String> {
    let mime = mime_for(path).ok_or_else(|| {
        PagesmithError::SvgInvalid(format!("unsupported image type '{}'", path.display()))
    })?;
    let bytes = std::fs::read(path).map_err(|e| {
        PagesmithError::SvgInvalid(format!("cannot read '{}': {}", path.display(), e))
    })?;
    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagesmith_testkit::{temp_dir_in_workspace, SiteFixture};

    const BOOK: &str = r##"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 640 640">
  <path d="M0 0 L10 10" fill="#222"/>
</svg>
"##;

    fn composition(json: &str) -> Composition {
        Composition::from_json(json).unwrap()
    }

    #[test]
    fn test_inner_svg() {
        assert_eq!(
            inner_svg(BOOK).map(str::trim),
            Some(r##"<path d="M0 0 L10 10" fill="#222"/>"##)
        );
        assert_eq!(inner_svg("<svg/>"), Some(""));
        assert_eq!(inner_svg("<svgx></svgx>"), None);
        assert_eq!(inner_svg("<div></div>"), None);
    }

    #[test]
    fn test_assembles_layers_in_order() {
        let temp = temp_dir_in_workspace();
        let site = SiteFixture::new(temp.path());
        site.write("art/book.svg", BOOK).write("art/logo.png", "PNG");

        let composition = composition(
            r##"{
                "width": 1200, "height": 1200,
                "title": "Happy New Year & more",
                "style": ".t { font-family: 'Fraunces'; }",
                "layers": [
                    { "id": "layer_background", "markup": "<rect width=\"1200\" height=\"1200\" fill=\"#FDFCF8\" />" },
                    { "id": "layer_book", "transform": "translate(300, 600) scale(0.8)", "svg": "art/book.svg" },
                    { "id": "layer_logo", "image": { "href": "art/logo.png", "width": 64, "height": 64 },
                      "animations": [
                        { "attribute": "opacity", "from": "0", "to": "1", "dur": "0.8s", "fill": "freeze" },
                        { "element": "animateTransform", "attribute": "transform", "type": "scale", "from": "0.9", "to": "1", "dur": "0.8s" }
                      ] }
                ]
            }"##,
        );
        let svg = assemble(&composition, site.root()).unwrap();

        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("viewBox=\"0 0 1200 1200\""));
        assert!(svg.contains("<title>Happy New Year &amp; more</title>"));
        assert!(svg.contains("<![CDATA["));
        let background = svg.find("id=\"layer_background\"").unwrap();
        let book = svg.find("id=\"layer_book\" transform=\"translate(300, 600) scale(0.8)\"").unwrap();
        let logo = svg.find("id=\"layer_logo\"").unwrap();
        assert!(background < book && book < logo);
        assert!(svg.contains("<path d=\"M0 0 L10 10\" fill=\"#222\"/>"));
        assert!(svg.contains("href=\"data:image/png;base64,UE5H\""));
        assert!(svg.contains(
            "<animate attributeName=\"opacity\" from=\"0\" to=\"1\" dur=\"0.8s\" fill=\"freeze\" />"
        ));
        assert!(svg.contains("<animateTransform attributeName=\"transform\" type=\"scale\""));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_invalid_compositions() {
        assert!(Composition::from_json(r#"{ "width": 0, "height": 10, "layers": [] }"#).is_err());
        assert!(Composition::from_json(
            r#"{ "width": 10, "height": 10, "layers": [
                { "id": "a", "markup": "" }, { "id": "a", "markup": "" }
            ] }"#
        )
        .is_err());

        let temp = temp_dir_in_workspace();
        let bad_image = composition(
            r#"{ "width": 10, "height": 10, "layers": [
                { "id": "a", "image": { "href": "logo.bmp", "width": 1, "height": 1 } }
            ] }"#,
        );
        assert!(matches!(
            assemble(&bad_image, temp.path()),
            Err(PagesmithError::SvgInvalid(_))
        ));
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(mime_for(Path::new("a.SVG")), Some("image/svg+xml"));
        assert_eq!(mime_for(Path::new("a.jpeg")), Some("image/jpeg"));
        assert_eq!(mime_for(Path::new("a")), None);
    }
}
