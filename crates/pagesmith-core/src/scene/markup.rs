//! Generated scene page blocks

use crate::scene::model::SceneConfig;
use crate::template::escape_html;

const DEFAULT_LABEL_BORDER: &str = "#3498db";

/// Empty without a context image
pub fn context_layer(scene: &SceneConfig) -> String {
    let Some(image) = &scene.assets.context_image else {
        return String::new();
    };

    let mut html = format!(
        "\n        <!-- CONTEXT LAYER -->\n        <div id=\"layer-context\" class=\"stage-layer\">\n            <img src=\"../assets/{}\" id=\"img-context\" alt=\"Context Image\">",
        escape_html(image)
    );
    if let Some(overlay) = &scene.layers.context.overlay_text {
        html.push_str(&format!(
            "\n            <div class=\"context-overlay\" id=\"txt-context\">{}</div>",
            escape_html(overlay)
        ));
    }
    html.push_str("\n        </div>");
    html
}

/// Empty without a call-to-action image
pub fn outro_layer(scene: &SceneConfig) -> String {
    let Some(image) = &scene.assets.cta_image else {
        return String::new();
    };
    let outro = &scene.layers.outro;
    format!(
        "\n        <!-- OUTRO LAYER -->\n        <div id=\"layer-outro\" class=\"stage-layer\" style=\"background: {};\">\n            <img src=\"../assets/{}\" style=\"{}\" alt=\"Call to Action\">\n        </div>",
        escape_html(&outro.background),
        escape_html(image),
        escape_html(&outro.image_style)
    )
}

pub fn text_paragraphs(scene: &SceneConfig) -> String {
    scene
        .text_content
        .iter()
        .map(|p| format!("                <p>{}</p>", p.html))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn highlights(scene: &SceneConfig) -> String {
    scene
        .highlights
        .iter()
        .map(|h| {
            let style = format!(
                "top: {}; left: {}; width: {}; height: {}; background: {};",
                h.top,
                h.left,
                h.width,
                h.resolved_height(),
                h.resolved_color()
            );
            format!(
                "            <div class=\"highlight-mark {}\" id=\"{}\" style=\"{}\"></div>",
                h.css_class(),
                escape_html(&h.id),
                escape_html(&style)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn labels(scene: &SceneConfig) -> String {
    scene
        .labels
        .iter()
        .map(|l| {
            let style = format!(
                "top: {}; left: {}; border-left-color: {};",
                l.top,
                l.left,
                l.border_color.as_deref().unwrap_or(DEFAULT_LABEL_BORDER)
            );
            format!(
                "            <div class=\"annotation-label\" id=\"{}\" style=\"{}\">\n                <strong>{}</strong><br>{}\n            </div>",
                escape_html(&l.id),
                escape_html(&style),
                l.title,
                l.body
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scene() -> SceneConfig {
        SceneConfig::from_value(json!({
            "slug": "opening",
            "sceneTitle": "Opening",
            "assets": { "coverImage": "cover.png", "contextImage": "street.jpg" },
            "layers": { "context": { "overlayText": "Tulsa & beyond" } },
            "textContent": [{ "html": "Ponyboy <em>walks</em> home." }, { "html": "Second." }],
            "highlights": [
                { "id": "hl-1", "top": "10%", "left": "5%", "width": "30%" },
                { "id": "hl-2", "type": "underline", "top": "20%", "left": "5%", "width": "10%", "color": "red" }
            ],
            "labels": [{ "id": "lbl-1", "top": "1%", "left": "2%", "title": "<b>Mood</b>", "body": "Tense" }]
        }))
        .unwrap()
    }

    #[test]
    fn test_context_layer_with_overlay() {
        let html = context_layer(&scene());
        assert!(html.contains("src=\"../assets/street.jpg\" id=\"img-context\""));
        assert!(html.contains("id=\"txt-context\">Tulsa &amp; beyond</div>"));
        assert_eq!(outro_layer(&scene()), "");
    }

    #[test]
    fn test_highlight_defaults_by_kind() {
        let html = highlights(&scene());
        assert!(html.contains(
            "class=\"highlight-mark type-yellow\" id=\"hl-1\" style=\"top: 10%; left: 5%; width: 30%; height: 1.6%; background: #ffeb3b;\""
        ));
        assert!(html.contains("type-underline\" id=\"hl-2\""));
        assert!(html.contains("height: 0.4%; background: red;"));
    }

    #[test]
    fn test_paragraphs_and_labels_keep_authored_markup() {
        assert_eq!(
            text_paragraphs(&scene()),
            "                <p>Ponyboy <em>walks</em> home.</p>\n\n                <p>Second.</p>"
        );
        let html = labels(&scene());
        assert!(html.contains("<strong><b>Mood</b></strong><br>Tense"));
        assert!(html.contains("border-left-color: #3498db;"));
    }
}
