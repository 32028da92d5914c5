//! Annotation guide previews: `annotations/<slug>/index.html`

use serde_json::Value;

use crate::config::FamilyConfig;
use crate::error::Result;
use crate::pages::{FamilySettings, PageFamily};
use crate::template::{escape_html, field_text, BlockRegistry, DataRecord, Substitutions};

const BUILTIN_INDEX: &str = include_str!("../../builtin_templates/annotations-index.html");

pub struct AnnotationFamily {
    settings: FamilySettings,
}

impl AnnotationFamily {
    pub fn new(overrides: &FamilyConfig) -> Self {
        let settings = FamilySettings::new(
            "data/annotation-guides",
            "annotations",
            "_annotation-guide-template.html",
        )
        .with_index("annotations-index.html")
        .with_overrides(overrides);
        Self { settings }
    }
}

impl PageFamily for AnnotationFamily {
    fn name(&self) -> &'static str {
        "annotations"
    }

    fn settings(&self) -> &FamilySettings {
        &self.settings
    }

    fn required_fields(&self) -> &'static [&'static str] {
        &["slug", "title"]
    }

    fn substitutions(&self, record: &DataRecord) -> Result<Substitutions> {
        Ok(Substitutions::new()
            .text("META_TITLE", record.text("metaTitle"))
            .text("META_DESCRIPTION", record.text("metaDescription"))
            .text("SLUG", record.text("slug"))
            .text("TEXT_TITLE", record.text("title"))
            .text("AUTHOR", record.text("author"))
            .text("CHAPTERS", record.text("chapters"))
            .text("YEAR_LEVEL", record.text("yearLevel"))
            .text("LENS", record.text("lens"))
            .text("FOCUS", record.text("focus"))
            .text("GUIDE_PAGES", record.text_or("download.pages", "8"))
            .text("GUIDE_SIZE", record.text_or("download.size", ""))
            .text(
                "PARENT_BRIDGE_HEADLINE",
                record.text_or("parentBridge.headline", ""),
            )
            .text(
                "PARENT_BRIDGE_DESCRIPTION",
                record.text_or("parentBridge.description", ""),
            )
            .text("PARENT_BRIDGE_CTA", record.text_or("parentBridge.cta", ""))
            .text(
                "PARENT_BRIDGE_LINK",
                record.text_or("parentBridge.link", "/course.html"),
            ))
    }

    fn blocks(&self) -> BlockRegistry {
        BlockRegistry::new()
            .register("PREVIEW_GUIDE_IMAGES", preview_guide_images)
            .register("PREVIEW_EXAMPLE_IMAGES", preview_example_images)
            .register("DOWNLOADS_LIST", downloads_list)
            .register("COLOR_KEY", color_key)
            .register("SEMANTIC_FAMILIES", semantic_families)
    }

    fn index_substitutions(&self, records: &[DataRecord]) -> Option<Substitutions> {
        let cards: Vec<String> = records.iter().map(guide_card).collect();
        Some(Substitutions::new().html("GUIDE_CARDS", cards.join("\n")))
    }

    fn builtin_index_template(&self) -> Option<&'static str> {
        Some(BUILTIN_INDEX)
    }
}

fn preview_images(record: &DataRecord, section: &str) -> String {
    let slug = record.opt_text("slug").unwrap_or_default();
    let alt = escape_html(&record.text_or(&format!("preview.{}.alt", section), ""));

    record
        .list(&format!("preview.{}.pages", section))
        .iter()
        .map(|image| {
            let src = format!("/images/annotations/{}/{}", slug, field_text(image, ""));
            format!(
                "        <div class=\"preview-image\">\n          <img src=\"{}\" alt=\"{}\" loading=\"lazy\">\n        </div>",
                escape_html(&src),
                alt
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn preview_guide_images(record: &DataRecord) -> String {
    preview_images(record, "guide")
}

fn preview_example_images(record: &DataRecord) -> String {
    preview_images(record, "example")
}

fn downloads_list(record: &DataRecord) -> String {
    record
        .list("downloads")
        .iter()
        .map(|download| {
            let badge = match field_text(download, "badge") {
                badge if badge.is_empty() => String::new(),
                badge => format!(
                    "<span class=\"badge badge-cool\" style=\"font-size: 0.75rem; margin-right: 0.5rem;\">{}</span>",
                    escape_html(&badge)
                ),
            };
            format!(
                "      <div class=\"download-item\">\n        {}<strong>{}</strong>\n        <p class=\"download-description\">{}</p>\n        <p class=\"download-meta\">{} • {} pages</p>\n      </div>",
                badge,
                escape_html(&field_text(download, "title")),
                escape_html(&field_text(download, "description")),
                escape_html(&field_text(download, "size")),
                escape_html(&field_text(download, "pages")),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn color_key(record: &DataRecord) -> String {
    record
        .list("colorKey")
        .iter()
        .map(|item| {
            format!(
                "        <div class=\"color-key-item {}\">\n          <h3>{}</h3>\n          <p>{}</p>\n        </div>",
                escape_html(&field_text(item, "color")),
                escape_html(&field_text(item, "name")),
                escape_html(&field_text(item, "description")),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn semantic_families(record: &DataRecord) -> String {
    record
        .list("semanticFamilies")
        .iter()
        .map(|family| {
            let examples = match family.get("examples") {
                Some(Value::Array(examples)) => {
                    let items: Vec<String> = examples
                        .iter()
                        .map(|ex| format!("            <li>{}</li>", escape_html(&field_text(ex, ""))))
                        .collect();
                    format!("<ul>\n{}\n          </ul>", items.join("\n"))
                }
                _ => String::new(),
            };

            let question = match field_text(family, "keyQuestion") {
                q if q.is_empty() => String::new(),
                q => format!(
                    "<p class=\"key-question\">Key Question: {}</p>",
                    escape_html(&q)
                ),
            };

            format!(
                "      <div class=\"semantic-family\">\n        <h3>{}</h3>\n        <p>{}</p>{}{}\n      </div>",
                escape_html(&field_text(family, "name")),
                escape_html(&field_text(family, "description")),
                examples,
                question
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn guide_card(record: &DataRecord) -> String {
    format!(
        "          <a href=\"/annotations/{}/\" class=\"annotation-card\">\n            <div class=\"badge badge-cool\">{}</div>\n            <h3>{}</h3>\n            <p class=\"annotation-card-meta\">{} • {}</p>\n            <p class=\"annotation-card-lens\">{}</p>\n            <span class=\"annotation-card-link\">View Preview →</span>\n          </a>",
        escape_html(&record.text_or("slug", "")),
        escape_html(&record.text_or("guideTitle", "")),
        escape_html(&record.text_or("title", "")),
        escape_html(&record.text_or("author", "")),
        escape_html(&record.text_or("chapters", "")),
        escape_html(&record.text_or("lens", "")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn outsiders() -> DataRecord {
        DataRecord::new(
            "the-outsiders.json",
            json!({
                "slug": "the-outsiders",
                "title": "The Outsiders",
                "author": "S.E. Hinton",
                "metaTitle": "The Outsiders Annotation Guide",
                "download": { "pages": 12 },
                "preview": {
                    "guide": { "alt": "Guide \"page\"", "pages": ["p1.png", "p2.png"] }
                },
                "downloads": [
                    { "title": "Guide", "badge": "Free", "description": "A & B", "size": "2 MB", "pages": 12 },
                    { "title": "Example", "description": "", "size": "1 MB", "pages": 4 }
                ],
                "semanticFamilies": [
                    { "name": "Class", "description": "Greasers vs Socs", "examples": ["<tuff>"], "keyQuestion": "Who belongs?" },
                    { "name": "Nature", "description": "Sunsets" }
                ]
            }),
        )
    }

    #[test]
    fn test_scalar_substitutions_and_defaults() {
        let family = AnnotationFamily::new(&FamilyConfig::default());
        let subs = family.substitutions(&outsiders()).unwrap();
        let get = |key: &str| match subs.get(key) {
            Some(crate::template::Replacement::Text(t)) => t.clone(),
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(get("TEXT_TITLE"), "The Outsiders");
        assert_eq!(get("GUIDE_PAGES"), "12");
        assert_eq!(get("GUIDE_SIZE"), "");
        assert_eq!(get("PARENT_BRIDGE_LINK"), "/course.html");
        assert_eq!(get("LENS"), "");
    }

    #[test]
    fn test_preview_images_block() {
        let html = preview_guide_images(&outsiders());
        assert_eq!(html.matches("<img ").count(), 2);
        assert!(html.contains("src=\"/images/annotations/the-outsiders/p1.png\""));
        assert!(html.contains("alt=\"Guide &quot;page&quot;\""));
        assert_eq!(preview_example_images(&outsiders()), "");
    }

    #[test]
    fn test_downloads_badge_is_optional() {
        let html = downloads_list(&outsiders());
        assert_eq!(html.matches("badge-cool").count(), 1);
        assert!(html.contains("A &amp; B"));
        assert!(html.contains("1 MB • 4 pages"));
    }

    #[test]
    fn test_semantic_families_block() {
        let html = semantic_families(&outsiders());
        assert!(html.contains("<li>&lt;tuff&gt;</li>"));
        assert!(html.contains("Key Question: Who belongs?"));
        assert_eq!(html.matches("<ul>").count(), 1);
        assert_eq!(color_key(&outsiders()), "");
    }

    #[test]
    fn test_index_cards() {
        let family = AnnotationFamily::new(&FamilyConfig::default());
        let subs = family.index_substitutions(&[outsiders()]).unwrap();
        match subs.get("GUIDE_CARDS") {
            Some(crate::template::Replacement::Html(html)) => {
                assert!(html.contains("href=\"/annotations/the-outsiders/\""));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(family.builtin_index_template().unwrap().contains("{{GUIDE_CARDS}}"));
    }
}
