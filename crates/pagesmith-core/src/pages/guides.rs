//! Parent curriculum guides
//!
//! The same records feed two families: the full curriculum
//! (`curriculum/<slug>/index.html` plus an index page) and the homepage
//! featured guides (`<slug>/index.html` at the site root, no index page).

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::consts::PAGE_FILE;
use crate::config::{FamilyConfig, HomepageConfig};
use crate::error::Result;
use crate::pages::{FamilySettings, PageFamily};
use crate::template::{escape_html, field_text, BlockRegistry, DataRecord, Substitutions};

/// Weeks after this one belong to the extended course
const CORE_WEEKS: u64 = 5;

const GUIDE_DATA_DIR: &str = "data/parent-guides";
const GUIDE_TEMPLATE: &str = "_parent-guide-template.html";
const REQUIRED: &[&str] = &["slug", "title"];

pub struct CurriculumFamily {
    settings: FamilySettings,
}

impl CurriculumFamily {
    pub fn new(overrides: &FamilyConfig) -> Self {
        let settings = FamilySettings::new(GUIDE_DATA_DIR, "curriculum", GUIDE_TEMPLATE)
            .with_index("curriculum-index.html")
            .with_overrides(overrides);
        Self { settings }
    }
}

impl PageFamily for CurriculumFamily {
    fn name(&self) -> &'static str {
        "curriculum"
    }

    fn settings(&self) -> &FamilySettings {
        &self.settings
    }

    fn required_fields(&self) -> &'static [&'static str] {
        REQUIRED
    }

    fn substitutions(&self, record: &DataRecord) -> Result<Substitutions> {
        let slug = record.text("slug");
        Ok(guide_substitutions(record)
            .text("TEXT_SLUG", slug.clone())
            .text("CANONICAL_PATH", format!("/curriculum/{}/", slug)))
    }

    fn blocks(&self) -> BlockRegistry {
        guide_blocks()
    }

    fn index_substitutions(&self, records: &[DataRecord]) -> Option<Substitutions> {
        let cards: Vec<String> = records.iter().map(text_card).collect();
        Some(Substitutions::new().html("TEXT_CARDS", cards.join("\n")))
    }
}

pub struct HomepageFamily {
    settings: FamilySettings,
    slugs: Vec<String>,
}

impl HomepageFamily {
    pub fn new(config: &HomepageConfig) -> Self {
        let settings =
            FamilySettings::new(GUIDE_DATA_DIR, ".", GUIDE_TEMPLATE).with_overrides(&config.family);
        Self {
            settings,
            slugs: config.slugs.clone(),
        }
    }
}

impl PageFamily for HomepageFamily {
    fn name(&self) -> &'static str {
        "homepage"
    }

    fn settings(&self) -> &FamilySettings {
        &self.settings
    }

    fn required_fields(&self) -> &'static [&'static str] {
        REQUIRED
    }

    /// Only the featured slugs, in configured order; absent files are skipped with a warning
    fn data_files(&self, available: Vec<String>) -> Vec<String> {
        let mut files = Vec::new();
        for slug in &self.slugs {
            let file = format!("{}.json", slug);
            if available.contains(&file) {
                files.push(file);
            } else {
                tracing::warn!(slug = %slug, "skipping homepage guide: data file not found");
            }
        }
        files
    }

    fn substitutions(&self, record: &DataRecord) -> Result<Substitutions> {
        let slug = record.text("slug");
        Ok(guide_substitutions(record)
            .text("TEXT_SLUG", slug.clone())
            .text("CANONICAL_PATH", format!("/{}/", slug)))
    }

    fn blocks(&self) -> BlockRegistry {
        guide_blocks()
    }

    fn output_path(&self, root: &Path, slug: &str) -> PathBuf {
        let output_dir = &self.settings.output_dir;
        if output_dir.as_os_str().is_empty() || output_dir == Path::new(".") {
            root.join(slug).join(PAGE_FILE)
        } else {
            root.join(output_dir).join(slug).join(PAGE_FILE)
        }
    }
}

fn guide_substitutions(record: &DataRecord) -> Substitutions {
    Substitutions::new()
        .text("TEXT_TITLE", record.text("title"))
        .text("AUTHOR", record.text("author"))
        .text("YEAR_LEVEL", record.text("yearLevel"))
        .text("PATTERN_NAME", record.text("pattern"))
        .text("META_DESCRIPTION", record.text("metaDescription"))
}

fn guide_blocks() -> BlockRegistry {
    BlockRegistry::new()
        .register("WEEKS_CONTENT", weeks_content)
        .register("OUTCOMES_LIST", outcomes_list)
}

fn weeks_content(record: &DataRecord) -> String {
    record
        .list("weeks")
        .iter()
        .map(week_card)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn week_card(week: &Value) -> String {
    let number = week.get("week").and_then(Value::as_u64).unwrap_or(0);
    let extended = if number > CORE_WEEKS {
        " guide-extended-week"
    } else {
        ""
    };

    let topics: Vec<String> = match week.get("topics") {
        Some(Value::Array(topics)) => topics
            .iter()
            .map(|topic| format!("          <li>{}</li>", escape_html(&field_text(topic, ""))))
            .collect(),
        _ => Vec::new(),
    };

    let technique = match week.get("technique") {
        Some(technique @ Value::Object(_)) => format!(
            "\n        <div class=\"guide-technique-box\">\n          <strong>{}</strong>\n          <p>{}</p>\n        </div>",
            escape_html(&field_text(technique, "name")),
            escape_html(&field_text(technique, "description")),
        ),
        _ => String::new(),
    };

    format!(
        "      <!-- Week {number} -->\n      <div class=\"guide-week-card phase-{phase}{extended}\">\n        <div class=\"guide-week-header\">\n          <div class=\"guide-week-number\">{number}</div>\n          <div class=\"guide-week-info\">\n            <div class=\"guide-week-phase\">{phase_name}</div>\n            <h3 class=\"guide-week-title\">{title}</h3>\n          </div>\n        </div>\n        <p class=\"guide-week-description\">{description}</p>\n        <ul class=\"guide-week-topics\">\n{topics}\n        </ul>{technique}\n      </div>",
        phase = escape_html(&field_text(week, "phase")),
        phase_name = escape_html(&field_text(week, "phaseName")),
        title = escape_html(&field_text(week, "title")),
        description = escape_html(&field_text(week, "description")),
        topics = topics.join("\n"),
    )
}

fn outcomes_list(record: &DataRecord) -> String {
    record
        .list("outcomes")
        .iter()
        .map(|outcome| format!("        <li>{}</li>", escape_html(&field_text(outcome, ""))))
        .collect::<Vec<_>>()
        .join("\n")
}

fn text_card(record: &DataRecord) -> String {
    format!(
        "          <a href=\"/curriculum/{}/\" class=\"text-card\">\n            <span class=\"text-title\">{}</span>\n            <span class=\"text-author\">{}</span>\n            <span class=\"text-badge\">{}</span>\n          </a>",
        escape_html(&record.text_or("slug", "")),
        escape_html(&record.text_or("title", "")),
        escape_html(&record.text_or("author", "")),
        escape_html(&record.text_or("yearLevel", "")),
    )
}
