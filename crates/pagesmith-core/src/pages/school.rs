//! School landing pages: `schools/<slug>/index.html`

use std::collections::BTreeMap;

use chrono::Datelike;
use serde_json::{json, Value};

use crate::config::{SchoolsConfig, SiteConfig};
use crate::error::Result;
use crate::pages::{FamilySettings, PageFamily};
use crate::template::{escape_html, field_text, DataRecord, Substitutions};

/// Booklist sections in display order: (heading, booklist key)
const YEAR_LEVELS: [(&str, &str); 7] = [
    ("Year 7", "year7"),
    ("Year 8", "year8"),
    ("Year 9", "year9"),
    ("Year 10", "year10"),
    ("VCE", "vce"),
    ("HSC", "hsc"),
    ("IB", "ib"),
];

/// Offers listed in the schema markup
const MAX_OFFERS: usize = 5;

/// Text titles named in the meta description
const META_TITLES: usize = 3;

pub struct SchoolFamily {
    settings: FamilySettings,
    text_urls: BTreeMap<String, String>,
    site: SiteConfig,
}

impl SchoolFamily {
    pub fn new(config: &SchoolsConfig, site: &SiteConfig) -> Self {
        let settings = FamilySettings::new("data/schools", "schools", "_school-page-template.html")
            .with_index("schools-index.html")
            .with_overrides(&config.family);
        Self {
            settings,
            text_urls: config.text_urls.clone(),
            site: site.clone(),
        }
    }

    fn booklist_html(&self, record: &DataRecord) -> String {
        let mut sections = Vec::new();

        for (heading, key) in YEAR_LEVELS {
            let books = record.list(&format!("booklist.{}", key));
            if books.is_empty() {
                continue;
            }

            let links: Vec<String> = books
                .iter()
                .map(|book| {
                    let title = escape_html(&field_text(book, "title"));
                    match self.text_urls.get(&field_text(book, "slug")) {
                        Some(url) => format!(
                            "              <a href=\"{}\" class=\"school-text-link\">{}</a>",
                            escape_html(url),
                            title
                        ),
                        None => format!(
                            "              <span class=\"school-text-unavailable\">{}</span>",
                            title
                        ),
                    }
                })
                .collect();

            sections.push(format!(
                "          <div class=\"school-year-group\">\n            <h4>{}</h4>\n{}\n          </div>",
                escape_html(heading),
                links.join("\n")
            ));
        }

        sections.join("\n")
    }

    fn schema_markup(&self, record: &DataRecord) -> String {
        let school = record.text_or("schoolName", "");
        let year = chrono::Local::now().year();

        let offers: Vec<Value> = all_texts(record)
            .iter()
            .take(MAX_OFFERS)
            .map(|title| {
                json!({
                    "@type": "Service",
                    "name": format!("{} Tutoring", title),
                    "description": format!("10-week English tutoring course for {}", title),
                })
            })
            .collect();

        let schema = json!({
            "@context": "https://schema.org",
            "@type": "LocalBusiness",
            "name": format!("{} - English Tutoring for {}", self.site.name, school),
            "description": format!(
                "Text-specific English tutoring aligned with {}'s {} curriculum",
                school, year
            ),
            "url": format!(
                "{}/schools/{}/",
                self.site.base_url.trim_end_matches('/'),
                record.text_or("slug", "")
            ),
            "address": {
                "@type": "PostalAddress",
                "addressLocality": self.site.locality,
                "addressRegion": self.site.region,
                "addressCountry": self.site.country,
            },
            "areaServed": {
                "@type": "Place",
                "name": format!("{}, {}", record.text_or("location.suburb", ""), self.site.locality),
            },
            "makesOffer": offers,
        });

        // Keep the JSON from closing the surrounding <script> element
        serde_json::to_string_pretty(&schema)
            .unwrap_or_default()
            .replace("</", "<\\/")
    }
}

impl PageFamily for SchoolFamily {
    fn name(&self) -> &'static str {
        "schools"
    }

    fn settings(&self) -> &FamilySettings {
        &self.settings
    }

    fn required_fields(&self) -> &'static [&'static str] {
        &["slug", "schoolName", "location.suburb"]
    }

    fn title_field(&self) -> &'static str {
        "schoolName"
    }

    fn substitutions(&self, record: &DataRecord) -> Result<Substitutions> {
        let school = record.text("schoolName");
        let slug = record.text("slug");

        Ok(Substitutions::new()
            .text("SCHOOL_NAME", school.clone())
            .text("SHORT_NAME", record.text_or("shortName", &school))
            .text("SUBURB", record.text("location.suburb"))
            .text("SCHOOL_TYPE", record.text_or("type", "secondary"))
            .text("VERIFIED_DATE", record.text_or("verifiedDate", ""))
            .text("SLUG", slug.clone())
            .text("SCHOOL_SLUG", slug)
            .text("META_DESCRIPTION", self.meta_description(record, &school))
            .html("BOOKLIST_HTML", self.booklist_html(record))
            .html("SCHEMA_MARKUP", self.schema_markup(record))
            .html("TESTIMONIAL", testimonial(record)))
    }

    fn index_substitutions(&self, records: &[DataRecord]) -> Option<Substitutions> {
        let cards: Vec<String> = records.iter().map(school_card).collect();
        Some(
            Substitutions::new()
                .html("SCHOOL_CARDS", cards.join("\n"))
                .text("SCHOOL_COUNT", records.len().to_string()),
        )
    }
}

impl SchoolFamily {
    fn meta_description(&self, record: &DataRecord, school: &str) -> String {
        let titles = all_texts(record);
        let shown: Vec<&str> = titles.iter().take(META_TITLES).map(String::as_str).collect();
        let more = if titles.len() > META_TITLES {
            " and more"
        } else {
            ""
        };
        format!(
            "Text-specific English tutoring for {} students. Courses for {}{}. {}.",
            school,
            shown.join(", "),
            more,
            self.site.locality
        )
    }
}

/// Every booklist title: known year levels first, then any other sections by key
fn all_texts(record: &DataRecord) -> Vec<String> {
    let mut titles = Vec::new();
    let Some(Value::Object(booklist)) = record.resolve("booklist") else {
        return titles;
    };

    let known: Vec<&str> = YEAR_LEVELS.iter().map(|(_, key)| *key).collect();
    let ordered = known
        .iter()
        .filter_map(|key| booklist.get(*key))
        .chain(
            booklist
                .iter()
                .filter(|(key, _)| !known.contains(&key.as_str()))
                .map(|(_, books)| books),
        );

    for books in ordered {
        if let Value::Array(books) = books {
            titles.extend(books.iter().map(|book| field_text(book, "title")));
        }
    }
    titles
}

fn testimonial(record: &DataRecord) -> String {
    if !record.has("testimonial") {
        return String::new();
    }
    format!(
        "\n        <div class=\"school-testimonial\">\n          <blockquote>\"{}\"</blockquote>\n          <cite>— {}, {}</cite>\n        </div>",
        escape_html(&record.text_or("testimonial.quote", "")),
        escape_html(&record.text_or("testimonial.parent", "")),
        escape_html(&record.text_or("testimonial.year", "")),
    )
}

fn school_card(record: &DataRecord) -> String {
    format!(
        "          <a href=\"/schools/{}/\" class=\"school-card\">\n            <div class=\"school-card-header\">\n              <span class=\"school-card-name\">{}</span>\n              <span class=\"school-card-suburb\">{}</span>\n            </div>\n            <div class=\"school-card-meta\">\n              <span class=\"school-card-type\">{}</span>\n              <span class=\"school-card-texts\">{} texts available</span>\n            </div>\n          </a>",
        escape_html(&record.text_or("slug", "")),
        escape_html(&record.text_or("schoolName", "")),
        escape_html(&record.text_or("location.suburb", "")),
        escape_html(&record.text_or("type", "secondary")),
        all_texts(record).len(),
    )
}
