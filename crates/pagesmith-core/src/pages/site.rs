//! Site pages listed in `site-config.json`
//!
//! Unlike the record families, every page names its own template and output
//! file, and all pages share one definition: site details, contact, course
//! and results. Each page is stamped from a [`DataRecord`] holding the whole
//! definition plus the page itself under `page`, so the block renderers can
//! mark the current page in the navigation.

use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};

use crate::config::Config;
use crate::error::{PagesmithError, Result};
use crate::pages::style_check::check_template;
use crate::site::batch::{load_template, write_page};
use crate::site::{is_safe_slug, load_partials, BatchReport, BuiltPage, RecordFailure, SiteIo};
use crate::template::partials::PARTIAL_OPEN;
use crate::template::{
    escape_html, field_text, BlockRegistry, DataRecord, PartialSet, Stamper, Substitutions,
};

pub const FAMILY_NAME: &str = "site";

/// Page whose document carries the organization schema
pub const HOME_PAGE_ID: &str = "home";

const DEFAULT_SOCIAL_IMAGE: &str = "social-preview.png";

/// Fields every page entry must provide
const REQUIRED_PAGE_FIELDS: [&str; 3] = ["id", "file", "template"];

pub fn blocks() -> BlockRegistry {
    BlockRegistry::new()
        .register("NAV_LINKS", nav_links)
        .register("FOOTER_LINKS", footer_links)
        .register("MAP_CARDS", map_cards)
        .register("QUICK_STATS", quick_stats)
        .register("SEO_META_TAGS", seo_meta_tags)
        .register("ORG_SCHEMA", org_schema)
}

/// Scalar substitutions shared by every page, plus the page's own title fields
pub fn substitutions(record: &DataRecord) -> Substitutions {
    let phone = record.text_or("site.contact.phone", "");
    let phone_link: String = phone.chars().filter(|c| !c.is_whitespace()).collect();

    Substitutions::new()
        .text("ENROLL_LINK", record.text("site.enrollLink"))
        .text("SITE_NAME", record.text("site.name"))
        .text("SITE_URL", site_url(record))
        .text("SITE_TAGLINE_EN", record.text("site.tagline.en"))
        .text("SITE_TAGLINE_ZH", record.text("site.tagline.zh"))
        .text("SITE_DESCRIPTION", record.text("site.description.en"))
        .text("SITE_DESCRIPTION_EN", record.text("site.description.en"))
        .text("SITE_DESCRIPTION_ZH", record.text("site.description.zh"))
        .text("SITE_KEYWORDS_EN", record.text_or("site.keywords.en", ""))
        .text("SITE_KEYWORDS_ZH", record.text_or("site.keywords.zh", ""))
        .text("SITE_SUBTITLE_EN", record.text("site.subtitle.en"))
        .text("SITE_SUBTITLE_ZH", record.text("site.subtitle.zh"))
        .text("SITE_TEXTS_EN", record.text("site.texts.en"))
        .text("SITE_TEXTS_ZH", record.text("site.texts.zh"))
        .text("PAGE_TITLE", page_title(record))
        .text("PAGE_META_DESC", meta_description(record))
        .text("PAGE_FILE", record.text_or("page.file", "index.html"))
        .text("CONTACT_EMAIL", record.text("site.contact.email"))
        .text("CONTACT_PHONE", phone)
        .text("CONTACT_PHONE_LINK", phone_link)
        .text("CONTACT_WECHAT", record.text("site.contact.wechat"))
        .text("COURSE_PRICE", record.text("course.price"))
        .text("COURSE_DURATION", record.text("course.duration"))
        .text("COURSE_HOURS_PER_LESSON", record.text("course.hoursPerLesson"))
        .text("COURSE_PRICE_PER_HOUR", record.text("course.pricePerHour"))
        .text("COURSE_PRICE_PER_WEEK", record.text("course.pricePerWeek"))
        .text("COURSE_FORMAT_EN", record.text("course.format.en"))
        .text("COURSE_FORMAT_ZH", record.text("course.format.zh"))
        .text("COURSE_NEXT_COHORT_EN", record.text("course.nextCohort.en"))
        .text("COURSE_NEXT_COHORT_ZH", record.text("course.nextCohort.zh"))
        .text("RESULTS_IMPROVEMENT_RATE", record.text("results.improvementRate"))
        .text("RESULTS_TERM_IMPROVEMENT", record.text("results.termImprovement"))
        .text("RESULTS_FEEDBACK_IMPROVEMENT", record.text("results.feedbackImprovement"))
}

/// Build every page of the site definition
///
/// # Steps
/// 1. Read the definition → fatal if missing or not an object with a `pages` list
/// 2. Check the templates directory → fatal if missing
/// 3. Per page: required fields → output file → template → style checks
/// 4. Load partials when any template includes one → fatal if the directory is missing
/// 5. Stamp and write each page to `<output>/<file>`
///
/// A page with a missing template or a bad entry is skipped and reported.
pub fn build_site_pages(io: &dyn SiteIo, root: &Path, config: &Config) -> Result<BatchReport> {
    let mut report = BatchReport::new(FAMILY_NAME);

    let definition_path = root.join(&config.pages.definition);
    let definition = load_definition(io, &definition_path, config)?;

    let templates_dir = root.join(&config.paths.templates);
    if !io.exists(&templates_dir) {
        return Err(PagesmithError::TemplatesDirNotFound {
            path: templates_dir,
        });
    }

    let pages = definition
        .get("pages")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut loaded = Vec::new();
    for (index, page) in pages.into_iter().enumerate() {
        let source = page
            .get("id")
            .and_then(Value::as_str)
            .map_or_else(|| format!("pages[{}]", index), str::to_string);

        match load_page(io, &templates_dir, &source, &page) {
            Ok((file, template)) => {
                for note in check_template(&template) {
                    if note.is_warning() {
                        tracing::warn!(page = %source, "{}", note);
                    } else {
                        tracing::info!(page = %source, "{}", note);
                    }
                    report.notes.push(format!("{}: {}", source, note));
                }
                loaded.push((source, file, page, template));
            }
            Err(error) => {
                tracing::warn!(page = %source, "skipping page: {}", error);
                report.failures.push(RecordFailure {
                    file: source,
                    error,
                });
            }
        }
    }

    let partials = if loaded.iter().any(|(_, _, _, t)| t.contains(PARTIAL_OPEN)) {
        load_partials(io, &root.join(&config.paths.partials))?
    } else {
        PartialSet::new()
    };
    let stamper = Stamper::new(&partials);
    let registry = blocks();

    for (source, file, page, template) in loaded {
        let record = page_record(&definition, &source, page);
        let mut subs = substitutions(&record);
        registry.render_into(&record, &mut subs);

        let document = match stamper.stamp(&template, &subs) {
            Ok(document) => document,
            Err(error) => {
                report.failures.push(RecordFailure {
                    file: source,
                    error: error.into(),
                });
                continue;
            }
        };
        for name in &document.missing_partials {
            if !report.missing_partials.contains(name) {
                report.missing_partials.push(name.clone());
            }
        }

        let path = page_path(root, config, &file);
        write_page(io, &path, &document.text)?;
        tracing::debug!(page = %source, path = %path.display(), "built page");
        report.built.push(BuiltPage { slug: source, path });
    }

    Ok(report)
}

/// Parse the definition and fill site details the file leaves out from `[site]`
fn load_definition(io: &dyn SiteIo, path: &Path, config: &Config) -> Result<Value> {
    if !io.exists(path) {
        return Err(PagesmithError::SiteDefinitionNotFound {
            path: path.to_path_buf(),
        });
    }

    let invalid = |reason: String| PagesmithError::SiteDefinitionInvalid {
        path: path.to_path_buf(),
        reason,
    };

    let text = io.read_text_file(path)?;
    let mut definition: Value = serde_json::from_str(&text).map_err(|e| invalid(e.to_string()))?;
    let Some(object) = definition.as_object_mut() else {
        return Err(invalid("expected a JSON object".to_string()));
    };
    if !object.get("pages").is_some_and(Value::is_array) {
        return Err(invalid("expected a 'pages' list".to_string()));
    }

    let site = object
        .entry("site")
        .or_insert_with(|| Value::Object(Map::new()));
    if let Value::Object(site) = site {
        for (key, fallback) in [
            ("url", &config.site.base_url),
            ("name", &config.site.name),
            ("locality", &config.site.locality),
        ] {
            let present = site
                .get(key)
                .and_then(Value::as_str)
                .is_some_and(|s| !s.is_empty());
            if !present {
                site.insert(key.to_string(), Value::String(fallback.clone()));
            }
        }
    }

    Ok(definition)
}

/// Validate one page entry and read its template; returns the output file and template text
fn load_page(
    io: &dyn SiteIo,
    templates_dir: &Path,
    source: &str,
    page: &Value,
) -> Result<(String, String)> {
    let entry = DataRecord::new(source, page.clone());
    let missing = entry.missing_fields(&REQUIRED_PAGE_FIELDS);
    if !missing.is_empty() {
        return Err(PagesmithError::RecordMissingFields {
            file: source.to_string(),
            fields: missing.join(", "),
        });
    }

    let file = entry.text_or("file", "");
    if !is_safe_page_file(&file) {
        return Err(PagesmithError::PageFileInvalid {
            page: source.to_string(),
            file,
        });
    }

    let template = load_template(io, &templates_dir.join(entry.text_or("template", "")))?;
    Ok((file, template))
}

/// The definition with the current page under `page`
fn page_record(definition: &Value, source: &str, page: Value) -> DataRecord {
    let mut value = definition.clone();
    if let Value::Object(object) = &mut value {
        object.insert("page".to_string(), page);
    }
    DataRecord::new(source, value)
}

/// A relative file path whose every segment is a safe path segment
pub fn is_safe_page_file(file: &str) -> bool {
    !file.is_empty() && !file.starts_with('/') && file.split('/').all(is_safe_slug)
}

fn site_url(record: &DataRecord) -> String {
    record.text_or("site.url", "").trim_end_matches('/').to_string()
}

fn page_title(record: &DataRecord) -> String {
    record.opt_text("page.pageTitle.en").filter(|s| !s.is_empty()).unwrap_or_else(|| {
        format!(
            "{} | {}",
            record.text_or("page.title.en", "Page"),
            record.text_or("site.name", "")
        )
    })
}

fn meta_description(record: &DataRecord) -> String {
    record
        .opt_text("page.metaDescription.en")
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| record.text_or("site.description.en", ""))
}

fn nav_pages(record: &DataRecord) -> impl Iterator<Item = &Value> {
    record
        .list("pages")
        .iter()
        .filter(|page| page.get("showInNav") != Some(&Value::Bool(false)))
}

/// English and Chinese spans for a bilingual field
fn lang_spans(item: &Value, key: &str, indent: &str) -> String {
    format!(
        "{indent}<span data-lang-content=\"en\">{}</span>\n{indent}<span data-lang-content=\"zh\">{}</span>",
        escape_html(&field_text(item, &format!("{}.en", key))),
        escape_html(&field_text(item, &format!("{}.zh", key))),
    )
}

fn nav_links(record: &DataRecord) -> String {
    let current = record.text_or("page.id", "");
    nav_pages(record)
        .map(|page| {
            let active = if field_text(page, "id") == current {
                " active"
            } else {
                ""
            };
            format!(
                "        <a href=\"{}\" class=\"nav-link{}\">\n{}\n        </a>",
                escape_html(&field_text(page, "file")),
                active,
                lang_spans(page, "navTitle", "          ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn footer_links(record: &DataRecord) -> String {
    nav_pages(record)
        .map(|page| {
            format!(
                "      <a href=\"{}\">\n{}\n      </a>",
                escape_html(&field_text(page, "file")),
                lang_spans(page, "navTitle", "        ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn map_cards(record: &DataRecord) -> String {
    record
        .list("pages")
        .iter()
        .filter(|page| {
            field_text(page, "id") != HOME_PAGE_ID
                && page.get("cardTitle").is_some_and(|title| !title.is_null())
        })
        .map(|page| {
            if page.get("featured").and_then(Value::as_bool) == Some(true) {
                featured_card(record, page)
            } else {
                regular_card(page)
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn highlights(page: &Value, indent: &str) -> String {
    let items = match page.get("highlights") {
        Some(Value::Array(items)) => items.as_slice(),
        _ => &[],
    };
    items
        .iter()
        .map(|item| {
            format!(
                "{indent}<li data-lang-content=\"en\">{}</li>\n{indent}<li data-lang-content=\"zh\">{}</li>",
                escape_html(&field_text(item, "en")),
                escape_html(&field_text(item, "zh")),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Card body shared by the featured and regular layouts, indented by `indent`
fn card_body(page: &Value, indent: &str) -> String {
    let inner = format!("{}  ", indent);
    format!(
        "{indent}<span class=\"map-card-icon\">{icon}</span>\n\
         {indent}<h3 class=\"map-card-title\">\n{title}\n{indent}</h3>\n\
         {indent}<p class=\"map-card-desc\">\n{desc}\n{indent}</p>\n\
         {indent}<ul class=\"map-card-highlights\">\n{highlights}\n{indent}</ul>\n\
         {indent}<span class=\"map-card-link\">\n{link}\n{indent}</span>",
        icon = escape_html(&field_text(page, "icon")),
        title = lang_spans(page, "cardTitle", &inner),
        desc = lang_spans(page, "description", &inner),
        highlights = highlights(page, &inner),
        link = lang_spans(page, "linkText", &inner),
    )
}

fn regular_card(page: &Value) -> String {
    format!(
        "        <!-- {} Card -->\n        <a href=\"{}\" class=\"map-card\">\n{}\n        </a>",
        escape_html(&field_text(page, "cardTitle.en")),
        escape_html(&field_text(page, "file")),
        card_body(page, "          ")
    )
}

fn featured_card(record: &DataRecord, page: &Value) -> String {
    let duration = record.text_or("course.duration", "");
    let stats = [
        (
            record.text_or("course.price", ""),
            format!("for {}", duration),
            duration.replacen(" weeks", "周课程", 1),
        ),
        (
            format!("{}h", record.text_or("course.hoursPerLesson", "")),
            "per lesson".to_string(),
            "每课时".to_string(),
        ),
        (
            record.text_or("course.pricePerHour", ""),
            "per hour".to_string(),
            "每小时".to_string(),
        ),
    ];

    let stats: Vec<String> = stats
        .iter()
        .map(|(value, en, zh)| {
            format!(
                "              <div class=\"featured-stat\">\n                <div class=\"featured-stat-value\">{}</div>\n                <div class=\"featured-stat-label\">\n                  <span data-lang-content=\"en\">{}</span>\n                  <span data-lang-content=\"zh\">{}</span>\n                </div>\n              </div>",
                escape_html(value),
                escape_html(en),
                escape_html(zh)
            )
        })
        .collect();

    format!(
        "        <!-- Featured Card: {} -->\n        <a href=\"{}\" class=\"map-card featured\">\n          <div class=\"featured-content\">\n            <div>\n{}\n            </div>\n            <div class=\"featured-stats\">\n{}\n            </div>\n          </div>\n        </a>",
        escape_html(&field_text(page, "cardTitle.en")),
        escape_html(&field_text(page, "file")),
        card_body(page, "              "),
        stats.join("\n")
    )
}

fn quick_stats(record: &DataRecord) -> String {
    [
        ("results.improvementRate", "students improved", "学生取得进步"),
        ("results.termImprovement", "term improvement", "学期内提升"),
        ("results.feedbackImprovement", "with feedback", "运用反馈后"),
    ]
    .iter()
    .map(|(path, en, zh)| {
        format!(
            "        <div class=\"quick-stat\">\n          <div class=\"quick-stat-value\">{}</div>\n          <div class=\"quick-stat-label\">\n            <span data-lang-content=\"en\">{}</span>\n            <span data-lang-content=\"zh\">{}</span>\n          </div>\n        </div>",
            escape_html(&record.text_or(path, "")),
            en,
            zh
        )
    })
    .collect::<Vec<_>>()
    .join("\n")
}

fn seo_meta_tags(record: &DataRecord) -> String {
    let page_url = escape_html(&format!(
        "{}/{}",
        site_url(record),
        record.text_or("page.file", "")
    ));
    let image = escape_html(&format!(
        "{}/{}",
        site_url(record),
        record.text_or("site.socialImage", DEFAULT_SOCIAL_IMAGE)
    ));
    let title = escape_html(&page_title(record));
    let description = escape_html(&meta_description(record));
    let keywords = escape_html(&format!(
        "{}, {}",
        record.text_or("site.keywords.en", ""),
        record.text_or("site.keywords.zh", "")
    ));
    let site_name = escape_html(&record.text_or("site.name", ""));

    format!(
        r#"
  <!-- SEO Meta Tags -->
  <link rel="canonical" href="{page_url}">
  <link rel="alternate" hreflang="en" href="{page_url}">
  <link rel="alternate" hreflang="zh" href="{page_url}?lang=zh">
  <link rel="alternate" hreflang="x-default" href="{page_url}">
  <meta name="keywords" content="{keywords}">

  <!-- Open Graph -->
  <meta property="og:title" content="{title}">
  <meta property="og:description" content="{description}">
  <meta property="og:type" content="website">
  <meta property="og:url" content="{page_url}">
  <meta property="og:image" content="{image}">
  <meta property="og:site_name" content="{site_name}">
  <meta property="og:locale" content="en_AU">
  <meta property="og:locale:alternate" content="zh_CN">

  <!-- Twitter Card -->
  <meta name="twitter:card" content="summary_large_image">
  <meta name="twitter:title" content="{title}">
  <meta name="twitter:description" content="{description}">
  <meta name="twitter:image" content="{image}">"#
    )
}

/// EducationalOrganization JSON-LD, on the home page only
fn org_schema(record: &DataRecord) -> String {
    if record.text_or("page.id", "") != HOME_PAGE_ID {
        return String::new();
    }

    let name = record.text_or("site.name", "");
    let provider = json!({ "@type": "Organization", "name": name });
    let schema = json!({
        "@context": "https://schema.org",
        "@type": "EducationalOrganization",
        "name": name,
        "description": record.text_or("site.description.en", ""),
        "url": site_url(record),
        "email": record.text_or("site.contact.email", ""),
        "telephone": record.text_or("site.contact.phone", ""),
        "areaServed": {
            "@type": "City",
            "name": record.text_or("site.locality", ""),
            "containedInPlace": { "@type": "Country", "name": "Australia" },
        },
        "hasOfferCatalog": {
            "@type": "OfferCatalog",
            "name": "English Tutoring Courses",
            "itemListElement": [
                {
                    "@type": "Course",
                    "name": "5-Week Foundation Course",
                    "description": "Analytical writing fundamentals for secondary students",
                    "provider": provider.clone(),
                },
                {
                    "@type": "Course",
                    "name": "10-Week Complete Course",
                    "description": "Comprehensive analytical writing mastery",
                    "provider": provider,
                    "offers": {
                        "@type": "Offer",
                        "price": record.text_or("course.price", "").replacen('$', "", 1),
                        "priceCurrency": "AUD",
                    },
                },
            ],
        },
    });

    // Keep the JSON from closing the surrounding <script> element
    let body = serde_json::to_string_pretty(&schema)
        .unwrap_or_default()
        .replace("</", "<\\/");
    format!("<script type=\"application/ld+json\">\n{}\n</script>", body)
}

/// Output path of a page file under the configured output directory
pub fn page_path(root: &Path, config: &Config, file: &str) -> PathBuf {
    match &config.pages.output_dir {
        Some(dir) => root.join(dir).join(file),
        None => root.join(file),
    }
}
