//! Batch builder shared by every page family

use std::path::{Path, PathBuf};

use crate::config::consts::DATA_EXTENSION;
use crate::config::PathsConfig;
use crate::error::{PagesmithError, Result};
use crate::pages::PageFamily;
use crate::site::io::SiteIo;
use crate::template::partials::PARTIAL_OPEN;
use crate::template::{DataRecord, PartialSet, PreparedTemplate, Stamper};

/// One generated page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPage {
    pub slug: String,
    pub path: PathBuf,
}

/// A record that was skipped
#[derive(Debug)]
pub struct RecordFailure {
    /// Data file name
    pub file: String,
    pub error: PagesmithError,
}

/// Outcome of building one family
#[derive(Debug)]
pub struct BatchReport {
    pub family: &'static str,
    pub built: Vec<BuiltPage>,
    pub failures: Vec<RecordFailure>,
    pub index: Option<PathBuf>,
    /// Files written by the family's finish step
    pub assets: Vec<PathBuf>,
    pub missing_partials: Vec<String>,
    /// Advisory messages; they never change the outcome
    pub notes: Vec<String>,
}

impl BatchReport {
    pub(crate) fn new(family: &'static str) -> Self {
        Self {
            family,
            built: Vec::new(),
            failures: Vec::new(),
            index: None,
            assets: Vec::new(),
            missing_partials: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// True when at least one record was skipped
    pub fn has_warnings(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Build every page of a family
///
/// # Steps
/// 1. Load the page template (and index template) → fatal if missing
/// 2. Load partials when a template includes any → fatal if the directory is missing
/// 3. List data files → fatal if the data directory is missing
/// 4. Per record: read → parse → required fields → slug → stamp → write
/// 5. Stamp the index page from every record that built
///
/// Per-record failures are collected in the report and never abort the batch.
pub fn build_family(
    family: &dyn PageFamily,
    io: &dyn SiteIo,
    root: &Path,
    paths: &PathsConfig,
) -> Result<BatchReport> {
    let settings = family.settings();
    let mut report = BatchReport::new(family.name());

    let templates_dir = root.join(&paths.templates);
    let template = load_template(io, &templates_dir.join(&settings.template))?;
    let index_template = match (&settings.index_template, family.builtin_index_template()) {
        (Some(name), builtin) => {
            let path = templates_dir.join(name);
            match builtin {
                Some(text) if !io.exists(&path) => Some(text.to_string()),
                _ => Some(load_template(io, &path)?),
            }
        }
        (None, _) => None,
    };

    let needs_partials = template.contains(PARTIAL_OPEN)
        || index_template
            .as_deref()
            .is_some_and(|t| t.contains(PARTIAL_OPEN));
    let partials = if needs_partials {
        load_partials(io, &root.join(&paths.partials))?
    } else {
        PartialSet::new()
    };

    let data_dir = root.join(&settings.data_dir);
    if !io.exists(&data_dir) {
        return Err(PagesmithError::DataDirNotFound { path: data_dir });
    }

    let stamper = Stamper::new(&partials);
    let prepared = stamper.prepare(&template)?;
    report.missing_partials = prepared.missing_partials().to_vec();

    let files = family.data_files(io.list_files(&data_dir, DATA_EXTENSION)?);
    if files.is_empty() {
        tracing::warn!(
            family = family.name(),
            dir = %data_dir.display(),
            "no data files found"
        );
    }

    let mut records = Vec::new();
    for file in files {
        match build_record(family, io, root, &prepared, &data_dir, &file) {
            Ok((page, record)) => {
                tracing::debug!(file = %file, path = %page.path.display(), "built page");
                report.built.push(page);
                records.push(record);
            }
            Err(error) => {
                tracing::warn!(family = family.name(), file = %file, "skipping record: {}", error);
                report.failures.push(RecordFailure { file, error });
            }
        }
    }

    if let Some(index_template) = index_template {
        let title_field = family.title_field();
        records.sort_by_cached_key(|record| record.text_or(title_field, "").to_lowercase());

        if let Some(substitutions) = family.index_substitutions(&records) {
            let document = stamper.stamp(&index_template, &substitutions)?;
            for name in document.missing_partials {
                if !report.missing_partials.contains(&name) {
                    report.missing_partials.push(name);
                }
            }
            let path = family.index_path(root);
            write_page(io, &path, &document.text)?;
            tracing::debug!(path = %path.display(), "built index page");
            report.index = Some(path);
        }
    }

    report.assets = family.finish(io, root)?;

    Ok(report)
}

fn build_record(
    family: &dyn PageFamily,
    io: &dyn SiteIo,
    root: &Path,
    prepared: &PreparedTemplate,
    data_dir: &Path,
    file: &str,
) -> Result<(BuiltPage, DataRecord)> {
    let text = io.read_text_file(&data_dir.join(file))?;

    let record =
        DataRecord::parse(file, &text).map_err(|e| PagesmithError::RecordInvalidJson {
            file: file.to_string(),
            reason: e.to_string(),
        })?;

    let missing = record.missing_fields(family.required_fields());
    if !missing.is_empty() {
        return Err(PagesmithError::RecordMissingFields {
            file: file.to_string(),
            fields: missing.join(", "),
        });
    }

    let slug = record.text_or(family.slug_field(), "");
    if !is_safe_slug(&slug) {
        return Err(PagesmithError::RecordInvalidSlug {
            file: file.to_string(),
            slug,
        });
    }

    let mut substitutions = family.substitutions(&record)?;
    family.blocks().render_into(&record, &mut substitutions);

    let document = prepared.render(&substitutions)?;
    let unresolved = document.unresolved_markers();
    if !unresolved.is_empty() {
        tracing::debug!(file, markers = ?unresolved, "template markers left unresolved");
    }

    let path = family.output_path(root, &slug);
    write_page(io, &path, &document.text)?;

    Ok((BuiltPage { slug, path }, record))
}

pub(crate) fn load_template(io: &dyn SiteIo, path: &Path) -> Result<String> {
    if !io.exists(path) {
        return Err(PagesmithError::TemplateNotFound {
            path: path.to_path_buf(),
        });
    }
    io.read_text_file(path)
}

/// Load every `.html` fragment in the partials directory, keyed by file name
pub fn load_partials(io: &dyn SiteIo, dir: &Path) -> Result<PartialSet> {
    if !io.exists(dir) {
        return Err(PagesmithError::PartialsDirNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut partials = PartialSet::new();
    for name in io.list_files(dir, "html")? {
        let content = io.read_text_file(&dir.join(&name))?;
        partials.insert(name, content);
    }
    tracing::debug!(count = partials.len(), "loaded partials");
    Ok(partials)
}

pub(crate) fn write_page(io: &dyn SiteIo, path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        io.ensure_directory(parent)?;
    }
    io.write_text_file(path, text)
}

/// A slug must be a single, non-empty path segment
pub fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(['/', '\\', '\0'])
        && slug.trim() == slug
}
