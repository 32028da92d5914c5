//! Page families
//!
//! A page family is one kind of generated page (annotation guides, school
//! pages, ...). Each family knows which record fields it needs and how to
//! turn a record into substitutions; [`crate::site::build_family`] does the
//! rest. The site pages in [`site`] come from one definition file instead
//! and have their own builder.

pub mod annotation;
pub mod guides;
pub mod school;
pub mod site;
pub mod style_check;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::consts::PAGE_FILE;
use crate::config::{Config, FamilyConfig};
use crate::error::Result;
use crate::scene::ScenesFamily;
use crate::site::SiteIo;
use crate::template::{BlockRegistry, DataRecord, Substitutions};

pub use annotation::AnnotationFamily;
pub use guides::{CurriculumFamily, HomepageFamily};
pub use school::SchoolFamily;
pub use site::build_site_pages;

/// Where a family reads from and writes to, relative to the site root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilySettings {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    /// File name inside the templates directory
    pub template: String,
    pub index_template: Option<String>,
}

impl FamilySettings {
    pub fn new(data_dir: &str, output_dir: &str, template: &str) -> Self {
        Self {
            data_dir: PathBuf::from(data_dir),
            output_dir: PathBuf::from(output_dir),
            template: template.to_string(),
            index_template: None,
        }
    }

    pub fn with_index(mut self, index_template: &str) -> Self {
        self.index_template = Some(index_template.to_string());
        self
    }

    /// Apply the `[family]` section of pagesmith.toml
    pub fn with_overrides(mut self, overrides: &FamilyConfig) -> Self {
        if let Some(data_dir) = &overrides.data_dir {
            self.data_dir = data_dir.clone();
        }
        if let Some(output_dir) = &overrides.output_dir {
            self.output_dir = output_dir.clone();
        }
        if let Some(template) = &overrides.template {
            self.template = template.clone();
        }
        if let Some(index_template) = &overrides.index_template {
            self.index_template = Some(index_template.clone());
        }
        self
    }
}

/// One kind of generated page
pub trait PageFamily {
    fn name(&self) -> &'static str;

    fn settings(&self) -> &FamilySettings;

    /// Dotted field paths a record must provide (non-empty)
    fn required_fields(&self) -> &'static [&'static str];

    fn slug_field(&self) -> &'static str {
        "slug"
    }

    /// Field the index page is sorted by (case-insensitive)
    fn title_field(&self) -> &'static str {
        "title"
    }

    /// Narrow the data files found in the data directory
    fn data_files(&self, available: Vec<String>) -> Vec<String> {
        available
    }

    /// Scalar substitutions for one record
    fn substitutions(&self, record: &DataRecord) -> Result<Substitutions>;

    /// Block placeholders rendered from the record
    fn blocks(&self) -> BlockRegistry {
        BlockRegistry::new()
    }

    fn output_path(&self, root: &Path, slug: &str) -> PathBuf {
        root.join(&self.settings().output_dir)
            .join(slug)
            .join(PAGE_FILE)
    }

    /// Substitutions for the index page, given the built records sorted by title
    fn index_substitutions(&self, _records: &[DataRecord]) -> Option<Substitutions> {
        None
    }

    /// Index template used when the templates directory has none
    fn builtin_index_template(&self) -> Option<&'static str> {
        None
    }

    fn index_path(&self, root: &Path) -> PathBuf {
        root.join(&self.settings().output_dir).join(PAGE_FILE)
    }

    /// Extra files written once per build; returns their paths
    fn finish(&self, _io: &dyn SiteIo, _root: &Path) -> Result<Vec<PathBuf>> {
        Ok(Vec::new())
    }
}

/// The page families a site can build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FamilyKind {
    Annotations,
    Curriculum,
    Homepage,
    Schools,
    Scenes,
}

impl FamilyKind {
    pub const ALL: [FamilyKind; 5] = [
        FamilyKind::Annotations,
        FamilyKind::Curriculum,
        FamilyKind::Homepage,
        FamilyKind::Schools,
        FamilyKind::Scenes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FamilyKind::Annotations => "annotations",
            FamilyKind::Curriculum => "curriculum",
            FamilyKind::Homepage => "homepage",
            FamilyKind::Schools => "schools",
            FamilyKind::Scenes => "scenes",
        }
    }

    /// Instantiate the family with the site's configuration applied
    pub fn create(&self, config: &Config) -> Box<dyn PageFamily> {
        match self {
            FamilyKind::Annotations => Box::new(AnnotationFamily::new(&config.annotations)),
            FamilyKind::Curriculum => Box::new(CurriculumFamily::new(&config.curriculum)),
            FamilyKind::Homepage => Box::new(HomepageFamily::new(&config.homepage)),
            FamilyKind::Schools => Box::new(SchoolFamily::new(&config.schools, &config.site)),
            FamilyKind::Scenes => Box::new(ScenesFamily::new(&config.scenes)),
        }
    }
}

impl fmt::Display for FamilyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
