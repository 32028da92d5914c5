use std::path::PathBuf;
use thiserror::Error;

use crate::template::TemplateError;

#[derive(Error, Debug)]
pub enum PagesmithError {
    // Config errors
    #[error("CONFIG_PARSE_ERROR: {0}")]
    ConfigParseError(String),

    #[error("CONFIG_INVALID: failed to parse pagesmith.toml: {0}")]
    ConfigInvalid(String),

    // Template errors
    #[error("TEMPLATE_NOT_FOUND: template '{path}' not found")]
    TemplateNotFound { path: PathBuf },

    #[error("PARTIALS_DIR_NOT_FOUND: partials directory '{path}' not found")]
    PartialsDirNotFound { path: PathBuf },

    #[error("TEMPLATES_DIR_NOT_FOUND: templates directory '{path}' not found")]
    TemplatesDirNotFound { path: PathBuf },

    #[error("TEMPLATE_INVALID: {0}")]
    Template(#[from] TemplateError),

    // Data errors
    #[error("DATA_DIR_NOT_FOUND: data directory '{path}' not found")]
    DataDirNotFound { path: PathBuf },

    #[error("RECORD_INVALID_JSON: {file}: {reason}")]
    RecordInvalidJson { file: String, reason: String },

    #[error("RECORD_MISSING_FIELDS: {file}: missing required fields ({fields})")]
    RecordMissingFields { file: String, fields: String },

    #[error("RECORD_INVALID_SLUG: {file}: slug '{slug}' is not a single path segment")]
    RecordInvalidSlug { file: String, slug: String },

    // Site definition errors
    #[error("SITE_DEFINITION_NOT_FOUND: site definition '{path}' not found")]
    SiteDefinitionNotFound { path: PathBuf },

    #[error("SITE_DEFINITION_INVALID: {path}: {reason}")]
    SiteDefinitionInvalid { path: PathBuf, reason: String },

    #[error("PAGE_FILE_INVALID: {page}: output file '{file}' is not a relative path inside the site")]
    PageFileInvalid { page: String, file: String },

    // Scene errors
    #[error("SCENE_INVALID: {0}")]
    SceneInvalid(String),

    // Video errors
    #[error("SCENE_NOT_FOUND: scene '{path}' not found")]
    SceneNotFound { path: PathBuf },

    #[error("SCRIPT_NOT_FOUND: narration script '{path}' not found")]
    ScriptNotFound { path: PathBuf },

    #[error("SPEECH_UNAVAILABLE: {0}")]
    SpeechUnavailable(String),

    #[error("SPEECH_FAILED: {0}")]
    SpeechFailed(String),

    #[error("EXTERNAL_TOOL_FAILED: {tool}: {reason}")]
    ExternalTool { tool: String, reason: String },

    // SVG errors
    #[error("SVG_INVALID: {0}")]
    SvgInvalid(String),

    // IO errors
    #[error("IO_ERROR: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),

    // Generic errors
    #[error("{0}")]
    Generic(String),
}

impl PagesmithError {
    pub fn external(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ExternalTool {
            tool: tool.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for PagesmithError {
    fn from(err: serde_json::Error) -> Self {
        PagesmithError::Generic(format!("JSON error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, PagesmithError>;
