use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::consts::{CONFIG_FILE, SITE_DEFINITION_FILE};
use crate::error::{PagesmithError, Result};

/// pagesmith.toml schema
///
/// Every section is optional; the defaults reproduce the stock site layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub annotations: FamilyConfig,
    #[serde(default)]
    pub curriculum: FamilyConfig,
    #[serde(default)]
    pub homepage: HomepageConfig,
    #[serde(default)]
    pub schools: SchoolsConfig,
    #[serde(default)]
    pub scenes: FamilyConfig,
    #[serde(default)]
    pub pages: SitePagesConfig,
    #[serde(default)]
    pub video: VideoConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_site_name")]
    pub name: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_locality")]
    pub locality: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_country")]
    pub country: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            base_url: default_base_url(),
            locality: default_locality(),
            region: default_region(),
            country: default_country(),
        }
    }
}

fn default_site_name() -> String {
    "LuminAIT".to_string()
}

fn default_base_url() -> String {
    "https://luminait.app".to_string()
}

fn default_locality() -> String {
    "Melbourne".to_string()
}

fn default_region() -> String {
    "VIC".to_string()
}

fn default_country() -> String {
    "AU".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_templates_dir")]
    pub templates: PathBuf,
    #[serde(default = "default_partials_dir")]
    pub partials: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            templates: default_templates_dir(),
            partials: default_partials_dir(),
        }
    }
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("src/templates")
}

fn default_partials_dir() -> PathBuf {
    PathBuf::from("src/partials")
}

/// Site pages listed in the site definition file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitePagesConfig {
    #[serde(default = "default_site_definition")]
    pub definition: PathBuf,
    /// Directory page files are written to; the site root when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl Default for SitePagesConfig {
    fn default() -> Self {
        Self {
            definition: default_site_definition(),
            output_dir: None,
        }
    }
}

fn default_site_definition() -> PathBuf {
    PathBuf::from(SITE_DEFINITION_FILE)
}

/// Per-family overrides; unset fields fall back to the family's own defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FamilyConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_template: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomepageConfig {
    #[serde(flatten)]
    pub family: FamilyConfig,
    /// Guides featured on the homepage, built at the site root
    #[serde(default = "default_homepage_slugs")]
    pub slugs: Vec<String>,
}

impl Default for HomepageConfig {
    fn default() -> Self {
        Self {
            family: FamilyConfig::default(),
            slugs: default_homepage_slugs(),
        }
    }
}

fn default_homepage_slugs() -> Vec<String> {
    [
        "the-giver",
        "romeo-and-juliet",
        "to-kill-a-mockingbird",
        "macbeth",
        "animal-farm",
        "a-christmas-carol",
        "blueback",
        "the-outsiders",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolsConfig {
    #[serde(flatten)]
    pub family: FamilyConfig,
    /// Text slug → page URL; texts without an entry render as plain titles
    #[serde(default = "default_text_urls")]
    pub text_urls: BTreeMap<String, String>,
}

impl Default for SchoolsConfig {
    fn default() -> Self {
        Self {
            family: FamilyConfig::default(),
            text_urls: default_text_urls(),
        }
    }
}

fn default_text_urls() -> BTreeMap<String, String> {
    let homepage = default_homepage_slugs()
        .into_iter()
        .map(|slug| (slug.clone(), format!("/{}/", slug)));

    let curriculum = [
        "dracula",
        "jane-eyre",
        "the-simple-gift",
        "convenience-store-woman",
        "catching-teller-crow",
        "the-curious-incident",
        "the-white-girl",
        "his-name-was-walter",
        "catherine-called-birdy",
        "my-life-as-an-alphabet",
    ]
    .iter()
    .map(|slug| (slug.to_string(), format!("/curriculum/{}/", slug)));

    homepage.chain(curriculum).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Silence appended after the last narration segment
    #[serde(default = "default_tail_ms")]
    pub tail_ms: u64,
    #[serde(default = "default_audio_cache")]
    pub audio_cache: PathBuf,
    /// Pre-recorded frames; when present, recording is skipped
    #[serde(default = "default_saved_frames")]
    pub saved_frames: PathBuf,
    #[serde(default = "default_temp_frames")]
    pub temp_frames: PathBuf,
    #[serde(default = "default_voice")]
    pub voice: String,
    #[serde(default = "default_speech_model")]
    pub speech_model: String,
    #[serde(default = "default_speech_endpoint")]
    pub speech_endpoint: String,
    /// External frame recorder: program followed by arguments
    ///
    /// Arguments may reference `{scene}`, `{frames_dir}`, `{fps}`,
    /// `{frame_count}` and `{timeline}`. Empty means no recorder is available.
    #[serde(default)]
    pub recorder: Vec<String>,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            tail_ms: default_tail_ms(),
            audio_cache: default_audio_cache(),
            saved_frames: default_saved_frames(),
            temp_frames: default_temp_frames(),
            voice: default_voice(),
            speech_model: default_speech_model(),
            speech_endpoint: default_speech_endpoint(),
            recorder: Vec::new(),
        }
    }
}

fn default_fps() -> u32 {
    24
}

fn default_tail_ms() -> u64 {
    2000
}

fn default_audio_cache() -> PathBuf {
    PathBuf::from("studio/cache_audio")
}

fn default_saved_frames() -> PathBuf {
    PathBuf::from("studio/saved_frames")
}

fn default_temp_frames() -> PathBuf {
    PathBuf::from("studio/temp_frames")
}

fn default_voice() -> String {
    "alloy".to_string()
}

fn default_speech_model() -> String {
    "tts-1".to_string()
}

fn default_speech_endpoint() -> String {
    "https://api.openai.com/v1/audio/speech".to_string()
}

impl Config {
    /// Read pagesmith.toml
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| PagesmithError::ConfigParseError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| PagesmithError::ConfigInvalid(e.to_string()))
    }

    /// Read `<root>/pagesmith.toml`, or fall back to defaults when the file is absent
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if path.exists() {
            tracing::debug!(path = %path.display(), "loading config");
            Self::from_file(&path)
        } else {
            tracing::debug!("no {} found, using defaults", CONFIG_FILE);
            Ok(Self::default())
        }
    }

    /// Write pagesmith.toml
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| PagesmithError::ConfigParseError(e.to_string()))?;

        std::fs::write(path.as_ref(), content).map_err(PagesmithError::IoError)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagesmith_testkit::temp_dir_in_workspace;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.paths.templates, PathBuf::from("src/templates"));
        assert_eq!(config.paths.partials, PathBuf::from("src/partials"));
        assert_eq!(config.homepage.slugs.len(), 8);
        assert_eq!(config.video.fps, 24);
        assert_eq!(config.video.tail_ms, 2000);
        assert_eq!(config.video.voice, "alloy");
        assert!(config.video.recorder.is_empty());
        assert_eq!(config.site.base_url, "https://luminait.app");
        assert_eq!(config.pages.definition, PathBuf::from("site-config.json"));
        assert!(config.pages.output_dir.is_none());
        assert_eq!(
            config.schools.text_urls.get("macbeth").map(String::as_str),
            Some("/macbeth/")
        );
        assert_eq!(
            config.schools.text_urls.get("dracula").map(String::as_str),
            Some("/curriculum/dracula/")
        );
    }

    #[test]
    fn test_parse_overrides() {
        let toml = r#"
[paths]
templates = "templates"

[annotations]
output_dir = "guides"

[pages]
output_dir = "public"

[homepage]
slugs = ["macbeth"]
template = "_home.html"

[schools.text_urls]
hamlet = "/hamlet/"

[video]
fps = 30
recorder = ["node", "record.js", "{scene}", "{frames_dir}"]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.paths.templates, PathBuf::from("templates"));
        assert_eq!(config.paths.partials, PathBuf::from("src/partials"));
        assert_eq!(config.annotations.output_dir, Some(PathBuf::from("guides")));
        assert!(config.annotations.data_dir.is_none());
        assert_eq!(config.pages.output_dir, Some(PathBuf::from("public")));
        assert_eq!(config.pages.definition, PathBuf::from("site-config.json"));
        assert_eq!(config.homepage.slugs, vec!["macbeth".to_string()]);
        assert_eq!(config.homepage.family.template.as_deref(), Some("_home.html"));
        assert_eq!(config.schools.text_urls.len(), 1);
        assert_eq!(config.video.fps, 30);
        assert_eq!(config.video.tail_ms, 2000);
        assert_eq!(config.video.recorder.len(), 4);
    }

    #[test]
    fn test_load_or_default_without_file() {
        let temp = temp_dir_in_workspace();
        let config = Config::load_or_default(temp.path()).unwrap();
        assert_eq!(config.site.name, "LuminAIT");
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let temp = temp_dir_in_workspace();
        std::fs::write(temp.path().join(CONFIG_FILE), "[video]\nfps = \"fast\"\n").unwrap();
        let err = Config::load_or_default(temp.path()).unwrap_err();
        assert!(err.to_string().starts_with("CONFIG_INVALID"));
    }

    #[test]
    fn test_round_trip_through_file() {
        let temp = temp_dir_in_workspace();
        let path = temp.path().join(CONFIG_FILE);
        let mut config = Config::default();
        config.video.voice = "nova".to_string();
        config.to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.video.voice, "nova");
        assert_eq!(loaded.homepage.slugs, config.homepage.slugs);
    }
}
