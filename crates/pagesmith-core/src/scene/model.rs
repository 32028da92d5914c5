//! Scene data model
//!
//! Scene JSON is authored in camelCase. Only `slug`, `sceneTitle` and
//! `assets.coverImage` are required; every other field falls back to the
//! defaults below, section by section.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PagesmithError, Result};
use crate::scene::action::StepAction;

/// A CSS value authored either as a number or as text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CssValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for CssValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CssValue::Number(n) => write!(f, "{}", n),
            CssValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CssValue {
    fn from(s: &str) -> Self {
        CssValue::Text(s.to_string())
    }
}

impl From<f64> for CssValue {
    fn from(n: f64) -> Self {
        CssValue::Number(n)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneConfig {
    pub slug: String,
    pub scene_title: String,
    #[serde(default)]
    pub description: String,
    pub assets: Assets,
    #[serde(default)]
    pub layers: Layers,
    #[serde(default)]
    pub text_content: Vec<Paragraph>,
    #[serde(default)]
    pub highlights: Vec<Highlight>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl SceneConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let scene: SceneConfig =
            serde_json::from_str(text).map_err(|e| PagesmithError::SceneInvalid(e.to_string()))?;
        scene.validate()?;
        Ok(scene)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let scene: SceneConfig = serde_json::from_value(value)
            .map_err(|e| PagesmithError::SceneInvalid(e.to_string()))?;
        scene.validate()?;
        Ok(scene)
    }

    /// Required fields present, element ids usable
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("slug", &self.slug),
            ("sceneTitle", &self.scene_title),
            ("assets.coverImage", &self.assets.cover_image),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(PagesmithError::SceneInvalid(format!(
                    "'{}' must not be empty",
                    field
                )));
            }
        }

        let mut seen = Vec::new();
        let ids = self
            .highlights
            .iter()
            .map(|h| h.id.as_str())
            .chain(self.labels.iter().map(|l| l.id.as_str()));
        for id in ids {
            if id.trim().is_empty() {
                return Err(PagesmithError::SceneInvalid(
                    "highlight and label ids must not be empty".to_string(),
                ));
            }
            if seen.contains(&id) {
                return Err(PagesmithError::SceneInvalid(format!(
                    "duplicate element id '{}'",
                    id
                )));
            }
            seen.push(id);
        }

        Ok(())
    }

    /// Playback metadata, one entry per authored step, in order
    pub fn step_metadata(&self) -> Vec<StepMetadata> {
        self.steps
            .iter()
            .map(|step| StepMetadata {
                duration: step.duration,
                text: step.subtitle.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assets {
    pub cover_image: String,
    #[serde(default)]
    pub context_image: Option<String>,
    #[serde(default)]
    pub cta_image: Option<String>,
    #[serde(default)]
    pub paper_texture: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Layers {
    pub intro: IntroLayer,
    pub context: ContextLayer,
    pub text: TextLayer,
    pub outro: OutroLayer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IntroLayer {
    pub background: String,
    pub image_style: String,
}

impl Default for IntroLayer {
    fn default() -> Self {
        Self {
            background: "#2c3e50".to_string(),
            image_style: "height: 80%; box-shadow: 0 20px 50px rgba(0,0,0,0.5);".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContextLayer {
    pub background: String,
    pub image_opacity: CssValue,
    pub pan_effect: bool,
    pub pan_duration: String,
    pub overlay_text: Option<String>,
    pub overlay_position: BTreeMap<String, String>,
}

impl Default for ContextLayer {
    fn default() -> Self {
        Self {
            background: "#000".to_string(),
            image_opacity: CssValue::Number(0.8),
            pan_effect: true,
            pan_duration: "10s".to_string(),
            overlay_text: None,
            overlay_position: default_overlay_position(),
        }
    }
}

pub fn default_overlay_position() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("bottom".to_string(), "10%".to_string()),
        ("left".to_string(), "5%".to_string()),
    ])
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextLayer {
    pub background: String,
    pub font_family: String,
    pub font_size: CssValue,
    pub line_height: CssValue,
    pub text_color: String,
    pub padding: CssValue,
}

impl Default for TextLayer {
    fn default() -> Self {
        Self {
            background: "#fffdf5".to_string(),
            font_family: "'Courier New', Courier, monospace".to_string(),
            font_size: CssValue::from("1.4rem"),
            line_height: CssValue::Number(2.2),
            text_color: "#333".to_string(),
            padding: CssValue::from("100px"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutroLayer {
    pub background: String,
    pub image_style: String,
}

impl Default for OutroLayer {
    fn default() -> Self {
        Self {
            background: "#1e3a5f".to_string(),
            image_style: "width: 100%; height: 100%; object-fit: contain;".to_string(),
        }
    }
}

/// A paragraph of the book text layer; authored markup, inserted as is
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paragraph {
    pub html: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightKind {
    #[default]
    Yellow,
    #[serde(other)]
    Underline,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Highlight {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: HighlightKind,
    #[serde(default)]
    pub top: String,
    #[serde(default)]
    pub left: String,
    #[serde(default)]
    pub width: String,
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl Highlight {
    pub fn resolved_color(&self) -> &str {
        match (&self.color, self.kind) {
            (Some(color), _) => color,
            (None, HighlightKind::Yellow) => "#ffeb3b",
            (None, HighlightKind::Underline) => "#3498db",
        }
    }

    pub fn resolved_height(&self) -> &str {
        match (&self.height, self.kind) {
            (Some(height), _) => height,
            (None, HighlightKind::Yellow) => "1.6%",
            (None, HighlightKind::Underline) => "0.4%",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self.kind {
            HighlightKind::Yellow => "type-yellow",
            HighlightKind::Underline => "type-underline",
        }
    }
}

/// An annotation label; `title` and `body` are authored markup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub id: String,
    #[serde(default)]
    pub top: String,
    #[serde(default)]
    pub left: String,
    #[serde(default)]
    pub border_color: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    /// Milliseconds before autoplay advances past this step
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub actions: Vec<StepAction>,
}

/// Per-step playback data consumed by the player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepMetadata {
    pub duration: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl StepMetadata {
    pub fn new(duration: u64, text: impl Into<String>) -> Self {
        Self {
            duration,
            text: Some(text.into()),
        }
    }
}
