//! Layered SVG composition format

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{PagesmithError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    pub width: f64,
    pub height: f64,
    /// Defaults to `0 0 <width> <height>`
    #[serde(default)]
    pub view_box: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// CSS placed in `<defs><style>`
    #[serde(default)]
    pub style: Option<String>,
    pub layers: Vec<Layer>,
}

impl Composition {
    pub fn from_json(text: &str) -> Result<Self> {
        let composition: Composition =
            serde_json::from_str(text).map_err(|e| PagesmithError::SvgInvalid(e.to_string()))?;
        composition.validate()?;
        Ok(composition)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(PagesmithError::SvgInvalid(format!(
                "composition '{}' not found",
                path.display()
            )));
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(PagesmithError::SvgInvalid(
                "width and height must be positive".to_string(),
            ));
        }

        let mut seen = Vec::new();
        for layer in &self.layers {
            if layer.id.trim().is_empty() {
                return Err(PagesmithError::SvgInvalid(
                    "layer ids must not be empty".to_string(),
                ));
            }
            if seen.contains(&layer.id.as_str()) {
                return Err(PagesmithError::SvgInvalid(format!(
                    "duplicate layer id '{}'",
                    layer.id
                )));
            }
            seen.push(layer.id.as_str());
        }
        Ok(())
    }

    pub fn view_box(&self) -> String {
        self.view_box
            .clone()
            .unwrap_or_else(|| format!("0 0 {} {}", self.width, self.height))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Layer {
    pub id: String,
    #[serde(default)]
    pub transform: Option<String>,
    #[serde(flatten)]
    pub source: LayerSource,
    #[serde(default)]
    pub animations: Vec<Animation>,
}

/// What a layer draws; file paths are relative to the composition file
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayerSource {
    /// Inner markup of a component SVG file
    Svg(PathBuf),
    /// Raster or vector image embedded as a data URI
    Image(ImageSource),
    /// Literal SVG markup
    Markup(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageSource {
    pub href: PathBuf,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimationElement {
    #[default]
    Animate,
    AnimateTransform,
}

impl AnimationElement {
    pub fn tag(&self) -> &'static str {
        match self {
            AnimationElement::Animate => "animate",
            AnimationElement::AnimateTransform => "animateTransform",
        }
    }
}

/// A declarative SMIL animation on the layer group
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animation {
    #[serde(default)]
    pub element: AnimationElement,
    pub attribute: String,
    /// `animateTransform` type (`scale`, `translate`, ...)
    #[serde(default, rename = "type")]
    pub transform_type: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub values: Option<String>,
    #[serde(default)]
    pub key_times: Option<String>,
    pub dur: String,
    #[serde(default)]
    pub begin: Option<String>,
    #[serde(default)]
    pub fill: Option<String>,
    #[serde(default)]
    pub repeat_count: Option<String>,
    #[serde(default)]
    pub additive: Option<String>,
}
