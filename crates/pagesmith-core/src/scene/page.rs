//! Scene pages: `studio/scenes/<slug>.html`
//!
//! Each page loads `studio-player.js`, the browser port of
//! [`crate::player::Player`]. The Rust player is the reference model: its
//! tests pin the step and timer semantics, and the runtime tests below check
//! that every trigger in the script follows the same cancellation rules.

use std::path::{Path, PathBuf};

use crate::config::consts::scenes::PLAYER_SCRIPT;
use crate::config::FamilyConfig;
use crate::error::Result;
use crate::pages::{FamilySettings, PageFamily};
use crate::scene::{build_scene_artifacts, markup, SceneConfig};
use crate::site::SiteIo;
use crate::template::{DataRecord, Substitutions};

const PLAYER_RUNTIME: &str = include_str!("studio-player.js");

pub struct ScenesFamily {
    settings: FamilySettings,
}

impl ScenesFamily {
    pub fn new(overrides: &FamilyConfig) -> Self {
        let settings =
            FamilySettings::new("data/video-scenes", "studio/scenes", "_video-scene-template.html")
                .with_overrides(overrides);
        Self { settings }
    }
}

impl PageFamily for ScenesFamily {
    fn name(&self) -> &'static str {
        "scenes"
    }

    fn settings(&self) -> &FamilySettings {
        &self.settings
    }

    fn required_fields(&self) -> &'static [&'static str] {
        &["slug", "sceneTitle", "assets.coverImage"]
    }

    fn title_field(&self) -> &'static str {
        "sceneTitle"
    }

    fn substitutions(&self, record: &DataRecord) -> Result<Substitutions> {
        let scene = SceneConfig::from_value(record.value().clone())?;
        let artifacts = build_scene_artifacts(&scene);

        Ok(Substitutions::new()
            .text("SCENE_TITLE", scene.scene_title.clone())
            .text("COVER_IMAGE", scene.assets.cover_image.clone())
            .html("SCENE_STYLES", artifacts.stylesheet)
            .html("CONTEXT_LAYER_HTML", markup::context_layer(&scene))
            .html("OUTRO_LAYER_HTML", markup::outro_layer(&scene))
            .html("TEXT_PARAGRAPHS", markup::text_paragraphs(&scene))
            .html("HIGHLIGHTS_HTML", markup::highlights(&scene))
            .html("LABELS_HTML", markup::labels(&scene))
            // Inline script: keep the JSON from closing the element
            .html(
                "SCENE_STEPS_JSON",
                artifacts.step_metadata_json.replace("</", "<\\/"),
            )
            .html("STEP_HANDLER_JS", artifacts.control_script))
    }

    fn output_path(&self, root: &Path, slug: &str) -> PathBuf {
        root.join(&self.settings.output_dir)
            .join(format!("{}.html", slug))
    }

    fn finish(&self, io: &dyn SiteIo, root: &Path) -> Result<Vec<PathBuf>> {
        let dir = root.join(&self.settings.output_dir);
        io.ensure_directory(&dir)?;
        let path = dir.join(PLAYER_SCRIPT);
        io.write_text_file(&path, PLAYER_RUNTIME)?;
        tracing::debug!(path = %path.display(), "wrote player runtime");
        Ok(vec![path])
    }
}
