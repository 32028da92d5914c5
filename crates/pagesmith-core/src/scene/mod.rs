//! Scene timeline interpreter
//!
//! A scene is a declarative list of steps, each with a duration and a list of
//! actions. From a [`SceneConfig`] this module generates the scene stylesheet,
//! the step control script and the per-step playback metadata consumed by the
//! player.

pub mod action;
pub mod markup;
pub mod model;
pub mod page;
pub mod script;
pub mod styles;

#[cfg(test)]
mod tests;

pub use action::{Action, Mutation, StepAction, StyleProperty};
pub use model::{
    Assets, CssValue, Highlight, HighlightKind, Label, Layers, Paragraph, SceneConfig, Step,
    StepMetadata,
};
pub use page::ScenesFamily;
pub use script::ScenePlan;

/// Everything generated for one scene
#[derive(Debug, Clone)]
pub struct SceneArtifacts {
    pub stylesheet: String,
    pub control_script: String,
    /// Pretty JSON array of `{duration, text}`, in authored order
    pub step_metadata_json: String,
}

pub fn build_scene_artifacts(scene: &SceneConfig) -> SceneArtifacts {
    SceneArtifacts {
        stylesheet: styles::scene_stylesheet(scene),
        control_script: ScenePlan::from_scene(scene).render(),
        step_metadata_json: step_metadata_json(&scene.step_metadata()),
    }
}

pub fn step_metadata_json(metadata: &[StepMetadata]) -> String {
    // Plain structs of strings and integers always serialize
    serde_json::to_string_pretty(metadata).unwrap_or_else(|_| "[]".to_string())
}
