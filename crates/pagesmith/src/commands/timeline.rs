//! Timeline command - show when autoplay reaches each step

use std::path::Path;

use anyhow::{Context as _, Result};
use colored::Colorize;
use pagesmith_core::player::{Player, autoplay_schedule};
use pagesmith_core::scene::SceneConfig;

use crate::commands::Completion;
use crate::context::Context;
use crate::output;

pub fn run(ctx: &Context, scene: &Path, json: bool) -> Result<Completion> {
    let path = ctx.resolve(scene);
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read scene '{}'", path.display()))?;
    let scene = SceneConfig::from_json(&text)?;

    let events = autoplay_schedule(Player::new(scene.step_metadata()));

    if json {
        output::print_json(&serde_json::to_string_pretty(&events)?)?;
        return Ok(Completion::Clean);
    }

    output::print_text(&format!("{} ({} steps)", scene.scene_title.bold(), scene.steps.len()))?;
    for event in &events {
        let subtitle = event.subtitle.as_deref().unwrap_or("");
        output::print_text(&format!(
            "{:>8} ms  step {:<3} {}",
            event.at, event.step, subtitle
        ))?;
    }
    if events.len() < scene.steps.len() {
        output::warning(&format!(
            "Autoplay stops at step {} of {}",
            events.last().map(|e| e.step).unwrap_or(0),
            scene.steps.len()
        ));
    }

    Ok(Completion::Clean)
}
