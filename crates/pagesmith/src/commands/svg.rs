//! SVG command - assemble a layered SVG composition

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use pagesmith_core::svg::{Composition, assemble};
use pagesmith_core::video::media::ensure_parent_dir;

use crate::commands::Completion;
use crate::context::Context;
use crate::output;

pub fn run(ctx: &Context, composition: &Path, output_path: Option<PathBuf>) -> Result<Completion> {
    let path = ctx.resolve(composition);
    let composition = Composition::from_file(&path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    output::step(
        ctx.verbose,
        &format!("Assembling {} layer(s)", composition.layers.len()),
    );
    let svg = assemble(&composition, base_dir)?;

    match output_path {
        Some(target) => {
            let target = ctx.resolve(&target);
            ensure_parent_dir(&target)?;
            std::fs::write(&target, &svg)
                .with_context(|| format!("Failed to write '{}'", target.display()))?;
            output::success(&format!(
                "Wrote {} ({} bytes)",
                target.display(),
                svg.len()
            ));
        }
        None => output::print_text(svg.trim_end())?,
    }

    Ok(Completion::Clean)
}
