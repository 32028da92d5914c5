//! Video command - narrate, record and encode a scene

use std::path::PathBuf;

use anyhow::Result;
use pagesmith_core::video::media::is_tool_on_path;
use pagesmith_core::video::{
    CommandRecorder, Ffmpeg, OpenAiSpeech, VideoBuilder, VideoOutcome, VideoRequest,
};

use crate::commands::Completion;
use crate::context::Context;
use crate::output;

pub struct VideoArgs {
    pub scene: PathBuf,
    pub script: PathBuf,
    pub output: PathBuf,
    pub dry_run: bool,
    pub mock_audio: bool,
}

/// Build a video, a dry-run timeline, or a preview page when frames cannot be recorded
pub fn run(ctx: &Context, args: VideoArgs) -> Result<Completion> {
    let request = VideoRequest {
        scene: ctx.resolve(&args.scene),
        script: ctx.resolve(&args.script),
        output: ctx.resolve(&args.output),
        dry_run: args.dry_run,
        mock_audio: args.mock_audio,
    };

    if !is_tool_on_path("ffmpeg") {
        output::warning("ffmpeg not found on PATH; audio and encoding steps will fail");
    }

    let media = Ffmpeg::new();
    let recorder = CommandRecorder::from_command(&ctx.config.video.recorder);
    let speech = if request.mock_audio {
        None
    } else {
        Some(OpenAiSpeech::from_env(&ctx.config.video)?)
    };

    let mut builder = VideoBuilder::new(&ctx.config.video, &ctx.root, &media);
    if let Some(recorder) = &recorder {
        output::step(ctx.verbose, &format!("Recording with '{}'", recorder.program()));
        builder = builder.with_recorder(recorder);
    }
    if let Some(speech) = &speech {
        builder = builder.with_speech(speech);
    }

    output::step(ctx.verbose, "Generating narration timeline");
    let outcome = builder.run(&request)?;

    let timeline = outcome.timeline();
    if ctx.verbose {
        for (index, entry) in timeline.entries.iter().enumerate() {
            println!(
                "  {}. {} ({} ms)",
                index + 1,
                entry.title,
                entry.duration_ms
            );
        }
    }
    let summary = format!(
        "{} segment(s), {} ms, {} frame(s) at {} fps",
        timeline.len(),
        timeline.total_ms(),
        timeline.frame_count(),
        timeline.fps
    );

    match &outcome {
        VideoOutcome::Rendered { output, .. } => {
            output::success(&format!("Rendered {} ({})", output.display(), summary));
            Ok(Completion::Clean)
        }
        VideoOutcome::DryRun { .. } => {
            output::success(&format!("Dry run: {}", summary));
            Ok(Completion::Clean)
        }
        VideoOutcome::Preview { path, reason, .. } => {
            output::warning(&format!("Could not record frames: {}", reason));
            output::warning(&format!("Wrote preview page {} ({})", path.display(), summary));
            Ok(Completion::WithWarnings)
        }
    }
}
