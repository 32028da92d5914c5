//! Narrated scene videos
//!
//! A video build parses the narration script, produces one audio clip per
//! narrated step, records frames of the scene page, encodes them and muxes
//! the audio. Without a working recorder it writes a preview page instead.

pub mod audio;
pub mod media;
pub mod preview;
pub mod recorder;
pub mod script;
pub mod timeline;

#[cfg(test)]
pub(crate) mod testing;

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::config::consts::video::{CONCAT_LIST, TEMP_VISUAL};
use crate::config::VideoConfig;
use crate::error::{PagesmithError, Result};

pub use audio::{AudioCache, AudioClip, AudioSource, OpenAiSpeech, SpeechSynthesizer};
pub use media::{Ffmpeg, MediaTools};
pub use recorder::{CommandRecorder, FrameRecorder, RecordRequest};
pub use script::{parse_narration, NarrationSegment};
pub use timeline::{Timeline, TimelineEntry};

const TIMELINE_FILE: &str = "timeline.json";

#[derive(Debug, Clone)]
pub struct VideoRequest {
    pub scene: PathBuf,
    pub script: PathBuf,
    pub output: PathBuf,
    pub dry_run: bool,
    pub mock_audio: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VideoOutcome {
    Rendered { output: PathBuf, timeline: Timeline },
    DryRun { timeline: Timeline },
    Preview {
        path: PathBuf,
        reason: String,
        timeline: Timeline,
    },
}

impl VideoOutcome {
    pub fn timeline(&self) -> &Timeline {
        match self {
            VideoOutcome::Rendered { timeline, .. }
            | VideoOutcome::DryRun { timeline }
            | VideoOutcome::Preview { timeline, .. } => timeline,
        }
    }
}

pub struct VideoBuilder<'a> {
    config: &'a VideoConfig,
    root: PathBuf,
    media: &'a dyn MediaTools,
    recorder: Option<&'a dyn FrameRecorder>,
    speech: Option<&'a dyn SpeechSynthesizer>,
}

impl<'a> VideoBuilder<'a> {
    /// Cache and frame directories in `config` are relative to `root`
    pub fn new(config: &'a VideoConfig, root: impl Into<PathBuf>, media: &'a dyn MediaTools) -> Self {
        Self {
            config,
            root: root.into(),
            media,
            recorder: None,
            speech: None,
        }
    }

    pub fn with_recorder(mut self, recorder: &'a dyn FrameRecorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn with_speech(mut self, speech: &'a dyn SpeechSynthesizer) -> Self {
        self.speech = Some(speech);
        self
    }

    pub fn run(&self, request: &VideoRequest) -> Result<VideoOutcome> {
        if !request.script.is_file() {
            return Err(PagesmithError::ScriptNotFound {
                path: request.script.clone(),
            });
        }
        if !request.scene.is_file() {
            return Err(PagesmithError::SceneNotFound {
                path: request.scene.clone(),
            });
        }

        let timeline = self.narrate(request)?;
        tracing::info!(
            segments = timeline.len(),
            total_ms = timeline.total_ms(),
            frames = timeline.frame_count(),
            fps = timeline.fps,
            "timeline ready"
        );

        if request.dry_run {
            return Ok(VideoOutcome::DryRun { timeline });
        }

        let frames_dir = match self.frames(request, &timeline) {
            Ok(dir) => dir,
            Err(reason) => return self.write_preview(request, timeline, reason),
        };

        self.encode(&frames_dir, &timeline, &request.output)?;
        Ok(VideoOutcome::Rendered {
            output: request.output.clone(),
            timeline,
        })
    }

    fn narrate(&self, request: &VideoRequest) -> Result<Timeline> {
        let markdown = std::fs::read_to_string(&request.script).with_context(|| {
            format!("failed to read script '{}'", request.script.display())
        })?;
        let segments = parse_narration(&markdown);
        tracing::info!(count = segments.len(), "parsed narration segments");

        let source = if request.mock_audio {
            AudioSource::Mock
        } else {
            match self.speech {
                Some(speech) => AudioSource::Speech(speech),
                None => {
                    return Err(PagesmithError::SpeechUnavailable(
                        "no speech synthesizer configured".to_string(),
                    ))
                }
            }
        };
        let cache = AudioCache::new(
            self.root.join(&self.config.audio_cache),
            self.config.voice.clone(),
            source,
            self.media,
        );

        let mut timeline = Timeline::new(self.config.fps, self.config.tail_ms);
        for segment in segments {
            let clip = cache.clip(&segment.text)?;
            tracing::debug!(step = %segment.title, duration_ms = clip.duration_ms, "narration clip");
            timeline.push(TimelineEntry {
                title: segment.title,
                text: segment.text,
                audio_path: clip.path,
                duration_ms: clip.duration_ms,
            });
        }
        Ok(timeline)
    }

    /// Directory holding the frames to encode; `Err` carries the fallback reason
    fn frames(&self, request: &VideoRequest, timeline: &Timeline) -> std::result::Result<PathBuf, String> {
        let saved = self.root.join(&self.config.saved_frames);
        if saved.is_dir() {
            tracing::info!(dir = %saved.display(), "using saved frames; skipping recording");
            return Ok(saved);
        }

        let Some(recorder) = self.recorder else {
            return Err("no frame recorder configured".to_string());
        };

        let frames_dir = self.root.join(&self.config.temp_frames);
        let timeline_file = self.root.join(&self.config.audio_cache).join(TIMELINE_FILE);
        prepare_frames_dir(&frames_dir, &timeline_file, timeline).map_err(|e| e.to_string())?;

        let record = RecordRequest {
            scene: &request.scene,
            frames_dir: &frames_dir,
            timeline_file: &timeline_file,
            timeline,
        };
        recorder.record(&record).map_err(|e| e.to_string())?;
        Ok(frames_dir)
    }

    fn encode(&self, frames_dir: &Path, timeline: &Timeline, output: &Path) -> Result<()> {
        let temp_visual = output
            .parent()
            .map(|dir| dir.join(TEMP_VISUAL))
            .unwrap_or_else(|| PathBuf::from(TEMP_VISUAL));

        tracing::info!(frames = %frames_dir.display(), "encoding frames");
        self.media.encode_frames(frames_dir, timeline.fps, &temp_visual)?;

        let list = self.root.join(&self.config.audio_cache).join(CONCAT_LIST);
        media::ensure_parent_dir(&list)?;
        std::fs::write(&list, timeline.concat_list())
            .with_context(|| format!("failed to write '{}'", list.display()))?;

        tracing::info!(output = %output.display(), "merging audio");
        self.media.merge_audio(&temp_visual, &list, output)?;

        if let Err(e) = std::fs::remove_file(&temp_visual) {
            tracing::debug!(path = %temp_visual.display(), error = %e, "could not remove intermediate video");
        }
        Ok(())
    }

    fn write_preview(
        &self,
        request: &VideoRequest,
        timeline: Timeline,
        reason: String,
    ) -> Result<VideoOutcome> {
        tracing::warn!(reason = %reason, "recording unavailable; writing preview page");
        let html = std::fs::read_to_string(&request.scene).with_context(|| {
            format!("failed to read scene '{}'", request.scene.display())
        })?;
        let path = preview::preview_path(&request.scene);
        std::fs::write(&path, preview::inject_timeline(&html, &timeline))
            .with_context(|| format!("failed to write preview '{}'", path.display()))?;
        Ok(VideoOutcome::Preview {
            path,
            reason,
            timeline,
        })
    }
}

fn prepare_frames_dir(frames_dir: &Path, timeline_file: &Path, timeline: &Timeline) -> Result<()> {
    if frames_dir.exists() {
        std::fs::remove_dir_all(frames_dir)
            .with_context(|| format!("failed to clear '{}'", frames_dir.display()))?;
    }
    std::fs::create_dir_all(frames_dir)
        .with_context(|| format!("failed to create '{}'", frames_dir.display()))?;
    media::ensure_parent_dir(timeline_file)?;
    std::fs::write(timeline_file, timeline.to_json())
        .with_context(|| format!("failed to write '{}'", timeline_file.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::testing::{FailingRecorder, FakeMedia, FrameWriter};
    use pagesmith_testkit::{temp_dir_in_workspace, SiteFixture};

    const SCRIPT: &str = "### Step 1\n**Audio**: \"Stay gold.\"\n\n### Step 2\n**Audio**: \"Nothing gold can stay, Ponyboy.\"\n";
    const SCENE: &str = "<html><body><div id=\"stage\"></div></body></html>";

    fn site(temp: &tempfile::TempDir) -> (SiteFixture, VideoRequest) {
        let site = SiteFixture::new(temp.path());
        site.write("studio/scenes/opening.html", SCENE)
            .write("studio/scripts/opening.md", SCRIPT);
        let request = VideoRequest {
            scene: site.root().join("studio/scenes/opening.html"),
            script: site.root().join("studio/scripts/opening.md"),
            output: site.root().join("out/opening.mp4"),
            dry_run: false,
            mock_audio: true,
        };
        (site, request)
    }

    #[test]
    fn test_dry_run_reports_timing_only() {
        let temp = temp_dir_in_workspace();
        let (site, mut request) = site(&temp);
        request.dry_run = true;
        let config = VideoConfig::default();
        let media = FakeMedia::default();

        let outcome = VideoBuilder::new(&config, site.root(), &media)
            .run(&request)
            .unwrap();

        let timeline = match outcome {
            VideoOutcome::DryRun { timeline } => timeline,
            other => panic!("expected dry run, got {:?}", other),
        };
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline.entries[0].duration_ms, 2000);
        assert_eq!(timeline.entries[1].duration_ms, 2067);
        assert_eq!(timeline.total_ms(), 6067);
        assert_eq!(media.calls_matching("encode"), 0);
    }

    #[test]
    fn test_missing_inputs() {
        let temp = temp_dir_in_workspace();
        let (site, mut request) = site(&temp);
        let config = VideoConfig::default();
        let media = FakeMedia::default();
        let builder = VideoBuilder::new(&config, site.root(), &media);

        request.scene = site.root().join("nope.html");
        assert!(matches!(
            builder.run(&request),
            Err(PagesmithError::SceneNotFound { .. })
        ));
        request.script = site.root().join("nope.md");
        assert!(matches!(
            builder.run(&request),
            Err(PagesmithError::ScriptNotFound { .. })
        ));
    }

    #[test]
    fn test_real_audio_requires_speech() {
        let temp = temp_dir_in_workspace();
        let (site, mut request) = site(&temp);
        request.mock_audio = false;
        let config = VideoConfig::default();
        let media = FakeMedia::default();
        let result = VideoBuilder::new(&config, site.root(), &media).run(&request);
        assert!(matches!(result, Err(PagesmithError::SpeechUnavailable(_))));
    }

    #[test]
    fn test_without_recorder_falls_back_to_preview() {
        let temp = temp_dir_in_workspace();
        let (site, request) = site(&temp);
        let config = VideoConfig::default();
        let media = FakeMedia::default();

        let outcome = VideoBuilder::new(&config, site.root(), &media)
            .run(&request)
            .unwrap();

        let (path, reason) = match outcome {
            VideoOutcome::Preview { path, reason, .. } => (path, reason),
            other => panic!("expected preview, got {:?}", other),
        };
        assert_eq!(path, site.root().join("studio/scenes/opening-PREVIEW.html"));
        assert!(reason.contains("no frame recorder"));
        let html = site.read("studio/scenes/opening-PREVIEW.html");
        assert!(html.contains("\"duration\":2067"));
        assert!(!request.output.exists());
    }

    #[test]
    fn test_recorder_failure_falls_back_to_preview() {
        let temp = temp_dir_in_workspace();
        let (site, request) = site(&temp);
        let config = VideoConfig::default();
        let media = FakeMedia::default();
        let recorder = FailingRecorder;

        let outcome = VideoBuilder::new(&config, site.root(), &media)
            .with_recorder(&recorder)
            .run(&request)
            .unwrap();
        assert!(
            matches!(outcome, VideoOutcome::Preview { ref reason, .. } if reason.contains("browser crashed"))
        );
    }

    #[test]
    fn test_recorded_frames_are_encoded_and_merged() {
        let temp = temp_dir_in_workspace();
        let (site, request) = site(&temp);
        let config = VideoConfig::default();
        let media = FakeMedia::default();
        let recorder = FrameWriter;

        let outcome = VideoBuilder::new(&config, site.root(), &media)
            .with_recorder(&recorder)
            .run(&request)
            .unwrap();

        assert!(matches!(outcome, VideoOutcome::Rendered { ref output, .. } if output == &request.output));
        assert!(site.exists("studio/temp_frames/frame-00000.png"));
        assert!(site.exists("studio/cache_audio/timeline.json"));
        let list = site.read("studio/cache_audio/list.txt");
        assert_eq!(list.lines().count(), 2);
        assert!(list.lines().all(|line| line.starts_with("file '") && line.contains("MOCK_")));
        assert_eq!(media.calls_matching("encode"), 1);
        assert_eq!(media.calls_matching("merge"), 1);
        assert!(request.output.exists());
    }

    #[test]
    fn test_saved_frames_skip_recording() {
        let temp = temp_dir_in_workspace();
        let (site, request) = site(&temp);
        site.write("studio/saved_frames/frame-00000.png", "png");
        let config = VideoConfig::default();
        let media = FakeMedia::default();
        let recorder = FailingRecorder;

        let outcome = VideoBuilder::new(&config, site.root(), &media)
            .with_recorder(&recorder)
            .run(&request)
            .unwrap();
        assert!(matches!(outcome, VideoOutcome::Rendered { .. }));
        assert!(media
            .calls()
            .iter()
            .any(|call| call.starts_with("encode") && call.contains("saved_frames")));
    }
}
