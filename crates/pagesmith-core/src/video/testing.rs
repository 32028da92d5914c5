//! Test doubles for media tools and recorders

use std::cell::RefCell;
use std::path::Path;

use crate::error::{PagesmithError, Result};
use crate::video::media::{ensure_parent_dir, MediaTools};
use crate::video::recorder::{FrameRecorder, RecordRequest};

/// Records calls and writes placeholder files instead of running ffmpeg
#[derive(Debug, Default)]
pub struct FakeMedia {
    probe_seconds: f64,
    calls: RefCell<Vec<String>>,
}

impl FakeMedia {
    pub fn with_probe(seconds: f64) -> Self {
        Self {
            probe_seconds: seconds,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn calls_matching(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    fn log(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

fn touch(path: &Path, content: &str) -> Result<()> {
    ensure_parent_dir(path)?;
    std::fs::write(path, content)?;
    Ok(())
}

impl MediaTools for FakeMedia {
    fn render_silence(&self, output: &Path, seconds: f64) -> Result<()> {
        self.log(format!("silence {} {}", output.display(), seconds));
        touch(output, "silence")
    }

    fn probe_duration(&self, path: &Path) -> Result<f64> {
        self.log(format!("probe {}", path.display()));
        Ok(self.probe_seconds)
    }

    fn encode_frames(&self, frames_dir: &Path, fps: u32, output: &Path) -> Result<()> {
        self.log(format!("encode {} {} {}", frames_dir.display(), fps, output.display()));
        touch(output, "video")
    }

    fn merge_audio(&self, video: &Path, concat_list: &Path, output: &Path) -> Result<()> {
        self.log(format!(
            "merge {} {} {}",
            video.display(),
            concat_list.display(),
            output.display()
        ));
        touch(output, "mp4")
    }
}

pub struct FailingRecorder;

impl FrameRecorder for FailingRecorder {
    fn record(&self, _request: &RecordRequest<'_>) -> Result<()> {
        Err(PagesmithError::external("recorder", "browser crashed"))
    }
}

/// Writes a single frame
pub struct FrameWriter;

impl FrameRecorder for FrameWriter {
    fn record(&self, request: &RecordRequest<'_>) -> Result<()> {
        touch(&request.frames_dir.join("frame-00000.png"), "png")
    }
}
