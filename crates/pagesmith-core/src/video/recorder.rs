//! Frame recording
//!
//! Recording a scene needs a headless browser, which pagesmith does not ship.
//! The recorder is an external command named in `[video] recorder`; it is
//! expected to write `frame-00000.png`, `frame-00001.png`, ... into the frames
//! directory.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{PagesmithError, Result};
use crate::video::timeline::Timeline;

/// Paths and timing handed to a recorder
#[derive(Debug, Clone, Copy)]
pub struct RecordRequest<'a> {
    pub scene: &'a Path,
    pub frames_dir: &'a Path,
    /// Timeline JSON written for the recorder
    pub timeline_file: &'a Path,
    pub timeline: &'a Timeline,
}

pub trait FrameRecorder {
    fn record(&self, request: &RecordRequest<'_>) -> Result<()>;
}

/// Runs a configured program, substituting `{scene}`, `{frames_dir}`,
/// `{fps}`, `{frame_count}` and `{timeline}` in its arguments
#[derive(Debug, Clone)]
pub struct CommandRecorder {
    program: String,
    args: Vec<String>,
}

impl CommandRecorder {
    /// `None` when no command is configured
    pub fn from_command(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        if program.trim().is_empty() {
            return None;
        }
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn expand_args(&self, request: &RecordRequest<'_>) -> Vec<String> {
        let scene = request.scene.to_string_lossy();
        let frames_dir = request.frames_dir.to_string_lossy();
        let timeline = request.timeline_file.to_string_lossy();
        let fps = request.timeline.fps.to_string();
        let frame_count = request.timeline.frame_count().to_string();

        self.args
            .iter()
            .map(|arg| {
                arg.replace("{scene}", &scene)
                    .replace("{frames_dir}", &frames_dir)
                    .replace("{timeline}", &timeline)
                    .replace("{frame_count}", &frame_count)
                    .replace("{fps}", &fps)
            })
            .collect()
    }
}

impl FrameRecorder for CommandRecorder {
    fn record(&self, request: &RecordRequest<'_>) -> Result<()> {
        let args = self.expand_args(request);
        tracing::info!(
            program = %self.program,
            frames = request.timeline.frame_count(),
            "recording frames"
        );

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| PagesmithError::external(&self.program, format!("failed to spawn: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PagesmithError::external(
                &self.program,
                format!("exited with {}: {}", output.status, stderr.trim()),
            ));
        }
        Ok(())
    }
}
