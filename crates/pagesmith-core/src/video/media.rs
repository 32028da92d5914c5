//! External media tools (ffmpeg, ffprobe)

use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::Context as _;

use crate::config::consts::video::FRAME_PATTERN;
use crate::error::{PagesmithError, Result};

/// The media operations the video builder needs
pub trait MediaTools {
    /// Write a silent mp3 of the given length
    fn render_silence(&self, output: &Path, seconds: f64) -> Result<()>;

    /// Duration of a media file in seconds
    fn probe_duration(&self, path: &Path) -> Result<f64>;

    /// Encode numbered frames into a silent mp4
    fn encode_frames(&self, frames_dir: &Path, fps: u32, output: &Path) -> Result<()>;

    /// Mux a video with the audio files named in a concat list
    fn merge_audio(&self, video: &Path, concat_list: &Path, output: &Path) -> Result<()>;
}

pub fn is_tool_on_path(tool: &str) -> bool {
    Command::new(tool)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// The system `ffmpeg` and `ffprobe` binaries
#[derive(Debug, Clone, Default)]
pub struct Ffmpeg;

impl Ffmpeg {
    pub fn new() -> Self {
        Self
    }

    fn run(&self, tool: &str, args: &[&str]) -> Result<String> {
        tracing::debug!(tool, args = ?args, "running media tool");
        let output = Command::new(tool)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                PagesmithError::external(
                    tool,
                    format!("failed to spawn (is it installed and on PATH?): {e}"),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PagesmithError::external(
                tool,
                format!("exited with {}: {}", output.status, stderr.trim()),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn ffmpeg(&self, args: &[&str]) -> Result<()> {
        let mut full = vec!["-y", "-loglevel", "error"];
        full.extend_from_slice(args);
        self.run("ffmpeg", &full).map(|_| ())
    }
}

impl MediaTools for Ffmpeg {
    fn render_silence(&self, output: &Path, seconds: f64) -> Result<()> {
        ensure_parent_dir(output)?;
        let seconds = format!("{:.3}", seconds);
        self.ffmpeg(&[
            "-f",
            "lavfi",
            "-i",
            "anullsrc",
            "-t",
            &seconds,
            "-c:a",
            "libmp3lame",
            &output.to_string_lossy(),
        ])
    }

    fn probe_duration(&self, path: &Path) -> Result<f64> {
        let stdout = self.run(
            "ffprobe",
            &[
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
                &path.to_string_lossy(),
            ],
        )?;
        stdout.trim().parse::<f64>().map_err(|_| {
            PagesmithError::external(
                "ffprobe",
                format!("unexpected duration '{}' for '{}'", stdout.trim(), path.display()),
            )
        })
    }

    fn encode_frames(&self, frames_dir: &Path, fps: u32, output: &Path) -> Result<()> {
        ensure_parent_dir(output)?;
        let fps = fps.to_string();
        let pattern = frames_dir.join(FRAME_PATTERN);
        self.ffmpeg(&[
            "-framerate",
            &fps,
            "-i",
            &pattern.to_string_lossy(),
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            &output.to_string_lossy(),
        ])
    }

    fn merge_audio(&self, video: &Path, concat_list: &Path, output: &Path) -> Result<()> {
        ensure_parent_dir(output)?;
        self.ffmpeg(&[
            "-i",
            &video.to_string_lossy(),
            "-f",
            "concat",
            "-safe",
            "0",
            "-i",
            &concat_list.to_string_lossy(),
            "-c:v",
            "copy",
            "-c:a",
            "aac",
            "-shortest",
            &output.to_string_lossy(),
        ])
    }
}
