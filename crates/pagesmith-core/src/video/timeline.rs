//! Narration timeline bookkeeping

use std::path::{Path, PathBuf};

use serde::Serialize;

/// One narrated step with its audio clip
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub title: String,
    pub text: String,
    pub audio_path: PathBuf,
    /// Clip length in milliseconds, rounded up
    #[serde(rename = "duration")]
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    pub entries: Vec<TimelineEntry>,
    pub fps: u32,
    pub tail_ms: u64,
}

impl Timeline {
    pub fn new(fps: u32, tail_ms: u64) -> Self {
        Self {
            entries: Vec::new(),
            fps,
            tail_ms,
        }
    }

    pub fn push(&mut self, entry: TimelineEntry) {
        self.entries.push(entry);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Narration plus the trailing buffer, in milliseconds
    pub fn total_ms(&self) -> u64 {
        self.entries.iter().map(|e| e.duration_ms).sum::<u64>() + self.tail_ms
    }

    pub fn frame_count(&self) -> u64 {
        (self.total_ms() * u64::from(self.fps)).div_ceil(1000)
    }

    /// ffmpeg concat demuxer list of the audio clips, in order
    pub fn concat_list(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("file '{}'", concat_escape(&e.audio_path)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The entries as a JSON array
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.entries).unwrap_or_else(|_| "[]".to_string())
    }
}

/// Quote a path for a single-quoted concat entry
fn concat_escape(path: &Path) -> String {
    path.to_string_lossy().replace('\'', "'\\''")
}
