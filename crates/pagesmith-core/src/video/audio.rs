//! Narration audio: synthesis and the on-disk cache
//!
//! Clips are cached by a SHA-256 key over the text, so re-running a build only
//! synthesizes lines that changed. Mock clips use their own key space and
//! never call the speech service.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use sha2::{Digest, Sha256};

use crate::config::consts::video::{MOCK_CHARS_PER_SECOND, MOCK_MIN_SECONDS, MOCK_PREFIX};
use crate::config::VideoConfig;
use crate::error::{PagesmithError, Result};
use crate::video::media::MediaTools;

/// Environment variable holding the speech API key
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub path: PathBuf,
    pub duration_ms: u64,
}

/// Text-to-speech backend returning encoded mp3 bytes
pub trait SpeechSynthesizer {
    fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>>;
}

/// OpenAI-compatible speech endpoint over blocking HTTP
pub struct OpenAiSpeech {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl OpenAiSpeech {
    pub fn new(config: &VideoConfig, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            endpoint: config.speech_endpoint.clone(),
            model: config.speech_model.clone(),
            api_key: api_key.into(),
        }
    }

    /// Read the API key from the environment
    pub fn from_env(config: &VideoConfig) -> Result<Self> {
        match std::env::var(API_KEY_VAR) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(config, key)),
            _ => Err(PagesmithError::SpeechUnavailable(format!(
                "{} is not set; use mock audio or export the key",
                API_KEY_VAR
            ))),
        }
    }
}

impl SpeechSynthesizer for OpenAiSpeech {
    fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>> {
        let body = serde_json::json!({
            "model": self.model,
            "voice": voice,
            "input": text,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| PagesmithError::SpeechFailed(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(PagesmithError::SpeechFailed(format!(
                "{} {}",
                status,
                detail.trim()
            )));
        }

        let bytes = response
            .bytes()
            .map_err(|e| PagesmithError::SpeechFailed(format!("failed to read audio: {e}")))?;
        Ok(bytes.to_vec())
    }
}

/// Where clips come from
pub enum AudioSource<'a> {
    /// Silent placeholders sized to the text
    Mock,
    Speech(&'a dyn SpeechSynthesizer),
}

pub struct AudioCache<'a> {
    dir: PathBuf,
    voice: String,
    source: AudioSource<'a>,
    media: &'a dyn MediaTools,
}

impl<'a> AudioCache<'a> {
    pub fn new(
        dir: impl Into<PathBuf>,
        voice: impl Into<String>,
        source: AudioSource<'a>,
        media: &'a dyn MediaTools,
    ) -> Self {
        Self {
            dir: dir.into(),
            voice: voice.into(),
            source,
            media,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn is_mock(&self) -> bool {
        matches!(self.source, AudioSource::Mock)
    }

    /// Cache file for a line of narration
    pub fn clip_path(&self, text: &str) -> PathBuf {
        let key = cache_key(text, &self.voice, self.is_mock());
        if self.is_mock() {
            self.dir.join(format!("{}_{}.mp3", MOCK_PREFIX, key))
        } else {
            self.dir.join(format!("{}.mp3", key))
        }
    }

    /// Produce (or reuse) the clip for a line of narration
    pub fn clip(&self, text: &str) -> Result<AudioClip> {
        std::fs::create_dir_all(&self.dir).with_context(|| {
            format!("failed to create audio cache '{}'", self.dir.display())
        })?;

        let path = self.clip_path(text);
        let cached = path.is_file();

        match &self.source {
            AudioSource::Mock => {
                let seconds = mock_duration_secs(text);
                if cached {
                    tracing::debug!(text = %preview(text), "using cached mock audio");
                } else {
                    tracing::info!(seconds, text = %preview(text), "generating mock audio");
                    self.media.render_silence(&path, seconds)?;
                }
                Ok(AudioClip {
                    path,
                    duration_ms: seconds_to_ms(seconds),
                })
            }
            AudioSource::Speech(speech) => {
                if cached {
                    tracing::debug!(text = %preview(text), "using cached audio");
                } else {
                    tracing::info!(voice = %self.voice, text = %preview(text), "synthesizing audio");
                    let bytes = speech.synthesize(text, &self.voice)?;
                    std::fs::write(&path, bytes).with_context(|| {
                        format!("failed to write audio '{}'", path.display())
                    })?;
                }
                let seconds = self.media.probe_duration(&path)?;
                Ok(AudioClip {
                    path,
                    duration_ms: seconds_to_ms(seconds),
                })
            }
        }
    }
}

/// Hex SHA-256 over the text, salted by voice or by the mock prefix
pub fn cache_key(text: &str, voice: &str, mock: bool) -> String {
    let mut hasher = Sha256::new();
    if mock {
        hasher.update(MOCK_PREFIX.as_bytes());
        hasher.update(text.as_bytes());
    } else {
        hasher.update(text.as_bytes());
        hasher.update(voice.as_bytes());
    }
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

pub fn mock_duration_secs(text: &str) -> f64 {
    let chars = text.chars().count() as f64;
    (chars / MOCK_CHARS_PER_SECOND).max(MOCK_MIN_SECONDS)
}

pub fn seconds_to_ms(seconds: f64) -> u64 {
    (seconds * 1000.0).ceil().max(0.0) as u64
}

fn preview(text: &str) -> String {
    text.chars().take(20).collect()
}
