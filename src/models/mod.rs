// Domain models module
// Assets produced by the pipeline and the transient requests that drive it

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::TtsVoice;

/// Which pipeline stage produced an asset
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AssetRole {
    Original,
    Cropped,
    Synthesized,
    Combined,
}

/// A file written by one stage and handed to the next by path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAsset {
    pub path: PathBuf,
    pub role: AssetRole,
    pub created_at: DateTime<Local>,
}

impl MediaAsset {
    pub fn new(path: PathBuf, role: AssetRole, created_at: DateTime<Local>) -> Self {
        Self { path, role, created_at }
    }

    /// Path as returned to HTTP callers
    pub fn display_path(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// Width and height of the first video stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoDimensions {
    pub width: u32,
    pub height: u32,
}

impl VideoDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice: TtsVoice,
}

#[derive(Debug, Clone)]
pub struct CompositionRequest {
    pub video_path: PathBuf,
    pub audio_path: PathBuf,
    /// Seconds. Accepted but not applied when trimming.
    pub start_time: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoUploadResponse {
    pub video_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechResponse {
    pub audio_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombineResponse {
    pub combined_video_path: String,
}
