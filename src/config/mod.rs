// Configuration module
// Everything the service needs is read once at startup and passed in explicitly

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::errors::{AppError, AppResult};

pub mod tts;

pub use tts::{TtsModel, TtsVoice};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MAX_UPLOAD_MB: usize = 512;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub tts_model: TtsModel,
    pub media_dir: PathBuf,
    pub static_dir: PathBuf,
    pub bind_addr: String,
    pub ffmpeg_path: Option<PathBuf>,
    pub ffprobe_path: Option<PathBuf>,
    /// Append a random id to generated file names so same-second requests never collide
    pub unique_file_names: bool,
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            tts_model: TtsModel::default(),
            media_dir: PathBuf::from("media"),
            static_dir: PathBuf::from("static"),
            bind_addr: "0.0.0.0:8000".to_string(),
            ffmpeg_path: None,
            ffprobe_path: None,
            unique_file_names: false,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    /// `main` loads `.env` into it before the logger starts.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let openai_api_key = get("OPENAI_API_KEY").ok_or_else(|| {
            AppError::Configuration("OPENAI_API_KEY is not set".to_string())
        })?;

        let tts_model = match get("VOICEOVER_TTS_MODEL") {
            Some(value) => TtsModel::parse(&value).ok_or_else(|| {
                AppError::Configuration(format!("Unknown TTS model: {}", value))
            })?,
            None => defaults.tts_model,
        };

        let unique_file_names = match get("VOICEOVER_UNIQUE_NAMES") {
            Some(value) => parse_bool(&value).ok_or_else(|| {
                AppError::Configuration(format!("VOICEOVER_UNIQUE_NAMES must be a boolean, got {}", value))
            })?,
            None => defaults.unique_file_names,
        };

        let max_upload_bytes = match get("VOICEOVER_MAX_UPLOAD_MB") {
            Some(value) => {
                let mb = value.parse::<usize>().map_err(|_| {
                    AppError::Configuration(format!("VOICEOVER_MAX_UPLOAD_MB must be a number, got {}", value))
                })?;
                mb.checked_mul(1024 * 1024).ok_or_else(|| {
                    AppError::Configuration(format!("VOICEOVER_MAX_UPLOAD_MB is too large: {}", value))
                })?
            }
            None => defaults.max_upload_bytes,
        };

        Ok(Self {
            openai_api_key,
            openai_base_url: get("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.openai_base_url),
            tts_model,
            media_dir: get("VOICEOVER_MEDIA_DIR").map(PathBuf::from).unwrap_or(defaults.media_dir),
            static_dir: get("VOICEOVER_STATIC_DIR").map(PathBuf::from).unwrap_or(defaults.static_dir),
            bind_addr: get("VOICEOVER_BIND").unwrap_or(defaults.bind_addr),
            ffmpeg_path: get("FFMPEG_PATH").map(PathBuf::from),
            ffprobe_path: get("FFPROBE_PATH").map(PathBuf::from),
            unique_file_names,
            max_upload_bytes,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
