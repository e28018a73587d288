//! File naming and placement for every asset the pipeline writes.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

use crate::config::TtsVoice;
use crate::errors::AppResult;

/// `%Y%m%d_%H%M%S`: second granularity
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Number of leading words of the input text kept in speech file names
pub const SPEECH_NAME_WORDS: usize = 5;

/// How generated names are disambiguated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileNaming {
    /// Timestamp only. Two requests in the same second get the same name and
    /// the later write wins.
    Timestamp,
    /// Timestamp plus a random v4 uuid
    Unique,
}

pub type Clock = fn() -> DateTime<Local>;

#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    naming: FileNaming,
    clock: Clock,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>, naming: FileNaming) -> Self {
        Self::with_clock(root, naming, Local::now)
    }

    pub fn with_clock(root: impl Into<PathBuf>, naming: FileNaming, clock: Clock) -> Self {
        Self {
            root: root.into(),
            naming,
            clock,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn now(&self) -> DateTime<Local> {
        (self.clock)()
    }

    /// Creates the media directory. Safe to call concurrently.
    pub async fn ensure_root(&self) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    fn token(&self, at: DateTime<Local>) -> String {
        let stamp = at.format(TIMESTAMP_FORMAT).to_string();
        match self.naming {
            FileNaming::Timestamp => stamp,
            FileNaming::Unique => format!("{}_{}", stamp, uuid::Uuid::new_v4().simple()),
        }
    }

    /// `video_<token>.<ext>`; the extension comes from the client's file name
    pub fn upload_path(&self, original_name: Option<&str>, at: DateTime<Local>) -> PathBuf {
        let ext = original_name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or_else(|| "mp4".to_string());
        self.root.join(format!("video_{}.{}", self.token(at), ext))
    }

    /// `<stem>_cropped.mp4` next to the source
    pub fn cropped_path(&self, source: &Path) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video".to_string());
        source.with_file_name(format!("{}_cropped.mp4", stem))
    }

    /// `<first five words>_<voice>_<token>.mp3`
    pub fn speech_path(&self, text: &str, voice: &TtsVoice, at: DateTime<Local>) -> PathBuf {
        self.root.join(format!(
            "{}_{}_{}.mp3",
            first_words(text, SPEECH_NAME_WORDS),
            sanitize_component(voice.as_str()),
            self.token(at)
        ))
    }

    pub fn combined_path(&self, at: DateTime<Local>) -> PathBuf {
        self.root.join(format!("combined_{}.mp4", self.token(at)))
    }
}

/// First `count` whitespace-separated words joined by `_`
pub fn first_words(text: &str, count: usize) -> String {
    text.split_whitespace()
        .take(count)
        .map(sanitize_component)
        .collect::<Vec<_>>()
        .join("_")
}

// Заменяем только то, что ломает путь; регистр и прочие символы сохраняем
fn sanitize_component(word: &str) -> String {
    word.chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect::<String>()
        .replace("..", "_")
}
