//! In-process stand-ins for ffmpeg and the speech API, used by tests.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::errors::{AppError, AppResult};
use crate::models::VideoDimensions;
use crate::services::tts::{SpeechProvider, SpeechRequest};
use crate::services::video::{MediaTool, TranscodeJob};

/// Reports fixed dimensions for uploads and records every transcode.
///
/// A successful transcode writes a placeholder output file and remembers the
/// crop window so probing the output reports the cropped size.
pub struct RecordingTool {
    upload_dims: VideoDimensions,
    outputs: Mutex<HashMap<PathBuf, VideoDimensions>>,
    pub jobs: Mutex<Vec<TranscodeJob>>,
    pub probes: Mutex<Vec<PathBuf>>,
    fail_transcode: Option<String>,
    skip_output: bool,
}

impl RecordingTool {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            upload_dims: VideoDimensions::new(width, height),
            outputs: Mutex::new(HashMap::new()),
            jobs: Mutex::new(Vec::new()),
            probes: Mutex::new(Vec::new()),
            fail_transcode: None,
            skip_output: false,
        }
    }

    pub fn failing(width: u32, height: u32, stderr: &str) -> Self {
        Self {
            fail_transcode: Some(stderr.to_string()),
            ..Self::new(width, height)
        }
    }

    /// Exits successfully without producing the output file
    pub fn silent(width: u32, height: u32) -> Self {
        Self {
            skip_output: true,
            ..Self::new(width, height)
        }
    }

    pub fn jobs(&self) -> Vec<TranscodeJob> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaTool for RecordingTool {
    async fn probe(&self, path: &Path) -> AppResult<VideoDimensions> {
        self.probes.lock().unwrap().push(path.to_path_buf());
        if !path.exists() {
            return Err(AppError::MediaTool(format!("{}: No such file or directory", path.display())));
        }
        let outputs = self.outputs.lock().unwrap();
        Ok(outputs.get(path).copied().unwrap_or(self.upload_dims))
    }

    async fn transcode(&self, job: &TranscodeJob) -> AppResult<()> {
        self.jobs.lock().unwrap().push(job.clone());
        if let Some(stderr) = &self.fail_transcode {
            return Err(AppError::MediaTool(stderr.clone()));
        }
        if self.skip_output {
            return Ok(());
        }

        if let Some(crop) = job.video_filter.as_deref().and_then(parse_crop) {
            self.outputs.lock().unwrap().insert(job.output.clone(), crop);
        }
        tokio::fs::write(&job.output, b"transcoded").await?;
        Ok(())
    }
}

fn parse_crop(filter: &str) -> Option<VideoDimensions> {
    let (w, h) = filter.strip_prefix("crop=")?.split_once(':')?;
    Some(VideoDimensions::new(w.parse().ok()?, h.parse().ok()?))
}

/// Returns the same bytes for every request, or a fixed provider error.
pub struct CannedSpeech {
    audio: Bytes,
    error: Option<String>,
    pub requests: Mutex<Vec<SpeechRequest>>,
}

impl CannedSpeech {
    pub fn new(audio: &'static [u8]) -> Self {
        Self {
            audio: Bytes::from_static(audio),
            error: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            audio: Bytes::new(),
            error: Some(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SpeechProvider for CannedSpeech {
    async fn synthesize(&self, request: &SpeechRequest) -> AppResult<Bytes> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.error {
            Some(message) => Err(AppError::Provider(message.clone())),
            None => Ok(self.audio.clone()),
        }
    }
}

/// Writes `seconds` of 16-bit mono silence as WAV
pub fn write_wav(path: &Path, seconds: f64) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for _ in 0..(seconds * 16000.0) as usize {
        writer.write_sample(0i16).unwrap();
    }
    writer.finalize().unwrap();
}
