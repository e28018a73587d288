//! Upload → (crop) → synthesize → combine.
//!
//! Each stage is independent: it reads the paths it is given, writes one new
//! asset and returns it. Linking stages together is left to the client.

use log::{debug, error, info};
use std::path::Path;
use std::sync::Arc;

use crate::config::{AppConfig, TtsModel};
use crate::errors::{AppError, AppResult, PipelineError, PipelineResult};
use crate::models::{AssetRole, CompositionRequest, MediaAsset, SynthesisRequest};
use crate::services::audio::audio_duration;
use crate::services::storage::{FileNaming, MediaStore};
use crate::services::tts::{SpeechProvider, SpeechRequest};
use crate::services::video::{self, MediaTool};
use crate::utils::common::check_file_exists_and_valid;

pub struct MediaPipeline {
    tool: Arc<dyn MediaTool>,
    speech: Arc<dyn SpeechProvider>,
    store: MediaStore,
    tts_model: TtsModel,
}

impl MediaPipeline {
    pub fn new(
        tool: Arc<dyn MediaTool>,
        speech: Arc<dyn SpeechProvider>,
        store: MediaStore,
        tts_model: TtsModel,
    ) -> Self {
        Self {
            tool,
            speech,
            store,
            tts_model,
        }
    }

    /// Wires the ffmpeg tool and the OpenAI client from configuration
    pub fn from_config(config: &AppConfig, tool: Arc<dyn MediaTool>) -> Self {
        let speech = Arc::new(crate::services::tts::OpenAiClient::new(
            config.openai_api_key.clone(),
            config.openai_base_url.clone(),
        ));
        let naming = if config.unique_file_names {
            FileNaming::Unique
        } else {
            FileNaming::Timestamp
        };
        Self::new(tool, speech, MediaStore::new(&config.media_dir, naming), config.tts_model)
    }

    pub fn store(&self) -> &MediaStore {
        &self.store
    }

    /// Persists an uploaded video and normalizes it to 9:16 when needed.
    pub async fn ingest_video(&self, file_name: Option<&str>, data: &[u8]) -> PipelineResult<MediaAsset> {
        self.ingest_inner(file_name, data).await.map_err(|e| {
            error!("Video upload failed: {}", e);
            PipelineError::Upload(e)
        })
    }

    async fn ingest_inner(&self, file_name: Option<&str>, data: &[u8]) -> AppResult<MediaAsset> {
        if data.is_empty() {
            return Err(AppError::InvalidInput("uploaded video is empty".to_string()));
        }

        self.store.ensure_root().await?;
        let created_at = self.store.now();
        let path = self.store.upload_path(file_name, created_at);
        tokio::fs::write(&path, data).await?;
        info!("Stored upload ({} bytes) at {}", data.len(), path.display());

        let original = MediaAsset::new(path, AssetRole::Original, created_at);
        self.normalize_aspect(original).await
    }

    /// Returns `asset` untouched when it is already 9:16, otherwise a cropped copy.
    pub async fn normalize_aspect(&self, asset: MediaAsset) -> AppResult<MediaAsset> {
        let dims = self.tool.probe(&asset.path).await?;
        if video::is_target_aspect(dims) {
            info!(
                "{} is already 9:16 ({}x{}), no crop needed",
                asset.path.display(),
                dims.width,
                dims.height
            );
            return Ok(asset);
        }

        let output = self.store.cropped_path(&asset.path);
        video::crop_to_vertical(self.tool.as_ref(), &asset.path, dims, &output).await?;
        ensure_written(&output).await?;

        Ok(MediaAsset::new(output, AssetRole::Cropped, self.store.now()))
    }

    /// Calls the speech provider and stores the returned audio.
    pub async fn synthesize(&self, request: &SynthesisRequest) -> PipelineResult<MediaAsset> {
        if request.text.trim().is_empty() {
            return Err(PipelineError::InvalidInput("text must not be empty".to_string()));
        }

        self.synthesize_inner(request).await.map_err(|e| {
            error!("Speech synthesis failed: {}", e);
            PipelineError::Synthesis(e)
        })
    }

    async fn synthesize_inner(&self, request: &SynthesisRequest) -> AppResult<MediaAsset> {
        let audio = self
            .speech
            .synthesize(&SpeechRequest {
                text: request.text.clone(),
                voice: request.voice.clone(),
                model: self.tts_model,
            })
            .await?;

        self.store.ensure_root().await?;
        let created_at = self.store.now();
        let path = self.store.speech_path(&request.text, &request.voice, created_at);
        tokio::fs::write(&path, &audio).await?;
        info!("Saved {} bytes of speech to {}", audio.len(), path.display());

        Ok(MediaAsset::new(path, AssetRole::Synthesized, created_at))
    }

    /// Muxes the audio onto the video; the output lasts exactly as long as the audio.
    pub async fn compose(&self, request: &CompositionRequest) -> PipelineResult<MediaAsset> {
        self.compose_inner(request).await.map_err(|e| {
            error!("Combining audio and video failed: {}", e);
            PipelineError::Composition(e)
        })
    }

    async fn compose_inner(&self, request: &CompositionRequest) -> AppResult<MediaAsset> {
        if request.start_time != 0.0 {
            // TODO: apply start_time once the front-end defines whether it offsets the audio or the video
            debug!("start_time={} accepted but not applied", request.start_time);
        }

        let duration = audio_duration(&request.audio_path).await?;
        info!("Audio {} lasts {:.3}s", request.audio_path.display(), duration);

        self.store.ensure_root().await?;
        let created_at = self.store.now();
        let output = self.store.combined_path(created_at);
        let job = video::combine_job(&request.video_path, &request.audio_path, duration, &output);
        self.tool.transcode(&job).await?;
        ensure_written(&output).await?;

        Ok(MediaAsset::new(output, AssetRole::Combined, created_at))
    }
}

async fn ensure_written(path: &Path) -> AppResult<()> {
    if check_file_exists_and_valid(path).await {
        Ok(())
    } else {
        Err(AppError::MediaTool(format!(
            "media tool reported success but {} is missing or empty",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests;
