use axum::{
    Form, Json,
    extract::{
        Multipart, State,
        multipart::MultipartError,
        rejection::FormRejection,
    },
};
use log::info;
use serde::Deserialize;
use std::path::PathBuf;

use super::AppState;
use super::error::ApiError;
use crate::config::TtsVoice;
use crate::errors::{AppError, PipelineError};
use crate::models::{
    CombineResponse, CompositionRequest, SpeechResponse, SynthesisRequest, VideoUploadResponse,
};

const VIDEO_FIELD: &str = "video";

/// `POST /upload-video/` with a multipart `video` file field
pub async fn upload_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<VideoUploadResponse>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(unreadable_upload)? {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let data = field.bytes().await.map_err(unreadable_upload)?;
        info!(
            "Received upload {:?} ({} bytes)",
            file_name.as_deref().unwrap_or("<unnamed>"),
            data.len()
        );

        let asset = state.pipeline.ingest_video(file_name.as_deref(), &data).await?;
        return Ok(Json(VideoUploadResponse {
            video_path: asset.display_path(),
        }));
    }

    Err(ApiError::Unprocessable(format!("missing form field '{}'", VIDEO_FIELD)))
}

/// Unreadable multipart bodies, including ones over the size limit, fail the upload stage
fn unreadable_upload(err: MultipartError) -> ApiError {
    ApiError::Pipeline(PipelineError::Upload(AppError::InvalidInput(format!(
        "failed to read upload ({}): {}",
        err.status(),
        err.body_text()
    ))))
}

#[derive(Debug, Deserialize)]
pub struct SpeechForm {
    pub text: String,
    #[serde(default)]
    pub voice: Option<String>,
}

/// `POST /text-to-speech/` with form fields `text` and `voice`
pub async fn text_to_speech(
    State(state): State<AppState>,
    form: Result<Form<SpeechForm>, FormRejection>,
) -> Result<Json<SpeechResponse>, ApiError> {
    let Form(form) = form.map_err(|e| ApiError::Unprocessable(e.body_text()))?;

    let voice = match form.voice.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => TtsVoice::from(name),
        _ => TtsVoice::default(),
    };

    let asset = state
        .pipeline
        .synthesize(&SynthesisRequest {
            text: form.text,
            voice,
        })
        .await?;

    Ok(Json(SpeechResponse {
        audio_path: asset.display_path(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct CombineForm {
    pub video_path: String,
    pub audio_path: String,
    #[serde(default)]
    pub start_time: Option<String>,
}

/// `POST /combine/` with form fields `video_path`, `audio_path`, `start_time`
pub async fn combine(
    State(state): State<AppState>,
    form: Result<Form<CombineForm>, FormRejection>,
) -> Result<Json<CombineResponse>, ApiError> {
    let Form(form) = form.map_err(|e| ApiError::Unprocessable(e.body_text()))?;
    let start_time = parse_start_time(form.start_time.as_deref())?;

    let asset = state
        .pipeline
        .compose(&CompositionRequest {
            video_path: PathBuf::from(form.video_path),
            audio_path: PathBuf::from(form.audio_path),
            start_time,
        })
        .await?;

    Ok(Json(CombineResponse {
        combined_video_path: asset.display_path(),
    }))
}

fn parse_start_time(raw: Option<&str>) -> Result<f64, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(0.0),
        Some(value) => value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ApiError::Unprocessable(format!("start_time must be a number, got {:?}", value))),
    }
}
