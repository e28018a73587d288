use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::errors::PipelineError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("Unprocessable Entity: {0}")]
    Unprocessable(String),
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::Pipeline(PipelineError::Upload(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to upload video".to_string(),
            ),
            ApiError::Pipeline(PipelineError::Synthesis(inner)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to generate speech: {}", inner),
            ),
            ApiError::Pipeline(PipelineError::Composition(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to combine audio and video".to_string(),
            ),
            ApiError::Pipeline(PipelineError::InvalidInput(msg)) | ApiError::Unprocessable(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, msg.clone())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            log::error!("{} -> {}", self, status);
        } else {
            log::warn!("{} -> {}", self, status);
        }
        (status, Json(json!({ "detail": message }))).into_response()
    }
}
