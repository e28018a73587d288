// Error handling module
// Low-level failures plus the per-stage error kinds returned by the pipeline

use thiserror::Error;

/// Failures raised by the building blocks: config, media tool, provider, decoding.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Media tool error: {0}")]
    MediaTool(String),

    #[error("Speech provider error: {0}")]
    Provider(String),

    #[error("Audio decode error: {0}")]
    Decode(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

/// Error kind per pipeline stage. The HTTP layer turns these into responses.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("upload failed: {0}")]
    Upload(#[source] AppError),

    #[error("speech synthesis failed: {0}")]
    Synthesis(#[source] AppError),

    #[error("composition failed: {0}")]
    Composition(#[source] AppError),

    #[error("{0}")]
    InvalidInput(String),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
