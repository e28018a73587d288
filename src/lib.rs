//! Narrate a vertical video: upload it, synthesize speech, mux the two.

pub mod config;
pub mod errors;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

pub use config::AppConfig;
pub use errors::{AppError, AppResult, PipelineError};
pub use services::pipeline::MediaPipeline;
