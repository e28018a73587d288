// HTTP surface: the page, the three pipeline endpoints and static mounts

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::services::pipeline::MediaPipeline;

pub mod error;
pub mod index;
pub mod media;

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<MediaPipeline>,
}

pub fn router(state: AppState, static_dir: &Path, max_upload_bytes: usize) -> Router {
    let media_dir = state.pipeline.store().root().to_path_buf();

    Router::new()
        .route("/", get(index::index))
        .route("/upload-video/", post(media::upload_video))
        .route("/upload-video", post(media::upload_video))
        .route("/text-to-speech/", post(media::text_to_speech))
        .route("/text-to-speech", post(media::text_to_speech))
        .route("/combine/", post(media::combine))
        .route("/combine", post(media::combine))
        .nest_service("/static", ServeDir::new(static_dir))
        .nest_service("/media", ServeDir::new(media_dir))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
