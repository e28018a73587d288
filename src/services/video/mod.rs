// Video services: aspect-ratio normalization and the ffmpeg seam

pub mod aspect;
pub mod tool;

use std::path::Path;

use crate::errors::AppResult;
use crate::models::VideoDimensions;
pub use aspect::{ASPECT_TOLERANCE, CropGeometry, TARGET_ASPECT, crop_geometry, is_target_aspect};
pub use tool::{FfmpegTool, MediaTool, TranscodeJob};

/// Center-crops `input` to 9:16. Only the video stream is re-encoded.
pub fn crop_job(input: &Path, dims: VideoDimensions, output: &Path) -> AppResult<TranscodeJob> {
    let crop = crop_geometry(dims)?;
    Ok(TranscodeJob::new(output)
        .input(input)
        .video_filter(crop.filter())
        .option("-c:v", "libx264")
        .option("-c:a", "copy"))
}

/// Copies the video stream, re-encodes the audio to AAC, and stops at `duration`.
pub fn combine_job(video: &Path, audio: &Path, duration: f64, output: &Path) -> TranscodeJob {
    TranscodeJob::new(output)
        .input(video)
        .input(audio)
        .option("-map", "0:v:0")
        .option("-map", "1:a:0")
        .option("-c:v", "copy")
        .option("-c:a", "aac")
        .duration(duration)
}

pub async fn crop_to_vertical(
    tool: &dyn MediaTool,
    input: &Path,
    dims: VideoDimensions,
    output: &Path,
) -> AppResult<()> {
    let job = crop_job(input, dims, output)?;
    log::info!(
        "Cropping {} ({}x{}) with {}",
        input.display(),
        dims.width,
        dims.height,
        job.video_filter.as_deref().unwrap_or_default()
    );
    tool.transcode(&job).await
}
