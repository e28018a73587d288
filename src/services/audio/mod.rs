//! # Audio duration
//!
//! Decodes an audio container with Symphonia to find out how long it plays.
//! The composition stage uses this to bound the output file.

use log::{debug, warn};
use std::fs::File;
use std::path::{Path, PathBuf};
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::errors::{AppError, AppResult};

/// Duration of `path` in seconds, decoded on the blocking pool.
pub async fn audio_duration(path: &Path) -> AppResult<f64> {
    let path: PathBuf = path.to_path_buf();
    tokio::task::spawn_blocking(move || decode_duration(&path))
        .await
        .map_err(|e| AppError::Decode(format!("Decoder task failed: {}", e)))?
}

/// Prefers the frame count in the container header and falls back to
/// decoding every packet when the header does not carry it (e.g. VBR MP3).
pub fn decode_duration(path: &Path) -> AppResult<f64> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| AppError::Decode(format!("Unsupported audio container {}: {}", path.display(), e)))?;

    let mut format = probed.format;
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AppError::Decode(format!("No audio track in {}", path.display())))?;

    let track_id = track.id;
    let params = track.codec_params.clone();
    let sample_rate = params
        .sample_rate
        .ok_or_else(|| AppError::Decode(format!("Unknown sample rate in {}", path.display())))?;

    if let Some(n_frames) = params.n_frames {
        if n_frames > 0 {
            let duration = n_frames as f64 / sample_rate as f64;
            debug!("{}: {} frames @ {} Hz from header", path.display(), n_frames, sample_rate);
            return Ok(duration);
        }
    }

    let mut decoder = symphonia::default::get_codecs()
        .make(&params, &DecoderOptions::default())
        .map_err(|e| AppError::Decode(format!("Failed to create decoder: {}", e)))?;

    let mut frames: u64 = 0;
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(AppError::Decode(format!("Failed to read packet: {}", e))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => frames += decoded.frames() as u64,
            Err(SymphoniaError::DecodeError(e)) => {
                warn!("Skipping undecodable packet in {}: {}", path.display(), e);
            }
            Err(e) => return Err(AppError::Decode(format!("Failed to decode packet: {}", e))),
        }
    }

    if frames == 0 {
        return Err(AppError::Decode(format!("No audio frames decoded from {}", path.display())));
    }

    debug!("{}: decoded {} frames @ {} Hz", path.display(), frames, sample_rate);
    Ok(frames as f64 / sample_rate as f64)
}
