//! Aspect-ratio checks and crop geometry for vertical (9:16) output.

use crate::errors::{AppError, AppResult};
use crate::models::VideoDimensions;

pub const TARGET_ASPECT: f64 = 9.0 / 16.0;
pub const ASPECT_TOLERANCE: f64 = 0.01;

/// True when `width / height` is within the tolerance of 9:16 (strict).
pub fn is_target_aspect(dims: VideoDimensions) -> bool {
    if dims.height == 0 {
        return false;
    }
    (dims.aspect_ratio() - TARGET_ASPECT).abs() < ASPECT_TOLERANCE
}

/// Region kept by the center crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropGeometry {
    pub width: u32,
    pub height: u32,
}

impl CropGeometry {
    /// ffmpeg `crop` filter; ffmpeg centers the window when x/y are omitted
    pub fn filter(&self) -> String {
        format!("crop={}:{}", self.width, self.height)
    }

    pub fn dimensions(&self) -> VideoDimensions {
        VideoDimensions::new(self.width, self.height)
    }
}

/// Largest 9:16 window that fits the frame.
///
/// Height is kept whenever the frame is wide enough; sources narrower than
/// 9:16 keep their width and lose height instead. Both sides are forced even
/// so the result can be encoded with libx264. On small frames the even
/// rounding can push the ratio out of tolerance, so the height steps down
/// two pixels at a time until an even width fits.
pub fn crop_geometry(dims: VideoDimensions) -> AppResult<CropGeometry> {
    let height_for_width = even((dims.width as f64 / TARGET_ASPECT).floor() as u32);
    let start = even(dims.height).min(height_for_width);

    for height in (1..=start / 2).rev().map(|half| half * 2) {
        if let Some(width) = even_width_for(height, dims.width) {
            return Ok(CropGeometry { width, height });
        }
    }

    Err(AppError::InvalidInput(format!(
        "{}x{} is too small for a 9:16 crop",
        dims.width, dims.height
    )))
}

/// Even width closest to 9:16 for `height`, no wider than `max_width`
fn even_width_for(height: u32, max_width: u32) -> Option<u32> {
    let ideal = height as f64 * TARGET_ASPECT;
    let base = even(ideal.round() as u32);

    [base.saturating_sub(2), base, base + 2]
        .into_iter()
        .filter(|&w| w > 0 && w <= max_width)
        .filter(|&w| is_target_aspect(VideoDimensions::new(w, height)))
        .min_by(|a, b| {
            let da = (*a as f64 - ideal).abs();
            let db = (*b as f64 - ideal).abs();
            da.total_cmp(&db)
        })
}

fn even(value: u32) -> u32 {
    value & !1
}
