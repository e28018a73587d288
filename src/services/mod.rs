// Services module
// Business logic separated by domain area

pub mod audio;     // Audio duration decoding
pub mod pipeline;  // Upload / synthesis / composition stages
pub mod storage;   // Asset naming and placement
pub mod tts;       // Text-to-Speech provider
pub mod video;     // Aspect ratio and the ffmpeg seam

#[cfg(test)]
pub(crate) mod mock;
