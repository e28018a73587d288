// TTS services module
// The speech provider seam and its OpenAI implementation

use async_trait::async_trait;
use bytes::Bytes;

use crate::config::{TtsModel, TtsVoice};
use crate::errors::AppResult;

pub mod openai;

pub use openai::OpenAiClient;

/// Single synthesis call: one text, one voice, one model tier
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    pub text: String,
    pub voice: TtsVoice,
    pub model: TtsModel,
}

/// Anything that turns text into encoded (MP3) audio bytes.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    async fn synthesize(&self, request: &SpeechRequest) -> AppResult<Bytes>;
}
