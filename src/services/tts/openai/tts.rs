use async_trait::async_trait;
use bytes::Bytes;
use log::{error, info};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::errors::{AppError, AppResult};
use crate::services::tts::{SpeechProvider, SpeechRequest};

/// Request body for `POST /audio/speech`
#[derive(Debug, Serialize)]
struct TtsRequestBody<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

/// Client for the OpenAI text-to-speech API
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn speech_url(&self) -> String {
        format!("{}/audio/speech", self.base_url)
    }
}

#[async_trait]
impl SpeechProvider for OpenAiClient {
    async fn synthesize(&self, request: &SpeechRequest) -> AppResult<Bytes> {
        info!(
            "Requesting speech: model={}, voice={}, {} chars",
            request.model.as_str(),
            request.voice,
            request.text.chars().count()
        );

        let body = TtsRequestBody {
            model: request.model.as_str(),
            input: &request.text,
            voice: request.voice.as_str(),
            response_format: "mp3",
        };

        let response = self
            .client
            .post(self.speech_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = provider_message(&error_text);
            error!("OpenAI TTS API error (status {}): {}", status, message);
            return Err(AppError::Provider(format!("{} ({})", message, status)));
        }

        let audio = response.bytes().await?;
        info!("Received {} bytes of audio from OpenAI TTS", audio.len());
        Ok(audio)
    }
}

/// Pulls `error.message` out of an OpenAI error body, falling back to the raw text
fn provider_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| json["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "Unknown API error".to_string()
            } else {
                trimmed.to_string()
            }
        })
}
