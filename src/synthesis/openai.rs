//! OpenAI TTS provider (`/audio/speech`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use super::http::{bearer_headers, shared_client, status_to_error, trim_trailing_slash};
use super::SpeechProvider;
use crate::error::SlidevoxError;
use crate::util::retry::RetryPolicy;
use crate::util::timeout::with_timeout;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default synthesis model.
pub const DEFAULT_TTS_MODEL: &str = "tts-1";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Speech synthesis against the OpenAI `/audio/speech` endpoint.
///
/// Returns raw MP3 bytes on success. Non-success responses are surfaced with
/// the provider's status and body verbatim, never substituted with empty
/// audio.
#[derive(Debug, Clone)]
pub struct OpenAiTtsProvider {
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
    retry_policy: RetryPolicy,
}

impl OpenAiTtsProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_TTS_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry_policy: RetryPolicy::default(),
        }
    }

    pub fn new_with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::new(api_key)
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Model identifier, as recorded in the audio manifest.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn validate_request(&self, text: &str, voice: &str) -> Result<(), SlidevoxError> {
        if self.api_key.trim().is_empty() {
            return Err(SlidevoxError::Configuration(
                "Missing OpenAI API key for speech synthesis".to_string(),
            ));
        }
        if text.trim().is_empty() {
            return Err(SlidevoxError::InvalidArgument(
                "Narration text cannot be empty".to_string(),
            ));
        }
        if voice.trim().is_empty() {
            return Err(SlidevoxError::InvalidArgument(
                "Voice id cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    async fn synthesize_once(&self, text: &str, voice: &str) -> Result<Vec<u8>, SlidevoxError> {
        let payload = serde_json::json!({
            "model": self.model,
            "input": text,
            "voice": voice,
        });

        let url = format!("{}/audio/speech", trim_trailing_slash(&self.base_url));
        let headers = bearer_headers(&self.api_key);

        with_timeout(self.timeout, async {
            let response = shared_client()
                .post(url)
                .headers(headers)
                .json(&payload)
                .send()
                .await?;

            parse_speech_response(response).await
        })
        .await
    }
}

#[async_trait]
impl SpeechProvider for OpenAiTtsProvider {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, SlidevoxError> {
        self.validate_request(text, voice)?;
        self.retry_policy
            .execute(|| self.synthesize_once(text, voice))
            .await
    }
}

async fn parse_speech_response(response: reqwest::Response) -> Result<Vec<u8>, SlidevoxError> {
    let status = response.status().as_u16();
    if status != 200 {
        let body = response.text().await.unwrap_or_default();
        return Err(status_to_error(status, &body));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    // A 200 carrying JSON is a provider error dressed as success.
    if content_type.starts_with("application/json") {
        let body = response.text().await.unwrap_or_default();
        if let Some(message) = extract_openai_error_message(&body) {
            return Err(SlidevoxError::Provider {
                provider: "openai".to_string(),
                message,
            });
        }
        return Err(SlidevoxError::InvalidState(
            "Expected audio payload, got JSON response".to_string(),
        ));
    }

    let bytes = response.bytes().await?;
    if bytes.is_empty() {
        return Err(SlidevoxError::InvalidState(
            "Speech response contained empty audio payload".to_string(),
        ));
    }

    tracing::debug!(bytes = bytes.len(), content_type = %content_type, "speech payload received");
    Ok(bytes.to_vec())
}

fn extract_openai_error_message(body: &str) -> Option<String> {
    let parsed: serde_json::Value = serde_json::from_str(body).ok()?;
    parsed
        .get("error")
        .and_then(|error| error.get("message"))
        .and_then(|message| message.as_str())
        .map(ToString::to_string)
}
