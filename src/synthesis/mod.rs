//! Speech synthesis: the provider trait and the OpenAI TTS client.

pub mod http;
pub mod openai;

pub use openai::OpenAiTtsProvider;

use async_trait::async_trait;

use crate::error::SlidevoxError;

/// Trait for text-to-speech providers.
///
/// One outbound call per invocation; no caching here. Skip-if-exists caching
/// belongs to the materializer, at the file level.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Synthesize narration audio for one script.
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, SlidevoxError>;
}
