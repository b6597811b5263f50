mod extract;
mod gemini_client;
pub mod prompts;

use crate::configuration::GenerationSettings;
use async_trait::async_trait;
use futures::stream::BoxStream;
use secrecy::{ExposeSecret, Secret};
use std::sync::Arc;

pub use extract::{extract_json, ExtractionError, RAW_TEXT_KEY};
pub use gemini_client::GeminiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

pub type ChunkStream = BoxStream<'static, Result<String, GenerationError>>;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Text generation is not configured.")]
    NotConfigured,
    #[error("The generation API answered {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("Failed to reach the generation API.")]
    Transport(#[from] reqwest::Error),
    #[error("The generation API returned an unexpected payload: {0}")]
    MalformedResponse(String),
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Start a streaming completion. Chunks are yielded as the upstream
    /// produces them.
    async fn stream_chat(&self, messages: Vec<ChatMessage>) -> Result<ChunkStream, GenerationError>;
}

/// Stand-in used when no API key is configured.
pub struct DisabledGenerator;

#[async_trait]
impl TextGenerator for DisabledGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::NotConfigured)
    }

    async fn stream_chat(&self, _messages: Vec<ChatMessage>) -> Result<ChunkStream, GenerationError> {
        Err(GenerationError::NotConfigured)
    }
}

pub fn from_settings(settings: &GenerationSettings) -> Result<Arc<dyn TextGenerator>, anyhow::Error> {
    match &settings.api_key {
        Some(key) if !key.expose_secret().trim().is_empty() => {
            Ok(Arc::new(GeminiClient::new(
                settings,
                Secret::new(key.expose_secret().clone()),
            )?))
        }
        _ => {
            tracing::warn!("No generation API key configured, readings and chat will be skipped");
            Ok(Arc::new(DisabledGenerator))
        }
    }
}
