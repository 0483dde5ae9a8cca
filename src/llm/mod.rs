pub mod groq;
pub mod models;

use groq::GroqProvider;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::GroqConfig;
use models::{ChatOptions, ChatResponse, Message};

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Network Error: {0}")]
    Network(String),
    #[error("API Error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Upstream timed out after {0:?}")]
    Timeout(Duration),
    #[error("Completion contained no content")]
    EmptyCompletion,
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn chat(&self, messages: &[Message], options: ChatOptions) -> Result<ChatResponse, LlmError>;
}

pub struct ProviderFactory;

impl ProviderFactory {
    /// Returns `None` when no API key is configured.
    pub fn create(config: &GroqConfig) -> Result<Option<Arc<dyn LlmProvider>>, LlmError> {
        if config.api_key.trim().is_empty() {
            return Ok(None);
        }

        let provider = GroqProvider::new(
            config.api_key.clone(),
            config.api_base.clone(),
            config.model.clone(),
            Duration::from_millis(config.timeout_ms),
        )?;
        Ok(Some(Arc::new(provider)))
    }
}
