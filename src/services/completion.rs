use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm::{models::{ChatOptions, Message}, LlmError, LlmProvider};
use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] ValidationError),
    #[error("Completion service unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("Completion request failed with status {status}: {message}")]
    UpstreamError { status: u16, message: String },
    #[error("Completion contained no content")]
    EmptyCompletion,
}

/// Status reported when the upstream never answered with one of its own.
pub const NO_UPSTREAM_STATUS: u16 = 502;

impl From<LlmError> for CompletionError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Timeout(_) => Self::UpstreamUnavailable(err.to_string()),
            LlmError::Api { status, message } => Self::UpstreamError { status, message },
            LlmError::Network(message) => Self::UpstreamError {
                status: NO_UPSTREAM_STATUS,
                message,
            },
            LlmError::EmptyCompletion => Self::EmptyCompletion,
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    #[serde(default)]
    pub messages: Vec<Message>,
    pub response_format: Option<serde_json::Value>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
}

pub struct CompletionService {
    provider: Option<Arc<dyn LlmProvider>>,
    default_temperature: f64,
    default_max_tokens: u32,
}

impl CompletionService {
    /// `provider` is `None` when no API key is configured; every call then
    /// fails with `UpstreamUnavailable`.
    pub fn new(provider: Option<Arc<dyn LlmProvider>>, default_temperature: f64, default_max_tokens: u32) -> Self {
        Self {
            provider,
            default_temperature,
            default_max_tokens,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        if request.messages.is_empty() {
            return Err(ValidationError::Empty("messages").into());
        }

        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| CompletionError::UpstreamUnavailable("API key not configured".to_string()))?;

        let options = ChatOptions {
            temperature: Some(request.temperature.unwrap_or(self.default_temperature)),
            max_tokens: Some(request.max_tokens.unwrap_or(self.default_max_tokens)),
            response_format: request.response_format,
        };

        match provider.chat(&request.messages, options).await {
            Ok(response) => {
                info!(
                    provider = provider.name(),
                    model = %response.model,
                    output_tokens = response.usage.as_ref().map(|u| u.output_tokens),
                    "Completion returned"
                );
                Ok(response.content)
            }
            Err(e) => {
                warn!(provider = provider.name(), error = %e, "Completion failed");
                Err(e.into())
            }
        }
    }
}
