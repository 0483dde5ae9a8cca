use actix_web::{error::JsonPayloadError, web, HttpRequest};
use std::sync::Arc;
use std::time::Duration;

use crate::api::error::ApiError;
use crate::config::AppConfig;
use crate::db::{DbPool, DocumentStore};
use crate::llm::{LlmError, ProviderFactory};
use crate::services::{Clock, CompletionService, ConversationService, SystemClock, UserService};
use crate::validation::ValidationError;

/// Everything the handlers share. Built once at startup; each worker gets
/// clones of the same `web::Data` handles.
#[derive(Clone)]
pub struct AppState {
    pub config: web::Data<AppConfig>,
    pub conversations: web::Data<ConversationService>,
    pub users: web::Data<UserService>,
    pub completions: web::Data<CompletionService>,
}

impl AppState {
    pub fn new(config: AppConfig, pool: DbPool) -> Result<Self, LlmError> {
        Self::with_clock(config, pool, Arc::new(SystemClock))
    }

    pub fn with_clock(config: AppConfig, pool: DbPool, clock: Arc<dyn Clock>) -> Result<Self, LlmError> {
        let store = DocumentStore::new(pool, Duration::from_millis(config.database.timeout_ms));
        let provider = ProviderFactory::create(&config.groq)?;
        let completions = CompletionService::new(provider, config.groq.temperature, config.groq.max_tokens);

        Ok(Self {
            conversations: web::Data::new(ConversationService::new(store.clone(), clock.clone())),
            users: web::Data::new(UserService::new(store, clock)),
            completions: web::Data::new(completions),
            config: web::Data::new(config),
        })
    }

    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.config.clone())
            .app_data(self.conversations.clone())
            .app_data(self.users.clone())
            .app_data(self.completions.clone())
            .app_data(web::JsonConfig::default().error_handler(json_error));
    }
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::InvalidPayload(ValidationError::Malformed(err.to_string())).into()
}
