use std::sync::Arc;
use tracing::info;

use crate::db::{service::DbService, Conversation, ConversationSummary, DocumentStore};
use crate::services::{Clock, ServiceError};
use crate::validation::{validate_conversation_payload, validate_session_id, ConversationDraft};

/// Conversations keyed by session id.
///
/// A session is either absent or present. `save` moves it to present (replacing
/// the messages wholesale and keeping the original `created_at`), `remove`
/// moves it back. Loading or removing an absent session is not an error.
pub struct ConversationService {
    store: DocumentStore,
    clock: Arc<dyn Clock>,
}

impl ConversationService {
    pub fn new(store: DocumentStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Validates and upserts. Nothing is written when validation fails.
    pub async fn save(&self, draft: ConversationDraft) -> Result<(), ServiceError> {
        let payload = validate_conversation_payload(draft)?;
        let now = self.clock.now();
        let session_id = payload.session_id.clone();

        self.store
            .run(move |conn| {
                DbService::upsert_conversation(conn, &payload.session_id, &payload.messages, now)
            })
            .await?;

        info!(session_id = %session_id, "Conversation saved");
        Ok(())
    }

    /// The stored messages, or `None` when the session has never been saved.
    pub async fn load(&self, session_id: &str) -> Result<Option<serde_json::Value>, ServiceError> {
        Ok(self.fetch(session_id).await?.map(|c| c.messages))
    }

    /// Full record including timestamps.
    pub async fn fetch(&self, session_id: &str) -> Result<Option<Conversation>, ServiceError> {
        let session_id = validate_session_id(session_id)?.to_string();
        let conversation = self
            .store
            .run(move |conn| DbService::get_conversation(conn, &session_id))
            .await?;
        Ok(conversation)
    }

    /// Returns how many conversations were deleted (0 or 1).
    pub async fn remove(&self, session_id: &str) -> Result<usize, ServiceError> {
        let session_id = validate_session_id(session_id)?.to_string();
        let key = session_id.clone();
        let deleted = self
            .store
            .run(move |conn| DbService::delete_conversation(conn, &key))
            .await?;

        info!(session_id = %session_id, deleted, "Conversation removed");
        Ok(deleted)
    }

    pub async fn list(&self, limit: usize, offset: usize) -> Result<Vec<ConversationSummary>, ServiceError> {
        let summaries = self
            .store
            .run(move |conn| DbService::list_conversations(conn, limit, offset))
            .await?;
        Ok(summaries)
    }
}
