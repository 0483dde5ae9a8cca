use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::db::{service::DbService, DocumentStore, User};
use crate::services::{Clock, ServiceError};
use crate::validation::validate_user_payload;

pub struct UserService {
    store: DocumentStore,
    clock: Arc<dyn Clock>,
}

impl UserService {
    pub fn new(store: DocumentStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Records a login: upserts the profile under its identity key, refreshing
    /// `last_login_at` every time and setting `created_at` only on first insert.
    /// Returns the key the profile was stored under.
    pub async fn save(&self, user: Option<&Value>) -> Result<String, ServiceError> {
        let profile = validate_user_payload(user)?;
        let key = profile.key().to_string();
        let now = self.clock.now();

        self.store
            .run(move |conn| DbService::upsert_user(conn, &profile, now))
            .await?;

        info!(key = %key, "User profile saved");
        Ok(key)
    }

    pub async fn find(&self, key: &str) -> Result<Option<User>, ServiceError> {
        let key = key.to_string();
        let user = self.store.run(move |conn| DbService::get_user(conn, &key)).await?;
        Ok(user)
    }
}
