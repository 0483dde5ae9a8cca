pub mod completion;
pub mod conversation;
pub mod user;

pub use completion::{CompletionError, CompletionRequest, CompletionService};
pub use conversation::ConversationService;
pub use user::UserService;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::db::StoreError;
use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] ValidationError),
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

/// Source of write timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
