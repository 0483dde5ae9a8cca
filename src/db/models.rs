use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One persisted conversation, keyed by its caller-chosen session id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub session_id: String,
    pub messages: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing row; leaves the message body behind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub key: String,
    pub sub: Option<String>,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
    pub email_verified: Option<bool>,
    pub hd: Option<String>,
    pub locale: Option<String>,
    pub phone: Option<String>,
    pub last_login_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
