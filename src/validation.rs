//! Request payload schemas.
//!
//! Bodies are deserialized loosely into drafts (every field optional, any JSON
//! type) and then checked here, so a bad field yields a [`ValidationError`]
//! naming it instead of a bare serde rejection.

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("{field} must be a {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("{0} must be an object")]
    NotAnObject(&'static str),
    #[error("Malformed request body: {0}")]
    Malformed(String),
}

impl ValidationError {
    /// Name of the offending field, when there is one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Missing(f) | Self::Empty(f) | Self::NotAnObject(f) => Some(f),
            Self::WrongType { field, .. } => Some(field),
            Self::Malformed(_) => None,
        }
    }
}

// --- Conversations ---

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationDraft {
    pub session_id: Option<Value>,
    pub messages: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversationPayload {
    pub session_id: String,
    /// Stored as-is. Any present value is accepted, including `[]`.
    pub messages: Value,
}

pub fn validate_session_id(session_id: &str) -> Result<&str, ValidationError> {
    if session_id.is_empty() {
        return Err(ValidationError::Missing("sessionId"));
    }
    Ok(session_id)
}

pub fn validate_conversation_payload(
    draft: ConversationDraft,
) -> Result<ConversationPayload, ValidationError> {
    let session_id = match draft.session_id {
        None => return Err(ValidationError::Missing("sessionId")),
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => {
            return Err(ValidationError::WrongType {
                field: "sessionId",
                expected: "string",
            })
        }
    };
    validate_session_id(&session_id)?;

    let messages = draft.messages.ok_or(ValidationError::Missing("messages"))?;

    Ok(ConversationPayload {
        session_id,
        messages,
    })
}

// --- Users ---

#[derive(Debug, Default, Clone, Deserialize)]
pub struct UserDraft {
    pub user: Option<Value>,
}

/// A validated user profile. Unknown fields of the incoming record are dropped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserProfile {
    pub sub: Option<String>,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
    pub email_verified: Option<bool>,
    pub hd: Option<String>,
    pub locale: Option<String>,
    pub phone: Option<String>,
}

impl UserProfile {
    /// Identity key: `sub` when present, otherwise `email`.
    pub fn key(&self) -> &str {
        self.sub.as_deref().unwrap_or(&self.email)
    }
}

fn required_text(record: &Map<String, Value>, field: &'static str) -> Result<String, ValidationError> {
    match record.get(field) {
        None | Some(Value::Null) => Err(ValidationError::Missing(field)),
        Some(Value::String(s)) if s.trim().is_empty() => Err(ValidationError::Empty(field)),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(_) => Err(ValidationError::WrongType {
            field,
            expected: "string",
        }),
    }
}

fn optional_text(
    record: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match record.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::WrongType {
            field,
            expected: "string",
        }),
    }
}

pub fn validate_user_payload(user: Option<&Value>) -> Result<UserProfile, ValidationError> {
    let record = match user {
        None | Some(Value::Null) => return Err(ValidationError::Missing("user")),
        Some(Value::Object(record)) => record,
        Some(_) => return Err(ValidationError::NotAnObject("user")),
    };

    // Unlike the optional strings, a present `null` is not treated as absent.
    let email_verified = match record.get("emailVerified") {
        None => None,
        Some(Value::Bool(b)) => Some(*b),
        Some(_) => {
            return Err(ValidationError::WrongType {
                field: "emailVerified",
                expected: "boolean",
            })
        }
    };

    Ok(UserProfile {
        email: required_text(record, "email")?,
        name: required_text(record, "name")?,
        sub: optional_text(record, "sub")?,
        picture: optional_text(record, "picture")?,
        email_verified,
        hd: optional_text(record, "hd")?,
        locale: optional_text(record, "locale")?,
        phone: optional_text(record, "phone")?,
    })
}
