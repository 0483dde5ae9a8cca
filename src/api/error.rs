use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::db::StoreError;
use crate::services::{CompletionError, ServiceError};
use crate::validation::ValidationError;

/// Every failure a handler can return, rendered as `{success: false, error}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidPayload(#[from] ValidationError),
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
    #[error("{0}")]
    UpstreamUnavailable(String),
    #[error("Completion service request failed with status {status}")]
    UpstreamError { status: u16 },
    #[error("No content received from the completion service")]
    EmptyCompletion,
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("Not found")]
    NotFound,
    #[error("Internal server error")]
    Internal,
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidPayload(e) => Self::InvalidPayload(e),
            ServiceError::StoreUnavailable(e) => Self::StoreUnavailable(e),
        }
    }
}

impl From<CompletionError> for ApiError {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::InvalidPayload(e) => Self::InvalidPayload(e),
            CompletionError::UpstreamUnavailable(msg) => Self::UpstreamUnavailable(msg),
            CompletionError::UpstreamError { status, .. } => Self::UpstreamError { status },
            CompletionError::EmptyCompletion => Self::EmptyCompletion,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            Self::StoreUnavailable(_) | Self::EmptyCompletion | Self::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::UpstreamUnavailable(_) | Self::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::UpstreamError { status } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        HttpResponse::build(status).json(json!({
            "success": false,
            "error": self.to_string(),
        }))
    }
}
