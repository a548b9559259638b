//! Error bodies and status mapping shared by every endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::application::services::MetadataError;
use crate::domain::exploration::ExplorationError;
use crate::domain::foundation::{DomainError, ErrorCode};

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl ToString, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<String>) -> Self {
        let details = self.details.get_or_insert_with(|| serde_json::json!({}));
        if let Some(map) = details.as_object_mut() {
            map.insert(key.to_string(), serde_json::Value::String(value.into()));
        }
        self
    }

    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// HTTP status for a domain error code.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
        c if c.is_not_found() => StatusCode::NOT_FOUND,
        ErrorCode::InvalidStateTransition => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn handle_exploration_error(error: ExplorationError) -> Response {
    let code = error.code();
    let mut body = ErrorResponse::new(code, error.to_string());
    match &error {
        ExplorationError::InvalidState { session_id, .. }
        | ExplorationError::SessionNotFound(session_id)
        | ExplorationError::EpisodeFinished(session_id) => {
            body = body.with_detail("sessionId", session_id.as_str());
        }
        ExplorationError::Validation(e) => {
            body = body.with_detail("field", e.field());
        }
        ExplorationError::Storage(_) => {
            tracing::error!(error = %error, "exploration persistence failed");
        }
    }
    body.into_response_with(status_for(code))
}

pub fn handle_domain_error(error: DomainError) -> Response {
    let status = status_for(error.code);
    if status.is_server_error() {
        tracing::error!(error = %error, "request failed");
    }
    let mut body = ErrorResponse::new(error.code, error.message);
    for (key, value) in error.details {
        body = body.with_detail(&key, value);
    }
    body.into_response_with(status)
}

pub fn handle_metadata_error(error: MetadataError) -> Response {
    match error {
        MetadataError::Store(inner) => handle_domain_error(inner),
        other => {
            tracing::error!(error = %other, "metadata request failed");
            ErrorResponse::new(ErrorCode::StorageError, other.to_string())
                .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
