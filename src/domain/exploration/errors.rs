//! Exploration-specific error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, SessionId, ValidationError};

/// Failures of an exploration step.
///
/// Collaborator outages are not errors here: they surface as an apology
/// outcome so the conversation always has something to say.
#[derive(Debug, Clone, Error)]
pub enum ExplorationError {
    /// The requested transition is not legal for the session's state.
    #[error("invalid state for session {session_id}: {reason}")]
    InvalidState { session_id: SessionId, reason: String },

    /// No live session exists for the id.
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    /// The episode already ended with a confirmed topic.
    #[error("exploration already finished for session {0}; start a new episode")]
    EpisodeFinished(SessionId),

    /// Request data failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Session or conversation persistence failed.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl ExplorationError {
    pub fn invalid_state(session_id: &SessionId, reason: impl Into<String>) -> Self {
        Self::InvalidState {
            session_id: session_id.clone(),
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidState { .. } | Self::EpisodeFinished(_) => ErrorCode::InvalidStateTransition,
            Self::SessionNotFound(_) => ErrorCode::SessionNotFound,
            Self::Validation(_) => ErrorCode::ValidationFailed,
            Self::Storage(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<DomainError> for ExplorationError {
    fn from(err: DomainError) -> Self {
        ExplorationError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_state_names_the_session() {
        let id = SessionId::new("s-42").unwrap();
        let err = ExplorationError::invalid_state(&id, "no pending topic");
        assert!(err.to_string().contains("s-42"));
        assert_eq!(err.code(), ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn domain_errors_become_storage_failures() {
        let err: ExplorationError = DomainError::database("disk full").into();
        assert!(matches!(err, ExplorationError::Storage(ref m) if m.contains("disk full")));
        assert_eq!(err.code(), ErrorCode::DatabaseError);
    }
}
