//! Conversation store port.
//!
//! Append-only log of turns per session.

use async_trait::async_trait;

use crate::domain::conversation::{ConversationTurn, NewTurn};
use crate::domain::foundation::{DomainError, SessionId};

/// Port for the conversation log.
///
/// Implementations must allocate `order` atomically with the insert so
/// concurrent appends for one session never share an order value.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Append a turn and return it with its allocated order.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn append(&self, turn: NewTurn) -> Result<ConversationTurn, DomainError>;

    /// The most recent `limit` turns for a session, newest first.
    async fn recent(
        &self,
        session_id: &SessionId,
        limit: usize,
    ) -> Result<Vec<ConversationTurn>, DomainError>;
}
