//! In-memory conversation log.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::{ConversationTurn, NewTurn};
use crate::domain::foundation::{DomainError, SessionId};
use crate::ports::ConversationStore;

/// Turns per session, stored oldest first.
///
/// `order` is allocated under the same write lock as the insert.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationStore {
    turns: Arc<RwLock<HashMap<SessionId, Vec<ConversationTurn>>>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every turn of a session, oldest first.
    pub async fn all(&self, session_id: &SessionId) -> Vec<ConversationTurn> {
        self.turns
            .read()
            .await
            .get(session_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn append(&self, turn: NewTurn) -> Result<ConversationTurn, DomainError> {
        let mut turns = self.turns.write().await;
        let log = turns.entry(turn.session_id.clone()).or_default();
        let order = log.last().map_or(1, |last| last.order + 1);

        let stored = ConversationTurn::from_new(turn, order);
        log.push(stored.clone());
        Ok(stored)
    }

    async fn recent(
        &self,
        session_id: &SessionId,
        limit: usize,
    ) -> Result<Vec<ConversationTurn>, DomainError> {
        let turns = self.turns.read().await;
        Ok(turns
            .get(session_id)
            .map(|log| log.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}
