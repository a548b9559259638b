//! Interest aggregation over recent conversation turns.

use std::sync::Arc;

use crate::domain::conversation::collect_interests;
use crate::domain::foundation::{DomainError, SessionId};
use crate::ports::ConversationStore;

/// Default number of recent turns scanned.
pub const DEFAULT_INTEREST_WINDOW: usize = 10;

/// Derives a session's interests from the tags on its recent turns.
#[derive(Clone)]
pub struct InterestAggregator {
    conversations: Arc<dyn ConversationStore>,
    window: usize,
}

impl InterestAggregator {
    pub fn new(conversations: Arc<dyn ConversationStore>, window: usize) -> Self {
        Self {
            conversations,
            window,
        }
    }

    /// Deduplicated, lower-cased interests. Empty when nothing is tagged.
    pub async fn interests(&self, session_id: &SessionId) -> Result<Vec<String>, DomainError> {
        let turns = self.conversations.recent(session_id, self.window).await?;
        Ok(collect_interests(&turns))
    }
}
