//! Conversation log entries.
//!
//! Turns are append-only. The conversation store assigns `order` at append
//! time; nothing else may choose it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::exploration::Topic;
use crate::domain::foundation::{SessionId, Timestamp, TurnId};

/// Which dialogue produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnKind {
    Welcome,
    Exploration,
}

/// A turn waiting to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTurn {
    pub session_id: SessionId,
    pub kind: TurnKind,
    pub user_utterance: String,
    pub ai_utterance: String,
    pub interests: Vec<String>,
    /// Set when the AI utterance asks the user to confirm this topic.
    pub proposed_topic: Option<Topic>,
}

impl NewTurn {
    pub fn exploration(
        session_id: SessionId,
        user_utterance: impl Into<String>,
        ai_utterance: impl Into<String>,
    ) -> Self {
        Self {
            session_id,
            kind: TurnKind::Exploration,
            user_utterance: user_utterance.into(),
            ai_utterance: ai_utterance.into(),
            interests: Vec::new(),
            proposed_topic: None,
        }
    }

    pub fn welcome(
        session_id: SessionId,
        user_utterance: impl Into<String>,
        ai_utterance: impl Into<String>,
    ) -> Self {
        Self {
            kind: TurnKind::Welcome,
            ..Self::exploration(session_id, user_utterance, ai_utterance)
        }
    }

    pub fn with_interests(mut self, interests: Vec<String>) -> Self {
        self.interests = interests;
        self
    }

    pub fn with_proposal(mut self, topic: Topic) -> Self {
        self.proposed_topic = Some(topic);
        self
    }
}

/// A persisted turn.
///
/// # Invariants
///
/// - `order` strictly increases per session, starting at 1
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationTurn {
    pub id: TurnId,
    pub session_id: SessionId,
    pub order: u64,
    pub kind: TurnKind,
    pub user_utterance: String,
    pub ai_utterance: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interests: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposed_topic: Option<Topic>,
    pub created_at: Timestamp,
}

impl ConversationTurn {
    /// Materializes `turn` at the order the store allocated.
    pub fn from_new(turn: NewTurn, order: u64) -> Self {
        Self {
            id: TurnId::new(),
            session_id: turn.session_id,
            order,
            kind: turn.kind,
            user_utterance: turn.user_utterance,
            ai_utterance: turn.ai_utterance,
            interests: turn.interests,
            proposed_topic: turn.proposed_topic,
            created_at: Timestamp::now(),
        }
    }
}

/// Unions the interest tags of `turns`, lower-cased and deduplicated.
pub fn collect_interests(turns: &[ConversationTurn]) -> Vec<String> {
    turns
        .iter()
        .flat_map(|t| t.interests.iter())
        .map(|i| i.trim().to_lowercase())
        .filter(|i| !i.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The most recent exploration turn in `turns`, which are newest first.
pub fn last_exploration_turn(turns: &[ConversationTurn]) -> Option<&ConversationTurn> {
    turns.iter().find(|t| t.kind == TurnKind::Exploration)
}
