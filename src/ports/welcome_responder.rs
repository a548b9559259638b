//! Welcome conversation port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ai_provider::AIError;
use crate::domain::conversation::ConversationTurn;
use crate::domain::foundation::SessionId;

/// A reply in the welcome dialogue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WelcomeReply {
    pub reply: String,
    pub wants_to_draw: bool,
    pub interests: Vec<String>,
}

/// Attendance figures supplied by the client, when known.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Attendance {
    /// Days attended in total.
    pub total: Option<u32>,
    /// Consecutive days attended.
    pub streak: Option<u32>,
}

impl Attendance {
    pub fn is_known(&self) -> bool {
        self.total.is_some() || self.streak.is_some()
    }
}

/// Chats with the user before exploration and tags their interests.
#[async_trait]
pub trait WelcomeResponder: Send + Sync {
    /// Opening greeting, praising attendance when known.
    async fn greet(
        &self,
        session_id: &SessionId,
        user_name: &str,
        attendance: Attendance,
    ) -> Result<String, AIError>;

    /// `history` is newest first.
    async fn respond(
        &self,
        session_id: &SessionId,
        history: &[ConversationTurn],
        user_utterance: &str,
    ) -> Result<WelcomeReply, AIError>;
}
