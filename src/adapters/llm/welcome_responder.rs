//! LLM-backed welcome conversation.

use async_trait::async_trait;
use std::sync::Arc;

use super::json::{parse_json_contract, preview};
use super::purpose;
use crate::domain::conversation::{ConversationTurn, TurnKind};
use crate::domain::foundation::SessionId;
use crate::ports::{
    AIError, AIProvider, Attendance, CompletionRequest, MessageRole, RequestMetadata, WelcomeReply,
    WelcomeResponder,
};

/// Turns of history sent with each welcome reply.
pub const WELCOME_HISTORY: usize = 5;

/// Neutral reply used when the model's output is unusable.
pub const NEUTRAL_REPLY: &str = "I see. Tell me a little more about what you enjoy.";

/// Words that signal the user wants to start drawing.
const DRAW_KEYWORDS: [&str; 3] = ["draw", "paint", "그림"];

/// Chats with a text model under a `{reply, wantsToDraw, interests}` contract.
pub struct LlmWelcomeResponder {
    ai_provider: Arc<dyn AIProvider>,
    language: String,
}

impl LlmWelcomeResponder {
    pub fn new(ai_provider: Arc<dyn AIProvider>, language: impl Into<String>) -> Self {
        Self {
            ai_provider,
            language: language.into(),
        }
    }

    fn system_prompt(&self) -> String {
        format!(
            r#"You are a warm companion chatting with an elderly person before a drawing session.
Reply in {} with one or two short, kind sentences.
Also note anything the person mentions liking (places, animals, food, hobbies, memories of objects) as short interest keywords.
If the person shows interest in drawing, set "wantsToDraw" to true.

Respond with one JSON object:
{{"reply": "...", "wantsToDraw": boolean, "interests": ["...", ...]}}"#,
            self.language
        )
    }

    fn greeting_prompt(&self, user_name: &str, attendance: Attendance) -> String {
        let mut prompt = format!(
            "In {}, greet {} warmly in one or two short sentences as they arrive for a drawing session.",
            self.language, user_name
        );
        if let Some(total) = attendance.total {
            prompt.push_str(&format!(" They have attended {} days in total.", total));
        }
        if let Some(streak) = attendance.streak {
            prompt.push_str(&format!(" They have come {} days in a row.", streak));
        }
        if attendance.is_known() {
            prompt.push_str(" Praise their attendance.");
        }
        prompt.push_str(" Reply with the greeting only.");
        prompt
    }
}

/// Keyword check used when the model cannot tell us.
pub fn mentions_drawing(utterance: &str) -> bool {
    let lower = utterance.to_lowercase();
    DRAW_KEYWORDS.iter().any(|k| lower.contains(k))
}

#[async_trait]
impl WelcomeResponder for LlmWelcomeResponder {
    async fn greet(
        &self,
        session_id: &SessionId,
        user_name: &str,
        attendance: Attendance,
    ) -> Result<String, AIError> {
        let request = CompletionRequest::new(RequestMetadata::for_session(purpose::GREETING, session_id))
            .with_message(MessageRole::User, self.greeting_prompt(user_name, attendance))
            .with_temperature(0.7)
            .with_max_tokens(200);

        let response = self.ai_provider.complete(request).await?;
        let text = response.content.trim();
        if text.is_empty() {
            return Err(AIError::parse("empty greeting"));
        }
        Ok(text.to_string())
    }

    async fn respond(
        &self,
        session_id: &SessionId,
        history: &[ConversationTurn],
        user_utterance: &str,
    ) -> Result<WelcomeReply, AIError> {
        let mut request = CompletionRequest::new(RequestMetadata::for_session(purpose::WELCOME, session_id))
            .with_system_prompt(self.system_prompt())
            .with_temperature(0.7)
            .with_json_response();

        let recent: Vec<&ConversationTurn> = history
            .iter()
            .filter(|t| t.kind == TurnKind::Welcome)
            .take(WELCOME_HISTORY)
            .collect();
        for turn in recent.into_iter().rev() {
            if turn.user_utterance != "first" {
                request = request.with_message(MessageRole::User, turn.user_utterance.clone());
            }
            request = request.with_message(MessageRole::Assistant, turn.ai_utterance.clone());
        }
        request = request.with_message(MessageRole::User, user_utterance);

        let response = self.ai_provider.complete(request).await?;

        match parse_json_contract::<WelcomeReply>(&response.content) {
            Ok(mut reply) if !reply.reply.trim().is_empty() => {
                reply.interests.retain(|i| !i.trim().is_empty());
                Ok(reply)
            }
            parsed => {
                let reason = match parsed {
                    Err(e) => e,
                    Ok(_) => "empty reply".to_string(),
                };
                tracing::warn!(
                    session_id = %session_id,
                    reason = %reason,
                    output = %preview(&response.content),
                    "malformed welcome reply; using neutral reply"
                );
                Ok(WelcomeReply {
                    reply: NEUTRAL_REPLY.to_string(),
                    wants_to_draw: mentions_drawing(user_utterance),
                    interests: Vec::new(),
                })
            }
        }
    }
}
