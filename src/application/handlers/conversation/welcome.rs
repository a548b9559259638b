//! WelcomeHandler - the chat before topic exploration.
//!
//! Each reply is appended as a welcome turn tagged with the interests the
//! responder heard; the interest aggregator reads those tags later.

use std::sync::Arc;

use crate::adapters::llm::{mentions_drawing, NEUTRAL_REPLY, WELCOME_HISTORY};
use crate::application::services::RetryPolicy;
use crate::domain::conversation::NewTurn;
use crate::domain::foundation::{DomainError, SessionId};
use crate::ports::{Attendance, ConversationStore, WelcomeReply, WelcomeResponder};

use crate::application::handlers::exploration::FIRST_UTTERANCE;

/// Command for one welcome exchange.
#[derive(Debug, Clone)]
pub struct WelcomeCommand {
    pub session_id: SessionId,
    pub user_name: String,
    pub user_utterance: String,
    pub attendance: Attendance,
}

/// Result of a welcome exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WelcomeResult {
    pub ai_utterance: String,
    /// True when the user is ready to pick something to draw.
    pub choice: bool,
    pub interests: Vec<String>,
}

/// Handler for the welcome dialogue.
pub struct WelcomeHandler {
    responder: Arc<dyn WelcomeResponder>,
    conversations: Arc<dyn ConversationStore>,
    retry: RetryPolicy,
}

impl WelcomeHandler {
    pub fn new(
        responder: Arc<dyn WelcomeResponder>,
        conversations: Arc<dyn ConversationStore>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            responder,
            conversations,
            retry,
        }
    }

    pub async fn handle(&self, cmd: WelcomeCommand) -> Result<WelcomeResult, DomainError> {
        let first = cmd.user_utterance.trim().eq_ignore_ascii_case(FIRST_UTTERANCE);
        tracing::info!(session_id = %cmd.session_id, first, "welcome step");

        let reply = if first {
            WelcomeReply {
                reply: self.greet(&cmd).await,
                ..WelcomeReply::default()
            }
        } else {
            self.respond(&cmd).await?
        };

        let turn = NewTurn::welcome(cmd.session_id.clone(), cmd.user_utterance, reply.reply.clone())
            .with_interests(reply.interests.clone());
        self.conversations.append(turn).await?;

        Ok(WelcomeResult {
            ai_utterance: reply.reply,
            choice: reply.wants_to_draw,
            interests: reply.interests,
        })
    }

    async fn greet(&self, cmd: &WelcomeCommand) -> String {
        match self
            .retry
            .run("welcome_greeting", || {
                self.responder.greet(&cmd.session_id, &cmd.user_name, cmd.attendance)
            })
            .await
        {
            Ok(greeting) => greeting,
            Err(err) => {
                tracing::warn!(session_id = %cmd.session_id, error = %err, "greeting unavailable; using template");
                greeting_fallback(&cmd.user_name, cmd.attendance)
            }
        }
    }

    async fn respond(&self, cmd: &WelcomeCommand) -> Result<WelcomeReply, DomainError> {
        let history = self
            .conversations
            .recent(&cmd.session_id, WELCOME_HISTORY)
            .await?;

        Ok(match self
            .retry
            .run("welcome_reply", || {
                self.responder
                    .respond(&cmd.session_id, &history, &cmd.user_utterance)
            })
            .await
        {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(session_id = %cmd.session_id, error = %err, "welcome responder unavailable; using neutral reply");
                WelcomeReply {
                    reply: NEUTRAL_REPLY.to_string(),
                    wants_to_draw: mentions_drawing(&cmd.user_utterance),
                    interests: Vec::new(),
                }
            }
        })
    }
}

fn greeting_fallback(user_name: &str, attendance: Attendance) -> String {
    match attendance.streak.or(attendance.total) {
        Some(days) if days > 1 => format!(
            "Hello {}! It's so good to see you again, that's {} days now. How are you feeling today?",
            user_name, days
        ),
        _ => format!("Hello {}! It's lovely to see you. How are you feeling today?", user_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::llm::{purpose, LlmWelcomeResponder};
    use crate::adapters::memory::InMemoryConversationStore;
    use crate::domain::conversation::{collect_interests, TurnKind};
    use crate::ports::AIError;
    use std::time::Duration;

    fn sid() -> SessionId {
        SessionId::new("welcome-1").unwrap()
    }

    fn handler(ai: MockAIProvider) -> (WelcomeHandler, Arc<InMemoryConversationStore>, Arc<MockAIProvider>) {
        let ai = Arc::new(ai);
        let conversations = Arc::new(InMemoryConversationStore::new());
        let handler = WelcomeHandler::new(
            Arc::new(LlmWelcomeResponder::new(ai.clone(), "English")),
            conversations.clone(),
            RetryPolicy::new(Duration::from_secs(1), 1, Duration::from_millis(1)),
        );
        (handler, conversations, ai)
    }

    fn say(utterance: &str) -> WelcomeCommand {
        WelcomeCommand {
            session_id: sid(),
            user_name: "Mr. Park".to_string(),
            user_utterance: utterance.to_string(),
            attendance: Attendance::default(),
        }
    }

    #[tokio::test]
    async fn first_call_greets_and_logs_turn() {
        let (handler, conversations, _) =
            handler(MockAIProvider::new().with_response_for(purpose::GREETING, "Welcome back, Mr. Park!"));

        let result = handler.handle(say("first")).await.unwrap();
        assert_eq!(result.ai_utterance, "Welcome back, Mr. Park!");
        assert!(!result.choice);

        let turns = conversations.all(&sid()).await;
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].kind, TurnKind::Welcome);
    }

    #[tokio::test]
    async fn greeting_falls_back_to_template() {
        let (handler, _, _) =
            handler(MockAIProvider::new().with_error_for(purpose::GREETING, AIError::AuthenticationFailed));
        let mut cmd = say("first");
        cmd.attendance = Attendance {
            total: Some(12),
            streak: Some(4),
        };

        let result = handler.handle(cmd).await.unwrap();
        assert!(result.ai_utterance.contains("Mr. Park"));
        assert!(result.ai_utterance.contains("4 days"));
    }

    #[tokio::test]
    async fn reply_tags_interests_for_exploration() {
        let (handler, conversations, _) = handler(MockAIProvider::new().with_response_for(
            purpose::WELCOME,
            r#"{"reply": "Roses are lovely!", "wantsToDraw": true, "interests": ["Roses", "garden"]}"#,
        ));

        let result = handler.handle(say("I grew roses in my garden")).await.unwrap();
        assert!(result.choice);
        assert_eq!(result.ai_utterance, "Roses are lovely!");

        let turns = conversations.all(&sid()).await;
        assert_eq!(collect_interests(&turns), vec!["garden", "roses"]);
    }

    #[tokio::test]
    async fn outage_uses_neutral_reply_and_keyword_check() {
        let (handler, _, _) =
            handler(MockAIProvider::new().with_error_for(purpose::WELCOME, AIError::AuthenticationFailed));

        let result = handler.handle(say("I'd like to draw today")).await.unwrap();
        assert_eq!(result.ai_utterance, NEUTRAL_REPLY);
        assert!(result.choice);
        assert!(result.interests.is_empty());
    }

    #[tokio::test]
    async fn history_is_sent_with_each_reply() {
        let (handler, _, ai) = handler(
            MockAIProvider::new()
                .with_response_for(purpose::GREETING, "Hello!")
                .with_response_for(purpose::WELCOME, r#"{"reply": "Nice.", "wantsToDraw": false, "interests": []}"#),
        );
        handler.handle(say("first")).await.unwrap();
        handler.handle(say("I had soup")).await.unwrap();

        let request = ai
            .get_calls()
            .into_iter()
            .find(|c| c.metadata.purpose == purpose::WELCOME)
            .unwrap();
        let contents: Vec<&str> = request.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["Hello!", "I had soup"]);
    }
}
