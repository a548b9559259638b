//! LLM-backed intent classification.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use super::json::{parse_json_contract, preview};
use super::purpose;
use crate::domain::exploration::{ClassificationInput, ClassificationResult};
use crate::domain::foundation::SessionId;
use crate::ports::{AIError, AIProvider, CompletionRequest, IntentClassifier, MessageRole, RequestMetadata};

const SYSTEM_PROMPT: &str = r#"You classify what an elderly user means while choosing something to draw.

Rules:
1. If the user names any concrete subject, set "selectedTopic" to it. This is always a selection, never a confirmation, even if it is the subject that was just proposed.
2. Set "confirmedTopic" to true only when the previous AI turn proposed a subject ("proposedTopic" is not null) AND the user clearly agrees (yes, ok, let's do that) without naming a new subject.
3. If the user rejects the options and asks for a different kind of thing (another category or theme), set "wantsDifferentGroup" to true.
4. If the user vaguely asks for something else, set "wantsDifferentTopics" to true. When unsure between 3 and 4, choose 4.

Respond with one JSON object and nothing else:
{"selectedTopic": string or null, "confirmedTopic": boolean, "wantsDifferentGroup": boolean, "wantsDifferentTopics": boolean}"#;

/// Classifies replies with a text model under a fixed JSON contract.
pub struct LlmIntentClassifier {
    ai_provider: Arc<dyn AIProvider>,
}

impl LlmIntentClassifier {
    pub fn new(ai_provider: Arc<dyn AIProvider>) -> Self {
        Self { ai_provider }
    }

    fn user_prompt(input: &ClassificationInput) -> String {
        json!({
            "previousAiUtterance": input.prior_ai_utterance,
            "proposedTopic": input.proposed_topic,
            "userUtterance": input.user_utterance,
        })
        .to_string()
    }
}

#[async_trait]
impl IntentClassifier for LlmIntentClassifier {
    async fn classify(
        &self,
        session_id: &SessionId,
        input: &ClassificationInput,
    ) -> Result<ClassificationResult, AIError> {
        let request = CompletionRequest::new(RequestMetadata::for_session(purpose::INTENT, session_id))
            .with_system_prompt(SYSTEM_PROMPT)
            .with_message(MessageRole::User, Self::user_prompt(input))
            .with_temperature(0.0)
            .with_json_response();

        let response = self.ai_provider.complete(request).await?;

        match parse_json_contract::<ClassificationResult>(&response.content) {
            Ok(result) => {
                tracing::debug!(session_id = %session_id, ?result, "classified reply");
                Ok(result)
            }
            Err(reason) => {
                tracing::warn!(
                    session_id = %session_id,
                    reason = %reason,
                    output = %preview(&response.content),
                    "malformed classification; treating as no intent"
                );
                Ok(ClassificationResult::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;

    fn sid() -> SessionId {
        SessionId::new("s1").unwrap()
    }

    fn input(proposed: Option<&str>, utterance: &str) -> ClassificationInput {
        ClassificationInput {
            prior_ai_utterance: Some("How about apple, pear or plum?".into()),
            user_utterance: utterance.into(),
            proposed_topic: proposed.map(String::from),
        }
    }

    #[tokio::test]
    async fn parses_contract() {
        let provider = Arc::new(MockAIProvider::new().with_response_for(
            purpose::INTENT,
            r#"{"selectedTopic":"pear","confirmedTopic":false,"wantsDifferentGroup":false,"wantsDifferentTopics":false}"#,
        ));
        let classifier = LlmIntentClassifier::new(provider);

        let result = classifier.classify(&sid(), &input(None, "the pear")).await.unwrap();
        assert_eq!(result.selected().unwrap().as_str(), "pear");
    }

    #[tokio::test]
    async fn malformed_output_yields_zero_value() {
        let provider = Arc::new(MockAIProvider::new().with_response_for(purpose::INTENT, "yes!!"));
        let classifier = LlmIntentClassifier::new(provider);

        let result = classifier.classify(&sid(), &input(Some("pear"), "yes")).await.unwrap();
        assert_eq!(result, ClassificationResult::default());
    }

    #[tokio::test]
    async fn prompt_carries_proposal_marker() {
        let provider = Arc::new(MockAIProvider::new());
        let classifier = LlmIntentClassifier::new(provider.clone());

        classifier.classify(&sid(), &input(Some("pear"), "yes")).await.unwrap();

        let call = &provider.get_calls()[0];
        assert_eq!(call.metadata.purpose, purpose::INTENT);
        assert!(call.messages[0].content.contains(r#""proposedTopic":"pear""#));
        assert_eq!(call.temperature, Some(0.0));
    }

    #[tokio::test]
    async fn transport_errors_propagate() {
        let provider = Arc::new(
            MockAIProvider::new().with_error_for(purpose::INTENT, AIError::unavailable("down")),
        );
        let classifier = LlmIntentClassifier::new(provider);
        assert!(classifier.classify(&sid(), &input(None, "pear")).await.is_err());
    }
}
