//! LLM-backed drawing guide and encouragement writer.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use super::json::{parse_json_contract, preview};
use super::purpose;
use crate::domain::drawing::{default_guide_steps, GuideStep, GUIDE_STEP_COUNT};
use crate::domain::exploration::Topic;
use crate::domain::foundation::SessionId;
use crate::ports::{AIError, AIProvider, CompletionRequest, GuideWriter, MessageRole, RequestMetadata};

/// Writes guides with a text model.
pub struct LlmGuideWriter {
    ai_provider: Arc<dyn AIProvider>,
    language: String,
}

#[derive(Debug, Deserialize)]
struct GuideContract {
    steps: Vec<StepContract>,
}

#[derive(Debug, Deserialize)]
struct StepContract {
    title: String,
    instruction: String,
}

impl LlmGuideWriter {
    pub fn new(ai_provider: Arc<dyn AIProvider>, language: impl Into<String>) -> Self {
        Self {
            ai_provider,
            language: language.into(),
        }
    }

    fn guide_prompt(&self, topic: &Topic, image_url: &str) -> String {
        format!(
            r#"Write a drawing guide for an elderly beginner drawing "{topic}".
The reference image is at {image_url}.

Rules:
- exactly {count} steps
- build the drawing from simple shapes (circles, squares, triangles, lines)
- one short, friendly sentence per instruction
- write in {language}

Respond with one JSON object:
{{"steps": [{{"title": "...", "instruction": "..."}}, ...]}}"#,
            topic = topic,
            image_url = image_url,
            count = GUIDE_STEP_COUNT,
            language = self.language,
        )
    }

    fn encouragement_prompt(&self, topic: &Topic, steps: &[GuideStep]) -> String {
        let first = steps
            .first()
            .map(|s| s.instruction.as_str())
            .unwrap_or("start with the big shapes");
        format!(
            "In {}, write one or two warm sentences inviting an elderly user to start drawing {}. \
             Mention this first drawing point: {}. Reply with the sentences only.",
            self.language, topic, first
        )
    }
}

/// Validates a parsed guide: exactly three steps with text in each.
fn into_steps(contract: GuideContract) -> Result<Vec<GuideStep>, String> {
    if contract.steps.len() != GUIDE_STEP_COUNT {
        return Err(format!("expected {} steps, got {}", GUIDE_STEP_COUNT, contract.steps.len()));
    }
    contract
        .steps
        .into_iter()
        .enumerate()
        .map(|(i, s)| {
            let title = s.title.trim();
            let instruction = s.instruction.trim();
            if title.is_empty() || instruction.is_empty() {
                Err(format!("step {} is empty", i + 1))
            } else {
                Ok(GuideStep::new(i as u32 + 1, title, instruction))
            }
        })
        .collect()
}

#[async_trait]
impl GuideWriter for LlmGuideWriter {
    async fn write_guide(&self, topic: &Topic, image_url: &str) -> Result<Vec<GuideStep>, AIError> {
        let request = CompletionRequest::new(RequestMetadata::new(purpose::GUIDE))
            .with_message(MessageRole::User, self.guide_prompt(topic, image_url))
            .with_temperature(0.4)
            .with_json_response();

        let response = self.ai_provider.complete(request).await?;

        match parse_json_contract::<GuideContract>(&response.content).and_then(into_steps) {
            Ok(steps) => Ok(steps),
            Err(reason) => {
                tracing::warn!(
                    topic = %topic,
                    reason = %reason,
                    output = %preview(&response.content),
                    "malformed guide; using generic steps"
                );
                Ok(default_guide_steps(topic))
            }
        }
    }

    async fn write_encouragement(
        &self,
        session_id: &SessionId,
        topic: &Topic,
        steps: &[GuideStep],
    ) -> Result<String, AIError> {
        let request = CompletionRequest::new(RequestMetadata::for_session(purpose::ENCOURAGEMENT, session_id))
            .with_message(MessageRole::User, self.encouragement_prompt(topic, steps))
            .with_temperature(0.7)
            .with_max_tokens(200);

        let response = self.ai_provider.complete(request).await?;
        let text = response.content.trim();
        if text.is_empty() {
            return Err(AIError::parse("empty encouragement"));
        }
        Ok(text.to_string())
    }
}
