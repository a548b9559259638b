//! LLM-backed topic group generation and group choice.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use super::json::{extract_json_object, parse_json_contract, preview};
use super::purpose;
use crate::domain::exploration::{Topic, TopicGroup, TopicGroups, MAX_GROUP_SIZE, MIN_GROUP_SIZE};
use crate::domain::foundation::SessionId;
use crate::ports::{
    AIError, AIProvider, CompletionRequest, GroupChooser, MessageRole, RequestMetadata,
    TopicGroupGenerator,
};

/// Generates topic groups and picks among them with a text model.
pub struct LlmTopicGenerator {
    ai_provider: Arc<dyn AIProvider>,
    language: String,
}

impl LlmTopicGenerator {
    pub fn new(ai_provider: Arc<dyn AIProvider>, language: impl Into<String>) -> Self {
        Self {
            ai_provider,
            language: language.into(),
        }
    }

    fn groups_prompt(&self, interests: &[String]) -> String {
        let interests = if interests.is_empty() {
            "none known yet".to_string()
        } else {
            interests.join(", ")
        };
        format!(
            r#"You suggest drawing subjects for elderly beginners.

User interests: {interests}

Create 3 to 5 named groups of drawing subjects related to these interests.
Rules:
- each group has between {min} and {max} subjects
- every subject is a simple, concrete, everyday noun that is easy to draw
- never use abstract categories such as "nature", "happiness" or "memories"
- write group names and subjects in {language}

Respond with a single JSON object mapping group name to a list of subjects, e.g.
{{"fruit": ["apple", "pear", "grapes"], "garden": ["tulip", "watering can", "bench"]}}"#,
            interests = interests,
            min = MIN_GROUP_SIZE,
            max = MAX_GROUP_SIZE,
            language = self.language,
        )
    }

    fn choice_prompt(&self, interests: &[String], available: &[String], excluded: &[Topic]) -> String {
        let excluded: Vec<&str> = excluded.iter().map(Topic::as_str).collect();
        format!(
            r#"Pick the topic group an elderly user would most enjoy drawing from next.

User interests: {}
Available groups: {}
Subjects already offered (do not matter for the choice): {}

Respond with a single JSON object: {{"group": "<one of the available group names>"}}"#,
            if interests.is_empty() { "unknown".to_string() } else { interests.join(", ") },
            available.join(", "),
            if excluded.is_empty() { "none".to_string() } else { excluded.join(", ") },
        )
    }
}

/// Parses a `{group name: [topic, ...]}` object.
///
/// Groups with too few usable topics are dropped and long groups are
/// truncated. Errors when nothing usable remains.
pub fn parse_topic_groups(value: &Value) -> Result<TopicGroups, String> {
    let map = value.as_object().ok_or("response is not a JSON object")?;

    let mut groups = Vec::new();
    for (name, topics) in map {
        let Some(items) = topics.as_array() else {
            tracing::warn!(group = %name, "group value is not a list; dropping");
            continue;
        };
        let names: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
        match TopicGroup::new(name.as_str(), names) {
            Ok(group) => groups.push(group),
            Err(e) => tracing::warn!(group = %name, error = %e, "dropping unusable group"),
        }
    }

    let groups = TopicGroups::new(groups);
    if groups.is_empty() {
        Err("no usable groups in response".to_string())
    } else {
        Ok(groups)
    }
}

#[derive(Debug, Deserialize)]
struct GroupChoice {
    group: Option<String>,
}

#[async_trait]
impl TopicGroupGenerator for LlmTopicGenerator {
    async fn generate_groups(
        &self,
        session_id: &SessionId,
        interests: &[String],
    ) -> Result<TopicGroups, AIError> {
        let request = CompletionRequest::new(RequestMetadata::for_session(purpose::TOPIC_GROUPS, session_id))
            .with_message(MessageRole::User, self.groups_prompt(interests))
            .with_temperature(0.8)
            .with_json_response();

        let response = self.ai_provider.complete(request).await?;

        let parsed = extract_json_object(&response.content)
            .ok_or_else(|| "no JSON object in response".to_string())
            .and_then(|value| parse_topic_groups(&value));

        match parsed {
            Ok(groups) => {
                tracing::debug!(session_id = %session_id, groups = groups.len(), "generated topic groups");
                Ok(groups)
            }
            Err(reason) => {
                tracing::warn!(
                    session_id = %session_id,
                    reason = %reason,
                    output = %preview(&response.content),
                    "malformed topic groups; using default group"
                );
                Ok(TopicGroups::fallback())
            }
        }
    }
}

#[async_trait]
impl GroupChooser for LlmTopicGenerator {
    async fn choose_group(
        &self,
        session_id: &SessionId,
        interests: &[String],
        available: &[String],
        excluded: &[Topic],
    ) -> Result<Option<String>, AIError> {
        let request = CompletionRequest::new(RequestMetadata::for_session(purpose::GROUP_CHOICE, session_id))
            .with_message(MessageRole::User, self.choice_prompt(interests, available, excluded))
            .with_temperature(0.3)
            .with_json_response();

        let response = self.ai_provider.complete(request).await?;

        match parse_json_contract::<GroupChoice>(&response.content) {
            Ok(choice) => Ok(choice.group),
            Err(reason) => {
                tracing::warn!(
                    session_id = %session_id,
                    reason = %reason,
                    output = %preview(&response.content),
                    "malformed group choice"
                );
                Ok(None)
            }
        }
    }
}
