//! Request and response bodies for topic endpoints.

use serde::{Deserialize, Serialize};

use crate::adapters::http::error::ErrorResponse;
use crate::application::handlers::{
    ExploreTopicsCommand, ExploreTopicsResult, StepStatus, TopicChoice, TopicMetadataView,
};
use crate::domain::drawing::{GuideStep, MetadataStatus, TopicMetadata};
use crate::domain::foundation::SessionId;

/// POST /topics/explore body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExploreRequest {
    pub session_id: String,
    pub user_name: String,
    #[serde(default)]
    pub rejected_count: i64,
    pub user_utterance: String,
    pub is_timed_out: String,
}

impl ExploreRequest {
    pub fn into_command(self) -> Result<ExploreTopicsCommand, ErrorResponse> {
        let session_id = SessionId::new(&self.session_id)
            .map_err(|e| ErrorResponse::bad_request(e.to_string()).with_detail("field", "sessionId"))?;
        if self.user_name.trim().is_empty() {
            return Err(ErrorResponse::bad_request("userName must not be empty").with_detail("field", "userName"));
        }
        if self.user_utterance.trim().is_empty() {
            return Err(ErrorResponse::bad_request("userUtterance must not be empty")
                .with_detail("field", "userUtterance"));
        }
        let rejected_count = u32::try_from(self.rejected_count).map_err(|_| {
            ErrorResponse::bad_request("rejectedCount must be a non-negative integer")
                .with_detail("field", "rejectedCount")
        })?;
        let is_timed_out = match self.is_timed_out.as_str() {
            "true" => true,
            "false" => false,
            _ => {
                return Err(ErrorResponse::bad_request("isTimedOut must be \"true\" or \"false\"")
                    .with_detail("field", "isTimedOut"))
            }
        };

        Ok(ExploreTopicsCommand {
            session_id,
            user_name: self.user_name.trim().to_string(),
            rejected_count,
            user_utterance: self.user_utterance.trim().to_string(),
            is_timed_out,
        })
    }
}

/// A list of topics while selecting, a single topic once proposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TopicsField {
    Many(Vec<String>),
    One(String),
}

impl From<TopicChoice> for TopicsField {
    fn from(choice: TopicChoice) -> Self {
        match choice {
            TopicChoice::Many(topics) => TopicsField::Many(topics.into_iter().map(String::from).collect()),
            TopicChoice::One(topic) => TopicsField::One(topic.into()),
        }
    }
}

/// Reference image and guide steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataDto {
    pub topic: String,
    pub image_ref: String,
    pub guideline_steps: Vec<GuideStep>,
}

impl From<TopicMetadata> for MetadataDto {
    fn from(metadata: TopicMetadata) -> Self {
        Self {
            topic: metadata.topic.into(),
            image_ref: metadata.image.url,
            guideline_steps: metadata.guideline_steps,
        }
    }
}

/// POST /topics/explore response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExploreResponse {
    pub topics: TopicsField,
    /// "true" only on the confirming step.
    pub select: String,
    pub ai_utterance: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_status: Option<String>,
    /// "ok" or "unavailable".
    pub status: String,
}

impl From<ExploreTopicsResult> for ExploreResponse {
    fn from(result: ExploreTopicsResult) -> Self {
        Self {
            topics: result.topics.into(),
            select: result.select.to_string(),
            ai_utterance: result.ai_utterance,
            metadata: result.metadata.map(MetadataDto::from),
            metadata_status: result.metadata_status.map(|s| s.as_str().to_string()),
            status: match result.status {
                StepStatus::Ok => "ok",
                StepStatus::Unavailable => "unavailable",
            }
            .to_string(),
        }
    }
}

/// GET /topics/:topic/metadata response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataStatusResponse {
    pub topic: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataDto>,
}

impl From<TopicMetadataView> for MetadataStatusResponse {
    fn from(view: TopicMetadataView) -> Self {
        let reason = match &view.status {
            MetadataStatus::Failed { reason } => Some(reason.clone()),
            _ => None,
        };
        Self {
            topic: view.topic.into(),
            status: view.status.as_str().to_string(),
            reason,
            metadata: view.metadata.map(MetadataDto::from),
        }
    }
}
