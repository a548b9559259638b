//! Drawing guides: topic-wide metadata and the per-session copy.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::exploration::Topic;
use crate::domain::foundation::{SessionId, Timestamp, ValidationError};

/// Number of steps every guide has.
pub const GUIDE_STEP_COUNT: usize = 3;

/// One beginner instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideStep {
    /// 1-based position.
    pub step: u32,
    pub title: String,
    pub instruction: String,
}

impl GuideStep {
    pub fn new(step: u32, title: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            step,
            title: title.into(),
            instruction: instruction.into(),
        }
    }
}

/// The generic guide used when a generated one is unusable.
pub fn default_guide_steps(topic: &Topic) -> Vec<GuideStep> {
    vec![
        GuideStep::new(
            1,
            "Big shapes",
            format!("Look at the {} and draw its largest outline with simple circles, squares or triangles.", topic),
        ),
        GuideStep::new(
            2,
            "Main features",
            format!("Add the parts that make a {} recognisable, one simple shape at a time.", topic),
        ),
        GuideStep::new(
            3,
            "Finishing touches",
            "Tidy up the lines you like and add a little colour if you wish.",
        ),
    ]
}

/// Where a topic's reference image lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    /// Public, permanent URL.
    pub url: String,
    /// Object storage key.
    pub key: String,
}

/// Object storage key for a topic's reference image generated at `at`.
///
/// Topic names are hashed so any language yields a safe path segment.
pub fn image_object_key(topic: &Topic, at: &Timestamp) -> String {
    let digest = format!("{:x}", Sha256::digest(topic.key().as_bytes()));
    format!("topics/{}/{}.png", &digest[..16], at.as_millis())
}

/// Reference image and guide for a topic, shared by every session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicMetadata {
    pub topic: Topic,
    pub image: ImageRef,
    pub guideline_steps: Vec<GuideStep>,
    pub created_at: Timestamp,
}

impl TopicMetadata {
    pub fn new(topic: Topic, image: ImageRef, guideline_steps: Vec<GuideStep>) -> Self {
        Self {
            topic,
            image,
            guideline_steps,
            created_at: Timestamp::now(),
        }
    }
}

/// Result of the (external) evaluation of a finished drawing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    score: u32,
    feedback: String,
    timestamp: Timestamp,
}

impl Evaluation {
    /// Creates an evaluation with a score between 0 and 100.
    pub fn new(score: u32, feedback: impl Into<String>) -> Result<Self, ValidationError> {
        if score > 100 {
            return Err(ValidationError::out_of_range("score", 0, 100, score as i64));
        }
        Ok(Self {
            score,
            feedback: feedback.into(),
            timestamp: Timestamp::now(),
        })
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    pub fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }
}

/// A session's guide for the topic it confirmed.
///
/// Steps are copied from the topic metadata at confirmation so later
/// evaluation state stays per session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingGuide {
    pub session_id: SessionId,
    pub topic: Topic,
    pub image_url: String,
    pub steps: Vec<GuideStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Evaluation>,
    pub created_at: Timestamp,
}

impl DrawingGuide {
    pub fn from_metadata(session_id: SessionId, metadata: &TopicMetadata) -> Self {
        Self {
            session_id,
            topic: metadata.topic.clone(),
            image_url: metadata.image.url.clone(),
            steps: metadata.guideline_steps.clone(),
            evaluation: None,
            created_at: Timestamp::now(),
        }
    }

    pub fn record_evaluation(&mut self, evaluation: Evaluation) {
        self.evaluation = Some(evaluation);
    }
}
