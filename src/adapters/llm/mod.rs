//! Prompt-driven collaborators built on an `AIProvider`.
//!
//! Every adapter here owns one JSON contract and the fallback used when a
//! model breaks it. Transport failures are returned as `AIError` so callers
//! can retry them.

mod guide_writer;
mod intent_classifier;
mod json;
mod topic_generator;
mod welcome_responder;

pub use guide_writer::LlmGuideWriter;
pub use intent_classifier::LlmIntentClassifier;
pub use json::{extract_json_object, parse_json_contract};
pub use topic_generator::{parse_topic_groups, LlmTopicGenerator};
pub use welcome_responder::{mentions_drawing, LlmWelcomeResponder, NEUTRAL_REPLY, WELCOME_HISTORY};

/// Request purposes, used for tracing and by test doubles for routing.
pub mod purpose {
    pub const TOPIC_GROUPS: &str = "topic_groups";
    pub const GROUP_CHOICE: &str = "group_choice";
    pub const INTENT: &str = "intent_classifier";
    pub const GUIDE: &str = "drawing_guide";
    pub const ENCOURAGEMENT: &str = "encouragement";
    pub const GREETING: &str = "welcome_greeting";
    pub const WELCOME: &str = "welcome_reply";
    pub const REFERENCE_IMAGE: &str = "reference_image";
}
