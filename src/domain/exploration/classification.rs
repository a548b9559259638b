//! Structured intent extracted from a user's reply.

use serde::{Deserialize, Serialize};

use super::topic::Topic;

/// What the intent classifier understood from one user reply.
///
/// The zero value (`Default`) means "nothing recognised": no selection,
/// no confirmation, no change requested. Callers treat it as a request
/// for more topics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassificationResult {
    pub selected_topic: Option<String>,
    pub confirmed_topic: bool,
    pub wants_different_group: bool,
    pub wants_different_topics: bool,
}

impl ClassificationResult {
    /// A reply naming `topic`.
    pub fn selection(topic: impl Into<String>) -> Self {
        Self {
            selected_topic: Some(topic.into()),
            ..Self::default()
        }
    }

    /// An unambiguous "yes".
    pub fn confirmation() -> Self {
        Self {
            confirmed_topic: true,
            ..Self::default()
        }
    }

    pub fn different_group() -> Self {
        Self {
            wants_different_group: true,
            ..Self::default()
        }
    }

    pub fn different_topics() -> Self {
        Self {
            wants_different_topics: true,
            ..Self::default()
        }
    }

    /// The selected topic, if the classifier named a usable one.
    ///
    /// Blank strings and the literal `"null"` count as no selection.
    pub fn selected(&self) -> Option<Topic> {
        self.selected_topic
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("null"))
            .and_then(|s| Topic::new(s).ok())
    }
}

/// Everything the classifier needs to judge a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationInput {
    /// The AI's previous utterance in this episode, if any.
    pub prior_ai_utterance: Option<String>,
    pub user_utterance: String,
    /// The topic the previous turn asked the user to confirm.
    pub proposed_topic: Option<String>,
}
