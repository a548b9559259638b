//! Topic group generation and group choice ports.

use async_trait::async_trait;

use super::ai_provider::AIError;
use crate::domain::exploration::{Topic, TopicGroups};
use crate::domain::foundation::SessionId;

/// Produces named groups of candidate topics from a user's interests.
///
/// Malformed collaborator output is not an error: implementations
/// substitute `TopicGroups::fallback()` and log the anomaly. `AIError` is
/// reserved for the collaborator being unreachable.
#[async_trait]
pub trait TopicGroupGenerator: Send + Sync {
    async fn generate_groups(
        &self,
        session_id: &SessionId,
        interests: &[String],
    ) -> Result<TopicGroups, AIError>;
}

/// Chooses which group to offer next.
#[async_trait]
pub trait GroupChooser: Send + Sync {
    /// Returns the collaborator's raw choice. Callers validate it against
    /// `available`.
    async fn choose_group(
        &self,
        session_id: &SessionId,
        interests: &[String],
        available: &[String],
        excluded: &[Topic],
    ) -> Result<Option<String>, AIError>;
}
