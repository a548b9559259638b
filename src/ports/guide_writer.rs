//! Guide writing port.

use async_trait::async_trait;

use super::ai_provider::AIError;
use crate::domain::drawing::GuideStep;
use crate::domain::exploration::Topic;
use crate::domain::foundation::SessionId;

/// Writes drawing guides and encouragement for a topic.
#[async_trait]
pub trait GuideWriter: Send + Sync {
    /// Derive a three-step beginner guide from the reference image.
    ///
    /// Unusable output is replaced by `default_guide_steps`.
    async fn write_guide(&self, topic: &Topic, image_url: &str) -> Result<Vec<GuideStep>, AIError>;

    /// A short, warm line inviting the user to start drawing.
    async fn write_encouragement(
        &self,
        session_id: &SessionId,
        topic: &Topic,
        steps: &[GuideStep],
    ) -> Result<String, AIError>;
}
