//! Topic metadata and drawing guide store ports.

use async_trait::async_trait;

use crate::domain::drawing::{DrawingGuide, Evaluation, TopicMetadata};
use crate::domain::exploration::Topic;
use crate::domain::foundation::{DomainError, SessionId};

/// Port for topic metadata, keyed by topic alone and shared by all sessions.
#[async_trait]
pub trait TopicMetadataStore: Send + Sync {
    async fn get(&self, topic: &Topic) -> Result<Option<TopicMetadata>, DomainError>;

    /// Insert or replace the metadata for its topic.
    async fn put(&self, metadata: TopicMetadata) -> Result<(), DomainError>;
}

/// Port for per-session drawing guides, keyed by (session, topic).
#[async_trait]
pub trait DrawingGuideStore: Send + Sync {
    async fn get(
        &self,
        session_id: &SessionId,
        topic: &Topic,
    ) -> Result<Option<DrawingGuide>, DomainError>;

    /// Insert or replace a guide.
    async fn put(&self, guide: DrawingGuide) -> Result<(), DomainError>;

    /// Attach an evaluation to an existing guide.
    ///
    /// # Errors
    ///
    /// - `GuideNotFound` if no guide exists for the pair
    async fn record_evaluation(
        &self,
        session_id: &SessionId,
        topic: &Topic,
        evaluation: Evaluation,
    ) -> Result<DrawingGuide, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_are_object_safe() {
        fn _metadata(_store: &dyn TopicMetadataStore) {}
        fn _guides(_store: &dyn DrawingGuideStore) {}
    }
}
