//! In-memory topic metadata and drawing guide stores.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::drawing::{DrawingGuide, Evaluation, TopicMetadata};
use crate::domain::exploration::Topic;
use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::ports::{DrawingGuideStore, TopicMetadataStore};

/// Topic metadata keyed by the topic's lower-cased key.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTopicMetadataStore {
    entries: Arc<RwLock<HashMap<String, TopicMetadata>>>,
}

impl InMemoryTopicMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl TopicMetadataStore for InMemoryTopicMetadataStore {
    async fn get(&self, topic: &Topic) -> Result<Option<TopicMetadata>, DomainError> {
        Ok(self.entries.read().await.get(&topic.key()).cloned())
    }

    async fn put(&self, metadata: TopicMetadata) -> Result<(), DomainError> {
        self.entries
            .write()
            .await
            .insert(metadata.topic.key(), metadata);
        Ok(())
    }
}

/// Drawing guides keyed by (session, topic key).
#[derive(Debug, Clone, Default)]
pub struct InMemoryDrawingGuideStore {
    guides: Arc<RwLock<HashMap<(SessionId, String), DrawingGuide>>>,
}

impl InMemoryDrawingGuideStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DrawingGuideStore for InMemoryDrawingGuideStore {
    async fn get(
        &self,
        session_id: &SessionId,
        topic: &Topic,
    ) -> Result<Option<DrawingGuide>, DomainError> {
        let key = (session_id.clone(), topic.key());
        Ok(self.guides.read().await.get(&key).cloned())
    }

    async fn put(&self, guide: DrawingGuide) -> Result<(), DomainError> {
        let key = (guide.session_id.clone(), guide.topic.key());
        self.guides.write().await.insert(key, guide);
        Ok(())
    }

    async fn record_evaluation(
        &self,
        session_id: &SessionId,
        topic: &Topic,
        evaluation: Evaluation,
    ) -> Result<DrawingGuide, DomainError> {
        let key = (session_id.clone(), topic.key());
        let mut guides = self.guides.write().await;
        let guide = guides.get_mut(&key).ok_or_else(|| {
            DomainError::new(
                ErrorCode::GuideNotFound,
                format!("no guide for topic '{}' in session {}", topic, session_id),
            )
        })?;
        guide.record_evaluation(evaluation);
        Ok(guide.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::drawing::{default_guide_steps, ImageRef};

    fn metadata(name: &str) -> TopicMetadata {
        let topic = Topic::new(name).unwrap();
        TopicMetadata::new(
            topic.clone(),
            ImageRef {
                url: format!("http://cdn/{}.png", name),
                key: format!("topics/{}.png", name),
            },
            default_guide_steps(&topic),
        )
    }

    #[tokio::test]
    async fn metadata_lookup_ignores_case() {
        let store = InMemoryTopicMetadataStore::new();
        store.put(metadata("Pear")).await.unwrap();

        let found = store.get(&Topic::new("pear").unwrap()).await.unwrap();
        assert!(found.is_some());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn guides_are_scoped_per_session() {
        let store = InMemoryDrawingGuideStore::new();
        let s1 = SessionId::new("s1").unwrap();
        let s2 = SessionId::new("s2").unwrap();
        store.put(DrawingGuide::from_metadata(s1.clone(), &metadata("pear"))).await.unwrap();

        let pear = Topic::new("pear").unwrap();
        assert!(store.get(&s1, &pear).await.unwrap().is_some());
        assert!(store.get(&s2, &pear).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn record_evaluation_updates_existing_guide() {
        let store = InMemoryDrawingGuideStore::new();
        let s1 = SessionId::new("s1").unwrap();
        let pear = Topic::new("pear").unwrap();
        store.put(DrawingGuide::from_metadata(s1.clone(), &metadata("pear"))).await.unwrap();

        let updated = store
            .record_evaluation(&s1, &pear, Evaluation::new(72, "nice curves").unwrap())
            .await
            .unwrap();
        assert_eq!(updated.evaluation.unwrap().score(), 72);
    }

    #[tokio::test]
    async fn record_evaluation_without_guide_is_not_found() {
        let store = InMemoryDrawingGuideStore::new();
        let err = store
            .record_evaluation(
                &SessionId::new("s1").unwrap(),
                &Topic::new("pear").unwrap(),
                Evaluation::new(50, "ok").unwrap(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::GuideNotFound);
    }
}
