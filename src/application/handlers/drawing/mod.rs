//! Drawing guide command and query handlers.

mod get_drawing_guide;
mod get_topic_metadata;
mod record_evaluation;

pub use get_drawing_guide::{GetDrawingGuideHandler, GetDrawingGuideQuery};
pub use get_topic_metadata::{GetTopicMetadataHandler, GetTopicMetadataQuery, TopicMetadataView};
pub use record_evaluation::{RecordEvaluationCommand, RecordEvaluationHandler};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockImageGenerator};
    use crate::adapters::llm::LlmGuideWriter;
    use crate::adapters::memory::{InMemoryDrawingGuideStore, InMemoryTopicMetadataStore};
    use crate::adapters::storage::InMemoryObjectStorage;
    use crate::application::services::{MetadataCollaborators, RetryPolicy, TopicMetadataCache};
    use crate::domain::exploration::Topic;
    use crate::domain::foundation::{ErrorCode, SessionId};
    use std::sync::Arc;

    fn cache() -> TopicMetadataCache {
        TopicMetadataCache::new(
            MetadataCollaborators {
                metadata: Arc::new(InMemoryTopicMetadataStore::new()),
                guides: Arc::new(InMemoryDrawingGuideStore::new()),
                images: Arc::new(MockImageGenerator::new()),
                storage: Arc::new(InMemoryObjectStorage::default()),
                writer: Arc::new(LlmGuideWriter::new(Arc::new(MockAIProvider::new()), "English")),
            },
            RetryPolicy::default(),
            None,
        )
    }

    fn query() -> GetDrawingGuideQuery {
        GetDrawingGuideQuery {
            session_id: SessionId::new("s1").unwrap(),
            topic: Topic::new("boat").unwrap(),
        }
    }

    #[tokio::test]
    async fn unbound_guide_is_not_found() {
        let err = GetDrawingGuideHandler::new(cache()).handle(query()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::GuideNotFound);
    }

    #[tokio::test]
    async fn evaluation_is_recorded_on_the_session_guide() {
        let cache = cache();
        let q = query();
        let metadata = cache.generate(&q.topic).await.unwrap();
        cache.bind_guide(&q.session_id, &metadata).await.unwrap();

        let updated = RecordEvaluationHandler::new(cache.clone())
            .handle(RecordEvaluationCommand {
                session_id: q.session_id.clone(),
                topic: q.topic.clone(),
                score: 85,
                feedback: "Lovely sails".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(updated.evaluation.as_ref().map(|e| e.score()), Some(85));

        let fetched = GetDrawingGuideHandler::new(cache).handle(q).await.unwrap();
        assert_eq!(fetched.evaluation.unwrap().feedback(), "Lovely sails");
    }

    #[tokio::test]
    async fn out_of_range_score_is_rejected() {
        let q = query();
        let err = RecordEvaluationHandler::new(cache())
            .handle(RecordEvaluationCommand {
                session_id: q.session_id,
                topic: q.topic,
                score: 140,
                feedback: String::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn evaluating_without_guide_is_not_found() {
        let q = query();
        let err = RecordEvaluationHandler::new(cache())
            .handle(RecordEvaluationCommand {
                session_id: q.session_id,
                topic: q.topic,
                score: 50,
                feedback: "ok".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::GuideNotFound);
    }
}
