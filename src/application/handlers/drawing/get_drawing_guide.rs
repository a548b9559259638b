//! GetDrawingGuideHandler - Query handler for a session's drawing guide.

use crate::application::services::TopicMetadataCache;
use crate::domain::drawing::DrawingGuide;
use crate::domain::exploration::Topic;
use crate::domain::foundation::{DomainError, ErrorCode, SessionId};

/// Query for the guide a session confirmed.
#[derive(Debug, Clone)]
pub struct GetDrawingGuideQuery {
    pub session_id: SessionId,
    pub topic: Topic,
}

/// Handler for drawing guide queries.
pub struct GetDrawingGuideHandler {
    cache: TopicMetadataCache,
}

impl GetDrawingGuideHandler {
    pub fn new(cache: TopicMetadataCache) -> Self {
        Self { cache }
    }

    pub async fn handle(&self, query: GetDrawingGuideQuery) -> Result<DrawingGuide, DomainError> {
        self.cache
            .guide(&query.session_id, &query.topic)
            .await
            .map_err(|e| DomainError::new(ErrorCode::StorageError, e.to_string()))?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::GuideNotFound,
                    format!("no guide for topic '{}' in session {}", query.topic, query.session_id),
                )
            })
    }
}
