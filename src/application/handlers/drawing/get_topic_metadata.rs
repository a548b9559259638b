//! GetTopicMetadataHandler - Query handler for a topic's metadata status.

use crate::application::services::{MetadataError, TopicMetadataCache};
use crate::domain::drawing::{MetadataStatus, TopicMetadata};
use crate::domain::exploration::Topic;

/// Query for one topic's metadata.
#[derive(Debug, Clone)]
pub struct GetTopicMetadataQuery {
    pub topic: Topic,
}

/// Status plus the metadata once it is ready.
#[derive(Debug, Clone)]
pub struct TopicMetadataView {
    pub topic: Topic,
    pub status: MetadataStatus,
    pub metadata: Option<TopicMetadata>,
}

/// Handler for metadata status queries.
pub struct GetTopicMetadataHandler {
    cache: TopicMetadataCache,
}

impl GetTopicMetadataHandler {
    pub fn new(cache: TopicMetadataCache) -> Self {
        Self { cache }
    }

    pub async fn handle(&self, query: GetTopicMetadataQuery) -> Result<TopicMetadataView, MetadataError> {
        let status = self.cache.status(&query.topic).await?;
        let metadata = match status {
            MetadataStatus::Ready => self.cache.get(&query.topic).await?,
            _ => None,
        };
        Ok(TopicMetadataView {
            topic: query.topic,
            status,
            metadata,
        })
    }
}
