//! Topic metadata cache with deduplicated generation jobs.
//!
//! Metadata (reference image plus guide steps) is keyed by topic alone and
//! shared by every session. Generation runs as a background job per topic;
//! the job's progress is published on a `watch` channel so callers can poll
//! `status` or wait a bounded time for it to settle.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{watch, Mutex};

use super::RetryPolicy;
use crate::adapters::llm::purpose;
use crate::domain::drawing::{
    default_guide_steps, image_object_key, DrawingGuide, Evaluation, MetadataStatus,
    TopicMetadata,
};
use crate::domain::exploration::Topic;
use crate::domain::foundation::{DomainError, SessionId, Timestamp};
use crate::ports::{
    AIError, DrawingGuideStore, GuideWriter, ImageGenerator, ImageRequest, ObjectStorage,
    ObjectStorageError, RequestMetadata, TopicMetadataStore,
};

/// Why a metadata job failed.
#[derive(Debug, Clone, Error)]
pub enum MetadataError {
    #[error("image generation failed: {0}")]
    Generation(#[from] AIError),

    #[error("image upload failed: {0}")]
    Upload(#[from] ObjectStorageError),

    #[error("metadata persistence failed: {0}")]
    Store(#[from] DomainError),
}

/// Collaborators used by generation jobs.
pub struct MetadataCollaborators {
    pub metadata: Arc<dyn TopicMetadataStore>,
    pub guides: Arc<dyn DrawingGuideStore>,
    pub images: Arc<dyn ImageGenerator>,
    pub storage: Arc<dyn ObjectStorage>,
    pub writer: Arc<dyn GuideWriter>,
}

struct Inner {
    metadata: Arc<dyn TopicMetadataStore>,
    guides: Arc<dyn DrawingGuideStore>,
    images: Arc<dyn ImageGenerator>,
    storage: Arc<dyn ObjectStorage>,
    writer: Arc<dyn GuideWriter>,
    retry: RetryPolicy,
    image_size: Option<String>,
    jobs: Mutex<HashMap<String, watch::Receiver<MetadataStatus>>>,
}

/// Lazily generated, shared topic metadata.
#[derive(Clone)]
pub struct TopicMetadataCache {
    inner: Arc<Inner>,
}

impl TopicMetadataCache {
    /// `image_size` is passed to the image generator (e.g. "1024x1024").
    pub fn new(
        collaborators: MetadataCollaborators,
        retry: RetryPolicy,
        image_size: Option<String>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                metadata: collaborators.metadata,
                guides: collaborators.guides,
                images: collaborators.images,
                storage: collaborators.storage,
                writer: collaborators.writer,
                retry,
                image_size,
                jobs: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Stored metadata for `topic`, if generated.
    pub async fn get(&self, topic: &Topic) -> Result<Option<TopicMetadata>, MetadataError> {
        Ok(self.inner.metadata.get(topic).await?)
    }

    /// Current generation status of `topic`.
    pub async fn status(&self, topic: &Topic) -> Result<MetadataStatus, MetadataError> {
        if let Some(status) = self.job_status(topic).await {
            return Ok(status);
        }
        Ok(match self.inner.metadata.get(topic).await? {
            Some(_) => MetadataStatus::Ready,
            None => MetadataStatus::Missing,
        })
    }

    /// Starts generation for `topic` unless it is stored or already running.
    ///
    /// At most one job per topic runs at a time, whichever session asks.
    pub async fn ensure(&self, topic: &Topic) -> Result<MetadataStatus, MetadataError> {
        match self.job_status(topic).await {
            Some(MetadataStatus::Ready) => return Ok(MetadataStatus::Ready),
            Some(MetadataStatus::Pending) => return Ok(MetadataStatus::Pending),
            _ => {}
        }
        if self.inner.metadata.get(topic).await?.is_some() {
            return Ok(MetadataStatus::Ready);
        }

        let mut jobs = self.inner.jobs.lock().await;
        if let Some(rx) = jobs.get(&topic.key()) {
            let status = live_status(rx);
            if matches!(status, MetadataStatus::Pending | MetadataStatus::Ready) {
                return Ok(status);
            }
        }

        let (tx, rx) = watch::channel(MetadataStatus::Pending);
        jobs.insert(topic.key(), rx);
        drop(jobs);

        tracing::info!(topic = %topic, "starting topic metadata job");
        let cache = self.clone();
        let topic = topic.clone();
        tokio::spawn(async move {
            let status = match cache.generate(&topic).await {
                Ok(_) => MetadataStatus::Ready,
                Err(err) => {
                    tracing::warn!(topic = %topic, error = %err, "topic metadata job failed");
                    MetadataStatus::Failed {
                        reason: err.to_string(),
                    }
                }
            };
            let ready = status == MetadataStatus::Ready;
            tx.send_replace(status);
            if ready {
                cache.forget_settled(&topic).await;
            }
        });

        Ok(MetadataStatus::Pending)
    }

    /// Waits up to `limit` for a running job on `topic` to settle.
    ///
    /// Returns `Pending` when the limit passes first.
    pub async fn wait(&self, topic: &Topic, limit: Duration) -> Result<MetadataStatus, MetadataError> {
        let rx = self.inner.jobs.lock().await.get(&topic.key()).cloned();
        let Some(mut rx) = rx else {
            return self.status(topic).await;
        };

        let settled = tokio::time::timeout(limit, async move {
            loop {
                let status = rx.borrow_and_update().clone();
                if status.is_settled() {
                    return status;
                }
                if rx.changed().await.is_err() {
                    return live_status(&rx);
                }
            }
        })
        .await;

        Ok(settled.unwrap_or(MetadataStatus::Pending))
    }

    /// Generates, uploads and stores metadata for `topic` right now.
    ///
    /// Does not deduplicate; `ensure` is the entry point for callers.
    pub async fn generate(&self, topic: &Topic) -> Result<TopicMetadata, MetadataError> {
        let inner = &self.inner;
        let prompt = reference_image_prompt(topic);

        let generated = inner
            .retry
            .run("reference_image", || {
                let mut request = ImageRequest::new(prompt.clone(), RequestMetadata::new(purpose::REFERENCE_IMAGE));
                if let Some(size) = &inner.image_size {
                    request = request.with_size(size.clone());
                }
                inner.images.generate_image(request)
            })
            .await?;

        let key = image_object_key(topic, &Timestamp::now());
        let image = inner.storage.upload_from_url(&generated.url, &key).await?;

        let steps = match inner
            .retry
            .run("drawing_guide", || inner.writer.write_guide(topic, &image.url))
            .await
        {
            Ok(steps) => steps,
            Err(err) => {
                tracing::warn!(topic = %topic, error = %err, "guide writer unavailable; using generic guide");
                default_guide_steps(topic)
            }
        };

        let metadata = TopicMetadata::new(topic.clone(), image, steps);
        inner.metadata.put(metadata.clone()).await?;
        tracing::info!(topic = %topic, key = %metadata.image.key, "topic metadata stored");
        Ok(metadata)
    }

    /// Binds `metadata` to `session_id`, creating the session's guide once.
    pub async fn bind_guide(
        &self,
        session_id: &SessionId,
        metadata: &TopicMetadata,
    ) -> Result<DrawingGuide, MetadataError> {
        if let Some(existing) = self.inner.guides.get(session_id, &metadata.topic).await? {
            return Ok(existing);
        }
        let guide = DrawingGuide::from_metadata(session_id.clone(), metadata);
        self.inner.guides.put(guide.clone()).await?;
        Ok(guide)
    }

    /// The session's guide for `topic`, if one was bound.
    pub async fn guide(
        &self,
        session_id: &SessionId,
        topic: &Topic,
    ) -> Result<Option<DrawingGuide>, MetadataError> {
        Ok(self.inner.guides.get(session_id, topic).await?)
    }

    /// Attaches an evaluation to the session's guide for `topic`.
    pub async fn record_evaluation(
        &self,
        session_id: &SessionId,
        topic: &Topic,
        evaluation: Evaluation,
    ) -> Result<DrawingGuide, MetadataError> {
        Ok(self
            .inner
            .guides
            .record_evaluation(session_id, topic, evaluation)
            .await?)
    }

    /// Drops a job that finished; the store answers for ready topics.
    async fn forget_settled(&self, topic: &Topic) {
        let mut jobs = self.inner.jobs.lock().await;
        if jobs.get(&topic.key()).map(live_status) == Some(MetadataStatus::Ready) {
            jobs.remove(&topic.key());
        }
    }

    #[cfg(test)]
    async fn tracked_jobs(&self) -> usize {
        self.inner.jobs.lock().await.len()
    }

    async fn job_status(&self, topic: &Topic) -> Option<MetadataStatus> {
        self.inner.jobs.lock().await.get(&topic.key()).map(live_status)
    }
}

/// Status of a job receiver; a pending job whose task vanished counts as failed.
fn live_status(rx: &watch::Receiver<MetadataStatus>) -> MetadataStatus {
    let status = rx.borrow().clone();
    if status == MetadataStatus::Pending && rx.has_changed().is_err() {
        return MetadataStatus::Failed {
            reason: "generation job stopped".to_string(),
        };
    }
    status
}

fn reference_image_prompt(topic: &Topic) -> String {
    format!(
        "A simple line drawing of {} for a beginner to copy. \
         Clear black outlines on a white background, minimal shading, no text.",
        topic
    )
}
