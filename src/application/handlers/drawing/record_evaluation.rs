//! RecordEvaluationHandler - Command handler attaching a drawing evaluation.

use crate::application::services::{MetadataError, TopicMetadataCache};
use crate::domain::drawing::{DrawingGuide, Evaluation};
use crate::domain::exploration::Topic;
use crate::domain::foundation::{DomainError, ErrorCode, SessionId};

/// Command carrying the result of an external drawing evaluation.
#[derive(Debug, Clone)]
pub struct RecordEvaluationCommand {
    pub session_id: SessionId,
    pub topic: Topic,
    pub score: u32,
    pub feedback: String,
}

/// Handler for recording evaluations.
pub struct RecordEvaluationHandler {
    cache: TopicMetadataCache,
}

impl RecordEvaluationHandler {
    pub fn new(cache: TopicMetadataCache) -> Self {
        Self { cache }
    }

    pub async fn handle(&self, cmd: RecordEvaluationCommand) -> Result<DrawingGuide, DomainError> {
        let evaluation = Evaluation::new(cmd.score, cmd.feedback)?;
        let guide = self
            .cache
            .record_evaluation(&cmd.session_id, &cmd.topic, evaluation)
            .await
            .map_err(|e| match e {
                MetadataError::Store(inner) => inner,
                other => DomainError::new(ErrorCode::StorageError, other.to_string()),
            })?;
        tracing::info!(session_id = %cmd.session_id, topic = %cmd.topic, score = cmd.score, "evaluation recorded");
        Ok(guide)
    }
}
