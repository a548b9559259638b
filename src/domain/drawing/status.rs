//! Generation status of a topic's metadata.

use serde::{Deserialize, Serialize};

/// Where a topic's metadata generation stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum MetadataStatus {
    /// Never generated and no job running.
    Missing,
    /// A job is running.
    Pending,
    /// Metadata is stored.
    Ready,
    /// The last job failed; a new request will start another.
    Failed { reason: String },
}

impl MetadataStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataStatus::Missing => "missing",
            MetadataStatus::Pending => "pending",
            MetadataStatus::Ready => "ready",
            MetadataStatus::Failed { .. } => "failed",
        }
    }

    /// True once no more progress will happen without a new request.
    pub fn is_settled(&self) -> bool {
        !matches!(self, MetadataStatus::Pending)
    }
}

impl std::fmt::Display for MetadataStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
