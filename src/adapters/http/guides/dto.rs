//! Request bodies for guide endpoints.

use serde::Deserialize;

/// POST /sessions/:session_id/guides/:topic/evaluation body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    pub score: u32,
    #[serde(default)]
    pub feedback: String,
}
