//! HTTP handlers for session drawing guides.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{handle_domain_error, ErrorResponse};
use crate::application::handlers::{
    GetDrawingGuideHandler, GetDrawingGuideQuery, RecordEvaluationCommand, RecordEvaluationHandler,
};
use crate::domain::exploration::Topic;
use crate::domain::foundation::SessionId;

use super::dto::EvaluationRequest;

#[derive(Clone)]
pub struct GuideHandlers {
    get_handler: Arc<GetDrawingGuideHandler>,
    evaluation_handler: Arc<RecordEvaluationHandler>,
}

impl GuideHandlers {
    pub fn new(
        get_handler: Arc<GetDrawingGuideHandler>,
        evaluation_handler: Arc<RecordEvaluationHandler>,
    ) -> Self {
        Self {
            get_handler,
            evaluation_handler,
        }
    }
}

fn parse_path(session_id: &str, topic: &str) -> Result<(SessionId, Topic), Response> {
    let session_id = SessionId::new(session_id).map_err(|e| {
        ErrorResponse::bad_request(e.to_string())
            .with_detail("field", "sessionId")
            .into_response_with(StatusCode::BAD_REQUEST)
    })?;
    let topic = Topic::new(topic).map_err(|e| {
        ErrorResponse::bad_request(e.to_string())
            .with_detail("field", "topic")
            .into_response_with(StatusCode::BAD_REQUEST)
    })?;
    Ok((session_id, topic))
}

/// GET /sessions/:session_id/guides/:topic - The session's guide
pub async fn get_guide(
    State(handlers): State<GuideHandlers>,
    Path((session_id, topic)): Path<(String, String)>,
) -> Response {
    let (session_id, topic) = match parse_path(&session_id, &topic) {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };

    match handlers.get_handler.handle(GetDrawingGuideQuery { session_id, topic }).await {
        Ok(guide) => (StatusCode::OK, Json(guide)).into_response(),
        Err(e) => handle_domain_error(e),
    }
}

/// POST /sessions/:session_id/guides/:topic/evaluation - Attach an evaluation
pub async fn record_evaluation(
    State(handlers): State<GuideHandlers>,
    Path((session_id, topic)): Path<(String, String)>,
    Json(req): Json<EvaluationRequest>,
) -> Response {
    let (session_id, topic) = match parse_path(&session_id, &topic) {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };

    let cmd = RecordEvaluationCommand {
        session_id,
        topic,
        score: req.score,
        feedback: req.feedback,
    };
    match handlers.evaluation_handler.handle(cmd).await {
        Ok(guide) => (StatusCode::OK, Json(guide)).into_response(),
        Err(e) => handle_domain_error(e),
    }
}
