//! HTTP routes for session drawing guides.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_guide, record_evaluation, GuideHandlers};

pub fn guide_routes(handlers: GuideHandlers) -> Router {
    Router::new()
        .route("/sessions/:session_id/guides/:topic", get(get_guide))
        .route(
            "/sessions/:session_id/guides/:topic/evaluation",
            post(record_evaluation),
        )
        .with_state(handlers)
}
