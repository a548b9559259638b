//! HTTP routes for topic endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{explore_topics, get_topic_metadata, TopicHandlers};

pub fn topic_routes(handlers: TopicHandlers) -> Router {
    Router::new()
        .route("/topics/explore", post(explore_topics))
        .route("/topics/:topic/metadata", get(get_topic_metadata))
        .with_state(handlers)
}
