//! HTTP handlers for topic endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{handle_exploration_error, handle_metadata_error, ErrorResponse};
use crate::application::handlers::{ExploreTopicsHandler, GetTopicMetadataHandler, GetTopicMetadataQuery};
use crate::domain::exploration::Topic;

use super::dto::{ExploreRequest, ExploreResponse, MetadataStatusResponse};

#[derive(Clone)]
pub struct TopicHandlers {
    explore_handler: Arc<ExploreTopicsHandler>,
    metadata_handler: Arc<GetTopicMetadataHandler>,
}

impl TopicHandlers {
    pub fn new(
        explore_handler: Arc<ExploreTopicsHandler>,
        metadata_handler: Arc<GetTopicMetadataHandler>,
    ) -> Self {
        Self {
            explore_handler,
            metadata_handler,
        }
    }
}

/// POST /topics/explore - One step of the topic dialogue
pub async fn explore_topics(
    State(handlers): State<TopicHandlers>,
    Json(req): Json<ExploreRequest>,
) -> Response {
    let cmd = match req.into_command() {
        Ok(cmd) => cmd,
        Err(body) => return body.into_response_with(StatusCode::BAD_REQUEST),
    };

    match handlers.explore_handler.handle(cmd).await {
        Ok(result) => (StatusCode::OK, Json(ExploreResponse::from(result))).into_response(),
        Err(e) => handle_exploration_error(e),
    }
}

/// GET /topics/:topic/metadata - Generation status and, once ready, the metadata
pub async fn get_topic_metadata(
    State(handlers): State<TopicHandlers>,
    Path(topic): Path<String>,
) -> Response {
    let topic = match Topic::new(&topic) {
        Ok(topic) => topic,
        Err(e) => {
            return ErrorResponse::bad_request(e.to_string()).into_response_with(StatusCode::BAD_REQUEST)
        }
    };

    match handlers.metadata_handler.handle(GetTopicMetadataQuery { topic }).await {
        Ok(view) => (StatusCode::OK, Json(MetadataStatusResponse::from(view))).into_response(),
        Err(e) => handle_metadata_error(e),
    }
}
