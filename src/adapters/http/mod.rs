//! HTTP adapters - REST API implementations.
//!
//! Each use case has its own module with dto, handlers, and routes.

pub mod error;
pub mod guides;
pub mod topics;
pub mod welcome;

use axum::{routing::get, Json, Router};
use serde_json::json;

pub use error::ErrorResponse;
pub use guides::{guide_routes, GuideHandlers};
pub use topics::{topic_routes, TopicHandlers};
pub use welcome::{welcome_routes, WelcomeHandlers};

/// Handler state for every API module.
#[derive(Clone)]
pub struct ApiHandlers {
    pub topics: TopicHandlers,
    pub welcome: WelcomeHandlers,
    pub guides: GuideHandlers,
}

/// GET /health
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Every API route, without middleware.
pub fn api_router(handlers: ApiHandlers) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(topic_routes(handlers.topics))
        .merge(welcome_routes(handlers.welcome))
        .merge(guide_routes(handlers.guides))
}
