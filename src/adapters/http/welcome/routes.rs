//! HTTP routes for the welcome conversation.

use axum::{routing::post, Router};

use super::handlers::{welcome, WelcomeHandlers};

pub fn welcome_routes(handlers: WelcomeHandlers) -> Router {
    Router::new()
        .route("/conversation/welcome", post(welcome))
        .with_state(handlers)
}
