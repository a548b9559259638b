//! HTTP handlers for the welcome conversation.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::handle_domain_error;
use crate::application::handlers::WelcomeHandler;

use super::dto::{WelcomeRequest, WelcomeResponse};

#[derive(Clone)]
pub struct WelcomeHandlers {
    welcome_handler: Arc<WelcomeHandler>,
}

impl WelcomeHandlers {
    pub fn new(welcome_handler: Arc<WelcomeHandler>) -> Self {
        Self { welcome_handler }
    }
}

/// POST /conversation/welcome - Chat before exploration
pub async fn welcome(State(handlers): State<WelcomeHandlers>, Json(req): Json<WelcomeRequest>) -> Response {
    let cmd = match req.into_command() {
        Ok(cmd) => cmd,
        Err(body) => return body.into_response_with(StatusCode::BAD_REQUEST),
    };

    match handlers.welcome_handler.handle(cmd).await {
        Ok(result) => (StatusCode::OK, Json(WelcomeResponse::from(result))).into_response(),
        Err(e) => handle_domain_error(e),
    }
}
