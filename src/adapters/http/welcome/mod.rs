//! HTTP adapter for the welcome conversation.

mod dto;
mod handlers;
mod routes;

pub use dto::{WelcomeRequest, WelcomeResponse};
pub use handlers::WelcomeHandlers;
pub use routes::welcome_routes;
