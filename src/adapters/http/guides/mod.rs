//! HTTP adapter for session drawing guides.

mod dto;
mod handlers;
mod routes;

pub use dto::EvaluationRequest;
pub use handlers::GuideHandlers;
pub use routes::guide_routes;
