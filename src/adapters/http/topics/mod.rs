//! HTTP adapter for topic exploration and metadata status.

mod dto;
mod handlers;
mod routes;

pub use dto::{ExploreRequest, ExploreResponse, MetadataDto, MetadataStatusResponse, TopicsField};
pub use handlers::TopicHandlers;
pub use routes::topic_routes;
