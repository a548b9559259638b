//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Services hold the cross-cutting pieces (retries, per-session locks,
//! metadata jobs) that several handlers share.

pub mod handlers;
pub mod services;

pub use handlers::{
    ExploreSettings, ExploreTopicsCommand, ExploreTopicsHandler, ExploreTopicsResult,
    GetDrawingGuideHandler, GetTopicMetadataHandler, RecordEvaluationHandler, WelcomeHandler,
};
pub use services::{RetryPolicy, SessionLocks, TopicMetadataCache};
