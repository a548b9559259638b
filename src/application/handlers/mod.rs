//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod conversation;
pub mod drawing;
pub mod exploration;

pub use conversation::{WelcomeCommand, WelcomeHandler, WelcomeResult};
pub use drawing::{
    GetDrawingGuideHandler, GetDrawingGuideQuery, GetTopicMetadataHandler, GetTopicMetadataQuery,
    RecordEvaluationCommand, RecordEvaluationHandler, TopicMetadataView,
};
pub use exploration::{
    ExplorationCollaborators, ExploreSettings, ExploreTopicsCommand, ExploreTopicsHandler,
    ExploreTopicsResult, StepStatus, TopicChoice, FIRST_UTTERANCE,
};
