//! Exploration command handlers.

mod explore_topics;

pub use explore_topics::{
    ExplorationCollaborators, ExploreSettings, ExploreTopicsCommand, ExploreTopicsHandler,
    ExploreTopicsResult, StepStatus, TopicChoice, FIRST_UTTERANCE,
};
