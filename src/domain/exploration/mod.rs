//! Topic exploration: the select → confirm dialogue.

mod classification;
mod errors;
mod phase;
mod selector;
mod session;
mod topic;
mod transition;

pub mod utterance;

pub use classification::{ClassificationInput, ClassificationResult};
pub use errors::ExplorationError;
pub use phase::ExplorationPhase;
pub use selector::{recommend_group, resolve_group_choice, sample_topics, TopicSample};
pub use session::ExplorationSession;
pub use topic::{
    default_topics, Topic, TopicGroup, TopicGroups, DEFAULT_GROUP_NAME, DEFAULT_TOPICS,
    MAX_GROUP_SIZE, MIN_GROUP_SIZE,
};
pub use transition::{decide, ExplorationMove};
