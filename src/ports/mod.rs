//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Store Ports
//!
//! - `SessionStore` - Exploration sessions, atomic per-session upsert
//! - `ConversationStore` - Append-only conversation log
//! - `TopicMetadataStore` / `DrawingGuideStore` - Generated guides
//! - `ObjectStorage` - Durable image storage
//!
//! ## Collaborator Ports
//!
//! - `AIProvider` / `ImageGenerator` - Generative text and images
//! - `TopicGroupGenerator` / `GroupChooser` - Topic groups
//! - `IntentClassifier` - Reply classification
//! - `GuideWriter` - Drawing guides and encouragement
//! - `WelcomeResponder` - Welcome dialogue

mod ai_provider;
mod conversation_store;
mod guide_writer;
mod intent_classifier;
mod metadata_store;
mod object_storage;
mod session_store;
mod topic_generator;
mod welcome_responder;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, GeneratedImage, ImageGenerator,
    ImageRequest, Message, MessageRole, RequestMetadata,
};
pub use conversation_store::ConversationStore;
pub use guide_writer::GuideWriter;
pub use intent_classifier::IntentClassifier;
pub use metadata_store::{DrawingGuideStore, TopicMetadataStore};
pub use object_storage::{ObjectStorage, ObjectStorageError};
pub use session_store::{SessionMutator, SessionStore};
pub use topic_generator::{GroupChooser, TopicGroupGenerator};
pub use welcome_responder::{Attendance, WelcomeReply, WelcomeResponder};
