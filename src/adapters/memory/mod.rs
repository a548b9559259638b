//! In-memory store adapters.

mod conversation_store;
mod guide_store;
mod session_store;

pub use conversation_store::InMemoryConversationStore;
pub use guide_store::{InMemoryDrawingGuideStore, InMemoryTopicMetadataStore};
pub use session_store::InMemorySessionStore;
