//! Application services shared by the handlers.

mod interests;
mod metadata_cache;
mod retry;
mod session_locks;

pub use interests::{InterestAggregator, DEFAULT_INTEREST_WINDOW};
pub use metadata_cache::{MetadataCollaborators, MetadataError, TopicMetadataCache};
pub use retry::RetryPolicy;
pub use session_locks::SessionLocks;
