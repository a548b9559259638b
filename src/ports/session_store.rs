//! Exploration session store port.
//!
//! The store exclusively owns session records. Writes go through `upsert`,
//! which applies a mutation as one atomic read-modify-write per session key.

use async_trait::async_trait;

use crate::domain::exploration::{ExplorationError, ExplorationSession};
use crate::domain::foundation::SessionId;

/// Mutation applied by [`SessionStore::upsert`].
///
/// Receives the current record (if any) and returns the record to store.
/// Returning an error leaves the stored record untouched.
pub type SessionMutator = Box<
    dyn FnOnce(Option<ExplorationSession>) -> Result<ExplorationSession, ExplorationError> + Send,
>;

/// Port for exploration session persistence.
///
/// Implementations must:
/// - serialize `upsert` per session key (no lost updates)
/// - increment the session version on every successful write
/// - never let one session's write block another session's for longer
///   than the write itself
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Find a session by its ID.
    async fn get(&self, id: &SessionId) -> Result<Option<ExplorationSession>, ExplorationError>;

    /// Atomically read, mutate and write one session.
    ///
    /// # Errors
    ///
    /// - whatever the mutator returns
    /// - `Storage` on persistence failure
    async fn upsert(
        &self,
        id: &SessionId,
        mutator: SessionMutator,
    ) -> Result<ExplorationSession, ExplorationError>;

    /// Forget a session; removing an unknown id is not an error.
    async fn remove(&self, id: &SessionId) -> Result<(), ExplorationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn SessionStore) {}
    }
}
