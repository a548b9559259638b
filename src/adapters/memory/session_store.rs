//! In-memory exploration session store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::exploration::{ExplorationError, ExplorationSession};
use crate::domain::foundation::SessionId;
use crate::ports::{SessionMutator, SessionStore};

/// Session records keyed by session id.
///
/// `upsert` runs its (synchronous) mutator under the map's write lock, so
/// each read-modify-write is atomic and no lock is held across an await.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, ExplorationSession>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, id: &SessionId) -> Result<Option<ExplorationSession>, ExplorationError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn upsert(
        &self,
        id: &SessionId,
        mutator: SessionMutator,
    ) -> Result<ExplorationSession, ExplorationError> {
        let mut sessions = self.sessions.write().await;
        let current = sessions.get(id).cloned();
        let previous_version = current.as_ref().map_or(0, ExplorationSession::version);

        let mut updated = mutator(current)?;
        if updated.id() != id {
            return Err(ExplorationError::invalid_state(
                id,
                format!("mutator returned session {}", updated.id()),
            ));
        }
        updated.stamp_version(previous_version + 1);

        sessions.insert(id.clone(), updated.clone());
        Ok(updated)
    }

    async fn remove(&self, id: &SessionId) -> Result<(), ExplorationError> {
        self.sessions.write().await.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::exploration::{Topic, TopicGroups};

    fn sid(s: &str) -> SessionId {
        SessionId::new(s).unwrap()
    }

    fn create(id: SessionId) -> SessionMutator {
        Box::new(move |current| {
            Ok(current.unwrap_or_else(|| ExplorationSession::new(id, "Kim")))
        })
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let store = InMemorySessionStore::new();
        assert!(store.get(&sid("nope")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upsert_creates_and_bumps_version() {
        let store = InMemorySessionStore::new();
        let first = store.upsert(&sid("s1"), create(sid("s1"))).await.unwrap();
        assert_eq!(first.version(), 1);

        let second = store.upsert(&sid("s1"), create(sid("s1"))).await.unwrap();
        assert_eq!(second.version(), 2);
        assert_eq!(store.get(&sid("s1")).await.unwrap().unwrap().version(), 2);
    }

    #[tokio::test]
    async fn failed_mutator_leaves_record_untouched() {
        let store = InMemorySessionStore::new();
        store.upsert(&sid("s1"), create(sid("s1"))).await.unwrap();

        let result = store
            .upsert(
                &sid("s1"),
                Box::new(|current| {
                    let mut s = current.unwrap();
                    s.confirm()?;
                    Ok(s)
                }),
            )
            .await;

        assert!(matches!(result, Err(ExplorationError::InvalidState { .. })));
        assert_eq!(store.get(&sid("s1")).await.unwrap().unwrap().version(), 1);
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = InMemorySessionStore::new();
        store.upsert(&sid("a"), create(sid("a"))).await.unwrap();
        store
            .upsert(
                &sid("b"),
                Box::new(|_| {
                    let mut s = ExplorationSession::new(SessionId::new("b").unwrap(), "Lee");
                    s.begin_episode("Lee", TopicGroups::fallback());
                    s.offer("easy", &[Topic::new("apple").unwrap()])?;
                    Ok(s)
                }),
            )
            .await
            .unwrap();

        let a = store.get(&sid("a")).await.unwrap().unwrap();
        assert!(a.offered_topics().is_empty());
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn concurrent_upserts_lose_no_updates() {
        let store = InMemorySessionStore::new();
        store.upsert(&sid("s1"), create(sid("s1"))).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .upsert(
                        &sid("s1"),
                        Box::new(|current| {
                            let mut s = current.unwrap();
                            s.record_turn();
                            Ok(s)
                        }),
                    )
                    .await
                    .unwrap();
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        let s = store.get(&sid("s1")).await.unwrap().unwrap();
        assert_eq!(s.turn_count(), 20);
        assert_eq!(s.version(), 21);
    }

    #[tokio::test]
    async fn remove_forgets_only_that_session() {
        let store = InMemorySessionStore::new();
        store.upsert(&sid("a"), create(sid("a"))).await.unwrap();
        store.upsert(&sid("b"), create(sid("b"))).await.unwrap();

        store.remove(&sid("a")).await.unwrap();
        store.remove(&sid("missing")).await.unwrap();

        assert!(store.get(&sid("a")).await.unwrap().is_none());
        assert!(store.get(&sid("b")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn mismatched_id_is_rejected() {
        let store = InMemorySessionStore::new();
        let result = store.upsert(&sid("s1"), create(sid("other"))).await;
        assert!(result.is_err());
        assert!(store.is_empty().await);
    }
}
