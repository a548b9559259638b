//! Per-session serialization of exploration steps.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::foundation::SessionId;

/// Idle locks are pruned once the table grows past this size.
const PRUNE_THRESHOLD: usize = 1024;

/// One async mutex per session id.
///
/// Holding the guard serializes requests for that session only; other
/// sessions proceed independently.
#[derive(Debug, Clone, Default)]
pub struct SessionLocks {
    locks: Arc<Mutex<HashMap<SessionId, Arc<Mutex<()>>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for and takes the lock of `session_id`.
    pub async fn acquire(&self, session_id: &SessionId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            if locks.len() > PRUNE_THRESHOLD {
                locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            }
            locks.entry(session_id.clone()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of tracked sessions.
    pub async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }
}
