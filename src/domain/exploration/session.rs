//! Exploration session aggregate.
//!
//! One record per client session id. The session store owns these records
//! exclusively; everything else reads a snapshot and hands back a mutation.

use serde::{Deserialize, Serialize};

use super::errors::ExplorationError;
use super::phase::ExplorationPhase;
use super::topic::{Topic, TopicGroups};
use crate::domain::foundation::{SessionId, StateMachine, Timestamp};

/// Per-session exploration state.
///
/// # Invariants
///
/// - `offered_topics` holds no duplicates and only grows within an episode
/// - `pending_topic` is set whenever `phase` is `AwaitingConfirmation`
/// - `Confirmed` is only reached from `AwaitingConfirmation` with a pending topic
/// - `version` increases by one on every persisted write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorationSession {
    id: SessionId,
    user_name: String,
    phase: ExplorationPhase,
    offered_topics: Vec<Topic>,
    pending_topic: Option<Topic>,
    active_group: Option<String>,
    topic_groups: TopicGroups,
    turn_count: u32,
    version: u64,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl ExplorationSession {
    /// Creates a session in the `Init` phase.
    pub fn new(id: SessionId, user_name: impl Into<String>) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            user_name: user_name.into(),
            phase: ExplorationPhase::Init,
            offered_topics: Vec::new(),
            pending_topic: None,
            active_group: None,
            topic_groups: TopicGroups::default(),
            turn_count: 0,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn phase(&self) -> ExplorationPhase {
        self.phase
    }

    pub fn offered_topics(&self) -> &[Topic] {
        &self.offered_topics
    }

    pub fn pending_topic(&self) -> Option<&Topic> {
        self.pending_topic.as_ref()
    }

    pub fn active_group(&self) -> Option<&str> {
        self.active_group.as_deref()
    }

    pub fn topic_groups(&self) -> &TopicGroups {
        &self.topic_groups
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// The most recent offer, i.e. the last `k` offered topics.
    pub fn last_offer(&self, k: usize) -> &[Topic] {
        let start = self.offered_topics.len().saturating_sub(k);
        &self.offered_topics[start..]
    }

    /// True when the session has been idle longer than `ttl_secs`.
    pub fn is_expired(&self, now: &Timestamp, ttl_secs: u64) -> bool {
        let ttl = i64::try_from(ttl_secs).unwrap_or(i64::MAX);
        now.duration_since(&self.updated_at).num_seconds() > ttl
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Starts a new episode: forgets offers, pending topic and groups.
    ///
    /// The turn counter keeps counting across episodes.
    pub fn begin_episode(&mut self, user_name: impl Into<String>, groups: TopicGroups) {
        self.user_name = user_name.into();
        self.phase = ExplorationPhase::Init;
        self.offered_topics.clear();
        self.pending_topic = None;
        self.active_group = None;
        self.topic_groups = groups;
        self.touch();
    }

    /// Records topics offered from `group` and waits for a selection.
    ///
    /// Clears any pending topic; topics already offered are not duplicated.
    pub fn offer(&mut self, group: impl Into<String>, topics: &[Topic]) -> Result<(), ExplorationError> {
        self.phase = self.checked_transition(ExplorationPhase::AwaitingSelection)?;
        for topic in topics {
            if !self.offered_topics.contains(topic) {
                self.offered_topics.push(topic.clone());
            }
        }
        self.pending_topic = None;
        self.active_group = Some(group.into());
        self.touch();
        Ok(())
    }

    /// Proposes `topic` for confirmation, replacing any pending topic.
    pub fn propose(&mut self, topic: Topic) -> Result<(), ExplorationError> {
        self.phase = self.checked_transition(ExplorationPhase::AwaitingConfirmation)?;
        self.pending_topic = Some(topic);
        self.touch();
        Ok(())
    }

    /// Confirms the pending topic and ends the episode.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if no topic is pending or the session is not
    ///   awaiting a confirmation
    pub fn confirm(&mut self) -> Result<Topic, ExplorationError> {
        let topic = self.pending_topic.clone().ok_or_else(|| {
            ExplorationError::invalid_state(&self.id, "confirmation requested with no pending topic")
        })?;
        self.phase = self.checked_transition(ExplorationPhase::Confirmed)?;
        self.touch();
        Ok(topic)
    }

    /// Adds groups generated mid-episode (after the current pool ran dry).
    pub fn merge_groups(&mut self, groups: TopicGroups) {
        self.topic_groups.merge(groups);
        self.touch();
    }

    /// Counts one handled request.
    pub fn record_turn(&mut self) {
        self.turn_count += 1;
        self.touch();
    }

    /// Called by session stores on every persisted write.
    pub fn stamp_version(&mut self, version: u64) {
        self.version = version;
    }

    fn checked_transition(&self, target: ExplorationPhase) -> Result<ExplorationPhase, ExplorationError> {
        self.phase
            .transition_to(target)
            .map_err(|e| ExplorationError::invalid_state(&self.id, e.to_string()))
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}
