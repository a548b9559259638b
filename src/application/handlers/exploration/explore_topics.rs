//! ExploreTopicsHandler - one step of the select → confirm dialogue.
//!
//! Every step runs under the session's lock:
//!
//! 1. "first" starts an episode: generate groups, choose one, offer topics
//! 2. otherwise classify the reply and `decide` the move
//! 3. apply the move (propose, confirm, more topics, switch group)
//! 4. persist the session, then append the turn to the conversation log;
//!    if the append fails the stored session is put back as it was

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{
    InterestAggregator, RetryPolicy, SessionLocks, TopicMetadataCache, DEFAULT_INTEREST_WINDOW,
};
use crate::config::MetadataMode;
use crate::domain::conversation::{last_exploration_turn, NewTurn};
use crate::domain::drawing::{MetadataStatus, TopicMetadata};
use crate::domain::exploration::{
    decide, default_topics, recommend_group, resolve_group_choice, sample_topics, utterance,
    ClassificationInput, ClassificationResult, ExplorationError, ExplorationMove,
    ExplorationPhase, ExplorationSession, Topic, TopicGroups, TopicSample, DEFAULT_GROUP_NAME,
};
use crate::domain::foundation::{SessionId, Timestamp};
use crate::ports::{
    ConversationStore, GroupChooser, GuideWriter, IntentClassifier, SessionStore,
    TopicGroupGenerator,
};

/// User utterance that starts a new episode.
pub const FIRST_UTTERANCE: &str = "first";

/// Recent turns scanned for the previous AI utterance.
const CLASSIFICATION_LOOKBACK: usize = 5;

/// Command for one exploration step.
#[derive(Debug, Clone)]
pub struct ExploreTopicsCommand {
    pub session_id: SessionId,
    pub user_name: String,
    pub rejected_count: u32,
    pub user_utterance: String,
    pub is_timed_out: bool,
}

impl ExploreTopicsCommand {
    pub fn is_first(&self) -> bool {
        self.user_utterance.trim().eq_ignore_ascii_case(FIRST_UTTERANCE)
    }
}

/// Topics in a step result: a list while selecting, one topic once proposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicChoice {
    Many(Vec<Topic>),
    One(Topic),
}

impl TopicChoice {
    pub fn as_slice(&self) -> &[Topic] {
        match self {
            TopicChoice::Many(topics) => topics,
            TopicChoice::One(topic) => std::slice::from_ref(topic),
        }
    }
}

/// Whether the step could consult its collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Ok,
    /// A collaborator stayed unavailable; the utterance is an apology and
    /// the session did not move.
    Unavailable,
}

/// Result of one exploration step.
#[derive(Debug, Clone)]
pub struct ExploreTopicsResult {
    pub topics: TopicChoice,
    /// True only on the confirming step.
    pub select: bool,
    pub ai_utterance: String,
    pub metadata: Option<TopicMetadata>,
    pub metadata_status: Option<MetadataStatus>,
    pub status: StepStatus,
    pub phase: ExplorationPhase,
}

/// Tuning for exploration steps.
#[derive(Debug, Clone)]
pub struct ExploreSettings {
    pub sample_size: usize,
    pub interest_window: usize,
    pub metadata_mode: MetadataMode,
    /// Longest a confirmation (or an eager proposal) waits for metadata.
    pub confirm_wait: Duration,
    /// Idle time after which a session is forgotten; 0 disables expiry.
    pub session_ttl_secs: u64,
}

impl Default for ExploreSettings {
    fn default() -> Self {
        Self {
            sample_size: 3,
            interest_window: DEFAULT_INTEREST_WINDOW,
            metadata_mode: MetadataMode::Background,
            confirm_wait: Duration::from_secs(20),
            session_ttl_secs: 3600,
        }
    }
}

/// Ports the exploration step talks to.
pub struct ExplorationCollaborators {
    pub sessions: Arc<dyn SessionStore>,
    pub conversations: Arc<dyn ConversationStore>,
    pub generator: Arc<dyn TopicGroupGenerator>,
    pub chooser: Arc<dyn GroupChooser>,
    pub classifier: Arc<dyn IntentClassifier>,
    pub writer: Arc<dyn GuideWriter>,
}

/// What a move decided, before it is persisted.
struct Step {
    session: ExplorationSession,
    topics: TopicChoice,
    select: bool,
    ai_utterance: String,
    metadata: Option<TopicMetadata>,
    metadata_status: Option<MetadataStatus>,
    status: StepStatus,
}

/// Handler for exploration steps.
pub struct ExploreTopicsHandler {
    sessions: Arc<dyn SessionStore>,
    conversations: Arc<dyn ConversationStore>,
    generator: Arc<dyn TopicGroupGenerator>,
    chooser: Arc<dyn GroupChooser>,
    classifier: Arc<dyn IntentClassifier>,
    writer: Arc<dyn GuideWriter>,
    interests: InterestAggregator,
    metadata: TopicMetadataCache,
    locks: SessionLocks,
    retry: RetryPolicy,
    settings: ExploreSettings,
}

impl ExploreTopicsHandler {
    pub fn new(
        collaborators: ExplorationCollaborators,
        metadata: TopicMetadataCache,
        locks: SessionLocks,
        retry: RetryPolicy,
        settings: ExploreSettings,
    ) -> Self {
        let interests =
            InterestAggregator::new(collaborators.conversations.clone(), settings.interest_window);
        Self {
            sessions: collaborators.sessions,
            conversations: collaborators.conversations,
            generator: collaborators.generator,
            chooser: collaborators.chooser,
            classifier: collaborators.classifier,
            writer: collaborators.writer,
            interests,
            metadata,
            locks,
            retry,
            settings,
        }
    }

    pub async fn handle(
        &self,
        cmd: ExploreTopicsCommand,
    ) -> Result<ExploreTopicsResult, ExplorationError> {
        tracing::info!(
            session_id = %cmd.session_id,
            first = cmd.is_first(),
            rejected_count = cmd.rejected_count,
            timed_out = cmd.is_timed_out,
            "exploration step"
        );

        let _guard = self.locks.acquire(&cmd.session_id).await;

        let stored = self.sessions.get(&cmd.session_id).await?;
        let step = if cmd.is_first() {
            self.start_episode(&cmd, stored.clone()).await?
        } else {
            let session = self.live_session(&cmd.session_id, stored.clone())?;
            self.continue_episode(&cmd, session).await?
        };

        let mut session = step.session;
        session.record_turn();
        let session = self.save(session).await?;

        let mut turn = NewTurn::exploration(
            cmd.session_id.clone(),
            cmd.user_utterance.clone(),
            step.ai_utterance.clone(),
        );
        if session.phase().expects_confirmation() {
            if let Some(pending) = session.pending_topic() {
                turn = turn.with_proposal(pending.clone());
            }
        }
        if let Err(err) = self.conversations.append(turn).await {
            tracing::warn!(session_id = %cmd.session_id, error = %err, "turn not recorded; restoring session");
            self.restore(&cmd.session_id, stored).await;
            return Err(err.into());
        }

        tracing::debug!(
            session_id = %cmd.session_id,
            phase = %session.phase(),
            version = session.version(),
            "exploration step persisted"
        );

        Ok(ExploreTopicsResult {
            topics: step.topics,
            select: step.select,
            ai_utterance: step.ai_utterance,
            metadata: step.metadata,
            metadata_status: step.metadata_status,
            status: step.status,
            phase: session.phase(),
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Episode start
    // ─────────────────────────────────────────────────────────────────────

    async fn start_episode(
        &self,
        cmd: &ExploreTopicsCommand,
        stored: Option<ExplorationSession>,
    ) -> Result<Step, ExplorationError> {
        let interests = self.interests.interests(&cmd.session_id).await?;
        let groups = self.generate_groups(&cmd.session_id, &interests).await;

        let available = groups.available_names(&[], self.settings.sample_size);
        let group = self
            .choose_group(&cmd.session_id, &interests, &available, &[])
            .await;
        let sample = self.sample(&groups, &group, &[]);

        let mut session = stored
            .unwrap_or_else(|| ExplorationSession::new(cmd.session_id.clone(), cmd.user_name.clone()));
        session.begin_episode(cmd.user_name.clone(), groups);
        session.offer(group.clone(), &sample.topics)?;

        tracing::debug!(session_id = %cmd.session_id, group = %group, "episode started");

        Ok(Step {
            ai_utterance: utterance::present_topics(
                &cmd.user_name,
                &sample.topics,
                true,
                cmd.is_timed_out,
            ),
            topics: TopicChoice::Many(sample.topics),
            ..Step::quiet(session)
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Continuing steps
    // ─────────────────────────────────────────────────────────────────────

    fn live_session(
        &self,
        id: &SessionId,
        stored: Option<ExplorationSession>,
    ) -> Result<ExplorationSession, ExplorationError> {
        let session = stored.ok_or_else(|| ExplorationError::SessionNotFound(id.clone()))?;

        let ttl = self.settings.session_ttl_secs;
        if ttl > 0 && session.is_expired(&Timestamp::now(), ttl) {
            tracing::info!(session_id = %id, "session expired");
            return Err(ExplorationError::SessionNotFound(id.clone()));
        }
        if session.phase() == ExplorationPhase::Confirmed {
            return Err(ExplorationError::EpisodeFinished(id.clone()));
        }
        Ok(session)
    }

    async fn continue_episode(
        &self,
        cmd: &ExploreTopicsCommand,
        session: ExplorationSession,
    ) -> Result<Step, ExplorationError> {
        let input = self.classification_input(cmd).await?;

        let result = match self
            .retry
            .run("intent_classifier", || {
                self.classifier.classify(&cmd.session_id, &input)
            })
            .await
        {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(session_id = %cmd.session_id, error = %err, "classifier unavailable; apologising");
                return Ok(self.apology(session));
            }
        };

        let next = decide(&session, &result)?;
        tracing::debug!(
            session_id = %cmd.session_id,
            phase = %session.phase(),
            next = next.name(),
            "exploration move"
        );

        match next {
            ExplorationMove::Propose(topic) => self.propose(session, topic).await,
            ExplorationMove::Confirm(topic) => self.confirm(session, topic).await,
            ExplorationMove::MoreTopics => self.more_topics(session, &result).await,
            ExplorationMove::SwitchGroup => self.switch_group(session).await,
        }
    }

    async fn classification_input(
        &self,
        cmd: &ExploreTopicsCommand,
    ) -> Result<ClassificationInput, ExplorationError> {
        let recent = self
            .conversations
            .recent(&cmd.session_id, CLASSIFICATION_LOOKBACK)
            .await?;
        let last = last_exploration_turn(&recent);

        Ok(ClassificationInput {
            prior_ai_utterance: last.map(|t| t.ai_utterance.clone()),
            user_utterance: cmd.user_utterance.clone(),
            proposed_topic: last
                .and_then(|t| t.proposed_topic.as_ref())
                .map(Topic::to_string),
        })
    }

    async fn propose(&self, mut session: ExplorationSession, topic: Topic) -> Result<Step, ExplorationError> {
        let mut status = self.ensure_metadata(&topic).await;
        if self.settings.metadata_mode == MetadataMode::Eager && status == MetadataStatus::Pending {
            status = self.wait_metadata(&topic).await;
        }

        session.propose(topic.clone())?;
        Ok(Step {
            ai_utterance: utterance::confirmation_question(&topic),
            topics: TopicChoice::One(topic),
            metadata_status: Some(status),
            ..Step::quiet(session)
        })
    }

    async fn confirm(&self, mut session: ExplorationSession, topic: Topic) -> Result<Step, ExplorationError> {
        let mut status = self.ensure_metadata(&topic).await;
        if status == MetadataStatus::Pending {
            status = self.wait_metadata(&topic).await;
        }

        if let MetadataStatus::Failed { reason } = &status {
            tracing::warn!(session_id = %session.id(), topic = %topic, reason = %reason, "metadata failed at confirmation; apologising");
            return Ok(Step {
                ai_utterance: utterance::unavailable_apology(),
                topics: TopicChoice::One(topic),
                metadata_status: Some(status),
                status: StepStatus::Unavailable,
                ..Step::quiet(session)
            });
        }

        let ready = match status {
            MetadataStatus::Ready => self.metadata.get(&topic).await.map_err(storage)?,
            _ => None,
        };
        let Some(metadata) = ready else {
            tracing::info!(session_id = %session.id(), topic = %topic, status = %status, "metadata not ready at confirmation");
            return Ok(Step {
                ai_utterance: utterance::metadata_pending(&topic),
                topics: TopicChoice::One(topic),
                metadata_status: Some(status),
                ..Step::quiet(session)
            });
        };

        let guide = self
            .metadata
            .bind_guide(session.id(), &metadata)
            .await
            .map_err(storage)?;
        let encouragement = match self
            .retry
            .run("encouragement", || {
                self.writer.write_encouragement(session.id(), &topic, &guide.steps)
            })
            .await
        {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(session_id = %session.id(), error = %err, "encouragement unavailable; using template");
                utterance::encouragement_fallback(&topic)
            }
        };

        let confirmed = session.confirm()?;
        tracing::info!(session_id = %session.id(), topic = %confirmed, "topic confirmed");

        Ok(Step {
            ai_utterance: encouragement,
            topics: TopicChoice::One(confirmed),
            select: true,
            metadata: Some(metadata),
            metadata_status: Some(MetadataStatus::Ready),
            ..Step::quiet(session)
        })
    }

    async fn more_topics(
        &self,
        mut session: ExplorationSession,
        result: &ClassificationResult,
    ) -> Result<Step, ExplorationError> {
        if !result.wants_different_topics {
            tracing::debug!(session_id = %session.id(), "unrecognised reply; offering more topics");
        }

        let k = self.settings.sample_size;
        let offered = session.offered_topics().to_vec();
        let current = session.active_group().unwrap_or(DEFAULT_GROUP_NAME).to_string();

        let current_has_room = session
            .topic_groups()
            .get(&current)
            .is_some_and(|g| !g.is_exhausted(&offered, k));

        let (group, sample) = if current_has_room {
            let sample = self.sample(session.topic_groups(), &current, &offered);
            (current.clone(), sample)
        } else {
            let interests = self.interests.interests(session.id()).await?;
            match recommend_group(session.topic_groups(), &interests, &offered, Some(current.as_str()), k) {
                Some(name) => {
                    tracing::debug!(session_id = %session.id(), from = %current, to = %name, "current group exhausted; recommending another");
                    let sample = self.sample(session.topic_groups(), &name, &offered);
                    (name, sample)
                }
                None => {
                    tracing::warn!(session_id = %session.id(), "topic pool exhausted; offering defaults");
                    (current.clone(), fallback_sample(k))
                }
            }
        };

        let ai_utterance = if group == current {
            utterance::present_topics(session.user_name(), &sample.topics, false, false)
        } else {
            utterance::present_group(&group, &sample.topics)
        };
        session.offer(group, &sample.topics)?;

        Ok(Step {
            ai_utterance,
            topics: TopicChoice::Many(sample.topics),
            ..Step::quiet(session)
        })
    }

    async fn switch_group(&self, mut session: ExplorationSession) -> Result<Step, ExplorationError> {
        let k = self.settings.sample_size;
        let offered = session.offered_topics().to_vec();
        let current = session.active_group().map(str::to_string);
        let interests = self.interests.interests(session.id()).await?;

        let others = |groups: &TopicGroups| -> Vec<String> {
            groups
                .available_names(&offered, k)
                .into_iter()
                .filter(|name| current.as_deref().map_or(true, |c| !c.eq_ignore_ascii_case(name)))
                .collect()
        };

        let mut available = others(session.topic_groups());
        if available.is_empty() {
            tracing::debug!(session_id = %session.id(), "no other group left; generating more");
            let fresh = self.generate_groups(session.id(), &interests).await;
            session.merge_groups(fresh);
            available = others(session.topic_groups());
        }

        let (group, sample) = if available.is_empty() {
            tracing::warn!(session_id = %session.id(), "topic pool exhausted; offering defaults");
            (DEFAULT_GROUP_NAME.to_string(), fallback_sample(k))
        } else {
            let group = self
                .choose_group(session.id(), &interests, &available, &offered)
                .await;
            let sample = self.sample(session.topic_groups(), &group, &offered);
            (group, sample)
        };

        let ai_utterance = utterance::present_group(&group, &sample.topics);
        session.offer(group, &sample.topics)?;

        Ok(Step {
            ai_utterance,
            topics: TopicChoice::Many(sample.topics),
            ..Step::quiet(session)
        })
    }

    /// Repeats the current question after a collaborator outage.
    fn apology(&self, session: ExplorationSession) -> Step {
        let topics = match session.pending_topic() {
            Some(topic) if session.phase().expects_confirmation() => TopicChoice::One(topic.clone()),
            _ => TopicChoice::Many(session.last_offer(self.settings.sample_size).to_vec()),
        };
        Step {
            ai_utterance: utterance::unavailable_apology(),
            topics,
            status: StepStatus::Unavailable,
            ..Step::quiet(session)
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Collaborator calls
    // ─────────────────────────────────────────────────────────────────────

    async fn generate_groups(&self, session_id: &SessionId, interests: &[String]) -> TopicGroups {
        match self
            .retry
            .run("topic_groups", || self.generator.generate_groups(session_id, interests))
            .await
        {
            Ok(groups) if !groups.is_empty() => groups,
            Ok(_) => {
                tracing::warn!(session_id = %session_id, "generator returned no groups; using default group");
                TopicGroups::fallback()
            }
            Err(err) => {
                tracing::warn!(session_id = %session_id, error = %err, "group generation unavailable; using default group");
                TopicGroups::fallback()
            }
        }
    }

    /// Picks one of `available`; a single candidate needs no collaborator.
    async fn choose_group(
        &self,
        session_id: &SessionId,
        interests: &[String],
        available: &[String],
        excluded: &[Topic],
    ) -> String {
        let choice = if available.len() > 1 {
            match self
                .retry
                .run("group_choice", || {
                    self.chooser.choose_group(session_id, interests, available, excluded)
                })
                .await
            {
                Ok(choice) => choice,
                Err(err) => {
                    tracing::warn!(session_id = %session_id, error = %err, "group chooser unavailable; taking first group");
                    None
                }
            }
        } else {
            None
        };

        if let Some(picked) = choice.as_deref() {
            if !available.iter().any(|n| n.eq_ignore_ascii_case(picked.trim())) {
                tracing::warn!(session_id = %session_id, choice = %picked, "group choice out of range; taking first group");
            }
        }
        resolve_group_choice(choice.as_deref(), available)
            .unwrap_or_else(|| DEFAULT_GROUP_NAME.to_string())
    }

    fn sample(&self, groups: &TopicGroups, group: &str, excluded: &[Topic]) -> TopicSample {
        let k = self.settings.sample_size;
        let sample = match groups.get(group) {
            Some(g) => sample_topics(g, excluded, k, &mut rand::thread_rng()),
            None => fallback_sample(k),
        };
        if sample.fell_back {
            tracing::warn!(group = %group, "group cannot supply unseen topics; offering defaults");
        }
        sample
    }

    async fn ensure_metadata(&self, topic: &Topic) -> MetadataStatus {
        match self.metadata.ensure(topic).await {
            Ok(status) => status,
            Err(err) => {
                tracing::warn!(topic = %topic, error = %err, "could not start metadata job");
                MetadataStatus::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }

    async fn wait_metadata(&self, topic: &Topic) -> MetadataStatus {
        match self.metadata.wait(topic, self.settings.confirm_wait).await {
            Ok(status) => status,
            Err(err) => MetadataStatus::Failed {
                reason: err.to_string(),
            },
        }
    }

    /// Writes `session` back, refusing if the stored version moved on.
    async fn save(&self, session: ExplorationSession) -> Result<ExplorationSession, ExplorationError> {
        let id = session.id().clone();
        let expected = session.version();
        let conflict_id = id.clone();
        self.sessions
            .upsert(
                &id,
                Box::new(move |stored| {
                    let found = stored.as_ref().map_or(0, ExplorationSession::version);
                    if found != expected {
                        return Err(ExplorationError::invalid_state(
                            &conflict_id,
                            format!("session changed concurrently (expected version {}, found {})", expected, found),
                        ));
                    }
                    Ok(session)
                }),
            )
            .await
    }

    /// Puts `previous` back after a step whose turn could not be recorded.
    async fn restore(&self, id: &SessionId, previous: Option<ExplorationSession>) {
        let restored = match previous {
            Some(previous) => self
                .sessions
                .upsert(id, Box::new(move |_| Ok(previous)))
                .await
                .map(|_| ()),
            None => self.sessions.remove(id).await,
        };
        if let Err(err) = restored {
            tracing::error!(session_id = %id, error = %err, "could not restore session after failed step");
        }
    }
}

impl Step {
    /// A step that offers nothing yet; callers fill in the rest.
    fn quiet(session: ExplorationSession) -> Self {
        Self {
            session,
            topics: TopicChoice::Many(Vec::new()),
            select: false,
            ai_utterance: String::new(),
            metadata: None,
            metadata_status: None,
            status: StepStatus::Ok,
        }
    }
}

fn fallback_sample(k: usize) -> TopicSample {
    TopicSample {
        topics: default_topics().into_iter().take(k).collect(),
        fell_back: true,
    }
}

fn storage(err: impl std::fmt::Display) -> ExplorationError {
    ExplorationError::Storage(err.to_string())
}
