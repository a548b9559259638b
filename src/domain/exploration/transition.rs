//! The select → confirm decision.
//!
//! Given the session as it stands and what the classifier heard, pick the
//! branch to execute. Side effects (sampling, metadata, persistence) are
//! the orchestrator's job; this module only decides.

use super::classification::ClassificationResult;
use super::errors::ExplorationError;
use super::phase::ExplorationPhase;
use super::session::ExplorationSession;
use super::topic::Topic;

/// The branch chosen for one non-first exploration step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExplorationMove {
    /// Ask the user to confirm this topic.
    Propose(Topic),
    /// The pending topic was affirmed.
    Confirm(Topic),
    /// Offer topics from a different group.
    SwitchGroup,
    /// Offer more topics from the current group.
    MoreTopics,
}

impl ExplorationMove {
    pub fn name(&self) -> &'static str {
        match self {
            ExplorationMove::Propose(_) => "propose",
            ExplorationMove::Confirm(_) => "confirm",
            ExplorationMove::SwitchGroup => "switch_group",
            ExplorationMove::MoreTopics => "more_topics",
        }
    }
}

/// Decides the next move.
///
/// Precedence:
/// 1. a named topic is always a new proposal, even if it equals the pending one
/// 2. a confirmation needs a pending topic in `AwaitingConfirmation`
/// 3. an explicit category change switches group
/// 4. anything else asks for more topics
///
/// # Errors
///
/// - `InvalidState` when a confirmation arrives without a pending topic
pub fn decide(
    session: &ExplorationSession,
    result: &ClassificationResult,
) -> Result<ExplorationMove, ExplorationError> {
    if let Some(topic) = result.selected() {
        return Ok(ExplorationMove::Propose(topic));
    }

    if result.confirmed_topic {
        return match (session.phase(), session.pending_topic()) {
            (ExplorationPhase::AwaitingConfirmation, Some(topic)) => {
                Ok(ExplorationMove::Confirm(topic.clone()))
            }
            (phase, None) => Err(ExplorationError::invalid_state(
                session.id(),
                format!("confirmation requested with no pending topic (phase {})", phase),
            )),
            (phase, Some(_)) => Err(ExplorationError::invalid_state(
                session.id(),
                format!("confirmation requested in phase {}", phase),
            )),
        };
    }

    if result.wants_different_group {
        return Ok(ExplorationMove::SwitchGroup);
    }

    Ok(ExplorationMove::MoreTopics)
}
