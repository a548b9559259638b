//! Phases of the select → confirm exploration protocol.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Where a session stands within its exploration episode.
///
/// ```text
/// Init ──► AwaitingSelection ◄──► AwaitingConfirmation ──► Confirmed
///               ▲   │                   │  ▲
///               └───┘                   └──┘
/// ```
///
/// `Confirmed` is terminal; a new episode starts from a fresh session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExplorationPhase {
    #[default]
    Init,
    AwaitingSelection,
    AwaitingConfirmation,
    Confirmed,
}

impl ExplorationPhase {
    /// True while the user is being asked a yes/no question about a topic.
    pub fn expects_confirmation(&self) -> bool {
        matches!(self, Self::AwaitingConfirmation)
    }

    /// Label used in logs and status payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "INIT",
            Self::AwaitingSelection => "AWAITING_SELECTION",
            Self::AwaitingConfirmation => "AWAITING_CONFIRMATION",
            Self::Confirmed => "CONFIRMED",
        }
    }
}

impl StateMachine for ExplorationPhase {
    fn valid_transitions(&self) -> Vec<Self> {
        use ExplorationPhase::*;
        match self {
            Init => vec![AwaitingSelection],
            AwaitingSelection => vec![AwaitingSelection, AwaitingConfirmation],
            AwaitingConfirmation => vec![AwaitingConfirmation, AwaitingSelection, Confirmed],
            Confirmed => vec![],
        }
    }
}

impl std::fmt::Display for ExplorationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
