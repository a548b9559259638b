//! Conversation log shared by the welcome and exploration dialogues.

mod turn;

pub use turn::{collect_interests, last_exploration_turn, ConversationTurn, NewTurn, TurnKind};
