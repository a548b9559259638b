//! Spoken lines the exploration flow produces itself.
//!
//! Only the encouragement on confirmation is written by the text
//! collaborator; everything here is deterministic.

use super::topic::Topic;

/// Joins topics as "a, b or c".
pub fn list_topics(topics: &[Topic]) -> String {
    match topics {
        [] => String::new(),
        [only] => only.to_string(),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(Topic::as_str).collect();
            format!("{} or {}", head.join(", "), last)
        }
    }
}

/// Presents a fresh set of topics.
///
/// The first offer of an episode addresses the user by name; if the user
/// has been idle for a while it nudges them to begin first.
pub fn present_topics(user_name: &str, topics: &[Topic], first: bool, timed_out: bool) -> String {
    let listed = list_topics(topics);
    match (first, timed_out) {
        (true, true) => format!(
            "{}, shall we start drawing now? How about one of these: {}?",
            user_name, listed
        ),
        (true, false) => format!(
            "{}, what would you like to draw today? How about {}?",
            user_name, listed
        ),
        (false, _) => format!("Then how about {}?", listed),
    }
}

/// Presents topics from a different group.
pub fn present_group(group: &str, topics: &[Topic]) -> String {
    format!(
        "Let's try something from {}. How about {}?",
        group,
        list_topics(topics)
    )
}

pub fn confirmation_question(topic: &Topic) -> String {
    format!("Is {} the one you'd like to draw?", topic)
}

pub fn encouragement_fallback(topic: &Topic) -> String {
    format!(
        "Wonderful, let's draw {} together! Start with the big shapes first and take your time.",
        topic
    )
}

pub fn metadata_pending(topic: &Topic) -> String {
    format!(
        "Great choice! I'm still preparing the guide for {}. Please wait a moment and tell me when you're ready.",
        topic
    )
}

pub fn unavailable_apology() -> String {
    "I'm sorry, I didn't quite catch that just now. Could you say it once more?".to_string()
}
