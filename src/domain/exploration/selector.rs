//! Group choice and topic sampling.

use rand::seq::SliceRandom;
use rand::Rng;

use super::topic::{default_topics, Topic, TopicGroup, TopicGroups};

/// Result of sampling a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSample {
    pub topics: Vec<Topic>,
    /// True when the group could not supply enough unseen topics and the
    /// default set was returned instead.
    pub fell_back: bool,
}

/// Samples `k` unseen topics from `group` uniformly without replacement.
///
/// Never returns a short list: when fewer than `k` unseen topics remain the
/// default set is returned (truncated to `k`).
pub fn sample_topics<R: Rng + ?Sized>(
    group: &TopicGroup,
    excluded: &[Topic],
    k: usize,
    rng: &mut R,
) -> TopicSample {
    let unseen: Vec<&Topic> = group.unseen(excluded).collect();
    if unseen.len() < k {
        return TopicSample {
            topics: default_topics().into_iter().take(k).collect(),
            fell_back: true,
        };
    }

    TopicSample {
        topics: unseen.choose_multiple(rng, k).map(|t| (*t).clone()).collect(),
        fell_back: false,
    }
}

/// Maps a collaborator's group choice onto an available group name.
///
/// Unknown or missing choices fall back to the first available group.
/// Returns `None` only when nothing is available.
pub fn resolve_group_choice(choice: Option<&str>, available: &[String]) -> Option<String> {
    if let Some(choice) = choice.map(str::trim) {
        if let Some(name) = available.iter().find(|n| n.eq_ignore_ascii_case(choice)) {
            return Some(name.clone());
        }
    }
    available.first().cloned()
}

/// Picks another group for a user whose current group ran dry.
///
/// Candidates are groups other than `current` that still hold `k` unseen
/// topics. Each scores one point per interest found in its name or topics;
/// the highest score wins and ties keep generation order.
pub fn recommend_group(
    groups: &TopicGroups,
    interests: &[String],
    excluded: &[Topic],
    current: Option<&str>,
    k: usize,
) -> Option<String> {
    let interests: Vec<String> = interests
        .iter()
        .map(|i| i.trim().to_lowercase())
        .filter(|i| !i.is_empty())
        .collect();

    let mut best: Option<(&TopicGroup, usize)> = None;
    for group in groups.iter() {
        if current.is_some_and(|c| c.eq_ignore_ascii_case(group.name())) {
            continue;
        }
        if group.is_exhausted(excluded, k) {
            continue;
        }
        let score = overlap(group, &interests);
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((group, score));
        }
    }
    best.map(|(group, _)| group.name().to_string())
}

fn overlap(group: &TopicGroup, interests: &[String]) -> usize {
    let mut haystack: Vec<String> = group.topics().iter().map(Topic::key).collect();
    haystack.push(group.name().to_lowercase());
    interests
        .iter()
        .filter(|interest| {
            haystack
                .iter()
                .any(|word| word.contains(interest.as_str()) || interest.contains(word.as_str()))
        })
        .count()
}
