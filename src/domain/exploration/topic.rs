//! Topics and the named groups they are drawn from.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Minimum number of topics a group must hold to be offered.
pub const MIN_GROUP_SIZE: usize = 3;

/// Maximum number of topics kept per group.
pub const MAX_GROUP_SIZE: usize = 9;

/// Name of the group substituted when generation output is unusable.
pub const DEFAULT_GROUP_NAME: &str = "easy";

/// Topics of the default group, also used when a pool is exhausted.
pub const DEFAULT_TOPICS: [&str; 3] = ["apple", "banana", "pear"];

/// A drawing subject, identified by its canonical name.
///
/// Canonical form is the trimmed name with inner whitespace collapsed.
/// Comparison is case-insensitive so "Apple" and "apple" are one topic.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Topic(String);

impl Topic {
    /// Creates a topic from a raw name.
    pub fn new(name: impl AsRef<str>) -> Result<Self, ValidationError> {
        let canonical = name
            .as_ref()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if canonical.is_empty() {
            return Err(ValidationError::empty_field("topic"));
        }
        Ok(Self(canonical))
    }

    /// Returns the canonical name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lower-cased key used for equality, hashing and storage lookups.
    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }
}

impl PartialEq for Topic {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl std::hash::Hash for Topic {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Topic {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Topic> for String {
    fn from(topic: Topic) -> Self {
        topic.0
    }
}

/// A named cluster of related candidate topics.
///
/// # Invariants
///
/// - `name` is non-empty
/// - holds between `MIN_GROUP_SIZE` and `MAX_GROUP_SIZE` distinct topics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicGroup {
    name: String,
    topics: Vec<Topic>,
}

impl TopicGroup {
    /// Builds a group from raw names, dropping blanks and duplicates and
    /// keeping at most `MAX_GROUP_SIZE` topics.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the name is blank
    /// - `OutOfRange` if fewer than `MIN_GROUP_SIZE` usable topics remain
    pub fn new<I, S>(name: impl Into<String>, topics: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::empty_field("group_name"));
        }

        let mut seen = HashSet::new();
        let topics: Vec<Topic> = topics
            .into_iter()
            .filter_map(|raw| Topic::new(raw).ok())
            .filter(|topic| seen.insert(topic.key()))
            .take(MAX_GROUP_SIZE)
            .collect();

        if topics.len() < MIN_GROUP_SIZE {
            return Err(ValidationError::out_of_range(
                "group_topics",
                MIN_GROUP_SIZE as i64,
                MAX_GROUP_SIZE as i64,
                topics.len() as i64,
            ));
        }

        Ok(Self { name, topics })
    }

    /// The fixed group used whenever generated groups are unusable.
    pub fn default_group() -> Self {
        Self {
            name: DEFAULT_GROUP_NAME.to_string(),
            topics: default_topics(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// Topics of this group not present in `excluded`.
    pub fn unseen<'a>(&'a self, excluded: &'a [Topic]) -> impl Iterator<Item = &'a Topic> + 'a {
        self.topics.iter().filter(move |t| !excluded.contains(t))
    }

    /// True when fewer than `k` unseen topics remain.
    pub fn is_exhausted(&self, excluded: &[Topic], k: usize) -> bool {
        self.unseen(excluded).count() < k
    }
}

/// The default fallback topic set.
pub fn default_topics() -> Vec<Topic> {
    DEFAULT_TOPICS
        .iter()
        .map(|name| Topic(name.to_string()))
        .collect()
}

/// Ordered collection of groups generated for one episode.
///
/// Order is preserved from the generator so "first available group" is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicGroups {
    groups: Vec<TopicGroup>,
}

impl TopicGroups {
    /// Builds a collection, keeping the first group of each name.
    pub fn new(groups: Vec<TopicGroup>) -> Self {
        let mut seen = HashSet::new();
        let groups = groups
            .into_iter()
            .filter(|g| seen.insert(g.name().to_lowercase()))
            .collect();
        Self { groups }
    }

    /// Collection holding only the default group.
    pub fn fallback() -> Self {
        Self {
            groups: vec![TopicGroup::default_group()],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TopicGroup> {
        self.groups.iter()
    }

    /// Looks a group up by name, ignoring case and surrounding whitespace.
    pub fn get(&self, name: &str) -> Option<&TopicGroup> {
        let wanted = name.trim().to_lowercase();
        self.groups.iter().find(|g| g.name().to_lowercase() == wanted)
    }

    /// Names of groups that can still yield `k` unseen topics.
    pub fn available_names(&self, excluded: &[Topic], k: usize) -> Vec<String> {
        self.groups
            .iter()
            .filter(|g| !g.is_exhausted(excluded, k))
            .map(|g| g.name().to_string())
            .collect()
    }

    /// Adds groups whose names are not yet present.
    pub fn merge(&mut self, other: TopicGroups) {
        for group in other.groups {
            if self.get(group.name()).is_none() {
                self.groups.push(group);
            }
        }
    }
}
