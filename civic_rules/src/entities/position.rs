//! Prepared positions - a player's structured stance on one topic.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::TopicId;
use crate::mechanics::StageMode;

/// Content slots of a prepared position, in questioning order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKey {
    /// Beliefs about the current state of the world.
    Beliefs,
    /// Proposed actions.
    Actions,
    /// Causal mediators linking actions to outcomes.
    Mechanisms,
    /// Intended outcomes.
    Outcomes,
    /// Anecdotes and experience.
    Evidence,
    /// Risks and downsides.
    Tradeoffs,
    /// How success would be measured.
    Metrics,
    /// Short synthesis in the player's own words.
    Summary,
}

impl SlotKey {
    /// Every slot, in questioning order.
    pub const ALL: [SlotKey; 8] = [
        SlotKey::Beliefs,
        SlotKey::Actions,
        SlotKey::Mechanisms,
        SlotKey::Outcomes,
        SlotKey::Evidence,
        SlotKey::Tradeoffs,
        SlotKey::Metrics,
        SlotKey::Summary,
    ];

    /// Whether this slot holds a list of items rather than a single text.
    pub fn is_list(&self) -> bool {
        !matches!(self, SlotKey::Summary)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SlotKey::Beliefs => "beliefs",
            SlotKey::Actions => "actions",
            SlotKey::Mechanisms => "mechanisms",
            SlotKey::Outcomes => "outcomes",
            SlotKey::Evidence => "evidence",
            SlotKey::Tradeoffs => "tradeoffs",
            SlotKey::Metrics => "metrics",
            SlotKey::Summary => "summary",
        }
    }
}

impl std::fmt::Display for SlotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a slot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown slot key: {0}")]
pub struct UnknownSlotKey(pub String);

impl FromStr for SlotKey {
    type Err = UnknownSlotKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SlotKey::ALL
            .iter()
            .copied()
            .find(|slot| slot.as_str() == s)
            .ok_or_else(|| UnknownSlotKey(s.to_string()))
    }
}

/// One player's prepared position on one topic.
///
/// List items are always non-empty trimmed text. The `complete` flag is
/// recomputed from content on every mutation and cannot be set directly;
/// deserialization normalizes items and ignores any stored flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredPosition")]
pub struct PreparedPosition {
    pub topic_id: TopicId,
    pub mode: StageMode,
    beliefs: Vec<String>,
    actions: Vec<String>,
    mechanisms: Vec<String>,
    outcomes: Vec<String>,
    evidence: Vec<String>,
    tradeoffs: Vec<String>,
    metrics: Vec<String>,
    summary: String,
    complete: bool,
}

/// Wire form of a position as read from storage.
#[derive(Deserialize)]
struct StoredPosition {
    topic_id: TopicId,
    mode: StageMode,
    #[serde(default)]
    beliefs: Vec<String>,
    #[serde(default)]
    actions: Vec<String>,
    #[serde(default)]
    mechanisms: Vec<String>,
    #[serde(default)]
    outcomes: Vec<String>,
    #[serde(default)]
    evidence: Vec<String>,
    #[serde(default)]
    tradeoffs: Vec<String>,
    #[serde(default)]
    metrics: Vec<String>,
    #[serde(default)]
    summary: String,
}

impl From<StoredPosition> for PreparedPosition {
    fn from(stored: StoredPosition) -> Self {
        let mut position = PreparedPosition::new(stored.topic_id, stored.mode);
        position.append_items(SlotKey::Beliefs, stored.beliefs);
        position.append_items(SlotKey::Actions, stored.actions);
        position.append_items(SlotKey::Mechanisms, stored.mechanisms);
        position.append_items(SlotKey::Outcomes, stored.outcomes);
        position.append_items(SlotKey::Evidence, stored.evidence);
        position.append_items(SlotKey::Tradeoffs, stored.tradeoffs);
        position.append_items(SlotKey::Metrics, stored.metrics);
        position.set_summary(&stored.summary);
        position
    }
}

impl PreparedPosition {
    /// Create an empty position for a topic.
    pub fn new(topic_id: TopicId, mode: StageMode) -> Self {
        Self {
            topic_id,
            mode,
            beliefs: Vec::new(),
            actions: Vec::new(),
            mechanisms: Vec::new(),
            outcomes: Vec::new(),
            evidence: Vec::new(),
            tradeoffs: Vec::new(),
            metrics: Vec::new(),
            summary: String::new(),
            complete: false,
        }
    }

    /// Items stored in a list slot. The summary slot has no items.
    pub fn items(&self, slot: SlotKey) -> &[String] {
        match slot {
            SlotKey::Beliefs => &self.beliefs,
            SlotKey::Actions => &self.actions,
            SlotKey::Mechanisms => &self.mechanisms,
            SlotKey::Outcomes => &self.outcomes,
            SlotKey::Evidence => &self.evidence,
            SlotKey::Tradeoffs => &self.tradeoffs,
            SlotKey::Metrics => &self.metrics,
            SlotKey::Summary => &[],
        }
    }

    fn items_mut(&mut self, slot: SlotKey) -> Option<&mut Vec<String>> {
        match slot {
            SlotKey::Beliefs => Some(&mut self.beliefs),
            SlotKey::Actions => Some(&mut self.actions),
            SlotKey::Mechanisms => Some(&mut self.mechanisms),
            SlotKey::Outcomes => Some(&mut self.outcomes),
            SlotKey::Evidence => Some(&mut self.evidence),
            SlotKey::Tradeoffs => Some(&mut self.tradeoffs),
            SlotKey::Metrics => Some(&mut self.metrics),
            SlotKey::Summary => None,
        }
    }

    /// First item of a list slot, if any.
    pub fn first(&self, slot: SlotKey) -> Option<&str> {
        self.items(slot).first().map(String::as_str)
    }

    /// Number of items in a list slot.
    pub fn count(&self, slot: SlotKey) -> usize {
        self.items(slot).len()
    }

    /// The summary text.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Whether the summary holds anything besides whitespace.
    pub fn has_summary(&self) -> bool {
        !self.summary.trim().is_empty()
    }

    /// Append items to a list slot, keeping insertion order.
    ///
    /// Items are trimmed and empty ones dropped. Appending to the summary
    /// slot does nothing; use [`PreparedPosition::set_summary`].
    pub fn append_items<I, S>(&mut self, slot: SlotKey, items: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if let Some(list) = self.items_mut(slot) {
            list.extend(
                items
                    .into_iter()
                    .map(|item| item.as_ref().trim().to_string())
                    .filter(|item| !item.is_empty()),
            );
        }
        self.refresh_completeness();
    }

    /// Replace the summary with trimmed text.
    pub fn set_summary(&mut self, text: &str) {
        self.summary = text.trim().to_string();
        self.refresh_completeness();
    }

    /// Whether the content satisfies the debate entry rule: at least one
    /// belief, action, mechanism and outcome plus a non-empty summary.
    /// Evidence, tradeoffs and metrics are not required.
    pub fn has_required_content(&self) -> bool {
        !self.beliefs.is_empty()
            && !self.actions.is_empty()
            && !self.mechanisms.is_empty()
            && !self.outcomes.is_empty()
            && self.has_summary()
    }

    /// Whether the position may enter a debate.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    fn refresh_completeness(&mut self) {
        self.complete = self.has_required_content();
    }
}
