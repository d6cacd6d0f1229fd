//! Socratic Planner - walks a player through the question plan.
//!
//! The planner works in three steps:
//! 1. **Select**: Find the first slot in plan order below its item threshold
//! 2. **Ingest**: Split a free-text answer into items and append them
//! 3. **Check**: Recompute whether the position may enter a debate
//!
//! Selection thresholds depend on the stage mode; the completeness rule does
//! not. A deep-mode player can be complete while questions remain.

mod plan;

pub use plan::*;

use civic_rules::{
    Language, PlannerConfig, PreparedPosition, SlotKey, StageMode, TopicId, DEEP_MIN_ITEMS_FLOOR,
};
use serde::Serialize;
use tracing::debug;

/// A selected question with its display text resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextQuestion {
    /// The question, carrying both language variants.
    pub question: &'static SocraticQuestion,
    /// Text in the requested language.
    pub text: &'static str,
}

/// Chooses the next question for a position.
#[derive(Debug, Clone, Default)]
pub struct SocraticPlanner {
    config: PlannerConfig,
}

impl SocraticPlanner {
    /// Create a planner with the given configuration.
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Create a planner with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(PlannerConfig::default())
    }

    /// Items a list slot needs before its question stops being asked.
    ///
    /// Deep mode never asks for fewer than [`DEEP_MIN_ITEMS_FLOOR`] items,
    /// even with an unvalidated config.
    pub fn required_items(&self, question: &SocraticQuestion, mode: StageMode) -> usize {
        match mode {
            StageMode::Deep => question
                .min_items
                .max(self.config.deep_min_items)
                .max(DEEP_MIN_ITEMS_FLOOR),
            StageMode::Lightning => question.min_items,
        }
    }

    /// First unanswered question in plan order, or None when every slot
    /// meets its threshold.
    ///
    /// The language only picks the display text; selection ignores it.
    pub fn next_question(
        &self,
        position: &PreparedPosition,
        language: Language,
    ) -> Option<NextQuestion> {
        SOCRATIC_PLAN
            .iter()
            .find(|question| self.is_unanswered(question, position))
            .map(|question| NextQuestion {
                question,
                text: question.text(language),
            })
    }

    fn is_unanswered(&self, question: &SocraticQuestion, position: &PreparedPosition) -> bool {
        if question.key == SlotKey::Summary {
            return !position.has_summary();
        }
        position.count(question.key) < self.required_items(question, position.mode)
    }
}

/// Create an empty position for a topic.
pub fn create_empty_prepared(topic_id: TopicId, mode: StageMode) -> PreparedPosition {
    PreparedPosition::new(topic_id, mode)
}

/// Next question using the default planner thresholds.
pub fn next_question(position: &PreparedPosition, language: Language) -> Option<NextQuestion> {
    SocraticPlanner::with_defaults().next_question(position, language)
}

/// Ingest a free-text answer into a slot.
///
/// Blank answers are ignored. A summary answer replaces the summary; any
/// other answer is split on newlines and semicolons and each non-empty
/// fragment is appended in order.
pub fn add_answer(position: &mut PreparedPosition, key: SlotKey, answer: &str) {
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        debug!(slot = %key, "Ignoring blank answer");
        return;
    }

    if key == SlotKey::Summary {
        position.set_summary(trimmed);
        return;
    }

    let fragments: Vec<&str> = trimmed
        .split(['\n', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    debug!(slot = %key, items = fragments.len(), "Appending answer items");
    position.append_items(key, fragments);
}

/// Whether the position has a belief, action, mechanism and outcome plus a
/// summary. Mode-independent.
pub fn is_complete(position: &PreparedPosition) -> bool {
    position.has_required_content()
}
