//! Feedback Generator - highlights and improvements from a position.
//!
//! Feedback is independent of the vote outcome, and both lists can be
//! non-empty at once.

use civic_rules::{FeedbackConfig, PlayerFeedback, PreparedPosition, SlotKey};

/// Produces qualitative feedback for a player.
#[derive(Debug, Clone, Default)]
pub struct FeedbackGenerator {
    config: FeedbackConfig,
}

impl FeedbackGenerator {
    pub fn new(config: FeedbackConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(FeedbackConfig::default())
    }

    /// Derive up to four highlights and four improvements.
    pub fn generate(&self, position: &PreparedPosition) -> PlayerFeedback {
        let mut feedback = PlayerFeedback::default();

        let highlights = [
            (position.has_summary(), "Your summary made the plan clear."),
            (
                position.count(SlotKey::Mechanisms) > 0,
                "You explained why your actions would work.",
            ),
            (
                position.count(SlotKey::Metrics) > 0,
                "You proposed a way to measure success.",
            ),
            (
                position.count(SlotKey::Tradeoffs) > 0,
                "You acknowledged risks and tradeoffs.",
            ),
        ];

        let summary_chars = position.summary().trim().chars().count();
        let improvements = [
            (
                position.count(SlotKey::Actions) == 0,
                "Add at least one concrete action.",
            ),
            (
                position.count(SlotKey::Mechanisms) == 0,
                "Explain the causal link from action to outcome.",
            ),
            (
                position.count(SlotKey::Metrics) == 0,
                "Add a metric to track if it works.",
            ),
            (
                summary_chars < self.config.summary_min_chars,
                "Write a 2-3 sentence summary in your own words.",
            ),
        ];

        feedback.highlights = collect_applicable(&highlights);
        feedback.improvements = collect_applicable(&improvements);
        feedback
    }
}

fn collect_applicable(rules: &[(bool, &str)]) -> Vec<String> {
    rules
        .iter()
        .filter(|(applies, _)| *applies)
        .map(|(_, text)| text.to_string())
        .collect()
}

/// Feedback using default thresholds.
pub fn generate_feedback(position: &PreparedPosition) -> PlayerFeedback {
    FeedbackGenerator::with_defaults().generate(position)
}
