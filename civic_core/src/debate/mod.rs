//! Debate Synthesizer - assembles a three-phase transcript from positions.
//!
//! Every player speaks once per phase, in input order:
//! 1. **Opening**: Summary (or first actions), then mechanisms, then outcomes
//! 2. **Rebuttal**: Raises the previous player's first risk, restates own plan
//! 3. **Closing**: First belief, first risk, first metric
//!
//! Rebuttal targets form a ring: player `i` answers player `i - 1`, and the
//! first player answers the last.

use civic_rules::{DebateRole, DebateTurn, Player, PlayerId, PreparedPosition, SlotKey, TopicId};

/// A player paired with their position on the debated topic.
#[derive(Debug, Clone, Copy)]
pub struct Debater<'a> {
    pub id: PlayerId,
    pub position: &'a PreparedPosition,
}

impl<'a> Debater<'a> {
    pub fn new(id: PlayerId, position: &'a PreparedPosition) -> Self {
        Self { id, position }
    }

    /// Pair a player with their complete position on a topic.
    pub fn for_topic(player: &'a Player, topic_id: &TopicId) -> Option<Self> {
        player
            .profile(topic_id)
            .filter(|position| position.is_complete())
            .map(|position| Self::new(player.id, position))
    }
}

/// Join up to `max` items as sentences, dropping leading bullet markers.
fn sentences_from(items: &[String], max: usize) -> String {
    let used: Vec<&str> = items.iter().take(max).map(|s| strip_bullet(s)).collect();
    if used.is_empty() {
        return String::new();
    }
    format!("{}.", used.join(". "))
}

fn strip_bullet(item: &str) -> &str {
    match item.strip_prefix(['-', '*']) {
        Some(rest) => rest.trim_start(),
        None => item,
    }
}

/// Join the non-empty parts with single spaces.
fn join_parts(parts: impl IntoIterator<Item = String>) -> String {
    parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn labelled(label: &str, value: Option<&str>) -> String {
    match value {
        Some(value) if !value.is_empty() => format!("{label}: {value}"),
        _ => String::new(),
    }
}

fn opening_statement(position: &PreparedPosition) -> String {
    let intro = if position.has_summary() {
        position.summary().to_string()
    } else {
        sentences_from(position.items(SlotKey::Actions), 2)
    };
    let why = sentences_from(position.items(SlotKey::Mechanisms), 2);
    let outcomes = sentences_from(position.items(SlotKey::Outcomes), 2);
    join_parts([intro, why, outcomes])
}

fn rebuttal_against(target: &PreparedPosition, speaker: &PreparedPosition) -> String {
    let plan = speaker
        .first(SlotKey::Mechanisms)
        .or_else(|| speaker.first(SlotKey::Actions));
    join_parts([
        labelled("I am concerned about", target.first(SlotKey::Tradeoffs)),
        labelled("My plan focuses on", plan),
        labelled("We'll check success by", speaker.first(SlotKey::Metrics)),
    ])
}

fn closing_statement(position: &PreparedPosition) -> String {
    join_parts([
        labelled("We believe", position.first(SlotKey::Beliefs)),
        labelled("We will monitor risks", position.first(SlotKey::Tradeoffs)),
        labelled("Measured by", position.first(SlotKey::Metrics)),
    ])
}

/// Build the opening, rebuttal and closing phases for the debaters.
///
/// Output depends only on the positions, so identical input yields an
/// identical transcript.
pub fn build_debate_transcript(debaters: &[Debater<'_>]) -> Vec<DebateTurn> {
    let n = debaters.len();
    let mut transcript = Vec::with_capacity(n * 3);

    for debater in debaters {
        transcript.push(DebateTurn {
            player_id: debater.id,
            text: opening_statement(debater.position),
            role: DebateRole::Opening,
        });
    }

    for (i, debater) in debaters.iter().enumerate() {
        let target = &debaters[rebuttal_target(i, n)];
        transcript.push(DebateTurn {
            player_id: debater.id,
            text: rebuttal_against(target.position, debater.position),
            role: DebateRole::Rebuttal,
        });
    }

    for debater in debaters {
        transcript.push(DebateTurn {
            player_id: debater.id,
            text: closing_statement(debater.position),
            role: DebateRole::Closing,
        });
    }

    transcript
}

/// Index of the player a debater rebuts, for a field of `n` debaters.
pub fn rebuttal_target(index: usize, n: usize) -> usize {
    (index + n - 1) % n
}
