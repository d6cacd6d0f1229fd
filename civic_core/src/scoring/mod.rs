//! Scoring & Voting Engine - completeness scores, simulated votes, awards.
//!
//! Each debater votes for the other debater with the highest completeness
//! score. A candidate wins only with strictly more votes than everyone else;
//! a shared top count means no winner and no award.

mod tally;

pub use tally::*;

use civic_rules::{DebateTurn, PlayerId, PreparedPosition, ScoringConfig, SlotKey, Vote};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::debate::Debater;

/// Heuristic thoroughness of a position, 0..=10.
///
/// 2 for a summary, up to 3 for actions, up to 3 for mechanisms, 1 for any
/// metric and 1 for any tradeoff.
pub fn completeness_score(position: &PreparedPosition) -> u32 {
    let mut score = 0;
    if position.has_summary() {
        score += 2;
    }
    score += position.count(SlotKey::Actions).min(3) as u32;
    score += position.count(SlotKey::Mechanisms).min(3) as u32;
    if position.count(SlotKey::Metrics) > 0 {
        score += 1;
    }
    if position.count(SlotKey::Tradeoffs) > 0 {
        score += 1;
    }
    score
}

/// Why a voter picked a candidate, from the candidate's own content.
fn justification(candidate: &PreparedPosition) -> String {
    let mut parts = Vec::new();
    if candidate.has_summary() {
        parts.push(format!("Clear plan: {}", candidate.summary()));
    }
    if let Some(mechanism) = candidate.first(SlotKey::Mechanisms) {
        parts.push(format!("Reasoning: {mechanism}"));
    }
    if let Some(metric) = candidate.first(SlotKey::Metrics) {
        parts.push(format!("Measurement: {metric}"));
    }
    if let Some(tradeoff) = candidate.first(SlotKey::Tradeoffs) {
        parts.push(format!("Risk awareness: {tradeoff}"));
    }
    parts.join(" ")
}

/// Votes, winner and point deltas for one debate round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoteOutcome {
    pub votes: Vec<Vote>,
    pub winner: Option<PlayerId>,
    /// Every participant has an entry; only a unique winner is non-zero.
    pub scores_awarded: BTreeMap<PlayerId, i64>,
}

/// Simulates voting and awards points.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Create an engine with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ScoringConfig::default())
    }

    /// Simulate one vote per debater, pick the unique winner and compute
    /// point deltas.
    ///
    /// Votes depend only on positions; the transcript is only logged.
    pub fn compute_votes_and_scores(
        &self,
        debaters: &[Debater<'_>],
        transcript: &[DebateTurn],
    ) -> VoteOutcome {
        let scores: Vec<u32> = debaters
            .iter()
            .map(|d| completeness_score(d.position))
            .collect();

        let votes: Vec<Vote> = debaters
            .iter()
            .map(|voter| Self::cast_vote(voter, debaters, &scores))
            .collect();

        let mut tally: BTreeMap<PlayerId, u32> = BTreeMap::new();
        for candidate in votes.iter().filter_map(|v| v.voted_for) {
            *tally.entry(candidate).or_default() += 1;
        }
        let winner = unique_max(tally.iter().map(|(id, count)| (*id, *count)));

        let mut scores_awarded: BTreeMap<PlayerId, i64> =
            debaters.iter().map(|d| (d.id, 0)).collect();
        if let Some(winner) = winner {
            scores_awarded.insert(winner, self.config.winner_bonus);
        }

        debug!(
            debaters = debaters.len(),
            turns = transcript.len(),
            winner = ?winner,
            "Votes tallied"
        );

        VoteOutcome {
            votes,
            winner,
            scores_awarded,
        }
    }

    /// The voter picks the first other debater with the strictly highest score.
    fn cast_vote(voter: &Debater<'_>, debaters: &[Debater<'_>], scores: &[u32]) -> Vote {
        let mut best: Option<(&Debater<'_>, u32)> = None;
        for (candidate, &score) in debaters.iter().zip(scores) {
            if candidate.id == voter.id {
                continue;
            }
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((candidate, score));
            }
        }

        Vote {
            voter_id: voter.id,
            voted_for: best.map(|(candidate, _)| candidate.id),
            justification: best
                .map(|(candidate, _)| justification(candidate.position))
                .unwrap_or_default(),
        }
    }
}

/// Votes and scores using the default winner bonus.
pub fn compute_votes_and_scores(debaters: &[Debater<'_>], transcript: &[DebateTurn]) -> VoteOutcome {
    ScoringEngine::with_defaults().compute_votes_and_scores(debaters, transcript)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debate::build_debate_transcript;
    use crate::socratic::add_answer;
    use civic_rules::{StageMode, TopicId};
    use uuid::Uuid;

    fn pid(n: u128) -> PlayerId {
        PlayerId::from_uuid(Uuid::from_u128(n))
    }

    fn position(answers: &[(SlotKey, &str)]) -> PreparedPosition {
        let mut p = PreparedPosition::new(TopicId::from("safety"), StageMode::Lightning);
        for (key, answer) in answers {
            add_answer(&mut p, *key, answer);
        }
        p
    }

    fn rich() -> PreparedPosition {
        position(&[
            (SlotKey::Beliefs, "b"),
            (SlotKey::Actions, "a1; a2; a3; a4"),
            (SlotKey::Mechanisms, "m1; m2; m3"),
            (SlotKey::Outcomes, "o"),
            (SlotKey::Tradeoffs, "cost"),
            (SlotKey::Metrics, "attendance"),
            (SlotKey::Summary, "A full plan."),
        ])
    }

    fn thin() -> PreparedPosition {
        position(&[
            (SlotKey::Beliefs, "b"),
            (SlotKey::Actions, "a"),
            (SlotKey::Mechanisms, "m"),
            (SlotKey::Outcomes, "o"),
            (SlotKey::Summary, "Short."),
        ])
    }

    #[test]
    fn test_completeness_score_bounds() {
        assert_eq!(completeness_score(&position(&[])), 0);
        assert_eq!(completeness_score(&rich()), 10);
        assert_eq!(completeness_score(&thin()), 4);
    }

    #[test]
    fn test_justification_order() {
        assert_eq!(
            justification(&rich()),
            "Clear plan: A full plan. Reasoning: m1 Measurement: attendance Risk awareness: cost"
        );
        assert_eq!(justification(&position(&[])), "");
    }

    #[test]
    fn test_two_player_tie_has_no_winner() {
        let (a, b) = (rich(), rich());
        let debaters = [Debater::new(pid(1), &a), Debater::new(pid(2), &b)];
        let transcript = build_debate_transcript(&debaters);
        let outcome = compute_votes_and_scores(&debaters, &transcript);

        assert_eq!(outcome.votes[0].voted_for, Some(pid(2)));
        assert_eq!(outcome.votes[1].voted_for, Some(pid(1)));
        assert_eq!(outcome.winner, None);
        assert_eq!(outcome.scores_awarded, BTreeMap::from([(pid(1), 0), (pid(2), 0)]));
    }

    #[test]
    fn test_unique_winner_gets_bonus() {
        let (a, b, c) = (rich(), thin(), thin());
        let debaters = [
            Debater::new(pid(1), &a),
            Debater::new(pid(2), &b),
            Debater::new(pid(3), &c),
        ];
        let outcome = compute_votes_and_scores(&debaters, &[]);

        // B and C vote for A; A votes for the first of the tied B/C.
        assert_eq!(outcome.votes[0].voted_for, Some(pid(2)));
        assert_eq!(outcome.winner, Some(pid(1)));
        assert_eq!(
            outcome.scores_awarded,
            BTreeMap::from([(pid(1), 3), (pid(2), 0), (pid(3), 0)])
        );
    }

    #[test]
    fn test_first_candidate_wins_score_ties() {
        let (a, b, c) = (thin(), rich(), rich());
        let debaters = [
            Debater::new(pid(1), &a),
            Debater::new(pid(2), &b),
            Debater::new(pid(3), &c),
        ];
        let outcome = compute_votes_and_scores(&debaters, &[]);
        assert_eq!(outcome.votes[0].voted_for, Some(pid(2)));
        assert_eq!(outcome.votes[1].voted_for, Some(pid(3)));
        assert_eq!(outcome.votes[2].voted_for, Some(pid(2)));
        assert_eq!(outcome.winner, Some(pid(2)));
    }

    #[test]
    fn test_lone_voter_has_no_candidate() {
        let a = rich();
        let debaters = [Debater::new(pid(1), &a)];
        let outcome = compute_votes_and_scores(&debaters, &[]);
        assert_eq!(outcome.votes[0].voted_for, None);
        assert_eq!(outcome.votes[0].justification, "");
        assert_eq!(outcome.winner, None);
        assert_eq!(outcome.scores_awarded[&pid(1)], 0);
    }

    #[test]
    fn test_configured_bonus() {
        let (a, b, c) = (rich(), thin(), thin());
        let debaters = [
            Debater::new(pid(1), &a),
            Debater::new(pid(2), &b),
            Debater::new(pid(3), &c),
        ];
        let engine = ScoringEngine::new(ScoringConfig { winner_bonus: 5 });
        let outcome = engine.compute_votes_and_scores(&debaters, &[]);
        assert_eq!(outcome.scores_awarded[&pid(1)], 5);
    }
}
