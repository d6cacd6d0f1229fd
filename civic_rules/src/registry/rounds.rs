//! Round records - debate results and forecast rounds.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entities::{PlayerId, RoundId, TopicId};
use crate::mechanics::DebateRole;

/// One generated statement in a debate transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateTurn {
    pub player_id: PlayerId,
    /// Assembled only from player-supplied content.
    pub text: String,
    pub role: DebateRole,
}

/// A simulated vote cast by one debater.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub voter_id: PlayerId,
    /// None only when the voter had nobody else to vote for.
    pub voted_for: Option<PlayerId>,
    /// Built only from the chosen candidate's own content.
    pub justification: String,
}

/// Qualitative feedback for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlayerFeedback {
    pub highlights: Vec<String>,
    pub improvements: Vec<String>,
}

/// The immutable outcome of one debate round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundResult {
    pub round_id: RoundId,
    pub topic_id: TopicId,
    pub transcript: Vec<DebateTurn>,
    pub votes: Vec<Vote>,
    /// None when the top vote count is shared.
    pub winner: Option<PlayerId>,
    /// Point delta for every participant, zero entries included.
    pub scores_awarded: BTreeMap<PlayerId, i64>,
    pub feedback: BTreeMap<PlayerId, PlayerFeedback>,
}

/// Lifecycle of a forecast round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ForecastStatus {
    #[default]
    Pending,
    Finished,
}

/// A forecast round: estimates collected against a known truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastRound {
    pub round_id: RoundId,
    pub topic_id: TopicId,
    /// Player estimates, 0..=100.
    pub estimates: BTreeMap<PlayerId, u8>,
    /// The value players are estimating, 0..=100.
    pub truth: u8,
    /// Absolute error per player, filled on finish.
    pub distances: BTreeMap<PlayerId, u8>,
    /// Point delta per player, filled on finish.
    pub scores_awarded: BTreeMap<PlayerId, i64>,
    pub winner: Option<PlayerId>,
    pub status: ForecastStatus,
}

impl ForecastRound {
    /// Create a pending round with no estimates.
    pub fn new(round_id: RoundId, topic_id: TopicId, truth: u8) -> Self {
        Self {
            round_id,
            topic_id,
            estimates: BTreeMap::new(),
            truth,
            distances: BTreeMap::new(),
            scores_awarded: BTreeMap::new(),
            winner: None,
            status: ForecastStatus::Pending,
        }
    }

    /// Store an estimate; the last write for a player wins.
    pub fn record_estimate(&mut self, player_id: PlayerId, estimate: u8) {
        self.estimates.insert(player_id, estimate);
    }

    /// Store the scoring outcome and close the round.
    pub fn finalize(
        &mut self,
        distances: BTreeMap<PlayerId, u8>,
        scores_awarded: BTreeMap<PlayerId, i64>,
        winner: Option<PlayerId>,
    ) {
        self.distances = distances;
        self.scores_awarded = scores_awarded;
        self.winner = winner;
        self.status = ForecastStatus::Finished;
    }

    pub fn is_finished(&self) -> bool {
        self.status == ForecastStatus::Finished
    }
}
