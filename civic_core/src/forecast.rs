//! Forecast Scorer - rewards the estimate closest to a known truth.

use civic_rules::{ForecastConfig, PlayerId};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::scoring::unique_min;

/// Lowest accepted estimate.
pub const MIN_ESTIMATE: u8 = 0;

/// Highest accepted estimate.
pub const MAX_ESTIMATE: u8 = 100;

/// Round to the nearest integer and clamp into 0..=100.
///
/// Returns None for NaN and infinities.
pub fn clamp_estimate(value: f64) -> Option<u8> {
    if !value.is_finite() {
        return None;
    }
    Some(value.round().clamp(MIN_ESTIMATE as f64, MAX_ESTIMATE as f64) as u8)
}

/// Distances, awards and winner of a forecast round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastOutcome {
    pub distances: BTreeMap<PlayerId, u8>,
    pub scores_awarded: BTreeMap<PlayerId, i64>,
    pub winner: Option<PlayerId>,
}

/// Scores forecast estimates.
#[derive(Debug, Clone, Default)]
pub struct ForecastScorer {
    config: ForecastConfig,
}

impl ForecastScorer {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(ForecastConfig::default())
    }

    /// Award the bonus to the single closest estimate; a shared minimum
    /// distance awards nobody.
    pub fn score_round(&self, estimates: &BTreeMap<PlayerId, u8>, truth: u8) -> ForecastOutcome {
        let distances: BTreeMap<PlayerId, u8> = estimates
            .iter()
            .map(|(id, estimate)| (*id, estimate.abs_diff(truth)))
            .collect();

        let winner = unique_min(distances.iter().map(|(id, d)| (*id, *d)));

        let mut scores_awarded: BTreeMap<PlayerId, i64> =
            estimates.keys().map(|id| (*id, 0)).collect();
        if let Some(winner) = winner {
            scores_awarded.insert(winner, self.config.winner_bonus);
        }

        debug!(estimates = estimates.len(), truth, winner = ?winner, "Forecast scored");

        ForecastOutcome {
            distances,
            scores_awarded,
            winner,
        }
    }
}

/// Score a forecast round using the default bonus.
pub fn score_forecast_round(estimates: &BTreeMap<PlayerId, u8>, truth: u8) -> ForecastOutcome {
    ForecastScorer::with_defaults().score_round(estimates, truth)
}
