//! Game session - runs preparation, debate and forecast rounds against an
//! explicit registry.
//!
//! The session validates existence and preconditions, calls the pure engine
//! functions, and writes results back: positions, point totals and round
//! history. Callers serialize access; a session is not shared between
//! threads without external locking.

use civic_rules::{
    Avatar, ForecastRound, GameConfig, GameRegistry, IdGenerator, Language, Player, PlayerId,
    RandomIds, RoundId, RoundResult, SlotKey, StageMode, Topic, TopicCategory, TopicId,
};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};
use uuid::Uuid;

use crate::debate::{build_debate_transcript, Debater};
use crate::error::{GameError, GameResult};
use crate::feedback::FeedbackGenerator;
use crate::forecast::{clamp_estimate, ForecastScorer};
use crate::scoring::ScoringEngine;
use crate::socratic::{add_answer, NextQuestion, SocraticPlanner};

/// Where a player stands in preparation for a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparationStatus {
    /// None once every slot meets its threshold.
    pub question: Option<NextQuestion>,
    pub complete: bool,
}

/// One line of the scoreboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreboardRow {
    pub id: PlayerId,
    pub name: String,
    pub points: i64,
}

/// Owns the registry and the engines configured for it.
pub struct GameSession {
    registry: GameRegistry,
    config: GameConfig,
    ids: Box<dyn IdGenerator>,
    planner: SocraticPlanner,
    scoring: ScoringEngine,
    feedback: FeedbackGenerator,
    forecast: ForecastScorer,
}

impl GameSession {
    /// Create a session from a validated configuration and an id source.
    pub fn new(config: GameConfig, ids: Box<dyn IdGenerator>) -> GameResult<Self> {
        config.validate()?;
        Ok(Self {
            registry: GameRegistry::new(config.topics.clone()),
            planner: SocraticPlanner::new(config.planner.clone()),
            scoring: ScoringEngine::new(config.scoring.clone()),
            feedback: FeedbackGenerator::new(config.feedback.clone()),
            forecast: ForecastScorer::new(config.forecast.clone()),
            config,
            ids,
        })
    }

    /// Create a session with the default configuration and random ids.
    pub fn with_defaults() -> Self {
        let config = GameConfig::default();
        Self {
            registry: GameRegistry::new(config.topics.clone()),
            planner: SocraticPlanner::default(),
            scoring: ScoringEngine::default(),
            feedback: FeedbackGenerator::default(),
            forecast: ForecastScorer::default(),
            config,
            ids: Box::new(RandomIds),
        }
    }

    /// Resume from an existing registry, e.g. one restored from a snapshot.
    ///
    /// The id source may repeat ids the registry already holds; new players
    /// and rounds skip those.
    pub fn with_registry(mut self, registry: GameRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &GameRegistry {
        &self.registry
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn topics(&self) -> &[Topic] {
        self.registry.topics()
    }

    /// Register a new player with zero points.
    pub fn register_player(
        &mut self,
        name: &str,
        language: Language,
        avatar: Avatar,
    ) -> GameResult<PlayerId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::MissingField("name"));
        }
        let id = PlayerId::from_uuid(self.fresh_id()?);
        let player = Player::new(id, name, language).with_avatar(avatar);
        let id = self.registry.add_player(player)?;
        info!(player_id = %id, name, "Player registered");
        Ok(id)
    }

    /// Draw ids until one is not held by any player or round.
    ///
    /// A generator that never repeats needs at most one draw per id in use
    /// plus one.
    fn fresh_id(&mut self) -> GameResult<Uuid> {
        let attempts = self.registry.ids_in_use() + 1;
        for _ in 0..attempts {
            let id = self.ids.new_id();
            if !self.registry.id_in_use(id) {
                return Ok(id);
            }
            debug!(id = %id, "Skipping id already in use");
        }
        Err(GameError::IdsExhausted(attempts))
    }

    fn topic(&self, topic_id: &TopicId) -> GameResult<&Topic> {
        self.registry
            .topic(topic_id)
            .ok_or_else(|| GameError::TopicNotFound(topic_id.clone()))
    }

    fn player(&self, player_id: PlayerId) -> GameResult<&Player> {
        self.registry
            .player(player_id)
            .ok_or(GameError::PlayerNotFound(player_id))
    }

    /// Reset every player's position on a debate topic.
    pub fn start_preparation(&mut self, topic_id: &TopicId, mode: StageMode) -> GameResult<()> {
        if self.topic(topic_id)?.category != TopicCategory::Debate {
            return Err(GameError::NotADebateTopic(topic_id.clone()));
        }
        for player in self.registry.players_mut() {
            player.start_profile(topic_id, mode);
        }
        info!(topic_id = %topic_id, mode = ?mode, "Preparation started");
        Ok(())
    }

    /// Ingest an answer and return whether the position is now complete.
    pub fn submit_answer(
        &mut self,
        player_id: PlayerId,
        topic_id: &TopicId,
        key: SlotKey,
        answer: &str,
    ) -> GameResult<bool> {
        let player = self
            .registry
            .player_mut(player_id)
            .ok_or(GameError::PlayerNotFound(player_id))?;
        let position = player
            .profile_mut(topic_id)
            .ok_or_else(|| GameError::PreparationNotStarted {
                player_id,
                topic_id: topic_id.clone(),
            })?;

        add_answer(position, key, answer);
        debug!(player_id = %player_id, slot = %key, complete = position.is_complete(), "Answer recorded");
        Ok(position.is_complete())
    }

    /// Same as [`GameSession::submit_answer`] with the slot named by a string.
    pub fn submit_answer_for_key(
        &mut self,
        player_id: PlayerId,
        topic_id: &TopicId,
        key: &str,
        answer: &str,
    ) -> GameResult<bool> {
        let key: SlotKey = key.parse()?;
        self.submit_answer(player_id, topic_id, key, answer)
    }

    /// Next question in the player's language plus the completeness flag.
    pub fn preparation_status(
        &self,
        player_id: PlayerId,
        topic_id: &TopicId,
    ) -> GameResult<PreparationStatus> {
        let player = self.player(player_id)?;
        let position = player
            .profile(topic_id)
            .ok_or_else(|| GameError::PreparationNotStarted {
                player_id,
                topic_id: topic_id.clone(),
            })?;
        Ok(PreparationStatus {
            question: self.planner.next_question(position, player.language),
            complete: position.is_complete(),
        })
    }

    /// Run a debate among players with complete positions, apply awards
    /// and record the round.
    pub fn start_debate(&mut self, topic_id: &TopicId) -> GameResult<RoundResult> {
        if self.topic(topic_id)?.category != TopicCategory::Debate {
            return Err(GameError::NotADebateTopic(topic_id.clone()));
        }

        let debaters: Vec<Debater<'_>> = self
            .registry
            .players()
            .iter()
            .filter_map(|player| Debater::for_topic(player, topic_id))
            .collect();
        let need = self.config.debate.min_players;
        if debaters.len() < need {
            return Err(GameError::NotEnoughPlayers {
                got: debaters.len(),
                need,
            });
        }

        let transcript = build_debate_transcript(&debaters);
        let outcome = self.scoring.compute_votes_and_scores(&debaters, &transcript);
        let feedback = debaters
            .iter()
            .map(|d| (d.id, self.feedback.generate(d.position)))
            .collect();

        let round_id = RoundId::from_uuid(self.fresh_id()?);
        let result = RoundResult {
            round_id,
            topic_id: topic_id.clone(),
            transcript,
            votes: outcome.votes,
            winner: outcome.winner,
            scores_awarded: outcome.scores_awarded,
            feedback,
        };

        self.registry.record_round(result.clone())?;
        self.apply_awards(&result.scores_awarded);
        info!(
            round_id = %result.round_id,
            topic_id = %topic_id,
            winner = ?result.winner,
            "Debate round finished"
        );
        Ok(result)
    }

    fn apply_awards(&mut self, awards: &BTreeMap<PlayerId, i64>) {
        for (id, delta) in awards {
            if let Some(player) = self.registry.player_mut(*id) {
                player.award(*delta);
            }
        }
    }

    /// Players sorted by points, highest first; ties keep registration order.
    pub fn scoreboard(&self) -> Vec<ScoreboardRow> {
        let mut rows: Vec<ScoreboardRow> = self
            .registry
            .players()
            .iter()
            .map(|p| ScoreboardRow {
                id: p.id,
                name: p.name.clone(),
                points: p.points,
            })
            .collect();
        rows.sort_by(|a, b| b.points.cmp(&a.points));
        rows
    }

    /// Open a forecast round on a topic with a truth value.
    pub fn start_forecast(&mut self, topic_id: &TopicId) -> GameResult<RoundId> {
        let topic = self.topic(topic_id)?;
        let truth = match (topic.category, topic.truth) {
            (TopicCategory::Forecast, Some(truth)) => truth,
            _ => return Err(GameError::NotAForecastTopic(topic_id.clone())),
        };

        let round_id = RoundId::from_uuid(self.fresh_id()?);
        self.registry
            .add_forecast_round(ForecastRound::new(round_id, topic_id.clone(), truth))?;
        info!(round_id = %round_id, topic_id = %topic_id, "Forecast started");
        Ok(round_id)
    }

    /// Store a player's estimate, clamped to 0..=100. Resubmitting replaces
    /// the earlier estimate.
    pub fn submit_estimate(
        &mut self,
        round_id: RoundId,
        player_id: PlayerId,
        estimate: f64,
    ) -> GameResult<u8> {
        if self.registry.forecast_round(round_id).is_none() {
            return Err(GameError::RoundNotFound(round_id));
        }
        self.player(player_id)?;
        let value = clamp_estimate(estimate).ok_or(GameError::InvalidEstimate(estimate))?;

        let round = self
            .registry
            .forecast_round_mut(round_id)
            .ok_or(GameError::RoundNotFound(round_id))?;
        if round.is_finished() {
            return Err(GameError::ForecastAlreadyFinished(round_id));
        }
        round.record_estimate(player_id, value);
        debug!(round_id = %round_id, player_id = %player_id, estimate = value, "Estimate recorded");
        Ok(value)
    }

    /// Score a pending forecast round, apply awards and close it.
    pub fn finish_forecast(&mut self, round_id: RoundId) -> GameResult<ForecastRound> {
        let round = self
            .registry
            .forecast_round(round_id)
            .ok_or(GameError::RoundNotFound(round_id))?;
        if round.is_finished() {
            return Err(GameError::ForecastAlreadyFinished(round_id));
        }

        let outcome = self.forecast.score_round(&round.estimates, round.truth);
        self.apply_awards(&outcome.scores_awarded);

        let round = self
            .registry
            .forecast_round_mut(round_id)
            .ok_or(GameError::RoundNotFound(round_id))?;
        round.finalize(outcome.distances, outcome.scores_awarded, outcome.winner);
        info!(round_id = %round_id, winner = ?round.winner, "Forecast finished");
        Ok(round.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use civic_rules::SequentialIds;

    fn session() -> GameSession {
        GameSession::new(GameConfig::default(), Box::new(SequentialIds::default())).unwrap()
    }

    fn safety() -> TopicId {
        TopicId::from("safety")
    }

    #[test]
    fn test_register_requires_name() {
        let mut s = session();
        assert!(matches!(
            s.register_player("  ", Language::En, Avatar::default()),
            Err(GameError::MissingField("name"))
        ));
        let id = s
            .register_player("Ana", Language::Pt, Avatar::default())
            .unwrap();
        assert_eq!(s.registry().player(id).unwrap().points, 0);
    }

    #[test]
    fn test_preparation_requires_debate_topic() {
        let mut s = session();
        assert!(matches!(
            s.start_preparation(&TopicId::from("forecast-school-value"), StageMode::Lightning),
            Err(GameError::NotADebateTopic(_))
        ));
        assert!(matches!(
            s.start_preparation(&TopicId::from("nope"), StageMode::Lightning),
            Err(GameError::TopicNotFound(_))
        ));
    }

    #[test]
    fn test_answer_before_start_fails() {
        let mut s = session();
        let id = s
            .register_player("Ana", Language::En, Avatar::default())
            .unwrap();
        assert!(matches!(
            s.submit_answer(id, &safety(), SlotKey::Beliefs, "x"),
            Err(GameError::PreparationNotStarted { .. })
        ));
    }

    #[test]
    fn test_status_uses_player_language() {
        let mut s = session();
        let id = s
            .register_player("Ana", Language::Pt, Avatar::default())
            .unwrap();
        s.start_preparation(&safety(), StageMode::Lightning).unwrap();
        let status = s.preparation_status(id, &safety()).unwrap();
        let question = status.question.unwrap();
        assert_eq!(question.question.key, SlotKey::Beliefs);
        assert_eq!(question.text, question.question.pt);
        assert!(!status.complete);
    }

    #[test]
    fn test_unknown_slot_string() {
        let mut s = session();
        let id = s
            .register_player("Ana", Language::En, Avatar::default())
            .unwrap();
        s.start_preparation(&safety(), StageMode::Lightning).unwrap();
        assert!(matches!(
            s.submit_answer_for_key(id, &safety(), "vibes", "x"),
            Err(GameError::UnknownSlot(_))
        ));
        assert!(!s
            .submit_answer_for_key(id, &safety(), "beliefs", "x")
            .unwrap());
    }

    #[test]
    fn test_debate_needs_two_prepared_players() {
        let mut s = session();
        s.register_player("Ana", Language::En, Avatar::default())
            .unwrap();
        s.start_preparation(&safety(), StageMode::Lightning).unwrap();
        assert!(matches!(
            s.start_debate(&safety()),
            Err(GameError::NotEnoughPlayers { got: 0, need: 2 })
        ));
    }

    #[test]
    fn test_forecast_start_requires_forecast_topic() {
        let mut s = session();
        assert!(matches!(
            s.start_forecast(&safety()),
            Err(GameError::NotAForecastTopic(_))
        ));
    }

    #[test]
    fn test_forecast_submit_validation() {
        let mut s = session();
        let id = s
            .register_player("Ana", Language::En, Avatar::default())
            .unwrap();
        let round = s
            .start_forecast(&TopicId::from("forecast-school-value"))
            .unwrap();

        assert_eq!(s.submit_estimate(round, id, -5.0).unwrap(), 0);
        assert_eq!(s.submit_estimate(round, id, 150.0).unwrap(), 100);
        assert!(matches!(
            s.submit_estimate(round, id, f64::NAN),
            Err(GameError::InvalidEstimate(_))
        ));
        assert!(matches!(
            s.submit_estimate(round, PlayerId::from_uuid(Uuid::nil()), 50.0),
            Err(GameError::PlayerNotFound(_))
        ));
        assert!(matches!(
            s.submit_estimate(RoundId::from_uuid(Uuid::nil()), id, 50.0),
            Err(GameError::RoundNotFound(_))
        ));
        assert_eq!(s.registry().forecast_round(round).unwrap().estimates[&id], 100);
    }

    #[test]
    fn test_forecast_finishes_once() {
        let mut s = session();
        let a = s
            .register_player("Ana", Language::En, Avatar::default())
            .unwrap();
        let round = s
            .start_forecast(&TopicId::from("forecast-school-value"))
            .unwrap();
        s.submit_estimate(round, a, 61.0).unwrap();

        let finished = s.finish_forecast(round).unwrap();
        assert_eq!(finished.winner, Some(a));
        assert_eq!(s.registry().player(a).unwrap().points, 2);

        assert!(matches!(
            s.finish_forecast(round),
            Err(GameError::ForecastAlreadyFinished(_))
        ));
        assert!(matches!(
            s.submit_estimate(round, a, 62.0),
            Err(GameError::ForecastAlreadyFinished(_))
        ));
        assert_eq!(s.registry().player(a).unwrap().points, 2);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = GameConfig::default();
        config.debate.min_players = 0;
        assert!(matches!(
            GameSession::new(config, Box::new(SequentialIds::default())),
            Err(GameError::Config(_))
        ));
    }

    #[test]
    fn test_submit_answer_reports_completion() {
        let mut s = session();
        let id = s
            .register_player("Ana", Language::En, Avatar::default())
            .unwrap();
        s.start_preparation(&safety(), StageMode::Lightning).unwrap();
        for key in [SlotKey::Beliefs, SlotKey::Actions, SlotKey::Mechanisms, SlotKey::Outcomes] {
            assert!(!s.submit_answer(id, &safety(), key, "x").unwrap());
        }
        assert!(s
            .submit_answer(id, &safety(), SlotKey::Summary, "Done.")
            .unwrap());
        // Blank answers leave the summary in place.
        assert!(s
            .submit_answer(id, &safety(), SlotKey::Summary, "  ")
            .unwrap());
    }

    #[test]
    fn test_debate_requires_debate_topic() {
        let mut s = session();
        assert!(matches!(
            s.start_debate(&TopicId::from("forecast-school-value")),
            Err(GameError::NotADebateTopic(_))
        ));
        assert!(matches!(
            s.start_debate(&TopicId::from("nope")),
            Err(GameError::TopicNotFound(_))
        ));
    }

    #[test]
    fn test_resumed_session_skips_ids_in_use() {
        let mut s = session();
        let a = s
            .register_player("A", Language::En, Avatar::default())
            .unwrap();
        let round = s
            .start_forecast(&TopicId::from("forecast-school-value"))
            .unwrap();

        let mut resumed = session().with_registry(s.registry().clone());
        let b = resumed
            .register_player("B", Language::En, Avatar::default())
            .unwrap();
        assert_ne!(b, a);
        assert_ne!(b.0, round.0);
        assert_eq!(resumed.registry().players().len(), 2);
        assert_eq!(resumed.registry().player(b).unwrap().name, "B");
        assert_eq!(resumed.registry().player(a).unwrap().name, "A");
    }

    struct FixedIds;

    impl IdGenerator for FixedIds {
        fn new_id(&mut self) -> Uuid {
            Uuid::from_u128(1)
        }
    }

    #[test]
    fn test_repeating_id_source_is_an_error() {
        let mut s = GameSession::new(GameConfig::default(), Box::new(FixedIds)).unwrap();
        s.register_player("A", Language::En, Avatar::default())
            .unwrap();
        assert!(matches!(
            s.register_player("B", Language::En, Avatar::default()),
            Err(GameError::IdsExhausted(2))
        ));
        assert_eq!(s.registry().players().len(), 1);
    }
}
