//! Game registry - the store holding players, topics and round history.
//!
//! The registry is an explicit object handed to whoever runs the game. It
//! has no global instance.

mod rounds;

pub use rounds::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{Player, PlayerId, RoundId, TopicId};
use crate::mechanics::{BilingualText, TopicCategory};

/// A debate or forecast prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: TopicId,
    pub category: TopicCategory,
    pub prompt: BilingualText,
    /// Forecast truth value, 0..=100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truth: Option<u8>,
}

impl Topic {
    /// Create a debate topic.
    pub fn debate(id: impl Into<String>, en: impl Into<String>, pt: impl Into<String>) -> Self {
        Self {
            id: TopicId::new(id),
            category: TopicCategory::Debate,
            prompt: BilingualText::new(en, pt),
            truth: None,
        }
    }

    /// Create a forecast topic with its truth value.
    pub fn forecast(
        id: impl Into<String>,
        en: impl Into<String>,
        pt: impl Into<String>,
        truth: u8,
    ) -> Self {
        Self {
            id: TopicId::new(id),
            category: TopicCategory::Forecast,
            prompt: BilingualText::new(en, pt),
            truth: Some(truth),
        }
    }
}

/// Returned when an id is already taken by a player or round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Id already in use: {0}")]
pub struct DuplicateId(pub Uuid);

/// All mutable game state.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GameRegistry {
    /// Players in registration order.
    players: Vec<Player>,

    topics: Vec<Topic>,

    /// Debate round history, oldest first.
    rounds: Vec<RoundResult>,

    forecast_rounds: Vec<ForecastRound>,
}

impl GameRegistry {
    /// Create a registry with a topic catalog and no players.
    pub fn new(topics: Vec<Topic>) -> Self {
        Self {
            topics,
            ..Self::default()
        }
    }

    /// Whether any player or round already uses this id.
    pub fn id_in_use(&self, id: Uuid) -> bool {
        self.players.iter().any(|p| p.id.0 == id)
            || self.rounds.iter().any(|r| r.round_id.0 == id)
            || self.forecast_rounds.iter().any(|r| r.round_id.0 == id)
    }

    /// Number of ids held by players and rounds.
    pub fn ids_in_use(&self) -> usize {
        self.players.len() + self.rounds.len() + self.forecast_rounds.len()
    }

    /// Add a player, keeping registration order.
    pub fn add_player(&mut self, player: Player) -> Result<PlayerId, DuplicateId> {
        if self.id_in_use(player.id.0) {
            return Err(DuplicateId(player.id.0));
        }
        let id = player.id;
        self.players.push(player);
        Ok(id)
    }

    /// Get player by ID.
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Get mutable player by ID.
    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// All players in registration order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// All players, mutable.
    pub fn players_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut()
    }

    /// Get topic by ID.
    pub fn topic(&self, id: &TopicId) -> Option<&Topic> {
        self.topics.iter().find(|t| &t.id == id)
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// Topics of one category, in catalog order.
    pub fn topics_in(&self, category: TopicCategory) -> impl Iterator<Item = &Topic> {
        self.topics.iter().filter(move |t| t.category == category)
    }

    /// Append a finished debate round to the history.
    pub fn record_round(&mut self, round: RoundResult) -> Result<RoundId, DuplicateId> {
        if self.id_in_use(round.round_id.0) {
            return Err(DuplicateId(round.round_id.0));
        }
        let id = round.round_id;
        self.rounds.push(round);
        Ok(id)
    }

    pub fn rounds(&self) -> &[RoundResult] {
        &self.rounds
    }

    pub fn add_forecast_round(&mut self, round: ForecastRound) -> Result<RoundId, DuplicateId> {
        if self.id_in_use(round.round_id.0) {
            return Err(DuplicateId(round.round_id.0));
        }
        let id = round.round_id;
        self.forecast_rounds.push(round);
        Ok(id)
    }

    pub fn forecast_round(&self, id: RoundId) -> Option<&ForecastRound> {
        self.forecast_rounds.iter().find(|r| r.round_id == id)
    }

    pub fn forecast_round_mut(&mut self, id: RoundId) -> Option<&mut ForecastRound> {
        self.forecast_rounds.iter_mut().find(|r| r.round_id == id)
    }

    /// Export the full state as JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Restore state from a JSON snapshot.
    ///
    /// Completeness flags are recomputed from the restored content.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::SlotKey;
    use crate::mechanics::{Language, StageMode};
    use uuid::Uuid;

    fn registry() -> GameRegistry {
        GameRegistry::new(vec![
            Topic::debate("safety", "Safety?", "Segurança?"),
            Topic::forecast("share", "Share?", "Porcentagem?", 62),
        ])
    }

    #[test]
    fn test_players_keep_registration_order() {
        let mut reg = registry();
        for n in [3u128, 1, 2] {
            reg.add_player(Player::new(
                PlayerId::from_uuid(Uuid::from_u128(n)),
                format!("P{n}"),
                Language::En,
            ))
            .unwrap();
        }
        let names: Vec<_> = reg.players().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["P3", "P1", "P2"]);
    }

    #[test]
    fn test_topic_lookup() {
        let reg = registry();
        assert!(reg.topic(&TopicId::from("safety")).is_some());
        assert!(reg.topic(&TopicId::from("missing")).is_none());
        assert_eq!(reg.topics_in(TopicCategory::Forecast).count(), 1);
    }

    #[test]
    fn test_json_snapshot_round_trip() {
        let mut reg = registry();
        let id = PlayerId::from_uuid(Uuid::from_u128(1));
        let mut player = Player::new(id, "Ana", Language::Pt);
        let topic = TopicId::from("safety");
        let position = player.start_profile(&topic, StageMode::Deep);
        position.append_items(SlotKey::Beliefs, ["Streets are dark"]);
        reg.add_player(player).unwrap();

        let mut round = ForecastRound::new(RoundId::from_uuid(Uuid::from_u128(7)), "share".into(), 62);
        round.record_estimate(id, 60);
        reg.add_forecast_round(round).unwrap();

        let restored = GameRegistry::from_json(&reg.to_json().unwrap()).unwrap();
        let p = restored.player(id).unwrap();
        assert_eq!(p.profile(&topic).unwrap().items(SlotKey::Beliefs), ["Streets are dark"]);
        assert_eq!(
            restored
                .forecast_round(RoundId::from_uuid(Uuid::from_u128(7)))
                .unwrap()
                .estimates[&id],
            60
        );
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut reg = registry();
        let id = PlayerId::from_uuid(Uuid::from_u128(1));
        reg.add_player(Player::new(id, "A", Language::En)).unwrap();

        assert_eq!(
            reg.add_player(Player::new(id, "B", Language::En)),
            Err(DuplicateId(id.0))
        );
        assert_eq!(reg.players().len(), 1);
        assert_eq!(reg.player(id).unwrap().name, "A");

        let clash = ForecastRound::new(RoundId::from_uuid(id.0), "share".into(), 62);
        assert!(reg.add_forecast_round(clash).is_err());
        assert_eq!(reg.ids_in_use(), 1);
    }

    #[test]
    fn test_restored_snapshot_ignores_forged_complete_flag() {
        let mut reg = registry();
        let id = PlayerId::from_uuid(Uuid::from_u128(1));
        let mut player = Player::new(id, "Ana", Language::Pt);
        player.start_profile(&TopicId::from("safety"), StageMode::Lightning);
        reg.add_player(player).unwrap();

        let mut json: serde_json::Value = serde_json::from_str(&reg.to_json().unwrap()).unwrap();
        json["players"][0]["profiles"]["safety"]["complete"] = serde_json::Value::Bool(true);

        let restored = GameRegistry::from_json(&json.to_string()).unwrap();
        let player = restored.player(id).unwrap();
        assert!(!player.is_prepared_for(&TopicId::from("safety")));
    }
}
