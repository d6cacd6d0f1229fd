//! Error types for game operations.

use civic_rules::{ConfigError, DuplicateId, PlayerId, RoundId, TopicId, UnknownSlotKey};

/// Failures surfaced to whoever drives the game.
///
/// Ties and empty answers are not errors.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    #[error("Topic not found: {0}")]
    TopicNotFound(TopicId),

    #[error("Round not found: {0}")]
    RoundNotFound(RoundId),

    #[error("Preparation for topic {topic_id} not started for player {player_id}")]
    PreparationNotStarted {
        player_id: PlayerId,
        topic_id: TopicId,
    },

    #[error("Need at least {need} prepared players, got {got}")]
    NotEnoughPlayers { got: usize, need: usize },

    #[error("Topic {0} is not a debate topic")]
    NotADebateTopic(TopicId),

    #[error("Topic {0} is not a forecast topic with a truth value")]
    NotAForecastTopic(TopicId),

    #[error("Forecast round {0} is already finished")]
    ForecastAlreadyFinished(RoundId),

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid estimate: {0}")]
    InvalidEstimate(f64),

    #[error("Id generator produced no unused id after {0} draws")]
    IdsExhausted(usize),

    #[error(transparent)]
    DuplicateId(#[from] DuplicateId),

    #[error(transparent)]
    UnknownSlot(#[from] UnknownSlotKey),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
