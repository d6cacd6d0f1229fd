//! Game configuration loaded from TOML.
//!
//! Every section is optional; missing values fall back to the defaults
//! below, and a missing topic list falls back to the built-in catalog.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::mechanics::TopicCategory;
use crate::registry::Topic;

/// Error types for configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Lowest accepted `planner.deep_min_items`.
pub const DEEP_MIN_ITEMS_FLOOR: usize = 2;

/// Socratic questioning thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Minimum items per list slot in deep mode.
    pub deep_min_items: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self { deep_min_items: 2 }
    }
}

/// Debate round settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebateConfig {
    /// Complete positions needed before a debate can start.
    pub min_players: usize,
}

impl Default for DebateConfig {
    fn default() -> Self {
        Self { min_players: 2 }
    }
}

/// Debate vote scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Points awarded to a unique vote winner.
    pub winner_bonus: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self { winner_bonus: 3 }
    }
}

/// Feedback thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Summaries shorter than this many characters get an improvement note.
    pub summary_min_chars: usize,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            summary_min_chars: 20,
        }
    }
}

/// Forecast scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Points awarded to a unique closest estimate.
    pub winner_bonus: i64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self { winner_bonus: 2 }
    }
}

/// Complete game configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub planner: PlannerConfig,
    pub debate: DebateConfig,
    pub scoring: ScoringConfig,
    pub feedback: FeedbackConfig,
    pub forecast: ForecastConfig,
    pub topics: Vec<Topic>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            planner: PlannerConfig::default(),
            debate: DebateConfig::default(),
            scoring: ScoringConfig::default(),
            feedback: FeedbackConfig::default(),
            forecast: ForecastConfig::default(),
            topics: default_topics(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.planner.deep_min_items < DEEP_MIN_ITEMS_FLOOR {
            return Err(ConfigError::Invalid(format!(
                "planner.deep_min_items must be at least {}, got {}",
                DEEP_MIN_ITEMS_FLOOR, self.planner.deep_min_items
            )));
        }
        if self.debate.min_players < 2 {
            return Err(ConfigError::Invalid(format!(
                "debate.min_players must be at least 2, got {}",
                self.debate.min_players
            )));
        }

        let mut seen = HashSet::new();
        for topic in &self.topics {
            if !seen.insert(&topic.id) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate topic id: {}",
                    topic.id
                )));
            }
            if topic.category == TopicCategory::Forecast {
                match topic.truth {
                    Some(truth) if truth <= 100 => {}
                    Some(truth) => {
                        return Err(ConfigError::Invalid(format!(
                            "forecast topic {} has truth {} outside 0..=100",
                            topic.id, truth
                        )))
                    }
                    None => {
                        return Err(ConfigError::Invalid(format!(
                            "forecast topic {} has no truth value",
                            topic.id
                        )))
                    }
                }
            }
        }
        Ok(())
    }
}

/// The built-in topic catalog.
pub fn default_topics() -> Vec<Topic> {
    vec![
        Topic::debate(
            "safety",
            "How would you improve safety in your community or school?",
            "Como você melhoraria a segurança na sua comunidade ou escola?",
        ),
        Topic::debate(
            "school-excitement",
            "What would you change in your school to make it more exciting and useful?",
            "O que você mudaria na sua escola para torná-la mais empolgante e útil?",
        ),
        Topic::forecast(
            "forecast-school-value",
            "What share (0-100) of kids in your community value school?",
            "Qual a porcentagem (0-100) de jovens na sua comunidade que valorizam a escola?",
            62,
        ),
    ]
}
