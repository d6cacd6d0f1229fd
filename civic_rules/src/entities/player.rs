//! Player definitions.

use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use super::{PlayerId, PreparedPosition, TopicId};
use crate::mechanics::{Language, StageMode};

/// How a player's avatar is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AvatarStyle {
    #[default]
    Emoji,
    Color,
    Upload,
}

/// A player's avatar: an emoji, a color code or an uploaded file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    pub style: AvatarStyle,
    pub value: String,
}

impl Avatar {
    pub fn new(style: AvatarStyle, value: impl Into<String>) -> Self {
        Self {
            style,
            value: value.into(),
        }
    }
}

impl Default for Avatar {
    fn default() -> Self {
        Self::new(AvatarStyle::Emoji, "🙂")
    }
}

/// A registered player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub language: Language,
    pub avatar: Avatar,

    /// Prepared positions keyed by topic.
    #[serde(default)]
    pub profiles: HashMap<TopicId, PreparedPosition>,

    /// Accumulated points across rounds.
    pub points: i64,
}

impl Player {
    /// Create a new player with no positions and zero points.
    pub fn new(id: PlayerId, name: impl Into<String>, language: Language) -> Self {
        Self {
            id,
            name: name.into(),
            language,
            avatar: Avatar::default(),
            profiles: HashMap::new(),
            points: 0,
        }
    }

    /// Set the avatar.
    pub fn with_avatar(mut self, avatar: Avatar) -> Self {
        self.avatar = avatar;
        self
    }

    /// Get the position for a topic.
    pub fn profile(&self, topic_id: &TopicId) -> Option<&PreparedPosition> {
        self.profiles.get(topic_id)
    }

    /// Get the mutable position for a topic.
    pub fn profile_mut(&mut self, topic_id: &TopicId) -> Option<&mut PreparedPosition> {
        self.profiles.get_mut(topic_id)
    }

    /// Replace any existing position for the topic with an empty one.
    pub fn start_profile(&mut self, topic_id: &TopicId, mode: StageMode) -> &mut PreparedPosition {
        let fresh = PreparedPosition::new(topic_id.clone(), mode);
        match self.profiles.entry(topic_id.clone()) {
            Entry::Occupied(mut entry) => {
                entry.insert(fresh);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(fresh),
        }
    }

    /// Whether the player's position for the topic is debate-ready.
    pub fn is_prepared_for(&self, topic_id: &TopicId) -> bool {
        self.profile(topic_id).is_some_and(PreparedPosition::is_complete)
    }

    /// Apply a point delta.
    pub fn award(&mut self, delta: i64) {
        self.points += delta;
    }
}
