use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::{Display, EnumIter, EnumString};

/// One of the two seats in a game
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PlayerSlot {
    Player1 = 0,
    Player2 = 1,
}

impl PlayerSlot {
    pub fn other(&self) -> Self {
        match self {
            PlayerSlot::Player1 => PlayerSlot::Player2,
            PlayerSlot::Player2 => PlayerSlot::Player1,
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Name given to a player who joins without one
    pub fn default_name(&self) -> String {
        format!("Player {}", self.index() + 1)
    }
}

/// A seated player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub connection_id: String,
    pub name: String,
    pub joined_at: DateTime<Utc>,
}

/// Seat -> display name for every occupied seat
pub type Roster = BTreeMap<PlayerSlot, String>;
