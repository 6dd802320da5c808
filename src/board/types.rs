use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, EnumString};

/// A `(row, col)` position on the board. Serializes as a `[row, col]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord(pub usize, pub usize);

impl Coord {
    pub fn new(row: usize, col: usize) -> Self {
        Self(row, col)
    }

    pub fn row(&self) -> usize {
        self.0
    }

    pub fn col(&self) -> usize {
        self.1
    }

    /// True when `other` is this cell or one of its 8 neighbours
    pub fn touches(&self, other: Coord) -> bool {
        self.0.abs_diff(other.0) <= 1 && self.1.abs_diff(other.1) <= 1
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.0, self.1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CellState {
    Hidden,
    Revealed,
    Flagged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GameStatus {
    Waiting,
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    /// Moves are only accepted before the board reaches a terminal status
    pub fn is_in_play(&self) -> bool {
        matches!(self, GameStatus::Waiting | GameStatus::Playing)
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum GameMode {
    /// Alternating turns, a mine ends the game
    #[default]
    Classic,
    /// A mine passes the turn, the game only ends when the board is cleared
    Survival,
}

impl GameMode {
    /// Parses a mode name, treating anything unrecognised as classic
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

/// What lies under a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CellContents {
    Mine,
    Clear(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cell {
    pub contents: CellContents,
    pub state: CellState,
}

impl Cell {
    pub fn is_mine(&self) -> bool {
        self.contents == CellContents::Mine
    }

    /// Wire value of the cell: -1 for a mine, otherwise the adjacent mine count
    pub fn value(&self) -> i8 {
        match self.contents {
            CellContents::Mine => -1,
            CellContents::Clear(n) => n as i8,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            contents: CellContents::Clear(0),
            state: CellState::Hidden,
        }
    }
}
