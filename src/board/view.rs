use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::types::{CellState, Coord, GameStatus};
use crate::game::PlayerSlot;

/// One cell as the client sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub state: CellState,
    pub value: i8,
}

/// Client-facing board state. Mine values and positions stay hidden while the game is in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    pub rows: usize,
    pub cols: usize,
    pub board: Vec<Vec<CellView>>,
    pub mines: usize,
    pub flagged_count: usize,
    pub revealed_count: usize,
    pub status: GameStatus,
    pub mine_positions: Vec<Coord>,
    pub mine_hits: Vec<Coord>,
    /// "row,col" -> player who hit the mine there
    pub mine_hit_by_player: BTreeMap<String, PlayerSlot>,
}

impl BoardView {
    pub fn cell(&self, coord: Coord) -> Option<&CellView> {
        self.board.get(coord.row())?.get(coord.col())
    }
}
