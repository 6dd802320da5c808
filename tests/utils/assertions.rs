//! Test assertion helpers - fluent API for verifying game state
#![allow(dead_code)] // Test utilities may not all be used in every test

use duelsweeper::{
    board::{CellState, Coord},
    GameSnapshot, GameStatus, PlayerSlot,
};

use super::setup::TestSetup;

// ============================================================================
// Assertion Helpers
// ============================================================================

pub struct SnapshotAssertion {
    snapshot: GameSnapshot,
}

impl SnapshotAssertion {
    /// Assert against the current state of the setup's game
    pub fn for_game(setup: &TestSetup) -> Self {
        let snapshot = setup
            .registry
            .get_state(&setup.game_id)
            .expect("game should exist");
        Self { snapshot }
    }

    pub fn status(self, expected: GameStatus) -> Self {
        assert_eq!(self.snapshot.status, expected, "wrong game status");
        assert_eq!(self.snapshot.game_state.status, expected);
        self
    }

    pub fn current_player(self, expected: PlayerSlot) -> Self {
        assert_eq!(
            self.snapshot.current_player,
            Some(expected),
            "wrong current player"
        );
        self
    }

    pub fn revealed(self, row: usize, col: usize) -> Self {
        self.cell_state(row, col, CellState::Revealed)
    }

    pub fn hidden(self, row: usize, col: usize) -> Self {
        self.cell_state(row, col, CellState::Hidden)
    }

    pub fn flagged(self, row: usize, col: usize) -> Self {
        self.cell_state(row, col, CellState::Flagged)
    }

    pub fn revealed_count(self, expected: usize) -> Self {
        assert_eq!(self.snapshot.game_state.revealed_count, expected);
        self
    }

    pub fn cells_revealed_by(self, slot: PlayerSlot, expected: u32) -> Self {
        assert_eq!(
            self.snapshot.player_stats[&slot].cells_revealed, expected,
            "{} revealed the wrong number of cells",
            slot
        );
        self
    }

    pub fn mines_hit_by(self, slot: PlayerSlot, expected: u32) -> Self {
        assert_eq!(self.snapshot.player_stats[&slot].mines_hit, expected);
        self
    }

    pub fn mine_hit_attributed(self, row: usize, col: usize, slot: PlayerSlot) -> Self {
        let key = Coord::new(row, col).to_string();
        assert_eq!(
            self.snapshot.game_state.mine_hit_by_player.get(&key),
            Some(&slot),
            "mine at {} should be attributed to {}",
            key,
            slot
        );
        self
    }

    pub fn mines_hidden(self) -> Self {
        assert!(self.snapshot.game_state.mine_positions.is_empty());
        self
    }

    pub fn into_snapshot(self) -> GameSnapshot {
        self.snapshot
    }

    fn cell_state(self, row: usize, col: usize, expected: CellState) -> Self {
        let cell = self
            .snapshot
            .game_state
            .cell(Coord::new(row, col))
            .expect("cell should be on the board");
        assert_eq!(cell.state, expected, "cell ({},{}) in wrong state", row, col);
        self
    }
}
