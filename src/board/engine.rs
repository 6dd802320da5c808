// A Board is one game's minefield. It knows nothing about turns; the session layer
// decides who may act and what a move means for the players.

// Mines are laid lazily on the first reveal so that the clicked cell and its
// neighbours are always safe. Until then the board is Waiting.

use rand::seq::index;
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use super::errors::{BoardConfigError, MoveError};
use super::outcome::{FlagOutcome, RevealOutcome};
use super::types::{Cell, CellContents, CellState, Coord, GameMode, GameStatus};
use super::view::{BoardView, CellView};
use crate::game::PlayerSlot;

/// Cells kept clear around the first click
pub const SAFE_ZONE_CELLS: usize = 9;

#[derive(Debug, Clone)]
pub struct Board {
    rows: usize,
    cols: usize,
    mine_count: usize,
    mode: GameMode,
    cells: Vec<Cell>, // row-major, rows * cols
    mine_positions: BTreeSet<Coord>,
    revealed_count: usize, // safe cells only, hit mines are not counted
    flagged_count: usize,
    status: GameStatus,
    first_click: bool,
    mine_hits: BTreeSet<Coord>,
    mine_hit_by_player: BTreeMap<Coord, PlayerSlot>,
}

impl Board {
    pub fn new(
        rows: usize,
        cols: usize,
        mines: usize,
        mode: GameMode,
    ) -> Result<Self, BoardConfigError> {
        if rows == 0 || cols == 0 {
            return Err(BoardConfigError::EmptyBoard);
        }

        let max = (rows * cols).saturating_sub(SAFE_ZONE_CELLS);
        if mines > max {
            return Err(BoardConfigError::TooManyMines { rows, cols, max });
        }

        Ok(Self {
            rows,
            cols,
            mine_count: mines,
            mode,
            cells: vec![Cell::default(); rows * cols],
            mine_positions: BTreeSet::new(),
            revealed_count: 0,
            flagged_count: 0,
            status: GameStatus::Waiting,
            first_click: true,
            mine_hits: BTreeSet::new(),
            mine_hit_by_player: BTreeMap::new(),
        })
    }

    /// Create a board with predetermined mine positions. The board starts in play and the
    /// first reveal gets no safe-zone guarantee.
    pub fn with_layout(
        rows: usize,
        cols: usize,
        mode: GameMode,
        mines: &[Coord],
    ) -> Result<Self, BoardConfigError> {
        if rows == 0 || cols == 0 {
            return Err(BoardConfigError::EmptyBoard);
        }

        if let Some(outside) = mines.iter().find(|c| c.row() >= rows || c.col() >= cols) {
            return Err(BoardConfigError::MineOutOfBounds(*outside));
        }

        let mine_positions: BTreeSet<Coord> = mines.iter().copied().collect();
        let mut board = Self {
            rows,
            cols,
            mine_count: mine_positions.len(),
            mode,
            cells: vec![Cell::default(); rows * cols],
            mine_positions,
            revealed_count: 0,
            flagged_count: 0,
            status: GameStatus::Playing,
            first_click: false,
            mine_hits: BTreeSet::new(),
            mine_hit_by_player: BTreeMap::new(),
        };
        board.lay_mines();
        Ok(board)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Configured mine count
    pub fn mine_count(&self) -> usize {
        self.mine_count
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed_count
    }

    pub fn flagged_count(&self) -> usize {
        self.flagged_count
    }

    pub fn mine_positions(&self) -> &BTreeSet<Coord> {
        &self.mine_positions
    }

    pub fn mine_hits(&self) -> &BTreeSet<Coord> {
        &self.mine_hits
    }

    pub fn hit_by(&self, coord: Coord) -> Option<PlayerSlot> {
        self.mine_hit_by_player.get(&coord).copied()
    }

    pub fn is_mine(&self, coord: Coord) -> bool {
        self.mine_positions.contains(&coord)
    }

    pub fn cell_state(&self, coord: Coord) -> Option<CellState> {
        self.cell(coord).map(|c| c.state)
    }

    /// True value of a cell: -1 for a mine, otherwise its adjacent mine count
    pub fn cell_value(&self, coord: Coord) -> Option<i8> {
        self.cell(coord).map(|c| c.value())
    }

    /// Reveal a cell, placing mines first if this is the opening move
    pub fn reveal(
        &mut self,
        row: usize,
        col: usize,
        player: Option<PlayerSlot>,
    ) -> Result<RevealOutcome, MoveError> {
        self.reveal_with_rng(row, col, player, &mut rand::rng())
    }

    pub fn reveal_with_rng<R: Rng + ?Sized>(
        &mut self,
        row: usize,
        col: usize,
        player: Option<PlayerSlot>,
        rng: &mut R,
    ) -> Result<RevealOutcome, MoveError> {
        let coord = self.checked_coord(row, col)?;

        match self.cells[self.index(coord)].state {
            CellState::Revealed => return Err(MoveError::AlreadyRevealed),
            CellState::Flagged => return Err(MoveError::CannotRevealFlagged),
            CellState::Hidden => {}
        }

        if !self.status.is_in_play() {
            return Err(MoveError::GameNotInPlay);
        }

        if self.first_click {
            self.place_mines(coord, rng);
            self.status = GameStatus::Playing;
            self.first_click = false;
        }

        let idx = self.index(coord);
        if self.cells[idx].is_mine() {
            self.cells[idx].state = CellState::Revealed;
            self.mine_hits.insert(coord);
            if let Some(player) = player {
                self.mine_hit_by_player.insert(coord, player);
            }

            return Ok(match self.mode {
                GameMode::Survival => RevealOutcome::Mine {
                    game_over: false,
                    switch_turn: true,
                    player_id: player,
                },
                GameMode::Classic => {
                    self.status = GameStatus::Lost;
                    RevealOutcome::Mine {
                        game_over: true,
                        switch_turn: false,
                        player_id: player,
                    }
                }
            });
        }

        let cells_revealed = self.flood_reveal(coord);

        if self.revealed_count == self.safe_cell_count() {
            self.status = GameStatus::Won;
            return Ok(RevealOutcome::Win { cells_revealed });
        }

        let value = match self.cells[idx].contents {
            CellContents::Clear(n) => n,
            CellContents::Mine => 0,
        };
        Ok(RevealOutcome::Number {
            value,
            cells_revealed,
        })
    }

    pub fn toggle_flag(&mut self, row: usize, col: usize) -> Result<FlagOutcome, MoveError> {
        let coord = self.checked_coord(row, col)?;
        let idx = self.index(coord);

        if self.cells[idx].state == CellState::Revealed {
            return Err(MoveError::CannotFlagRevealed);
        }

        if !self.status.is_in_play() {
            return Err(MoveError::GameNotInPlay);
        }

        let cell = &mut self.cells[idx];
        if cell.state == CellState::Flagged {
            cell.state = CellState::Hidden;
            self.flagged_count -= 1;
            Ok(FlagOutcome::Unflagged)
        } else {
            cell.state = CellState::Flagged;
            self.flagged_count += 1;
            Ok(FlagOutcome::Flagged)
        }
    }

    /// Client view of the board. Unless `reveal_mines` is set, mines are masked while in play.
    pub fn serialize(&self, reveal_mines: bool) -> BoardView {
        let masked = !reveal_mines && self.status == GameStatus::Playing;
        let survival = self.mode == GameMode::Survival;

        let board = self
            .cells
            .chunks(self.cols)
            .map(|row| {
                row.iter()
                    .map(|cell| CellView {
                        state: cell.state,
                        value: if masked && cell.is_mine() {
                            0
                        } else {
                            cell.value()
                        },
                    })
                    .collect()
            })
            .collect();

        BoardView {
            rows: self.rows,
            cols: self.cols,
            board,
            mines: self.mine_count,
            flagged_count: self.flagged_count,
            revealed_count: self.revealed_count,
            status: self.status,
            mine_positions: if masked {
                vec![]
            } else {
                self.mine_positions.iter().copied().collect()
            },
            mine_hits: if survival {
                self.mine_hits.iter().copied().collect()
            } else {
                vec![]
            },
            mine_hit_by_player: if survival {
                self.mine_hit_by_player
                    .iter()
                    .map(|(coord, player)| (coord.to_string(), *player))
                    .collect()
            } else {
                BTreeMap::new()
            },
        }
    }

    fn place_mines<R: Rng + ?Sized>(&mut self, first: Coord, rng: &mut R) {
        let available: Vec<Coord> = coords(self.rows, self.cols)
            .filter(|c| !first.touches(*c))
            .collect();
        let count = self.mine_count.min(available.len());

        self.mine_positions = index::sample(rng, available.len(), count)
            .into_iter()
            .map(|i| available[i])
            .collect();
        self.lay_mines();

        debug!(
            first_row = first.row(),
            first_col = first.col(),
            placed = self.mine_positions.len(),
            "Mines placed"
        );
    }

    /// Write mines and adjacency counts into the grid from `mine_positions`
    fn lay_mines(&mut self) {
        for coord in coords(self.rows, self.cols) {
            let contents = if self.mine_positions.contains(&coord) {
                CellContents::Mine
            } else {
                let adjacent = neighbours(self.rows, self.cols, coord)
                    .filter(|n| self.mine_positions.contains(n))
                    .count();
                CellContents::Clear(adjacent as u8)
            };
            let idx = self.index(coord);
            self.cells[idx].contents = contents;
        }
    }

    /// Reveal `origin` and cascade through zero cells. Returns the number of cells newly revealed.
    fn flood_reveal(&mut self, origin: Coord) -> usize {
        let mut revealed = 0;
        let mut pending = vec![origin];

        while let Some(coord) = pending.pop() {
            let idx = self.index(coord);
            let cell = &mut self.cells[idx];
            if cell.state != CellState::Hidden || cell.is_mine() {
                continue;
            }

            cell.state = CellState::Revealed;
            revealed += 1;

            if cell.contents == CellContents::Clear(0) {
                pending.extend(neighbours(self.rows, self.cols, coord));
            }
        }

        self.revealed_count += revealed;
        revealed
    }

    fn safe_cell_count(&self) -> usize {
        self.cells.len() - self.mine_positions.len()
    }

    fn checked_coord(&self, row: usize, col: usize) -> Result<Coord, MoveError> {
        if row < self.rows && col < self.cols {
            Ok(Coord::new(row, col))
        } else {
            Err(MoveError::InvalidCoordinates)
        }
    }

    fn cell(&self, coord: Coord) -> Option<&Cell> {
        if coord.row() < self.rows && coord.col() < self.cols {
            self.cells.get(self.index(coord))
        } else {
            None
        }
    }

    fn index(&self, coord: Coord) -> usize {
        coord.row() * self.cols + coord.col()
    }
}

fn coords(rows: usize, cols: usize) -> impl Iterator<Item = Coord> {
    (0..rows).flat_map(move |r| (0..cols).map(move |c| Coord::new(r, c)))
}

fn neighbours(rows: usize, cols: usize, coord: Coord) -> impl Iterator<Item = Coord> {
    let row_span = coord.row().saturating_sub(1)..=(coord.row() + 1).min(rows - 1);
    row_span
        .flat_map(move |r| {
            let col_span = coord.col().saturating_sub(1)..=(coord.col() + 1).min(cols - 1);
            col_span.map(move |c| Coord::new(r, c))
        })
        .filter(move |n| *n != coord)
}
