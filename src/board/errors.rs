use thiserror::Error;

use super::types::Coord;

/// Illegal cell action given the current board state. Returned before any mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("Invalid cell coordinates")]
    InvalidCoordinates,
    #[error("Cell already revealed")]
    AlreadyRevealed,
    #[error("Cannot reveal flagged cell")]
    CannotRevealFlagged,
    #[error("Cannot flag revealed cell")]
    CannotFlagRevealed,
    #[error("Game is not in play")]
    GameNotInPlay,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardConfigError {
    #[error("Board must have at least one row and one column")]
    EmptyBoard,
    #[error("Too many mines! Maximum is {max} for a {rows}x{cols} board")]
    TooManyMines { rows: usize, cols: usize, max: usize },
    #[error("Mine at {0} lies outside the board")]
    MineOutOfBounds(Coord),
}
