use thiserror::Error;

use crate::board::MoveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Not your turn")]
    NotYourTurn,
    #[error("Player not in game")]
    NotInGame,
    #[error("Game is full")]
    GameFull,
    #[error(transparent)]
    Move(#[from] MoveError),
}
