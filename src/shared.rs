use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{BoardConfigError, MoveError};
use crate::game::GameError;

/// Broad error category a transport can map to a client response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Capacity,
    Turn,
    State,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Player not in game")]
    NotInGame,

    #[error("Game is full")]
    GameFull,

    #[error("Not your turn")]
    NotYourTurn,

    #[error(transparent)]
    Move(#[from] MoveError),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::NotFound(_) | AppError::NotInGame => ErrorKind::NotFound,
            AppError::GameFull => ErrorKind::Capacity,
            AppError::NotYourTurn => ErrorKind::Turn,
            AppError::Move(_) => ErrorKind::State,
        }
    }

    pub(crate) fn game_not_found(game_id: &str) -> Self {
        AppError::NotFound(format!("Game not found: {}", game_id))
    }
}

impl From<GameError> for AppError {
    fn from(err: GameError) -> Self {
        match err {
            GameError::NotYourTurn => AppError::NotYourTurn,
            GameError::NotInGame => AppError::NotInGame,
            GameError::GameFull => AppError::GameFull,
            GameError::Move(e) => AppError::Move(e),
        }
    }
}

impl From<BoardConfigError> for AppError {
    fn from(err: BoardConfigError) -> Self {
        AppError::Validation(err.to_string())
    }
}
