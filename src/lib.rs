// Library crate for the two-player Minesweeper core
// This file exposes the public API for hosts and integration tests

pub mod board;
pub mod game;
pub mod registry;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use board::{Board, Coord, GameMode, GameStatus, MoveError, RevealOutcome};
pub use game::{GameSnapshot, MoveAction, MoveOutcome, MoveResult, PlayerSlot, PlayerStats};
pub use registry::{
    start_cleanup_task, CreateGameRequest, Difficulty, GameConfig, RegistryConfig,
    SessionRegistry,
};
pub use shared::{AppError, ErrorKind};
