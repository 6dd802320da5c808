// Public API
pub use cleanup_task::start_cleanup_task;
pub use config::{
    CreateGameRequest, CreatedGame, Difficulty, GameConfig, RegistryConfig, IDLE_TIMEOUT_ENV,
    MAX_CUSTOM_SIDE, MIN_CUSTOM_SIDE, SWEEP_INTERVAL_ENV,
};
pub use generators::{GameIdGenerator, ShortUuidGenerator, GAME_ID_LENGTH};
pub use repository::{Disconnected, GameSummary, JoinResult, SessionRegistry};

// Internal modules
mod cleanup_task;
mod config;
mod generators;
mod repository;
