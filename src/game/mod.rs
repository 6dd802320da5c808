// Public API
pub use errors::GameError;
pub use player::{Player, PlayerSlot, Roster};
pub use session::{GameSession, GameSnapshot, MoveAction, MoveOutcome, MoveResult};
pub use stats::PlayerStats;
pub use turn_policy::TurnPolicy;

// Internal modules
mod errors;
mod player;
mod session;
mod stats;
mod turn_policy;
