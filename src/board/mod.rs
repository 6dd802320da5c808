// Public API
pub use engine::{Board, SAFE_ZONE_CELLS};
pub use errors::{BoardConfigError, MoveError};
pub use outcome::{FlagOutcome, RevealOutcome};
pub use types::{CellState, Coord, GameMode, GameStatus};
pub use view::{BoardView, CellView};

// Internal modules
mod engine;
mod errors;
mod outcome;
mod types;
mod view;
