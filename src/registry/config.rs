use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum_macros::{Display, EnumString};
use tracing::warn;

use crate::board::{GameMode, SAFE_ZONE_CELLS};
use crate::shared::AppError;

pub const MIN_CUSTOM_SIDE: usize = 5;
pub const MAX_CUSTOM_SIDE: usize = 50;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Custom,
}

impl Difficulty {
    /// Parses a difficulty name, falling back to medium
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

/// Board dimensions and mine count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    pub mines: usize,
}

impl GameConfig {
    pub const EASY: GameConfig = GameConfig::new(9, 9, 10);
    pub const MEDIUM: GameConfig = GameConfig::new(16, 16, 40);
    pub const HARD: GameConfig = GameConfig::new(16, 30, 99);

    pub const fn new(rows: usize, cols: usize, mines: usize) -> Self {
        Self { rows, cols, mines }
    }

    pub fn preset(difficulty: Difficulty) -> Option<Self> {
        match difficulty {
            Difficulty::Easy => Some(Self::EASY),
            Difficulty::Medium => Some(Self::MEDIUM),
            Difficulty::Hard => Some(Self::HARD),
            Difficulty::Custom => None,
        }
    }

    pub fn custom(rows: usize, cols: usize, mines: usize) -> Result<Self, AppError> {
        if !(MIN_CUSTOM_SIDE..=MAX_CUSTOM_SIDE).contains(&rows) {
            return Err(AppError::Validation(format!(
                "Rows must be between {} and {}",
                MIN_CUSTOM_SIDE, MAX_CUSTOM_SIDE
            )));
        }
        if !(MIN_CUSTOM_SIDE..=MAX_CUSTOM_SIDE).contains(&cols) {
            return Err(AppError::Validation(format!(
                "Columns must be between {} and {}",
                MIN_CUSTOM_SIDE, MAX_CUSTOM_SIDE
            )));
        }
        if mines < 1 {
            return Err(AppError::Validation(
                "Mines must be at least 1".to_string(),
            ));
        }

        let max_mines = rows * cols - SAFE_ZONE_CELLS;
        if mines > max_mines {
            return Err(AppError::Validation(format!(
                "Too many mines! Maximum is {} for a {}x{} board",
                max_mines, rows, cols
            )));
        }

        Ok(Self::new(rows, cols, mines))
    }

    /// Preset for named difficulties, validated dimensions for custom
    pub fn resolve(
        difficulty: Difficulty,
        rows: Option<usize>,
        cols: Option<usize>,
        mines: Option<usize>,
    ) -> Result<Self, AppError> {
        if let Some(preset) = Self::preset(difficulty) {
            return Ok(preset);
        }

        match (rows, cols, mines) {
            (Some(rows), Some(cols), Some(mines)) => Self::custom(rows, cols, mines),
            _ => Err(AppError::Validation(
                "Custom difficulty requires rows, cols, and mines parameters".to_string(),
            )),
        }
    }
}

/// What the transport layer asks for when creating a game
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGameRequest {
    pub difficulty: Difficulty,
    pub mode: GameMode,
    pub rows: Option<usize>,
    pub cols: Option<usize>,
    pub mines: Option<usize>,
}

impl CreateGameRequest {
    pub fn new(difficulty: Difficulty, mode: GameMode) -> Self {
        Self {
            difficulty,
            mode,
            ..Default::default()
        }
    }

    pub fn custom(mode: GameMode, rows: usize, cols: usize, mines: usize) -> Self {
        Self {
            difficulty: Difficulty::Custom,
            mode,
            rows: Some(rows),
            cols: Some(cols),
            mines: Some(mines),
        }
    }

    /// Build from raw names as they arrive from a client; unknown names fall back to defaults
    pub fn from_names(difficulty: &str, mode: &str) -> Self {
        Self::new(Difficulty::from_name(difficulty), GameMode::from_name(mode))
    }
}

/// Echo of a newly created game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedGame {
    pub game_id: String,
    pub difficulty: Difficulty,
    pub game_mode: GameMode,
    pub config: GameConfig,
}

/// Configuration for the registry and its sweep task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// How long a session may go without a join or move before it is evicted
    pub idle_timeout: Duration,
    /// How often the sweep task runs
    pub sweep_interval: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(60 * 60), // 1 hour
            sweep_interval: Duration::from_secs(60),
        }
    }
}

pub const IDLE_TIMEOUT_ENV: &str = "DUELSWEEPER_IDLE_TIMEOUT_SECS";
pub const SWEEP_INTERVAL_ENV: &str = "DUELSWEEPER_SWEEP_INTERVAL_SECS";

impl RegistryConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            idle_timeout: seconds_from(&lookup, IDLE_TIMEOUT_ENV, defaults.idle_timeout),
            sweep_interval: seconds_from(&lookup, SWEEP_INTERVAL_ENV, defaults.sweep_interval),
        }
    }
}

fn seconds_from(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Duration {
    let Some(raw) = lookup(key) else {
        return default;
    };

    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Duration::from_secs(secs),
        _ => {
            warn!(key = %key, value = %raw, "Ignoring invalid duration, using default");
            default
        }
    }
}
