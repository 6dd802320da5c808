#![allow(dead_code)] // Test utilities may not all be used in every test

use duelsweeper::{
    board::Coord,
    game::{MoveAction, MoveResult, PlayerSlot},
    registry::RegistryConfig,
    AppError, GameMode, SessionRegistry,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

/// A registry with one game and its seated players.
/// Players are addressed by name; each name doubles as its connection id.
pub struct TestSetup {
    pub registry: SessionRegistry,
    pub game_id: String,
    pub players: Vec<String>,
}

pub struct TestSetupBuilder {
    players: Vec<String>,
    mode: GameMode,
    rows: usize,
    cols: usize,
    mines: Vec<Coord>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            players: vec![],
            mode: GameMode::Classic,
            rows: 5,
            cols: 5,
            mines: vec![Coord::new(2, 3), Coord::new(4, 4)],
        }
    }

    pub fn with_players(mut self, players: Vec<&str>) -> Self {
        self.players = players.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_two_players(self) -> Self {
        self.with_players(vec!["alice", "bob"])
    }

    pub fn survival(mut self) -> Self {
        self.mode = GameMode::Survival;
        self
    }

    pub fn with_layout(mut self, rows: usize, cols: usize, mines: Vec<(usize, usize)>) -> Self {
        self.rows = rows;
        self.cols = cols;
        self.mines = mines.into_iter().map(|(r, c)| Coord::new(r, c)).collect();
        self
    }

    pub fn build(self) -> TestSetup {
        let registry = SessionRegistry::new(&RegistryConfig::default());
        let game_id = registry
            .create_game_with_layout(self.mode, self.rows, self.cols, &self.mines)
            .unwrap();

        for player in &self.players {
            registry
                .join_game(&game_id, &connection(player), Some(player))
                .unwrap();
        }

        TestSetup {
            registry,
            game_id,
            players: self.players,
        }
    }
}

impl Default for TestSetupBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn connection(player: &str) -> String {
    format!("conn-{}", player)
}

// ============================================================================
// Player actions
// ============================================================================

impl TestSetup {
    pub fn reveal(&self, player: &str, row: usize, col: usize) -> Result<MoveResult, AppError> {
        self.registry
            .make_move(&self.game_id, &connection(player), MoveAction::Reveal, row, col)
    }

    pub fn flag(&self, player: &str, row: usize, col: usize) -> Result<MoveResult, AppError> {
        self.registry
            .make_move(&self.game_id, &connection(player), MoveAction::Flag, row, col)
    }

    pub fn join(&self, player: &str) -> Result<PlayerSlot, AppError> {
        self.registry
            .join_game(&self.game_id, &connection(player), Some(player))
            .map(|joined| joined.player_id)
    }

    pub fn disconnect(&self, player: &str) {
        self.registry.disconnect(&connection(player));
    }
}
