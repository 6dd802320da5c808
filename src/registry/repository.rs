use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::config::{CreateGameRequest, CreatedGame, GameConfig, RegistryConfig};
use super::generators::{GameIdGenerator, ShortUuidGenerator};
use crate::board::{Board, Coord, GameMode, GameStatus};
use crate::game::{GameSession, GameSnapshot, MoveAction, MoveResult, PlayerSlot, Roster};
use crate::shared::AppError;

const MAX_ID_ATTEMPTS: usize = 8;

/// Result of seating a connection in a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinResult {
    pub game_id: String,
    pub player_id: PlayerSlot,
    pub players: Roster,
}

/// Cheap existence probe for a game id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub exists: bool,
    pub players_count: usize,
    pub status: Option<GameStatus>,
}

/// Seat vacated by a disconnect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disconnected {
    pub game_id: String,
    pub player_id: PlayerSlot,
}

type SharedSession = Arc<Mutex<GameSession>>;

/// In-memory store of live game sessions.
///
/// Each session sits behind its own mutex, held for the whole of a join or move, so two
/// messages for one game serialize while other games proceed. Lock order is
/// sessions map, then a session, then the connection map; nothing waits on the sessions
/// map while holding a session.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, SharedSession>>,
    /// connection id -> game id
    connections: RwLock<HashMap<String, String>>,
    id_generator: Box<dyn GameIdGenerator>,
    idle_timeout: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(&RegistryConfig::default())
    }
}

impl SessionRegistry {
    pub fn new(config: &RegistryConfig) -> Self {
        Self::with_generator(config, Box::new(ShortUuidGenerator::new()))
    }

    pub fn with_generator(config: &RegistryConfig, id_generator: Box<dyn GameIdGenerator>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            connections: RwLock::new(HashMap::new()),
            id_generator,
            idle_timeout: config.idle_timeout,
        }
    }

    #[instrument(skip(self))]
    pub fn create_game(&self, request: &CreateGameRequest) -> Result<CreatedGame, AppError> {
        let config = GameConfig::resolve(
            request.difficulty,
            request.rows,
            request.cols,
            request.mines,
        )?;
        let board = Board::new(config.rows, config.cols, config.mines, request.mode)?;
        let game_id = self.insert_session(board);

        info!(
            game_id = %game_id,
            difficulty = %request.difficulty,
            mode = %request.mode,
            rows = config.rows,
            cols = config.cols,
            mines = config.mines,
            "Game created"
        );

        Ok(CreatedGame {
            game_id,
            difficulty: request.difficulty,
            game_mode: request.mode,
            config,
        })
    }

    /// Create a game whose mines are already laid out
    #[instrument(skip(self, mines))]
    pub fn create_game_with_layout(
        &self,
        mode: GameMode,
        rows: usize,
        cols: usize,
        mines: &[Coord],
    ) -> Result<String, AppError> {
        let board = Board::with_layout(rows, cols, mode, mines)?;
        let game_id = self.insert_session(board);

        info!(game_id = %game_id, mode = %mode, mines = mines.len(), "Game created with fixed layout");
        Ok(game_id)
    }

    #[instrument(skip(self))]
    pub fn join_game(
        &self,
        game_id: &str,
        connection_id: &str,
        name: Option<&str>,
    ) -> Result<JoinResult, AppError> {
        let previous = read(&self.connections).get(connection_id).cloned();

        let session = self.session(game_id).ok_or_else(|| {
            warn!(game_id = %game_id, "Join for unknown game");
            AppError::game_not_found(game_id)
        })?;

        let (slot, players) = {
            let mut guard = lock(&session);
            if guard.is_evicted() {
                return Err(AppError::game_not_found(game_id));
            }

            let slot = guard.join(connection_id, name, Utc::now()).map_err(|e| {
                debug!(game_id = %game_id, error = %e, "Join rejected");
                AppError::from(e)
            })?;

            write(&self.connections).insert(connection_id.to_string(), game_id.to_string());
            (slot, guard.roster())
        };

        // A connection plays one game at a time; the old seat goes only once the new one is held
        if let Some(previous) = previous.filter(|prev| prev != game_id) {
            self.vacate(&previous, connection_id);
        }

        info!(
            game_id = %game_id,
            player = %slot,
            player_count = players.len(),
            "Player joined game"
        );

        Ok(JoinResult {
            game_id: game_id.to_string(),
            player_id: slot,
            players,
        })
    }

    #[instrument(skip(self))]
    pub fn make_move(
        &self,
        game_id: &str,
        connection_id: &str,
        action: MoveAction,
        row: usize,
        col: usize,
    ) -> Result<MoveResult, AppError> {
        let session = self
            .session(game_id)
            .ok_or_else(|| AppError::game_not_found(game_id))?;

        let mut guard = lock(&session);
        if guard.is_evicted() {
            return Err(AppError::game_not_found(game_id));
        }

        let slot = guard.slot_for(connection_id).ok_or_else(|| {
            warn!(game_id = %game_id, "Move from a connection that is not seated");
            AppError::NotInGame
        })?;

        let outcome = guard
            .apply_move(slot, action, row, col, Utc::now())
            .map_err(|e| {
                debug!(game_id = %game_id, player = %slot, error = %e, "Move rejected");
                AppError::from(e)
            })?;

        debug!(
            game_id = %game_id,
            player = %slot,
            action = %action,
            row = row,
            col = col,
            "Move applied"
        );
        if outcome.is_game_over() {
            info!(game_id = %game_id, player = %slot, won = outcome.won(), "Game over");
        }

        let snapshot = guard.snapshot();
        Ok(MoveResult {
            player_id: slot,
            action,
            row,
            col,
            result: outcome,
            current_player: snapshot.current_player,
            snapshot,
        })
    }

    pub fn get_state(&self, game_id: &str) -> Option<GameSnapshot> {
        let session = self.session(game_id)?;
        let guard = lock(&session);
        (!guard.is_evicted()).then(|| guard.snapshot())
    }

    pub fn game_status(&self, game_id: &str) -> GameSummary {
        let Some(session) = self.session(game_id) else {
            return GameSummary {
                exists: false,
                players_count: 0,
                status: None,
            };
        };

        let guard = lock(&session);
        GameSummary {
            exists: !guard.is_evicted(),
            players_count: guard.player_count(),
            status: Some(guard.board().status()),
        }
    }

    /// Game and seat a connection is playing in
    pub fn resolve(&self, connection_id: &str) -> Option<(String, PlayerSlot)> {
        let game_id = read(&self.connections).get(connection_id).cloned()?;
        let session = self.session(&game_id)?;
        let slot = lock(&session).slot_for(connection_id)?;
        Some((game_id, slot))
    }

    /// Vacate the connection's seat. Safe to call repeatedly.
    #[instrument(skip(self))]
    pub fn disconnect(&self, connection_id: &str) -> Option<Disconnected> {
        let game_id = write(&self.connections).remove(connection_id)?;
        let slot = self.vacate(&game_id, connection_id)?;

        Some(Disconnected {
            game_id,
            player_id: slot,
        })
    }

    /// Evict every session idle for longer than the timeout. Returns the number evicted.
    #[instrument(skip(self))]
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut evicted = Vec::new();

        write(&self.sessions).retain(|game_id, session| {
            // Waits for any move in flight on this session
            let mut guard = lock(session);
            if guard.is_idle(now, self.idle_timeout) {
                guard.mark_evicted();
                evicted.push(game_id.clone());
                false
            } else {
                true
            }
        });

        if !evicted.is_empty() {
            write(&self.connections).retain(|_, game_id| !evicted.contains(game_id));
            for game_id in &evicted {
                info!(game_id = %game_id, "Evicted idle game");
            }
        }

        evicted.len()
    }

    pub fn session_count(&self) -> usize {
        read(&self.sessions).len()
    }

    /// Free the seat `connection_id` holds in `game_id`, leaving the connection map alone
    fn vacate(&self, game_id: &str, connection_id: &str) -> Option<PlayerSlot> {
        let session = self.session(game_id)?;

        let mut guard = lock(&session);
        let slot = guard.slot_for(connection_id)?;
        guard.leave(slot);

        info!(
            game_id = %game_id,
            player = %slot,
            remaining = guard.player_count(),
            "Player left game"
        );
        Some(slot)
    }

    fn session(&self, game_id: &str) -> Option<SharedSession> {
        read(&self.sessions).get(game_id).cloned()
    }

    fn insert_session(&self, board: Board) -> String {
        let mut sessions = write(&self.sessions);

        let game_id = (0..MAX_ID_ATTEMPTS)
            .map(|_| self.id_generator.generate())
            .find(|id| !sessions.contains_key(id))
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let session = GameSession::new(game_id.clone(), board, Utc::now());
        sessions.insert(game_id.clone(), Arc::new(Mutex::new(session)));
        game_id
    }
}

// A poisoned lock only means another handler panicked mid-operation; the data is still usable.
fn lock(session: &Mutex<GameSession>) -> MutexGuard<'_, GameSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
