// A GameSession wraps one Board with the two seats, the turn pointer and per-player stats.

// The session is the unit of exclusive access: the registry holds one lock per session and
// every method here runs under it, so a move is validated, applied and snapshotted atomically.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumString};

use super::errors::GameError;
use super::player::{Player, PlayerSlot, Roster};
use super::stats::PlayerStats;
use super::turn_policy::TurnPolicy;
use crate::board::{
    Board, BoardView, Coord, FlagOutcome, GameMode, GameStatus, RevealOutcome,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MoveAction {
    Reveal,
    Flag,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MoveOutcome {
    Reveal(RevealOutcome),
    Flag(FlagOutcome),
}

impl MoveOutcome {
    pub fn is_game_over(&self) -> bool {
        match self {
            MoveOutcome::Reveal(outcome) => outcome.is_game_over(),
            MoveOutcome::Flag(_) => false,
        }
    }

    pub fn won(&self) -> bool {
        match self {
            MoveOutcome::Reveal(outcome) => outcome.won(),
            MoveOutcome::Flag(_) => false,
        }
    }
}

/// Everything a client needs to render the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub game_id: String,
    pub game_state: BoardView,
    pub current_player: Option<PlayerSlot>,
    pub players: Roster,
    pub status: GameStatus,
    pub game_mode: GameMode,
    pub player_stats: BTreeMap<PlayerSlot, PlayerStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveResult {
    pub player_id: PlayerSlot,
    pub action: MoveAction,
    pub row: usize,
    pub col: usize,
    pub result: MoveOutcome,
    pub current_player: Option<PlayerSlot>,
    pub snapshot: GameSnapshot,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    id: String,
    board: Board,
    policy: TurnPolicy,
    players: [Option<Player>; 2],
    current_player: Option<PlayerSlot>,
    stats: [PlayerStats; 2],
    turn_started: [Option<DateTime<Utc>>; 2],
    created_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
    evicted: bool,
}

impl GameSession {
    pub fn new(id: String, board: Board, now: DateTime<Utc>) -> Self {
        Self {
            id,
            policy: TurnPolicy::for_mode(board.mode()),
            board,
            players: [None, None],
            current_player: None,
            stats: Default::default(),
            turn_started: [None, None],
            created_at: now,
            last_activity: now,
            evicted: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Option<PlayerSlot> {
        self.current_player
    }

    pub fn player(&self, slot: PlayerSlot) -> Option<&Player> {
        self.players[slot.index()].as_ref()
    }

    pub fn stats(&self, slot: PlayerSlot) -> &PlayerStats {
        &self.stats[slot.index()]
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    pub fn player_count(&self) -> usize {
        self.players.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.player_count() == 0
    }

    pub fn roster(&self) -> Roster {
        PlayerSlot::iter()
            .filter_map(|slot| self.player(slot).map(|p| (slot, p.name.clone())))
            .collect()
    }

    pub fn slot_for(&self, connection_id: &str) -> Option<PlayerSlot> {
        PlayerSlot::iter().find(|slot| {
            self.player(*slot)
                .is_some_and(|p| p.connection_id == connection_id)
        })
    }

    /// Seat a connection in the first free slot. Joining again from a seated connection
    /// returns its existing slot.
    pub fn join(
        &mut self,
        connection_id: &str,
        name: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<PlayerSlot, GameError> {
        if let Some(slot) = self.slot_for(connection_id) {
            return Ok(slot);
        }

        let slot = PlayerSlot::iter()
            .find(|slot| self.players[slot.index()].is_none())
            .ok_or(GameError::GameFull)?;

        let name = match name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => slot.default_name(),
        };

        self.players[slot.index()] = Some(Player {
            connection_id: connection_id.to_string(),
            name,
            joined_at: now,
        });

        if self.current_player.is_none() {
            self.current_player = Some(slot);
        }

        self.last_activity = now;
        Ok(slot)
    }

    /// Vacate a seat. An empty session is stamped so the next sweep evicts it.
    ///
    /// The turn pointer is left alone: if the current player leaves, the other player gets
    /// `NotYourTurn` until someone takes the vacated seat and inherits the turn.
    pub fn leave(&mut self, slot: PlayerSlot) -> Option<Player> {
        let player = self.players[slot.index()].take()?;
        self.turn_started[slot.index()] = None;

        if self.is_empty() {
            self.last_activity = DateTime::<Utc>::MIN_UTC;
        }
        Some(player)
    }

    pub fn apply_move(
        &mut self,
        slot: PlayerSlot,
        action: MoveAction,
        row: usize,
        col: usize,
        now: DateTime<Utc>,
    ) -> Result<MoveOutcome, GameError> {
        if self.player(slot).is_none() {
            return Err(GameError::NotInGame);
        }
        if self.current_player != Some(slot) {
            return Err(GameError::NotYourTurn);
        }

        let i = slot.index();
        let outcome = match action {
            MoveAction::Reveal => {
                let outcome = self.board.reveal(row, col, Some(slot))?;
                self.stats[i].record_reveal(&outcome);
                MoveOutcome::Reveal(outcome)
            }
            MoveAction::Flag => {
                let outcome = self.board.toggle_flag(row, col)?;
                let on_mine = self.board.is_mine(Coord::new(row, col));
                self.stats[i].record_flag(outcome, on_mine);
                MoveOutcome::Flag(outcome)
            }
        };

        let started = self.turn_started[i].unwrap_or(now);
        self.stats[i].add_time(started, now);
        self.turn_started[i] = Some(now);

        if let MoveOutcome::Reveal(reveal) = &outcome {
            let next = slot.other();
            // The turn never moves to an empty seat
            if self.policy.switches_after(reveal) && self.player(next).is_some() {
                self.current_player = Some(next);
                self.turn_started[next.index()] = Some(now);
            }
        }

        self.last_activity = now;
        Ok(outcome)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            game_id: self.id.clone(),
            game_state: self.board.serialize(false),
            current_player: self.current_player,
            players: self.roster(),
            status: self.board.status(),
            game_mode: self.board.mode(),
            player_stats: PlayerSlot::iter()
                .map(|slot| (slot, self.stats(slot).clone()))
                .collect(),
        }
    }

    /// True once `timeout` has passed since the last successful join or move
    pub fn is_idle(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        match (now - self.last_activity).to_std() {
            Ok(elapsed) => elapsed > timeout,
            Err(_) => false,
        }
    }

    pub(crate) fn mark_evicted(&mut self) {
        self.evicted = true;
    }

    pub(crate) fn is_evicted(&self) -> bool {
        self.evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    mod helpers {
        use super::*;

        /// 5x5 board, mines at (2,3) and (4,4), with both seats filled
        pub fn seated_session(mode: GameMode) -> (GameSession, DateTime<Utc>) {
            let now = Utc::now();
            let board =
                Board::with_layout(5, 5, mode, &[Coord::new(2, 3), Coord::new(4, 4)]).unwrap();
            let mut session = GameSession::new("abcd1234".to_string(), board, now);
            session.join("conn-a", Some("Alice"), now).unwrap();
            session.join("conn-b", Some("Bob"), now).unwrap();
            (session, now)
        }
    }

    use helpers::*;

    #[test]
    fn test_join_assigns_slots_in_order() {
        let now = Utc::now();
        let board = Board::new(9, 9, 10, GameMode::Classic).unwrap();
        let mut session = GameSession::new("g1".to_string(), board, now);

        assert_eq!(session.join("conn-a", None, now), Ok(PlayerSlot::Player1));
        assert_eq!(session.current_player(), Some(PlayerSlot::Player1));
        assert_eq!(session.join("conn-b", Some("  Bob "), now), Ok(PlayerSlot::Player2));
        assert_eq!(session.current_player(), Some(PlayerSlot::Player1));

        let roster = session.roster();
        assert_eq!(roster.get(&PlayerSlot::Player1).unwrap(), "Player 1");
        assert_eq!(roster.get(&PlayerSlot::Player2).unwrap(), "Bob");
    }

    #[test]
    fn test_third_join_is_rejected() {
        let (mut session, now) = seated_session(GameMode::Classic);
        let before = session.roster();

        assert_eq!(session.join("conn-c", Some("Carol"), now), Err(GameError::GameFull));
        assert_eq!(session.roster(), before);
        // Rejoining from a seated connection is not a new join
        assert_eq!(session.join("conn-b", None, now), Ok(PlayerSlot::Player2));
    }

    #[test]
    fn test_move_out_of_turn_changes_nothing() {
        let (mut session, now) = seated_session(GameMode::Classic);
        let before = session.snapshot();

        let result = session.apply_move(PlayerSlot::Player2, MoveAction::Reveal, 0, 0, now);

        assert_eq!(result, Err(GameError::NotYourTurn));
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn test_classic_alternates_on_reveal_not_on_flag() {
        let (mut session, now) = seated_session(GameMode::Classic);

        session
            .apply_move(PlayerSlot::Player1, MoveAction::Flag, 2, 3, now)
            .unwrap();
        assert_eq!(session.current_player(), Some(PlayerSlot::Player1));
        assert_eq!(session.stats(PlayerSlot::Player1).mines_flagged, 1);

        session
            .apply_move(PlayerSlot::Player1, MoveAction::Reveal, 1, 2, now)
            .unwrap();
        assert_eq!(session.current_player(), Some(PlayerSlot::Player2));

        session
            .apply_move(PlayerSlot::Player2, MoveAction::Reveal, 1, 3, now)
            .unwrap();
        assert_eq!(session.current_player(), Some(PlayerSlot::Player1));
    }

    #[test]
    fn test_classic_mine_freezes_turn() {
        let (mut session, now) = seated_session(GameMode::Classic);

        let outcome = session
            .apply_move(PlayerSlot::Player1, MoveAction::Reveal, 4, 4, now)
            .unwrap();

        assert!(outcome.is_game_over());
        assert!(!outcome.won());
        assert_eq!(session.current_player(), Some(PlayerSlot::Player1));
        assert_eq!(session.stats(PlayerSlot::Player1).mines_hit, 1);
        assert_eq!(
            session.apply_move(PlayerSlot::Player1, MoveAction::Reveal, 0, 0, now),
            Err(GameError::Move(crate::board::MoveError::GameNotInPlay))
        );
    }

    #[test]
    fn test_survival_keeps_turn_until_mine() {
        let (mut session, now) = seated_session(GameMode::Survival);

        for (row, col) in [(1, 2), (1, 3), (1, 4)] {
            session
                .apply_move(PlayerSlot::Player1, MoveAction::Reveal, row, col, now)
                .unwrap();
            assert_eq!(session.current_player(), Some(PlayerSlot::Player1));
        }

        let outcome = session
            .apply_move(PlayerSlot::Player1, MoveAction::Reveal, 2, 3, now)
            .unwrap();

        assert_eq!(
            outcome,
            MoveOutcome::Reveal(RevealOutcome::Mine {
                game_over: false,
                switch_turn: true,
                player_id: Some(PlayerSlot::Player1)
            })
        );
        assert_eq!(session.current_player(), Some(PlayerSlot::Player2));
        assert_eq!(session.board().hit_by(Coord::new(2, 3)), Some(PlayerSlot::Player1));
        assert_eq!(session.stats(PlayerSlot::Player1).cells_revealed, 3);
        assert_eq!(session.stats(PlayerSlot::Player1).mines_hit, 1);
    }

    #[test]
    fn test_turn_does_not_pass_to_empty_seat() {
        let now = Utc::now();
        let board = Board::with_layout(5, 5, GameMode::Classic, &[Coord::new(4, 4)]).unwrap();
        let mut session = GameSession::new("solo".to_string(), board, now);
        session.join("conn-a", None, now).unwrap();

        session
            .apply_move(PlayerSlot::Player1, MoveAction::Reveal, 3, 3, now)
            .unwrap();

        assert_eq!(session.current_player(), Some(PlayerSlot::Player1));
    }

    #[test]
    fn test_time_played_accumulates_per_turn() {
        let (mut session, start) = seated_session(GameMode::Classic);

        // First move has no recorded turn start
        session
            .apply_move(PlayerSlot::Player1, MoveAction::Reveal, 1, 2, start)
            .unwrap();
        assert_eq!(session.stats(PlayerSlot::Player1).time_played, 0.0);

        // Bob's turn started when Alice moved
        let later = start + ChronoDuration::seconds(4);
        session
            .apply_move(PlayerSlot::Player2, MoveAction::Flag, 4, 4, later)
            .unwrap();
        let later_still = later + ChronoDuration::seconds(1);
        session
            .apply_move(PlayerSlot::Player2, MoveAction::Reveal, 1, 3, later_still)
            .unwrap();

        let bob = session.stats(PlayerSlot::Player2);
        assert!((bob.time_played - 5.0).abs() < 1e-9);
        assert_eq!(bob.mines_flagged, 1);
    }

    #[test]
    fn test_leave_last_player_marks_for_eviction() {
        let (mut session, now) = seated_session(GameMode::Classic);
        let timeout = Duration::from_secs(3600);

        assert!(session.leave(PlayerSlot::Player1).is_some());
        assert!(!session.is_idle(now, timeout));
        // The turn pointer stays with the vacated seat
        assert_eq!(session.current_player(), Some(PlayerSlot::Player1));

        assert!(session.leave(PlayerSlot::Player2).is_some());
        assert!(session.leave(PlayerSlot::Player2).is_none());
        assert!(session.is_empty());
        assert!(session.is_idle(now, timeout));
    }

    #[test]
    fn test_current_player_leaving_blocks_the_other() {
        let (mut session, now) = seated_session(GameMode::Classic);
        session.leave(PlayerSlot::Player1);

        assert_eq!(
            session.apply_move(PlayerSlot::Player2, MoveAction::Reveal, 0, 0, now),
            Err(GameError::NotYourTurn)
        );

        session.join("conn-c", None, now).unwrap();
        assert!(session
            .apply_move(PlayerSlot::Player1, MoveAction::Reveal, 0, 0, now)
            .is_ok());
    }

    #[test]
    fn test_rejoin_takes_vacated_seat() {
        let (mut session, now) = seated_session(GameMode::Classic);
        session.leave(PlayerSlot::Player1);

        assert_eq!(session.join("conn-c", Some("Carol"), now), Ok(PlayerSlot::Player1));
        assert_eq!(session.current_player(), Some(PlayerSlot::Player1));
        assert_eq!(session.slot_for("conn-c"), Some(PlayerSlot::Player1));
        assert_eq!(session.slot_for("conn-a"), None);
    }

    #[test]
    fn test_snapshot_contents() {
        let (mut session, now) = seated_session(GameMode::Survival);
        session
            .apply_move(PlayerSlot::Player1, MoveAction::Reveal, 2, 3, now)
            .unwrap();

        let snapshot = session.snapshot();

        assert_eq!(snapshot.game_id, "abcd1234");
        assert_eq!(snapshot.game_mode, GameMode::Survival);
        assert_eq!(snapshot.status, GameStatus::Playing);
        assert_eq!(snapshot.current_player, Some(PlayerSlot::Player2));
        assert_eq!(snapshot.players.len(), 2);
        assert_eq!(snapshot.player_stats[&PlayerSlot::Player1].mines_hit, 1);
        assert_eq!(snapshot.game_state.mine_hits, vec![Coord::new(2, 3)]);
        assert!(snapshot.game_state.mine_positions.is_empty());
    }
}
