use crate::board::{GameMode, RevealOutcome};

/// Decides whether a reveal hands the turn to the other player. Picked once from the game mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPolicy {
    /// Classic: every reveal that does not end the game passes the turn
    Alternate,
    /// Survival: keep going until you hit a mine
    PassOnMine,
}

impl TurnPolicy {
    pub fn for_mode(mode: GameMode) -> Self {
        match mode {
            GameMode::Classic => TurnPolicy::Alternate,
            GameMode::Survival => TurnPolicy::PassOnMine,
        }
    }

    pub fn switches_after(&self, outcome: &RevealOutcome) -> bool {
        match self {
            TurnPolicy::Alternate => !outcome.is_game_over(),
            TurnPolicy::PassOnMine => matches!(
                outcome,
                RevealOutcome::Mine {
                    switch_turn: true,
                    ..
                }
            ),
        }
    }
}
