use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::board::{FlagOutcome, RevealOutcome};

/// Running totals for one player in one game
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub mines_hit: u32,
    pub cells_revealed: u32,
    pub mines_flagged: u32,
    /// Seconds spent on this player's moves
    pub time_played: f64,
}

impl PlayerStats {
    pub fn record_reveal(&mut self, outcome: &RevealOutcome) {
        if outcome.is_mine() {
            self.mines_hit += 1;
        } else {
            self.cells_revealed += outcome.cells_revealed() as u32;
        }
    }

    /// Only flags placed on real mines count
    pub fn record_flag(&mut self, outcome: FlagOutcome, on_mine: bool) {
        if !on_mine {
            return;
        }
        match outcome {
            FlagOutcome::Flagged => self.mines_flagged += 1,
            FlagOutcome::Unflagged => self.mines_flagged = self.mines_flagged.saturating_sub(1),
        }
    }

    pub fn add_time(&mut self, since: DateTime<Utc>, now: DateTime<Utc>) {
        let elapsed = (now - since).num_milliseconds().max(0);
        self.time_played += elapsed as f64 / 1000.0;
    }
}
