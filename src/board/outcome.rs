use serde::{Deserialize, Serialize};

use crate::game::PlayerSlot;

/// Result of a successful reveal.
///
/// On the wire every outcome is tagged by `"result"` and carries `game_over`; outcomes that
/// end the game also carry `won`, and mine outcomes carry `switch_turn`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "OutcomeWire", try_from = "OutcomeWire")]
pub enum RevealOutcome {
    /// The revealed cell was a mine
    Mine {
        game_over: bool,
        /// Survival mode asks for the turn to pass instead of ending the game
        switch_turn: bool,
        player_id: Option<PlayerSlot>,
    },
    /// The last safe cell was revealed
    Win { cells_revealed: usize },
    /// A safe cell (plus any flood-filled region) was revealed
    Number { value: u8, cells_revealed: usize },
}

impl RevealOutcome {
    pub fn is_game_over(&self) -> bool {
        match self {
            RevealOutcome::Mine { game_over, .. } => *game_over,
            RevealOutcome::Win { .. } => true,
            RevealOutcome::Number { .. } => false,
        }
    }

    pub fn won(&self) -> bool {
        matches!(self, RevealOutcome::Win { .. })
    }

    pub fn is_mine(&self) -> bool {
        matches!(self, RevealOutcome::Mine { .. })
    }

    /// Safe cells newly revealed by this move
    pub fn cells_revealed(&self) -> usize {
        match self {
            RevealOutcome::Mine { .. } => 0,
            RevealOutcome::Win { cells_revealed } | RevealOutcome::Number { cells_revealed, .. } => {
                *cells_revealed
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum FlagOutcome {
    Flagged,
    Unflagged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum OutcomeKind {
    Mine,
    Win,
    Number,
}

/// Flat JSON shape of a `RevealOutcome`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OutcomeWire {
    result: OutcomeKind,
    game_over: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    won: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    switch_turn: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    player_id: Option<PlayerSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cells_revealed: Option<usize>,
}

impl From<RevealOutcome> for OutcomeWire {
    fn from(outcome: RevealOutcome) -> Self {
        let game_over = outcome.is_game_over();
        let mut wire = OutcomeWire {
            result: OutcomeKind::Number,
            game_over,
            won: game_over.then(|| outcome.won()),
            switch_turn: None,
            player_id: None,
            value: None,
            cells_revealed: None,
        };

        match outcome {
            RevealOutcome::Mine {
                switch_turn,
                player_id,
                ..
            } => {
                wire.result = OutcomeKind::Mine;
                wire.switch_turn = Some(switch_turn);
                wire.player_id = player_id;
            }
            RevealOutcome::Win { cells_revealed } => {
                wire.result = OutcomeKind::Win;
                wire.cells_revealed = Some(cells_revealed);
            }
            RevealOutcome::Number {
                value,
                cells_revealed,
            } => {
                wire.value = Some(value);
                wire.cells_revealed = Some(cells_revealed);
            }
        }
        wire
    }
}

impl TryFrom<OutcomeWire> for RevealOutcome {
    type Error = String;

    fn try_from(wire: OutcomeWire) -> Result<Self, Self::Error> {
        let cells_revealed = || {
            wire.cells_revealed
                .ok_or_else(|| "missing field `cells_revealed`".to_string())
        };

        match wire.result {
            OutcomeKind::Mine => Ok(RevealOutcome::Mine {
                game_over: wire.game_over,
                switch_turn: wire.switch_turn.unwrap_or(!wire.game_over),
                player_id: wire.player_id,
            }),
            OutcomeKind::Win => Ok(RevealOutcome::Win {
                cells_revealed: cells_revealed()?,
            }),
            OutcomeKind::Number => Ok(RevealOutcome::Number {
                value: wire.value.ok_or_else(|| "missing field `value`".to_string())?,
                cells_revealed: cells_revealed()?,
            }),
        }
    }
}
