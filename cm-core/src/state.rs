//! Player records and per-turn state.

use serde::{Deserialize, Serialize};

use crate::dice::{DiceRoll, MAX_DICE};

/// One seat at the table.
///
/// Players are values: banking produces a new `Player` rather than mutating a
/// shared record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// 1-based seat id.
    pub id: u32,
    pub total_score: u32,
    /// Set once the player has banked at least the opening threshold.
    pub has_opened: bool,
    /// Score of the most recently banked turn (kept even when it failed to open).
    pub last_turn_score: u32,
}

/// How a banked turn score was applied to a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankResolution {
    /// First bank at or above the opening threshold.
    Opened,
    /// Regular bank by a player who already opened.
    Scored,
    /// Bank below the opening threshold; the score is discarded.
    FailedToOpen,
}

impl Player {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            total_score: 0,
            has_opened: false,
            last_turn_score: 0,
        }
    }

    /// Apply a banked turn score under the opening rule.
    pub fn bank(self, turn_score: u32, opening_threshold: u32) -> (Player, BankResolution) {
        let mut next = Player {
            last_turn_score: turn_score,
            ..self
        };
        let resolution = if self.has_opened {
            next.total_score = self.total_score.saturating_add(turn_score);
            BankResolution::Scored
        } else if turn_score >= opening_threshold {
            next.has_opened = true;
            next.total_score = self.total_score.saturating_add(turn_score);
            BankResolution::Opened
        } else {
            BankResolution::FailedToOpen
        };
        (next, resolution)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStatus {
    /// No roll yet this turn.
    Idle,
    /// A roll awaits selection, or points were set aside and the player may roll again.
    Active,
    /// Busted or banked.
    Ended,
}

/// Snapshot of one player's turn in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    pub accumulated_score: u32,
    /// Dice for the next roll, in 0..=6 (0 is never stored; hot dice resets to 6).
    pub dice_remaining: usize,
    pub last_roll: DiceRoll,
    pub status: TurnStatus,
}

impl Default for TurnState {
    fn default() -> Self {
        Self {
            accumulated_score: 0,
            dice_remaining: MAX_DICE,
            last_roll: Vec::new(),
            status: TurnStatus::Idle,
        }
    }
}
