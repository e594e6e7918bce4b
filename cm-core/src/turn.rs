//! Single-turn state machine: roll, set aside scoring dice, roll again or bank.
//!
//! `Idle -> Active -> Ended`. A machine lives for exactly one player's turn and
//! is discarded once it reaches `Ended`.

use thiserror::Error;
use tracing::debug;

use crate::dice::{self, DiceRoll, DiceSource, MAX_DICE};
use crate::scoring::{calculate_score, ScoreError};
use crate::state::{TurnState, TurnStatus};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurnError {
    /// The request is not legal in the current turn state. Nothing changed.
    #[error("invalid action: {message}")]
    InvalidAction { message: &'static str },
    /// The dice source broke its contract. Nothing changed.
    #[error("dice source produced an invalid roll: {0}")]
    Dice(#[from] ScoreError),
}

impl TurnError {
    fn invalid(message: &'static str) -> Self {
        TurnError::InvalidAction { message }
    }
}

/// Result of a legal turn operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Fresh dice are on the table. `can_score` is always true here; a
    /// non-scoring roll busts instead.
    Rolled { dice: DiceRoll, can_score: bool },
    /// A selection was set aside.
    Scored {
        increment: u32,
        turn_total: u32,
        next_roll_dice_count: usize,
        can_roll_again: bool,
    },
    /// The turn ended with nothing; accumulated points are lost.
    Busted,
    /// The player stopped and keeps `score`.
    Banked { score: u32 },
}

#[derive(Debug, Clone, Default)]
pub struct TurnStateMachine {
    state: TurnState,
    /// True between a roll and the selection made from it.
    awaiting_selection: bool,
}

impl TurnStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &TurnState {
        &self.state
    }

    pub fn status(&self) -> TurnStatus {
        self.state.status
    }

    pub fn is_awaiting_selection(&self) -> bool {
        self.awaiting_selection
    }

    /// Roll `dice_remaining` dice (six on the first roll of the turn).
    ///
    /// A roll that cannot score busts the turn.
    pub fn roll_or_continue<D: DiceSource + ?Sized>(
        &mut self,
        source: &mut D,
    ) -> Result<TurnOutcome, TurnError> {
        let (base_score, n) = match self.state.status {
            TurnStatus::Ended => return Err(TurnError::invalid("turn already ended")),
            TurnStatus::Idle => (0, MAX_DICE),
            TurnStatus::Active => (self.state.accumulated_score, self.state.dice_remaining),
        };

        let roll = source.roll(n);
        let roll_score = calculate_score(&roll)?;

        if (roll.is_empty() && n > 0) || roll_score == 0 {
            debug!(dice = ?roll, lost = base_score, "turn: roll busted");
            self.state.last_roll = roll;
            self.bust();
            return Ok(TurnOutcome::Busted);
        }

        debug!(dice = ?roll, turn_total = base_score, "turn: rolled");
        self.state.accumulated_score = base_score;
        self.state.dice_remaining = n;
        self.state.last_roll = roll.clone();
        self.state.status = TurnStatus::Active;
        self.awaiting_selection = true;

        Ok(TurnOutcome::Rolled {
            dice: roll,
            can_score: true,
        })
    }

    /// Set aside the dice at `indices` of the latest roll.
    ///
    /// Out-of-range and duplicate indices are ignored. A selection worth
    /// nothing busts the turn; taking every die earns a fresh six.
    pub fn select_dice(&mut self, indices: &[usize]) -> Result<TurnOutcome, TurnError> {
        if self.state.status != TurnStatus::Active {
            return Err(TurnError::invalid("no turn in progress"));
        }
        if !self.awaiting_selection || self.state.last_roll.is_empty() {
            return Err(TurnError::invalid("no roll awaiting selection"));
        }

        let selected = dice::select_dice(&self.state.last_roll, indices);
        if selected.is_empty() && !indices.is_empty() {
            return Err(TurnError::invalid("invalid dice indices, nothing selected"));
        }
        if selected.is_empty() {
            return Err(TurnError::invalid("select at least one scoring die"));
        }

        let increment = calculate_score(&selected)?;
        if increment == 0 {
            debug!(selected = ?selected, lost = self.state.accumulated_score, "turn: selection busted");
            self.bust();
            return Ok(TurnOutcome::Busted);
        }

        let left = self.state.last_roll.len() - selected.len();
        let next_roll_dice_count = if left == 0 { MAX_DICE } else { left };

        self.state.accumulated_score = self.state.accumulated_score.saturating_add(increment);
        self.state.dice_remaining = next_roll_dice_count;
        self.awaiting_selection = false;

        debug!(
            selected = ?selected,
            increment,
            turn_total = self.state.accumulated_score,
            next_roll_dice_count,
            "turn: scored"
        );

        Ok(TurnOutcome::Scored {
            increment,
            turn_total: self.state.accumulated_score,
            next_roll_dice_count,
            can_roll_again: true,
        })
    }

    /// Stop and keep the accumulated score.
    pub fn bank(&mut self) -> Result<TurnOutcome, TurnError> {
        if self.state.status != TurnStatus::Active {
            return Err(TurnError::invalid("cannot bank: no turn in progress or turn already ended"));
        }
        let score = self.state.accumulated_score;
        self.state.status = TurnStatus::Ended;
        self.awaiting_selection = false;
        debug!(score, "turn: banked");
        Ok(TurnOutcome::Banked { score })
    }

    fn bust(&mut self) {
        self.state.accumulated_score = 0;
        self.state.status = TurnStatus::Ended;
        self.awaiting_selection = false;
    }
}
