//! Events produced by the game orchestrator.
//!
//! One flat union: turn progress and game outcomes share a single tag, so
//! consumers dispatch once. Every orchestrator call yields exactly one event.

use serde::Serialize;

use crate::dice::DiceRoll;
use crate::state::Player;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameEvent {
    GameStarted {
        players: Vec<Player>,
        first_player: Player,
    },
    PlayerTurnStarted {
        player: Player,
    },

    // Turn progress for the current player.
    Rolled {
        dice: DiceRoll,
        can_score: bool,
    },
    Scored {
        increment: u32,
        turn_total: u32,
        next_roll_dice_count: usize,
        can_roll_again: bool,
    },
    InvalidAction {
        message: String,
    },

    // Turn endings. `player` is the snapshot after the bank was applied.
    PlayerOpenedAndScored {
        player: Player,
        turn_score: u32,
        new_total: u32,
    },
    PlayerScored {
        player: Player,
        turn_score: u32,
        new_total: u32,
    },
    PlayerFailedToOpen {
        player: Player,
        attempted_score: u32,
    },
    PlayerBusted {
        player: Player,
    },
    PlayerWon {
        player: Player,
        final_score: u32,
    },

    InvalidGameAction {
        message: String,
    },
}

impl GameEvent {
    /// Stable snake_case name of the variant (matches the serialized `kind`).
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::GameStarted { .. } => "game_started",
            GameEvent::PlayerTurnStarted { .. } => "player_turn_started",
            GameEvent::Rolled { .. } => "rolled",
            GameEvent::Scored { .. } => "scored",
            GameEvent::InvalidAction { .. } => "invalid_action",
            GameEvent::PlayerOpenedAndScored { .. } => "player_opened_and_scored",
            GameEvent::PlayerScored { .. } => "player_scored",
            GameEvent::PlayerFailedToOpen { .. } => "player_failed_to_open",
            GameEvent::PlayerBusted { .. } => "player_busted",
            GameEvent::PlayerWon { .. } => "player_won",
            GameEvent::InvalidGameAction { .. } => "invalid_game_action",
        }
    }

    /// True when this event closes the acting player's turn.
    pub fn ends_turn(&self) -> bool {
        matches!(
            self,
            GameEvent::PlayerOpenedAndScored { .. }
                | GameEvent::PlayerScored { .. }
                | GameEvent::PlayerFailedToOpen { .. }
                | GameEvent::PlayerBusted { .. }
                | GameEvent::PlayerWon { .. }
        )
    }

    pub fn is_invalid(&self) -> bool {
        matches!(
            self,
            GameEvent::InvalidAction { .. } | GameEvent::InvalidGameAction { .. }
        )
    }
}
