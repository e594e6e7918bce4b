//! cm-core: Cinq Mille rules engine.
//!
//! - `scoring`: pure hand scoring
//! - `turn`: one player's turn (roll / select / bank / bust)
//! - `game`: seating, rotation, opening rule, win detection
//!
//! Everything here is synchronous and single-writer; dice come from a
//! pluggable `DiceSource`.

pub mod config;
pub mod dice;
pub mod event;
pub mod game;
pub mod scoring;
pub mod state;
pub mod turn;

pub use config::{Config, ConfigError, RulesConfig, SimulationConfig};
pub use dice::{
    remaining_dice, select_dice, DiceRoll, DiceSource, RandomDice, ScriptedDice, MAX_DICE,
};
pub use event::GameEvent;
pub use game::GameOrchestrator;
pub use scoring::{calculate_score, can_score, ScoreError};
pub use state::{BankResolution, Player, TurnState, TurnStatus};
pub use turn::{TurnError, TurnOutcome, TurnStateMachine};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_nonempty() {
        assert!(!VERSION.is_empty());
    }
}

#[cfg(test)]
mod scoring_props;
