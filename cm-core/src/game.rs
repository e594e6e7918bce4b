//! Game orchestration: seating, turn rotation, the opening rule and the win check.
//!
//! The orchestrator is the single writer of the roster. It owns at most one
//! live `TurnStateMachine` (the current player's) and turns every request into
//! exactly one `GameEvent`. Callers that can issue commands concurrently must
//! serialize them before they reach this type.

use tracing::{debug, info};

use crate::config::RulesConfig;
use crate::dice::DiceSource;
use crate::event::GameEvent;
use crate::state::{BankResolution, Player, TurnState};
use crate::turn::{TurnError, TurnOutcome, TurnStateMachine};

pub struct GameOrchestrator<D> {
    rules: RulesConfig,
    dice: D,
    /// Seating order; ids are 1..=N.
    players: Vec<Player>,
    /// Some(idx) exactly while a game is in progress.
    current: Option<usize>,
    turn: Option<TurnStateMachine>,
    winner: Option<usize>,
}

impl<D: DiceSource> GameOrchestrator<D> {
    /// Orchestrator with the standard thresholds (open at 750, win at 5000).
    pub fn new(dice: D) -> Self {
        Self::with_rules(RulesConfig::default(), dice)
    }

    pub fn with_rules(rules: RulesConfig, dice: D) -> Self {
        Self {
            rules,
            dice,
            players: Vec::new(),
            current: None,
            turn: None,
            winner: None,
        }
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn is_in_progress(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.current.map(|i| &self.players[i])
    }

    pub fn current_player_id(&self) -> Option<u32> {
        self.current_player().map(|p| p.id)
    }

    /// State of the live turn, if a game is in progress.
    pub fn turn_state(&self) -> Option<&TurnState> {
        self.current.and(self.turn.as_ref()).map(|t| t.state())
    }

    pub fn winner(&self) -> Option<&Player> {
        self.winner.map(|i| &self.players[i])
    }

    pub fn dice_source_mut(&mut self) -> &mut D {
        &mut self.dice
    }

    /// Seat `player_count` fresh players and hand the first turn to player 1.
    ///
    /// Starting again while a game is running discards it.
    pub fn start_game(&mut self, player_count: usize) -> GameEvent {
        let count = match u32::try_from(player_count) {
            Ok(n) if n > 0 => n,
            _ => return invalid_game_action("number of players must be positive"),
        };

        self.players = (1..=count).map(Player::new).collect();
        self.current = Some(0);
        self.turn = Some(TurnStateMachine::new());
        self.winner = None;

        info!(players = count, "game started");
        GameEvent::GameStarted {
            players: self.players.clone(),
            first_player: self.players[0],
        }
    }

    /// Report whose turn it is, without changing anything.
    pub fn announce_turn(&self) -> GameEvent {
        match self.current_player() {
            Some(&player) => GameEvent::PlayerTurnStarted { player },
            None => self.not_in_progress(),
        }
    }

    pub fn roll_current_turn(&mut self) -> GameEvent {
        let idx = match self.ensure_in_progress() {
            Ok(idx) => idx,
            Err(event) => return event,
        };
        let turn = self.turn.get_or_insert_with(TurnStateMachine::new);
        let result = turn.roll_or_continue(&mut self.dice);
        self.resolve(idx, result)
    }

    pub fn select_current_turn_dice(&mut self, indices: &[usize]) -> GameEvent {
        let idx = match self.ensure_in_progress() {
            Ok(idx) => idx,
            Err(event) => return event,
        };
        let turn = self.turn.get_or_insert_with(TurnStateMachine::new);
        let result = turn.select_dice(indices);
        self.resolve(idx, result)
    }

    pub fn bank_current_turn(&mut self) -> GameEvent {
        let idx = match self.ensure_in_progress() {
            Ok(idx) => idx,
            Err(event) => return event,
        };
        let turn = self.turn.get_or_insert_with(TurnStateMachine::new);
        let result = turn.bank();
        self.resolve(idx, result)
    }

    fn ensure_in_progress(&self) -> Result<usize, GameEvent> {
        self.current.ok_or_else(|| self.not_in_progress())
    }

    fn not_in_progress(&self) -> GameEvent {
        if self.winner.is_some() {
            invalid_game_action("game is over")
        } else {
            invalid_game_action("game not started")
        }
    }

    fn resolve(&mut self, idx: usize, result: Result<TurnOutcome, TurnError>) -> GameEvent {
        match result {
            Err(TurnError::InvalidAction { message }) => GameEvent::InvalidAction {
                message: message.to_string(),
            },
            Err(err) => GameEvent::InvalidAction {
                message: err.to_string(),
            },
            Ok(TurnOutcome::Rolled { dice, can_score }) => GameEvent::Rolled { dice, can_score },
            Ok(TurnOutcome::Scored {
                increment,
                turn_total,
                next_roll_dice_count,
                can_roll_again,
            }) => GameEvent::Scored {
                increment,
                turn_total,
                next_roll_dice_count,
                can_roll_again,
            },
            Ok(TurnOutcome::Busted) => {
                let player = self.players[idx];
                info!(player = player.id, "player busted");
                self.advance(idx);
                GameEvent::PlayerBusted { player }
            }
            Ok(TurnOutcome::Banked { score }) => self.apply_bank(idx, score),
        }
    }

    fn apply_bank(&mut self, idx: usize, score: u32) -> GameEvent {
        let (player, resolution) = self.players[idx].bank(score, self.rules.opening_threshold);
        self.players[idx] = player;

        let event = match resolution {
            BankResolution::Opened => {
                info!(player = player.id, score, total = player.total_score, "player opened");
                GameEvent::PlayerOpenedAndScored {
                    player,
                    turn_score: score,
                    new_total: player.total_score,
                }
            }
            BankResolution::Scored => {
                debug!(player = player.id, score, total = player.total_score, "player scored");
                GameEvent::PlayerScored {
                    player,
                    turn_score: score,
                    new_total: player.total_score,
                }
            }
            BankResolution::FailedToOpen => {
                info!(player = player.id, score, "player failed to open");
                GameEvent::PlayerFailedToOpen {
                    player,
                    attempted_score: score,
                }
            }
        };

        // A failed open changes nothing, so it can never win.
        if resolution != BankResolution::FailedToOpen
            && player.total_score >= self.rules.winning_threshold
        {
            info!(player = player.id, total = player.total_score, "player won");
            self.current = None;
            self.turn = None;
            self.winner = Some(idx);
            return GameEvent::PlayerWon {
                player,
                final_score: player.total_score,
            };
        }

        self.advance(idx);
        event
    }

    fn advance(&mut self, idx: usize) {
        let next = (idx + 1) % self.players.len();
        self.current = Some(next);
        self.turn = Some(TurnStateMachine::new());
        debug!(player = self.players[next].id, "next turn");
    }
}

fn invalid_game_action(message: &str) -> GameEvent {
    GameEvent::InvalidGameAction {
        message: message.to_string(),
    }
}
