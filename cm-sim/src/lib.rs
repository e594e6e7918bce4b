//! Headless self-play: drives `GameOrchestrator` with a fixed banking policy.

use std::path::Path;

use cm_core::{
    calculate_score, Config, DiceSource, GameEvent, GameOrchestrator, RandomDice, RulesConfig,
    SimulationConfig,
};
use cm_logging::NdjsonWriter;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("unexpected {kind} event: {detail}")]
    Unexpected { kind: &'static str, detail: String },
    #[error("event log: {0}")]
    Log(#[from] cm_logging::NdjsonError),
}

/// Keep-and-bank heuristic used by every simulated seat.
#[derive(Debug, Clone, Copy)]
pub struct BankingPolicy {
    pub bank_at: u32,
    pub opening_threshold: u32,
    pub winning_threshold: u32,
}

impl BankingPolicy {
    pub fn new(rules: &RulesConfig, sim: &SimulationConfig) -> Self {
        Self {
            bank_at: sim.bank_at,
            opening_threshold: rules.opening_threshold,
            winning_threshold: rules.winning_threshold,
        }
    }

    /// Indices to set aside from a scoring roll.
    ///
    /// Takes the whole roll when every die contributes (hot dice), otherwise
    /// the 1s and 5s, otherwise the whole roll.
    pub fn choose_dice(&self, roll: &[u8]) -> Vec<usize> {
        let all: Vec<usize> = (0..roll.len()).collect();
        let full = calculate_score(roll).unwrap_or(0);
        let every_die_counts = (0..roll.len()).all(|skip| {
            let rest: Vec<u8> = roll
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != skip)
                .map(|(_, &d)| d)
                .collect();
            calculate_score(&rest).unwrap_or(0) < full
        });
        if every_die_counts {
            return all;
        }

        let singles: Vec<usize> = all
            .iter()
            .copied()
            .filter(|&i| roll[i] == 1 || roll[i] == 5)
            .collect();
        if singles.is_empty() {
            all
        } else {
            singles
        }
    }

    pub fn should_bank(&self, turn_total: u32, has_opened: bool, total_score: u32) -> bool {
        if !has_opened {
            return turn_total >= self.opening_threshold;
        }
        turn_total >= self.bank_at || total_score + turn_total >= self.winning_threshold
    }
}

/// Outcome of one simulated game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameReport {
    pub game_id: u64,
    /// None when the game hit `max_turns_per_game`.
    pub winner: Option<u32>,
    pub turns: u32,
    pub events: u64,
    pub busts: u32,
    pub failed_opens: u32,
    pub final_scores: Vec<u32>,
}

impl GameReport {
    fn tally(&mut self, event: &GameEvent) {
        self.events += 1;
        match event {
            GameEvent::PlayerBusted { .. } => {
                self.busts += 1;
                self.turns += 1;
            }
            GameEvent::PlayerFailedToOpen { .. } => {
                self.failed_opens += 1;
                self.turns += 1;
            }
            GameEvent::PlayerOpenedAndScored { .. } | GameEvent::PlayerScored { .. } => {
                self.turns += 1;
            }
            GameEvent::PlayerWon { player, .. } => {
                self.turns += 1;
                self.winner = Some(player.id);
            }
            _ => {}
        }
    }
}

/// Play one game to completion (or to the turn cap).
///
/// `sink` sees every event with its per-game sequence number.
pub fn play_game<D, F>(
    game_id: u64,
    config: &Config,
    dice: D,
    mut sink: F,
) -> Result<GameReport, SimError>
where
    D: DiceSource,
    F: FnMut(u64, &GameEvent) -> Result<(), SimError>,
{
    let policy = BankingPolicy::new(&config.rules, &config.simulation);
    let mut game = GameOrchestrator::with_rules(config.rules.clone(), dice);
    let mut report = GameReport {
        game_id,
        ..GameReport::default()
    };

    let mut emit = |report: &mut GameReport, event: GameEvent| -> Result<GameEvent, SimError> {
        sink(report.events, &event)?;
        report.tally(&event);
        Ok(event)
    };

    let started = emit(&mut report, game.start_game(config.simulation.players as usize))?;
    if let GameEvent::InvalidGameAction { message } = started {
        return Err(SimError::Unexpected {
            kind: "invalid_game_action",
            detail: message,
        });
    }

    while game.is_in_progress() && report.turns < config.simulation.max_turns_per_game {
        let rolled = emit(&mut report, game.roll_current_turn())?;
        let dice = match rolled {
            GameEvent::Rolled { dice, .. } => dice,
            GameEvent::PlayerBusted { .. } => continue,
            other => return Err(unexpected(other)),
        };

        let keep = policy.choose_dice(&dice);
        let turn_total = match emit(&mut report, game.select_current_turn_dice(&keep))? {
            GameEvent::Scored { turn_total, .. } => turn_total,
            GameEvent::PlayerBusted { .. } => continue,
            other => return Err(unexpected(other)),
        };

        let (has_opened, total) = game
            .current_player()
            .map(|p| (p.has_opened, p.total_score))
            .unwrap_or_default();
        if policy.should_bank(turn_total, has_opened, total) {
            let banked = emit(&mut report, game.bank_current_turn())?;
            if banked.is_invalid() {
                return Err(unexpected(banked));
            }
        }
    }

    report.final_scores = game.players().iter().map(|p| p.total_score).collect();
    debug!(
        game_id,
        winner = ?report.winner,
        turns = report.turns,
        "game finished"
    );
    Ok(report)
}

/// Play `simulation.games` seeded games, appending every event to `log` if given.
///
/// Game `i` rolls with seed `simulation.seed ^ i`.
pub fn run_games(config: &Config, log: Option<&Path>) -> Result<Vec<GameReport>, SimError> {
    let mut writer = match log {
        Some(path) => Some(NdjsonWriter::open_append_with_flush(path, 256)?),
        None => None,
    };

    let mut reports = Vec::with_capacity(config.simulation.games as usize);
    for i in 0..config.simulation.games as u64 {
        let dice = RandomDice::new(config.simulation.seed ^ i);
        let report = play_game(i, config, dice, |seq, ev| {
            if let Some(w) = writer.as_mut() {
                w.write_game_event(i, seq, ev)?;
            }
            Ok(())
        })?;
        reports.push(report);
    }

    if let Some(w) = writer.as_mut() {
        w.flush()?;
    }
    Ok(reports)
}

fn unexpected(event: GameEvent) -> SimError {
    SimError::Unexpected {
        kind: event.kind(),
        detail: format!("{:?}", event),
    }
}

/// Run summary printed as one JSON line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimSummaryJsonV1 {
    pub event: String, // "sim_summary_v1"
    pub wall_ms: u64,

    pub games_completed: u64,
    pub games_abandoned: u64,
    pub players: u32,

    pub turns_total: u64,
    pub events_total: u64,
    pub busts: u64,
    pub failed_opens: u64,
    pub mean_turns_per_game: f64,

    /// wins_by_seat[i] counts wins by player id i+1.
    pub wins_by_seat: Vec<u64>,
    pub config_hash: Option<String>,
}

impl SimSummaryJsonV1 {
    pub fn from_reports(
        reports: &[GameReport],
        players: u32,
        wall_ms: u64,
        config_hash: Option<String>,
    ) -> Self {
        let mut wins_by_seat = vec![0u64; players as usize];
        let mut s = Self {
            event: "sim_summary_v1".to_string(),
            wall_ms,
            games_completed: 0,
            games_abandoned: 0,
            players,
            turns_total: 0,
            events_total: 0,
            busts: 0,
            failed_opens: 0,
            mean_turns_per_game: 0.0,
            wins_by_seat: Vec::new(),
            config_hash,
        };
        for r in reports {
            match r.winner {
                Some(id) => {
                    s.games_completed += 1;
                    if let Some(w) = wins_by_seat.get_mut(id as usize - 1) {
                        *w += 1;
                    }
                }
                None => s.games_abandoned += 1,
            }
            s.turns_total += r.turns as u64;
            s.events_total += r.events;
            s.busts += r.busts as u64;
            s.failed_opens += r.failed_opens as u64;
        }
        if !reports.is_empty() {
            s.mean_turns_per_game = s.turns_total as f64 / reports.len() as f64;
        }
        s.wins_by_seat = wins_by_seat;
        s
    }
}
