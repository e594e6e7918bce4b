//! cm-logging: NDJSON game event logs + tracing setup.
//!
//! One JSON object per line, append-only, so a crashed run still leaves every
//! complete line readable.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use cm_core::GameEvent;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Event record schema version.
pub const EVENT_SCHEMA_VERSION: u32 = 1;

/// Ruleset identifier stamped on every record.
pub const RULESET_ID: &str = "cinq_mille_750_5000_v1";

pub fn now_ms() -> u64 {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    d.as_millis() as u64
}

pub fn hash_config_bytes(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Install a fmt subscriber. `RUST_LOG` wins over `default_directive`.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Minimal log schema versioning fields.
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfoV1 {
    pub event_schema: u32,
    pub ruleset_id: &'static str,
}

impl Default for VersionInfoV1 {
    fn default() -> Self {
        Self {
            event_schema: EVENT_SCHEMA_VERSION,
            ruleset_id: RULESET_ID,
        }
    }
}

/// One orchestrator event, as written to the log.
#[derive(Debug, Clone, Serialize)]
pub struct GameEventRecordV1<'a> {
    pub event: &'static str,
    pub ts_ms: u64,
    pub v: VersionInfoV1,

    pub game_id: u64,
    /// Position of this event within its game, from 0.
    pub seq: u64,

    pub payload: &'a GameEvent,
}

impl<'a> GameEventRecordV1<'a> {
    pub fn new(game_id: u64, seq: u64, payload: &'a GameEvent) -> Self {
        Self {
            event: "game_event",
            ts_ms: now_ms(),
            v: VersionInfoV1::default(),
            game_id,
            seq,
            payload,
        }
    }
}

#[derive(Debug)]
pub enum NdjsonError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for NdjsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NdjsonError::Io(e) => write!(f, "ndjson io: {e}"),
            NdjsonError::Json(e) => write!(f, "ndjson encode: {e}"),
        }
    }
}

impl std::error::Error for NdjsonError {}

impl From<io::Error> for NdjsonError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for NdjsonError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Append-only NDJSON writer.
///
/// Contract: each call writes exactly one JSON object followed by a newline.
pub struct NdjsonWriter {
    w: BufWriter<File>,
    lines_since_flush: u64,
    flush_every_lines: u64,
}

impl NdjsonWriter {
    /// Open a file for append. Creates it if it doesn't exist.
    pub fn open_append(path: impl AsRef<Path>) -> Result<Self, NdjsonError> {
        Self::open_append_with_flush(path, 0)
    }

    /// `flush_every_lines=0` disables periodic flushing.
    pub fn open_append_with_flush(
        path: impl AsRef<Path>,
        flush_every_lines: u64,
    ) -> Result<Self, NdjsonError> {
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            w: BufWriter::new(f),
            lines_since_flush: 0,
            flush_every_lines,
        })
    }

    pub fn write_event<T: Serialize>(&mut self, event: &T) -> Result<(), NdjsonError> {
        let mut buf = serde_json::to_vec(event)?;
        buf.push(b'\n');
        self.w.write_all(&buf)?;
        self.lines_since_flush += 1;
        if self.flush_every_lines > 0 && self.lines_since_flush >= self.flush_every_lines {
            self.flush()?;
        }
        Ok(())
    }

    /// Wrap and append one orchestrator event.
    pub fn write_game_event(
        &mut self,
        game_id: u64,
        seq: u64,
        event: &GameEvent,
    ) -> Result<(), NdjsonError> {
        self.write_event(&GameEventRecordV1::new(game_id, seq, event))
    }

    pub fn flush(&mut self) -> Result<(), NdjsonError> {
        self.w.flush()?;
        self.lines_since_flush = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use cm_core::Player;
    use serde_json::Value;

    fn read_ndjson_lenient(path: &Path) -> Vec<Value> {
        let s = fs::read_to_string(path).expect("read");
        let mut out = Vec::new();
        for line in s.lines() {
            if line.trim().is_empty() {
                continue;
            }
            if let Ok(v) = serde_json::from_str::<Value>(line) {
                out.push(v);
            }
        }
        out
    }

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn writes_one_valid_json_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson");
        let mut w = NdjsonWriter::open_append(&path).unwrap();

        #[derive(Serialize)]
        struct E {
            event: &'static str,
            x: u32,
        }

        w.write_event(&E { event: "e", x: 1 }).unwrap();
        w.write_event(&E { event: "e", x: 2 }).unwrap();
        w.flush().unwrap();

        let vals = read_ndjson_lenient(&path);
        assert_eq!(vals.len(), 2);
        assert_eq!(vals[0]["x"], 1);
        assert_eq!(vals[1]["x"], 2);
    }

    #[test]
    fn game_events_are_tagged_by_kind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.ndjson");
        let mut w = NdjsonWriter::open_append_with_flush(&path, 1).unwrap();

        let won = GameEvent::PlayerWon {
            player: Player {
                id: 2,
                total_score: 5050,
                has_opened: true,
                last_turn_score: 550,
            },
            final_score: 5050,
        };
        w.write_game_event(7, 0, &GameEvent::Rolled { dice: vec![1, 5, 2], can_score: true })
            .unwrap();
        w.write_game_event(7, 1, &won).unwrap();

        // Periodic flush already pushed both lines to disk.
        let vals = read_ndjson_lenient(&path);
        assert_eq!(vals.len(), 2);
        assert_eq!(vals[0]["event"], "game_event");
        assert_eq!(vals[0]["game_id"], 7);
        assert_eq!(vals[0]["payload"]["kind"], "rolled");
        assert_eq!(vals[0]["payload"]["dice"][1], 5);
        assert_eq!(vals[1]["seq"], 1);
        assert_eq!(vals[1]["payload"]["kind"], won.kind());
        assert_eq!(vals[1]["payload"]["player"]["id"], 2);
        assert_eq!(vals[1]["payload"]["final_score"], 5050);
        assert_eq!(vals[1]["v"]["ruleset_id"], RULESET_ID);
    }

    #[test]
    fn lenient_reader_tolerates_trailing_partial_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson");

        {
            let mut w = NdjsonWriter::open_append(&path).unwrap();
            w.write_game_event(1, 0, &GameEvent::PlayerTurnStarted { player: Player::new(1) })
                .unwrap();
            w.flush().unwrap();
        }

        // Simulate crash: append a partial JSON line (no newline, invalid JSON).
        let mut f = OpenOptions::new().append(true).open(&path).unwrap();
        f.write_all(br#"{"event":"game_event","seq":"#).unwrap();
        f.flush().unwrap();

        let vals = read_ndjson_lenient(&path);
        assert_eq!(vals.len(), 1);
        assert_eq!(vals[0]["payload"]["kind"], "player_turn_started");
    }

    #[test]
    fn config_hash_is_stable_hex() {
        let a = hash_config_bytes(b"rules: {}\n");
        assert_eq!(a, hash_config_bytes(b"rules: {}\n"));
        assert_ne!(a, hash_config_bytes(b"rules: {opening_threshold: 500}\n"));
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn init_tracing_twice_is_harmless() {
        init_tracing("warn");
        init_tracing("debug");
    }
}
