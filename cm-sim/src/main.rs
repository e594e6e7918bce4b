use std::path::PathBuf;
use std::time::Instant;

use cm_core::Config;
use cm_logging::{hash_config_bytes, init_tracing};
use cm_sim::{run_games, SimSummaryJsonV1};

#[derive(Debug, Clone)]
struct Opts {
    config: Option<PathBuf>,
    games: Option<u32>,
    players: Option<u32>,
    seed: Option<u64>,
    log: Option<PathBuf>,
    verbose: bool,
}

fn usage() -> &'static str {
    r#"cm-sim

USAGE:
  cm-sim [OPTIONS]

OPTIONS:
  --config PATH   YAML config (default: built-in defaults)
  --games N       Games to play (overrides simulation.games)
  --players P     Players per game (overrides simulation.players)
  --seed S        Base seed (overrides simulation.seed)
  --log PATH      Append every game event to PATH as NDJSON
  --verbose       Debug-level tracing (RUST_LOG takes precedence)
"#
}

fn fail(msg: &str) -> ! {
    eprintln!("{msg}");
    eprintln!("Run with --help for usage.");
    std::process::exit(2);
}

fn value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T {
    match args.get(i + 1).map(|s| s.parse::<T>()) {
        Some(Ok(v)) => v,
        Some(Err(_)) => fail(&format!("invalid value for {flag}: {}", args[i + 1])),
        None => fail(&format!("missing value for {flag}")),
    }
}

fn parse_args() -> Opts {
    let mut opts = Opts {
        config: None,
        games: None,
        players: None,
        seed: None,
        log: None,
        verbose: false,
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!("{}", usage());
                std::process::exit(0);
            }
            "--config" => {
                opts.config = Some(value::<PathBuf>(&args, i, "--config"));
                i += 2;
            }
            "--games" => {
                opts.games = Some(value(&args, i, "--games"));
                i += 2;
            }
            "--players" => {
                opts.players = Some(value(&args, i, "--players"));
                i += 2;
            }
            "--seed" => {
                opts.seed = Some(value(&args, i, "--seed"));
                i += 2;
            }
            "--log" => {
                opts.log = Some(value::<PathBuf>(&args, i, "--log"));
                i += 2;
            }
            "--verbose" | "-v" => {
                opts.verbose = true;
                i += 1;
            }
            other => fail(&format!("Unknown arg: {other}")),
        }
    }
    opts
}

fn load_config(opts: &Opts) -> (Config, Option<String>) {
    let (mut config, hash) = match &opts.config {
        Some(path) => {
            let bytes = std::fs::read(path)
                .unwrap_or_else(|e| fail(&format!("cannot read {}: {e}", path.display())));
            let text = String::from_utf8_lossy(&bytes);
            let config = Config::from_yaml(&text)
                .unwrap_or_else(|e| fail(&format!("{}: {e}", path.display())));
            (config, Some(hash_config_bytes(&bytes)))
        }
        None => (Config::default(), None),
    };
    if let Some(g) = opts.games {
        config.simulation.games = g;
    }
    if let Some(p) = opts.players {
        config.simulation.players = p;
    }
    if let Some(s) = opts.seed {
        config.simulation.seed = s;
    }
    (config, hash)
}

fn main() {
    let opts = parse_args();
    init_tracing(if opts.verbose { "debug" } else { "info" });

    let (config, config_hash) = load_config(&opts);
    if config.simulation.players == 0 {
        fail("--players must be positive");
    }

    let t0 = Instant::now();
    let reports = match run_games(&config, opts.log.as_deref()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("simulation failed: {e}");
            std::process::exit(1);
        }
    };
    let wall_ms = t0.elapsed().as_millis() as u64;

    let summary = SimSummaryJsonV1::from_reports(
        &reports,
        config.simulation.players,
        wall_ms,
        config_hash,
    );
    match serde_json::to_string(&summary) {
        Ok(line) => println!("{line}"),
        Err(e) => {
            eprintln!("failed to encode summary: {e}");
            std::process::exit(1);
        }
    }
}
