use battle_engine::battle::{Battle, BattleSummary};
use battle_engine::config::{BattleConfig, ConfigError};
use battle_engine::types::Side;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum ReplayError {
    #[error("{0}")]
    Args(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed reading {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("script parse failed: {0}")]
    Script(#[from] serde_json::Error),
    #[error("event at {time}s is outside the {duration}s battle")]
    EventOutOfRange { time: u32, duration: u32 },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum ScriptAction {
    Gift { side: Side, label: String, value: u64 },
    Strike { actor: String },
    Hammer { actor: String },
}

#[derive(Debug, Clone, Deserialize)]
struct ScriptEvent {
    time: u32,
    #[serde(flatten)]
    action: ScriptAction,
}

#[derive(Debug, Clone, Deserialize)]
struct BattleScript {
    #[serde(default)]
    config: Option<BattleConfig>,
    #[serde(default)]
    seed: u64,
    events: Vec<ScriptEvent>,
}

#[derive(Debug, Default, Serialize)]
struct ReplayCounts {
    gifts: usize,
    strikes_attempted: usize,
    strikes_landed: usize,
    hammers_attempted: usize,
    hammers_landed: usize,
    bonus_sessions: usize,
    lead_changes: usize,
}

#[derive(Debug, Serialize)]
struct ReplayReport {
    seed: u64,
    counts: ReplayCounts,
    summary: BattleSummary,
}

fn parse_args() -> Result<HashMap<String, String>, ReplayError> {
    let mut map = HashMap::new();
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "-v" || arg == "--verbose" {
            map.insert("verbose".to_string(), "true".to_string());
            continue;
        }
        if !arg.starts_with("--") {
            return Err(ReplayError::Args(format!("unexpected argument {arg}")));
        }
        let key = arg.trim_start_matches("--").to_string();
        let val = args
            .next()
            .ok_or_else(|| ReplayError::Args(format!("missing value for --{key}")))?;
        map.insert(key, val);
    }
    Ok(map)
}

fn read_script(path: &str) -> Result<BattleScript, ReplayError> {
    let raw = fs::read_to_string(path).map_err(|source| ReplayError::Read {
        path: PathBuf::from(path),
        source,
    })?;
    Ok(serde_json::from_str(&raw)?)
}

fn replay(config: BattleConfig, seed: u64, mut events: Vec<ScriptEvent>) -> Result<ReplayReport, ReplayError> {
    let duration = config.duration_secs;
    if let Some(late) = events.iter().find(|e| e.time >= duration) {
        return Err(ReplayError::EventOutOfRange {
            time: late.time,
            duration,
        });
    }
    events.sort_by_key(|e| e.time);

    let mut battle = Battle::seeded(config, seed)?;
    let mut counts = ReplayCounts::default();
    let mut pending = events.into_iter().peekable();
    battle.start();
    for t in 0..duration {
        if battle.tick(t) {
            counts.bonus_sessions += 1;
        }
        while let Some(event) = pending.next_if(|e| e.time == t) {
            match event.action {
                ScriptAction::Gift { side, label, value } => {
                    if battle.credit_gift(side, &label, value, t).lead_changed {
                        counts.lead_changes += 1;
                    }
                    counts.gifts += 1;
                }
                ScriptAction::Strike { actor } => {
                    counts.strikes_attempted += 1;
                    if battle.attempt_strike(t, &actor) {
                        counts.strikes_landed += 1;
                    }
                }
                ScriptAction::Hammer { actor } => {
                    counts.hammers_attempted += 1;
                    if battle.deploy_hammer(t, &actor) {
                        counts.hammers_landed += 1;
                    }
                }
            }
        }
        if battle.settle_bonus(t) {
            counts.bonus_sessions += 1;
        }
    }

    Ok(ReplayReport {
        seed,
        counts,
        summary: battle.summary(),
    })
}

fn run(args: &HashMap<String, String>) -> Result<(), ReplayError> {
    let script_path = args
        .get("script")
        .ok_or_else(|| ReplayError::Args("--script is required".to_string()))?;
    let script = read_script(script_path)?;

    let config = match args.get("config") {
        Some(path) => BattleConfig::from_path(path)?,
        None => match script.config {
            Some(config) => {
                config.validate()?;
                config
            }
            None => BattleConfig::default(),
        },
    };
    let seed = match args.get("seed") {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|e| ReplayError::Args(format!("invalid --seed {raw}: {e}")))?,
        None => script.seed,
    };

    let report = replay(config, seed, script.events)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "battle_engine=debug" } else { "battle_engine=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let result = parse_args().and_then(|args| {
        init_logging(args.contains_key("verbose"));
        run(&args)
    });
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("replay failed: {err}");
            ExitCode::FAILURE
        }
    }
}
