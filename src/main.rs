use battle_engine::battle::Battle;
use battle_engine::config::{BattleConfig, ConfigError};
use battle_engine::integration::ExpiryCallbackAdapter;
use battle_engine::types::{MultiplierKind, Side};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_logging(verbose: bool) {
    let fallback = if verbose { "battle_engine=debug" } else { "battle_engine=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}

fn main() -> Result<(), ConfigError> {
    init_logging(std::env::args().skip(1).any(|arg| arg == "-v" || arg == "--verbose"));

    let config = BattleConfig::from_path(concat!(env!("CARGO_MANIFEST_DIR"), "/configs/standard.yaml"))?;
    let mut battle = Battle::seeded(config, 63)?;
    battle
        .multipliers_mut()
        .set_observer(ExpiryCallbackAdapter::new(
            |kind: MultiplierKind, start: u32, end: u32, source: &str| {
                println!("session ended: {kind} {start}s-{end}s ({source})");
            },
        ));

    battle.start();
    let duration = battle.multipliers().config().duration_secs;
    for t in 0..duration {
        battle.tick(t);
        if t % 10 == 0 {
            let _ = battle.credit_gift(Side::B, "Rose", 25, t);
        }
        if t % 15 == 0 {
            let outcome = battle.credit_gift(Side::A, "Lion", 200, t);
            if outcome.amplification.total != outcome.amplification.base {
                println!(
                    "t={t}s gift amplified: {} = {}",
                    outcome.amplification.breakdown(),
                    outcome.amplification.total
                );
            }
        }
        if battle.multipliers().strike_window_open(t) && t % 30 == 5 {
            battle.attempt_strike(t, "A");
        }
        if t % 30 == 7 {
            battle.deploy_hammer(t, "B");
        }
    }

    let summary = battle.summary();
    println!(
        "Battle over: A={} B={} winner={:?} stats={:?}",
        summary.side_a, summary.side_b, summary.winner, summary.multipliers
    );
    Ok(())
}
