pub mod adapter;
pub mod battle;
pub mod config;
pub mod integration;
pub mod multiplier;
pub mod score;
pub mod threshold;
pub mod types;

pub use battle::{Battle, BattleSummary, GiftOutcome};
pub use config::{BattleConfig, ConfigError, TimingWindows};
pub use multiplier::{Amplification, DrawSource, MultiplierManager, RandomDraws};
pub use score::{ScoreTracker, CLOSE_BATTLE_THRESHOLD};
pub use threshold::ThresholdTracker;
pub use types::{MultiplierKind, Session, Side};
