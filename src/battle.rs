use crate::config::{BattleConfig, ConfigError};
use crate::multiplier::{
    Amplification, DrawSource, MultiplierManager, MultiplierStatistics, RandomDraws,
};
use crate::score::ScoreTracker;
use crate::types::Side;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GiftOutcome {
    pub side: Side,
    pub time: u32,
    pub amplification: Amplification,
    pub side_score: u64,
    pub lead_changed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSummary {
    pub duration_secs: u32,
    pub winner: Option<Side>,
    pub side_a: u64,
    pub side_b: u64,
    pub score_gap: u64,
    pub side_a_win_probability: f64,
    pub multipliers: MultiplierStatistics,
}

pub struct Battle<S = RandomDraws<ChaCha8Rng>> {
    multipliers: MultiplierManager<S>,
    scores: ScoreTracker,
    started: bool,
    now: u32,
}

impl Battle<RandomDraws<ChaCha8Rng>> {
    pub fn seeded(config: BattleConfig, seed: u64) -> Result<Self, ConfigError> {
        Ok(Self::from_manager(MultiplierManager::seeded(config, seed)?))
    }
}

impl<S: DrawSource> Battle<S> {
    pub fn new(config: BattleConfig, draws: S) -> Result<Self, ConfigError> {
        Ok(Self::from_manager(MultiplierManager::new(config, draws)?))
    }

    pub fn from_manager(multipliers: MultiplierManager<S>) -> Self {
        Self {
            multipliers,
            scores: ScoreTracker::new(),
            started: false,
            now: 0,
        }
    }

    pub fn multipliers(&self) -> &MultiplierManager<S> {
        &self.multipliers
    }

    pub fn multipliers_mut(&mut self) -> &mut MultiplierManager<S> {
        &mut self.multipliers
    }

    pub fn scores(&self) -> &ScoreTracker {
        &self.scores
    }

    pub fn scores_mut(&mut self) -> &mut ScoreTracker {
        &mut self.scores
    }

    pub fn now(&self) -> u32 {
        self.now
    }

    pub fn is_over(&self) -> bool {
        self.now >= self.multipliers.config().duration_secs
    }

    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        let plan = self.multipliers.plan_auto_session();
        info!(
            duration = self.multipliers.config().duration_secs,
            auto_kind = %plan.kind,
            auto_at = plan.at,
            "battle started"
        );
    }

    pub fn tick(&mut self, t: u32) -> bool {
        self.start();
        self.now = t;
        self.multipliers.update(t);
        self.settle_bonus(t)
    }

    // Gifts credited after `tick(t)` can still complete the threshold within
    // the same second.
    pub fn settle_bonus(&mut self, t: u32) -> bool {
        let bonus = self.multipliers.attempt_bonus_session(t);
        if bonus {
            self.multipliers.update(t);
        }
        bonus
    }

    pub fn credit_gift(&mut self, side: Side, label: &str, base_value: u64, t: u32) -> GiftOutcome {
        let amplification = self.multipliers.amplify(base_value, t);
        self.scores.add_points(side, amplification.total, t);
        self.multipliers.record_gift(t, label, base_value);
        let lead_changed = self.scores.momentum_shift();
        if lead_changed {
            info!(leader = ?self.scores.leader(), gap = self.scores.score_gap(), time = t, "lead changed");
        }
        debug!(
            ?side,
            label,
            base_value,
            total = amplification.total,
            breakdown = %amplification.breakdown(),
            "gift credited"
        );
        GiftOutcome {
            side,
            time: t,
            amplification,
            side_score: self.scores.score(side),
            lead_changed,
        }
    }

    pub fn attempt_strike(&mut self, t: u32, actor: &str) -> bool {
        self.multipliers.attempt_strike(t, actor)
    }

    pub fn deploy_hammer(&mut self, t: u32, actor: &str) -> bool {
        self.multipliers.deploy_hammer(t, actor)
    }

    pub fn summary(&self) -> BattleSummary {
        let (side_a, side_b) = self.scores.scores();
        BattleSummary {
            duration_secs: self.multipliers.config().duration_secs,
            winner: self.scores.leader(),
            side_a,
            side_b,
            score_gap: self.scores.score_gap(),
            side_a_win_probability: self.scores.win_probability(Side::A),
            multipliers: self.multipliers.statistics(),
        }
    }
}
