use crate::types::Side;
use serde::{Deserialize, Serialize};

const WIN_PROBABILITY_GAP: u64 = 1000;
const WIN_PROBABILITY_NUDGE: f64 = 0.1;
const WIN_PROBABILITY_CEILING: f64 = 0.95;
const WIN_PROBABILITY_FLOOR: f64 = 0.05;
pub const CLOSE_BATTLE_THRESHOLD: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub time: u32,
    pub side_a: u64,
    pub side_b: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreTracker {
    side_a: u64,
    side_b: u64,
    last_leader: Option<Side>,
    history: Vec<ScoreSnapshot>,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_points(&mut self, side: Side, amount: u64, t: u32) {
        debug_assert!(
            self.history.last().map_or(true, |last| last.time <= t),
            "points credited with decreasing time"
        );
        match side {
            Side::A => self.side_a = self.side_a.saturating_add(amount),
            Side::B => self.side_b = self.side_b.saturating_add(amount),
        }
        self.history.push(ScoreSnapshot {
            time: t,
            side_a: self.side_a,
            side_b: self.side_b,
        });
    }

    pub fn score(&self, side: Side) -> u64 {
        match side {
            Side::A => self.side_a,
            Side::B => self.side_b,
        }
    }

    pub fn scores(&self) -> (u64, u64) {
        (self.side_a, self.side_b)
    }

    pub fn leader(&self) -> Option<Side> {
        match self.side_a.cmp(&self.side_b) {
            std::cmp::Ordering::Greater => Some(Side::A),
            std::cmp::Ordering::Less => Some(Side::B),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn score_gap(&self) -> u64 {
        self.side_a.abs_diff(self.side_b)
    }

    pub fn is_close(&self, threshold: u64) -> bool {
        self.score_gap() <= threshold
    }

    pub fn is_close_battle(&self) -> bool {
        self.is_close(CLOSE_BATTLE_THRESHOLD)
    }

    // Compares against the last side that actually led; a tie is never a
    // shift and leaves that memory untouched.
    pub fn momentum_shift(&mut self) -> bool {
        let Some(current) = self.leader() else {
            return false;
        };
        let shifted = self.last_leader.is_some_and(|previous| previous != current);
        self.last_leader = Some(current);
        shifted
    }

    pub fn win_probability(&self, side: Side) -> f64 {
        if self.side_a == 0 && self.side_b == 0 {
            return 0.5;
        }
        let total = self.side_a as f64 + self.side_b as f64;
        let base = self.score(side) as f64 / total;
        if self.score_gap() <= WIN_PROBABILITY_GAP {
            return base;
        }
        if self.leader() == Some(side) {
            (base + WIN_PROBABILITY_NUDGE).min(WIN_PROBABILITY_CEILING)
        } else {
            (base - WIN_PROBABILITY_NUDGE).max(WIN_PROBABILITY_FLOOR)
        }
    }

    pub fn history(&self) -> &[ScoreSnapshot] {
        &self.history
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
