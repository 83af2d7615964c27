use crate::config::{BattleConfig, ConfigError, TimingWindows};
use crate::threshold::ThresholdTracker;
use crate::types::{MultiplierKind, Session};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const SESSION_KINDS: [MultiplierKind; 2] = [MultiplierKind::Double, MultiplierKind::Triple];

pub trait DrawSource {
    // Inclusive on both ends.
    fn draw_range(&mut self, low: u32, high: u32) -> u32;
    fn draw_kind(&mut self, choices: &[MultiplierKind]) -> MultiplierKind;
    fn draw_chance(&mut self, probability: f64) -> bool;
}

#[derive(Debug, Clone)]
pub struct RandomDraws<R> {
    rng: R,
}

impl<R: Rng> RandomDraws<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomDraws<ChaCha8Rng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> DrawSource for RandomDraws<R> {
    fn draw_range(&mut self, low: u32, high: u32) -> u32 {
        if low >= high {
            low
        } else {
            self.rng.gen_range(low..=high)
        }
    }

    fn draw_kind(&mut self, choices: &[MultiplierKind]) -> MultiplierKind {
        choices
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(MultiplierKind::None)
    }

    fn draw_chance(&mut self, probability: f64) -> bool {
        self.rng.gen::<f64>() < probability
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MultiplierEvent {
    AutoSessionPlanned { kind: MultiplierKind, at: u32 },
    SessionStarted { session: Session },
    SessionExpired { session: Session },
    StrikeTriggered { session: Session, actor: String },
    StrikeNeutralized { session: Session, actor: String, time: u32 },
}

pub trait MultiplierObserver {
    fn on_event(&mut self, event: &MultiplierEvent);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedSession {
    pub kind: MultiplierKind,
    pub at: u32,
}

#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amplification {
    pub base: u64,
    pub session_kind: MultiplierKind,
    pub session_multiplier: u32,
    pub session_points: u64,
    pub strike_applied: bool,
    pub strike_points: u64,
    pub total: u64,
}

impl Amplification {
    pub fn breakdown(&self) -> String {
        let base = self.base;
        let strike = MultiplierKind::Quintuple.weight();
        match (self.session_kind.is_session_kind(), self.strike_applied) {
            (true, true) => format!(
                "({base} × {}) + ({base} × {strike})",
                self.session_multiplier
            ),
            (true, false) => format!("{base} × {}", self.session_multiplier),
            (false, true) => format!("{base} + ({base} × {strike})"),
            (false, false) => base.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplierStatus {
    pub current_kind: MultiplierKind,
    pub active_sessions: Vec<Session>,
    pub auto_fired: bool,
    pub bonus_triggered: bool,
    pub bonus_available: bool,
    pub strike_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MultiplierStatistics {
    pub total_sessions: usize,
    pub double_sessions: usize,
    pub triple_sessions: usize,
    pub strikes: usize,
    pub strikes_neutralized: usize,
    pub auto_triggered: bool,
    pub bonus_triggered: bool,
}

pub struct MultiplierManager<S = RandomDraws<ChaCha8Rng>> {
    config: BattleConfig,
    timing: TimingWindows,
    draws: S,
    observer: Option<Box<dyn MultiplierObserver + Send>>,
    threshold: ThresholdTracker,
    current_kind: MultiplierKind,
    active: Vec<Session>,
    history: Vec<Session>,
    planned_auto: Option<PlannedSession>,
    auto_fired: bool,
    bonus_available: bool,
    bonus_triggered: bool,
    strikes_neutralized: usize,
    last_update: Option<u32>,
}

impl MultiplierManager<RandomDraws<ChaCha8Rng>> {
    pub fn seeded(config: BattleConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::new(config, RandomDraws::seeded(seed))
    }
}

impl<S: DrawSource> MultiplierManager<S> {
    pub fn new(config: BattleConfig, draws: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            timing: config.timing(),
            threshold: ThresholdTracker::new(config.threshold.clone()),
            config,
            draws,
            observer: None,
            current_kind: MultiplierKind::None,
            active: Vec::new(),
            history: Vec::new(),
            planned_auto: None,
            auto_fired: false,
            bonus_available: true,
            bonus_triggered: false,
            strikes_neutralized: 0,
            last_update: None,
        })
    }

    pub fn with_observer(mut self, observer: impl MultiplierObserver + Send + 'static) -> Self {
        self.set_observer(observer);
        self
    }

    pub fn set_observer(&mut self, observer: impl MultiplierObserver + Send + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn timing(&self) -> TimingWindows {
        self.timing
    }

    pub fn threshold(&self) -> &ThresholdTracker {
        &self.threshold
    }

    pub fn planned_auto_session(&self) -> Option<PlannedSession> {
        self.planned_auto
    }

    pub fn plan_auto_session(&mut self) -> PlannedSession {
        if let Some(plan) = self.planned_auto {
            return plan;
        }
        let window = self.timing.auto_session;
        let at = self.draws.draw_range(window.start, window.end);
        let kind = self.draws.draw_kind(&SESSION_KINDS);
        let plan = PlannedSession { kind, at };
        debug!(kind = %kind, at, "auto session planned");
        self.planned_auto = Some(plan);
        self.notify(MultiplierEvent::AutoSessionPlanned { kind, at });
        plan
    }

    pub fn update(&mut self, t: u32) {
        debug_assert!(
            self.last_update.map_or(true, |last| last <= t),
            "update called with decreasing time"
        );
        self.last_update = Some(t);

        if !self.auto_fired {
            if let Some(plan) = self.planned_auto.filter(|plan| t >= plan.at) {
                let duration = self.draw_session_duration();
                let session = Session::new(plan.kind, t, duration, "auto");
                info!(
                    kind = %session.kind,
                    start = session.start_time,
                    end = session.end_time(),
                    source = %session.source,
                    "auto session activated"
                );
                self.auto_fired = true;
                self.activate(session);
            }
        }

        let (expired, still_active): (Vec<Session>, Vec<Session>) = std::mem::take(&mut self.active)
            .into_iter()
            .partition(|session| t >= session.end_time());
        self.active = still_active;
        for session in expired {
            self.retire(session);
        }

        self.current_kind = self.session_kind_at(t);
    }

    pub fn record_gift(&mut self, t: u32, label: impl AsRef<str>, base_value: u64) {
        self.threshold.record(t, label, base_value);
    }

    pub fn attempt_bonus_session(&mut self, t: u32) -> bool {
        if !self.bonus_available
            || !self.timing.bonus_attempt.contains(t)
            || !self.threshold.threshold_met(t)
        {
            return false;
        }
        let kind = self.draws.draw_kind(&SESSION_KINDS);
        let duration = self.draw_session_duration();
        let session = Session::new(kind, t, duration, "threshold");
        let activity = self.threshold.activity_in_window(t);
        info!(
            kind = %kind,
            start = session.start_time,
            end = session.end_time(),
            special_count = activity.special_count,
            total_value = activity.total_value,
            "bonus session triggered"
        );
        self.bonus_available = false;
        self.bonus_triggered = true;
        self.activate(session);
        true
    }

    pub fn attempt_strike(&mut self, t: u32, actor: &str) -> bool {
        if !self.draws.draw_chance(self.config.strike_probability) {
            debug!(actor, time = t, "strike attempt missed");
            return false;
        }
        if let Some(idx) = self.active.iter().position(Session::is_strike) {
            let mut replaced = self.active.remove(idx);
            replaced.duration = t.saturating_sub(replaced.start_time);
            self.retire(replaced);
        }
        let session = Session::new(
            MultiplierKind::Quintuple,
            t,
            self.config.strike_duration_secs,
            format!("strike_{actor}"),
        );
        info!(actor, start = t, end = session.end_time(), "strike activated");
        self.active.push(session.clone());
        self.notify(MultiplierEvent::StrikeTriggered {
            session,
            actor: actor.to_string(),
        });
        true
    }

    pub fn deploy_hammer(&mut self, t: u32, actor: &str) -> bool {
        let idx = match self
            .active
            .iter()
            .position(|session| session.is_strike() && session.is_active(t))
        {
            Some(idx) => idx,
            None => return false,
        };
        let session = self.active.remove(idx);
        self.strikes_neutralized += 1;
        info!(actor, time = t, source = %session.source, "strike neutralized by hammer");
        self.notify(MultiplierEvent::StrikeNeutralized {
            session,
            actor: actor.to_string(),
            time: t,
        });
        true
    }

    /// Session and strike contributions are summed, never multiplied together.
    /// Point arithmetic saturates at `u64::MAX`.
    pub fn amplify(&self, base_value: u64, t: u32) -> Amplification {
        let session_kind = self.session_kind_at(t);
        let session_multiplier = session_kind.weight();
        let strike_applied = self.strike_active_at(t);
        let session_points = base_value.saturating_mul(u64::from(session_multiplier));
        let strike_points = if strike_applied {
            self.strike_bonus(base_value)
        } else {
            0
        };
        Amplification {
            base: base_value,
            session_kind,
            session_multiplier,
            session_points,
            strike_applied,
            strike_points,
            total: session_points.saturating_add(strike_points),
        }
    }

    pub fn strike_bonus(&self, base_value: u64) -> u64 {
        base_value.saturating_mul(u64::from(MultiplierKind::Quintuple.weight()))
    }

    pub fn current_kind(&self) -> MultiplierKind {
        self.current_kind
    }

    pub fn is_session_active(&self) -> bool {
        !self.active.is_empty()
    }

    pub fn is_strike_active(&self, t: u32) -> bool {
        self.strike_active_at(t)
    }

    pub fn is_final_phase(&self, t: u32) -> bool {
        t >= self.timing.final_phase_start
    }

    pub fn strike_window_open(&self, t: u32) -> bool {
        self.session_kind_at(t).is_session_kind() || self.is_final_phase(t)
    }

    pub fn active_sessions(&self) -> &[Session] {
        &self.active
    }

    pub fn history(&self) -> &[Session] {
        &self.history
    }

    pub fn status(&self) -> MultiplierStatus {
        MultiplierStatus {
            current_kind: self.current_kind,
            active_sessions: self.active.clone(),
            auto_fired: self.auto_fired,
            bonus_triggered: self.bonus_triggered,
            bonus_available: self.bonus_available,
            strike_active: self.active.iter().any(Session::is_strike),
        }
    }

    pub fn statistics(&self) -> MultiplierStatistics {
        let all = || self.history.iter().chain(self.active.iter());
        let count = |kind: MultiplierKind| all().filter(|s| s.kind == kind).count();
        MultiplierStatistics {
            total_sessions: all().count(),
            double_sessions: count(MultiplierKind::Double),
            triple_sessions: count(MultiplierKind::Triple),
            strikes: count(MultiplierKind::Quintuple),
            strikes_neutralized: self.strikes_neutralized,
            auto_triggered: self.auto_fired,
            bonus_triggered: self.bonus_triggered,
        }
    }

    fn draw_session_duration(&mut self) -> u32 {
        let range = self.config.session_duration_secs;
        self.draws.draw_range(range.start, range.end)
    }

    // Overlapping Double/Triple sessions do not add up; the heaviest one wins.
    fn session_kind_at(&self, t: u32) -> MultiplierKind {
        self.active
            .iter()
            .filter(|s| s.kind.is_session_kind() && s.is_active(t))
            .map(|s| s.kind)
            .max_by_key(|kind| kind.weight())
            .unwrap_or(MultiplierKind::None)
    }

    fn strike_active_at(&self, t: u32) -> bool {
        self.active.iter().any(|s| s.is_strike() && s.is_active(t))
    }

    fn activate(&mut self, session: Session) {
        self.active.push(session.clone());
        self.notify(MultiplierEvent::SessionStarted { session });
    }

    fn retire(&mut self, session: Session) {
        debug!(
            kind = %session.kind,
            start = session.start_time,
            end = session.end_time(),
            source = %session.source,
            "session expired"
        );
        self.history.push(session.clone());
        self.notify(MultiplierEvent::SessionExpired { session });
    }

    fn notify(&mut self, event: MultiplierEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer.on_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{Draw, RecordingObserver, ScriptedDraws};

    fn scripted(draws: Vec<Draw>) -> MultiplierManager<ScriptedDraws> {
        MultiplierManager::new(BattleConfig::with_duration(180), ScriptedDraws::new(draws)).unwrap()
    }

    fn with_triple_at_63(duration: u32) -> MultiplierManager<ScriptedDraws> {
        let mut m = scripted(vec![
            Draw::Range(63),
            Draw::Kind(MultiplierKind::Triple),
            Draw::Range(duration),
        ]);
        m.plan_auto_session();
        m.update(63);
        m
    }

    #[test]
    fn seeded_plans_stay_inside_the_auto_window() {
        for seed in 0..64 {
            let mut m = MultiplierManager::seeded(BattleConfig::with_duration(180), seed).unwrap();
            let plan = m.plan_auto_session();
            assert!((60..=65).contains(&plan.at), "seed {seed} drew {}", plan.at);
            assert!(plan.kind.is_session_kind());

            let mut short = MultiplierManager::seeded(BattleConfig::with_duration(60), seed).unwrap();
            let plan = short.plan_auto_session();
            assert!((15..=20).contains(&plan.at));
        }
    }

    #[test]
    fn same_seed_replays_the_same_plan() {
        let mut a = MultiplierManager::seeded(BattleConfig::default(), 7).unwrap();
        let mut b = MultiplierManager::seeded(BattleConfig::default(), 7).unwrap();
        assert_eq!(a.plan_auto_session(), b.plan_auto_session());
    }

    #[test]
    fn plan_is_drawn_once() {
        let mut m = scripted(vec![Draw::Range(61), Draw::Kind(MultiplierKind::Double)]);
        let first = m.plan_auto_session();
        let second = m.plan_auto_session();
        assert_eq!(first, second);
        assert_eq!(first, PlannedSession { kind: MultiplierKind::Double, at: 61 });
    }

    #[test]
    fn auto_session_fires_once_at_planned_time() {
        let mut m = scripted(vec![
            Draw::Range(63),
            Draw::Kind(MultiplierKind::Triple),
            Draw::Range(25),
        ]);
        m.plan_auto_session();
        m.update(62);
        assert_eq!(m.current_kind(), MultiplierKind::None);
        assert!(!m.is_session_active());

        m.update(63);
        assert_eq!(m.current_kind(), MultiplierKind::Triple);
        assert_eq!(m.active_sessions(), &[Session::new(MultiplierKind::Triple, 63, 25, "auto")]);

        m.update(88);
        assert_eq!(m.current_kind(), MultiplierKind::None);
        m.update(100);
        assert_eq!(m.statistics().total_sessions, 1);
    }

    #[test]
    fn update_without_plan_never_fires() {
        let mut m = scripted(vec![]);
        m.update(70);
        assert!(!m.status().auto_fired);
        assert!(m.active_sessions().is_empty());
    }

    #[test]
    fn repeated_update_retires_exactly_once() {
        let recorder = RecordingObserver::new();
        let mut m = with_triple_at_63(25);
        m.set_observer(recorder.clone());
        m.update(88);
        m.update(88);
        assert_eq!(m.history().len(), 1);
        assert!(m.active_sessions().is_empty());
        let expired = recorder
            .events()
            .into_iter()
            .filter(|e| matches!(e, MultiplierEvent::SessionExpired { .. }))
            .count();
        assert_eq!(expired, 1);
    }

    #[test]
    fn amplify_without_sessions_is_identity() {
        let m = scripted(vec![]);
        let amp = m.amplify(250, 10);
        assert_eq!(amp.total, 250);
        assert_eq!(amp.session_multiplier, 1);
        assert!(!amp.strike_applied);
        assert_eq!(amp.breakdown(), "250");
    }

    #[test]
    fn amplify_applies_session_multiplier() {
        let m = with_triple_at_63(25);
        let amp = m.amplify(100, 70);
        assert_eq!(amp.total, 300);
        assert_eq!(amp.session_points, 300);
        assert_eq!(amp.strike_points, 0);
        assert_eq!(amp.breakdown(), "100 × 3");
    }

    #[test]
    fn strike_stacks_additively_with_session() {
        let mut m = with_triple_at_63(25);
        m.draws = ScriptedDraws::new(vec![Draw::Chance(true)]);
        assert!(m.attempt_strike(70, "X"));
        let amp = m.amplify(100, 70);
        assert_eq!(amp.total, 800);
        assert_eq!(amp.breakdown(), "(100 × 3) + (100 × 5)");
    }

    #[test]
    fn strike_alone_adds_five_times_base() {
        let mut m = scripted(vec![Draw::Chance(true)]);
        assert!(m.attempt_strike(10, "X"));
        let amp = m.amplify(100, 12);
        assert_eq!(amp.total, 600);
        assert_eq!(amp.breakdown(), "100 + (100 × 5)");
        assert_eq!(m.active_sessions()[0].source, "strike_X");
        assert_eq!(m.amplify(100, 15).total, 100);
    }

    #[test]
    fn missed_strike_changes_nothing() {
        let mut m = scripted(vec![Draw::Chance(false)]);
        assert!(!m.attempt_strike(10, "X"));
        assert!(m.active_sessions().is_empty());
        assert_eq!(m.statistics(), MultiplierStatistics::default());
    }

    #[test]
    fn hammer_neutralizes_once() {
        let mut m = scripted(vec![Draw::Chance(true)]);
        assert!(m.attempt_strike(10, "X"));
        assert!(m.deploy_hammer(11, "Y"));
        assert!(!m.deploy_hammer(11, "Y"));
        assert!(!m.is_strike_active(11));
        assert_eq!(m.amplify(40, 11).total, 40);
        let stats = m.statistics();
        assert_eq!(stats.strikes, 0);
        assert_eq!(stats.strikes_neutralized, 1);
    }

    #[test]
    fn hammer_without_strike_or_after_expiry_fails() {
        let mut m = scripted(vec![Draw::Chance(true)]);
        assert!(!m.deploy_hammer(5, "Y"));
        assert!(m.attempt_strike(10, "X"));
        assert!(!m.deploy_hammer(15, "Y"));
        m.update(15);
        assert!(!m.deploy_hammer(15, "Y"));
        assert_eq!(m.statistics().strikes, 1);
    }

    #[test]
    fn new_strike_replaces_the_live_one() {
        let mut m = scripted(vec![Draw::Chance(true), Draw::Chance(true)]);
        assert!(m.attempt_strike(10, "X"));
        assert!(m.attempt_strike(12, "Z"));
        let strikes: Vec<_> = m.active_sessions().iter().filter(|s| s.is_strike()).collect();
        assert_eq!(strikes.len(), 1);
        assert_eq!(strikes[0].source, "strike_Z");
        assert_eq!(m.history().len(), 1);
        assert_eq!(m.statistics().strikes, 2);
        assert_eq!(m.amplify(10, 13).total, 60);
    }

    #[test]
    fn replaced_strike_ends_when_it_was_replaced() {
        let recorder = RecordingObserver::new();
        let mut m = scripted(vec![Draw::Chance(true), Draw::Chance(true)]).with_observer(recorder.clone());
        assert!(m.attempt_strike(10, "X"));
        assert!(m.attempt_strike(12, "Z"));
        assert_eq!(m.history()[0].start_time, 10);
        assert_eq!(m.history()[0].end_time(), 12);
        let expired: Vec<_> = recorder
            .events()
            .into_iter()
            .filter_map(|e| match e {
                MultiplierEvent::SessionExpired { session } => Some(session),
                _ => None,
            })
            .collect();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].source, "strike_X");
        assert_eq!(expired[0].end_time(), 12);
    }

    #[test]
    fn huge_gift_values_saturate() {
        let mut m = with_triple_at_63(25);
        m.draws = ScriptedDraws::new(vec![Draw::Chance(true)]);
        assert!(m.attempt_strike(70, "X"));
        let amp = m.amplify(u64::MAX, 70);
        assert_eq!(amp.session_points, u64::MAX);
        assert_eq!(amp.strike_points, u64::MAX);
        assert_eq!(amp.total, u64::MAX);
        assert_eq!(m.strike_bonus(u64::MAX / 2), u64::MAX);
    }

    #[test]
    fn bonus_requires_window_and_threshold() {
        let mut m = scripted(vec![Draw::Kind(MultiplierKind::Double), Draw::Range(20)]);
        for t in 70..75 {
            m.record_gift(t, "rose", 1);
        }
        assert!(!m.attempt_bonus_session(75), "outside the bonus window");
        assert!(!m.attempt_bonus_session(95), "roses aged out of the window");

        for t in 95..100 {
            m.record_gift(t, "Rose", 1);
        }
        assert!(m.attempt_bonus_session(99));
        assert!(!m.attempt_bonus_session(100), "bonus is consumed once");

        let status = m.status();
        assert!(status.bonus_triggered);
        assert!(!status.bonus_available);
        assert_eq!(m.active_sessions()[0], Session::new(MultiplierKind::Double, 99, 20, "threshold"));
    }

    #[test]
    fn bonus_triggers_on_value_alone() {
        let mut m = scripted(vec![Draw::Kind(MultiplierKind::Triple), Draw::Range(30)]);
        m.record_gift(90, "Lion", 1000);
        assert!(m.attempt_bonus_session(90));
        m.update(90);
        assert_eq!(m.current_kind(), MultiplierKind::Triple);
    }

    #[test]
    fn overlapping_sessions_take_the_max_not_the_sum() {
        let mut m = scripted(vec![
            Draw::Range(65),
            Draw::Kind(MultiplierKind::Double),
            Draw::Range(30),
            Draw::Kind(MultiplierKind::Triple),
            Draw::Range(20),
        ]);
        m.plan_auto_session();
        m.update(65);
        m.record_gift(90, "Universe", 5000);
        assert!(m.attempt_bonus_session(90));
        m.update(90);
        assert_eq!(m.current_kind(), MultiplierKind::Triple);
        assert_eq!(m.amplify(10, 90).total, 30);
        m.update(95);
        assert_eq!(m.current_kind(), MultiplierKind::Triple);
        assert_eq!(m.amplify(10, 95).total, 30);
        m.update(110);
        assert_eq!(m.current_kind(), MultiplierKind::None);

        let stats = m.statistics();
        assert_eq!(stats.double_sessions, 1);
        assert_eq!(stats.triple_sessions, 1);
        assert!(stats.auto_triggered && stats.bonus_triggered);
    }

    #[test]
    fn current_kind_ignores_strikes() {
        let mut m = scripted(vec![Draw::Chance(true)]);
        assert!(m.attempt_strike(20, "X"));
        m.update(20);
        assert_eq!(m.current_kind(), MultiplierKind::None);
        assert!(m.is_session_active());
        assert!(m.status().strike_active);
    }

    #[test]
    fn strike_window_opens_in_sessions_and_final_phase() {
        let m = with_triple_at_63(25);
        assert!(!m.strike_window_open(40));
        assert!(m.strike_window_open(70));
        assert!(!m.strike_window_open(120));
        assert!(m.strike_window_open(150));
        assert!(m.is_final_phase(170));
        assert_eq!(m.strike_bonus(40), 200);
    }

    #[test]
    fn observer_sees_lifecycle_in_order() {
        let recorder = RecordingObserver::new();
        let mut m = scripted(vec![
            Draw::Range(60),
            Draw::Kind(MultiplierKind::Double),
            Draw::Range(20),
            Draw::Chance(true),
        ])
        .with_observer(recorder.clone());
        m.plan_auto_session();
        m.update(60);
        assert!(m.attempt_strike(61, "X"));
        assert!(m.deploy_hammer(62, "Y"));
        m.update(80);

        let events = recorder.events();
        assert_eq!(events.len(), 5);
        assert!(matches!(events[0], MultiplierEvent::AutoSessionPlanned { at: 60, .. }));
        assert!(matches!(events[1], MultiplierEvent::SessionStarted { .. }));
        assert!(matches!(&events[2], MultiplierEvent::StrikeTriggered { actor, .. } if actor == "X"));
        assert!(matches!(&events[3], MultiplierEvent::StrikeNeutralized { actor, time: 62, .. } if actor == "Y"));
        assert!(matches!(&events[4], MultiplierEvent::SessionExpired { session } if session.end_time() == 80));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = BattleConfig {
            strike_probability: -0.1,
            ..BattleConfig::default()
        };
        assert!(MultiplierManager::seeded(config, 1).is_err());
    }
}
