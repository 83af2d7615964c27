use crate::config::ThresholdConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdEvent {
    pub time: u32,
    pub label: String,
    pub value: u64,
    pub is_special: bool,
}

#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WindowActivity {
    pub special_count: usize,
    pub total_value: u64,
    pub event_count: usize,
    pub window_start: u32,
    pub window_end: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ThresholdTracker {
    config: ThresholdConfig,
    events: Vec<ThresholdEvent>,
}

impl ThresholdTracker {
    pub fn new(config: ThresholdConfig) -> Self {
        Self {
            config,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &ThresholdConfig {
        &self.config
    }

    pub fn record(&mut self, t: u32, label: impl AsRef<str>, value: u64) {
        debug_assert!(
            self.events.last().map_or(true, |last| last.time <= t),
            "threshold events must be recorded in time order"
        );
        let label = label.as_ref().trim();
        let is_special = label.eq_ignore_ascii_case(self.config.special_label.trim());
        self.events.push(ThresholdEvent {
            time: t,
            label: label.to_string(),
            value,
            is_special,
        });
    }

    pub fn events(&self) -> &[ThresholdEvent] {
        &self.events
    }

    pub fn activity_in_window(&self, t: u32) -> WindowActivity {
        self.activity_within(t, self.config.window_secs)
    }

    pub fn activity_within(&self, t: u32, window_secs: u32) -> WindowActivity {
        let window_start = t.saturating_sub(window_secs);
        let lo = self.events.partition_point(|e| e.time < window_start);
        let hi = self.events.partition_point(|e| e.time <= t);
        let in_window = &self.events[lo..hi.max(lo)];
        WindowActivity {
            special_count: in_window.iter().filter(|e| e.is_special).count(),
            total_value: in_window.iter().map(|e| e.value).sum(),
            event_count: in_window.len(),
            window_start,
            window_end: t,
        }
    }

    pub fn threshold_met(&self, t: u32) -> bool {
        self.threshold_met_with(t, self.config.special_count, self.config.total_value)
    }

    pub fn threshold_met_with(&self, t: u32, special_threshold: usize, value_threshold: u64) -> bool {
        let activity = self.activity_in_window(t);
        activity.special_count >= special_threshold || activity.total_value >= value_threshold
    }
}
