use crate::multiplier::{DrawSource, MultiplierEvent, MultiplierObserver};
use crate::types::MultiplierKind;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Draw {
    Range(u32),
    Kind(MultiplierKind),
    Chance(bool),
}

// Empty or mismatched draws fall back to the low bound, the first choice and
// `false`. Range values are clamped into the requested bounds.
#[derive(Debug, Default, Clone)]
pub struct ScriptedDraws {
    queue: VecDeque<Draw>,
}

impl ScriptedDraws {
    pub fn new(draws: impl IntoIterator<Item = Draw>) -> Self {
        Self {
            queue: draws.into_iter().collect(),
        }
    }

    pub fn push(&mut self, draw: Draw) {
        self.queue.push_back(draw);
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl DrawSource for ScriptedDraws {
    fn draw_range(&mut self, low: u32, high: u32) -> u32 {
        match self.queue.pop_front() {
            Some(Draw::Range(value)) => value.clamp(low, high.max(low)),
            _ => low,
        }
    }

    fn draw_kind(&mut self, choices: &[MultiplierKind]) -> MultiplierKind {
        let fallback = choices.first().copied().unwrap_or(MultiplierKind::None);
        match self.queue.pop_front() {
            Some(Draw::Kind(kind)) if choices.contains(&kind) => kind,
            _ => fallback,
        }
    }

    fn draw_chance(&mut self, _probability: f64) -> bool {
        matches!(self.queue.pop_front(), Some(Draw::Chance(true)))
    }
}

// Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<MultiplierEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<MultiplierEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl MultiplierObserver for RecordingObserver {
    fn on_event(&mut self, event: &MultiplierEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
    }
}

pub struct FnObserver<F> {
    handler: F,
}

impl<F> FnObserver<F> {
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

impl<F> MultiplierObserver for FnObserver<F>
where
    F: FnMut(&MultiplierEvent),
{
    fn on_event(&mut self, event: &MultiplierEvent) {
        (self.handler)(event)
    }
}
