use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MultiplierKind {
    None,
    Double,
    Triple,
    Quintuple,
}

impl MultiplierKind {
    pub fn weight(self) -> u32 {
        match self {
            Self::None => 1,
            Self::Double => 2,
            Self::Triple => 3,
            Self::Quintuple => 5,
        }
    }

    pub fn is_session_kind(self) -> bool {
        matches!(self, Self::Double | Self::Triple)
    }
}

impl fmt::Display for MultiplierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.weight())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub kind: MultiplierKind,
    pub start_time: u32,
    pub duration: u32,
    pub source: String,
}

impl Session {
    pub fn new(kind: MultiplierKind, start_time: u32, duration: u32, source: impl Into<String>) -> Self {
        debug_assert!(kind != MultiplierKind::None, "sessions never carry MultiplierKind::None");
        Self {
            kind,
            start_time,
            duration,
            source: source.into(),
        }
    }

    pub fn end_time(&self) -> u32 {
        self.start_time + self.duration
    }

    pub fn is_active(&self, t: u32) -> bool {
        self.start_time <= t && t < self.end_time()
    }

    pub fn is_strike(&self) -> bool {
        self.kind == MultiplierKind::Quintuple
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}s-{}s, {})",
            self.kind,
            self.start_time,
            self.end_time(),
            self.source
        )
    }
}
