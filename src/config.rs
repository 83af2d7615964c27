use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const LONG_BATTLE_SECS: u32 = 180;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("yaml parse failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("json parse failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config extension '{0}'; expected .yaml/.yml/.json")]
    UnsupportedExtension(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Inclusive `[start, end]` second range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start: u32,
    pub end: u32,
}

impl Window {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, t: u32) -> bool {
        self.start <= t && t <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingWindows {
    pub auto_session: Window,
    pub bonus_attempt: Window,
    pub final_phase_start: u32,
}

impl TimingWindows {
    pub fn for_duration(duration_secs: u32) -> Self {
        if duration_secs >= LONG_BATTLE_SECS {
            Self {
                auto_session: Window::new(60, 65),
                bonus_attempt: Window::new(90, 100),
                final_phase_start: 150,
            }
        } else {
            Self {
                auto_session: Window::new(15, 20),
                bonus_attempt: Window::new(35, 45),
                final_phase_start: 30,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub window_secs: u32,
    pub special_label: String,
    pub special_count: usize,
    pub total_value: u64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            window_secs: 15,
            special_label: "rose".to_string(),
            special_count: 5,
            total_value: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    pub duration_secs: u32,
    pub strike_probability: f64,
    pub strike_duration_secs: u32,
    pub session_duration_secs: Window,
    pub threshold: ThresholdConfig,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            duration_secs: LONG_BATTLE_SECS,
            strike_probability: 0.30,
            strike_duration_secs: 5,
            session_duration_secs: Window::new(20, 30),
            threshold: ThresholdConfig::default(),
        }
    }
}

impl BattleConfig {
    pub fn with_duration(duration_secs: u32) -> Self {
        Self {
            duration_secs,
            ..Self::default()
        }
    }

    pub fn timing(&self) -> TimingWindows {
        TimingWindows::for_duration(self.duration_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.duration_secs == 0 {
            return Err(ConfigError::Invalid("duration_secs must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.strike_probability) {
            return Err(ConfigError::Invalid(format!(
                "strike_probability {} outside [0, 1]",
                self.strike_probability
            )));
        }
        if self.strike_duration_secs == 0 {
            return Err(ConfigError::Invalid(
                "strike_duration_secs must be positive".to_string(),
            ));
        }
        let durations = self.session_duration_secs;
        if durations.start == 0 || durations.start > durations.end {
            return Err(ConfigError::Invalid(format!(
                "session_duration_secs [{}, {}] is not a positive range",
                durations.start, durations.end
            )));
        }
        if self.threshold.window_secs == 0 {
            return Err(ConfigError::Invalid(
                "threshold.window_secs must be positive".to_string(),
            ));
        }
        if self.threshold.special_label.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "threshold.special_label must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn from_yaml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let raw = fs::read_to_string(path_ref).map_err(|source| ConfigError::Read {
            path: path_ref.to_path_buf(),
            source,
        })?;
        let ext = path_ref
            .extension()
            .and_then(|v| v.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&raw),
            "json" => Self::from_json_str(&raw),
            _ => Err(ConfigError::UnsupportedExtension(ext)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_battles_use_minute_scale_windows() {
        let timing = BattleConfig::with_duration(180).timing();
        assert_eq!(timing.auto_session.start, 60);
        assert_eq!(timing.auto_session.end, 65);
        assert_eq!(timing.bonus_attempt, Window::new(90, 100));
        assert_eq!(timing.final_phase_start, 150);
    }

    #[test]
    fn short_battles_use_scaled_windows() {
        let timing = BattleConfig::with_duration(60).timing();
        assert_eq!(timing.auto_session.start, 15);
        assert_eq!(timing.auto_session.end, 20);
        assert_eq!(timing.bonus_attempt, Window::new(35, 45));
        assert_eq!(timing.final_phase_start, 30);
    }

    #[test]
    fn tier_boundary_is_inclusive_at_180() {
        assert_eq!(TimingWindows::for_duration(179).auto_session.start, 15);
        assert_eq!(TimingWindows::for_duration(180).auto_session.start, 60);
        assert_eq!(TimingWindows::for_duration(300).auto_session.start, 60);
    }

    #[test]
    fn yaml_fills_missing_fields_with_defaults() {
        let config = BattleConfig::from_yaml_str("duration_secs: 60\nthreshold:\n  special_count: 3\n")
            .unwrap();
        assert_eq!(config.duration_secs, 60);
        assert_eq!(config.strike_probability, 0.30);
        assert_eq!(config.threshold.special_count, 3);
        assert_eq!(config.threshold.special_label, "rose");
        assert_eq!(config.threshold.total_value, 1000);
    }

    #[test]
    fn json_rejects_out_of_range_probability() {
        let err = BattleConfig::from_json_str(r#"{"strike_probability": 1.5}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn validate_rejects_inverted_session_range() {
        let config = BattleConfig {
            session_duration_secs: Window::new(30, 20),
            ..BattleConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn from_path_rejects_unknown_extension() {
        let path = std::env::temp_dir().join("battle_engine_config_test.toml");
        fs::write(&path, "duration_secs = 60").unwrap();
        let err = BattleConfig::from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedExtension(ext) if ext == "toml"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn bundled_configs_load() {
        let root = env!("CARGO_MANIFEST_DIR");
        let standard = BattleConfig::from_path(format!("{root}/configs/standard.yaml")).unwrap();
        assert_eq!(standard.duration_secs, 180);
        let quick = BattleConfig::from_path(format!("{root}/configs/quick.json")).unwrap();
        assert_eq!(quick.duration_secs, 60);
        assert_eq!(quick.timing().auto_session.start, 15);
    }
}
