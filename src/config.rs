use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::warn;

use crate::routine::MINUTES_PER_DAY;

pub const MAX_SCAN_DAYS_ENV: &str = "STUDY_PLANNER_MAX_SCAN_DAYS";
pub const REVISION_MINUTES_ENV: &str = "STUDY_PLANNER_REVISION_MINUTES";

/// Upper bound for day counts in the config, one hundred years.
pub const MAX_CONFIG_DAYS: i64 = 36_500;

/// Tunables of the planning pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// How far past the start date the day filler may move its cursor.
    pub max_scan_days: i64,
    /// Duration of revision entries for goals that are not summaries.
    pub revision_minutes: i64,
    /// How far past the horizon start a repeating last interval keeps producing revisions.
    pub revision_repeat_horizon_days: i64,
    /// Time of day calendar events start at.
    pub export_day_start: NaiveTime,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_scan_days: 3650,
            revision_minutes: 20,
            revision_repeat_horizon_days: 365,
            export_day_start: NaiveTime::MIN,
        }
    }
}

impl PlannerConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: PlannerConfig = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `STUDY_PLANNER_*` environment overrides. Unparsable values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(days) = read_env_i64(MAX_SCAN_DAYS_ENV) {
            self.max_scan_days = days;
        }
        if let Some(minutes) = read_env_i64(REVISION_MINUTES_ENV) {
            self.revision_minutes = minutes;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_CONFIG_DAYS).contains(&self.max_scan_days) {
            return Err(ConfigError::Invalid(format!(
                "max_scan_days must be within 1..={MAX_CONFIG_DAYS} (got {})",
                self.max_scan_days
            )));
        }
        if !(0..=MINUTES_PER_DAY).contains(&self.revision_minutes) {
            return Err(ConfigError::Invalid(format!(
                "revision_minutes must be within 0..={MINUTES_PER_DAY} (got {})",
                self.revision_minutes
            )));
        }
        if !(0..=MAX_CONFIG_DAYS).contains(&self.revision_repeat_horizon_days) {
            return Err(ConfigError::Invalid(format!(
                "revision_repeat_horizon_days must be within 0..={MAX_CONFIG_DAYS} (got {})",
                self.revision_repeat_horizon_days
            )));
        }
        Ok(())
    }
}

fn read_env_i64(name: &str) -> Option<i64> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<i64>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = name, value = %raw, "ignoring unparsable override");
            None
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
