use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const MIN_INTERVAL_SECS: u64 = 1;
pub const MAX_INTERVAL_SECS: u64 = 86_400;
pub const DEFAULT_INTERVAL_SECS: u64 = 300;

pub const DEFAULT_SWEEP_ENABLED: bool = true;

/// Configuration for the periodic sprint rollover sweep.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Whether the background scheduler runs at all. Collection-change
    /// triggers are unaffected by this flag.
    pub enabled: bool,
    /// Seconds between scheduled sweep runs
    pub interval_secs: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            enabled: DEFAULT_SWEEP_ENABLED,
            interval_secs: DEFAULT_INTERVAL_SECS,
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.interval_secs < MIN_INTERVAL_SECS || self.interval_secs > MAX_INTERVAL_SECS {
            return Err(ConfigError::config(format!(
                "sweep.interval_secs must be {}-{}, got {}",
                MIN_INTERVAL_SECS, MAX_INTERVAL_SECS, self.interval_secs
            )));
        }

        Ok(())
    }
}
