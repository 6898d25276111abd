use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const DEFAULT_TERMINAL_STATUS: &str = "Done";

pub const MIN_ORDER_STEP: i64 = 1;
pub const MAX_ORDER_STEP: i64 = 1_000_000;
pub const DEFAULT_ORDER_STEP: i64 = 100;

/// Board-level configuration.
///
/// `terminal_status` is the column name treated as "finished" by the
/// rollover sweep. Completion is a naming convention on the board, not a
/// hard state on the task.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Column name whose tasks are excluded from sprint rollover
    pub terminal_status: String,
    /// Spacing between consecutive display_order values when renumbering
    pub order_step: i64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            terminal_status: DEFAULT_TERMINAL_STATUS.to_string(),
            order_step: DEFAULT_ORDER_STEP,
        }
    }
}

impl BoardConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.terminal_status.trim().is_empty() {
            return Err(ConfigError::config(
                "board.terminal_status must not be empty",
            ));
        }

        if self.order_step < MIN_ORDER_STEP || self.order_step > MAX_ORDER_STEP {
            return Err(ConfigError::config(format!(
                "board.order_step must be {}-{}, got {}",
                MIN_ORDER_STEP, MAX_ORDER_STEP, self.order_step
            )));
        }

        Ok(())
    }
}
