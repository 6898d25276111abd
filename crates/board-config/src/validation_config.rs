use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

// Validation constraints
pub const MIN_TITLE_LENGTH: usize = 1;
pub const MAX_TITLE_LENGTH: usize = 500;
pub const DEFAULT_MAX_TITLE_LENGTH: usize = 200;

pub const MIN_DESCRIPTION_LENGTH: usize = 0;
pub const MAX_DESCRIPTION_LENGTH: usize = 100000;
pub const DEFAULT_MAX_DESCRIPTION_LENGTH: usize = 10000;

pub const MIN_ASSIGNEES: usize = 1;
pub const MAX_ASSIGNEES: usize = 100;
pub const DEFAULT_MAX_ASSIGNEES: usize = 20;

pub const MIN_SUBTASKS: usize = 1;
pub const MAX_SUBTASKS: usize = 500;
pub const DEFAULT_MAX_SUBTASKS: usize = 50;

/// Validation configuration for field limits.
///
/// These limits are applied during input validation to prevent
/// abuse and ensure reasonable data sizes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Maximum length for task titles
    pub max_title_length: usize,
    /// Maximum length for task descriptions
    pub max_description_length: usize,
    /// Maximum number of assignees per task
    pub max_assignees: usize,
    /// Maximum number of subtasks per task
    pub max_subtasks: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_title_length: DEFAULT_MAX_TITLE_LENGTH,
            max_description_length: DEFAULT_MAX_DESCRIPTION_LENGTH,
            max_assignees: DEFAULT_MAX_ASSIGNEES,
            max_subtasks: DEFAULT_MAX_SUBTASKS,
        }
    }
}

impl ValidationConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.max_title_length < MIN_TITLE_LENGTH || self.max_title_length > MAX_TITLE_LENGTH {
            return Err(ConfigError::config(format!(
                "validation.max_title_length must be {}-{}, got {}",
                MIN_TITLE_LENGTH, MAX_TITLE_LENGTH, self.max_title_length
            )));
        }

        if self.max_description_length < MIN_DESCRIPTION_LENGTH
            || self.max_description_length > MAX_DESCRIPTION_LENGTH
        {
            return Err(ConfigError::config(format!(
                "validation.max_description_length must be {}-{}, got {}",
                MIN_DESCRIPTION_LENGTH, MAX_DESCRIPTION_LENGTH, self.max_description_length
            )));
        }

        if self.max_assignees < MIN_ASSIGNEES || self.max_assignees > MAX_ASSIGNEES {
            return Err(ConfigError::config(format!(
                "validation.max_assignees must be {}-{}, got {}",
                MIN_ASSIGNEES, MAX_ASSIGNEES, self.max_assignees
            )));
        }

        if self.max_subtasks < MIN_SUBTASKS || self.max_subtasks > MAX_SUBTASKS {
            return Err(ConfigError::config(format!(
                "validation.max_subtasks must be {}-{}, got {}",
                MIN_SUBTASKS, MAX_SUBTASKS, self.max_subtasks
            )));
        }

        Ok(())
    }
}
