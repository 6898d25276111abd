use crate::{BoardConfig, ConfigErrorResult, SweepConfig, ValidationConfig};

use serde::Deserialize;

/// Root configuration for the board engine.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub board: BoardConfig,
    pub validation: ValidationConfig,
    pub sweep: SweepConfig,
}

impl Config {
    /// Parse and validate a TOML document. Missing sections fall back to
    /// defaults.
    pub fn from_toml_str(raw: &str) -> ConfigErrorResult<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.board.validate()?;
        self.validation.validate()?;
        self.sweep.validate()?;
        Ok(())
    }
}
