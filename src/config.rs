use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

// ============================================================================
// Defaults
// ============================================================================

pub const GRID_WIDTH: usize = 9;
pub const GRID_HEIGHT: usize = 9;
pub const HOLDING_SLOTS: usize = 3;

/// Terminal columns and rows drawn per grid cell.
pub const CELL_WIDTH: u16 = 2;
pub const CELL_HEIGHT: u16 = 1;

/// Upper limits keeping the board and holding row inside terminal space.
pub const MAX_GRID_SIDE: usize = 64;
pub const MAX_HOLDING_SLOTS: usize = 8;
pub const MAX_CELL_SIZE: u16 = 8;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "BLOCK_DROP_CONFIG";

// ============================================================================
// Config
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub grid_width: usize,
    pub grid_height: usize,
    pub holding_slots: usize,
    pub cell_width: u16,
    pub cell_height: u16,
    /// Seed for the random piece provider; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid_width: GRID_WIDTH,
            grid_height: GRID_HEIGHT,
            holding_slots: HOLDING_SLOTS,
            cell_width: CELL_WIDTH,
            cell_height: CELL_HEIGHT,
            seed: None,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the file named by `BLOCK_DROP_CONFIG`, or the defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid must be at least 1x1, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        if self.grid_width > MAX_GRID_SIDE || self.grid_height > MAX_GRID_SIDE {
            return Err(ConfigError::Invalid(format!(
                "grid must be at most {MAX_GRID_SIDE}x{MAX_GRID_SIDE}, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        if self.holding_slots == 0 || self.holding_slots > MAX_HOLDING_SLOTS {
            return Err(ConfigError::Invalid(format!(
                "holding area needs 1 to {MAX_HOLDING_SLOTS} slots, got {}",
                self.holding_slots
            )));
        }
        if self.cell_width == 0 || self.cell_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "cell size must be non-zero, got {}x{}",
                self.cell_width, self.cell_height
            )));
        }
        if self.cell_width > MAX_CELL_SIZE || self.cell_height > MAX_CELL_SIZE {
            return Err(ConfigError::Invalid(format!(
                "cell size must be at most {MAX_CELL_SIZE}x{MAX_CELL_SIZE}, got {}x{}",
                self.cell_width, self.cell_height
            )));
        }
        Ok(())
    }
}
