//! Game tunables.
//!
//! Every field has a default, so a config file only needs the keys it
//! wants to change.

use crate::error::{Error, Result};
use crate::grid::{MAX_GRID_SIZE, MIN_GRID_SIZE};
use serde::Deserialize;

pub const DEFAULT_GRID_SIZE: i32 = 20;
pub const DEFAULT_START_SPEED_MS: u64 = 200;
pub const DEFAULT_MIN_SPEED_MS: u64 = 60;
pub const DEFAULT_SPEED_DECREMENT_MS: u64 = 5;
pub const DEFAULT_FOOD_SCORE: u32 = 10;
pub const DEFAULT_STORAGE_KEY: &str = "neon-snake-high-score";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square grid.
    pub grid_size: i32,
    /// Tick interval when a session starts.
    pub start_speed_ms: u64,
    /// Fastest allowed tick interval.
    pub min_speed_ms: u64,
    /// How much the interval shrinks per food eaten.
    pub speed_decrement_ms: u64,
    /// Points per food.
    pub food_score: u32,
    /// Name of the persisted high-score slot.
    pub storage_key: String,
    pub fun_fact: FunFactConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            start_speed_ms: DEFAULT_START_SPEED_MS,
            min_speed_ms: DEFAULT_MIN_SPEED_MS,
            speed_decrement_ms: DEFAULT_SPEED_DECREMENT_MS,
            food_score: DEFAULT_FOOD_SCORE,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            fun_fact: FunFactConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FunFactConfig {
    pub endpoint: String,
    pub model: String,
    pub prompt: String,
}

impl Default for FunFactConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
            prompt: "Tell me one short and surprising fun fact about snakes. One sentence."
                .to_string(),
        }
    }
}

/// Slot names double as file names on native builds.
pub fn is_slot_name(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl GameConfig {
    /// Parse a JSON document and validate the result.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(text).map_err(|source| Error::Parse {
            what: "game config",
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(Error::Config(format!(
                "grid_size must be between {} and {}, got {}",
                MIN_GRID_SIZE, MAX_GRID_SIZE, self.grid_size
            )));
        }
        if self.start_speed_ms == 0 || self.min_speed_ms == 0 {
            return Err(Error::Config("tick intervals must be non-zero".to_string()));
        }
        if self.min_speed_ms > self.start_speed_ms {
            return Err(Error::Config(format!(
                "min_speed_ms ({}) exceeds start_speed_ms ({})",
                self.min_speed_ms, self.start_speed_ms
            )));
        }
        if !is_slot_name(&self.storage_key) {
            return Err(Error::Config(format!(
                "storage_key {:?} must be non-empty ASCII letters, digits, '-' or '_'",
                self.storage_key
            )));
        }
        Ok(())
    }

    /// Interval after one more food, never below `min_speed_ms`.
    pub fn faster(&self, speed_ms: u64) -> u64 {
        speed_ms
            .saturating_sub(self.speed_decrement_ms)
            .max(self.min_speed_ms)
    }
}
