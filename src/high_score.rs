//! Best score across sessions, backed by a single named storage slot.

use crate::error::Result;
use log::{info, warn};
use std::collections::HashMap;

/// Get/set access to named text slots.
pub trait ScoreStore {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Volatile store for tests and for platforms with nothing durable.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn with_value(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.slots.insert(key.to_string(), value.to_string());
        store
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub struct HighScore {
    best: u32,
    key: String,
    store: Box<dyn ScoreStore>,
    /// Cleared after the first failed write; later records stay in memory.
    persistent: bool,
}

impl HighScore {
    /// Reads the slot once. Missing, unreadable or garbled values count as 0.
    pub fn load(store: Box<dyn ScoreStore>, key: &str) -> Self {
        let best = match store.load(key) {
            Ok(Some(text)) => match text.trim().parse::<u32>() {
                Ok(value) => value,
                Err(e) => {
                    warn!("ignoring stored high score {:?}: {}", text, e);
                    0
                }
            },
            Ok(None) => 0,
            Err(e) => {
                warn!("could not read high score, starting from 0: {}", e);
                0
            }
        };

        Self {
            best,
            key: key.to_string(),
            store,
            persistent: true,
        }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    #[cfg(test)]
    pub(crate) fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Raises the best score if `score` beats it. Returns true on a new record.
    pub fn record(&mut self, score: u32) -> bool {
        if score <= self.best {
            return false;
        }

        self.best = score;
        info!("new high score {}", score);

        if self.persistent {
            if let Err(e) = self.store.save(&self.key, &score.to_string()) {
                warn!("high score kept in memory only: {}", e);
                self.persistent = false;
            }
        }
        true
    }
}
