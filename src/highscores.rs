//! Best-score persistence
//!
//! Stored as a decimal string under `highScore`. Storage problems are
//! logged and swallowed: the best score simply does not survive a reload.

use crate::persistence::{KeyValueStore, StorageError};

/// Storage key of the best score
pub const HIGH_SCORE_KEY: &str = "highScore";

/// High score backed by a key-value store
pub struct HighScoreStore {
    store: Box<dyn KeyValueStore>,
}

impl HighScoreStore {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read the best score, 0 when missing or unreadable
    pub fn load(&self) -> u32 {
        match self.try_load() {
            Ok(Some(score)) => {
                log::info!("Loaded high score {}", score);
                score
            }
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                0
            }
            Err(err) => {
                log::warn!("Could not load high score: {}", err);
                0
            }
        }
    }

    /// Write the best score. Failures are logged only.
    pub fn save(&mut self, score: u32) {
        match self.store.set(HIGH_SCORE_KEY, &score.to_string()) {
            Ok(()) => log::info!("High score {} saved", score),
            Err(err) => log::warn!("Could not save high score: {}", err),
        }
    }

    fn try_load(&self) -> Result<Option<u32>, StorageError> {
        self.store
            .get(HIGH_SCORE_KEY)?
            .map(|raw| parse_high_score(&raw))
            .transpose()
    }
}

fn parse_high_score(raw: &str) -> Result<u32, StorageError> {
    raw.trim().parse().map_err(|_| StorageError::Parse {
        key: HIGH_SCORE_KEY.to_string(),
        value: raw.to_string(),
    })
}
