//! Score, ammo and per-obstacle hit bookkeeping
//!
//! Owned by `GameState`. Nothing in here knows about geometry; the tick
//! decides *when* a hit or a pass happens, the ledger decides what it is worth.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::state::ObstacleId;
use crate::tuning::Tuning;

/// Session scoring ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreLedger {
    score: u32,
    high_score: u32,
    ammo: u32,
    ammo_max: u32,
    ammo_reset: u32,
    hits: HashMap<ObstacleId, u8>,
    destroy_hits: u8,
    pass_hit_bonus: u32,
    pass_flat_bonus: u32,
}

impl ScoreLedger {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            high_score: 0,
            ammo: tuning.ammo_start.min(tuning.ammo_max),
            ammo_max: tuning.ammo_max,
            ammo_reset: tuning.ammo_reset.min(tuning.ammo_max),
            hits: HashMap::new(),
            destroy_hits: tuning.destroy_hits,
            pass_hit_bonus: tuning.pass_hit_bonus,
            pass_flat_bonus: tuning.pass_flat_bonus,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    pub fn ammo_max(&self) -> u32 {
        self.ammo_max
    }

    /// Hits that destroy an obstacle
    pub fn destroy_hits(&self) -> u8 {
        self.destroy_hits
    }

    /// Seed the best score read from storage at startup
    pub fn set_high_score(&mut self, high_score: u32) {
        self.high_score = high_score;
    }

    /// One point for a destroyed obstacle
    pub fn add_point(&mut self) {
        self.score = self.score.saturating_add(1);
    }

    /// Record a player-bullet strike and return the updated count.
    /// Saturates at the destruction threshold.
    pub fn record_hit(&mut self, id: ObstacleId) -> u8 {
        let count = self.hits.entry(id).or_insert(0);
        *count = count.saturating_add(1).min(self.destroy_hits);
        *count
    }

    /// Recorded hits for an obstacle (0 when it was never hit)
    pub fn hits(&self, id: ObstacleId) -> u8 {
        self.hits.get(&id).copied().unwrap_or(0)
    }

    /// Drop the counter of an obstacle that left the field
    pub fn forget(&mut self, id: ObstacleId) {
        self.hits.remove(&id);
    }

    /// Add ammo, capped at capacity
    pub fn add_ammo(&mut self, amount: u32) {
        self.ammo = self.ammo.saturating_add(amount).min(self.ammo_max);
    }

    /// Take one round. Returns false (and changes nothing) when empty.
    pub fn use_ammo(&mut self) -> bool {
        if self.ammo == 0 {
            return false;
        }
        self.ammo -= 1;
        true
    }

    /// Ammo earned for flying past an obstacle: a per-hit bonus if it was
    /// damaged, a flat bonus if it was never touched. Returns the amount
    /// credited before the capacity cap.
    ///
    /// A lightly damaged obstacle is worth less than an untouched one; that
    /// is how the game has always played.
    pub fn award_pass(&mut self, id: ObstacleId) -> u32 {
        let hits = u32::from(self.hits(id));
        let amount = if hits > 0 {
            hits * self.pass_hit_bonus
        } else {
            self.pass_flat_bonus
        };
        self.add_ammo(amount);
        amount
    }

    /// Promote the current score if it beats the best. Returns whether it did.
    pub fn save_high_score(&mut self) -> bool {
        if self.score > self.high_score {
            self.high_score = self.score;
            return true;
        }
        false
    }

    /// Start a new run: bank the high score, clear score and hit counters,
    /// refill ammo to the reset level
    pub fn reset(&mut self) {
        self.save_high_score();
        self.score = 0;
        self.hits.clear();
        self.ammo = self.ammo_reset;
    }
}
