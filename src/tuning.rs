//! Data-driven game balance
//!
//! Every size and speed is a fraction of the playfield so gameplay scales
//! with the viewport. The reference field is 400x600; the defaults below
//! reproduce the feel of that field exactly.
//!
//! A JSON document may override any subset of fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or validating a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning field `{field}` is out of range: {reason}")]
    OutOfRange { field: &'static str, reason: &'static str },
}

/// Height of the field the pixel-valued fields are expressed in
pub const REFERENCE_HEIGHT: f32 = 600.0;

/// Balance constants for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Ship (fractions of width / height, per reference frame) ===
    pub ship_width: f32,
    pub ship_height: f32,
    pub ship_start_x: f32,
    pub ship_start_y: f32,
    /// Downward velocity at spawn
    pub ship_initial_velocity: f32,
    /// Downward acceleration added every frame
    pub ship_gravity: f32,
    /// Upward velocity set by a lift impulse (magnitude)
    pub ship_lift: f32,
    /// Downward velocity set by a down-force impulse
    pub ship_down_force: f32,

    // === Obstacles ===
    pub obstacle_width: f32,
    pub obstacle_speed: f32,
    /// Top wall height range in whole reference pixels (600-high field),
    /// max exclusive
    pub gap_top_min: u32,
    pub gap_top_max: u32,
    pub gap_height: f32,
    /// Number of opaque visual variants handed to the renderer
    pub obstacle_variants: u8,
    /// Animation progress added per frame once destruction starts
    pub destruction_speed: f32,
    /// Frames between obstacle spawns
    pub spawn_interval_frames: u64,

    // === Obstacle guns ===
    pub gun_chance: f64,
    /// A gun fires once more than this many frames passed since its last shot
    pub gun_period_frames: u64,
    pub enemy_bullet_speed: f32,
    /// Muzzle offset below the top wall edge (fraction of height)
    pub enemy_bullet_offset_y: f32,
    /// Horizontal distance of one wobble radian (fraction of width)
    pub wobble_wavelength: f32,
    /// Vertical wobble per frame (fraction of height)
    pub wobble_amplitude: f32,

    // === Player bullets ===
    pub bullet_width: f32,
    /// Absolute minimum width in pixels
    pub bullet_min_width: f32,
    pub bullet_height: f32,
    pub bullet_min_height: f32,
    pub bullet_speed: f32,
    /// Wall-clock fire cadence in milliseconds
    pub fire_interval_ms: f64,

    // === Ledger ===
    pub ammo_start: u32,
    pub ammo_max: u32,
    pub ammo_reset: u32,
    /// Ammo per recorded hit when passing a damaged obstacle
    pub pass_hit_bonus: u32,
    /// Ammo for passing an obstacle that was never hit
    pub pass_flat_bonus: u32,
    /// Hits that destroy an obstacle
    pub destroy_hits: u8,

    // === Frame driver ===
    pub target_fps: f64,
    /// Upper bound on the delta multiplier (a stalled tab must not teleport entities)
    pub max_delta: f32,
    pub restart_countdown_secs: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ship_width: 0.125,
            ship_height: 0.05,
            ship_start_x: 0.125,
            ship_start_y: 0.25,
            ship_initial_velocity: 0.000167,
            ship_gravity: 0.0002,
            ship_lift: 0.0067,
            ship_down_force: 0.0067,

            obstacle_width: 30.0 / 400.0,
            obstacle_speed: 0.003,
            gap_top_min: 50,
            gap_top_max: 250,
            gap_height: 200.0 / 600.0,
            obstacle_variants: 4,
            destruction_speed: 0.1,
            spawn_interval_frames: 100,

            gun_chance: 0.4,
            gun_period_frames: 120,
            enemy_bullet_speed: 0.005,
            enemy_bullet_offset_y: 20.0 / 600.0,
            wobble_wavelength: 50.0 / 400.0,
            wobble_amplitude: 2.0 / 600.0,

            bullet_width: 0.0125,
            bullet_min_width: 5.0,
            bullet_height: 0.0033,
            bullet_min_height: 2.0,
            bullet_speed: 0.01,
            fire_interval_ms: 100.0,

            ammo_start: 100,
            ammo_max: 100,
            ammo_reset: 20,
            pass_hit_bonus: 4,
            pass_flat_bonus: 20,
            destroy_hits: 5,

            target_fps: 60.0,
            max_delta: 6.0,
            restart_countdown_secs: 5,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON document over the defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Parse a document, falling back to defaults on any problem
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::warn!("Ignoring tuning overrides: {}", err);
                Self::default()
            }
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("ship_width", self.ship_width),
            ("ship_height", self.ship_height),
            ("obstacle_width", self.obstacle_width),
            ("obstacle_speed", self.obstacle_speed),
            ("gap_height", self.gap_height),
            ("bullet_speed", self.bullet_speed),
            ("wobble_wavelength", self.wobble_wavelength),
            ("destruction_speed", self.destruction_speed),
            ("max_delta", self.max_delta),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(TuningError::OutOfRange {
                    field,
                    reason: "must be positive",
                });
            }
        }
        if self.gap_top_min >= self.gap_top_max {
            return Err(TuningError::OutOfRange {
                field: "gap_top_min",
                reason: "must be below gap_top_max",
            });
        }
        if (self.gap_top_max - 1) as f32 / REFERENCE_HEIGHT + self.gap_height > 1.0 {
            return Err(TuningError::OutOfRange {
                field: "gap_height",
                reason: "gap must fit inside the field",
            });
        }
        if !(0.0..=1.0).contains(&self.gun_chance) {
            return Err(TuningError::OutOfRange {
                field: "gun_chance",
                reason: "must be a probability",
            });
        }
        if self.destroy_hits == 0 {
            return Err(TuningError::OutOfRange {
                field: "destroy_hits",
                reason: "must be at least 1",
            });
        }
        if self.ammo_start > self.ammo_max || self.ammo_reset > self.ammo_max {
            return Err(TuningError::OutOfRange {
                field: "ammo_max",
                reason: "start and reset ammo must fit the capacity",
            });
        }
        if self.spawn_interval_frames == 0 {
            return Err(TuningError::OutOfRange {
                field: "spawn_interval_frames",
                reason: "must be at least 1",
            });
        }
        if !(self.target_fps > 0.0) || !(self.fire_interval_ms > 0.0) {
            return Err(TuningError::OutOfRange {
                field: "target_fps",
                reason: "frame and fire rates must be positive",
            });
        }
        if self.obstacle_variants == 0 {
            return Err(TuningError::OutOfRange {
                field: "obstacle_variants",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Reference frame duration in milliseconds
    #[inline]
    pub fn reference_frame_ms(&self) -> f64 {
        1000.0 / self.target_fps
    }
}
