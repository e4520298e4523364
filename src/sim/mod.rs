//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Time enters only as the delta multiplier
//! - Seeded RNG only
//! - Stable iteration order (spawn order of obstacles and bullets)
//! - No rendering or platform dependencies

pub mod collision;
pub mod geometry;
pub mod ledger;
pub mod state;
pub mod tick;

pub use collision::{
    bullet_hits_obstacle, enemy_bullet_hits_ship, ship_hit_by_enemy_fire, ship_hits_obstacle,
    ship_out_of_bounds,
};
pub use geometry::{Gap, Rect};
pub use ledger::ScoreLedger;
pub use state::{
    Bullet, EnemyBullet, GameEvent, GameOverCause, GamePhase, GameState, Obstacle, ObstacleId,
    Playfield, Ship,
};
pub use tick::{InputAction, apply_input, fire, tick};
