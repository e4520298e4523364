//! Game state and core simulation types
//!
//! One `GameState` lives for one session; it is handed to `tick` by `&mut`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::{Gap, Rect};
use super::ledger::ScoreLedger;
use crate::tuning::{REFERENCE_HEIGHT, Tuning};

/// Current lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Pre-start, background animation only
    Idle,
    /// Simulation active
    Running,
    /// Simulation frozen, waiting for a restart
    GameOver,
}

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    /// Ship left the top or bottom of the field
    OutOfBounds,
    /// Ship flew into an obstacle wall
    Wall,
    /// Ship was struck by an enemy bullet
    EnemyFire,
}

/// State-changing events recorded during a step, drained by the driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ObstacleSpawned { id: ObstacleId, has_gun: bool },
    ObstaclePassed { id: ObstacleId, ammo_awarded: u32 },
    ObstacleHit { id: ObstacleId, hits: u8 },
    ObstacleDestroyed { id: ObstacleId },
    BulletFired { ammo_left: u32 },
    GameOver {
        cause: GameOverCause,
        score: u32,
        new_high_score: bool,
    },
}

/// Play-field dimensions supplied by the viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    /// Reference resolution the tuning fractions were balanced at
    pub const REFERENCE: Playfield = Playfield {
        width: 400.0,
        height: 600.0,
    };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Playfield {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// Stable obstacle handle, issued in spawn order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleId(pub u32);

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity (positive = down), pixels per reference frame
    pub velocity: f32,
    /// Per-frame downward acceleration
    pub gravity: f32,
    pub lift: f32,
    pub down_force: f32,
}

impl Ship {
    pub fn new(field: &Playfield, tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(
                field.width * tuning.ship_start_x,
                field.height * tuning.ship_start_y,
            ),
            size: Vec2::new(
                field.width * tuning.ship_width,
                field.height * tuning.ship_height,
            ),
            velocity: field.height * tuning.ship_initial_velocity,
            gravity: field.height * tuning.ship_gravity,
            lift: -field.height * tuning.ship_lift,
            down_force: field.height * tuning.ship_down_force,
        }
    }

    /// Accelerate then move, both scaled by the delta multiplier
    pub fn update(&mut self, delta: f32) {
        self.velocity += self.gravity * delta;
        self.pos.y += self.velocity * delta;
    }

    pub fn apply_lift(&mut self) {
        self.velocity = self.lift;
    }

    pub fn apply_down_force(&mut self) {
        self.velocity = self.down_force;
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            min: self.pos,
            size: self.size,
        }
    }

    /// Muzzle point: right edge, vertical middle
    pub fn nose(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x, self.pos.y + self.size.y / 2.0)
    }
}

/// A player bullet travelling right
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    /// Leading-edge x is `pos.x + size.x`; `pos.y` is the centreline
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
}

impl Bullet {
    pub fn from_ship(ship: &Ship, field: &Playfield, tuning: &Tuning) -> Self {
        Self {
            pos: ship.nose(),
            size: Vec2::new(
                (field.width * tuning.bullet_width).max(tuning.bullet_min_width),
                (field.height * tuning.bullet_height).max(tuning.bullet_min_height),
            ),
            speed: field.width * tuning.bullet_speed,
        }
    }

    pub fn update(&mut self, delta: f32) {
        self.pos.x += self.speed * delta;
    }

    pub fn is_off_screen(&self, field: &Playfield) -> bool {
        self.pos.x > field.width
    }
}

/// A wobbling bullet fired leftward by an obstacle gun
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyBullet {
    pub pos: Vec2,
}

/// A pair of walls with a gap, scrolling left
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ObstacleId,
    /// Left edge
    pub x: f32,
    pub width: f32,
    pub gap: Gap,
    pub speed: f32,
    pub has_gun: bool,
    /// Frame of the last gun shot (spawn frame until the first shot)
    pub last_shot_frame: u64,
    pub enemy_bullets: Vec<EnemyBullet>,
    /// Ammo for passing this obstacle has been awarded
    pub passed: bool,
    destroying: bool,
    /// Destruction animation, 0..=1
    pub destruction_progress: f32,
    /// Opaque presentation tag
    pub variant: u8,
    /// Presentation phase seed (radians)
    pub animation_offset: f32,
}

impl Obstacle {
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn is_destroying(&self) -> bool {
        self.destroying
    }

    /// Begin the destruction animation. Returns false if it was already running.
    pub fn start_destruction(&mut self) -> bool {
        if self.destroying {
            return false;
        }
        self.destroying = true;
        true
    }

    pub fn advance_destruction(&mut self, amount: f32) {
        if self.destroying {
            self.destruction_progress = (self.destruction_progress + amount).min(1.0);
        }
    }

    pub fn is_fully_destroyed(&self) -> bool {
        self.destruction_progress >= 1.0
    }

    pub fn is_off_screen(&self) -> bool {
        self.right() < 0.0
    }

    /// Slide left, move enemy bullets and fire the gun.
    /// An obstacle mid-destruction is frozen entirely.
    pub fn update(&mut self, frame: u64, delta: f32, field: &Playfield, tuning: &Tuning) {
        if self.destroying {
            return;
        }

        self.x -= self.speed * delta;

        let bullet_speed = field.width * tuning.enemy_bullet_speed;
        let wavelength = field.width * tuning.wobble_wavelength;
        let amplitude = field.height * tuning.wobble_amplitude;
        for bullet in &mut self.enemy_bullets {
            bullet.pos.x -= bullet_speed * delta;
            bullet.pos.y += (bullet.pos.x / wavelength).sin() * amplitude * delta;
        }
        self.enemy_bullets.retain(|b| b.pos.x >= 0.0);

        if self.has_gun && frame.saturating_sub(self.last_shot_frame) > tuning.gun_period_frames {
            self.enemy_bullets.push(EnemyBullet {
                pos: Vec2::new(
                    self.x + self.width / 2.0,
                    self.gap.top + field.height * tuning.enemy_bullet_offset_y,
                ),
            });
            self.last_shot_frame = frame;
        }
    }
}

/// Complete state of one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub field: Playfield,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Frames simulated since the run started
    pub frame_count: u64,
    pub ship: Ship,
    /// Active obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    pub bullets: Vec<Bullet>,
    pub ledger: ScoreLedger,
    pub(crate) events: Vec<GameEvent>,
    rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create an idle session with the given seed
    pub fn new(field: Playfield, tuning: Tuning, seed: u64) -> Self {
        Self {
            seed,
            ship: Ship::new(&field, &tuning),
            ledger: ScoreLedger::new(&tuning),
            field,
            tuning,
            phase: GamePhase::Idle,
            frame_count: 0,
            obstacles: Vec::new(),
            bullets: Vec::new(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new obstacle handle
    pub fn next_obstacle_id(&mut self) -> ObstacleId {
        let id = ObstacleId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Build an obstacle just past the right edge with randomized gap,
    /// variant and gun. Does not add it to the field.
    pub fn roll_obstacle(&mut self) -> Obstacle {
        let id = self.next_obstacle_id();
        let field = self.field;
        let t = &self.tuning;

        let top_px = self.rng.random_range(t.gap_top_min..t.gap_top_max);
        let top = top_px as f32 * field.height / REFERENCE_HEIGHT;
        let gap_height = field.height * t.gap_height;
        let has_gun = self.rng.random_bool(t.gun_chance);
        let variant = self.rng.random_range(0..t.obstacle_variants);
        let animation_offset = self.rng.random::<f32>() * std::f32::consts::TAU;

        Obstacle {
            id,
            x: field.width,
            width: field.width * t.obstacle_width,
            gap: Gap::new(top, top + gap_height),
            speed: field.width * t.obstacle_speed,
            has_gun,
            last_shot_frame: self.frame_count,
            enemy_bullets: Vec::new(),
            passed: false,
            destroying: false,
            destruction_progress: 0.0,
            variant,
            animation_offset,
        }
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Freeze the run and bank the high score
    pub fn end_game(&mut self, cause: GameOverCause) {
        if self.phase != GamePhase::Running {
            return;
        }
        self.phase = GamePhase::GameOver;
        let new_high_score = self.ledger.save_high_score();
        log::info!(
            "Game over ({:?}) at frame {} of seed {}: score {}, best {}",
            cause,
            self.frame_count,
            self.seed,
            self.ledger.score(),
            self.ledger.high_score()
        );
        let score = self.ledger.score();
        self.push_event(GameEvent::GameOver {
            cause,
            score,
            new_high_score,
        });
    }

    /// Clear transient state for a new run; the high score survives.
    /// Leaves the session Idle.
    pub fn reset(&mut self) {
        self.ledger.reset();
        self.ship = Ship::new(&self.field, &self.tuning);
        self.obstacles.clear();
        self.bullets.clear();
        self.events.clear();
        self.frame_count = 0;
        self.phase = GamePhase::Idle;
    }
}
