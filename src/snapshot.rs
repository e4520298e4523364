//! Read-only per-frame view of the session
//!
//! The renderer receives a `Snapshot` (as JSON in the browser) and draws it
//! however it likes; the scoreboard only needs the three counters.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{GamePhase, GameState, Obstacle, ObstacleId, Playfield, ScoreLedger};

/// Numbers shown in the score display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Scoreboard {
    pub score: u32,
    pub high_score: u32,
    pub ammo: u32,
}

impl Scoreboard {
    pub fn from_ledger(ledger: &ScoreLedger) -> Self {
        Self {
            score: ledger.score(),
            high_score: ledger.high_score(),
            ammo: ledger.ammo(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipView {
    pub pos: Vec2,
    pub size: Vec2,
    /// Used by the renderer to tilt the sprite
    pub velocity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub id: ObstacleId,
    pub x: f32,
    pub width: f32,
    /// Height of the top wall
    pub gap_top: f32,
    /// Top edge of the bottom wall
    pub gap_bottom: f32,
    pub has_gun: bool,
    pub hits: u8,
    pub destroying: bool,
    pub destruction_progress: f32,
    pub variant: u8,
    pub animation_offset: f32,
    pub enemy_bullets: Vec<Vec2>,
}

impl ObstacleView {
    fn capture(obstacle: &Obstacle, ledger: &ScoreLedger) -> Self {
        Self {
            id: obstacle.id,
            x: obstacle.x,
            width: obstacle.width,
            gap_top: obstacle.gap.top,
            gap_bottom: obstacle.gap.bottom,
            has_gun: obstacle.has_gun,
            hits: ledger.hits(obstacle.id),
            destroying: obstacle.is_destroying(),
            destruction_progress: obstacle.destruction_progress,
            variant: obstacle.variant,
            animation_offset: obstacle.animation_offset,
            enemy_bullets: obstacle.enemy_bullets.iter().map(|b| b.pos).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletView {
    pub pos: Vec2,
    pub size: Vec2,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub frame: u64,
    pub field: Playfield,
    pub ship: ShipView,
    pub obstacles: Vec<ObstacleView>,
    pub bullets: Vec<BulletView>,
    pub scoreboard: Scoreboard,
    /// Seconds until the automatic restart, while the game-over screen is up
    pub countdown: Option<u32>,
}

impl Snapshot {
    pub fn capture(state: &GameState, countdown: Option<u32>) -> Self {
        Self {
            phase: state.phase,
            frame: state.frame_count,
            field: state.field,
            ship: ShipView {
                pos: state.ship.pos,
                size: state.ship.size,
                velocity: state.ship.velocity,
            },
            obstacles: state
                .obstacles
                .iter()
                .map(|o| ObstacleView::capture(o, &state.ledger))
                .collect(),
            bullets: state
                .bullets
                .iter()
                .map(|b| BulletView {
                    pos: b.pos,
                    size: b.size,
                })
                .collect(),
            scoreboard: Scoreboard::from_ledger(&state.ledger),
            countdown,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
