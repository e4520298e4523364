//! Collision predicates between ship, walls and bullets
//!
//! All tests are axis-aligned and strict: touching edges never collide.

use super::state::{Bullet, EnemyBullet, Obstacle, Playfield, Ship};

/// Ship overlaps the obstacle horizontally and pokes into either wall
pub fn ship_hits_obstacle(ship: &Ship, obstacle: &Obstacle) -> bool {
    let bounds = ship.bounds();
    bounds.overlaps_span_x(obstacle.x, obstacle.right())
        && obstacle.gap.clips_span(bounds.top(), bounds.bottom())
}

/// Bullet overlaps the obstacle horizontally and its centreline is in wall material
pub fn bullet_hits_obstacle(bullet: &Bullet, obstacle: &Obstacle) -> bool {
    bullet.pos.x < obstacle.right()
        && bullet.pos.x + bullet.size.x > obstacle.x
        && obstacle.gap.is_outside(bullet.pos.y)
}

/// Enemy bullet centre lies inside the ship's bounding box
pub fn enemy_bullet_hits_ship(bullet: &EnemyBullet, ship: &Ship) -> bool {
    ship.bounds().contains_point(bullet.pos)
}

/// Any of the obstacle's enemy bullets strikes the ship
pub fn ship_hit_by_enemy_fire(ship: &Ship, obstacle: &Obstacle) -> bool {
    obstacle
        .enemy_bullets
        .iter()
        .any(|bullet| enemy_bullet_hits_ship(bullet, ship))
}

/// Ship left the field through the top or the bottom
pub fn ship_out_of_bounds(ship: &Ship, field: &Playfield) -> bool {
    ship.pos.y < 0.0 || ship.pos.y + ship.size.y > field.height
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sim::state::GameState;
    use crate::tuning::Tuning;

    /// Obstacle at x=100..130 with a gap of 200..400
    fn setup() -> (GameState, Obstacle) {
        let mut state = GameState::new(Playfield::REFERENCE, Tuning::default(), 1);
        let mut obstacle = state.roll_obstacle();
        obstacle.x = 100.0;
        obstacle.gap.top = 200.0;
        obstacle.gap.bottom = 400.0;
        (state, obstacle)
    }

    #[test]
    fn ship_inside_gap_is_safe() {
        let (mut state, obstacle) = setup();
        state.ship.pos = Vec2::new(90.0, 250.0);
        assert!(!ship_hits_obstacle(&state.ship, &obstacle));
    }

    #[test]
    fn ship_clipping_top_wall_collides() {
        let (mut state, obstacle) = setup();
        state.ship.pos = Vec2::new(90.0, 190.0);
        assert!(ship_hits_obstacle(&state.ship, &obstacle));
    }

    #[test]
    fn ship_clipping_bottom_wall_collides() {
        let (mut state, obstacle) = setup();
        state.ship.pos = Vec2::new(90.0, 380.0);
        assert!(ship_hits_obstacle(&state.ship, &obstacle));
    }

    #[test]
    fn ship_beside_obstacle_never_collides() {
        let (mut state, obstacle) = setup();
        // Ship is 50 wide: right edge exactly touches the obstacle
        state.ship.pos = Vec2::new(50.0, 0.0);
        assert!(!ship_hits_obstacle(&state.ship, &obstacle));
    }

    #[test]
    fn bullet_in_wall_hits() {
        let (state, obstacle) = setup();
        let mut bullet = Bullet::from_ship(&state.ship, &state.field, &state.tuning);
        bullet.pos = Vec2::new(98.0, 150.0);
        assert!(bullet_hits_obstacle(&bullet, &obstacle));
        bullet.pos.y = 300.0;
        assert!(!bullet_hits_obstacle(&bullet, &obstacle));
        bullet.pos.y = 450.0;
        assert!(bullet_hits_obstacle(&bullet, &obstacle));
        bullet.pos.x = 131.0;
        assert!(!bullet_hits_obstacle(&bullet, &obstacle));
    }

    #[test]
    fn enemy_bullet_point_test() {
        let (mut state, mut obstacle) = setup();
        state.ship.pos = Vec2::new(50.0, 150.0);
        obstacle.enemy_bullets.push(EnemyBullet {
            pos: Vec2::new(50.0, 160.0),
        });
        assert!(!ship_hit_by_enemy_fire(&state.ship, &obstacle));
        obstacle.enemy_bullets.push(EnemyBullet {
            pos: Vec2::new(70.0, 160.0),
        });
        assert!(ship_hit_by_enemy_fire(&state.ship, &obstacle));
    }

    #[test]
    fn out_of_bounds_edges() {
        let (mut state, _) = setup();
        let field = state.field;
        state.ship.pos.y = 0.0;
        assert!(!ship_out_of_bounds(&state.ship, &field));
        state.ship.pos.y = -0.1;
        assert!(ship_out_of_bounds(&state.ship, &field));
        state.ship.pos.y = field.height - state.ship.size.y;
        assert!(!ship_out_of_bounds(&state.ship, &field));
        state.ship.pos.y += 0.1;
        assert!(ship_out_of_bounds(&state.ship, &field));
    }
}
