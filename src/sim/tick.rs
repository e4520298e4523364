//! Frame-scaled simulation step
//!
//! `tick` advances one frame-equivalent of time, scaled by the delta
//! multiplier. `fire` is the second, wall-clock driven entry point that
//! spends ammo. Neither assumes anything about how often the other runs.

use super::collision::{
    bullet_hits_obstacle, ship_hit_by_enemy_fire, ship_hits_obstacle, ship_out_of_bounds,
};
use super::state::{Bullet, GameEvent, GameOverCause, GamePhase, GameState};

/// Discrete player impulses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Set the ship's velocity upward
    Lift,
    /// Set the ship's velocity downward
    DownForce,
}

/// Apply an impulse to the ship. Ignored unless the run is active.
pub fn apply_input(state: &mut GameState, action: InputAction) {
    if state.phase != GamePhase::Running {
        return;
    }
    match action {
        InputAction::Lift => state.ship.apply_lift(),
        InputAction::DownForce => state.ship.apply_down_force(),
    }
}

/// Advance the session by one frame, `delta` being the frame's duration in
/// reference (60 Hz) frames
pub fn tick(state: &mut GameState, delta: f32) {
    if state.phase != GamePhase::Running {
        return;
    }

    state.ship.update(delta);
    if ship_out_of_bounds(&state.ship, &state.field) {
        state.end_game(GameOverCause::OutOfBounds);
        return;
    }

    if state.frame_count % state.tuning.spawn_interval_frames == 0 {
        let obstacle = state.roll_obstacle();
        log::debug!(
            "Spawned obstacle {:?} at frame {} (gap {:.0}..{:.0}, gun: {})",
            obstacle.id,
            state.frame_count,
            obstacle.gap.top,
            obstacle.gap.bottom,
            obstacle.has_gun
        );
        state.push_event(GameEvent::ObstacleSpawned {
            id: obstacle.id,
            has_gun: obstacle.has_gun,
        });
        state.obstacles.push(obstacle);
    }

    if let Some(cause) = update_obstacles(state, delta) {
        state.end_game(cause);
        return;
    }

    update_bullets(state, delta);

    state.frame_count += 1;
}

/// Spend one round and launch a bullet from the ship's nose.
/// Returns whether a bullet was fired.
pub fn fire(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Running || !state.ledger.use_ammo() {
        return false;
    }
    let bullet = Bullet::from_ship(&state.ship, &state.field, &state.tuning);
    state.bullets.push(bullet);
    let ammo_left = state.ledger.ammo();
    state.push_event(GameEvent::BulletFired { ammo_left });
    true
}

/// Move obstacles and their guns, then resolve ship collisions, pass awards
/// and removal. Newest obstacles are visited first.
fn update_obstacles(state: &mut GameState, delta: f32) -> Option<GameOverCause> {
    let frame = state.frame_count;
    let destruction_step = state.tuning.destruction_speed * delta;

    for i in (0..state.obstacles.len()).rev() {
        let obstacle = &mut state.obstacles[i];
        obstacle.advance_destruction(destruction_step);
        obstacle.update(frame, delta, &state.field, &state.tuning);

        if ship_hits_obstacle(&state.ship, obstacle) {
            return Some(GameOverCause::Wall);
        }
        if ship_hit_by_enemy_fire(&state.ship, obstacle) {
            return Some(GameOverCause::EnemyFire);
        }

        if !obstacle.passed && obstacle.right() < state.ship.pos.x {
            obstacle.passed = true;
            let id = obstacle.id;
            let ammo_awarded = state.ledger.award_pass(id);
            log::debug!("Passed obstacle {:?}: +{} ammo", id, ammo_awarded);
            state.events.push(GameEvent::ObstaclePassed { id, ammo_awarded });
        }

        let obstacle = &state.obstacles[i];
        if obstacle.is_off_screen() || obstacle.is_fully_destroyed() {
            let id = obstacle.id;
            state.obstacles.remove(i);
            state.ledger.forget(id);
        }
    }
    None
}

/// Move player bullets and resolve hits against obstacle walls
fn update_bullets(state: &mut GameState, delta: f32) {
    let destroy_hits = state.ledger.destroy_hits();

    for i in (0..state.bullets.len()).rev() {
        let bullet = &mut state.bullets[i];
        bullet.update(delta);

        let target = state
            .obstacles
            .iter()
            .rposition(|o| !o.is_destroying() && bullet_hits_obstacle(bullet, o));

        let Some(j) = target else {
            if state.bullets[i].is_off_screen(&state.field) {
                state.bullets.remove(i);
            }
            continue;
        };

        state.bullets.remove(i);
        let id = state.obstacles[j].id;
        let hits = state.ledger.record_hit(id);
        log::trace!("Obstacle {:?} hit ({}/{})", id, hits, destroy_hits);
        state.events.push(GameEvent::ObstacleHit { id, hits });

        if hits >= destroy_hits && state.obstacles[j].start_destruction() {
            state.ledger.add_point();
            log::debug!(
                "Obstacle {:?} destroyed, score {}",
                id,
                state.ledger.score()
            );
            state.events.push(GameEvent::ObstacleDestroyed { id });
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sim::state::{EnemyBullet, Playfield};
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn running(seed: u64) -> GameState {
        let mut state = GameState::new(Playfield::REFERENCE, Tuning::default(), seed);
        state.phase = GamePhase::Running;
        state
    }

    /// Running session with spawning disabled until frame 1000 and a
    /// weightless ship parked mid-field
    fn quiet() -> GameState {
        let mut state = running(42);
        state.frame_count = 1;
        state.tuning.spawn_interval_frames = 1000;
        state.ship.gravity = 0.0;
        state.ship.velocity = 0.0;
        state.ship.pos.y = 285.0;
        state
    }

    #[test]
    fn idle_session_does_not_move() {
        let mut state = GameState::new(Playfield::REFERENCE, Tuning::default(), 1);
        let y = state.ship.pos.y;
        tick(&mut state, 1.0);
        assert_eq!(state.ship.pos.y, y);
        assert_eq!(state.frame_count, 0);
        assert!(!fire(&mut state));
    }

    #[test]
    fn first_frame_spawns_an_obstacle() {
        let mut state = running(5);
        tick(&mut state, 1.0);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.frame_count, 1);
        let events = state.drain_events();
        assert!(matches!(events[0], GameEvent::ObstacleSpawned { .. }));
    }

    #[test]
    fn spawns_every_hundred_frames() {
        let mut state = running(11);
        state.ship.gravity = 0.0;
        state.ship.velocity = 0.0;
        state.ship.pos.y = 285.0;

        let mut spawn_frames = Vec::new();
        for _ in 0..=200 {
            let frame = state.frame_count;
            tick(&mut state, 1.0);
            let spawned = state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::ObstacleSpawned { .. }))
                .count();
            spawn_frames.extend(std::iter::repeat_n(frame, spawned));
            // Keep the field clear so nothing can end the run
            state.obstacles.clear();
        }
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(spawn_frames, vec![0, 100, 200]);
    }

    #[test]
    fn obstacles_slide_by_speed_times_delta() {
        let mut state = quiet();
        let obstacle = state.roll_obstacle();
        let speed = obstacle.speed;
        state.obstacles.push(obstacle);
        tick(&mut state, 2.0);
        assert!((state.obstacles[0].x - (400.0 - speed * 2.0)).abs() < 1e-4);
    }

    #[test]
    fn input_is_ignored_outside_running() {
        let mut state = GameState::new(Playfield::REFERENCE, Tuning::default(), 1);
        let v = state.ship.velocity;
        apply_input(&mut state, InputAction::Lift);
        assert_eq!(state.ship.velocity, v);
        state.phase = GamePhase::Running;
        apply_input(&mut state, InputAction::Lift);
        assert!(state.ship.velocity < 0.0);
    }

    #[test]
    fn flying_into_a_wall_ends_the_run() {
        let mut state = quiet();
        let mut obstacle = state.roll_obstacle();
        obstacle.x = 80.0;
        obstacle.gap.top = 400.0;
        obstacle.gap.bottom = 600.0;
        state.obstacles.push(obstacle);
        tick(&mut state, 1.0);
        assert_eq!(state.phase, GamePhase::GameOver);
        let events = state.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::GameOver {
                cause: GameOverCause::Wall,
                ..
            }
        )));
    }

    #[test]
    fn enemy_bullet_ends_the_run() {
        let mut state = quiet();
        let mut obstacle = state.roll_obstacle();
        obstacle.has_gun = false;
        obstacle.enemy_bullets.push(EnemyBullet {
            pos: Vec2::new(80.0, 300.0),
        });
        state.obstacles.push(obstacle);
        tick(&mut state, 1.0);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn pass_awards_once() {
        let mut state = quiet();
        for _ in 0..50 {
            state.ledger.use_ammo();
        }
        let mut obstacle = state.roll_obstacle();
        obstacle.x = 10.0;
        state.obstacles.push(obstacle);
        tick(&mut state, 1.0);
        assert_eq!(state.ledger.ammo(), 70);
        for _ in 0..5 {
            tick(&mut state, 1.0);
        }
        assert_eq!(state.ledger.ammo(), 70);
    }

    #[test]
    fn fifth_hit_destroys_and_scores() {
        let mut state = quiet();
        let mut obstacle = state.roll_obstacle();
        obstacle.x = 300.0;
        obstacle.gap.top = 200.0;
        obstacle.gap.bottom = 400.0;
        let id = obstacle.id;
        state.obstacles.push(obstacle);
        for _ in 0..4 {
            state.ledger.record_hit(id);
        }

        let mut bullet = Bullet::from_ship(&state.ship, &state.field, &state.tuning);
        bullet.pos = Vec2::new(296.0, 100.0);
        state.bullets.push(bullet);
        tick(&mut state, 1.0);

        assert!(state.bullets.is_empty());
        assert_eq!(state.ledger.hits(id), 5);
        assert!(state.obstacles[0].is_destroying());
        assert_eq!(state.ledger.score(), 1);
    }

    #[test]
    fn destroyed_obstacle_is_removed_after_animation() {
        let mut state = quiet();
        let mut obstacle = state.roll_obstacle();
        obstacle.x = 300.0;
        obstacle.start_destruction();
        state.obstacles.push(obstacle);
        for _ in 0..9 {
            tick(&mut state, 1.0);
        }
        assert_eq!(state.obstacles.len(), 1);
        tick(&mut state, 1.0);
        tick(&mut state, 1.0);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn bullet_through_gap_flies_off() {
        let mut state = quiet();
        let mut obstacle = state.roll_obstacle();
        obstacle.x = 300.0;
        obstacle.gap.top = 200.0;
        obstacle.gap.bottom = 400.0;
        state.obstacles.push(obstacle);
        assert!(fire(&mut state));
        assert_eq!(state.ledger.ammo(), 99);
        for _ in 0..100 {
            tick(&mut state, 1.0);
        }
        assert!(state.bullets.is_empty());
        assert_eq!(state.ledger.hits(state.obstacles[0].id), 0);
    }

    #[test]
    fn fire_stops_when_empty() {
        let mut state = quiet();
        let mut fired = 0;
        for _ in 0..150 {
            if fire(&mut state) {
                fired += 1;
            }
        }
        assert_eq!(fired, 100);
        assert_eq!(state.ledger.ammo(), 0);
    }

    #[test]
    fn falling_out_of_the_bottom_ends_the_run() {
        let mut state = running(3);
        state.ship.pos.y = 571.0;
        state.ship.velocity = 0.0;
        tick(&mut state, 1.0);
        assert_eq!(state.phase, GamePhase::GameOver);
        // Frozen afterward
        let frame = state.frame_count;
        tick(&mut state, 1.0);
        assert_eq!(state.frame_count, frame);
    }

    #[test]
    fn test_determinism() {
        let mut a = running(99999);
        let mut b = running(99999);
        for frame in 0..400 {
            if frame % 20 == 0 {
                apply_input(&mut a, InputAction::Lift);
                apply_input(&mut b, InputAction::Lift);
            }
            if frame % 6 == 0 {
                fire(&mut a);
                fire(&mut b);
            }
            tick(&mut a, 1.0);
            tick(&mut b, 1.0);
        }
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.frame_count, b.frame_count);
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        assert_eq!(a.ship.pos, b.ship.pos);
        assert_eq!(a.ledger.ammo(), b.ledger.ammo());
    }

    proptest! {
        #[test]
        fn ammo_and_hits_stay_bounded(
            seed in any::<u64>(),
            lifts in prop::collection::vec(any::<bool>(), 300),
            fires in prop::collection::vec(0u8..3, 300),
            delta in 0.5f32..3.0,
        ) {
            let mut state = running(seed);
            for (lift, shots) in lifts.into_iter().zip(fires) {
                if lift {
                    apply_input(&mut state, InputAction::Lift);
                }
                for _ in 0..shots {
                    fire(&mut state);
                }
                tick(&mut state, delta);
                prop_assert!(state.ledger.ammo() <= state.ledger.ammo_max());
                for o in &state.obstacles {
                    prop_assert!(state.ledger.hits(o.id) <= 5);
                }
                if state.phase == GamePhase::GameOver {
                    break;
                }
            }
        }

        #[test]
        fn destruction_fires_once_per_obstacle(seed in any::<u64>()) {
            let mut state = running(seed);
            state.ship.gravity = 0.0;
            state.ship.velocity = 0.0;
            let mut destroyed = Vec::new();
            for frame in 0..600u32 {
                if frame % 3 == 0 {
                    fire(&mut state);
                }
                tick(&mut state, 1.0);
                for event in state.drain_events() {
                    if let GameEvent::ObstacleDestroyed { id } = event {
                        prop_assert!(!destroyed.contains(&id));
                        destroyed.push(id);
                    }
                }
                if state.phase == GamePhase::GameOver {
                    break;
                }
            }
            prop_assert_eq!(state.ledger.score() as usize, destroyed.len());
        }
    }
}
