//! Per-frame simulation step
//!
//! Systems run in a fixed order each frame: physics, jump, pipe movement,
//! game over.

use glam::Vec2;

use super::collision::circle_overlaps_rect;
use super::state::{GameEvent, GamePhase, World};
use crate::consts::{FRAME_MS, GRAVITY_SCALE};

/// Input snapshot for a single step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepInput {
    /// A press/tap edge arrived since the previous step
    pub jump: bool,
}

impl StepInput {
    pub fn jump() -> Self {
        Self { jump: true }
    }
}

/// Advance the world by one frame of `dt_ms` milliseconds
///
/// Returns the world with the events produced this step. A world that is
/// already over is returned unchanged with no events.
pub fn advance(mut world: World, dt_ms: f32, input: &StepInput) -> (World, Vec<GameEvent>) {
    let mut events = Vec::new();
    if world.is_over() {
        return (world, events);
    }
    world.frames += 1;

    integrate(&mut world, dt_ms);

    if input.jump {
        world.player.vel = Vec2::new(0.0, -world.physics.jump_impulse);
        events.push(GameEvent::Jump);
    }

    move_pipes(&mut world, &mut events);

    if let Some(reason) = check_game_over(&world) {
        log::info!(
            "Game over after {} frames ({reason}), score {}",
            world.frames,
            world.score
        );
        world.phase = GamePhase::GameOver;
        events.push(GameEvent::GameOver { score: world.score });
    }

    (world, events)
}

/// Apply gravity to the bird and move it
fn integrate(world: &mut World, dt_ms: f32) {
    let accel = world.physics.gravity * GRAVITY_SCALE;
    let player = &mut world.player;
    player.vel.y += accel * dt_ms * FRAME_MS;
    player.pos += player.vel * (dt_ms / FRAME_MS);
}

/// Scroll pipes, award points for passed pairs, recycle pairs that left the screen
fn move_pipes(world: &mut World, events: &mut Vec<GameEvent>) {
    let scroll = Vec2::new(-world.physics.scroll_speed, 0.0);
    let player_left = world.player.left();

    for i in 0..world.pipes.len() {
        let pair = &mut world.pipes[i];
        pair.translate(scroll);

        if pair.right() < player_left && !pair.scored() {
            pair.set_scored(true);
            world.score += 1;
            log::debug!("Passed pair {i}, score {}", world.score);
            events.push(GameEvent::Score { score: world.score });
        }

        if world.pipes[i].right() <= 0.0 {
            world.recycle_pair(i);
            log::debug!(
                "Recycled pair {i}, new gap at {:.1}",
                world.pipes[i].gap_top()
            );
        }
    }
}

/// Why the run ended, if it did
fn check_game_over(world: &World) -> Option<&'static str> {
    let player = &world.player;
    if player.bottom() >= world.height {
        return Some("floor");
    }
    if player.top() <= 0.0 {
        return Some("ceiling");
    }
    world
        .pipe_rects()
        .any(|rect| circle_overlaps_rect(player.pos, player.radius, rect))
        .then_some("pipe")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::WorldConfig;
    use proptest::prelude::*;

    fn world(seed: u64) -> World {
        World::with_seed(WorldConfig::new(400.0, 800.0, "bird.png"), seed).unwrap()
    }

    /// Park both pairs far off to the right so they can't interfere
    fn clear_pipes(world: &mut World) {
        for pair in &mut world.pipes {
            pair.translate(Vec2::new(10_000.0, 0.0));
        }
    }

    #[test]
    fn test_gravity_accelerates_downward() {
        let mut w = world(1);
        clear_pipes(&mut w);
        let expected_dv = 0.6 * GRAVITY_SCALE * FRAME_MS * FRAME_MS;

        let mut last_vy = w.player.vel.y;
        let mut last_y = w.player.pos.y;
        for _ in 0..10 {
            let (next, events) = advance(w, FRAME_MS, &StepInput::default());
            w = next;
            assert!(events.is_empty());
            assert!((w.player.vel.y - last_vy - expected_dv).abs() < 1e-5);
            assert!(w.player.pos.y > last_y);
            last_vy = w.player.vel.y;
            last_y = w.player.pos.y;
        }
    }

    #[test]
    fn test_jump_overrides_velocity() {
        for prior in [-20.0, 0.0, 3.5, 40.0] {
            let mut w = world(2);
            clear_pipes(&mut w);
            w.player.vel = Vec2::new(1.0, prior);
            let (w, events) = advance(w, FRAME_MS, &StepInput::jump());
            assert_eq!(w.player.vel, Vec2::new(0.0, -8.0));
            assert_eq!(events, vec![GameEvent::Jump]);
        }
    }

    #[test]
    fn test_pipes_scroll_by_speed() {
        let w = world(3);
        let before: Vec<f32> = w.pipe_rects().map(|r| r.center.x).collect();
        let (w, _) = advance(w, FRAME_MS, &StepInput::default());
        let after: Vec<f32> = w.pipe_rects().map(|r| r.center.x).collect();
        for (b, a) in before.iter().zip(&after) {
            assert!((b - a - 3.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_score_once_per_pair() {
        let mut w = world(4);
        // Keep the bird hovering in its own lane clear of pipes
        w.pipes[1].translate(Vec2::new(10_000.0, 0.0));
        // Put pair 0 where one more scroll crosses the bird's left edge (75)
        let right = w.pipes[0].right();
        w.pipes[0].translate(Vec2::new(76.0 - right, 0.0));
        // Move its gap around the bird so it can't collide
        let gap_shift = w.player.pos.y - (w.pipes[0].gap_top() + 100.0);
        w.pipes[0].translate(Vec2::new(0.0, gap_shift));

        let (mut w, events) = advance(w, FRAME_MS, &StepInput::jump());
        assert_eq!(events, vec![GameEvent::Jump, GameEvent::Score { score: 1 }]);
        assert!(w.pipes[0].top.scored && w.pipes[0].bottom.scored);

        for _ in 0..5 {
            w.player.vel = Vec2::ZERO;
            let (next, events) = advance(w, FRAME_MS, &StepInput::default());
            w = next;
            assert!(events.is_empty());
        }
        assert_eq!(w.score, 1);
    }

    #[test]
    fn test_recycle_when_off_left_edge() {
        let mut w = world(5);
        w.pipes[1].translate(Vec2::new(10_000.0, 0.0));
        let right = w.pipes[0].right();
        w.pipes[0].translate(Vec2::new(2.0 - right, 0.0));
        w.pipes[0].set_scored(true);
        w.score = 1;

        let (w, events) = advance(w, FRAME_MS, &StepInput::default());
        assert!(events.is_empty());
        assert_eq!(w.pipes[0].top.rect.center.x, 400.0);
        assert!(!w.pipes[0].scored());
        assert!(!w.pipes[0].bottom.scored);
        assert_eq!(w.score, 1);
    }

    #[test]
    fn test_recycle_unscored_pair() {
        let mut w = world(6);
        w.pipes[1].translate(Vec2::new(10_000.0, 0.0));
        let right = w.pipes[0].right();
        w.pipes[0].translate(Vec2::new(1.0 - right, 0.0));
        // Bird is far right of the pipe here, so passing it also scores first
        let (w, events) = advance(w, FRAME_MS, &StepInput::default());
        assert_eq!(events, vec![GameEvent::Score { score: 1 }]);
        assert!(!w.pipes[0].scored());
        assert_eq!(w.pipes[0].top.rect.center.x, 400.0);
    }

    #[test]
    fn test_collision_ends_game_once() {
        let mut w = world(7);
        w.pipes[1].translate(Vec2::new(10_000.0, 0.0));
        w.score = 3;
        // Overlap the top pipe just above its gap; gap_top >= 100 keeps the ceiling clear
        let rect = w.pipes[0].top.rect;
        w.player.pos = Vec2::new(rect.center.x, rect.bottom() - 30.0);

        let (w, events) = advance(w, FRAME_MS, &StepInput::default());
        assert_eq!(events, vec![GameEvent::GameOver { score: 3 }]);
        assert_eq!(w.phase, GamePhase::GameOver);

        // Terminal world doesn't move or report anything else
        let frozen = w.player.pos;
        let (w, events) = advance(w, FRAME_MS, &StepInput::jump());
        assert!(events.is_empty());
        assert_eq!(w.player.pos, frozen);
        assert_eq!(w.score, 3);
    }

    #[test]
    fn test_ceiling_ends_game() {
        let mut w = world(8);
        clear_pipes(&mut w);
        w.player.pos.y = 20.0;
        let (w, events) = advance(w, FRAME_MS, &StepInput::jump());
        assert_eq!(events, vec![GameEvent::Jump, GameEvent::GameOver { score: 0 }]);
        assert!(w.is_over());
    }

    #[test]
    fn test_determinism() {
        let run = |seed| {
            let mut w = world(seed);
            let mut log = Vec::new();
            for frame in 0..600 {
                let input = StepInput { jump: frame % 20 == 0 };
                let (next, events) = advance(w, FRAME_MS, &input);
                w = next;
                log.extend(events);
                if w.is_over() {
                    break;
                }
            }
            (w.frames, w.score, w.player.pos, log)
        };
        assert_eq!(run(99), run(99));
    }

    proptest! {
        #[test]
        fn prop_velocity_step_linear_in_dt(dt in 1.0f32..50.0, vy in -10.0f32..10.0) {
            let mut w = world(9);
            clear_pipes(&mut w);
            w.player.vel.y = vy;
            let (w, _) = advance(w, dt, &StepInput::default());
            let expected = vy + 0.6 * GRAVITY_SCALE * dt * FRAME_MS;
            prop_assert!((w.player.vel.y - expected).abs() < 1e-4);
        }

        #[test]
        fn prop_recycled_gap_in_range(seed in any::<u64>(), height in 500.0f32..2000.0) {
            let mut w = World::with_seed(WorldConfig::new(400.0, height, "bird.png"), seed).unwrap();
            let gap = w.physics.gap_size;
            for i in 0..2 {
                w.recycle_pair(i);
                let top = w.pipes[i].gap_top();
                prop_assert!(top >= 100.0 - 1e-3);
                prop_assert!(top <= height - gap - 100.0 + 1e-3);
            }
        }
    }
}
