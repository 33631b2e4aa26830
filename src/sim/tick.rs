//! Per-frame simulation tick
//!
//! One call advances the world by one display frame. Ordering within a tick:
//! magnet follow, force, damping, integration, clamping, wall bounce,
//! decoration, goal test.

use glam::Vec2;
use rand::Rng;

use super::force::compute_attraction;
use super::particles::PULL_SPARK_COLOR;
use super::state::SimState;
use crate::consts::*;

/// Pointer state sampled for one tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest pointer position; `None` means no pointer data this frame
    pub pointer: Option<Vec2>,
    /// Pointer button / touch held
    pub pointer_down: bool,
}

/// What happened during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Mover was inside the magnet's range (drives the hum cue)
    pub in_range: bool,
    /// Mover touched a wall
    pub wall_hit: bool,
    /// Mover is fully inside the goal
    pub goal_reached: bool,
}

/// Advance the simulation by one frame
pub fn tick(state: &mut SimState, input: &TickInput) -> TickOutcome {
    if let Some(pointer) = input.pointer {
        state.pointer = pointer;
    }
    if input.pointer_down {
        let target = state.pointer;
        state.magnet.follow(target);
    }

    let attraction = compute_attraction(
        state.magnet.pos,
        state.magnet.polarity.sign(),
        state.mover.pos,
        &state.magnet.profile,
        state.falloff,
    );
    state.mover.vel += attraction.force;

    if attraction.in_range && state.rng.random_bool(PULL_SPARK_CHANCE) {
        let pos = state.mover.pos;
        state.particles.spawn(&mut state.rng, pos, PULL_SPARK_COLOR, 3.0, 25);
    }

    state.mover.integrate();
    state.magnet.pos = state.field.clamp_circle(state.magnet.pos, state.magnet.radius);
    let wall_hit = state.mover.bounce(&state.field);

    state.particles.advance();
    state.waves.advance();

    TickOutcome {
        in_range: attraction.in_range,
        wall_hit,
        goal_reached: state.goal.contains(&state.mover),
    }
}

/// Goal payoff: confetti at the goal and everything back to the start
pub fn celebrate_goal(state: &mut SimState) {
    let goal = state.goal.pos;
    state
        .particles
        .burst(&mut state.rng, goal, WIN_BURST_COUNT, 4.0, 40);
    state.reset_positions();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Polarity;

    #[test]
    fn test_magnet_follows_only_when_held() {
        let mut state = SimState::new(1000.0, 600.0, 1);
        let start = state.magnet.pos;
        let input = TickInput {
            pointer: Some(Vec2::new(220.0, 300.0)),
            pointer_down: false,
        };
        tick(&mut state, &input);
        assert_eq!(state.magnet.pos, start);
        assert_eq!(state.pointer, Vec2::new(220.0, 300.0));

        let input = TickInput {
            pointer: None,
            pointer_down: true,
        };
        tick(&mut state, &input);
        assert!((state.magnet.pos.x - 140.0).abs() < 1e-4);
    }

    #[test]
    fn test_no_force_at_spawn_distance() {
        let mut state = SimState::new(1000.0, 600.0, 1);
        let outcome = tick(&mut state, &TickInput::default());
        assert!(!outcome.in_range);
        assert_eq!(state.mover.vel, Vec2::ZERO);
        assert_eq!(state.mover.pos, Vec2::new(300.0, 300.0));
    }

    #[test]
    fn test_pull_moves_mover_toward_magnet() {
        let mut state = SimState::new(1000.0, 600.0, 1);
        state.magnet.pos = Vec2::new(200.0, 300.0);
        let outcome = tick(&mut state, &TickInput::default());
        assert!(outcome.in_range);
        assert!(state.mover.vel.x < 0.0);
        assert!(state.mover.pos.x < 300.0);
    }

    #[test]
    fn test_south_pushes_away() {
        let mut state = SimState::new(1000.0, 600.0, 1);
        state.magnet.pos = Vec2::new(200.0, 300.0);
        state.magnet.polarity = Polarity::South;
        tick(&mut state, &TickInput::default());
        assert!(state.mover.vel.x > 0.0);
    }

    #[test]
    fn test_magnet_clamped_inside() {
        let mut state = SimState::new(1000.0, 600.0, 1);
        state.magnet.pos = Vec2::new(-50.0, 900.0);
        tick(&mut state, &TickInput::default());
        let r = state.magnet.radius;
        assert_eq!(state.magnet.pos, Vec2::new(r, 600.0 - r));
    }

    #[test]
    fn test_goal_detected_and_celebrated() {
        let mut state = SimState::new(1000.0, 600.0, 1);
        state.mover.pos = state.goal.pos;
        let outcome = tick(&mut state, &TickInput::default());
        assert!(outcome.goal_reached);

        celebrate_goal(&mut state);
        assert_eq!(state.particles.len(), WIN_BURST_COUNT);
        assert_eq!(state.mover.pos, Vec2::new(300.0, 300.0));
        assert!(!state.goal.contains(&state.mover));
    }

    #[test]
    fn test_wall_hit_reported() {
        let mut state = SimState::new(1000.0, 600.0, 1);
        let outcome = tick(&mut state, &TickInput::default());
        assert!(!outcome.wall_hit);

        state.mover.pos = Vec2::new(990.0, 300.0);
        state.mover.vel = Vec2::new(5.0, 0.0);
        let outcome = tick(&mut state, &TickInput::default());
        assert!(outcome.wall_hit);
        assert_eq!(state.mover.pos.x, 1000.0 - state.mover.radius);
        assert!(state.mover.vel.x < 0.0);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = SimState::new(1000.0, 600.0, 99);
        let mut state2 = SimState::new(1000.0, 600.0, 99);
        let input = TickInput {
            pointer: Some(Vec2::new(280.0, 320.0)),
            pointer_down: true,
        };
        for _ in 0..120 {
            tick(&mut state1, &input);
            tick(&mut state2, &input);
        }
        assert_eq!(state1.mover.pos, state2.mover.pos);
        assert_eq!(state1.particles.len(), state2.particles.len());
    }
}
