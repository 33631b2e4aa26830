//! Scene assembly: simulation state in, triangle list out
//!
//! The scene only reads gameplay state. Its own fields are purely cosmetic
//! animation (goal pulse, polarity glow fade).

use std::f32::consts::TAU;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::settings::Settings;
use crate::sim::{Polarity, SimState};

/// Goal pulse phase advance per frame
const GOAL_GLOW_SPEED: f32 = 0.05;
/// Fraction of the remaining gap the magnet glow closes per frame
const GLOW_BLEND: f32 = 0.1;
/// Wave stroke opacity
const WAVE_ALPHA: f32 = 0.25;
const WAVE_WIDTH: f32 = 2.0;
const PARTICLE_SEGMENTS: u32 = 8;

pub struct Scene {
    glow_color: [f32; 4],
    goal_glow_phase: f32,
    segments: u32,
    show_waves: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl Scene {
    pub fn new(settings: &Settings) -> Self {
        Self {
            glow_color: colors::with_alpha(colors::GLOW_NORTH, 0.7),
            goal_glow_phase: 0.0,
            segments: settings.quality.circle_segments(),
            show_waves: settings.waves,
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.segments = settings.quality.circle_segments();
        self.show_waves = settings.waves;
    }

    /// Current goal fill opacity (0.15 - 0.45)
    pub fn goal_alpha(&self) -> f32 {
        0.3 + 0.15 * (self.goal_glow_phase * TAU).sin()
    }

    /// Build this frame's geometry, back to front
    pub fn build(&mut self, sim: &SimState) -> Vec<Vertex> {
        self.goal_glow_phase += GOAL_GLOW_SPEED;
        let target = match sim.magnet.polarity {
            Polarity::North => colors::GLOW_NORTH,
            Polarity::South => colors::GLOW_SOUTH,
        };
        self.glow_color = colors::blend(self.glow_color, target, GLOW_BLEND);

        let mut vertices = Vec::new();
        if self.show_waves {
            self.push_waves(sim, &mut vertices);
        }
        self.push_goal(sim, &mut vertices);
        self.push_metal(sim, &mut vertices);
        self.push_magnet(sim, &mut vertices);
        self.push_particles(sim, &mut vertices);
        vertices
    }

    fn push_waves(&self, sim: &SimState, out: &mut Vec<Vertex>) {
        for wave in &sim.waves.waves {
            let points = wave.sample(sim.field.width, sim.field.height);
            let color = colors::with_alpha(wave.color, WAVE_ALPHA);
            out.extend(shapes::polyline(&points, WAVE_WIDTH, color));
        }
    }

    fn push_goal(&self, sim: &SimState, out: &mut Vec<Vertex>) {
        let goal = &sim.goal;
        let alpha = self.goal_alpha();
        out.extend(shapes::ring_gradient(
            goal.pos,
            goal.radius,
            goal.radius + 20.0,
            colors::with_alpha(colors::GOAL_FILL, alpha),
            colors::with_alpha(colors::GOAL_FILL, 0.0),
            self.segments,
        ));
        out.extend(shapes::circle(
            goal.pos,
            goal.radius,
            colors::with_alpha(colors::GOAL_FILL, alpha),
            self.segments,
        ));
        out.extend(shapes::ring(
            goal.pos,
            goal.radius - 2.0,
            goal.radius + 2.0,
            colors::GOAL_RIM,
            self.segments,
        ));
    }

    fn push_metal(&self, sim: &SimState, out: &mut Vec<Vertex>) {
        let mover = &sim.mover;
        out.extend(shapes::ring_gradient(
            mover.pos,
            mover.radius,
            mover.radius + 6.0,
            colors::METAL_SHADOW,
            colors::with_alpha(colors::METAL_SHADOW, 0.0),
            self.segments,
        ));
        out.extend(shapes::circle(mover.pos, mover.radius, colors::METAL, self.segments));
    }

    fn push_magnet(&self, sim: &SimState, out: &mut Vec<Vertex>) {
        let magnet = &sim.magnet;
        let body = match magnet.polarity {
            Polarity::North => colors::MAGNET_NORTH,
            Polarity::South => colors::MAGNET_SOUTH,
        };
        out.extend(shapes::ring_gradient(
            magnet.pos,
            magnet.radius,
            magnet.radius + 30.0,
            self.glow_color,
            colors::with_alpha(self.glow_color, 0.0),
            self.segments,
        ));
        out.extend(shapes::circle(magnet.pos, magnet.radius, body, self.segments));
    }

    fn push_particles(&self, sim: &SimState, out: &mut Vec<Vertex>) {
        for particle in sim.particles.iter() {
            out.extend(shapes::circle(
                particle.pos,
                particle.size,
                particle.color,
                PARTICLE_SEGMENTS,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_build_does_not_touch_gameplay() {
        let mut sim = SimState::new(800.0, 600.0, 3);
        sim.mover.vel = Vec2::new(1.0, 2.0);
        let before = (sim.mover.pos, sim.mover.vel, sim.magnet.pos);
        let mut scene = Scene::default();
        let vertices = scene.build(&sim);
        assert!(!vertices.is_empty());
        assert_eq!(before, (sim.mover.pos, sim.mover.vel, sim.magnet.pos));
    }

    #[test]
    fn test_waves_toggle() {
        let sim = SimState::new(800.0, 600.0, 3);
        let mut with_waves = Scene::default();
        let mut without = Scene::new(&Settings {
            waves: false,
            ..Default::default()
        });
        assert!(with_waves.build(&sim).len() > without.build(&sim).len());
    }

    #[test]
    fn test_glow_fades_toward_polarity() {
        let mut sim = SimState::new(800.0, 600.0, 3);
        sim.magnet.polarity = Polarity::South;
        let mut scene = Scene::default();
        for _ in 0..100 {
            scene.build(&sim);
        }
        let diff = (scene.glow_color[2] - colors::GLOW_SOUTH[2]).abs();
        assert!(diff < 1e-3);
    }

    #[test]
    fn test_goal_alpha_in_range() {
        let sim = SimState::new(800.0, 600.0, 3);
        let mut scene = Scene::default();
        for _ in 0..50 {
            scene.build(&sim);
            let a = scene.goal_alpha();
            assert!((0.15 - 1e-4..=0.45 + 1e-4).contains(&a));
        }
    }
}
