//! Decorative particle bursts
//!
//! Particles never feed back into gameplay. They live for a fixed number of
//! ticks and are kept in spawn order so the renderer draws oldest first.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Spark color while the magnet is pulling (#ffcc00)
pub const PULL_SPARK_COLOR: [f32; 4] = [1.0, 0.8, 0.0, 1.0];

/// Default particle cap when settings don't say otherwise
pub const MAX_PARTICLES: usize = 512;

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: [f32; 4],
    pub size: f32,
    /// Remaining ticks
    pub life: i32,
}

impl Particle {
    fn update(&mut self) {
        self.pos += self.vel;
        self.life -= 1;
    }
}

/// Insertion-ordered, capped particle collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    cap: usize,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::with_cap(MAX_PARTICLES)
    }
}

impl ParticleSystem {
    pub fn with_cap(cap: usize) -> Self {
        Self {
            particles: Vec::new(),
            cap,
        }
    }

    /// Change the cap, dropping the oldest particles if over it
    pub fn set_cap(&mut self, cap: usize) {
        self.cap = cap;
        self.enforce_cap();
    }

    /// Spawn one particle with a random velocity in [-2, 2] on each axis
    pub fn spawn<R: Rng>(&mut self, rng: &mut R, pos: Vec2, color: [f32; 4], size: f32, life: i32) {
        if self.cap == 0 {
            return;
        }
        let vel = Vec2::new(rng.random_range(-2.0..=2.0), rng.random_range(-2.0..=2.0));
        self.particles.push(Particle {
            pos,
            vel,
            color,
            size,
            life,
        });
        self.enforce_cap();
    }

    /// Spawn a celebratory burst of randomly hued particles
    pub fn burst<R: Rng>(&mut self, rng: &mut R, pos: Vec2, count: usize, size: f32, life: i32) {
        for _ in 0..count {
            let hue = rng.random_range(0.0..360.0);
            let color = hsl_to_rgba(hue, 0.8, 0.6);
            self.spawn(rng, pos, color, size, life);
        }
    }

    /// Move every particle and drop the expired ones
    pub fn advance(&mut self) {
        for particle in &mut self.particles {
            particle.update();
        }
        self.particles.retain(|p| p.life > 0);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    fn enforce_cap(&mut self) {
        if self.particles.len() > self.cap {
            let excess = self.particles.len() - self.cap;
            self.particles.drain(..excess);
        }
    }
}

/// HSL (hue in degrees, s/l in 0-1) to opaque RGBA
pub fn hsl_to_rgba(hue: f32, saturation: f32, lightness: f32) -> [f32; 4] {
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let h = hue.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    [r + m, g + m, b + m, 1.0]
}
