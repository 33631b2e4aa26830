//! Simulation state and core entity types
//!
//! Exactly one magnet, one mover and one goal live in a playfield sized to
//! the render surface.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::force::{Falloff, StrengthProfile, Tier};
use super::particles::ParticleSystem;
use super::waves::WaveField;
use crate::consts::*;

/// Magnet polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Polarity {
    /// Attracts the mover
    #[default]
    North,
    /// Repels the mover
    South,
}

impl Polarity {
    /// Sign multiplier applied to the force (+1 attracts, -1 repels)
    pub fn sign(&self) -> f32 {
        match self {
            Polarity::North => 1.0,
            Polarity::South => -1.0,
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            Polarity::North => Polarity::South,
            Polarity::South => Polarity::North,
        }
    }
}

/// Playfield dimensions in surface pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn center_y(&self) -> f32 {
        self.height / 2.0
    }

    /// Clamp a circle's center so the circle stays inside
    pub fn clamp_circle(&self, pos: Vec2, radius: f32) -> Vec2 {
        let max_x = (self.width - radius).max(radius);
        let max_y = (self.height - radius).max(radius);
        Vec2::new(pos.x.clamp(radius, max_x), pos.y.clamp(radius, max_y))
    }
}

/// The player-controlled magnet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Magnet {
    pub pos: Vec2,
    pub radius: f32,
    pub polarity: Polarity,
    pub tier: Tier,
    pub profile: StrengthProfile,
}

impl Magnet {
    pub fn new(pos: Vec2, tier: Tier) -> Self {
        let profile = tier.profile();
        Self {
            pos,
            radius: profile.display_size,
            polarity: Polarity::North,
            tier,
            profile,
        }
    }

    /// Ease toward the pointer (not physically simulated)
    pub fn follow(&mut self, target: Vec2) {
        self.pos += (target - self.pos) * FOLLOW_FACTOR;
    }

    pub fn flip_polarity(&mut self) {
        self.polarity = self.polarity.flipped();
    }

    /// Swap size tier; radius and pull change together
    pub fn set_tier(&mut self, tier: Tier) {
        self.tier = tier;
        self.profile = tier.profile();
        self.radius = self.profile.display_size;
    }
}

/// The metal puck the player steers into the goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mover {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Mover {
    /// Damp and integrate one tick
    pub fn integrate(&mut self) {
        self.vel *= VELOCITY_DAMPING;
        self.pos += self.vel;
    }

    /// Reflect off the playfield walls. Returns true if any wall was hit.
    pub fn bounce(&mut self, field: &Playfield) -> bool {
        let mut hit = false;
        if self.pos.x - self.radius < 0.0 {
            self.pos.x = self.radius;
            self.vel.x *= WALL_BOUNCE;
            hit = true;
        }
        if self.pos.x + self.radius > field.width {
            self.pos.x = field.width - self.radius;
            self.vel.x *= WALL_BOUNCE;
            hit = true;
        }
        if self.pos.y - self.radius < 0.0 {
            self.pos.y = self.radius;
            self.vel.y *= WALL_BOUNCE;
            hit = true;
        }
        if self.pos.y + self.radius > field.height {
            self.pos.y = field.height - self.radius;
            self.vel.y *= WALL_BOUNCE;
            hit = true;
        }
        hit
    }
}

/// Target zone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub pos: Vec2,
    pub radius: f32,
}

impl Goal {
    /// Mover sits entirely inside the goal
    pub fn contains(&self, mover: &Mover) -> bool {
        self.pos.distance(mover.pos) < self.radius - mover.radius
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimState {
    pub field: Playfield,
    pub magnet: Magnet,
    pub mover: Mover,
    pub goal: Goal,
    /// Last known pointer position (surface-local)
    pub pointer: Vec2,
    pub falloff: Falloff,
    /// Visual particles (not gameplay-affecting)
    pub particles: ParticleSystem,
    pub waves: WaveField,
    pub(crate) rng: Pcg32,
}

impl SimState {
    /// Lay out a fresh playfield
    pub fn new(width: f32, height: f32, seed: u64) -> Self {
        let field = Playfield::new(width, height);
        let mut rng = Pcg32::seed_from_u64(seed);
        let waves = WaveField::generate(&mut rng);
        let magnet = Magnet::new(Vec2::new(MAGNET_START_X, field.center_y()), Tier::default());

        let mut state = Self {
            field,
            pointer: magnet.pos,
            magnet,
            mover: layout_mover(&field),
            goal: layout_goal(&field),
            falloff: Falloff::default(),
            particles: ParticleSystem::default(),
            waves,
            rng,
        };
        state.magnet.pos = field.clamp_circle(state.magnet.pos, state.magnet.radius);
        state
    }

    /// Re-layout for a new surface size
    ///
    /// The magnet keeps its position (clamped); mover and goal are placed
    /// fresh and the wave field is re-rolled.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.field = Playfield::new(width, height);
        self.magnet.pos = self.field.clamp_circle(self.magnet.pos, self.magnet.radius);
        self.mover = layout_mover(&self.field);
        self.goal = layout_goal(&self.field);
        self.pointer = self.magnet.pos;
        self.waves = WaveField::generate(&mut self.rng);
        log::debug!("Playfield resized to {}x{}", self.field.width, self.field.height);
    }

    /// Put magnet and mover back at their start positions
    pub fn reset_positions(&mut self) {
        self.magnet.pos = self
            .field
            .clamp_circle(Vec2::new(MAGNET_START_X, self.field.center_y()), self.magnet.radius);
        self.magnet.polarity = Polarity::North;
        self.mover.pos = mover_start(&self.field);
        self.mover.vel = Vec2::ZERO;
        self.pointer = self.magnet.pos;
    }

    pub fn set_tier(&mut self, tier: Tier) {
        self.magnet.set_tier(tier);
    }
}

fn mover_start(field: &Playfield) -> Vec2 {
    Vec2::new(MOVER_START_X.min(field.width * 0.4), field.center_y())
}

fn layout_mover(field: &Playfield) -> Mover {
    Mover {
        pos: mover_start(field),
        vel: Vec2::ZERO,
        radius: (field.height * 0.04).max(8.0),
    }
}

fn layout_goal(field: &Playfield) -> Goal {
    Goal {
        pos: Vec2::new(field.width - (field.width * 0.12).min(150.0), field.center_y()),
        radius: (field.height * 0.06).max(12.0),
    }
}
