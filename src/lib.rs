//! Magnet Quest - drag a magnet, pull the metal puck into the goal
//!
//! Core modules:
//! - `sim`: Physics core (force model, particles, waves, per-frame tick)
//! - `session`: Round lifecycle, countdown timer, scoring
//! - `renderer`: WebGPU rendering pipeline
//! - `history`: In-memory end-of-round score history
//! - `settings`: Player preferences

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod history;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use history::ScoreHistory;
pub use session::{Phase, Session, SessionEvent};
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Round length in seconds
    pub const ROUND_SECONDS: u32 = 60;
    /// Points awarded per goal
    pub const WIN_POINTS: u32 = 100;
    /// How long the TIME'S UP banner stays visible (ms)
    pub const BANNER_DURATION_MS: f64 = 5000.0;

    /// Magnet follows the pointer by this fraction of the gap per tick
    pub const FOLLOW_FACTOR: f32 = 0.2;
    /// Mover velocity multiplier per tick
    pub const VELOCITY_DAMPING: f32 = 0.96;
    /// Velocity multiplier applied on wall contact
    pub const WALL_BOUNCE: f32 = -0.8;
    /// Distance floor so coincident centers never divide by zero
    pub const DISTANCE_EPSILON: f32 = 1.0e-4;
    /// Scale applied to the linear falloff curve
    pub const LINEAR_FORCE_GAIN: f32 = 0.06;
    /// Linear pull stops growing closer than this (px)
    pub const LINEAR_DISTANCE_FLOOR: f32 = 60.0;
    /// Exponent of the power falloff curve
    pub const POWER_FALLOFF_EXPONENT: f32 = 0.55;

    /// Chance per tick of a spark while the magnet is pulling
    pub const PULL_SPARK_CHANCE: f64 = 0.25;
    /// Particles spawned when the puck reaches the goal
    pub const WIN_BURST_COUNT: usize = 60;

    /// Magnet start position (x; y is mid-height)
    pub const MAGNET_START_X: f32 = 120.0;
    /// Mover start position (x; clamped to 40% of the width)
    pub const MOVER_START_X: f32 = 300.0;
}
