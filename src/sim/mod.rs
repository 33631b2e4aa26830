//! Physics simulation module
//!
//! All gameplay physics lives here. No rendering or platform dependencies:
//! the shell feeds pointer input in and the renderer reads state out.

pub mod force;
pub mod particles;
pub mod state;
pub mod tick;
pub mod waves;

pub use force::{Attraction, Falloff, StrengthProfile, Tier, compute_attraction, force_magnitude};
pub use particles::{Particle, ParticleSystem};
pub use state::{Goal, Magnet, Mover, Playfield, Polarity, SimState};
pub use tick::{TickInput, TickOutcome, celebrate_goal, tick};
pub use waves::{Wave, WaveField};
