//! Magnetic force model
//!
//! Pure functions: given the magnet, the mover and the active tier profile,
//! produce the force to add to the mover's velocity this tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Magnet size category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tier {
    #[default]
    Small,
    Medium,
    Large,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Small => "small",
            Tier::Medium => "medium",
            Tier::Large => "large",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "small" => Some(Tier::Small),
            "medium" | "med" => Some(Tier::Medium),
            "large" => Some(Tier::Large),
            _ => None,
        }
    }

    /// Tuning for this tier
    pub fn profile(&self) -> StrengthProfile {
        match self {
            Tier::Small => StrengthProfile {
                strength: 150.0,
                strength_multiplier: 0.5,
                display_size: 25.0,
                effective_range: 180.0,
                min_safe_distance: 55.0,
            },
            Tier::Medium => StrengthProfile {
                strength: 400.0,
                strength_multiplier: 0.8,
                display_size: 30.0,
                effective_range: 230.0,
                min_safe_distance: 40.0,
            },
            Tier::Large => StrengthProfile {
                strength: 960.0,
                strength_multiplier: 1.2,
                display_size: 40.0,
                effective_range: 300.0,
                min_safe_distance: 30.0,
            },
        }
    }
}

/// Per-tier magnet tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrengthProfile {
    /// Base pull strength
    pub strength: f32,
    pub strength_multiplier: f32,
    /// Magnet radius in pixels
    pub display_size: f32,
    /// No force at or beyond this distance
    pub effective_range: f32,
    /// Power curve is zero inside this distance
    pub min_safe_distance: f32,
}

/// Force drop-off curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Falloff {
    /// `strength * multiplier * gain / max(d, 60)`
    #[default]
    Linear,
    /// `strength * max(0, (d - min_safe) / d) * d^-0.55`
    Power,
}

impl Falloff {
    pub fn as_str(&self) -> &'static str {
        match self {
            Falloff::Linear => "linear",
            Falloff::Power => "power",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "linear" => Some(Falloff::Linear),
            "power" => Some(Falloff::Power),
            _ => None,
        }
    }
}

/// Result of a force query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attraction {
    /// Force to add to the mover velocity
    pub force: Vec2,
    /// Mover is inside the magnet's effective range
    pub in_range: bool,
}

impl Attraction {
    pub const NONE: Attraction = Attraction {
        force: Vec2::ZERO,
        in_range: false,
    };
}

/// Magnitude of the pull at `distance` (before polarity)
pub fn force_magnitude(distance: f32, profile: &StrengthProfile, falloff: Falloff) -> f32 {
    let distance = distance.max(DISTANCE_EPSILON);
    match falloff {
        Falloff::Linear => {
            profile.strength * profile.strength_multiplier * LINEAR_FORCE_GAIN
                / distance.max(LINEAR_DISTANCE_FLOOR)
        }
        Falloff::Power => {
            let soften = ((distance - profile.min_safe_distance) / distance).max(0.0);
            profile.strength * soften * distance.powf(-POWER_FALLOFF_EXPONENT)
        }
    }
}

/// Force the magnet exerts on a mover at `mover_pos`
///
/// Positive polarity pulls the mover toward the magnet, negative pushes it away.
pub fn compute_attraction(
    magnet_pos: Vec2,
    polarity: f32,
    mover_pos: Vec2,
    profile: &StrengthProfile,
    falloff: Falloff,
) -> Attraction {
    let offset = magnet_pos - mover_pos;
    let distance = offset.length().max(DISTANCE_EPSILON);

    if distance >= profile.effective_range {
        return Attraction::NONE;
    }

    let magnitude = force_magnitude(distance, profile, falloff);
    let direction = offset / distance;

    Attraction {
        force: direction * magnitude * polarity,
        in_range: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges_grow_with_tier() {
        let small = Tier::Small.profile();
        let medium = Tier::Medium.profile();
        let large = Tier::Large.profile();
        assert!(small.effective_range < medium.effective_range);
        assert!(medium.effective_range < large.effective_range);
        assert!(small.display_size < large.display_size);
    }

    #[test]
    fn test_zero_at_range_boundary() {
        let profile = Tier::Small.profile();
        let a = compute_attraction(
            Vec2::new(120.0, 300.0),
            1.0,
            Vec2::new(300.0, 300.0),
            &profile,
            Falloff::Linear,
        );
        assert!(!a.in_range);
        assert_eq!(a.force, Vec2::ZERO);
    }

    #[test]
    fn test_pulls_toward_magnet_in_range() {
        let profile = Tier::Small.profile();
        let a = compute_attraction(
            Vec2::new(200.0, 300.0),
            1.0,
            Vec2::new(300.0, 300.0),
            &profile,
            Falloff::Linear,
        );
        assert!(a.in_range);
        assert!(a.force.x < 0.0, "mover is right of magnet, pull is leftward");
        assert!(a.force.y.abs() < 1e-6);
    }

    #[test]
    fn test_polarity_inverts_force() {
        let profile = Tier::Medium.profile();
        let magnet = Vec2::new(100.0, 100.0);
        let mover = Vec2::new(160.0, 180.0);
        let pull = compute_attraction(magnet, 1.0, mover, &profile, Falloff::Linear);
        let push = compute_attraction(magnet, -1.0, mover, &profile, Falloff::Linear);
        assert!((pull.force + push.force).length() < 1e-6);
        assert!(pull.force.length() > 0.0);
    }

    #[test]
    fn test_coincident_centers_are_finite() {
        let profile = Tier::Large.profile();
        for falloff in [Falloff::Linear, Falloff::Power] {
            let p = Vec2::new(50.0, 50.0);
            let a = compute_attraction(p, 1.0, p, &profile, falloff);
            assert!(a.in_range);
            assert!(a.force.is_finite());
        }
    }

    #[test]
    fn test_linear_capped_at_fixed_floor() {
        let small = Tier::Small.profile();
        let inside = force_magnitude(10.0, &small, Falloff::Linear);
        let at_floor = force_magnitude(LINEAR_DISTANCE_FLOOR, &small, Falloff::Linear);
        assert!(inside > 0.0);
        assert!((inside - at_floor).abs() < 1e-6, "pull is capped below the floor");
        // 150 * 0.5 * 0.06 / 60
        assert!((at_floor - 0.075).abs() < 1e-6);

        // Same floor for every tier, regardless of min safe distance
        let large = Tier::Large.profile();
        let close = force_magnitude(50.0, &large, Falloff::Linear);
        assert!((close - 960.0 * 1.2 * 0.06 / 60.0).abs() < 1e-4);
    }

    #[test]
    fn test_power_softens_near_magnet() {
        let profile = Tier::Small.profile();
        assert_eq!(force_magnitude(30.0, &profile, Falloff::Power), 0.0);
        assert!(force_magnitude(100.0, &profile, Falloff::Power) > 0.0);
    }

    #[test]
    fn test_tier_from_str() {
        assert_eq!(Tier::from_str("LARGE"), Some(Tier::Large));
        assert_eq!(Tier::from_str("med"), Some(Tier::Medium));
        assert_eq!(Tier::from_str("huge"), None);
    }

    #[test]
    fn test_falloff_str_round_trip() {
        for falloff in [Falloff::Linear, Falloff::Power] {
            assert_eq!(Falloff::from_str(falloff.as_str()), Some(falloff));
        }
        assert_eq!(Falloff::from_str("cubic"), None);
    }
}
