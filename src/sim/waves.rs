//! Background "field line" waves
//!
//! Purely decorative sinusoids drifting across the playfield.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of waves in the field
pub const WAVE_COUNT: usize = 6;
/// Vertical spacing between wave baselines
pub const WAVE_SPACING: f32 = 60.0;
/// Horizontal sampling step for the polyline (px)
pub const SAMPLE_STEP: f32 = 10.0;

/// Light blues (#81d4fa, #4fc3f7, #b3e5fc)
const WAVE_COLORS: [[f32; 4]; 3] = [
    [0.506, 0.831, 0.980, 1.0],
    [0.310, 0.765, 0.969, 1.0],
    [0.702, 0.898, 0.988, 1.0],
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wave {
    /// Baseline offset from mid-height
    pub y_offset: f32,
    pub amplitude: f32,
    pub wavelength: f32,
    /// Phase advance per tick
    pub speed: f32,
    pub phase: f32,
    pub color: [f32; 4],
}

impl Wave {
    pub fn update(&mut self) {
        self.phase += self.speed;
    }

    /// Height of the wave at horizontal position `x`
    pub fn y_at(&self, x: f32, height: f32) -> f32 {
        height / 2.0 + self.y_offset + ((x / self.wavelength) + self.phase).sin() * self.amplitude
    }

    /// Polyline across the full width, one point every `SAMPLE_STEP` px
    pub fn sample(&self, width: f32, height: f32) -> Vec<Vec2> {
        let steps = (width / SAMPLE_STEP).floor().max(0.0) as usize;
        (0..=steps)
            .map(|i| {
                let x = i as f32 * SAMPLE_STEP;
                Vec2::new(x, self.y_at(x, height))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveField {
    pub waves: Vec<Wave>,
}

impl WaveField {
    /// Roll a fresh set of waves
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let waves = (0..WAVE_COUNT)
            .map(|i| Wave {
                y_offset: (i as f32 - 3.0) * WAVE_SPACING,
                amplitude: 25.0 + rng.random::<f32>() * 15.0,
                wavelength: 200.0 + rng.random::<f32>() * 150.0,
                speed: 0.02 + rng.random::<f32>() * 0.02,
                phase: 0.0,
                color: WAVE_COLORS[i % WAVE_COLORS.len()],
            })
            .collect();
        Self { waves }
    }

    pub fn advance(&mut self) {
        for wave in &mut self.waves {
            wave.update();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_generate_ranges() {
        let mut rng = Pcg32::seed_from_u64(42);
        let field = WaveField::generate(&mut rng);
        assert_eq!(field.waves.len(), WAVE_COUNT);
        for (i, w) in field.waves.iter().enumerate() {
            assert_eq!(w.y_offset, (i as f32 - 3.0) * 60.0);
            assert!((25.0..=40.0).contains(&w.amplitude));
            assert!((200.0..=350.0).contains(&w.wavelength));
            assert!((0.02..=0.04).contains(&w.speed));
            assert_eq!(w.phase, 0.0);
        }
    }

    #[test]
    fn test_phase_advances_by_speed() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut field = WaveField::generate(&mut rng);
        let speeds: Vec<f32> = field.waves.iter().map(|w| w.speed).collect();
        field.advance();
        field.advance();
        for (w, s) in field.waves.iter().zip(speeds) {
            assert!((w.phase - 2.0 * s).abs() < 1e-6);
        }
    }

    #[test]
    fn test_sample_spans_width() {
        let wave = Wave {
            y_offset: 0.0,
            amplitude: 30.0,
            wavelength: 250.0,
            speed: 0.03,
            phase: 0.0,
            color: WAVE_COLORS[0],
        };
        let points = wave.sample(800.0, 600.0);
        assert_eq!(points.len(), 81);
        assert_eq!(points[0], Vec2::new(0.0, 300.0));
        assert_eq!(points.last().map(|p| p.x), Some(800.0));
        assert!(points.iter().all(|p| (p.y - 300.0).abs() <= 30.0 + 1e-3));
    }
}
