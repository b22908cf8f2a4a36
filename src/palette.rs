//! Agent display colors
//!
//! Colors are purely cosmetic. The simulation never reads them.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// RGBA color, each channel in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Translucent red
    pub const RED: Color = Color::new(0.8, 0.1, 0.1, 0.8);
    /// Translucent blue
    pub const BLUE: Color = Color::new(0.1, 0.1, 0.8, 0.8);
    /// Translucent green
    pub const GREEN: Color = Color::new(0.1, 0.8, 0.1, 0.8);
    /// Opaque blue used by the default roster
    pub const SOLID_BLUE: Color = Color::new(0.1, 0.1, 0.8, 1.0);
    /// Opaque green used by the default roster
    pub const SOLID_GREEN: Color = Color::new(0.1, 0.8, 0.1, 1.0);

    /// Components as `[r, g, b, a]` for uniform upload
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// True if every channel lies within 0.0..=1.0
    pub fn is_valid(&self) -> bool {
        self.to_array().iter().all(|c| (0.0..=1.0).contains(c))
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::SOLID_GREEN
    }
}

/// Probability that a standard normal draw exceeds 0.5
pub const NORMAL_TAIL_ABOVE_HALF: f64 = 0.308_537_538_725_986_9;

/// Weighted draw between two palette colors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorMix {
    pub primary: Color,
    pub secondary: Color,
    /// Chance (0.0..=1.0) of picking `secondary`
    pub secondary_weight: f64,
}

impl Default for ColorMix {
    fn default() -> Self {
        Self {
            primary: Color::SOLID_GREEN,
            secondary: Color::SOLID_BLUE,
            secondary_weight: NORMAL_TAIL_ABOVE_HALF,
        }
    }
}

impl ColorMix {
    /// A mix that always yields `color`
    pub fn solid(color: Color) -> Self {
        Self {
            primary: color,
            secondary: color,
            secondary_weight: 0.0,
        }
    }

    /// Both colors in range and a weight within 0.0..=1.0
    pub fn is_valid(&self) -> bool {
        self.primary.is_valid()
            && self.secondary.is_valid()
            && (0.0..=1.0).contains(&self.secondary_weight)
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        let p = if self.secondary_weight.is_nan() {
            0.0
        } else {
            self.secondary_weight.clamp(0.0, 1.0)
        };
        if rng.random_bool(p) {
            self.secondary
        } else {
            self.primary
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_palette_colors_valid() {
        for c in [
            Color::RED,
            Color::BLUE,
            Color::GREEN,
            Color::SOLID_BLUE,
            Color::SOLID_GREEN,
        ] {
            assert!(c.is_valid());
        }
        assert!(!Color::new(1.5, 0.0, 0.0, 1.0).is_valid());
    }

    #[test]
    fn test_mix_validity() {
        assert!(ColorMix::default().is_valid());
        assert!(ColorMix::solid(Color::RED).is_valid());

        let bad_color = ColorMix {
            secondary: Color::new(0.1, 0.1, 5.0, 1.0),
            ..ColorMix::default()
        };
        assert!(!bad_color.is_valid());

        let bad_weight = ColorMix {
            secondary_weight: f64::NAN,
            ..ColorMix::default()
        };
        assert!(!bad_weight.is_valid());
    }

    #[test]
    fn test_solid_mix_always_primary() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mix = ColorMix::solid(Color::RED);
        assert!((0..100).all(|_| mix.pick(&mut rng) == Color::RED));
    }

    #[test]
    fn test_default_mix_ratio() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mix = ColorMix::default();
        let draws = 20_000;
        let blue = (0..draws)
            .filter(|_| mix.pick(&mut rng) == Color::SOLID_BLUE)
            .count();
        let ratio = blue as f64 / draws as f64;
        assert!((ratio - NORMAL_TAIL_ABOVE_HALF).abs() < 0.02, "ratio {ratio}");
    }

    #[test]
    fn test_out_of_range_weight_is_clamped() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mix = ColorMix {
            secondary_weight: 3.0,
            ..ColorMix::default()
        };
        assert_eq!(mix.pick(&mut rng), Color::SOLID_BLUE);
    }
}
