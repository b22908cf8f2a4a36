//! Goids - a 2D flocking simulation core
//!
//! Core modules:
//! - `sim`: Deterministic flock simulation (agents, steering, world tick)
//! - `palette`: Agent display colors
//! - `settings`: Data-driven roster and steering configuration
//!
//! Rendering is not part of this crate. A renderer calls [`sim::World::step`]
//! once per frame and reads [`sim::FlockSnapshot`] or the agent accessors.

pub mod palette;
pub mod settings;
pub mod sim;

pub use palette::{Color, ColorMix};
pub use settings::{RosterPreset, Settings, SettingsError};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Cap on the cohesion steering magnitude per tick
    pub const MAX_FORCE: f32 = 0.0001;
    /// Largest position or velocity component a world accepts.
    ///
    /// Positions need on the order of 1e20 ticks at this speed to overflow;
    /// steering whose squared length overflows first degrades to zero.
    pub const MAX_MAGNITUDE: f32 = 1e18;

    /// Largest elapsed time a single step will consume (seconds)
    pub const MAX_FRAME_SECS: f32 = 0.1;
    /// Tick length that maps to one full velocity step under elapsed integration
    pub const NOMINAL_TICK_SECS: f32 = 1.0 / 60.0;

    /// Seed used when none is configured
    pub const DEFAULT_SEED: u64 = 0x60_1D5;

    /// Squared-length threshold below which a vector is treated as zero
    pub const NORMALIZE_EPSILON: f32 = 1e-12;
}

/// Unit vector in the direction of `v`, or zero for a (near) zero vector.
///
/// glam's `normalize` yields NaN on zero input, so the guard is explicit here.
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    let len_sq = v.length_squared();
    if len_sq.is_finite() && len_sq >= consts::NORMALIZE_EPSILON {
        v / len_sq.sqrt()
    } else {
        Vec2::ZERO
    }
}

/// Velocity for a heading in degrees (0 = +X, counter-clockwise) and a speed
#[inline]
pub fn heading_to_velocity(degrees: f32, speed: f32) -> Vec2 {
    let theta = degrees.to_radians();
    Vec2::new(theta.cos(), theta.sin()) * speed
}

/// Heading of a velocity in degrees, in (-180, 180]
#[inline]
pub fn velocity_heading(v: Vec2) -> f32 {
    let degrees = v.y.atan2(v.x).to_degrees();
    // atan2 returns -π for (-x, -0.0); fold onto the closed end of the range
    if degrees <= -180.0 { 180.0 } else { degrees.min(180.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_unit_length() {
        let n = normalize(Vec2::new(3.0, 4.0));
        assert!((n.length() - 1.0).abs() < 1e-6);
        assert!((n.x - 0.6).abs() < 1e-6);
        assert!((n.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(normalize(Vec2::ZERO), Vec2::ZERO);
        assert_eq!(normalize(Vec2::new(1e-20, -1e-20)), Vec2::ZERO);
    }

    #[test]
    fn test_normalize_rejects_non_finite() {
        assert_eq!(normalize(Vec2::new(f32::INFINITY, 0.0)), Vec2::ZERO);
        assert_eq!(normalize(Vec2::new(f32::NAN, 1.0)), Vec2::ZERO);
    }

    #[test]
    fn test_heading_to_velocity_axes() {
        let east = heading_to_velocity(0.0, 2.0);
        assert!((east - Vec2::new(2.0, 0.0)).length() < 1e-6);

        let north = heading_to_velocity(90.0, 1.0);
        assert!((north - Vec2::new(0.0, 1.0)).length() < 1e-6);

        let west = heading_to_velocity(180.0, 0.5);
        assert!((west - Vec2::new(-0.5, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_heading_round_trip() {
        for degrees in [-179.0_f32, -90.0, -45.0, 0.0, 30.0, 90.0, 135.0, 179.0] {
            let v = heading_to_velocity(degrees, 0.01);
            assert!((velocity_heading(v) - degrees).abs() < 1e-3, "{degrees}");
        }
    }

    #[test]
    fn test_heading_range_closed_at_180() {
        assert_eq!(velocity_heading(Vec2::new(-1.0, -0.0)), 180.0);
        assert_eq!(velocity_heading(Vec2::new(-1.0, 0.0)), 180.0);
    }

    #[test]
    fn test_heading_of_values_above_180_wraps_negative() {
        let v = heading_to_velocity(270.0, 1.0);
        assert!((velocity_heading(v) + 90.0).abs() < 1e-3);
    }
}
