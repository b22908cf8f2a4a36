//! A single flocking agent
//!
//! Motion state is the velocity vector alone. Heading and speed are derived
//! on demand so they can never disagree with it.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::palette::{Color, ColorMix};
use crate::{heading_to_velocity, normalize, velocity_heading};

/// One goid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub position: Vec2,
    /// Direction of travel; magnitude is speed (world units per tick)
    pub velocity: Vec2,
    color: Color,
}

impl Agent {
    pub fn new(position: Vec2, velocity: Vec2, color: Color) -> Self {
        Self {
            position,
            velocity,
            color,
        }
    }

    /// Agent at the origin with a random whole-degree heading in [0, 360)
    /// and a color drawn from `mix`.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, base_speed: f32, mix: &ColorMix) -> Self {
        let heading = rng.random_range(0..360u32) as f32;
        let color = mix.pick(rng);
        Self::new(Vec2::ZERO, heading_to_velocity(heading, base_speed), color)
    }

    /// Heading in degrees, counter-clockwise from +X, in (-180, 180].
    ///
    /// A stationary agent reports 0.
    pub fn heading(&self) -> f32 {
        velocity_heading(self.velocity)
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }

    /// Turn by `accel` while keeping speed, then move.
    ///
    /// `advance` is the fraction of a velocity step to travel this tick
    /// (1.0 for per-tick integration).
    pub fn step(&mut self, accel: Vec2, advance: f32) {
        let speed = self.speed();
        let direction = normalize(self.velocity + accel);
        // A steering force that exactly cancels velocity leaves no direction
        // to keep; hold the current one instead of stopping.
        if direction != Vec2::ZERO {
            self.velocity = direction * speed;
        }
        self.position += self.velocity * advance;
    }
}
