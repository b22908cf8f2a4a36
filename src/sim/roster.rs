//! Initial flock composition and seeded spawning

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::agent::Agent;
use crate::heading_to_velocity;
use crate::palette::{Color, ColorMix};

/// A hand-placed agent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentSeed {
    pub position: Vec2,
    /// Degrees, counter-clockwise from +X
    pub heading: f32,
    pub speed: f32,
    pub color: Color,
}

impl AgentSeed {
    pub fn to_agent(&self) -> Agent {
        Agent::new(
            self.position,
            heading_to_velocity(self.heading, self.speed),
            self.color,
        )
    }
}

/// `count` randomly headed agents; agent `i` gets `base_speed + speed_step * i`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedGroup {
    pub count: usize,
    pub base_speed: f32,
    #[serde(default)]
    pub speed_step: f32,
    #[serde(default)]
    pub colors: ColorMix,
}

impl SpeedGroup {
    pub fn new(count: usize, base_speed: f32) -> Self {
        Self {
            count,
            base_speed,
            speed_step: 0.0,
            colors: ColorMix::default(),
        }
    }

    pub fn with_step(mut self, speed_step: f32) -> Self {
        self.speed_step = speed_step;
        self
    }

    pub fn speed_for(&self, i: usize) -> f32 {
        self.base_speed + self.speed_step * i as f32
    }
}

/// Full starting roster: fixed agents first, then each group in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RosterSpec {
    #[serde(default)]
    pub fixed: Vec<AgentSeed>,
    #[serde(default)]
    pub groups: Vec<SpeedGroup>,
}

impl RosterSpec {
    /// Three blue scouts plus a ramp of 100 and a block of 100 at 0.02
    pub fn classic() -> Self {
        let scout = |x: f32, y: f32, heading: f32| AgentSeed {
            position: Vec2::new(x, y),
            heading,
            speed: 0.01,
            color: Color::SOLID_BLUE,
        };
        Self {
            fixed: vec![
                scout(0.0, 0.0, 0.0),
                scout(0.0, 0.5, 90.0),
                scout(0.0, 0.0, 180.0),
            ],
            groups: vec![
                SpeedGroup::new(100, 0.01).with_step(0.0001),
                SpeedGroup::new(100, 0.02),
            ],
        }
    }

    pub fn sparse() -> Self {
        Self {
            fixed: Vec::new(),
            groups: vec![SpeedGroup::new(24, 0.01).with_step(0.0002)],
        }
    }

    pub fn dense() -> Self {
        Self {
            fixed: Vec::new(),
            groups: vec![
                SpeedGroup::new(400, 0.008).with_step(0.00002),
                SpeedGroup::new(400, 0.02),
            ],
        }
    }

    /// Number of agents `build` will produce
    pub fn total(&self) -> usize {
        self.fixed.len() + self.groups.iter().map(|g| g.count).sum::<usize>()
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.total() == 0 {
            return Err("roster is empty");
        }
        let seeds_ok = self.fixed.iter().all(|s| {
            s.position.is_finite()
                && s.heading.is_finite()
                && s.speed.is_finite()
                && s.speed >= 0.0
        });
        if !seeds_ok {
            return Err("fixed agents need finite position, heading and non-negative speed");
        }
        if !self.fixed.iter().all(|s| s.color.is_valid()) {
            return Err("fixed agent color channels must be between 0.0 and 1.0");
        }
        for group in &self.groups {
            let last = group.speed_for(group.count.saturating_sub(1));
            let speeds_ok = [group.base_speed, last]
                .iter()
                .all(|s| s.is_finite() && *s >= 0.0);
            if !speeds_ok {
                return Err("group speeds must be finite and non-negative");
            }
            if !group.colors.is_valid() {
                return Err("group colors and weight must be between 0.0 and 1.0");
            }
        }
        Ok(())
    }

    /// Spawn every agent. The same seed always yields the same roster.
    pub fn build(&self, seed: u64) -> Vec<Agent> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut agents = Vec::with_capacity(self.total());
        agents.extend(self.fixed.iter().map(AgentSeed::to_agent));
        for group in &self.groups {
            agents.extend(
                (0..group.count).map(|i| Agent::spawn(&mut rng, group.speed_for(i), &group.colors)),
            );
        }
        agents
    }
}
