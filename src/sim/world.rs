//! The flock and its tick
//!
//! `World::step` freezes flock aggregates once, computes every agent's
//! steering from that frozen view, then integrates all agents.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::agent::Agent;
use super::roster::RosterSpec;
use super::snapshot::FlockSnapshot;
use super::steering::{FlockContext, SteeringParams, acceleration, centroid};
use crate::consts::{MAX_FRAME_SECS, MAX_MAGNITUDE, NOMINAL_TICK_SECS};
use crate::settings::{Settings, SettingsError};

/// Errors that can occur when constructing a world.
#[derive(Debug, Error, PartialEq)]
pub enum WorldError {
    /// The roster produced no agents.
    #[error("a world needs at least one agent")]
    EmptyRoster,
    /// An agent was handed in with NaN or infinite state.
    #[error("agent {index} has a non-finite position or velocity")]
    NonFiniteAgent { index: usize },
    /// An agent component exceeds `MAX_MAGNITUDE`.
    #[error("agent {index} has a position or velocity component beyond 1e18")]
    OutOfRange { index: usize },
    /// Indicates an invalid parameter value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

/// How far an agent travels per tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Integration {
    /// One full velocity step per tick, whatever the frame time
    #[default]
    PerTick,
    /// `velocity * dt / nominal_tick_secs`; frame-rate independent
    Elapsed { nominal_tick_secs: f32 },
}

impl Integration {
    /// Frame-rate independent integration at the default nominal tick
    pub fn elapsed() -> Self {
        Integration::Elapsed {
            nominal_tick_secs: NOMINAL_TICK_SECS,
        }
    }

    /// Fraction of a velocity step to travel for `dt_secs` of elapsed time
    pub fn advance(&self, dt_secs: f32) -> f32 {
        match *self {
            Integration::PerTick => 1.0,
            Integration::Elapsed { nominal_tick_secs } => dt_secs / nominal_tick_secs,
        }
    }
}

/// World-level tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldParams {
    pub steering: SteeringParams,
    #[serde(default)]
    pub integration: Integration,
    /// Longest elapsed time one step will consume (seconds)
    pub max_frame_secs: f32,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            steering: SteeringParams::default(),
            integration: Integration::PerTick,
            max_frame_secs: MAX_FRAME_SECS,
        }
    }
}

impl WorldParams {
    pub fn validate(&self) -> Result<(), WorldError> {
        let force = self.steering.max_force;
        if !force.is_finite() || force < 0.0 {
            return Err(WorldError::InvalidConfig(
                "max_force must be finite and non-negative",
            ));
        }
        if !self.max_frame_secs.is_finite() || self.max_frame_secs <= 0.0 {
            return Err(WorldError::InvalidConfig(
                "max_frame_secs must be finite and positive",
            ));
        }
        if let Integration::Elapsed { nominal_tick_secs } = self.integration {
            if !nominal_tick_secs.is_finite() || nominal_tick_secs <= 0.0 {
                return Err(WorldError::InvalidConfig(
                    "nominal_tick_secs must be finite and positive",
                ));
            }
        }
        Ok(())
    }
}

/// A fixed-size flock
#[derive(Debug, Clone)]
pub struct World {
    agents: Vec<Agent>,
    params: WorldParams,
    tick: u64,
}

impl World {
    /// Build a world from an explicit roster
    pub fn new(agents: Vec<Agent>, params: WorldParams) -> Result<Self, WorldError> {
        params.validate()?;
        if agents.is_empty() {
            return Err(WorldError::EmptyRoster);
        }
        if let Some(index) = agents.iter().position(|a| !a.is_finite()) {
            return Err(WorldError::NonFiniteAgent { index });
        }
        let in_range = |a: &Agent| {
            a.position.abs().max_element() <= MAX_MAGNITUDE
                && a.velocity.abs().max_element() <= MAX_MAGNITUDE
        };
        if let Some(index) = agents.iter().position(|a| !in_range(a)) {
            return Err(WorldError::OutOfRange { index });
        }
        log::info!(
            "World created: {} agents, integration {:?}",
            agents.len(),
            params.integration
        );
        Ok(Self {
            agents,
            params,
            tick: 0,
        })
    }

    /// Build a world by seeding `roster` from `seed`
    pub fn from_roster(
        roster: &RosterSpec,
        seed: u64,
        params: WorldParams,
    ) -> Result<Self, WorldError> {
        log::info!("Seeding roster with seed: {}", seed);
        Self::new(roster.build(seed), params)
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let world = Self::from_roster(&settings.roster(), settings.seed, settings.world)?;
        Ok(world)
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Always false for a constructed world
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Completed steps since construction
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn params(&self) -> &WorldParams {
        &self.params
    }

    /// Mutable steering parameters, for toggling behaviors between ticks
    pub fn steering_mut(&mut self) -> &mut SteeringParams {
        &mut self.params.steering
    }

    /// Mean position of all agents
    pub fn centroid(&self) -> Vec2 {
        centroid(&self.agents)
    }

    /// Immutable copy of the render-facing state
    pub fn snapshot(&self) -> FlockSnapshot {
        FlockSnapshot::capture(self)
    }

    /// Advance the flock by one tick.
    ///
    /// `elapsed` is clamped to `max_frame_secs`. It only affects travel under
    /// [`Integration::Elapsed`]; steering is applied once per call either way.
    ///
    /// Construction bounds every component by `MAX_MAGNITUDE`, so state stays
    /// finite for far more ticks than any run performs.
    pub fn step(&mut self, elapsed: Duration) {
        let dt = elapsed.as_secs_f32().min(self.params.max_frame_secs);
        let advance = self.params.integration.advance(dt);

        // Forces first, against start-of-tick state
        let forces: Vec<Vec2> = {
            let ctx = FlockContext::new(&self.agents);
            self.agents
                .iter()
                .map(|agent| acceleration(agent, &ctx, &self.params.steering))
                .collect()
        };

        for (agent, force) in self.agents.iter_mut().zip(forces) {
            agent.step(force, advance);
            debug_assert!(agent.is_finite(), "agent left finite range: {agent:?}");
        }

        self.tick += 1;
        log::trace!("tick {} dt={:.4}s advance={:.3}", self.tick, dt, advance);
    }
}
