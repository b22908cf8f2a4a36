//! Deterministic flock simulation
//!
//! This module must stay pure and deterministic:
//! - Seeded RNG only (roster spawning)
//! - Stable iteration order (agent index)
//! - Forces computed from start-of-tick state
//! - No rendering or platform dependencies

pub mod agent;
pub mod roster;
pub mod snapshot;
pub mod steering;
pub mod world;

pub use agent::Agent;
pub use roster::{AgentSeed, RosterSpec, SpeedGroup};
pub use snapshot::{
    AgentView, FlockSnapshot, SnapshotPublisher, SnapshotReader, snapshot_channel, spawn_ticker,
};
pub use steering::{
    BehaviorFn, BehaviorKind, CentroidMode, FlockContext, SteeringParams, acceleration, alignment,
    centroid, cohesion, separation,
};
pub use world::{Integration, World, WorldError, WorldParams};
