//! Steering behaviors
//!
//! Each behavior is a plain function from (agent, flock context, params) to an
//! acceleration contribution. The world sums the enabled ones in a fixed order.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::agent::Agent;
use crate::consts::MAX_FORCE;
use crate::normalize;

/// Which agents feed the cohesion centroid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CentroidMode {
    /// Mean over every agent, the steering agent included
    #[default]
    IncludeSelf,
    /// Mean over every other agent; a lone agent feels no pull
    ExcludeSelf,
}

/// Signature shared by every steering behavior
pub type BehaviorFn = fn(&Agent, &FlockContext<'_>, &SteeringParams) -> Vec2;

/// The steering behaviors, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BehaviorKind {
    Separation,
    Alignment,
    Cohesion,
}

impl BehaviorKind {
    pub const ALL: [BehaviorKind; 3] = [
        BehaviorKind::Separation,
        BehaviorKind::Alignment,
        BehaviorKind::Cohesion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BehaviorKind::Separation => "separation",
            BehaviorKind::Alignment => "alignment",
            BehaviorKind::Cohesion => "cohesion",
        }
    }

    pub fn function(&self) -> BehaviorFn {
        match self {
            BehaviorKind::Separation => separation,
            BehaviorKind::Alignment => alignment,
            BehaviorKind::Cohesion => cohesion,
        }
    }
}

/// Tunables for the steering pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteeringParams {
    /// Magnitude of the cohesion correction applied every tick
    pub max_force: f32,
    #[serde(default)]
    pub centroid_mode: CentroidMode,
    pub separation: bool,
    pub alignment: bool,
    pub cohesion: bool,
}

impl Default for SteeringParams {
    fn default() -> Self {
        Self {
            max_force: MAX_FORCE,
            centroid_mode: CentroidMode::IncludeSelf,
            separation: true,
            alignment: true,
            cohesion: true,
        }
    }
}

impl SteeringParams {
    pub fn is_enabled(&self, kind: BehaviorKind) -> bool {
        match kind {
            BehaviorKind::Separation => self.separation,
            BehaviorKind::Alignment => self.alignment,
            BehaviorKind::Cohesion => self.cohesion,
        }
    }

    pub fn set_enabled(&mut self, kind: BehaviorKind, enabled: bool) {
        match kind {
            BehaviorKind::Separation => self.separation = enabled,
            BehaviorKind::Alignment => self.alignment = enabled,
            BehaviorKind::Cohesion => self.cohesion = enabled,
        }
    }

    /// Enabled behaviors in evaluation order
    pub fn enabled(&self) -> impl Iterator<Item = BehaviorKind> + '_ {
        BehaviorKind::ALL
            .into_iter()
            .filter(move |kind| self.is_enabled(*kind))
    }
}

/// Flock-wide aggregates, frozen at the start of a tick
#[derive(Debug, Clone)]
pub struct FlockContext<'a> {
    pub agents: &'a [Agent],
    pub position_sum: Vec2,
    pub centroid: Vec2,
    pub mean_velocity: Vec2,
}

impl<'a> FlockContext<'a> {
    /// Panics if `agents` is empty.
    pub fn new(agents: &'a [Agent]) -> Self {
        assert!(!agents.is_empty(), "centroid of an empty flock");
        let n = agents.len() as f32;
        let position_sum = agents.iter().map(|a| a.position).sum::<Vec2>();
        let centroid = position_sum / n;
        let mean_velocity = agents.iter().map(|a| a.velocity).sum::<Vec2>() / n;
        Self {
            agents,
            position_sum,
            centroid,
            mean_velocity,
        }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

/// Arithmetic mean of agent positions.
///
/// A flock is never empty while it is simulated; an empty slice is a bug in
/// the caller and panics.
pub fn centroid(agents: &[Agent]) -> Vec2 {
    assert!(!agents.is_empty(), "centroid of an empty flock");
    let sum = agents.iter().map(|a| a.position).sum::<Vec2>();
    sum / agents.len() as f32
}

/// Sum of every enabled behavior for `agent`
pub fn acceleration(agent: &Agent, ctx: &FlockContext<'_>, params: &SteeringParams) -> Vec2 {
    params
        .enabled()
        .map(|kind| (kind.function())(agent, ctx, params))
        .fold(Vec2::ZERO, |acc, force| acc + force)
}

/// Steer away from nearby flockmates. Not yet active: contributes nothing.
pub fn separation(_agent: &Agent, _ctx: &FlockContext<'_>, _params: &SteeringParams) -> Vec2 {
    Vec2::ZERO
}

/// Match the flock's mean velocity. Not yet active: contributes nothing.
pub fn alignment(_agent: &Agent, _ctx: &FlockContext<'_>, _params: &SteeringParams) -> Vec2 {
    Vec2::ZERO
}

/// Steer toward the flock centroid with a fixed-magnitude correction.
///
/// The result is `normalize(desired - velocity) * max_force`, so its length is
/// `max_force` or zero regardless of distance to the centroid.
pub fn cohesion(agent: &Agent, ctx: &FlockContext<'_>, params: &SteeringParams) -> Vec2 {
    let target = match params.centroid_mode {
        CentroidMode::IncludeSelf => ctx.centroid,
        CentroidMode::ExcludeSelf => {
            if ctx.len() < 2 {
                return Vec2::ZERO;
            }
            (ctx.position_sum - agent.position) / (ctx.len() - 1) as f32
        }
    };
    let desired = target - agent.position;
    normalize(desired - agent.velocity) * params.max_force
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Color;

    fn agent(x: f32, y: f32, vx: f32, vy: f32) -> Agent {
        Agent::new(Vec2::new(x, y), Vec2::new(vx, vy), Color::BLUE)
    }

    fn triangle() -> Vec<Agent> {
        vec![
            agent(0.0, 0.0, 1.0, 0.0),
            agent(2.0, 0.0, 1.0, 0.0),
            agent(1.0, 3.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_centroid_is_mean() {
        let agents = triangle();
        assert_eq!(centroid(&agents), Vec2::new(1.0, 1.0));

        let agents = vec![agent(-4.0, 2.0, 0.0, 0.0), agent(4.0, 6.0, 0.0, 0.0)];
        assert_eq!(centroid(&agents), Vec2::new(0.0, 4.0));
    }

    #[test]
    #[should_panic(expected = "empty flock")]
    fn test_centroid_empty_panics() {
        centroid(&[]);
    }

    #[test]
    fn test_context_aggregates() {
        let agents = triangle();
        let ctx = FlockContext::new(&agents);
        assert_eq!(ctx.len(), 3);
        assert_eq!(ctx.position_sum, Vec2::new(3.0, 3.0));
        assert_eq!(ctx.centroid, Vec2::new(1.0, 1.0));
        assert_eq!(ctx.mean_velocity, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_context_centroid_matches_free_function() {
        let agents = vec![
            agent(0.1, -7.3, 0.0, 0.0),
            agent(1e4, 0.7, 0.0, 0.0),
            agent(-3.3, 2.2, 0.0, 0.0),
        ];
        let ctx = FlockContext::new(&agents);
        assert_eq!(ctx.centroid, centroid(&agents));
        assert_eq!(ctx.centroid, ctx.position_sum / 3.0);
    }

    #[test]
    #[should_panic(expected = "empty flock")]
    fn test_context_of_empty_flock_panics() {
        FlockContext::new(&[]);
    }

    #[test]
    fn test_cohesion_points_toward_centroid() {
        let agents = triangle();
        let ctx = FlockContext::new(&agents);
        let params = SteeringParams::default();

        // desired (1,1) minus velocity (1,0) leaves straight up
        let force = cohesion(&agents[0], &ctx, &params);
        assert!(force.x.abs() < 1e-12);
        assert!((force.y - params.max_force).abs() < 1e-9);
    }

    #[test]
    fn test_cohesion_magnitude_is_max_force() {
        let agents = vec![agent(0.0, 0.0, 0.01, 0.0), agent(1000.0, -500.0, 0.0, 0.02)];
        let ctx = FlockContext::new(&agents);
        let params = SteeringParams::default();
        for a in &agents {
            let force = cohesion(a, &ctx, &params);
            assert!((force.length() - params.max_force).abs() < 1e-9);
        }
    }

    #[test]
    fn test_cohesion_degenerate_is_zero() {
        // desired - velocity == 0
        let agents = vec![agent(0.0, 0.0, 1.0, 0.0), agent(2.0, 0.0, 1.0, 0.0)];
        let ctx = FlockContext::new(&agents);
        let force = cohesion(&agents[0], &ctx, &SteeringParams::default());
        assert_eq!(force, Vec2::ZERO);
    }

    #[test]
    fn test_cohesion_exclude_self() {
        let agents = triangle();
        let ctx = FlockContext::new(&agents);
        let params = SteeringParams {
            centroid_mode: CentroidMode::ExcludeSelf,
            ..SteeringParams::default()
        };
        // Others are (2,0) and (1,3): target (1.5, 1.5), desired - v = (0.5, 1.5)
        let force = cohesion(&agents[0], &ctx, &params);
        let expected = Vec2::new(0.5, 1.5).normalize() * params.max_force;
        assert!((force - expected).length() < 1e-9);

        let lone = vec![agent(5.0, 5.0, 1.0, 0.0)];
        let ctx = FlockContext::new(&lone);
        assert_eq!(cohesion(&lone[0], &ctx, &params), Vec2::ZERO);
    }

    #[test]
    fn test_stub_behaviors_are_zero() {
        let agents = triangle();
        let ctx = FlockContext::new(&agents);
        let params = SteeringParams::default();
        for a in &agents {
            assert_eq!(separation(a, &ctx, &params), Vec2::ZERO);
            assert_eq!(alignment(a, &ctx, &params), Vec2::ZERO);
        }
    }

    #[test]
    fn test_enabled_order_and_toggles() {
        let mut params = SteeringParams::default();
        assert_eq!(params.enabled().collect::<Vec<_>>(), BehaviorKind::ALL.to_vec());

        params.set_enabled(BehaviorKind::Alignment, false);
        assert_eq!(
            params.enabled().collect::<Vec<_>>(),
            vec![BehaviorKind::Separation, BehaviorKind::Cohesion]
        );
        assert!(!params.is_enabled(BehaviorKind::Alignment));
    }

    #[test]
    fn test_acceleration_respects_cohesion_toggle() {
        let agents = triangle();
        let ctx = FlockContext::new(&agents);
        let mut params = SteeringParams::default();
        assert_ne!(acceleration(&agents[0], &ctx, &params), Vec2::ZERO);

        params.set_enabled(BehaviorKind::Cohesion, false);
        assert_eq!(acceleration(&agents[0], &ctx, &params), Vec2::ZERO);
    }
}
