//! Read-only scenario view passed to every predicate.

use std::sync::Arc;

use roadrule_core::{ObstacleId, PredicateParameters};
use roadrule_network::RoadNetwork;
use roadrule_obstacle::Obstacle;

/// Scenario state a predicate may read.
///
/// Built by the caller for each evaluation batch. Cheap to copy: every
/// field is a reference.
#[derive(Clone, Copy)]
pub struct EvaluationContext<'a> {
    network: &'a RoadNetwork,
    obstacles: &'a [Arc<Obstacle>],
    parameters: &'a PredicateParameters,
    dt: f64,
}

impl<'a> EvaluationContext<'a> {
    /// Construct a context. `dt` is the duration of one time step in
    /// seconds.
    pub fn new(
        network: &'a RoadNetwork,
        obstacles: &'a [Arc<Obstacle>],
        parameters: &'a PredicateParameters,
        dt: f64,
    ) -> Self {
        Self {
            network,
            obstacles,
            parameters,
            dt,
        }
    }

    /// The road network.
    pub fn network(&self) -> &'a RoadNetwork {
        self.network
    }

    /// Every obstacle of the scenario.
    pub fn obstacles(&self) -> &'a [Arc<Obstacle>] {
        self.obstacles
    }

    /// Look up an obstacle by id.
    pub fn find_obstacle(&self, id: ObstacleId) -> Option<&'a Arc<Obstacle>> {
        self.obstacles.iter().find(|o| o.id() == id)
    }

    /// Predicate thresholds.
    pub fn parameters(&self) -> &'a PredicateParameters {
        self.parameters
    }

    /// Seconds per time step.
    pub fn dt(&self) -> f64 {
        self.dt
    }
}
