//! One scenario: road network, obstacles, and time base.

use std::sync::Arc;

use indexmap::IndexSet;

use roadrule_core::{ObstacleId, PredicateParameters, TimeStep};
use roadrule_network::RoadNetwork;
use roadrule_obstacle::{Obstacle, ObstacleRole};
use roadrule_predicate::EvaluationContext;

use crate::config::ConfigError;

/// A scenario ready for predicate evaluation.
///
/// Ego obstacles are the ones whose behaviour is checked; every other
/// obstacle only appears as a second operand. Obstacles are shared
/// behind `Arc` so worker threads can hold them for the duration of a
/// batch, and their per-obstacle caches fill up across batches.
pub struct World {
    name: String,
    time_step: TimeStep,
    network: Arc<RoadNetwork>,
    ego_count: usize,
    /// Egos first, then the other obstacles.
    all: Vec<Arc<Obstacle>>,
    dt: f64,
}

impl World {
    /// Assemble a world.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidTimeStepSize`] unless `dt` is finite and
    /// positive, [`ConfigError::DuplicateObstacle`] if two obstacles share
    /// an id.
    pub fn new(
        name: impl Into<String>,
        time_step: TimeStep,
        network: Arc<RoadNetwork>,
        egos: Vec<Obstacle>,
        obstacles: Vec<Obstacle>,
        dt: f64,
    ) -> Result<Self, ConfigError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ConfigError::InvalidTimeStepSize { value: dt });
        }
        let mut seen = IndexSet::with_capacity(egos.len() + obstacles.len());
        for o in egos.iter().chain(&obstacles) {
            if !seen.insert(o.id()) {
                return Err(ConfigError::DuplicateObstacle { id: o.id() });
            }
        }
        let ego_count = egos.len();
        let all = egos.into_iter().chain(obstacles).map(Arc::new).collect();
        Ok(Self {
            name: name.into(),
            time_step,
            network,
            ego_count,
            all,
            dt,
        })
    }

    /// Scenario name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Initial time step of the scenario.
    pub fn time_step(&self) -> TimeStep {
        self.time_step
    }

    /// The road network.
    pub fn road_network(&self) -> &Arc<RoadNetwork> {
        &self.network
    }

    /// Obstacles under evaluation.
    pub fn egos(&self) -> &[Arc<Obstacle>] {
        &self.all[..self.ego_count]
    }

    /// Obstacles that are not egos.
    pub fn obstacles(&self) -> &[Arc<Obstacle>] {
        &self.all[self.ego_count..]
    }

    /// Egos followed by the other obstacles.
    pub fn all_obstacles(&self) -> &[Arc<Obstacle>] {
        &self.all
    }

    /// Look up an obstacle (ego or not) by id.
    pub fn find_obstacle(&self, id: ObstacleId) -> Option<&Arc<Obstacle>> {
        self.all.iter().find(|o| o.id() == id)
    }

    /// Non-ego obstacles with the given role.
    pub fn obstacles_by_role(&self, role: ObstacleRole) -> impl Iterator<Item = &Arc<Obstacle>> {
        self.obstacles().iter().filter(move |o| o.role() == role)
    }

    /// Seconds per time step.
    pub fn time_step_size(&self) -> f64 {
        self.dt
    }

    /// Evaluation context over this world.
    pub fn context<'a>(&'a self, parameters: &'a PredicateParameters) -> EvaluationContext<'a> {
        EvaluationContext::new(&self.network, &self.all, parameters, self.dt)
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("name", &self.name)
            .field("time_step", &self.time_step)
            .field("lanelets", &self.network.len())
            .field("egos", &self.ego_count)
            .field("obstacles", &(self.all.len() - self.ego_count))
            .field("dt", &self.dt)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadrule_geometry::Point;
    use roadrule_network::RoadNetworkBuilder;
    use roadrule_obstacle::{ObstacleBuilder, State};

    fn obstacle(id: u64, role: ObstacleRole) -> Obstacle {
        ObstacleBuilder::new(ObstacleId(id), role)
            .state(State::at_rest(
                TimeStep(0),
                Point::new(id as f64, 0.0),
                0.0,
            ))
            .build()
            .unwrap()
    }

    fn empty() -> Arc<RoadNetwork> {
        Arc::new(RoadNetworkBuilder::new().build().unwrap())
    }

    #[test]
    fn egos_come_first() {
        let w = World::new(
            "w",
            TimeStep(0),
            empty(),
            vec![obstacle(1, ObstacleRole::Dynamic)],
            vec![
                obstacle(2, ObstacleRole::Static),
                obstacle(3, ObstacleRole::Dynamic),
            ],
            0.1,
        )
        .unwrap();
        assert_eq!(w.egos().len(), 1);
        assert_eq!(w.obstacles().len(), 2);
        assert_eq!(w.all_obstacles()[0].id(), ObstacleId(1));
        assert_eq!(w.find_obstacle(ObstacleId(3)).unwrap().id(), ObstacleId(3));
        assert!(w.find_obstacle(ObstacleId(9)).is_none());
        let statics: Vec<_> = w.obstacles_by_role(ObstacleRole::Static).map(|o| o.id()).collect();
        assert_eq!(statics, vec![ObstacleId(2)]);
        assert_eq!(w.time_step_size(), 0.1);
    }

    #[test]
    fn rejects_bad_time_step_size() {
        for dt in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let err = World::new("w", TimeStep(0), empty(), vec![], vec![], dt).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidTimeStepSize { .. }));
        }
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = World::new(
            "w",
            TimeStep(0),
            empty(),
            vec![obstacle(1, ObstacleRole::Dynamic)],
            vec![obstacle(1, ObstacleRole::Static)],
            0.1,
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::DuplicateObstacle { id: ObstacleId(1) });
    }
}
