//! Shared-lane test between two obstacles.

use roadrule_core::TimeStep;
use roadrule_obstacle::Obstacle;

use crate::context::EvaluationContext;
use crate::error::EvaluationError;
use crate::predicate::{require_other, Predicate};

/// `true` if the other obstacle overlaps a lanelet of any lane the ego
/// occupies in its driving direction.
///
/// Topological, so only the boolean form is supported.
#[derive(Clone, Copy, Debug, Default)]
pub struct InSameLane;

impl InSameLane {
    const NAME: &'static str = "in_same_lane";
}

impl Predicate for InSameLane {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn vehicle_dependent(&self) -> bool {
        true
    }

    fn boolean_evaluation(
        &self,
        time_step: TimeStep,
        ctx: &EvaluationContext<'_>,
        ego: &Obstacle,
        other: Option<&Obstacle>,
    ) -> Result<bool, EvaluationError> {
        let other = require_other(Self::NAME, other)?;
        let network = ctx.network();
        let lanes = ego.occupied_lanes(network, time_step)?;
        let occupied = other.occupied_lanelets_by_shape(network, time_step)?;
        Ok(lanes
            .iter()
            .any(|lane| occupied.iter().any(|&id| lane.contains_lanelet(id))))
    }
}
