//! Lane identity.

use roadrule_network::Lane;

use crate::error::EvaluationError;
use crate::predicate::LanePredicate;

/// `true` if both lanes consist of the same lanelet sequence.
#[derive(Clone, Copy, Debug, Default)]
pub struct InLane;

impl LanePredicate for InLane {
    fn name(&self) -> &str {
        "in_lane"
    }

    fn vehicle_dependent(&self) -> bool {
        false
    }

    fn boolean_evaluation(&self, lane_k: &Lane, lane_p: &Lane) -> Result<bool, EvaluationError> {
        Ok(lane_k == lane_p)
    }
}
