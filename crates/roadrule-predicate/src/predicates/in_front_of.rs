//! Longitudinal ordering of two obstacles.

use roadrule_core::TimeStep;
use roadrule_obstacle::Obstacle;

use crate::context::EvaluationContext;
use crate::error::EvaluationError;
use crate::predicate::{require_other, Constraint, Predicate};

/// `true` if the other obstacle is entirely in front of the ego.
///
/// Both extents are measured on the ego's reference lane. The robust
/// value is the gap between the ego's front and the other's rear.
#[derive(Clone, Copy, Debug, Default)]
pub struct InFrontOf;

impl InFrontOf {
    const NAME: &'static str = "in_front_of";
}

/// Gap between `K`'s front and `P`'s rear from center positions.
pub fn robust_standalone(lon_pos_k: f64, lon_pos_p: f64, length_k: f64, length_p: f64) -> f64 {
    (lon_pos_p - 0.5 * length_p) - (lon_pos_k + 0.5 * length_k)
}

/// `true` if `P` is entirely in front of `K`.
pub fn boolean_standalone(lon_pos_k: f64, lon_pos_p: f64, length_k: f64, length_p: f64) -> bool {
    robust_standalone(lon_pos_k, lon_pos_p, length_k, length_p) > 0.0
}

/// Lower bound for `P`'s longitudinal center position.
pub fn constraint_standalone(lon_pos_k: f64, length_k: f64, length_p: f64) -> Constraint {
    Constraint {
        real_valued_constraint: lon_pos_k + 0.5 * length_k + 0.5 * length_p,
    }
}

impl Predicate for InFrontOf {
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
        Ok(self.robust_evaluation(time_step, ctx, ego, other)? > 0.0)
    }

    fn robust_evaluation(
        &self,
        time_step: TimeStep,
        ctx: &EvaluationContext<'_>,
        ego: &Obstacle,
        other: Option<&Obstacle>,
    ) -> Result<f64, EvaluationError> {
        let other = require_other(Self::NAME, other)?;
        let lane = ego.reference_lane(ctx.network(), time_step)?;
        Ok(other.rear_s_on(time_step, &lane)? - ego.front_s_on(time_step, &lane)?)
    }

    /// Lower bound for the other obstacle's longitudinal center position
    /// on the ego's reference lane.
    fn constraint_evaluation(
        &self,
        time_step: TimeStep,
        ctx: &EvaluationContext<'_>,
        ego: &Obstacle,
        other: Option<&Obstacle>,
    ) -> Result<Constraint, EvaluationError> {
        let other = require_other(Self::NAME, other)?;
        let front_k = ego.front_s(ctx.network(), time_step)?;
        Ok(Constraint {
            real_valued_constraint: front_k + 0.5 * other.shape().length(),
        })
    }
}
