//! Standstill test.

use roadrule_core::TimeStep;
use roadrule_obstacle::Obstacle;

use crate::context::EvaluationContext;
use crate::error::EvaluationError;
use crate::predicate::Predicate;

/// `true` if the ego's speed is below the `standstillError` parameter.
#[derive(Clone, Copy, Debug, Default)]
pub struct InStandstill;

impl Predicate for InStandstill {
    fn name(&self) -> &str {
        "in_standstill"
    }

    fn vehicle_dependent(&self) -> bool {
        false
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

    /// `standstillError - |v|`.
    fn robust_evaluation(
        &self,
        time_step: TimeStep,
        ctx: &EvaluationContext<'_>,
        ego: &Obstacle,
        _other: Option<&Obstacle>,
    ) -> Result<f64, EvaluationError> {
        let threshold = ctx.parameters().get("standstillError")?;
        Ok(threshold - ego.state_at(time_step)?.velocity.abs())
    }
}
