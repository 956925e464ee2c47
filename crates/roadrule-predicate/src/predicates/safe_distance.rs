//! Longitudinal safe distance to a leading obstacle.
//!
//! The safe distance is the gap the following obstacle `K` needs to come
//! to a stop behind the leading obstacle `P` if both brake at their
//! minimum longitudinal acceleration, after `K`'s reaction time:
//!
//! ```text
//! d_safe = v_P² / (-2 |a_P|) - v_K² / (-2 |a_K|) + v_K · t_react
//! ```
//!
//! The rule is only meaningful while `P` is ahead of `K`. When `P` is
//! behind, the robust value is the (positive) overlap distance.

use roadrule_core::TimeStep;
use roadrule_obstacle::Obstacle;

use crate::context::EvaluationContext;
use crate::error::EvaluationError;
use crate::predicate::{require_other, Constraint, Predicate};

/// `true` if the ego keeps a safe distance to the other obstacle.
///
/// Positions are measured on the ego's reference lane.
#[derive(Clone, Copy, Debug, Default)]
pub struct SafeDistance;

impl SafeDistance {
    const NAME: &'static str = "safe_distance";
}

/// Safe distance for velocities `velocity_k` (following) and
/// `velocity_p` (leading).
///
/// A participant at zero velocity needs no braking distance, so its
/// acceleration is not checked. Any other participant must have a
/// negative minimum acceleration, otherwise
/// [`EvaluationError::InvalidInput`].
pub fn compute_safe_distance(
    velocity_k: f64,
    velocity_p: f64,
    min_acceleration_k: f64,
    min_acceleration_p: f64,
    reaction_time: f64,
) -> Result<f64, EvaluationError> {
    Ok(braking_distance(velocity_p, min_acceleration_p)?
        - braking_distance(velocity_k, min_acceleration_k)?
        + velocity_k * reaction_time)
}

/// `v² / (-2 |a|)`; zero for a participant at rest.
fn braking_distance(velocity: f64, min_acceleration: f64) -> Result<f64, EvaluationError> {
    if velocity == 0.0 {
        return Ok(0.0);
    }
    if min_acceleration >= 0.0 {
        return Err(EvaluationError::InvalidInput {
            reason: format!("minimum acceleration {min_acceleration} is not negative"),
        });
    }
    Ok(velocity.powi(2) / (-2.0 * min_acceleration.abs()))
}

/// Robust safe distance from raw longitudinal center positions.
#[allow(clippy::too_many_arguments)]
pub fn robust_standalone(
    lon_pos_k: f64,
    lon_pos_p: f64,
    velocity_k: f64,
    velocity_p: f64,
    min_acceleration_k: f64,
    min_acceleration_p: f64,
    reaction_time: f64,
    length_k: f64,
    length_p: f64,
) -> Result<f64, EvaluationError> {
    let d_safe = compute_safe_distance(
        velocity_k,
        velocity_p,
        min_acceleration_k,
        min_acceleration_p,
        reaction_time,
    )?;
    let delta_s = (lon_pos_p - 0.5 * length_p) - (lon_pos_k + 0.5 * length_k);
    Ok(margin(delta_s, d_safe))
}

/// Boolean safe distance from raw longitudinal center positions.
#[allow(clippy::too_many_arguments)]
pub fn boolean_standalone(
    lon_pos_k: f64,
    lon_pos_p: f64,
    velocity_k: f64,
    velocity_p: f64,
    min_acceleration_k: f64,
    min_acceleration_p: f64,
    reaction_time: f64,
    length_k: f64,
    length_p: f64,
) -> Result<bool, EvaluationError> {
    robust_standalone(
        lon_pos_k,
        lon_pos_p,
        velocity_k,
        velocity_p,
        min_acceleration_k,
        min_acceleration_p,
        reaction_time,
        length_k,
        length_p,
    )
    .map(|r| r > 0.0)
}

/// Upper bound for `K`'s longitudinal center position.
#[allow(clippy::too_many_arguments)]
pub fn constraint_standalone(
    lon_pos_p: f64,
    velocity_k: f64,
    velocity_p: f64,
    min_acceleration_k: f64,
    min_acceleration_p: f64,
    reaction_time: f64,
    length_k: f64,
    length_p: f64,
) -> Result<Constraint, EvaluationError> {
    let d_safe = compute_safe_distance(
        velocity_k,
        velocity_p,
        min_acceleration_k,
        min_acceleration_p,
        reaction_time,
    )?;
    Ok(Constraint {
        real_valued_constraint: lon_pos_p - 0.5 * length_p - 0.5 * length_k - d_safe,
    })
}

fn margin(delta_s: f64, d_safe: f64) -> f64 {
    if delta_s < 0.0 {
        delta_s.abs()
    } else {
        delta_s - d_safe
    }
}

fn d_safe_of(ego: &Obstacle, other: &Obstacle, time_step: TimeStep) -> Result<f64, EvaluationError> {
    compute_safe_distance(
        ego.state_at(time_step)?.velocity,
        other.state_at(time_step)?.velocity,
        ego.actuator().a_min_long(),
        other.actuator().a_min_long(),
        ego.sensor().reaction_time().unwrap_or(0.0),
    )
}

impl Predicate for SafeDistance {
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
        let delta_s = other.rear_s_on(time_step, &lane)? - ego.front_s_on(time_step, &lane)?;
        Ok(margin(delta_s, d_safe_of(ego, other, time_step)?))
    }

    /// Upper bound for the ego's longitudinal center position on its
    /// reference lane.
    fn constraint_evaluation(
        &self,
        time_step: TimeStep,
        ctx: &EvaluationContext<'_>,
        ego: &Obstacle,
        other: Option<&Obstacle>,
    ) -> Result<Constraint, EvaluationError> {
        let other = require_other(Self::NAME, other)?;
        let lane = ego.reference_lane(ctx.network(), time_step)?;
        let rear_p = other.rear_s_on(time_step, &lane)?;
        Ok(Constraint {
            real_valued_constraint: rear_p
                - 0.5 * ego.shape().length()
                - d_safe_of(ego, other, time_step)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn safe_distance_formula() {
        assert!(close(compute_safe_distance(10.0, 0.0, -10.0, -10.0, 0.0).unwrap(), 5.0));
        assert!(close(compute_safe_distance(20.0, 20.0, -10.0, -10.0, 0.3).unwrap(), 6.0));
        assert!(close(compute_safe_distance(0.0, 0.0, 0.0, 0.0, 1.0).unwrap(), 0.0));
    }

    #[test]
    fn non_negative_acceleration_rejected() {
        let err = compute_safe_distance(10.0, 5.0, -10.0, 0.0, 0.0).unwrap_err();
        assert!(matches!(err, EvaluationError::InvalidInput { .. }));
        assert!(compute_safe_distance(10.0, 5.0, 1.0, -10.0, 0.0).is_err());
    }

    #[test]
    fn robust_following_too_close() {
        let r = robust_standalone(0.0, 20.0, 20.0, 20.0, -10.0, -10.0, 0.3, 5.0, 5.0).unwrap();
        assert!(close(r, 9.0));
        let r = robust_standalone(20.0, 30.0, 20.0, 0.0, -10.0, -10.0, 0.3, 5.0, 5.0).unwrap();
        assert!(close(r, -21.0));
        assert!(!boolean_standalone(20.0, 30.0, 20.0, 0.0, -10.0, -10.0, 0.3, 5.0, 5.0).unwrap());
    }

    #[test]
    fn leader_behind_is_positive_overlap() {
        let r = robust_standalone(8.0, 0.0, 20.0, 20.0, -10.0, -10.0, 0.0, 5.0, 5.0).unwrap();
        assert!(close(r, 13.0));
    }

    #[test]
    fn constraint_subtracts_safe_distance() {
        let c = constraint_standalone(30.0, 10.0, 0.0, -10.0, -10.0, 0.0, 4.0, 4.0).unwrap();
        assert!(close(c.real_valued_constraint, 30.0 - 2.0 - 2.0 - 5.0));
    }
}
