//! The [`Predicate`] and [`LanePredicate`] traits.

use roadrule_core::TimeStep;
use roadrule_network::Lane;
use roadrule_obstacle::Obstacle;

use crate::context::EvaluationContext;
use crate::error::{EvaluationError, EvaluationMode};

/// Linear constraint form of a rule.
///
/// A bound on a longitudinal position in metres. Which obstacle it
/// bounds, and from which side, is documented per predicate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Constraint {
    /// The bound, metres.
    pub real_valued_constraint: f64,
}

/// A rule over one primary obstacle (the "ego", `K`) and an optional
/// second obstacle (`P`) at one time step.
///
/// # Contract
///
/// - Evaluation MUST be deterministic for a given (time step, obstacles)
///   tuple, regardless of thread or call order.
/// - `&self`: predicates are stateless. Statistics live in the
///   [`PredicateRegistry`](crate::PredicateRegistry).
/// - Forms without a meaningful result keep the default implementation,
///   which returns [`EvaluationError::Unsupported`].
///
/// # Object safety
///
/// This trait is object-safe; the registry stores predicates as
/// `Arc<dyn Predicate>` shared by every worker thread.
///
/// # Examples
///
/// ```
/// use roadrule_core::TimeStep;
/// use roadrule_obstacle::Obstacle;
/// use roadrule_predicate::{EvaluationContext, EvaluationError, Predicate};
///
/// struct Moving;
///
/// impl Predicate for Moving {
///     fn name(&self) -> &str { "moving" }
///     fn vehicle_dependent(&self) -> bool { false }
///     fn boolean_evaluation(
///         &self,
///         time_step: TimeStep,
///         _ctx: &EvaluationContext<'_>,
///         ego: &Obstacle,
///         _other: Option<&Obstacle>,
///     ) -> Result<bool, EvaluationError> {
///         Ok(ego.state_at(time_step)?.velocity != 0.0)
///     }
/// }
///
/// assert_eq!(Moving.name(), "moving");
/// ```
pub trait Predicate: Send + Sync + 'static {
    /// Registry key and name in error messages.
    fn name(&self) -> &str;

    /// `true` if the predicate relates the ego to a second obstacle.
    fn vehicle_dependent(&self) -> bool;

    /// Whether the rule holds.
    fn boolean_evaluation(
        &self,
        time_step: TimeStep,
        ctx: &EvaluationContext<'_>,
        ego: &Obstacle,
        other: Option<&Obstacle>,
    ) -> Result<bool, EvaluationError>;

    /// Signed margin by which the rule holds.
    ///
    /// Default: [`EvaluationError::Unsupported`].
    fn robust_evaluation(
        &self,
        _time_step: TimeStep,
        _ctx: &EvaluationContext<'_>,
        _ego: &Obstacle,
        _other: Option<&Obstacle>,
    ) -> Result<f64, EvaluationError> {
        Err(unsupported(self.name(), EvaluationMode::Robust))
    }

    /// Constraint form of the rule.
    ///
    /// Default: [`EvaluationError::Unsupported`].
    fn constraint_evaluation(
        &self,
        _time_step: TimeStep,
        _ctx: &EvaluationContext<'_>,
        _ego: &Obstacle,
        _other: Option<&Obstacle>,
    ) -> Result<Constraint, EvaluationError> {
        Err(unsupported(self.name(), EvaluationMode::Constraint))
    }
}

/// A rule over two lanes, independent of any obstacle.
///
/// Same contract as [`Predicate`].
pub trait LanePredicate: Send + Sync + 'static {
    /// Registry key and name in error messages.
    fn name(&self) -> &str;

    /// `true` if the predicate depends on a second participant.
    fn vehicle_dependent(&self) -> bool;

    /// Whether the rule holds for `lane_k` and `lane_p`.
    fn boolean_evaluation(&self, lane_k: &Lane, lane_p: &Lane) -> Result<bool, EvaluationError>;

    /// Signed margin. Default: [`EvaluationError::Unsupported`].
    fn robust_evaluation(&self, _lane_k: &Lane, _lane_p: &Lane) -> Result<f64, EvaluationError> {
        Err(unsupported(self.name(), EvaluationMode::Robust))
    }

    /// Constraint form. Default: [`EvaluationError::Unsupported`].
    fn constraint_evaluation(
        &self,
        _lane_k: &Lane,
        _lane_p: &Lane,
    ) -> Result<Constraint, EvaluationError> {
        Err(unsupported(self.name(), EvaluationMode::Constraint))
    }
}

pub(crate) fn unsupported(predicate: &str, mode: EvaluationMode) -> EvaluationError {
    EvaluationError::Unsupported {
        predicate: predicate.to_owned(),
        mode,
    }
}

/// The second obstacle, or [`EvaluationError::MissingOperand`].
pub(crate) fn require_other<'o>(
    predicate: &str,
    other: Option<&'o Obstacle>,
) -> Result<&'o Obstacle, EvaluationError> {
    other.ok_or_else(|| EvaluationError::MissingOperand {
        predicate: predicate.to_owned(),
    })
}
