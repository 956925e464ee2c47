//! Errors from batch evaluation.

use std::error::Error;
use std::fmt;

use roadrule_core::{ObstacleId, TimeStep};
use roadrule_predicate::EvaluationError;

use crate::config::ConfigError;

/// Error from a batch operation.
///
/// [`Evaluation`](Self::Evaluation) and
/// [`WorkerPanicked`](Self::WorkerPanicked) describe a single unit and are
/// recorded in the report; the batch continues.
#[derive(Clone, Debug, PartialEq)]
pub enum BatchError {
    /// One unit's predicate evaluation failed.
    Evaluation {
        /// The unit's ego obstacle.
        obstacle: ObstacleId,
        /// The unit's time step.
        time_step: TimeStep,
        /// The unit's predicate.
        predicate: String,
        /// The underlying error.
        error: EvaluationError,
    },
    /// Manager or world configuration is invalid.
    Config(ConfigError),
    /// Building the unit list failed, e.g. on an unknown predicate name.
    Predicate(EvaluationError),
    /// The worker evaluating a unit died before replying.
    WorkerPanicked,
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Evaluation {
                obstacle,
                time_step,
                predicate,
                error,
            } => write!(
                f,
                "predicate '{predicate}' failed for obstacle {obstacle} at time step {time_step}: {error}"
            ),
            Self::Config(e) => write!(f, "config error: {e}"),
            Self::Predicate(e) => write!(f, "{e}"),
            Self::WorkerPanicked => write!(f, "worker thread panicked"),
        }
    }
}

impl Error for BatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Evaluation { error, .. } => Some(error),
            Self::Config(e) => Some(e),
            Self::Predicate(e) => Some(e),
            Self::WorkerPanicked => None,
        }
    }
}

impl From<ConfigError> for BatchError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<EvaluationError> for BatchError {
    fn from(e: EvaluationError) -> Self {
        Self::Predicate(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluation_message_names_unit() {
        let e = BatchError::Evaluation {
            obstacle: ObstacleId(7),
            time_step: TimeStep(3),
            predicate: "in_standstill".into(),
            error: EvaluationError::InvalidInput {
                reason: "nan".into(),
            },
        };
        let msg = e.to_string();
        assert!(msg.contains("'in_standstill'"));
        assert!(msg.contains("obstacle 7"));
        assert!(msg.contains("time step 3"));
        assert!(e.source().is_some());
    }
}
