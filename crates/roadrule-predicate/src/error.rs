//! Errors from predicate evaluation.

use std::error::Error;
use std::fmt;

use roadrule_core::ParameterError;
use roadrule_obstacle::ObstacleError;

/// One of the three evaluation forms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EvaluationMode {
    /// `bool` result.
    Boolean,
    /// Signed real-valued margin.
    Robust,
    /// Linear constraint.
    Constraint,
}

impl fmt::Display for EvaluationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Boolean => "boolean",
            Self::Robust => "robust",
            Self::Constraint => "constraint",
        };
        f.write_str(s)
    }
}

/// Errors from evaluating a predicate.
#[derive(Clone, Debug, PartialEq)]
pub enum EvaluationError {
    /// The predicate has no meaningful result in this form.
    Unsupported {
        /// Predicate name.
        predicate: String,
        /// The requested form.
        mode: EvaluationMode,
    },
    /// No predicate with this name is registered.
    UnknownPredicate {
        /// The requested name.
        name: String,
    },
    /// The predicate needs a second obstacle but none was given.
    MissingOperand {
        /// Predicate name.
        predicate: String,
    },
    /// Resolving an obstacle failed.
    Obstacle(ObstacleError),
    /// A parameter lookup or value failed.
    Parameter(ParameterError),
    /// Numeric inputs outside the predicate's domain.
    InvalidInput {
        /// What is wrong.
        reason: String,
    },
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported { predicate, mode } => {
                write!(f, "{mode} evaluation not supported by predicate '{predicate}'")
            }
            Self::UnknownPredicate { name } => write!(f, "unknown predicate '{name}'"),
            Self::MissingOperand { predicate } => {
                write!(f, "predicate '{predicate}' requires a second obstacle")
            }
            Self::Obstacle(e) => write!(f, "{e}"),
            Self::Parameter(e) => write!(f, "{e}"),
            Self::InvalidInput { reason } => write!(f, "invalid input: {reason}"),
        }
    }
}

impl Error for EvaluationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Obstacle(e) => Some(e),
            Self::Parameter(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ObstacleError> for EvaluationError {
    fn from(e: ObstacleError) -> Self {
        Self::Obstacle(e)
    }
}

impl From<ParameterError> for EvaluationError {
    fn from(e: ParameterError) -> Self {
        Self::Parameter(e)
    }
}
