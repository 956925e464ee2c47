//! Precondition errors for parameter records.

use std::error::Error;
use std::fmt;

/// Errors raised when a parameter record is constructed or updated with
/// a value outside its documented domain.
#[derive(Clone, Debug, PartialEq)]
pub enum ParameterError {
    /// A value violates its domain constraint.
    InvalidValue {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// Human-readable constraint, e.g. `">= 0"`.
        constraint: &'static str,
    },
    /// Two parameters are individually valid but inconsistent.
    Inconsistent {
        /// Description of the violated relation.
        reason: String,
    },
    /// A predicate parameter name is not part of the parameter table.
    UnknownParameter {
        /// The unrecognised name.
        name: String,
    },
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue {
                name,
                value,
                constraint,
            } => write!(f, "parameter '{name}' must be {constraint}, got {value}"),
            Self::Inconsistent { reason } => write!(f, "inconsistent parameters: {reason}"),
            Self::UnknownParameter { name } => write!(f, "unknown predicate parameter '{name}'"),
        }
    }
}

impl Error for ParameterError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_parameter() {
        let e = ParameterError::InvalidValue {
            name: "v_max",
            value: -1.0,
            constraint: ">= 0",
        };
        assert_eq!(e.to_string(), "parameter 'v_max' must be >= 0, got -1");
    }

    #[test]
    fn unknown_parameter_display() {
        let e = ParameterError::UnknownParameter {
            name: "bogus".into(),
        };
        assert!(e.to_string().contains("bogus"));
    }
}
