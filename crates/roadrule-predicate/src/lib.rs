//! Traffic-rule predicates for roadrule.
//!
//! A predicate answers a question about one or two obstacles (or two
//! lanes) at a time step, in up to three forms:
//!
//! | Form | Result | Meaning |
//! |------|--------|---------|
//! | boolean | `bool` | whether the rule holds |
//! | robust | `f64` | signed margin; positive when the rule holds |
//! | constraint | [`Constraint`] | bound on the primary obstacle's longitudinal position |
//!
//! Forms a predicate cannot express fail with
//! [`EvaluationError::Unsupported`] instead of returning a placeholder
//! value.
//!
//! Predicates are registered by name in a [`PredicateRegistry`], which
//! owns one [`PredicateStatistics`] record per predicate. Evaluating
//! through the registry records timing and satisfaction counts; calling
//! the trait methods directly does not.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod context;
pub mod error;
pub mod predicate;
pub mod predicates;
pub mod registry;
pub mod statistics;

pub use context::EvaluationContext;
pub use error::{EvaluationError, EvaluationMode};
pub use predicate::{Constraint, LanePredicate, Predicate};
pub use predicates::{InFrontOf, InLane, InSameLane, InStandstill, SafeDistance};
pub use registry::PredicateRegistry;
pub use statistics::{PredicateStatistics, StatisticsSnapshot};
