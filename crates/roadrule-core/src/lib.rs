//! Core types for the roadrule traffic-rule framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the identifiers, parameter records, and precondition errors shared by
//! the geometry, road-network, obstacle, and predicate crates, plus the
//! [`Memo`] table behind every lazily computed cache.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod memo;
pub mod params;
pub mod predicate_params;

pub use error::ParameterError;
pub use id::{LaneId, LaneletId, ObstacleId, TimeStep};
pub use memo::Memo;
pub use params::{ActuatorParameters, SensorParameters};
pub use predicate_params::PredicateParameters;
