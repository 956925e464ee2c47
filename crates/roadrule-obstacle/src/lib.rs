//! Traffic participants and their resolved position on the road network.
//!
//! An [`Obstacle`] carries a shape, actuator and sensor limits, and a
//! time-indexed trajectory. Everything derived from the trajectory and a
//! [`RoadNetwork`](roadrule_network::RoadNetwork) is computed lazily and
//! memoized per key:
//!
//! | Quantity | Key | Accessor |
//! |----------|-----|----------|
//! | lanelets overlapped by the shape | time step | [`Obstacle::occupied_lanelets_by_shape`] |
//! | overlapped lanelets in driving direction | time step | [`Obstacle::occupied_lanelets_driving_direction`] |
//! | lanes through the occupied lanelets | time step | [`Obstacle::occupied_lanes`] |
//! | reference lane | time step | [`Obstacle::reference_lane`] |
//! | curvilinear position and orientation | time step, lane | [`Obstacle::curvilinear_state`] |
//!
//! Each entry is computed at most once, even under concurrent first
//! access, and is never invalidated. An obstacle must therefore always
//! be queried against the same road network.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod cache;
pub mod error;
pub mod obstacle;
mod reference;
pub mod state;

pub use error::ObstacleError;
pub use obstacle::{Obstacle, ObstacleBuilder, ObstacleRole, ObstacleType};
pub use reference::CurvilinearState;
pub use state::{SignalState, State};
