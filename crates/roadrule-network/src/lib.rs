//! Road-network topology for roadrule.
//!
//! A [`RoadNetwork`] owns every [`Lanelet`] of a scenario in a flat arena
//! indexed by [`LaneletId`](roadrule_core::LaneletId). Neighbour relations
//! (predecessor, successor, left/right adjacency) are stored as id lists
//! and resolved through the network, so the lanelet graph carries no
//! ownership cycles.
//!
//! On top of the arena the network provides:
//!
//! - shape-based occupancy queries ([`RoadNetwork::find_occupied_lanelets_by_shape`])
//! - bounded path search over the [`LaneletGraph`]
//! - on-demand [`Lane`] assembly from successor/predecessor chains, with
//!   lanes interned by their lanelet sequence
//! - intersections and regulatory elements (traffic signs, traffic
//!   lights, stop lines)

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod assembly;
pub mod config;
pub mod error;
pub mod graph;
pub mod intersection;
pub mod lane;
pub mod lanelet;
pub mod network;
pub mod traffic;
pub mod types;

pub use config::RoadNetworkConfig;
pub use error::NetworkError;
pub use graph::LaneletGraph;
pub use intersection::{IncomingGroup, Intersection, IntersectionId};
pub use lane::Lane;
pub use lanelet::{Adjacency, Lanelet, LaneletBuilder};
pub use network::{RoadNetwork, RoadNetworkBuilder};
pub use traffic::{
    StopLine, TrafficLight, TrafficLightColor, TrafficLightCycleElement, TrafficLightId,
    TrafficSign, TrafficSignElement, TrafficSignId,
};
pub use types::{DrivingDirection, LaneletType, LineMarking, RoadUser, TurningDirection};
