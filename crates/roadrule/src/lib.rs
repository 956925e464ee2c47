//! roadrule: road-network modelling and traffic-rule predicate evaluation.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all roadrule sub-crates. For most users, adding `roadrule` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use roadrule::prelude::*;
//!
//! // One straight 200 m lanelet, 4 m wide.
//! let lanelet = LaneletBuilder::new(LaneletId(1))
//!     .left_border(vec![Point::new(0.0, 2.0), Point::new(200.0, 2.0)])
//!     .right_border(vec![Point::new(0.0, -2.0), Point::new(200.0, -2.0)])
//!     .build()
//!     .unwrap();
//! let network = Arc::new(RoadNetworkBuilder::new().lanelet(lanelet).build().unwrap());
//!
//! let car = |id: u64, x: f64| {
//!     ObstacleBuilder::new(ObstacleId(id), ObstacleRole::Dynamic)
//!         .state(State {
//!             time_step: TimeStep(0),
//!             position: Point::new(x, 0.0),
//!             velocity: 10.0,
//!             acceleration: 0.0,
//!             orientation: 0.0,
//!         })
//!         .build()
//!         .unwrap()
//! };
//! let world = World::new(
//!     "quickstart",
//!     TimeStep(0),
//!     network,
//!     vec![car(1, 50.0)],
//!     vec![car(2, 90.0)],
//!     0.1,
//! )
//! .unwrap();
//! let world = Arc::new(world);
//!
//! let manager = PredicateManager::new(
//!     ManagerConfig::default(),
//!     PredicateRegistry::with_defaults(),
//!     PredicateParameters::default(),
//! )
//! .unwrap();
//! let units =
//!     EvaluationUnit::for_world(&world, manager.registry(), &["safe_distance", "in_front_of"])
//!         .unwrap();
//! let report = manager.evaluate(&world, units);
//! assert_eq!(report.results.len(), 2);
//! assert_eq!(report.satisfied(), 2);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `roadrule-core` | IDs, parameter records, memo cache |
//! | [`geometry`] | `roadrule-geometry` | Points, polygons, shapes, curvilinear coordinates |
//! | [`network`] | `roadrule-network` | Lanelets, lanes, intersections, traffic control, road network |
//! | [`obstacle`] | `roadrule-obstacle` | Obstacles, occupancy, reference lanes |
//! | [`predicate`] | `roadrule-predicate` | Predicate traits, built-in rules, registry, statistics |
//! | [`engine`] | `roadrule-engine` | Worlds and the multi-threaded predicate manager |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, IDs, and parameter records (`roadrule-core`).
pub use roadrule_core as types;

/// Planar geometry and the curvilinear coordinate system
/// (`roadrule-geometry`).
///
/// [`geometry::CurvilinearCoordinateSystem`] maps Cartesian points to
/// `(s, d)` along a reference path and back.
pub use roadrule_geometry as geometry;

/// Road topology (`roadrule-network`).
///
/// Build a [`network::RoadNetwork`] from [`network::Lanelet`]s with
/// [`network::RoadNetworkBuilder`]; lanes are assembled and interned on
/// demand.
pub use roadrule_network as network;

/// Traffic participants (`roadrule-obstacle`).
pub use roadrule_obstacle as obstacle;

/// Predicate framework and built-in rules (`roadrule-predicate`).
///
/// Implement [`predicate::Predicate`] for new obstacle-level rules and
/// register them in a [`predicate::PredicateRegistry`].
pub use roadrule_predicate as predicate;

/// Worlds and batch evaluation (`roadrule-engine`).
pub use roadrule_engine as engine;

/// Common imports for typical roadrule usage.
///
/// ```rust
/// use roadrule::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use roadrule_core::{
        ActuatorParameters, LaneId, LaneletId, ObstacleId, PredicateParameters, SensorParameters,
        TimeStep,
    };

    // Geometry
    pub use roadrule_geometry::{CurvilinearCoordinateSystem, Point, Polygon, Shape};

    // Road network
    pub use roadrule_network::{
        DrivingDirection, Lane, Lanelet, LaneletBuilder, LaneletType, RoadNetwork,
        RoadNetworkBuilder,
    };

    // Obstacles
    pub use roadrule_obstacle::{Obstacle, ObstacleBuilder, ObstacleRole, State};

    // Predicates
    pub use roadrule_predicate::{
        Constraint, EvaluationContext, EvaluationError, LanePredicate, Predicate,
        PredicateRegistry,
    };

    // Engine
    pub use roadrule_engine::{
        BatchReport, EvaluationUnit, ManagerConfig, PredicateManager, World,
    };
}
