//! Planar geometry for road networks and traffic participants.
//!
//! This crate has no internal dependencies. It provides the primitives
//! every other roadrule crate builds on:
//!
//! - [`Point`] and [`BoundingBox`]: 2D vectors and axis-aligned bounds
//! - [`Polygon`]: closed simple rings with overlap and containment tests
//!   under both [`ContainmentType`] policies
//! - [`Shape`]: rectangle and circle footprints placed at a pose
//! - [`CurvilinearCoordinateSystem`]: the `(x, y) <-> (s, d)` transform
//!   along a reference polyline
//!
//! All coordinates are metres in a right-handed Cartesian frame;
//! angles are radians, counter-clockwise from the x axis.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bbox;
pub mod ccs;
pub mod error;
pub mod point;
pub mod polygon;
pub mod shape;

pub use bbox::BoundingBox;
pub use ccs::{CurvilinearConfig, CurvilinearCoordinateSystem};
pub use error::{GeometryError, ProjectionError};
pub use point::{wrap_angle, Point};
pub use polygon::{ContainmentType, Polygon};
pub use shape::Shape;
