//! Error types for geometry construction and coordinate projection.

use std::error::Error;
use std::fmt;

/// Errors raised when geometry is constructed from invalid input.
#[derive(Clone, Debug, PartialEq)]
pub enum GeometryError {
    /// A reference path has fewer than two distinct points.
    DegeneratePath {
        /// Number of distinct points after removing duplicates.
        distinct_points: usize,
    },
    /// A reference path folds back onto itself at a vertex, so no
    /// lateral direction can be defined there.
    Cusp {
        /// Index of the offending vertex (after duplicate removal).
        index: usize,
    },
    /// A polygon has fewer than three distinct vertices.
    EmptyPolygon {
        /// Number of distinct vertices supplied.
        vertices: usize,
    },
    /// A shape dimension is not finite and positive.
    InvalidDimension {
        /// Dimension name, e.g. `"length"`.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegeneratePath { distinct_points } => write!(
                f,
                "reference path needs at least 2 distinct points, got {distinct_points}"
            ),
            Self::Cusp { index } => write!(f, "reference path folds back at vertex {index}"),
            Self::EmptyPolygon { vertices } => {
                write!(f, "polygon needs at least 3 distinct vertices, got {vertices}")
            }
            Self::InvalidDimension { name, value } => {
                write!(f, "shape {name} must be finite and positive, got {value}")
            }
        }
    }
}

impl Error for GeometryError {}

/// Errors raised when a point cannot be placed on a reference path.
#[derive(Clone, Debug, PartialEq)]
pub enum ProjectionError {
    /// No segment of the reference path admits a perpendicular foot
    /// for the query point (it lies before the start or after the end).
    OutOfDomain {
        /// Query x.
        x: f64,
        /// Query y.
        y: f64,
    },
    /// The nearest foot is further away than the lateral corridor.
    OutOfCorridor {
        /// Query x.
        x: f64,
        /// Query y.
        y: f64,
        /// Unsigned lateral distance to the nearest foot.
        distance: f64,
        /// Configured corridor half-width.
        limit: f64,
    },
    /// A longitudinal coordinate lies outside `[0, length]`.
    LongitudinalOutOfRange {
        /// Requested s.
        s: f64,
        /// Path length.
        length: f64,
    },
    /// A lateral coordinate exceeds the corridor half-width.
    LateralOutOfRange {
        /// Requested d.
        d: f64,
        /// Configured corridor half-width.
        limit: f64,
    },
}

impl fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfDomain { x, y } => {
                write!(f, "point ({x}, {y}) has no projection onto the reference path")
            }
            Self::OutOfCorridor {
                x,
                y,
                distance,
                limit,
            } => write!(
                f,
                "point ({x}, {y}) is {distance} from the reference path, corridor is {limit}"
            ),
            Self::LongitudinalOutOfRange { s, length } => {
                write!(f, "longitudinal coordinate {s} outside [0, {length}]")
            }
            Self::LateralOutOfRange { d, limit } => {
                write!(f, "lateral coordinate {d} exceeds corridor {limit}")
            }
        }
    }
}

impl Error for ProjectionError {}
