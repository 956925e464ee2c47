//! Structural errors for road-network construction and lane assembly.

use std::error::Error;
use std::fmt;

use roadrule_core::LaneletId;
use roadrule_geometry::GeometryError;

/// Errors from building or querying a [`RoadNetwork`](crate::RoadNetwork).
#[derive(Clone, Debug, PartialEq)]
pub enum NetworkError {
    /// Left and right borders of a lanelet have different vertex counts.
    BorderLengthMismatch {
        /// The offending lanelet.
        lanelet: LaneletId,
        /// Left border vertex count.
        left: usize,
        /// Right border vertex count.
        right: usize,
    },
    /// A lanelet has fewer than two border vertices.
    TooFewVertices {
        /// The offending lanelet.
        lanelet: LaneletId,
        /// Vertices per border.
        count: usize,
    },
    /// An id was referenced but no lanelet with that id exists.
    UnknownLanelet {
        /// The missing id.
        id: LaneletId,
    },
    /// Two lanelets share an id.
    DuplicateLanelet {
        /// The repeated id.
        id: LaneletId,
    },
    /// A lanelet references a regulatory element that is not registered.
    UnknownRegulatoryElement {
        /// The lanelet holding the reference.
        lanelet: LaneletId,
        /// Kind of element (`"traffic sign"` or `"traffic light"`).
        kind: &'static str,
        /// The missing element id.
        id: u64,
    },
    /// Lane assembly was asked to build a lane from no lanelets.
    EmptyLane,
    /// Derived geometry (polygon or reference path) could not be built.
    Geometry {
        /// Lanelet (or first lanelet of the lane) being built.
        lanelet: LaneletId,
        /// The underlying geometry error.
        source: GeometryError,
    },
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BorderLengthMismatch {
                lanelet,
                left,
                right,
            } => write!(
                f,
                "lanelet {lanelet}: left border has {left} vertices, right border has {right}"
            ),
            Self::TooFewVertices { lanelet, count } => {
                write!(f, "lanelet {lanelet}: borders need at least 2 vertices, got {count}")
            }
            Self::UnknownLanelet { id } => write!(f, "unknown lanelet {id}"),
            Self::DuplicateLanelet { id } => write!(f, "duplicate lanelet id {id}"),
            Self::UnknownRegulatoryElement { lanelet, kind, id } => {
                write!(f, "lanelet {lanelet} references unknown {kind} {id}")
            }
            Self::EmptyLane => write!(f, "lane requires at least one lanelet"),
            Self::Geometry { lanelet, source } => {
                write!(f, "geometry of lanelet {lanelet}: {source}")
            }
        }
    }
}

impl Error for NetworkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Geometry { source, .. } => Some(source),
            _ => None,
        }
    }
}
