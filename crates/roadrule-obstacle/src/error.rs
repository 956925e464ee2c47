//! Errors raised while resolving an obstacle against the road network.

use std::error::Error;
use std::fmt;

use roadrule_core::{ObstacleId, ParameterError, TimeStep};
use roadrule_geometry::{GeometryError, ProjectionError};
use roadrule_network::NetworkError;

/// Errors from obstacle construction and occupancy queries.
#[derive(Clone, Debug, PartialEq)]
pub enum ObstacleError {
    /// Neither occupancy pass produced a candidate lane.
    NoReferenceLane {
        /// The obstacle.
        obstacle: ObstacleId,
        /// The queried time step.
        time_step: TimeStep,
    },
    /// A position could not be projected onto a lane's reference path.
    Projection {
        /// The obstacle.
        obstacle: ObstacleId,
        /// The queried time step.
        time_step: TimeStep,
        /// Cartesian x of the position.
        x: f64,
        /// Cartesian y of the position.
        y: f64,
        /// The reference path as `(x, y)` pairs, one per line.
        reference_path: String,
        /// The underlying projection failure.
        source: ProjectionError,
    },
    /// The trajectory has no state at the requested time step.
    MissingState {
        /// The obstacle.
        obstacle: ObstacleId,
        /// The requested time step.
        time_step: TimeStep,
    },
    /// The obstacle's shape could not be placed.
    Geometry {
        /// The obstacle.
        obstacle: ObstacleId,
        /// The underlying geometry error.
        source: GeometryError,
    },
    /// A road-network query failed.
    Network(NetworkError),
    /// Actuator or sensor parameters violate their domain.
    Parameter(ParameterError),
}

impl fmt::Display for ObstacleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoReferenceLane {
                obstacle,
                time_step,
            } => write!(
                f,
                "No matching referenceLane found! Obstacle ID {obstacle} at time step {time_step}"
            ),
            Self::Projection {
                obstacle,
                time_step,
                x,
                y,
                reference_path,
                source,
            } => write!(
                f,
                "obstacle {obstacle} at time step {time_step}: cannot project ({x}, {y}): {source}\nreference path:\n{reference_path}"
            ),
            Self::MissingState {
                obstacle,
                time_step,
            } => write!(f, "obstacle {obstacle} has no state at time step {time_step}"),
            Self::Geometry { obstacle, source } => {
                write!(f, "obstacle {obstacle}: invalid occupancy: {source}")
            }
            Self::Network(e) => write!(f, "road network: {e}"),
            Self::Parameter(e) => write!(f, "parameter: {e}"),
        }
    }
}

impl Error for ObstacleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Projection { source, .. } => Some(source),
            Self::Geometry { source, .. } => Some(source),
            Self::Network(e) => Some(e),
            Self::Parameter(e) => Some(e),
            _ => None,
        }
    }
}

impl From<NetworkError> for ObstacleError {
    fn from(e: NetworkError) -> Self {
        Self::Network(e)
    }
}

impl From<ParameterError> for ObstacleError {
    fn from(e: ParameterError) -> Self {
        Self::Parameter(e)
    }
}
