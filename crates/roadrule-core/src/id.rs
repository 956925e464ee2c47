//! Strongly-typed identifiers for lanelets, lanes, obstacles, and time steps.

use std::fmt;

/// Identifies a lanelet within a road network.
///
/// Assigned by the scenario loader; unique within one
/// road network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LaneletId(pub u64);

impl fmt::Display for LaneletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for LaneletId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Identifies a lane.
///
/// By convention a lane takes the id of its first lanelet, so two
/// distinct lanes may share a `LaneId` when they start on the same
/// lanelet and diverge later. Lane equality is decided by the full
/// lanelet sequence, never by this id alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LaneId(pub u64);

impl fmt::Display for LaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for LaneId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

impl From<LaneletId> for LaneId {
    fn from(v: LaneletId) -> Self {
        Self(v.0)
    }
}

/// Identifies an obstacle (ego vehicle, traffic participant, or
/// environment object) within a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObstacleId(pub u64);

impl fmt::Display for ObstacleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ObstacleId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Discrete scenario time step.
///
/// Multiply by the world's time-step size to get seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeStep(pub u64);

impl TimeStep {
    /// The following time step.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// The preceding time step, or `None` at step zero.
    pub fn prev(self) -> Option<Self> {
        self.0.checked_sub(1).map(Self)
    }

    /// Iterate every time step in `self..=last`.
    ///
    /// Empty when `last < self`.
    pub fn through(self, last: TimeStep) -> impl Iterator<Item = TimeStep> {
        (self.0..=last.0).map(TimeStep)
    }
}

impl fmt::Display for TimeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TimeStep {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
