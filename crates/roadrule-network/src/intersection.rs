//! Intersections and their incoming groups.

use std::fmt;

use roadrule_core::LaneletId;

use crate::types::TurningDirection;

/// Identifies an intersection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntersectionId(pub u64);

impl fmt::Display for IntersectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lanelets entering an intersection from one approach, with the
/// outgoing lanelets reachable from them grouped by turn direction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IncomingGroup {
    /// Group id, unique within the intersection.
    pub id: u64,
    /// Lanelets that lead into the intersection.
    pub incoming_lanelets: Vec<LaneletId>,
    /// Outgoing lanelets reached by driving straight.
    pub straight_outgoings: Vec<LaneletId>,
    /// Outgoing lanelets reached by turning left.
    pub left_outgoings: Vec<LaneletId>,
    /// Outgoing lanelets reached by turning right.
    pub right_outgoings: Vec<LaneletId>,
    /// Lanelets crossed when leaving through this group.
    pub crossing_lanelets: Vec<LaneletId>,
    /// Incoming group on the left, for right-of-way resolution.
    pub left_of: Option<u64>,
}

impl IncomingGroup {
    /// Outgoing lanelets for `direction`.
    pub fn outgoings(&self, direction: TurningDirection) -> &[LaneletId] {
        match direction {
            TurningDirection::Straight => &self.straight_outgoings,
            TurningDirection::Left => &self.left_outgoings,
            TurningDirection::Right => &self.right_outgoings,
        }
    }

    /// Turning direction that leads to `outgoing`, if it belongs to this group.
    pub fn turning_direction_to(&self, outgoing: LaneletId) -> Option<TurningDirection> {
        [
            TurningDirection::Straight,
            TurningDirection::Left,
            TurningDirection::Right,
        ]
        .into_iter()
        .find(|d| self.outgoings(*d).contains(&outgoing))
    }

    /// Every lanelet id referenced by the group.
    pub fn all_lanelets(&self) -> impl Iterator<Item = LaneletId> + '_ {
        self.incoming_lanelets
            .iter()
            .chain(&self.straight_outgoings)
            .chain(&self.left_outgoings)
            .chain(&self.right_outgoings)
            .chain(&self.crossing_lanelets)
            .copied()
    }
}

/// An intersection made of incoming groups.
#[derive(Clone, Debug, PartialEq)]
pub struct Intersection {
    /// Unique id.
    pub id: IntersectionId,
    /// Approaches into the intersection.
    pub incomings: Vec<IncomingGroup>,
}

impl Intersection {
    /// The incoming group containing `lanelet` as an incoming lanelet.
    pub fn incoming_for(&self, lanelet: LaneletId) -> Option<&IncomingGroup> {
        self.incomings
            .iter()
            .find(|g| g.incoming_lanelets.contains(&lanelet))
    }

    /// Ids of every incoming lanelet of every group.
    pub fn incoming_lanelets(&self) -> impl Iterator<Item = LaneletId> + '_ {
        self.incomings
            .iter()
            .flat_map(|g| g.incoming_lanelets.iter().copied())
    }
}
