//! The [`Lane`]: a merged chain of lanelets with its own coordinate frame.

use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use roadrule_core::{LaneId, LaneletId};
use roadrule_geometry::{ContainmentType, CurvilinearCoordinateSystem, Point, Polygon};

use crate::config::RoadNetworkConfig;
use crate::error::NetworkError;
use crate::lanelet::Lanelet;
use crate::types::{LaneletType, RoadUser};

/// An ordered, contiguous chain of lanelets.
///
/// Two lanes are equal when they contain the same lanelet sequence; the
/// [`LaneId`] alone is not unique.
#[derive(Clone, Debug)]
pub struct Lane {
    id: LaneId,
    lanelets: Vec<LaneletId>,
    left: Vec<Point>,
    right: Vec<Point>,
    center: Vec<Point>,
    polygon: Polygon,
    lanelet_polygons: Vec<Polygon>,
    ccs: CurvilinearCoordinateSystem,
    types: BTreeSet<LaneletType>,
    users_one_way: BTreeSet<RoadUser>,
    users_bidirectional: BTreeSet<RoadUser>,
}

impl Lane {
    /// Merge `lanelets` (in travel order) into one lane.
    ///
    /// Repeated lanelets are skipped. A lanelet whose center line ends
    /// where the previous one ends is appended reversed. Assembly stops
    /// at the first lanelet that starts further than
    /// [`RoadNetworkConfig::max_gap`] from the current end. Type and user
    /// sets are the intersection over the kept lanelets.
    pub fn from_lanelets(
        lanelets: &[&Lanelet],
        config: &RoadNetworkConfig,
    ) -> Result<Self, NetworkError> {
        let first = lanelets.first().ok_or(NetworkError::EmptyLane)?;
        let mut kept: Vec<LaneletId> = Vec::with_capacity(lanelets.len());
        let mut left: Vec<Point> = Vec::new();
        let mut right: Vec<Point> = Vec::new();
        let mut center: Vec<Point> = Vec::new();
        let mut lanelet_polygons = Vec::with_capacity(lanelets.len());
        let mut types = first.types().clone();
        let mut users_one_way = first.users_one_way().clone();
        let mut users_bidirectional = first.users_bidirectional().clone();

        for lanelet in lanelets {
            if kept.contains(&lanelet.id()) {
                continue;
            }
            let c = lanelet.center_line();
            let reverse = match (center.last(), c.last()) {
                (Some(end), Some(own_end)) if !kept.is_empty() => {
                    end.distance(*own_end) < config.reverse_tolerance
                }
                _ => false,
            };
            if let Some(end) = center.last() {
                let start = if reverse { c[c.len() - 1] } else { c[0] };
                if start.distance(*end) > config.max_gap {
                    break;
                }
            }
            let shift = usize::from(!kept.is_empty());
            if reverse {
                center.extend(c.iter().rev().skip(shift));
                left.extend(lanelet.left_border().iter().rev().skip(shift));
                right.extend(lanelet.right_border().iter().rev().skip(shift));
            } else {
                center.extend(c.iter().skip(shift));
                left.extend(lanelet.left_border().iter().skip(shift));
                right.extend(lanelet.right_border().iter().skip(shift));
            }
            types.retain(|t| lanelet.has_type(*t));
            users_one_way.retain(|u| lanelet.users_one_way().contains(u));
            users_bidirectional.retain(|u| lanelet.users_bidirectional().contains(u));
            lanelet_polygons.push(lanelet.polygon().clone());
            kept.push(lanelet.id());
        }

        let first_id = first.id();
        let geometry = |source| NetworkError::Geometry {
            lanelet: first_id,
            source,
        };
        let polygon = Polygon::from_borders(&left, &right).map_err(geometry)?;
        let ccs = CurvilinearCoordinateSystem::with_config(&center, config.curvilinear)
            .map_err(geometry)?;

        Ok(Self {
            id: LaneId::from(first_id),
            lanelets: kept,
            left,
            right,
            center,
            polygon,
            lanelet_polygons,
            ccs,
            types,
            users_one_way,
            users_bidirectional,
        })
    }

    /// Lane id (id of the first lanelet).
    pub fn id(&self) -> LaneId {
        self.id
    }

    /// Contained lanelet ids in travel order.
    pub fn lanelet_ids(&self) -> &[LaneletId] {
        &self.lanelets
    }

    /// `true` if `id` is one of the lane's lanelets.
    pub fn contains_lanelet(&self, id: LaneletId) -> bool {
        self.lanelets.contains(&id)
    }

    /// `true` if every lanelet of `other` is also in `self`.
    pub fn contains_lane(&self, other: &Lane) -> bool {
        other.lanelets.iter().all(|id| self.contains_lanelet(*id))
    }

    /// Concatenated left border.
    pub fn left_border(&self) -> &[Point] {
        &self.left
    }

    /// Concatenated right border.
    pub fn right_border(&self) -> &[Point] {
        &self.right
    }

    /// Concatenated center line; the reference path of [`Self::ccs`].
    pub fn center_line(&self) -> &[Point] {
        &self.center
    }

    /// Merged outer polygon.
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// The lane's curvilinear coordinate system.
    pub fn ccs(&self) -> &CurvilinearCoordinateSystem {
        &self.ccs
    }

    /// Length of the reference path.
    pub fn length(&self) -> f64 {
        self.ccs.length()
    }

    /// Types shared by every lanelet of the lane.
    pub fn types(&self) -> &BTreeSet<LaneletType> {
        &self.types
    }

    /// One-way users shared by every lanelet of the lane.
    pub fn users_one_way(&self) -> &BTreeSet<RoadUser> {
        &self.users_one_way
    }

    /// Bidirectional users shared by every lanelet of the lane.
    pub fn users_bidirectional(&self) -> &BTreeSet<RoadUser> {
        &self.users_bidirectional
    }

    /// Test `shape` against the lane.
    ///
    /// Partial containment holds if any constituent lanelet overlaps the
    /// shape. Complete containment is tested against the merged polygon.
    pub fn check_intersection(&self, shape: &Polygon, policy: ContainmentType) -> bool {
        match policy {
            ContainmentType::PartiallyContained => self
                .lanelet_polygons
                .iter()
                .any(|p| p.contains_shape(shape, policy)),
            ContainmentType::CompletelyContained => {
                self.polygon.contains_shape(shape, policy)
                    || self
                        .lanelet_polygons
                        .iter()
                        .any(|p| p.contains_shape(shape, policy))
            }
        }
    }
}

impl PartialEq for Lane {
    fn eq(&self, other: &Self) -> bool {
        self.lanelets == other.lanelets
    }
}

impl Eq for Lane {}

impl Hash for Lane {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lanelets.hash(state);
    }
}
