//! Per-obstacle memo tables.

use std::sync::Arc;

use roadrule_core::{LaneletId, Memo, TimeStep};
use roadrule_network::Lane;

use crate::error::ObstacleError;
use crate::reference::CurvilinearState;

pub(crate) type Lanelets = Result<Arc<[LaneletId]>, ObstacleError>;
pub(crate) type Lanes = Result<Arc<[Arc<Lane>]>, ObstacleError>;
pub(crate) type Curvilinear = Result<CurvilinearState, ObstacleError>;

/// Derived data of one obstacle, keyed by time step (and lane).
#[derive(Debug, Default)]
pub(crate) struct ObstacleCaches {
    pub(crate) by_shape: Memo<TimeStep, Lanelets>,
    pub(crate) heading_aligned: Memo<TimeStep, Lanelets>,
    pub(crate) driving_direction: Memo<TimeStep, Lanelets>,
    pub(crate) lanes: Memo<TimeStep, Lanes>,
    pub(crate) reference_lane: Memo<TimeStep, Result<Arc<Lane>, ObstacleError>>,
    pub(crate) curvilinear: Memo<(TimeStep, Vec<LaneletId>), Curvilinear>,
}
