//! Tunables for lane assembly and path search.

use roadrule_geometry::CurvilinearConfig;

/// Configuration of a [`RoadNetwork`](crate::RoadNetwork).
#[derive(Clone, Debug, PartialEq)]
pub struct RoadNetworkConfig {
    /// Default forward horizon for lane assembly, metres. Default: 250.
    pub lane_fov_front: f64,
    /// Default backward horizon for lane assembly, metres. Default: 250.
    pub lane_fov_rear: f64,
    /// Number of intersections a lane may run through before assembly
    /// stops extending it. Default: 1.
    pub max_intersections_in_lane: i32,
    /// Maximum number of lanelets on a route considered by
    /// [`RoadNetwork::lanelets_on_paths`](crate::RoadNetwork::lanelets_on_paths).
    /// Default: 50.
    pub path_search_depth: usize,
    /// Two lanelet end points closer than this are treated as meeting
    /// head-on, so the later lanelet is appended reversed. Default: 0.1.
    pub reverse_tolerance: f64,
    /// A gap between consecutive lanelets larger than this cuts the lane.
    /// Default: 10.0.
    pub max_gap: f64,
    /// Tolerances of the lane coordinate systems.
    pub curvilinear: CurvilinearConfig,
}

impl Default for RoadNetworkConfig {
    fn default() -> Self {
        Self {
            lane_fov_front: 250.0,
            lane_fov_rear: 250.0,
            max_intersections_in_lane: 1,
            path_search_depth: 50,
            reverse_tolerance: 0.1,
            max_gap: 10.0,
            curvilinear: CurvilinearConfig::default(),
        }
    }
}
