//! Hand-built road networks.
//!
//! Every lanelet is a straight strip along the x axis; lanelet `i` of a
//! road with `n` parallel lanes is centered on `y = i * width`.

use roadrule_core::LaneletId;
use roadrule_geometry::Point;
use roadrule_network::{
    DrivingDirection, IncomingGroup, Intersection, IntersectionId, LaneletBuilder, LaneletType,
    RoadNetwork, RoadNetworkBuilder, RoadUser,
};

/// Lane width used by every fixture.
pub const LANE_WIDTH: f64 = 4.0;

fn strip(id: u64, x0: f64, x1: f64, y: f64) -> LaneletBuilder {
    let half = LANE_WIDTH / 2.0;
    let xs = [x0, (x0 + x1) / 2.0, x1];
    LaneletBuilder::new(LaneletId(id))
        .left_border(xs.iter().map(|&x| Point::new(x, y + half)).collect())
        .right_border(xs.iter().map(|&x| Point::new(x, y - half)).collect())
        .lanelet_type(LaneletType::Urban)
        .user_one_way(RoadUser::Vehicle)
}

/// Two parallel same-direction lanelets, `1` (right, y = 0) and `2`
/// (left, y = 4), each 200 m long.
pub fn two_lane_road() -> RoadNetwork {
    RoadNetworkBuilder::new()
        .lanelet(
            strip(1, 0.0, 200.0, 0.0)
                .adjacent_left(LaneletId(2), DrivingDirection::Same)
                .build()
                .expect("lanelet 1"),
        )
        .lanelet(
            strip(2, 0.0, 200.0, LANE_WIDTH)
                .adjacent_right(LaneletId(1), DrivingDirection::Same)
                .build()
                .expect("lanelet 2"),
        )
        .build()
        .expect("two-lane road")
}

/// A single lane made of `segments` successive 50 m lanelets with ids
/// `10, 11, ...`, starting at x = 0.
pub fn chained_road(segments: u64) -> RoadNetwork {
    let mut builder = RoadNetworkBuilder::new();
    for i in 0..segments {
        let id = 10 + i;
        let x0 = 50.0 * i as f64;
        let mut l = strip(id, x0, x0 + 50.0, 0.0);
        if i > 0 {
            l = l.predecessor(LaneletId(id - 1));
        }
        if i + 1 < segments {
            l = l.successor(LaneletId(id + 1));
        }
        builder = builder.lanelet(l.build().expect("chained lanelet"));
    }
    builder.build().expect("chained road")
}

/// `lanes` parallel same-direction lanes of `segments` successive 50 m
/// lanelets each. Lanelet `1000 * (lane + 1) + segment` is centered on
/// `y = lane * LANE_WIDTH`; lane 0 is the rightmost.
pub fn highway(lanes: u64, segments: u64) -> RoadNetwork {
    let id = |lane: u64, seg: u64| LaneletId(1000 * (lane + 1) + seg);
    let mut builder = RoadNetworkBuilder::new();
    for lane in 0..lanes {
        for seg in 0..segments {
            let x0 = 50.0 * seg as f64;
            let mut l = strip(id(lane, seg).0, x0, x0 + 50.0, LANE_WIDTH * lane as f64)
                .lanelet_type(LaneletType::Interstate);
            if seg > 0 {
                l = l.predecessor(id(lane, seg - 1));
            }
            if seg + 1 < segments {
                l = l.successor(id(lane, seg + 1));
            }
            if lane > 0 {
                l = l.adjacent_right(id(lane - 1, seg), DrivingDirection::Same);
            }
            if lane + 1 < lanes {
                l = l.adjacent_left(id(lane + 1, seg), DrivingDirection::Same);
            }
            builder = builder.lanelet(l.build().expect("highway lanelet"));
        }
    }
    builder.build().expect("highway")
}

/// A road that forks: `1 -> 2` straight on, `1 -> 3` into a parallel
/// lanelet on the left. Lanelet 1 is an incoming lanelet of
/// intersection 100.
pub fn forked_road() -> RoadNetwork {
    RoadNetworkBuilder::new()
        .lanelet(
            strip(1, 0.0, 50.0, 0.0)
                .successor(LaneletId(2))
                .successor(LaneletId(3))
                .build()
                .expect("lanelet 1"),
        )
        .lanelet(
            strip(2, 50.0, 100.0, 0.0)
                .predecessor(LaneletId(1))
                .build()
                .expect("lanelet 2"),
        )
        .lanelet(
            LaneletBuilder::new(LaneletId(3))
                .left_border(vec![Point::new(50.0, 2.0), Point::new(100.0, 6.0)])
                .right_border(vec![Point::new(50.0, -2.0), Point::new(100.0, 2.0)])
                .predecessor(LaneletId(1))
                .build()
                .expect("lanelet 3"),
        )
        .intersection(Intersection {
            id: IntersectionId(100),
            incomings: vec![IncomingGroup {
                id: 1,
                incoming_lanelets: vec![LaneletId(1)],
                straight_outgoings: vec![LaneletId(2)],
                left_outgoings: vec![LaneletId(3)],
                ..Default::default()
            }],
        })
        .build()
        .expect("forked road")
}
