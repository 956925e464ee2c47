//! Greedy lane assembly from successor and predecessor chains.
//!
//! Starting from one lanelet, [`chains_forward`] and [`chains_backward`]
//! enumerate every chain that reaches the longitudinal horizon (or ends
//! earlier at a dead end, a loop, or after too many intersections).
//! [`lane_sequences`] joins each backward chain with each forward chain
//! through the base lanelet. The result is a set of candidate lanelet
//! sequences, not a global optimum.

use roadrule_core::LaneletId;
use roadrule_geometry::Point;

use crate::error::NetworkError;
use crate::lanelet::Lanelet;
use crate::network::RoadNetwork;
use crate::types::LaneletType;

#[derive(Clone, Copy)]
enum Direction {
    Forward,
    Backward,
}

/// Every successor chain starting at `start`.
///
/// `offset` is added to the accumulated chain length before comparing it
/// with `horizon`; pass the negative distance already travelled along
/// `start` to measure from a position inside it. A chain stops extending
/// once its length reaches `horizon`, once it would revisit a lanelet, or
/// once it has entered more than `max_intersections` intersections.
/// Border lanelets are never appended.
pub fn chains_forward(
    network: &RoadNetwork,
    start: &Lanelet,
    horizon: f64,
    max_intersections: i32,
    offset: f64,
) -> Result<Vec<Vec<LaneletId>>, NetworkError> {
    let mut out = Vec::new();
    walk(
        network,
        start,
        Direction::Forward,
        horizon,
        max_intersections,
        Vec::new(),
        offset,
        &mut out,
    )?;
    Ok(out)
}

/// Every predecessor chain starting at `start`, nearest lanelet first.
///
/// The mirror image of [`chains_forward`].
pub fn chains_backward(
    network: &RoadNetwork,
    start: &Lanelet,
    horizon: f64,
    max_intersections: i32,
    offset: f64,
) -> Result<Vec<Vec<LaneletId>>, NetworkError> {
    let mut out = Vec::new();
    walk(
        network,
        start,
        Direction::Backward,
        horizon,
        max_intersections,
        Vec::new(),
        offset,
        &mut out,
    )?;
    Ok(out)
}

#[allow(clippy::too_many_arguments)]
fn walk(
    network: &RoadNetwork,
    current: &Lanelet,
    direction: Direction,
    horizon: f64,
    mut intersections_left: i32,
    mut chain: Vec<LaneletId>,
    length: f64,
    out: &mut Vec<Vec<LaneletId>>,
) -> Result<(), NetworkError> {
    if chain.contains(&current.id()) {
        out.push(chain);
        return Ok(());
    }
    chain.push(current.id());
    let length = length + current.length();
    if network.is_incoming(current.id()) {
        intersections_left -= 1;
    }
    let next = match direction {
        Direction::Forward => current.successors(),
        Direction::Backward => current.predecessors(),
    };
    if next.is_empty() || length >= horizon || intersections_left < 0 {
        out.push(chain);
        return Ok(());
    }
    let before = out.len();
    for &id in next {
        let lanelet = network.lanelet(id)?;
        if lanelet.has_type(LaneletType::Border) {
            continue;
        }
        walk(
            network,
            lanelet,
            direction,
            horizon,
            intersections_left,
            chain.clone(),
            length,
            out,
        )?;
    }
    if out.len() == before {
        out.push(chain);
    }
    Ok(())
}

/// Candidate lanelet sequences through `base`, measured from `position`.
///
/// The backward horizon counts from `position` to the start of `base`,
/// the forward horizon from `position` to its end. Sequences are returned
/// in predecessor-major, successor-minor order.
pub fn lane_sequences(
    network: &RoadNetwork,
    base: &Lanelet,
    position: Point,
    fov_rear: f64,
    fov_front: f64,
    max_intersections: i32,
) -> Result<Vec<Vec<LaneletId>>, NetworkError> {
    let idx = base.closest_vertex(position);
    let travelled = base.path_length()[idx];
    let forward = chains_forward(network, base, fov_front, max_intersections, -travelled)?;
    let backward = chains_backward(
        network,
        base,
        fov_rear,
        max_intersections,
        travelled - base.length(),
    )?;

    let mut sequences = Vec::with_capacity(forward.len() * backward.len());
    for back in &backward {
        for front in &forward {
            let mut seq: Vec<LaneletId> = back.iter().rev().copied().collect();
            seq.extend(front.iter().skip(1));
            if seq.contains(&base.id()) && !sequences.contains(&seq) {
                sequences.push(seq);
            }
        }
    }
    if sequences.is_empty() {
        sequences.push(vec![base.id()]);
    }
    Ok(sequences)
}

/// Drop every sequence whose lanelet set is a strict subset of another
/// sequence's set. Of two sequences with equal sets the earlier is kept.
pub fn remove_sub_sequences(sequences: Vec<Vec<LaneletId>>) -> Vec<Vec<LaneletId>> {
    let covered = |a: &[LaneletId], b: &[LaneletId]| a.iter().all(|id| b.contains(id));
    sequences
        .iter()
        .enumerate()
        .filter(|(i, seq)| {
            !sequences.iter().enumerate().any(|(j, other)| {
                *i != j
                    && covered(seq, other)
                    && (!covered(other, seq) || j < *i)
            })
        })
        .map(|(_, seq)| seq.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lanelet::LaneletBuilder;
    use crate::network::RoadNetworkBuilder;

    fn straight(id: u64, x0: f64, x1: f64) -> LaneletBuilder {
        LaneletBuilder::new(LaneletId(id))
            .left_border(vec![Point::new(x0, 1.5), Point::new(x1, 1.5)])
            .right_border(vec![Point::new(x0, -1.5), Point::new(x1, -1.5)])
    }

    /// 1 -> 2 -> 3, each 50 m long, and 2 -> 4 (a border lanelet).
    fn network() -> RoadNetwork {
        RoadNetworkBuilder::new()
            .lanelet(straight(1, 0.0, 50.0).successor(LaneletId(2)).build().unwrap())
            .lanelet(
                straight(2, 50.0, 100.0)
                    .predecessor(LaneletId(1))
                    .successor(LaneletId(3))
                    .successor(LaneletId(4))
                    .build()
                    .unwrap(),
            )
            .lanelet(straight(3, 100.0, 150.0).predecessor(LaneletId(2)).build().unwrap())
            .lanelet(
                straight(4, 100.0, 150.0)
                    .predecessor(LaneletId(2))
                    .lanelet_type(LaneletType::Border)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn forward_chain_respects_horizon() {
        let net = network();
        let l1 = net.lanelet(LaneletId(1)).unwrap();
        let long = chains_forward(&net, l1, 500.0, 1, 0.0).unwrap();
        assert_eq!(long, vec![vec![LaneletId(1), LaneletId(2), LaneletId(3)]]);
        let short = chains_forward(&net, l1, 60.0, 1, 0.0).unwrap();
        assert_eq!(short, vec![vec![LaneletId(1), LaneletId(2)]]);
    }

    #[test]
    fn backward_chain_is_nearest_first() {
        let net = network();
        let l3 = net.lanelet(LaneletId(3)).unwrap();
        let chains = chains_backward(&net, l3, 500.0, 1, 0.0).unwrap();
        assert_eq!(chains, vec![vec![LaneletId(3), LaneletId(2), LaneletId(1)]]);
    }

    #[test]
    fn sequences_pass_through_base() {
        let net = network();
        let l2 = net.lanelet(LaneletId(2)).unwrap();
        let seqs = lane_sequences(&net, l2, Point::new(75.0, 0.0), 250.0, 250.0, 1).unwrap();
        assert_eq!(seqs, vec![vec![LaneletId(1), LaneletId(2), LaneletId(3)]]);
    }

    #[test]
    fn sub_sequences_removed() {
        let seqs = vec![
            vec![LaneletId(1), LaneletId(2)],
            vec![LaneletId(1), LaneletId(2), LaneletId(3)],
            vec![LaneletId(5)],
            vec![LaneletId(5)],
        ];
        assert_eq!(
            remove_sub_sequences(seqs),
            vec![vec![LaneletId(1), LaneletId(2), LaneletId(3)], vec![LaneletId(5)]]
        );
    }
}
