//! Topological index over lanelets for path search.

use std::collections::{BTreeSet, VecDeque};

use indexmap::IndexMap;
use smallvec::SmallVec;

use roadrule_core::LaneletId;

use crate::lanelet::Lanelet;
use crate::types::DrivingDirection;

type Neighbours = SmallVec<[LaneletId; 4]>;

/// Directed lanelet graph with two edge sets.
///
/// - successor edges only
/// - successor edges plus same-direction adjacency in both directions
///
/// Node order follows lanelet insertion order, and neighbour lists keep
/// the order in which relations were declared, so search results are
/// reproducible.
#[derive(Clone, Debug, Default)]
pub struct LaneletGraph {
    successors: IndexMap<LaneletId, Neighbours>,
    successors_and_adjacent: IndexMap<LaneletId, Neighbours>,
    predecessors: IndexMap<LaneletId, Neighbours>,
    predecessors_and_adjacent: IndexMap<LaneletId, Neighbours>,
}

impl LaneletGraph {
    /// Build the graph from a lanelet collection.
    pub fn new<'a>(lanelets: impl IntoIterator<Item = &'a Lanelet>) -> Self {
        let mut graph = Self::default();
        for lanelet in lanelets {
            let id = lanelet.id();
            graph.successors.entry(id).or_default();
            graph.successors_and_adjacent.entry(id).or_default();
            graph.predecessors.entry(id).or_default();
            graph.predecessors_and_adjacent.entry(id).or_default();
            for adj in [lanelet.adjacent_left(), lanelet.adjacent_right()]
                .into_iter()
                .flatten()
            {
                if adj.direction == DrivingDirection::Same {
                    // Adjacency edges run both ways, so they appear in
                    // both the forward and the reversed edge set.
                    for map in [
                        &mut graph.successors_and_adjacent,
                        &mut graph.predecessors_and_adjacent,
                    ] {
                        push_unique(map.entry(id).or_default(), adj.lanelet);
                        push_unique(map.entry(adj.lanelet).or_default(), id);
                    }
                }
            }
            for &suc in lanelet.successors() {
                push_unique(graph.successors.entry(id).or_default(), suc);
                push_unique(graph.successors_and_adjacent.entry(id).or_default(), suc);
                push_unique(graph.predecessors.entry(suc).or_default(), id);
                push_unique(graph.predecessors_and_adjacent.entry(suc).or_default(), id);
            }
        }
        graph
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.successors.len()
    }

    /// `true` if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.successors.is_empty()
    }

    /// Outgoing neighbours of `id` in the selected edge set.
    pub fn neighbours(&self, id: LaneletId, consider_adjacency: bool) -> &[LaneletId] {
        let map = if consider_adjacency {
            &self.successors_and_adjacent
        } else {
            &self.successors
        };
        map.get(&id).map(|n| n.as_slice()).unwrap_or(&[])
    }

    /// Incoming neighbours of `id` in the selected edge set.
    pub fn reverse_neighbours(&self, id: LaneletId, consider_adjacency: bool) -> &[LaneletId] {
        let map = if consider_adjacency {
            &self.predecessors_and_adjacent
        } else {
            &self.predecessors
        };
        map.get(&id).map(|n| n.as_slice()).unwrap_or(&[])
    }

    /// Every simple path from `src` to `dst` with at most `max_depth`
    /// lanelets, in breadth-first discovery order.
    ///
    /// A path from a node to itself is the single-element path `[src]`.
    /// Unknown ids yield no paths. The number of paths grows
    /// exponentially on multi-lane roads; use
    /// [`lanelets_on_paths`](Self::lanelets_on_paths) when only the
    /// lanelet set is needed.
    pub fn find_paths(
        &self,
        src: LaneletId,
        dst: LaneletId,
        consider_adjacency: bool,
        max_depth: usize,
    ) -> Vec<Vec<LaneletId>> {
        let mut paths: Vec<Vec<LaneletId>> = Vec::new();
        if !self.successors.contains_key(&src) || max_depth == 0 {
            return paths;
        }
        let mut queue: VecDeque<Vec<LaneletId>> = VecDeque::new();
        queue.push_back(vec![src]);
        while let Some(path) = queue.pop_front() {
            let last = path[path.len() - 1];
            if last == dst {
                if !paths.contains(&path) {
                    paths.push(path);
                }
                continue;
            }
            if path.len() >= max_depth {
                continue;
            }
            for &next in self.neighbours(last, consider_adjacency) {
                if !path.contains(&next) {
                    let mut extended = path.clone();
                    extended.push(next);
                    queue.push_back(extended);
                }
            }
        }
        paths
    }

    /// Lanelets lying on a route from `src` to `dst` of at most
    /// `max_depth` lanelets.
    ///
    /// A lanelet qualifies when its hop distance from `src` plus its hop
    /// distance to `dst` fits the depth bound. Two breadth-first sweeps,
    /// one forward from `src` and one over reversed edges from `dst`,
    /// give both distances in `O(V + E)`. Routes end at `dst` and never
    /// return to `src`.
    pub fn lanelets_on_paths(
        &self,
        src: LaneletId,
        dst: LaneletId,
        consider_adjacency: bool,
        max_depth: usize,
    ) -> BTreeSet<LaneletId> {
        if !self.successors.contains_key(&src) || max_depth == 0 {
            return BTreeSet::new();
        }
        let forward = self.hop_distances(src, dst, consider_adjacency, max_depth, false);
        if !forward.contains_key(&dst) {
            return BTreeSet::new();
        }
        let backward = self.hop_distances(dst, src, consider_adjacency, max_depth, true);
        forward
            .iter()
            .filter(|&(id, &to)| {
                backward
                    .get(id)
                    .is_some_and(|&from| to + from < max_depth)
            })
            .map(|(&id, _)| id)
            .collect()
    }

    /// `true` if `dst` is reachable from `src` within `max_depth` lanelets.
    pub fn reachable(
        &self,
        src: LaneletId,
        dst: LaneletId,
        consider_adjacency: bool,
        max_depth: usize,
    ) -> bool {
        if !self.successors.contains_key(&src) || max_depth == 0 {
            return false;
        }
        self.hop_distances(src, dst, consider_adjacency, max_depth, false)
            .contains_key(&dst)
    }

    /// Breadth-first hop counts from `start`, at most `max_depth - 1`
    /// hops, never expanding past `stop`.
    fn hop_distances(
        &self,
        start: LaneletId,
        stop: LaneletId,
        consider_adjacency: bool,
        max_depth: usize,
        reversed: bool,
    ) -> IndexMap<LaneletId, usize> {
        let mut dist = IndexMap::from([(start, 0usize)]);
        let mut frontier = VecDeque::from([start]);
        while let Some(node) = frontier.pop_front() {
            let hops = dist[&node];
            if node == stop || hops + 1 >= max_depth {
                continue;
            }
            let next = if reversed {
                self.reverse_neighbours(node, consider_adjacency)
            } else {
                self.neighbours(node, consider_adjacency)
            };
            for &n in next {
                if !dist.contains_key(&n) {
                    dist.insert(n, hops + 1);
                    frontier.push_back(n);
                }
            }
        }
        dist
    }
}

fn push_unique(list: &mut Neighbours, id: LaneletId) {
    if !list.contains(&id) {
        list.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lanelet::LaneletBuilder;
    use roadrule_geometry::Point;

    fn lanelet(id: u64, x0: f64, y0: f64) -> LaneletBuilder {
        LaneletBuilder::new(LaneletId(id))
            .left_border(vec![Point::new(x0, y0 + 1.0), Point::new(x0 + 10.0, y0 + 1.0)])
            .right_border(vec![Point::new(x0, y0 - 1.0), Point::new(x0 + 10.0, y0 - 1.0)])
    }

    /// 1 -> 2 -> 3 on y = 0, 4 -> 5 on y = 2; 1 and 4 adjacent, 2 -> 5.
    fn graph() -> LaneletGraph {
        let lanelets = vec![
            lanelet(1, 0.0, 0.0)
                .successor(LaneletId(2))
                .adjacent_left(LaneletId(4), DrivingDirection::Same)
                .build()
                .unwrap(),
            lanelet(2, 10.0, 0.0)
                .predecessor(LaneletId(1))
                .successor(LaneletId(3))
                .successor(LaneletId(5))
                .build()
                .unwrap(),
            lanelet(3, 20.0, 0.0)
                .predecessor(LaneletId(2))
                .build()
                .unwrap(),
            lanelet(4, 0.0, 2.0)
                .successor(LaneletId(5))
                .adjacent_right(LaneletId(1), DrivingDirection::Same)
                .build()
                .unwrap(),
            lanelet(5, 10.0, 2.0)
                .predecessor(LaneletId(4))
                .predecessor(LaneletId(2))
                .build()
                .unwrap(),
        ];
        LaneletGraph::new(&lanelets)
    }

    #[test]
    fn successor_paths() {
        let g = graph();
        assert_eq!(
            g.find_paths(LaneletId(1), LaneletId(3), false, 10),
            vec![vec![LaneletId(1), LaneletId(2), LaneletId(3)]]
        );
        assert!(g.find_paths(LaneletId(4), LaneletId(3), false, 10).is_empty());
    }

    #[test]
    fn adjacency_opens_lateral_paths() {
        let g = graph();
        let paths = g.find_paths(LaneletId(4), LaneletId(3), true, 10);
        assert_eq!(paths, vec![vec![LaneletId(4), LaneletId(1), LaneletId(2), LaneletId(3)]]);
    }

    #[test]
    fn multiple_paths_collected() {
        let g = graph();
        let paths = g.find_paths(LaneletId(1), LaneletId(5), false, 10);
        assert_eq!(paths, vec![vec![LaneletId(1), LaneletId(2), LaneletId(5)]]);
        let paths = g.find_paths(LaneletId(1), LaneletId(5), true, 10);
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0], vec![LaneletId(1), LaneletId(4), LaneletId(5)]);
        let on = g.lanelets_on_paths(LaneletId(1), LaneletId(5), true, 10);
        assert_eq!(
            on.into_iter().collect::<Vec<_>>(),
            vec![LaneletId(1), LaneletId(2), LaneletId(4), LaneletId(5)]
        );
    }

    #[test]
    fn depth_bound_prunes() {
        let g = graph();
        assert!(g.find_paths(LaneletId(1), LaneletId(3), false, 2).is_empty());
        assert!(!g.reachable(LaneletId(1), LaneletId(3), false, 2));
        assert!(g.reachable(LaneletId(1), LaneletId(3), false, 3));
    }

    #[test]
    fn lanelet_set_respects_depth() {
        let g = graph();
        let set = |depth| -> Vec<_> {
            g.lanelets_on_paths(LaneletId(4), LaneletId(3), true, depth)
                .into_iter()
                .collect()
        };
        assert!(set(3).is_empty());
        assert_eq!(set(4), vec![LaneletId(1), LaneletId(2), LaneletId(3), LaneletId(4)]);
        assert!(g.lanelets_on_paths(LaneletId(4), LaneletId(3), false, 10).is_empty());
        assert_eq!(
            g.reverse_neighbours(LaneletId(5), false),
            &[LaneletId(2), LaneletId(4)]
        );
    }

    #[test]
    fn lanelet_set_matches_path_union() {
        let g = graph();
        let ids = [1, 2, 3, 4, 5].map(LaneletId);
        for &src in &ids {
            for &dst in &ids {
                for adjacency in [false, true] {
                    let from_paths: BTreeSet<_> = g
                        .find_paths(src, dst, adjacency, 10)
                        .into_iter()
                        .flatten()
                        .collect();
                    assert_eq!(
                        g.lanelets_on_paths(src, dst, adjacency, 10),
                        from_paths,
                        "{src} -> {dst}, adjacency {adjacency}"
                    );
                }
            }
        }
    }

    #[test]
    fn self_path() {
        let g = graph();
        assert_eq!(
            g.find_paths(LaneletId(2), LaneletId(2), false, 5),
            vec![vec![LaneletId(2)]]
        );
        assert!(g.find_paths(LaneletId(99), LaneletId(2), false, 5).is_empty());
        assert_eq!(
            g.lanelets_on_paths(LaneletId(2), LaneletId(2), true, 5),
            BTreeSet::from([LaneletId(2)])
        );
    }
}
