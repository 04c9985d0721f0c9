//! Yen's k-shortest loopless paths over any [`Router`] spur search.
//!
//! # Algorithm
//!
//! ```text
//! A[0] = shortest(source, target)
//! for k in 1..K:
//!   for each spur node i of A[k-1]:
//!     root  = A[k-1].nodes[..=i]
//!     block the edge leaving `root` in every accepted path sharing `root`
//!     block every root node except the spur node
//!     spur  = router(spur node, target) under the mask
//!     candidate = root ++ spur      (skipped if already accepted/queued)
//!   A[k] = cheapest candidate
//! ```
//!
//! Blocking the root nodes makes every candidate loopless.  Candidates are
//! compared by `(cost, node sequence)`, so equal-cost paths come out in a
//! fixed order and the result is strictly increasing under that key.

use std::cmp::Ordering;

use rustc_hash::FxHashSet;

use st_core::NodeId;

use crate::network::RoadNetwork;
use crate::router::{path_cost, AStarRouter, Route, Router, SearchMask};

/// Total order used for candidate selection and the final ordering.
fn compare_routes(a: &Route, b: &Route) -> Ordering {
    a.cost.total_cmp(&b.cost).then_with(|| a.nodes.cmp(&b.nodes))
}

/// Up to `k` loopless paths from `source` to `target`, cheapest first, with
/// A* spur searches.
///
/// Returns an empty `Vec` when `k == 0` or `target` is unreachable, and the
/// single trivial route when `source == target`.  Fewer than `k` paths are
/// returned when the graph has fewer distinct loopless paths.
pub fn yen_a_star(
    network: &RoadNetwork,
    source:  NodeId,
    target:  NodeId,
    weights: &[f64],
    k:       usize,
) -> Vec<Route> {
    yen(&AStarRouter::bounded(network, weights), network, source, target, weights, k)
}

/// Yen's algorithm with `router` answering the first and every spur search.
/// Same contract as [`yen_a_star`].
pub fn yen<R: Router>(
    router:  &R,
    network: &RoadNetwork,
    source:  NodeId,
    target:  NodeId,
    weights: &[f64],
    k:       usize,
) -> Vec<Route> {
    if k == 0 || !network.contains_node(source) || !network.contains_node(target) {
        return Vec::new();
    }
    if source == target {
        return vec![Route::trivial(source)];
    }

    let Some(first) = router.route_masked(network, source, target, weights, &SearchMask::default()) else {
        return Vec::new();
    };

    let mut accepted: Vec<Route> = vec![first];
    let mut candidates: Vec<Route> = Vec::new();
    // Node sequences already accepted or queued.
    let mut seen: FxHashSet<Vec<NodeId>> = FxHashSet::default();
    seen.insert(accepted[0].nodes.clone());

    while accepted.len() < k {
        let prev = &accepted[accepted.len() - 1];

        for i in 0..prev.edges.len() {
            let spur_node = prev.nodes[i];
            let root_nodes = &prev.nodes[..=i];
            let root_edges = &prev.edges[..i];

            let mut mask = SearchMask::default();
            for path in &accepted {
                if path.nodes.len() > i + 1 && path.nodes[..=i] == *root_nodes {
                    mask.blocked_edges.insert(path.edges[i]);
                }
            }
            mask.blocked_nodes.extend(root_nodes[..i].iter().copied());

            let Some(spur) = router.route_masked(network, spur_node, target, weights, &mask) else {
                continue;
            };

            let mut nodes = root_nodes[..i].to_vec();
            nodes.extend_from_slice(&spur.nodes);
            if !seen.insert(nodes.clone()) {
                continue;
            }
            let mut edges = root_edges.to_vec();
            edges.extend_from_slice(&spur.edges);
            let cost = path_cost(weights, &edges);
            candidates.push(Route { nodes, edges, cost });
        }

        let Some(best) = candidates
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| compare_routes(a, b))
            .map(|(i, _)| i)
        else {
            break;
        };
        accepted.push(candidates.swap_remove(best));
    }

    accepted.sort_by(compare_routes);
    accepted
}
