//! Routing trait with Dijkstra and A* implementations.
//!
//! # Pluggability
//!
//! Yen's search ([`crate::ksp::yen`]) runs its spur searches through the
//! [`Router`] trait, so the single-pair search is a type parameter.
//! [`crate::yen_a_star`] plugs in [`BoundedAStar`], an A* whose lower bound
//! is computed once per weight vector.  [`DijkstraRouter`] is the plain
//! reference search.
//!
//! # Cost units
//!
//! Costs are caller-supplied per-edge weights in **seconds** (`&[f64]`
//! indexed by `EdgeId`), normally `length / speed` from
//! [`RoadNetwork::free_flow_weights`] or [`RoadNetwork::travel_time_weights`].

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use rustc_hash::FxHashSet;

use st_core::{EdgeId, NodeId};

use crate::network::RoadNetwork;
use crate::{SpatialError, SpatialResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// A loopless path: the visited nodes, the edges between them, and the total
/// cost under the weights it was computed with.
///
/// Invariant: `nodes.len() == edges.len() + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeId>,
    /// Sum of edge weights in order, in seconds.
    pub cost: f64,
}

impl Route {
    /// The zero-length route that stays at `node`.
    pub fn trivial(node: NodeId) -> Self {
        Self { nodes: vec![node], edges: vec![], cost: 0.0 }
    }

    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn source(&self) -> NodeId {
        self.nodes[0]
    }

    pub fn target(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    /// Cost of this route under a different set of weights.
    pub fn cost_under(&self, weights: &[f64]) -> f64 {
        path_cost(weights, &self.edges)
    }

    /// `true` if no node is visited twice.
    pub fn is_loopless(&self) -> bool {
        let mut seen = FxHashSet::default();
        self.nodes.iter().all(|n| seen.insert(*n))
    }
}

/// Sum of `weights` along `edges`, accumulated in path order.
pub fn path_cost(weights: &[f64], edges: &[EdgeId]) -> f64 {
    edges.iter().map(|e| weights[e.index()]).sum()
}

// ── SearchMask ────────────────────────────────────────────────────────────────

/// Nodes and edges a search must not use.  Yen's algorithm builds one per
/// spur search; plain queries pass [`SearchMask::default`].
#[derive(Debug, Default, Clone)]
pub struct SearchMask {
    pub blocked_nodes: FxHashSet<NodeId>,
    pub blocked_edges: FxHashSet<EdgeId>,
}

impl SearchMask {
    #[inline]
    fn allows(&self, edge: EdgeId, head: NodeId) -> bool {
        !self.blocked_edges.contains(&edge) && !self.blocked_nodes.contains(&head)
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable single-pair shortest-path search.
///
/// Implementations must be `Send + Sync` so independent runs can share one
/// router across threads.
pub trait Router: Send + Sync {
    /// Cheapest path from `from` to `to` avoiding everything in `mask`, or
    /// `None` if no such path exists.  `from == to` yields the trivial route.
    fn route_masked(
        &self,
        network: &RoadNetwork,
        from: NodeId,
        to: NodeId,
        weights: &[f64],
        mask: &SearchMask,
    ) -> Option<Route>;

    /// Cheapest unrestricted path from `from` to `to`.
    fn route(
        &self,
        network: &RoadNetwork,
        from: NodeId,
        to: NodeId,
        weights: &[f64],
    ) -> SpatialResult<Route> {
        for node in [from, to] {
            if !network.contains_node(node) {
                return Err(SpatialError::NodeNotFound(node));
            }
        }
        self.route_masked(network, from, to, weights, &SearchMask::default())
            .ok_or(SpatialError::NoRoute { from, to })
    }
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Dijkstra's algorithm: best-first search with no heuristic.
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route_masked(
        &self,
        network: &RoadNetwork,
        from: NodeId,
        to: NodeId,
        weights: &[f64],
        mask: &SearchMask,
    ) -> Option<Route> {
        best_first(network, from, to, weights, mask, |_| 0.0)
    }
}

// ── AStarRouter ───────────────────────────────────────────────────────────────

/// Best-first search guided by a straight-line lower bound.
///
/// The bound is `straight_line_m(v, target) × secs_per_m`, where
/// `secs_per_m` is the smallest ratio `weight / straight_line_length` over
/// all edges.  Every edge therefore costs at least the bound's drop across
/// it, which keeps the heuristic consistent for *any* non-negative weights,
/// including congested speeds.
pub struct AStarRouter;

impl AStarRouter {
    /// Lower bound on seconds per metre of straight-line distance under
    /// `weights`.
    pub fn secs_per_m(network: &RoadNetwork, weights: &[f64]) -> f64 {
        let bound = (0..network.edge_count())
            .filter_map(|i| {
                let straight = network.straight_line_m(network.edge_from[i], network.edge_to[i]);
                (straight > 0.0).then(|| weights[i] / straight)
            })
            .fold(f64::INFINITY, f64::min);
        if bound.is_finite() {
            // Slack for rounding in the haversine triangle inequality.
            bound * 0.999
        } else {
            0.0
        }
    }

    /// A* for many searches under the same `weights`, with the bound
    /// computed once.
    pub fn bounded(network: &RoadNetwork, weights: &[f64]) -> BoundedAStar {
        BoundedAStar { secs_per_m: Self::secs_per_m(network, weights) }
    }
}

impl Router for AStarRouter {
    fn route_masked(
        &self,
        network: &RoadNetwork,
        from: NodeId,
        to: NodeId,
        weights: &[f64],
        mask: &SearchMask,
    ) -> Option<Route> {
        Self::bounded(network, weights).route_masked(network, from, to, weights, mask)
    }
}

/// [`AStarRouter`] with its bound fixed for one weight vector.  Only valid
/// for searches under the weights passed to [`AStarRouter::bounded`].
#[derive(Debug, Clone, Copy)]
pub struct BoundedAStar {
    secs_per_m: f64,
}

impl Router for BoundedAStar {
    fn route_masked(
        &self,
        network: &RoadNetwork,
        from: NodeId,
        to: NodeId,
        weights: &[f64],
        mask: &SearchMask,
    ) -> Option<Route> {
        best_first(network, from, to, weights, mask, |v| {
            network.straight_line_m(v, to) * self.secs_per_m
        })
    }
}

// ── Search internals ──────────────────────────────────────────────────────────

/// Heap key: `f64` with a total order.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Cost(f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Shared best-first search.  With `heuristic ≡ 0` this is Dijkstra.
///
/// Stale heap entries are skipped rather than tracked in a closed set, so a
/// node reached again at lower cost is simply re-expanded.
fn best_first(
    network: &RoadNetwork,
    from: NodeId,
    to: NodeId,
    weights: &[f64],
    mask: &SearchMask,
    heuristic: impl Fn(NodeId) -> f64,
) -> Option<Route> {
    if from == to {
        return Some(Route::trivial(from));
    }
    if mask.blocked_nodes.contains(&from) {
        return None;
    }

    let n = network.node_count();
    // dist[v] = best known cost to reach v.
    let mut dist      = vec![f64::INFINITY; n];
    // prev_edge[v] = EdgeId that reached v; EdgeId::INVALID for unreached nodes.
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0.0;

    // Min-heap on (g + h, node).  Secondary key NodeId ensures deterministic
    // tie-breaking.
    let mut heap: BinaryHeap<Reverse<(Cost, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((Cost(heuristic(from)), from)));

    while let Some(Reverse((Cost(f), node))) = heap.pop() {
        let g = dist[node.index()];
        if node == to {
            return Some(reconstruct(network, &prev_edge, from, to, weights));
        }

        // Skip stale heap entries.
        if f > g + heuristic(node) {
            continue;
        }

        for edge in network.out_edges(node) {
            let neighbor = network.edge_to[edge.index()];
            if !mask.allows(edge, neighbor) {
                continue;
            }
            let new_cost = g + weights[edge.index()];

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((Cost(new_cost + heuristic(neighbor)), neighbor)));
            }
        }
    }

    None
}

fn reconstruct(
    network: &RoadNetwork,
    prev_edge: &[EdgeId],
    from: NodeId,
    to: NodeId,
    weights: &[f64],
) -> Route {
    let mut edges = Vec::new();
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        edges.push(e);
        cur = network.edge_from[e.index()];
    }
    edges.reverse();

    let mut nodes = Vec::with_capacity(edges.len() + 1);
    nodes.push(from);
    nodes.extend(edges.iter().map(|e| network.edge_to[e.index()]));

    let cost = path_cost(weights, &edges);
    Route { nodes, edges, cost }
}
