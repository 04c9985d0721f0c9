//! The road graph the simulator drives on.
//!
//! Edges are stored grouped by source node: the outgoing edges of node `n`
//! are the `EdgeId`s in `offsets[n] .. offsets[n + 1]`.  Per-edge attributes
//! live in parallel `Vec`s indexed by `EdgeId`, which is also how the
//! simulation indexes its density and speed vectors.
//!
//! After [`RoadNetworkBuilder::build`] the graph is a simple digraph: no
//! self-loops and at most one edge per ordered node pair, so a node sequence
//! names a route unambiguously.
//!
//! Node positions are also kept in an `rstar` tree for listing the nodes of
//! a rectangular area.

use rstar::primitives::GeomWithData;
use rstar::{RTree, AABB};

use st_core::{EdgeId, GeoPoint, NodeId, Rect};

/// `[lat, lon]` keyed R-tree entry.
type Located = GeomWithData<[f64; 2], NodeId>;

#[inline]
fn key(pos: GeoPoint) -> [f64; 2] {
    [pos.lat, pos.lon]
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Immutable directed road graph.  Build one with [`RoadNetworkBuilder`].
pub struct RoadNetwork {
    /// Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    pub edge_from: Vec<NodeId>,
    pub edge_to: Vec<NodeId>,
    /// Metres.
    pub edge_length_m: Vec<f64>,
    /// Free-flow speed in m/s, always positive.
    pub edge_max_speed: Vec<f64>,

    /// `node_count + 1` entries; see the module docs.
    offsets: Vec<u32>,
    index: RTree<Located>,
}

impl RoadNetwork {
    // ── Size ──────────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_from.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    // ── Adjacency ─────────────────────────────────────────────────────────

    #[inline]
    fn out_range(&self, node: NodeId) -> std::ops::Range<usize> {
        let i = node.index();
        self.offsets[i] as usize..self.offsets[i + 1] as usize
    }

    /// Outgoing edges of `node`, ascending by target node.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.out_range(node).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.out_range(node).len()
    }

    /// The edge `from → to`, if the road exists.
    pub fn edge_between(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        let range = self.out_range(from);
        let start = range.start;
        self.edge_to[range]
            .binary_search(&to)
            .ok()
            .map(|off| EdgeId((start + off) as u32))
    }

    // ── Edge costs ────────────────────────────────────────────────────────

    /// Seconds needed to cross `edge` at its speed limit.
    #[inline]
    pub fn free_flow_secs(&self, edge: EdgeId) -> f64 {
        self.edge_length_m[edge.index()] / self.edge_max_speed[edge.index()]
    }

    /// Free-flow crossing time of every edge, indexed by `EdgeId`.
    pub fn free_flow_weights(&self) -> Vec<f64> {
        self.travel_time_weights(&self.edge_max_speed)
    }

    /// Crossing time of every edge at the given speeds (m/s).
    pub fn travel_time_weights(&self, speeds: &[f64]) -> Vec<f64> {
        debug_assert_eq!(speeds.len(), self.edge_count());
        self.edge_length_m
            .iter()
            .zip(speeds)
            .map(|(len, v)| len / v)
            .collect()
    }

    pub fn path_length_m(&self, edges: &[EdgeId]) -> f64 {
        edges.iter().map(|e| self.edge_length_m[e.index()]).sum()
    }

    /// Great-circle distance between two nodes.
    #[inline]
    pub fn straight_line_m(&self, a: NodeId, b: NodeId) -> f64 {
        self.node_pos[a.index()].distance_m(self.node_pos[b.index()])
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Nodes inside `rect`, boundary included, in `NodeId` order.
    pub fn nodes_in_rect(&self, rect: &Rect) -> Vec<NodeId> {
        let area = AABB::from_corners(key(rect.min_corner()), key(rect.max_corner()));
        let mut nodes: Vec<NodeId> = self
            .index
            .locate_in_envelope(&area)
            .map(|hit| hit.data)
            .collect();
        nodes.sort_unstable();
        nodes
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
struct PendingEdge {
    from: NodeId,
    to: NodeId,
    length_m: f64,
    max_speed: f64,
}

/// Collects nodes and edges in any order and freezes them into a
/// [`RoadNetwork`].
///
/// ```
/// use st_core::GeoPoint;
/// use st_spatial::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// let a = b.add_node(GeoPoint::new(52.23, 21.01));
/// let c = b.add_node(GeoPoint::new(52.24, 21.01));
/// b.add_road(a, c, 1_100.0, 13.9);
/// let net = b.build();
/// assert_eq!(net.edge_count(), 2);
/// assert!(net.edge_between(c, a).is_some());
/// ```
#[derive(Default)]
pub struct RoadNetworkBuilder {
    nodes: Vec<GeoPoint>,
    edges: Vec<PendingEdge>,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self { nodes: Vec::with_capacity(nodes), edges: Vec::with_capacity(edges) }
    }

    /// Ids are handed out densely from 0.
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        self.nodes.push(pos);
        NodeId(self.nodes.len() as u32 - 1)
    }

    /// One-way road.  `max_speed` is in m/s and must be positive.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, length_m: f64, max_speed: f64) {
        self.edges.push(PendingEdge { from, to, length_m, max_speed });
    }

    /// Two-way road: one directed edge each way with the same attributes.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, length_m: f64, max_speed: f64) {
        self.add_directed_edge(a, b, length_m, max_speed);
        self.add_directed_edge(b, a, length_m, max_speed);
    }

    pub fn node_pos(&self, id: NodeId) -> GeoPoint {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Freeze the graph.  Self-loops are dropped and of several edges between
    /// the same ordered pair only the one with the shortest free-flow time
    /// survives.
    pub fn build(self) -> RoadNetwork {
        let Self { nodes, mut edges } = self;

        edges.retain(|e| e.from != e.to);
        edges.sort_by(|a, b| {
            (a.from, a.to)
                .cmp(&(b.from, b.to))
                .then((a.length_m / a.max_speed).total_cmp(&(b.length_m / b.max_speed)))
        });
        edges.dedup_by_key(|e| (e.from, e.to));

        // Edges are sorted by source, so each offset is the first position
        // whose source is not below the node.
        let offsets: Vec<u32> = (0..=nodes.len())
            .map(|n| edges.partition_point(|e| e.from.index() < n) as u32)
            .collect();

        let index = RTree::bulk_load(
            nodes
                .iter()
                .zip(0u32..)
                .map(|(&pos, i)| Located::new(key(pos), NodeId(i)))
                .collect(),
        );

        RoadNetwork {
            node_pos: nodes,
            edge_from: edges.iter().map(|e| e.from).collect(),
            edge_to: edges.iter().map(|e| e.to).collect(),
            edge_length_m: edges.iter().map(|e| e.length_m).collect(),
            edge_max_speed: edges.iter().map(|e| e.max_speed).collect(),
            offsets,
            index,
        }
    }
}
