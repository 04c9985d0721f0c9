//! The `Agent` — one simulated trip.

use st_core::{AgentId, EdgeId, NodeId, SimTime};

/// Where an agent is in its lifecycle.
///
/// `Dormant → Active → Finished` is the normal path.  `Unreachable` and
/// `Unfinished` are the two failure outcomes; like `Finished` they are
/// terminal.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AgentStatus {
    /// Waiting for `start_time`; not in the event queue.
    #[default]
    Dormant,
    /// Travelling along `edge`.
    Active,
    /// Reached `end_node`; `travel_time` is final.
    Finished,
    /// No path exists from `start_node` to `end_node`.
    Unreachable,
    /// Still dormant or travelling when the run hit its time limit.
    Unfinished,
}

impl AgentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentStatus::Dormant     => "dormant",
            AgentStatus::Active      => "active",
            AgentStatus::Finished    => "finished",
            AgentStatus::Unreachable => "unreachable",
            AgentStatus::Unfinished  => "unfinished",
        }
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            AgentStatus::Finished | AgentStatus::Unreachable | AgentStatus::Unfinished
        )
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vehicle travelling from `start_node` to `end_node`.
///
/// While active, `route[0]` is the tail of `edge` and `route[1]` its head;
/// the rest of `route` is the plan beyond the current edge.  Before
/// activation `route` starts at `start_node`.
#[derive(Clone, Debug, PartialEq)]
pub struct Agent {
    pub id:          AgentId,
    /// Eligible for rerouting in smart runs.  Fixed at creation.
    pub smart:       bool,
    pub start_node:  NodeId,
    pub end_node:    NodeId,
    pub route:       Vec<NodeId>,
    pub start_time:  SimTime,
    /// Seconds from `start_time` to arrival; `None` until finished.
    pub travel_time: Option<f64>,
    /// Current edge, `EdgeId::INVALID` unless active.
    pub edge:        EdgeId,
    pub status:      AgentStatus,

    // ── Progress on the current edge ─────────────────────────────────────
    /// Metres of `edge` already covered as of `progress_time`.
    pub edge_progress_m: f64,
    pub progress_time:   SimTime,

    // ── Rerouting rate limit ─────────────────────────────────────────────
    pub distance_since_reroute: f64,
    pub last_reroute_time:      SimTime,
}

impl Agent {
    /// A dormant agent that will follow `route` once `start_time` arrives.
    pub fn new(
        id:         AgentId,
        smart:      bool,
        route:      Vec<NodeId>,
        start_time: SimTime,
    ) -> Self {
        let start_node = route.first().copied().unwrap_or_default();
        let end_node = route.last().copied().unwrap_or_default();
        Self {
            id,
            smart,
            start_node,
            end_node,
            route,
            start_time,
            travel_time: None,
            edge: EdgeId::INVALID,
            status: AgentStatus::Dormant,
            edge_progress_m: 0.0,
            progress_time: start_time,
            distance_since_reroute: 0.0,
            last_reroute_time: start_time,
        }
    }

    /// An agent whose destination cannot be reached.  Never activated.
    pub fn unreachable(
        id:         AgentId,
        smart:      bool,
        start_node: NodeId,
        end_node:   NodeId,
        start_time: SimTime,
    ) -> Self {
        Self {
            start_node,
            end_node,
            status: AgentStatus::Unreachable,
            ..Self::new(id, smart, Vec::new(), start_time)
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == AgentStatus::Active
    }

    /// Tail of the current edge (or the start node before activation).
    #[inline]
    pub fn current_node(&self) -> Option<NodeId> {
        self.route.first().copied()
    }

    /// Head of the current edge (or the first junction before activation).
    #[inline]
    pub fn next_node(&self) -> Option<NodeId> {
        self.route.get(1).copied()
    }

    /// Bring `edge_progress_m` up to `now`, assuming `speed` held since the
    /// last update.  Never runs past `edge_length`.
    pub fn advance_progress(&mut self, now: SimTime, speed: f64, edge_length: f64) {
        let covered = self.edge_progress_m + speed * now.since(self.progress_time);
        self.edge_progress_m = covered.min(edge_length);
        self.progress_time = now;
    }

    /// Reset per-edge progress when entering a new edge at `now`.
    pub fn start_edge(&mut self, edge: EdgeId, now: SimTime) {
        self.edge = edge;
        self.edge_progress_m = 0.0;
        self.progress_time = now;
    }

    /// Reset the rerouting rate limit at `now`.
    pub fn mark_rerouted(&mut self, now: SimTime) {
        self.distance_since_reroute = 0.0;
        self.last_reroute_time = now;
    }
}
