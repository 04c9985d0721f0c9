//! Plain data row types written by output backends, and their assembly from
//! run results.

use st_agent::Population;
use st_core::{AgentId, EdgeId, NodeId, SimMode, SimTime};
use st_sim::{RunOutcome, StatsSummary};
use st_spatial::RoadNetwork;

use crate::{OutputError, OutputResult};

/// One agent's trip in both runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripRow {
    pub agent_id:      u32,
    pub smart:         bool,
    pub start_node:    u32,
    pub end_node:      u32,
    pub start_time_s:  f64,
    /// Free-flow cost of the initial route; `None` when unreachable.
    pub baseline_s:    Option<f64>,
    pub base_outcome:  &'static str,
    pub base_time_s:   Option<f64>,
    pub smart_outcome: &'static str,
    pub smart_time_s:  Option<f64>,
}

impl TripRow {
    /// Zip the population with the outcomes of its base and smart runs.
    pub fn collect(
        population: &Population,
        base:       &RunOutcome,
        smart:      &RunOutcome,
    ) -> OutputResult<Vec<TripRow>> {
        let n = population.len();
        for (what, got) in [
            ("baseline times", population.baseline_times.len()),
            ("base outcomes", base.outcomes.len()),
            ("smart outcomes", smart.outcomes.len()),
        ] {
            if got != n {
                return Err(OutputError::Misaligned { what, expected: n, got });
            }
        }

        let rows = population
            .agents
            .iter()
            .zip(&population.baseline_times)
            .zip(base.outcomes.iter().zip(&smart.outcomes))
            .map(|((agent, &baseline_s), (b, s))| TripRow {
                agent_id:      agent.id.0,
                smart:         agent.smart,
                start_node:    agent.start_node.0,
                end_node:      agent.end_node.0,
                start_time_s:  agent.start_time.secs(),
                baseline_s,
                base_outcome:  b.as_str(),
                base_time_s:   b.travel_time(),
                smart_outcome: s.as_str(),
                smart_time_s:  s.travel_time(),
            })
            .collect();
        Ok(rows)
    }
}

/// Static attributes of one edge and its mean speed in each run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeSpeedRow {
    pub edge_id:       u32,
    pub from:          u32,
    pub to:            u32,
    pub length_m:      f64,
    pub max_speed_mps: f64,
    /// `None` when the run did not track average speeds.
    pub base_avg_mps:  Option<f64>,
    pub smart_avg_mps: Option<f64>,
}

impl EdgeSpeedRow {
    pub fn collect(network: &RoadNetwork, base: &RunOutcome, smart: &RunOutcome) -> Vec<EdgeSpeedRow> {
        let avg = |run: &RunOutcome, e: usize| run.avg_speeds.as_ref().and_then(|v| v.get(e).copied());
        (0..network.edge_count())
            .map(|e| EdgeSpeedRow {
                edge_id:       e as u32,
                from:          network.edge_from[e].0,
                to:            network.edge_to[e].0,
                length_m:      network.edge_length_m[e],
                max_speed_mps: network.edge_max_speed[e],
                base_avg_mps:  avg(base, e),
                smart_avg_mps: avg(smart, e),
            })
            .collect()
    }
}

/// Travel-time comparison for one agent group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryRow {
    pub group:               &'static str,
    pub count:               usize,
    pub mean_base_s:         f64,
    pub mean_smart_s:        f64,
    pub mean_delta_s:        f64,
    pub median_delta_s:      f64,
    pub mean_relative_delta: f64,
    pub share_improved:      f64,
}

impl SummaryRow {
    /// Rows for the `smart`, `regular` and `all` groups, in that order.
    pub fn from_summary(summary: &StatsSummary) -> [SummaryRow; 3] {
        [
            ("smart", &summary.smart),
            ("regular", &summary.regular),
            ("all", &summary.all),
        ]
        .map(|(group, g)| SummaryRow {
            group,
            count:               g.count,
            mean_base_s:         g.mean_base,
            mean_smart_s:        g.mean_smart,
            mean_delta_s:        g.mean_delta,
            median_delta_s:      g.median_delta,
            mean_relative_delta: g.mean_relative_delta,
            share_improved:      g.share_improved,
        })
    }
}

/// What happened to an agent at an [`EventRow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Activate,
    Junction,
    Reroute,
    Finish,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Activate => "activate",
            EventKind::Junction => "junction",
            EventKind::Reroute  => "reroute",
            EventKind::Finish   => "finish",
        }
    }
}

/// One entry of the per-run event log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventRow {
    pub mode:     SimMode,
    pub time_s:   f64,
    pub agent_id: u32,
    pub kind:     EventKind,
    /// The junction the agent is at.
    pub node:     u32,
    /// The edge entered; `u32::MAX` on arrival.
    pub edge:     u32,
}

impl EventRow {
    pub fn new(mode: SimMode, now: SimTime, agent: AgentId, kind: EventKind, node: NodeId, edge: EdgeId) -> Self {
        Self {
            mode,
            time_s: now.secs(),
            agent_id: agent.0,
            kind,
            node: node.0,
            edge: edge.0,
        }
    }
}
