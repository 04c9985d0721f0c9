//! Event-loop primitives: crossing times and the junction step.

use st_agent::{Agent, AgentStatus};
use st_core::{EdgeId, SimTime};
use st_spatial::RoadNetwork;
use st_traffic::TrafficState;

use crate::{SimError, SimResult};

/// Seconds until `agent` reaches the end of its current edge at `speeds`,
/// given the distance it has already covered.  `None` if it is not on an
/// edge.
///
/// At the start of an edge this is simply `length / speed`.
pub fn next_edge(agent: &Agent, speeds: &[f64], lengths: &[f64]) -> Option<f64> {
    if !agent.edge.is_valid() {
        return None;
    }
    let i = agent.edge.index();
    let remaining = (lengths[i] - agent.edge_progress_m).max(0.0);
    Some(remaining / speeds[i])
}

/// [`next_edge`] for every agent.
pub fn next_edges(agents: &[Agent], speeds: &[f64], lengths: &[f64]) -> Vec<Option<f64>> {
    agents.iter().map(|a| next_edge(a, speeds, lengths)).collect()
}

/// What a junction step did to the agent.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Junction {
    /// Left `left` and entered `entered`.
    Advanced { left: EdgeId, entered: EdgeId },
    /// Left `left` at the destination.
    Arrived { left: EdgeId },
}

impl Junction {
    /// Every edge whose occupancy changed.
    pub fn touched(&self) -> Vec<EdgeId> {
        match *self {
            Junction::Advanced { left, entered } => vec![left, entered],
            Junction::Arrived { left }           => vec![left],
        }
    }
}

/// Move `agent` across the junction at the end of its current edge at `now`.
///
/// Vacates the current edge; then either enters the next edge of `route` or,
/// with the route exhausted, finishes the trip with
/// `travel_time = now − start_time`.  Only occupancy changes here: the
/// caller refreshes speeds and re-times events for the touched edges.
pub fn update_event_agent(
    agent:   &mut Agent,
    now:     SimTime,
    state:   &mut TrafficState,
    network: &RoadNetwork,
) -> SimResult<Junction> {
    let left = agent.edge;
    state.leave(left);
    agent.distance_since_reroute += network.edge_length_m[left.index()];
    if !agent.route.is_empty() {
        agent.route.remove(0);
    }

    if let &[from, to, ..] = agent.route.as_slice() {
        let entered = network
            .edge_between(from, to)
            .ok_or(SimError::BrokenRoute { agent: agent.id, from, to })?;
        state.enter(entered);
        agent.start_edge(entered, now);
        Ok(Junction::Advanced { left, entered })
    } else {
        agent.edge = EdgeId::INVALID;
        agent.status = AgentStatus::Finished;
        agent.travel_time = Some(now.since(agent.start_time));
        Ok(Junction::Arrived { left })
    }
}
