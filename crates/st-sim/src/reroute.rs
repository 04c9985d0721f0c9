//! k-shortest-path rerouting with Boltzmann route choice.

use rand::distributions::{Distribution, WeightedIndex};

use st_agent::Agent;
use st_core::{RerouteMeasure, SimConfig, SimRng, SimTime};
use st_spatial::{RoadNetwork, RouteCache};

/// Result of one [`k_shortest_path_rerouting`] call.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Reroute {
    /// The update period has not elapsed yet.
    NotDue,
    /// Due, but the route stayed as it was (no alternative, or the current
    /// plan was drawn again).
    Kept,
    /// The route beyond the current edge was replaced.
    Changed,
}

/// Index of the chosen candidate, drawn with `P(i) ∝ exp(−cost_i / T)`.
///
/// Costs are shifted by their minimum first so the best candidate has
/// weight 1 and nothing underflows to an all-zero distribution.
/// `T == 0` picks the cheapest (first on ties) without drawing; `T == ∞`
/// draws uniformly.  `None` only for an empty slice.
pub fn select_route_boltzmann(costs: &[f64], temperature: f64, rng: &mut SimRng) -> Option<usize> {
    let best = argmin(costs)?;
    if costs.len() == 1 || temperature <= 0.0 {
        return Some(best);
    }
    if temperature.is_infinite() {
        return Some(rng.gen_range(0..costs.len()));
    }
    let min = costs[best];
    let weights: Vec<f64> = costs.iter().map(|c| (-(c - min) / temperature).exp()).collect();
    match WeightedIndex::new(&weights) {
        Ok(dist) => Some(dist.sample(rng.inner())),
        Err(_) => Some(best),
    }
}

fn argmin(costs: &[f64]) -> Option<usize> {
    costs
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
}

/// `true` once `agent` has gone one update period since its last reroute.
///
/// `speed` is the speed of the edge it just completed; with
/// [`RerouteMeasure::Distance`] the period is the distance covered in
/// `update_period` seconds at that speed.
pub fn reroute_due(agent: &Agent, now: SimTime, speed: f64, config: &SimConfig) -> bool {
    if config.update_period <= 0.0 {
        return true;
    }
    match config.reroute_measure {
        RerouteMeasure::Distance => agent.distance_since_reroute >= config.update_period * speed,
        RerouteMeasure::Time     => now.since(agent.last_reroute_time) >= config.update_period,
    }
}

/// Re-plan the part of `agent`'s route beyond its current edge.
///
/// Candidates from the head of the current edge to the destination come
/// from `cache` (computed under `weights` on a miss) and are re-costed under
/// `weights`, the current per-edge travel times.  One is drawn with
/// [`select_route_boltzmann`].  The current edge, `start_time` and progress
/// are untouched.  No candidates, or an agent already on its last edge,
/// leaves the route as it was.
#[allow(clippy::too_many_arguments)]
pub fn k_shortest_path_rerouting(
    network:         &RoadNetwork,
    cache:           &mut RouteCache,
    agent:           &mut Agent,
    weights:         &[f64],
    now:             SimTime,
    completed_speed: f64,
    config:          &SimConfig,
    rng:             &mut SimRng,
) -> Reroute {
    if !reroute_due(agent, now, completed_speed, config) {
        return Reroute::NotDue;
    }
    agent.mark_rerouted(now);

    let (Some(tail), Some(head)) = (agent.current_node(), agent.next_node()) else {
        return Reroute::Kept;
    };
    if head == agent.end_node {
        return Reroute::Kept;
    }

    let candidates = cache.get_or_compute(network, head, agent.end_node, weights, config.k);
    let candidates = &candidates[..candidates.len().min(config.k)];
    let costs: Vec<f64> = candidates.iter().map(|r| r.cost_under(weights)).collect();
    let Some(choice) = select_route_boltzmann(&costs, config.temperature, rng) else {
        return Reroute::Kept;
    };

    let chosen = &candidates[choice].nodes;
    if agent.route[1..] == chosen[..] {
        return Reroute::Kept;
    }
    let mut route = Vec::with_capacity(chosen.len() + 1);
    route.push(tail);
    route.extend_from_slice(chosen);
    agent.route = route;
    Reroute::Changed
}
