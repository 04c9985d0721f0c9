//! Origin/destination sampling and the population generator.

use rand_distr::{Distribution, Normal};

use st_core::{AgentId, NodeId, Rect, SimRng, SimTime, StError, StResult};
use st_spatial::{RoadNetwork, RouteCache};

use crate::Agent;

/// Attempts at drawing a distinct (start, end) pair before giving up.
const MAX_PAIR_ATTEMPTS: usize = 1_000;

// ── PopulationConfig ──────────────────────────────────────────────────────────

/// Everything `generate_agents` needs besides the network and the cache.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PopulationConfig {
    /// Number of agents `N`.
    pub n_agents: usize,
    pub start_areas: Vec<Rect>,
    pub end_areas: Vec<Rect>,
    /// Probability `α` that an agent uses the rerouting service.
    pub smart_fraction: f64,
    /// Candidate routes computed per (start, end) pair.
    pub k: usize,
    /// Mean departure time in minutes.
    pub avg_start_time_min: f64,
    /// Standard deviation of the departure time in minutes.
    pub start_time_std_min: f64,
    pub seed: u64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            n_agents:           1_000,
            start_areas:        Vec::new(),
            end_areas:          Vec::new(),
            smart_fraction:     0.5,
            k:                  3,
            avg_start_time_min: 30.0,
            start_time_std_min: 10.0,
            seed:               0,
        }
    }
}

impl PopulationConfig {
    pub fn validate(&self) -> StResult<()> {
        if self.n_agents == 0 {
            return Err(StError::config("n_agents must be at least 1"));
        }
        if self.k == 0 {
            return Err(StError::config("k must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.smart_fraction) {
            return Err(StError::config(format!(
                "smart_fraction must lie in [0, 1], got {}",
                self.smart_fraction
            )));
        }
        if !(self.avg_start_time_min.is_finite()
            && self.start_time_std_min.is_finite()
            && self.start_time_std_min >= 0.0)
        {
            return Err(StError::config(format!(
                "start time distribution N({}, {}) is invalid",
                self.avg_start_time_min, self.start_time_std_min
            )));
        }
        Ok(())
    }
}

// ── Population ────────────────────────────────────────────────────────────────

/// Generated agents plus each one's free-flow travel time on its initial
/// route (`None` for unreachable pairs).  Both vectors are indexed by
/// `AgentId`.
#[derive(Clone, Debug)]
pub struct Population {
    pub agents:         Vec<Agent>,
    pub baseline_times: Vec<Option<f64>>,
}

impl Population {
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// `smart` flag of every agent, in order.
    pub fn smart_indicator(&self) -> Vec<bool> {
        self.agents.iter().map(|a| a.smart).collect()
    }
}

// ── Area sampling ─────────────────────────────────────────────────────────────

/// Every node inside any of `rects`, sorted and deduplicated.
///
/// # Errors
///
/// `StError::Config` if `rects` is empty, a rectangle is degenerate, or no
/// node falls inside the areas.
pub fn nodes_in_areas(network: &RoadNetwork, rects: &[Rect]) -> StResult<Vec<NodeId>> {
    if rects.is_empty() {
        return Err(StError::config("no areas given"));
    }
    let mut nodes = Vec::new();
    for rect in rects {
        if rect.is_degenerate() {
            return Err(StError::config(format!(
                "area {} to {} has zero extent",
                rect.p1, rect.p2
            )));
        }
        nodes.extend(network.nodes_in_rect(rect));
    }
    nodes.sort_unstable();
    nodes.dedup();
    if nodes.is_empty() {
        return Err(StError::config("areas contain no network nodes"));
    }
    Ok(nodes)
}

/// A node drawn uniformly from the nodes inside `rects`.
pub fn pick_random_node(network: &RoadNetwork, rects: &[Rect], rng: &mut SimRng) -> StResult<NodeId> {
    let nodes = nodes_in_areas(network, rects)?;
    rng.choose(&nodes)
        .copied()
        .ok_or_else(|| StError::config("areas contain no network nodes"))
}

/// Draw a (start, end) pair with `start != end`.
fn sample_pair(starts: &[NodeId], ends: &[NodeId], rng: &mut SimRng) -> StResult<(NodeId, NodeId)> {
    for _ in 0..MAX_PAIR_ATTEMPTS {
        let (Some(&start), Some(&end)) = (rng.choose(starts), rng.choose(ends)) else {
            break;
        };
        if start != end {
            return Ok((start, end));
        }
    }
    Err(StError::config(
        "start and end areas yield no pair of distinct nodes",
    ))
}

// ── Generator ─────────────────────────────────────────────────────────────────

/// Generate `config.n_agents` agents.
///
/// Per agent, in this order: start node, end node (redrawn together while
/// they coincide), smart flag `~ Bernoulli(α)`, departure time
/// `~ Normal(avg, std)` clamped at zero.  The initial route is the cheapest
/// free-flow path, taken from `cache` when the pair is already there and
/// otherwise computed (with `k` alternatives) and stored.
///
/// All draws come from one `SimRng` seeded with `config.seed`, so the same
/// config yields the same population.
pub fn generate_agents(
    network: &RoadNetwork,
    config:  &PopulationConfig,
    cache:   &mut RouteCache,
) -> StResult<Population> {
    config.validate()?;
    let starts = nodes_in_areas(network, &config.start_areas)?;
    let ends = nodes_in_areas(network, &config.end_areas)?;
    if starts.len() == 1 && starts == ends {
        return Err(StError::config(format!(
            "start and end areas both contain only {}",
            starts[0]
        )));
    }

    let departure = Normal::new(config.avg_start_time_min * 60.0, config.start_time_std_min * 60.0)
        .map_err(|e| StError::config(format!("start time distribution: {e}")))?;
    let weights = network.free_flow_weights();
    let mut rng = SimRng::new(config.seed);

    let mut agents = Vec::with_capacity(config.n_agents);
    let mut baseline_times = Vec::with_capacity(config.n_agents);
    let mut unreachable = 0usize;

    for i in 0..config.n_agents {
        let id = AgentId::try_from(i)
            .map_err(|_| StError::config(format!("{} agents exceed the id space", config.n_agents)))?;
        let (start, end) = sample_pair(&starts, &ends, &mut rng)?;
        let smart = rng.gen_bool(config.smart_fraction);
        let start_time = SimTime(departure.sample(rng.inner()).max(0.0));

        match cache.get_or_compute(network, start, end, &weights, config.k).first() {
            Some(route) => {
                baseline_times.push(Some(route.cost_under(&weights)));
                agents.push(Agent::new(id, smart, route.nodes.clone(), start_time));
            }
            None => {
                unreachable += 1;
                log::debug!("{id}: no route from {start} to {end}");
                baseline_times.push(None);
                agents.push(Agent::unreachable(id, smart, start, end, start_time));
            }
        }
    }

    let smart = agents.iter().filter(|a| a.smart).count();
    log::info!(
        "generated {} agents ({} smart, {} unreachable); {} cached route pairs after {} searches",
        agents.len(),
        smart,
        unreachable,
        cache.len(),
        cache.stats().1
    );

    Ok(Population { agents, baseline_times })
}
