//! The `Sim` struct and its event loop.

use rustc_hash::FxHashMap;

use st_agent::{Agent, AgentStatus};
use st_core::{AgentId, EdgeId, SimConfig, SimMode, SimRng, SimTime, StError};
use st_spatial::{RoadNetwork, RouteCache};
use st_traffic::{traffic_constants, TrafficState};

use crate::events::{next_edge, update_event_agent, Junction};
use crate::reroute::{k_shortest_path_rerouting, Reroute};
use crate::{EventQueue, SimError, SimObserver, SimResult};

// ── Outcomes ──────────────────────────────────────────────────────────────────

/// How one agent's trip ended.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum TripOutcome {
    /// Reached the destination after this many seconds.
    Completed(f64),
    /// No path to the destination; never departed.
    Unreachable,
    /// Still dormant or travelling at the time limit.
    Unfinished,
}

impl TripOutcome {
    fn of(agent: &Agent) -> Self {
        match (agent.status, agent.travel_time) {
            (AgentStatus::Finished, Some(t)) => TripOutcome::Completed(t),
            (AgentStatus::Unreachable, _)    => TripOutcome::Unreachable,
            _                                => TripOutcome::Unfinished,
        }
    }

    pub fn travel_time(self) -> Option<f64> {
        match self {
            TripOutcome::Completed(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TripOutcome::Completed(_) => "completed",
            TripOutcome::Unreachable  => "unreachable",
            TripOutcome::Unfinished   => "unfinished",
        }
    }
}

/// Everything one run produces.  `outcomes` is aligned with the input agents.
#[derive(Clone, Debug, PartialEq)]
pub struct RunOutcome {
    pub mode:       SimMode,
    pub outcomes:   Vec<TripOutcome>,
    /// Time-weighted mean speed per edge over `[0, end_time]`, when tracked.
    pub avg_speeds: Option<Vec<f64>>,
    pub end_time:   SimTime,
    /// Activations plus junction events processed.
    pub events:     u64,
    /// Reroutes that changed a route.
    pub reroutes:   u64,
}

impl RunOutcome {
    /// Travel time of every agent, `None` unless completed.
    pub fn travel_times(&self) -> Vec<Option<f64>> {
        self.outcomes.iter().map(|o| o.travel_time()).collect()
    }

    pub fn completed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.travel_time().is_some()).count()
    }
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// One simulation run over a borrowed network and route cache.
///
/// Each step takes the earliest of the next activation and the next junction
/// event (activations first on ties):
///
/// ```text
/// activation  → place on first edge, refresh that edge, re-time its agents
/// junction    → leave edge, enter next one (or finish),
///               refresh both edges, re-time their agents,
///               smart agent in a Smart run → maybe reroute
/// ```
///
/// The loop stops when nothing is left or the next step lies beyond
/// `config.max_sim_time`.  Create with [`Sim::new`] or use
/// [`simulation_run`].
pub struct Sim<'a> {
    pub mode:    SimMode,
    pub config:  SimConfig,
    pub network: &'a RoadNetwork,
    pub cache:   &'a mut RouteCache,

    /// Indexed by `AgentId`.
    pub agents: Vec<Agent>,
    pub state:  TrafficState,
    /// Current crossing time of every edge (`length / speed`), the routing
    /// weights rerouting sees.
    pub weights: Vec<f64>,
    pub queue:   EventQueue,
    pub now:     SimTime,

    /// Dormant agents, latest departure first so the next one pops off the
    /// back.
    pending: Vec<AgentId>,
    /// Agents on each occupied edge, in order of entry.
    on_edge: FxHashMap<EdgeId, Vec<AgentId>>,
    rng:      SimRng,
    started:  bool,
    events:   u64,
    reroutes: u64,
}

impl<'a> Sim<'a> {
    /// Validate `config` and set up free-flow traffic with every agent
    /// dormant.  Agents must be indexed by their id.
    pub fn new(
        mode:    SimMode,
        network: &'a RoadNetwork,
        mut agents: Vec<Agent>,
        cache:   &'a mut RouteCache,
        config:  &SimConfig,
    ) -> SimResult<Self> {
        config.validate()?;
        let constants = traffic_constants(network, config.density_factor)?;
        let state = TrafficState::new(constants, config.v_min, config.track_avg_speeds)?;
        let weights = network.travel_time_weights(state.speeds());

        let mut pending = Vec::with_capacity(agents.len());
        for (i, agent) in agents.iter_mut().enumerate() {
            if agent.id.index() != i {
                return Err(StError::config(format!("agent at index {i} has id {}", agent.id)).into());
            }
            match agent.status {
                AgentStatus::Dormant if agent.route.is_empty() => {
                    agent.status = AgentStatus::Unreachable;
                }
                AgentStatus::Dormant => pending.push(agent.id),
                _ => {}
            }
            if config.debug && agent.status == AgentStatus::Unreachable {
                log::warn!("{}: {} cannot reach {}", agent.id, agent.start_node, agent.end_node);
            }
        }
        pending.sort_unstable_by(|a, b| {
            (agents[b.index()].start_time, *b).cmp(&(agents[a.index()].start_time, *a))
        });

        Ok(Self {
            mode,
            config: config.clone(),
            network,
            cache,
            agents,
            state,
            weights,
            queue: EventQueue::new(),
            now: SimTime::ZERO,
            pending,
            on_edge: FxHashMap::default(),
            rng: SimRng::new(config.seed),
            started: false,
            events: 0,
            reroutes: 0,
        })
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run to completion or to the time limit.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunOutcome> {
        while self.step(observer)? {}
        Ok(self.finish(observer))
    }

    /// Process one step.  The first call places the agents departing at
    /// t ≤ 0; later calls handle one activation or junction event each.
    /// Returns `false` once nothing is left or the time limit is reached.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<bool> {
        if !self.started {
            self.started = true;
            log::info!(
                "{} run: {} agents, {} pending, {} edges",
                self.mode,
                self.agents.len(),
                self.pending.len(),
                self.network.edge_count()
            );
            for id in self.init_traffic_variables()? {
                self.events += 1;
                let agent = &self.agents[id.index()];
                if agent.is_active() {
                    observer.on_activate(agent, self.now);
                } else {
                    observer.on_finish(agent, self.now);
                }
            }
            return Ok(true);
        }

        let next_activation = self.pending.last().map(|id| self.agents[id.index()].start_time);
        let (time, activation) = match (next_activation, self.queue.next_time()) {
            (None, None)                 => return Ok(false),
            (Some(a), Some(e)) if a <= e => (a, true),
            (Some(a), None)              => (a, true),
            (_, Some(e))                 => (e, false),
        };
        let horizon = SimTime(self.config.max_sim_time);
        if time > horizon {
            self.now = horizon;
            return Ok(false);
        }
        self.now = time;
        self.events += 1;

        if activation {
            if let Some(id) = self.pending.pop() {
                self.activate(id, observer)?;
            }
        } else if let Some((_, id)) = self.queue.pop() {
            self.process_junction(id, observer)?;
        }
        Ok(true)
    }

    /// Place every dormant agent with `start_time ≤ 0` on its first edge at
    /// t = 0, then set speeds and events from the combined density.
    /// Returns the placed agents.
    pub fn init_traffic_variables(&mut self) -> SimResult<Vec<AgentId>> {
        let mut placed = Vec::new();
        let mut edges = Vec::new();
        while let Some(&id) = self.pending.last() {
            if self.agents[id.index()].start_time > SimTime::ZERO {
                break;
            }
            self.pending.pop();
            if let Some(edge) = self.place(id, SimTime::ZERO)? {
                edges.push(edge);
            }
            placed.push(id);
        }
        edges.sort_unstable();
        edges.dedup();
        self.update_weights_and_events(&edges);
        Ok(placed)
    }

    /// Refresh density and speed of `edges` and re-time the junction event
    /// of every agent on them.
    ///
    /// Agents first advance along their edge at the old speed up to `now`;
    /// only the remaining distance is timed at the new speed.
    pub fn update_weights_and_events(&mut self, edges: &[EdgeId]) {
        let now = self.now;
        let lengths = &self.network.edge_length_m;

        for &edge in edges {
            let speed = self.state.speed(edge);
            for &id in self.on_edge.get(&edge).map(Vec::as_slice).unwrap_or_default() {
                self.agents[id.index()].advance_progress(now, speed, lengths[edge.index()]);
            }
        }

        self.state.refresh_edges(edges, now);

        for &edge in edges {
            self.weights[edge.index()] = lengths[edge.index()] / self.state.speed(edge);
            for &id in self.on_edge.get(&edge).map(Vec::as_slice).unwrap_or_default() {
                if let Some(dt) = next_edge(&self.agents[id.index()], self.state.speeds(), lengths) {
                    self.queue.schedule(now + dt, id);
                }
            }
        }
    }

    // ── Steps ─────────────────────────────────────────────────────────────

    fn activate<O: SimObserver>(&mut self, id: AgentId, observer: &mut O) -> SimResult<()> {
        match self.place(id, self.now)? {
            Some(edge) => {
                self.update_weights_and_events(&[edge]);
                observer.on_activate(&self.agents[id.index()], self.now);
            }
            None => observer.on_finish(&self.agents[id.index()], self.now),
        }
        Ok(())
    }

    /// Put a dormant agent on the first edge of its route.  A route of a
    /// single node finishes on the spot and returns `None`.
    fn place(&mut self, id: AgentId, now: SimTime) -> SimResult<Option<EdgeId>> {
        let agent = &mut self.agents[id.index()];
        let &[from, to, ..] = agent.route.as_slice() else {
            agent.status = AgentStatus::Finished;
            agent.travel_time = Some(0.0);
            return Ok(None);
        };
        let edge = self
            .network
            .edge_between(from, to)
            .ok_or(SimError::BrokenRoute { agent: id, from, to })?;

        agent.status = AgentStatus::Active;
        agent.start_edge(edge, now);
        agent.mark_rerouted(now);
        self.state.enter(edge);
        self.on_edge.entry(edge).or_default().push(id);
        if self.config.debug {
            log::debug!("{now} {id} departs {from} on {edge}");
        }
        Ok(Some(edge))
    }

    fn process_junction<O: SimObserver>(&mut self, id: AgentId, observer: &mut O) -> SimResult<()> {
        let left = self.agents[id.index()].edge;
        let completed_speed = self.state.speed(left);
        self.detach(id, left);

        let step = update_event_agent(&mut self.agents[id.index()], self.now, &mut self.state, self.network)?;
        if let Junction::Advanced { entered, .. } = step {
            self.on_edge.entry(entered).or_default().push(id);
        }
        self.update_weights_and_events(&step.touched());

        match step {
            Junction::Advanced { entered, .. } => {
                if self.config.debug {
                    match self.queue.time_of(id) {
                        Some(at) => log::debug!("{} {id} enters {entered}, next junction at {at}", self.now),
                        None => log::debug!("{} {id} enters {entered}", self.now),
                    }
                }
                observer.on_junction(&self.agents[id.index()], self.now);
                if self.mode == SimMode::Smart && self.agents[id.index()].smart {
                    self.reroute(id, completed_speed, observer);
                }
            }
            Junction::Arrived { .. } => {
                if self.config.debug {
                    log::debug!("{} {id} arrives after {:.1} s", self.now, self.now.since(self.agents[id.index()].start_time));
                }
                observer.on_finish(&self.agents[id.index()], self.now);
            }
        }
        Ok(())
    }

    fn reroute<O: SimObserver>(&mut self, id: AgentId, completed_speed: f64, observer: &mut O) {
        let outcome = k_shortest_path_rerouting(
            self.network,
            self.cache,
            &mut self.agents[id.index()],
            &self.weights,
            self.now,
            completed_speed,
            &self.config,
            &mut self.rng,
        );
        if outcome == Reroute::Changed {
            self.reroutes += 1;
            if self.config.debug {
                log::debug!("{} {id} rerouted, {} nodes to go", self.now, self.agents[id.index()].route.len());
            }
            observer.on_reroute(&self.agents[id.index()], self.now);
        }
    }

    fn detach(&mut self, id: AgentId, edge: EdgeId) {
        if let Some(ids) = self.on_edge.get_mut(&edge) {
            if let Some(pos) = ids.iter().position(|&a| a == id) {
                ids.remove(pos);
            }
            if ids.is_empty() {
                self.on_edge.remove(&edge);
            }
        }
    }

    /// Mark leftovers unfinished and assemble the outcome.
    pub fn finish<O: SimObserver>(&mut self, observer: &mut O) -> RunOutcome {
        let mut unfinished = 0usize;
        for agent in &mut self.agents {
            if !agent.status.is_terminal() {
                agent.status = AgentStatus::Unfinished;
                unfinished += 1;
                if self.config.debug {
                    log::warn!("{} unfinished at {}", agent.id, self.now);
                }
            }
        }

        let outcomes: Vec<TripOutcome> = self.agents.iter().map(TripOutcome::of).collect();
        let completed = outcomes.iter().filter(|o| o.travel_time().is_some()).count();
        log::info!(
            "{} run ended at {}: {} completed, {} unfinished, {} events, {} reroutes",
            self.mode,
            self.now,
            completed,
            unfinished,
            self.events,
            self.reroutes
        );
        if self.mode == SimMode::Smart {
            let (hits, misses) = self.cache.stats();
            log::info!(
                "route cache: {} pairs, {} hits, {} searches",
                self.cache.len(),
                hits,
                misses
            );
        }
        observer.on_sim_end(self.now);

        RunOutcome {
            mode:       self.mode,
            outcomes,
            avg_speeds: self.state.average_speeds(self.now),
            end_time:   self.now,
            events:     self.events,
            reroutes:   self.reroutes,
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Simulate `agents` on `network` in `mode` and report every trip.
///
/// The agents are cloned, so the same population can be run in both modes.
/// Rerouting reads and extends `cache`.  With no agents the result is empty
/// and no event is processed.
pub fn simulation_run<O: SimObserver>(
    mode:     SimMode,
    network:  &RoadNetwork,
    agents:   &[Agent],
    cache:    &mut RouteCache,
    config:   &SimConfig,
    observer: &mut O,
) -> SimResult<RunOutcome> {
    config.validate()?;
    if agents.is_empty() {
        return Ok(RunOutcome {
            mode,
            outcomes:   Vec::new(),
            avg_speeds: config.track_avg_speeds.then(|| network.edge_max_speed.clone()),
            end_time:   SimTime::ZERO,
            events:     0,
            reroutes:   0,
        });
    }
    Sim::new(mode, network, agents.to_vec(), cache, config)?.run(observer)
}
