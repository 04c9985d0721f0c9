//! Simulation observer trait for progress reporting and data collection.

use st_agent::Agent;
use st_core::SimTime;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] as agents move.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.  Observers see agents read-only and cannot
/// influence the run.
///
/// # Example — arrival counter
///
/// ```rust,ignore
/// struct Arrivals(usize);
///
/// impl SimObserver for Arrivals {
///     fn on_finish(&mut self, _agent: &Agent, _now: SimTime) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait SimObserver {
    /// An agent left its start node and entered its first edge.
    fn on_activate(&mut self, _agent: &Agent, _now: SimTime) {}

    /// An agent crossed a junction and entered `agent.edge`.
    fn on_junction(&mut self, _agent: &Agent, _now: SimTime) {}

    /// A smart agent replaced the rest of its route.
    fn on_reroute(&mut self, _agent: &Agent, _now: SimTime) {}

    /// An agent reached its destination.
    fn on_finish(&mut self, _agent: &Agent, _now: SimTime) {}

    /// Called once after the loop stops.
    fn on_sim_end(&mut self, _end: SimTime) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
