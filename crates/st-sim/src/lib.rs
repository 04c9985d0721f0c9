//! `st-sim` — the discrete-event simulation loop.
//!
//! # Event loop
//!
//! ```text
//! init       — agents departing at t ≤ 0 enter their first edge together
//! repeat:
//!   ① pick   — earliest of next activation / next junction event
//!              (activation first on ties); stop past max_sim_time
//!   ② move   — activation: enter first edge
//!              junction:   leave edge, enter next edge or finish
//!   ③ update — refresh density/speed of the touched edges and re-time
//!              every event on them (progress kept, remainder re-timed)
//!   ④ smart  — Smart run + smart agent + update period elapsed
//!              → k-shortest-path reroute beyond the current edge
//! finish     — leftovers become Unfinished; optional average speeds
//! ```
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`queue`]    | `EventQueue` — `(time, seq)`-ordered junction events       |
//! | [`events`]   | `next_edge`, `next_edges`, `update_event_agent`            |
//! | [`reroute`]  | `select_route_boltzmann`, `k_shortest_path_rerouting`      |
//! | [`sim`]      | `Sim`, `simulation_run`, `RunOutcome`, `TripOutcome`       |
//! | [`stats`]    | `gather_statistics`, `StatsSummary`, `GroupStats`          |
//! | [`observer`] | `SimObserver`, `NoopObserver`                              |
//! | [`error`]    | `SimError`, `SimResult<T>`                                 |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let mut cache = RouteCache::new();
//! let population = generate_agents(&network, &pop_config, &mut cache)?;
//! let base  = simulation_run(SimMode::Base,  &network, &population.agents,
//!                            &mut cache.clone(), &sim_config, &mut NoopObserver)?;
//! let smart = simulation_run(SimMode::Smart, &network, &population.agents,
//!                            &mut cache, &sim_config, &mut NoopObserver)?;
//! let summary = gather_statistics(&population.smart_indicator(),
//!                                 &base.travel_times(), &smart.travel_times())?;
//! ```

pub mod error;
pub mod events;
pub mod observer;
pub mod queue;
pub mod reroute;
pub mod sim;
pub mod stats;


pub use error::{SimError, SimResult};
pub use events::{next_edge, next_edges, update_event_agent, Junction};
pub use observer::{NoopObserver, SimObserver};
pub use queue::EventQueue;
pub use reroute::{k_shortest_path_rerouting, reroute_due, select_route_boltzmann, Reroute};
pub use sim::{simulation_run, RunOutcome, Sim, TripOutcome};
pub use stats::{gather_statistics, GroupStats, StatsSummary};
