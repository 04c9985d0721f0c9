//! `st-traffic` — the macroscopic traffic model.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`constants`] | `TrafficConstants` — per-edge capacity and speed limit       |
//! | [`speed`]     | density → speed mapping, `update_weights`                    |
//! | [`state`]     | `TrafficState` — live speeds, densities, occupancy           |
//! | [`tracker`]   | `SpeedTracker` — time-weighted average speed per edge        |
//! | [`error`]     | `TrafficError`, `TrafficResult<T>`                           |
//!
//! # Speed model
//!
//! Each directed edge is one macroscopic unit.  With `n` vehicles on an edge
//! of capacity `ρ_max = length / density_factor`:
//!
//! ```text
//! ρ     = clamp(n, 0, ρ_max)
//! speed = max(V_min, V_max · (1 − ρ / ρ_max))
//! ```
//!
//! The floor `V_min` keeps every crossing time finite.

pub mod constants;
pub mod error;
pub mod speed;
pub mod state;
pub mod tracker;

#[cfg(test)]
mod tests;

pub use constants::{max_densities, traffic_constants, TrafficConstants};
pub use error::{TrafficError, TrafficResult};
pub use speed::{speed_for_density, update_weights};
pub use state::TrafficState;
pub use tracker::SpeedTracker;
