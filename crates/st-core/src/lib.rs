//! `st-core` — foundational types for the smart-transit traffic simulator.
//!
//! This crate is a dependency of every other `st-*` crate.  It has no `st-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `NodeId`, `EdgeId`                         |
//! | [`geo`]         | `GeoPoint`, `Rect`, haversine distance                |
//! | [`time`]        | `SimTime` (seconds, totally ordered)                  |
//! | [`rng`]         | `SimRng` — the single seeded generator of a run       |
//! | [`config`]      | `SimConfig`, `SimMode`, `RerouteMeasure`              |
//! | [`error`]       | `StError`, `StResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{RerouteMeasure, SimConfig, SimMode};
pub use error::{StError, StResult};
pub use geo::{GeoPoint, Rect};
pub use ids::{AgentId, EdgeId, NodeId};
pub use rng::SimRng;
pub use time::SimTime;
