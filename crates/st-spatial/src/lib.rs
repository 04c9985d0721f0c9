//! `st-spatial` — road network, spatial indexing, and routing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `RoadNetwork` (adjacency + R-tree), `RoadNetworkBuilder`     |
//! | [`router`]  | `Router` trait, `Route`, `DijkstraRouter`, `AStarRouter`    |
//! | [`ksp`]     | `yen_a_star` — k shortest loopless paths                    |
//! | [`cache`]   | `RouteCache` — memoized candidates per (source, target)     |
//! | [`loader`]  | CSV node/edge loader, synthetic grid                        |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                         |

pub mod cache;
pub mod error;
pub mod ksp;
pub mod loader;
pub mod network;
pub mod router;

#[cfg(test)]
mod tests;

pub use cache::RouteCache;
pub use error::{SpatialError, SpatialResult};
pub use ksp::{yen, yen_a_star};
pub use loader::{grid_network, load_network_csv, load_network_reader, LoadedNetwork};
pub use network::{RoadNetwork, RoadNetworkBuilder};
pub use router::{path_cost, AStarRouter, BoundedAStar, DijkstraRouter, Route, Router, SearchMask};
