//! Per-edge constants derived once from the network.

use st_spatial::RoadNetwork;

use crate::{TrafficError, TrafficResult};

/// Capacity and speed limit of every edge, indexed by `EdgeId`.
///
/// Read-only for the lifetime of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficConstants {
    /// Vehicles an edge holds before its speed drops to the floor.
    pub max_density: Vec<f64>,
    /// Free-flow speed in m/s.
    pub max_speed: Vec<f64>,
}

impl TrafficConstants {
    pub fn edge_count(&self) -> usize {
        self.max_density.len()
    }
}

/// `length / density_factor` for every edge.
pub fn max_densities(network: &RoadNetwork, density_factor: f64) -> TrafficResult<Vec<f64>> {
    if !(density_factor.is_finite() && density_factor > 0.0) {
        return Err(TrafficError::InvalidDensityFactor(density_factor));
    }
    Ok(network.edge_length_m.iter().map(|len| len / density_factor).collect())
}

/// Build the capacity and speed-limit tables for `network`.
///
/// `density_factor` is the road length (m) one vehicle occupies.
pub fn traffic_constants(network: &RoadNetwork, density_factor: f64) -> TrafficResult<TrafficConstants> {
    Ok(TrafficConstants {
        max_density: max_densities(network, density_factor)?,
        max_speed:   network.edge_max_speed.clone(),
    })
}
