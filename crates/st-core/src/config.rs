//! Run-level simulation configuration.
//!
//! Everything the event loop needs is passed explicitly through
//! [`SimConfig`]; there is no ambient global state.  Drivers typically load
//! it from TOML (enable the `serde` feature) and call
//! [`SimConfig::validate`] before the first run.

use crate::{StError, StResult};

// ── SimMode ───────────────────────────────────────────────────────────────────

/// Which scenario a run simulates.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SimMode {
    /// Nobody reroutes; every agent follows its initial route.
    #[default]
    Base,
    /// Agents labelled smart may reroute at junctions.
    Smart,
}

impl SimMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SimMode::Base  => "base",
            SimMode::Smart => "smart",
        }
    }
}

impl std::fmt::Display for SimMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── RerouteMeasure ────────────────────────────────────────────────────────────

/// How the rerouting update period `U` is measured.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RerouteMeasure {
    /// Reroute once the agent has driven the distance it covers in `U`
    /// seconds at the speed of the edge it just completed.
    #[default]
    Distance,
    /// Reroute once `U` simulated seconds have passed since the last reroute.
    Time,
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Parameters of one simulation run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Road length (m) reserved for one vehicle.  Edge capacity is
    /// `length / density_factor`.
    pub density_factor: f64,

    /// Congestion floor speed in m/s.  Never zero, so every event stays
    /// finitely far in the future.
    pub v_min: f64,

    /// Number of candidate routes considered when rerouting.
    pub k: usize,

    /// Boltzmann temperature (seconds) for route choice.  `0` is greedy.
    pub temperature: f64,

    /// Rerouting update period `U` in seconds.  `0` reroutes at every
    /// junction.
    pub update_period: f64,

    /// Interpretation of `update_period`.
    pub reroute_measure: RerouteMeasure,

    /// Simulated-time cutoff in seconds; must be finite so a run whose
    /// reroutes keep oscillating still ends.  Agents still travelling then
    /// are reported as unfinished.
    pub max_sim_time: f64,

    /// Seed of the run's `SimRng` (Boltzmann route choice).
    pub seed: u64,

    /// Accumulate a time-weighted average speed per edge.
    pub track_avg_speeds: bool,

    /// Emit per-event diagnostics through `log`.  No behavioral effect.
    pub debug: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            density_factor:   5.0,
            v_min:            1.0,
            k:                3,
            temperature:      60.0,
            update_period:    0.0,
            reroute_measure:  RerouteMeasure::Distance,
            max_sim_time:     86_400.0,
            seed:             0,
            track_avg_speeds: false,
            debug:            false,
        }
    }
}

impl SimConfig {
    /// Check every parameter that would make a run meaningless.
    pub fn validate(&self) -> StResult<()> {
        if !(self.density_factor.is_finite() && self.density_factor > 0.0) {
            return Err(StError::config(format!(
                "density_factor must be a positive number, got {}",
                self.density_factor
            )));
        }
        if !(self.v_min.is_finite() && self.v_min > 0.0) {
            return Err(StError::config(format!(
                "v_min must be a positive number, got {}",
                self.v_min
            )));
        }
        if self.k == 0 {
            return Err(StError::config("k must be at least 1"));
        }
        // `temperature` may be +inf (uniform choice) but never NaN or negative.
        if self.temperature.is_nan() || self.temperature < 0.0 {
            return Err(StError::config(format!(
                "temperature must be non-negative, got {}",
                self.temperature
            )));
        }
        if !(self.update_period.is_finite() && self.update_period >= 0.0) {
            return Err(StError::config(format!(
                "update_period must be a non-negative number, got {}",
                self.update_period
            )));
        }
        if !(self.max_sim_time.is_finite() && self.max_sim_time > 0.0) {
            return Err(StError::config(format!(
                "max_sim_time must be a positive finite number, got {}",
                self.max_sim_time
            )));
        }
        Ok(())
    }
}
