//! `TrafficState` — the mutable half of the traffic model.

use st_core::{EdgeId, SimTime};

use crate::{update_weights, SpeedTracker, TrafficConstants, TrafficError, TrafficResult};

/// Live speed, density and occupancy of every edge for one run.
///
/// Owned by the event loop.  Occupancy changes through
/// [`enter`](Self::enter) and [`leave`](Self::leave); densities and speeds
/// follow only when [`refresh_edges`](Self::refresh_edges) or
/// [`apply_densities`](Self::apply_densities) runs, so the loop can bring
/// every affected agent up to date at the old speed first.
#[derive(Debug, Clone)]
pub struct TrafficState {
    constants: TrafficConstants,
    v_min:     f64,
    speeds:    Vec<f64>,
    /// Occupancy clamped to `[0, max_density]`.
    densities: Vec<f64>,
    /// Raw number of agents on each edge.
    occupancy: Vec<u32>,
    tracker:   Option<SpeedTracker>,
}

impl TrafficState {
    /// Empty roads at free-flow speed.
    pub fn new(constants: TrafficConstants, v_min: f64, track_avg_speeds: bool) -> TrafficResult<Self> {
        if !(v_min.is_finite() && v_min > 0.0) {
            return Err(TrafficError::InvalidMinSpeed(v_min));
        }
        let n = constants.edge_count();
        Ok(Self {
            speeds:    constants.max_speed.clone(),
            densities: vec![0.0; n],
            occupancy: vec![0; n],
            tracker:   track_avg_speeds.then(|| SpeedTracker::new(n)),
            constants,
            v_min,
        })
    }

    // ── Read access ───────────────────────────────────────────────────────

    pub fn constants(&self) -> &TrafficConstants {
        &self.constants
    }

    pub fn v_min(&self) -> f64 {
        self.v_min
    }

    /// Current speed of every edge in m/s, indexed by `EdgeId`.
    pub fn speeds(&self) -> &[f64] {
        &self.speeds
    }

    pub fn densities(&self) -> &[f64] {
        &self.densities
    }

    #[inline]
    pub fn speed(&self, edge: EdgeId) -> f64 {
        self.speeds[edge.index()]
    }

    #[inline]
    pub fn density(&self, edge: EdgeId) -> f64 {
        self.densities[edge.index()]
    }

    #[inline]
    pub fn occupancy(&self, edge: EdgeId) -> u32 {
        self.occupancy[edge.index()]
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// One more agent on `edge`.  Speeds are unchanged until
    /// [`refresh_edges`](Self::refresh_edges).
    pub fn enter(&mut self, edge: EdgeId) {
        self.occupancy[edge.index()] += 1;
    }

    /// One agent fewer on `edge`.  Speeds are unchanged until
    /// [`refresh_edges`](Self::refresh_edges).
    pub fn leave(&mut self, edge: EdgeId) {
        let occ = &mut self.occupancy[edge.index()];
        if *occ == 0 {
            log::warn!("{edge} left while already empty");
        }
        *occ = occ.saturating_sub(1);
    }

    /// Recompute density and speed of `edges` from their occupancy at `now`.
    pub fn refresh_edges(&mut self, edges: &[EdgeId], now: SimTime) {
        let densities: Vec<(EdgeId, f64)> = edges
            .iter()
            .map(|&e| (e, self.occupancy[e.index()] as f64))
            .collect();
        self.apply_densities(&densities, now);
    }

    /// Set densities directly and recompute the listed edges' speeds.
    ///
    /// Densities are clamped to `[0, max_density]`; occupancy is left alone.
    pub fn apply_densities(&mut self, new_densities: &[(EdgeId, f64)], now: SimTime) {
        let clamped: Vec<(EdgeId, f64)> = new_densities
            .iter()
            .map(|&(edge, d)| (edge, d.clamp(0.0, self.constants.max_density[edge.index()].max(0.0))))
            .collect();
        if let Some(tracker) = &mut self.tracker {
            for &(edge, _) in &clamped {
                tracker.record(edge, self.speeds[edge.index()], now);
            }
        }
        for &(edge, d) in &clamped {
            self.densities[edge.index()] = d;
        }
        update_weights(
            &mut self.speeds,
            &clamped,
            &self.constants.max_density,
            &self.constants.max_speed,
            self.v_min,
        );
    }

    // ── Average speeds ────────────────────────────────────────────────────

    /// Time-weighted mean speed per edge over `[0, end]`, if tracking is on.
    pub fn average_speeds(&self, end: SimTime) -> Option<Vec<f64>> {
        self.tracker.as_ref().map(|t| t.averages(&self.speeds, end))
    }
}
