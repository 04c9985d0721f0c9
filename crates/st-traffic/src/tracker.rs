//! Time-weighted average speed per edge.

use st_core::{EdgeId, SimTime};

/// Integrates each edge's speed over time.
///
/// Call [`record`](Self::record) with the speed that was in force *before*
/// every change; [`averages`](Self::averages) closes the integral at the end
/// of the run.
#[derive(Debug, Clone)]
pub struct SpeedTracker {
    /// ∫ speed dt since t = 0, up to `last_change`.
    integral:    Vec<f64>,
    last_change: Vec<SimTime>,
}

impl SpeedTracker {
    pub fn new(edge_count: usize) -> Self {
        Self {
            integral:    vec![0.0; edge_count],
            last_change: vec![SimTime::ZERO; edge_count],
        }
    }

    /// `old_speed` held on `edge` from its last change until `now`.
    pub fn record(&mut self, edge: EdgeId, old_speed: f64, now: SimTime) {
        let i = edge.index();
        self.integral[i] += old_speed * now.since(self.last_change[i]);
        self.last_change[i] = now;
    }

    /// Mean speed of every edge over `[0, end]`, given the speeds in force at
    /// `end`.  A zero-length run reports the current speeds.
    pub fn averages(&self, current: &[f64], end: SimTime) -> Vec<f64> {
        let span = end.secs();
        self.integral
            .iter()
            .zip(&self.last_change)
            .zip(current)
            .map(|((&integral, &last), &speed)| {
                if span > 0.0 {
                    (integral + speed * end.since(last)) / span
                } else {
                    speed
                }
            })
            .collect()
    }
}
