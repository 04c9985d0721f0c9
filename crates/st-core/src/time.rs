//! Simulated time.
//!
//! The event loop is continuous-time: an agent reaches the end of an edge at
//! `length / speed` seconds after entering it, not at a tick boundary.  Time
//! is therefore an `f64` number of seconds since the start of the run.
//!
//! `SimTime` wraps the float with a total order (`f64::total_cmp`) so it can
//! key a `BTreeMap` event queue.  Values are always finite and non-negative
//! in practice; the order is still total for NaN, which keeps the queue
//! well-formed even if a caller feeds it garbage.

use std::cmp::Ordering;
use std::fmt;

/// Seconds since the start of the simulation.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    #[inline]
    pub fn secs(self) -> f64 {
        self.0
    }

    /// Seconds elapsed from `earlier` to `self` (never negative).
    #[inline]
    pub fn since(self, earlier: SimTime) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::ops::Add<f64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: f64) -> SimTime {
        SimTime(self.0 + rhs)
    }
}

impl std::ops::Sub for SimTime {
    type Output = f64;
    #[inline]
    fn sub(self, rhs: SimTime) -> f64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.0.max(0.0);
        let hours = (total / 3_600.0).floor();
        let minutes = ((total % 3_600.0) / 60.0).floor();
        let secs = total % 60.0;
        write!(f, "{hours:02}:{minutes:02}:{secs:05.2}")
    }
}
