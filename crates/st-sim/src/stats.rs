//! Base vs smart comparison.

use crate::{SimError, SimResult};

/// Travel-time comparison for one group of agents.
///
/// `delta = smart − base`, so negative means the smart run was faster.
/// Only agents that completed in both runs are counted; an empty group has
/// `count == 0` and zeros everywhere else.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct GroupStats {
    pub count:               usize,
    pub mean_base:           f64,
    pub mean_smart:          f64,
    pub mean_delta:          f64,
    pub median_delta:        f64,
    /// Mean of `delta / base` over agents with a positive base time.
    pub mean_relative_delta: f64,
    /// Fraction of the group with `delta < 0`.
    pub share_improved:      f64,
}

impl GroupStats {
    fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        if pairs.is_empty() {
            return Self::default();
        }
        let n = pairs.len() as f64;
        let mut deltas: Vec<f64> = pairs.iter().map(|(b, s)| s - b).collect();
        deltas.sort_unstable_by(f64::total_cmp);
        let relative: Vec<f64> = pairs
            .iter()
            .filter(|(b, _)| *b > 0.0)
            .map(|(b, s)| (s - b) / b)
            .collect();

        Self {
            count:               pairs.len(),
            mean_base:           pairs.iter().map(|(b, _)| b).sum::<f64>() / n,
            mean_smart:          pairs.iter().map(|(_, s)| s).sum::<f64>() / n,
            mean_delta:          deltas.iter().sum::<f64>() / n,
            median_delta:        median(&deltas),
            mean_relative_delta: if relative.is_empty() {
                0.0
            } else {
                relative.iter().sum::<f64>() / relative.len() as f64
            },
            share_improved:      deltas.iter().filter(|d| **d < 0.0).count() as f64 / n,
        }
    }
}

/// Median of a sorted, non-empty slice.
fn median(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Comparison of a base run and a smart run of the same population.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct StatsSummary {
    /// Agents using the rerouting service.
    pub smart:    GroupStats,
    /// Agents that never reroute; shows the effect of rerouting on others.
    pub regular:  GroupStats,
    pub all:      GroupStats,
    /// Agents left out because they did not complete in both runs.
    pub excluded: usize,
}

/// Compare per-agent travel times of the two runs.
///
/// All three slices are aligned by agent.  Pure: nothing is mutated.
pub fn gather_statistics(
    smart_ind:   &[bool],
    times_base:  &[Option<f64>],
    times_smart: &[Option<f64>],
) -> SimResult<StatsSummary> {
    for (what, len) in [("base travel times", times_base.len()), ("smart travel times", times_smart.len())] {
        if len != smart_ind.len() {
            return Err(SimError::AgentCountMismatch { expected: smart_ind.len(), got: len, what });
        }
    }

    let mut smart = Vec::new();
    let mut regular = Vec::new();
    let mut excluded = 0;
    for ((&is_smart, base), with_smart) in smart_ind.iter().zip(times_base).zip(times_smart) {
        match (base, with_smart) {
            (Some(b), Some(s)) if is_smart => smart.push((*b, *s)),
            (Some(b), Some(s))             => regular.push((*b, *s)),
            _                              => excluded += 1,
        }
    }
    let all: Vec<(f64, f64)> = smart.iter().chain(&regular).copied().collect();

    Ok(StatsSummary {
        smart:   GroupStats::from_pairs(&smart),
        regular: GroupStats::from_pairs(&regular),
        all:     GroupStats::from_pairs(&all),
        excluded,
    })
}
