//! Memoized k-shortest-path candidates keyed by (source, target).
//!
//! The cache stores *route shapes* (node/edge sequences).  Costs stored with
//! them are from the weights they were computed under; consumers re-cost them
//! with current speeds via [`Route::cost_under`].
//!
//! Lifetime is one experiment: the population generator fills it with
//! free-flow candidates and each run reads (and extends) its own copy.  There
//! is no eviction.
//!
//! Each entry remembers the `k` it was searched with.  A later request for
//! more paths searches again unless the stored list is already shorter than
//! its `k`, which means the pair has no further loopless paths.

use rustc_hash::FxHashMap;

use st_core::NodeId;

use crate::network::RoadNetwork;
use crate::router::Route;
use crate::yen_a_star;

#[derive(Debug, Clone)]
struct Entry {
    k:      usize,
    routes: Vec<Route>,
}

impl Entry {
    fn covers(&self, k: usize) -> bool {
        k <= self.k || self.routes.len() < self.k
    }
}

/// `(source, target) → candidate routes`, cheapest first.
#[derive(Debug, Default, Clone)]
pub struct RouteCache {
    entries: FxHashMap<(NodeId, NodeId), Entry>,
    hits:    u64,
    misses:  u64,
}

impl RouteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return at least `min(k, available)` cached candidates for the pair,
    /// running Yen's search under `weights` when the pair is new or was
    /// searched with a smaller `k`.
    ///
    /// An unreachable pair is cached as an empty list so it is not searched
    /// again.  The slice may hold more than `k` routes if an earlier request
    /// asked for more.
    pub fn get_or_compute(
        &mut self,
        network: &RoadNetwork,
        source:  NodeId,
        target:  NodeId,
        weights: &[f64],
        k:       usize,
    ) -> &[Route] {
        use std::collections::hash_map::Entry as Slot;

        let entry = match self.entries.entry((source, target)) {
            Slot::Occupied(slot) if slot.get().covers(k) => {
                self.hits += 1;
                slot.into_mut()
            }
            Slot::Occupied(slot) => {
                self.misses += 1;
                let entry = slot.into_mut();
                *entry = Entry { k, routes: yen_a_star(network, source, target, weights, k) };
                entry
            }
            Slot::Vacant(slot) => {
                self.misses += 1;
                slot.insert(Entry { k, routes: yen_a_star(network, source, target, weights, k) })
            }
        };
        entry.routes.as_slice()
    }

    /// Number of cached (source, target) pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` of [`get_or_compute`](Self::get_or_compute).  A
    /// search widened to a larger `k` counts as a miss.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}
