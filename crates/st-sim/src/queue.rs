//! `EventQueue` — time-ordered "agent reaches its next junction" events.
//!
//! Keys are `(time, seq)` where `seq` increases with every push, so equal
//! times pop in scheduling order and replays are exact.  Each agent has at
//! most one pending event; scheduling it again replaces the old entry, which
//! is how events are re-timed when an edge's speed changes.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use st_core::{AgentId, SimTime};

type EventKey = (SimTime, u64);

#[derive(Default, Debug)]
pub struct EventQueue {
    inner: BTreeMap<EventKey, AgentId>,
    /// Current key of every agent with a pending event.
    keys: FxHashMap<AgentId, EventKey>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `agent` at `time`, replacing any event it already has.
    pub fn schedule(&mut self, time: SimTime, agent: AgentId) {
        let key = (time, self.next_seq);
        self.next_seq += 1;
        if let Some(old) = self.keys.insert(agent, key) {
            self.inner.remove(&old);
        }
        self.inner.insert(key, agent);
    }

    /// Remove and return the earliest event.
    pub fn pop(&mut self) -> Option<(SimTime, AgentId)> {
        let ((time, _), agent) = self.inner.pop_first()?;
        self.keys.remove(&agent);
        Some((time, agent))
    }

    /// Time of the earliest event, or `None` if empty.
    pub fn next_time(&self) -> Option<SimTime> {
        self.inner.keys().next().map(|&(t, _)| t)
    }

    pub fn time_of(&self, agent: AgentId) -> Option<SimTime> {
        self.keys.get(&agent).map(|&(t, _)| t)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
