//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use st_agent::Agent;
use st_core::{EdgeId, SimMode, SimTime};
use st_sim::SimObserver;

use crate::row::{EventKind, EventRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that logs every activation, junction crossing, reroute
/// and arrival of one run to an [`OutputWriter`].
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After the run returns, check for errors with
/// [`take_error`][Self::take_error].  The writer is not finished at the end
/// of the run; pass `&mut writer` to reuse it for the next run.
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    mode:       SimMode,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W, mode: SimMode) -> Self {
        Self { writer, mode, last_error: None }
    }

    /// Take the stored write error (if any) after the run returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    fn record(&mut self, agent: &Agent, now: SimTime, kind: EventKind, edge: EdgeId) {
        let node = match kind {
            EventKind::Finish => agent.end_node,
            _ => agent.current_node().unwrap_or_default(),
        };
        let row = EventRow::new(self.mode, now, agent.id, kind, node, edge);
        let result = self.writer.write_event(&row);
        self.store_err(result);
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_activate(&mut self, agent: &Agent, now: SimTime) {
        self.record(agent, now, EventKind::Activate, agent.edge);
    }

    fn on_junction(&mut self, agent: &Agent, now: SimTime) {
        self.record(agent, now, EventKind::Junction, agent.edge);
    }

    fn on_reroute(&mut self, agent: &Agent, now: SimTime) {
        self.record(agent, now, EventKind::Reroute, agent.edge);
    }

    fn on_finish(&mut self, agent: &Agent, now: SimTime) {
        self.record(agent, now, EventKind::Finish, EdgeId::INVALID);
    }
}
