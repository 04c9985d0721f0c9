//! The `OutputWriter` trait implemented by backend writers.

use crate::{EdgeSpeedRow, EventRow, OutputResult, SummaryRow, TripRow};

/// Sink for the tables an experiment produces.
///
/// Errors surfaced during a run are stored by
/// [`SimOutputObserver`](crate::SimOutputObserver) and retrieved with
/// `take_error`.
pub trait OutputWriter {
    /// One row per agent, comparing the two runs.
    fn write_trips(&mut self, rows: &[TripRow]) -> OutputResult<()>;

    /// One row per edge with the time-averaged speed of each run.
    fn write_edge_speeds(&mut self, rows: &[EdgeSpeedRow]) -> OutputResult<()>;

    /// Statistics rows, one per agent group.
    fn write_summary(&mut self, rows: &[SummaryRow]) -> OutputResult<()>;

    /// One simulation event (activation, junction, reroute, arrival).
    fn write_event(&mut self, row: &EventRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}

impl<W: OutputWriter + ?Sized> OutputWriter for &mut W {
    fn write_trips(&mut self, rows: &[TripRow]) -> OutputResult<()> {
        (**self).write_trips(rows)
    }

    fn write_edge_speeds(&mut self, rows: &[EdgeSpeedRow]) -> OutputResult<()> {
        (**self).write_edge_speeds(rows)
    }

    fn write_summary(&mut self, rows: &[SummaryRow]) -> OutputResult<()> {
        (**self).write_summary(rows)
    }

    fn write_event(&mut self, row: &EventRow) -> OutputResult<()> {
        (**self).write_event(row)
    }

    fn finish(&mut self) -> OutputResult<()> {
        (**self).finish()
    }
}
