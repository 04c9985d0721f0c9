//! CSV output backend.
//!
//! Creates four files in the configured output directory:
//! - `trips.csv`
//! - `edge_speeds.csv`
//! - `summary.csv`
//! - `events.csv`
//!
//! Missing values (`None`) are written as empty fields.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{EdgeSpeedRow, EventRow, OutputResult, SummaryRow, TripRow};

pub const TRIPS_FILE: &str = "trips.csv";
pub const EDGE_SPEEDS_FILE: &str = "edge_speeds.csv";
pub const SUMMARY_FILE: &str = "summary.csv";
pub const EVENTS_FILE: &str = "events.csv";

/// Writes experiment output to CSV files.
pub struct CsvWriter {
    trips:       Writer<File>,
    edge_speeds: Writer<File>,
    summary:     Writer<File>,
    events:      Writer<File>,
    finished:    bool,
}

fn opt(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

impl CsvWriter {
    /// Open (or create) the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut trips = Writer::from_path(dir.join(TRIPS_FILE))?;
        trips.write_record([
            "agent_id",
            "smart",
            "start_node",
            "end_node",
            "start_time_s",
            "baseline_s",
            "base_outcome",
            "base_time_s",
            "smart_outcome",
            "smart_time_s",
        ])?;

        let mut edge_speeds = Writer::from_path(dir.join(EDGE_SPEEDS_FILE))?;
        edge_speeds.write_record([
            "edge_id",
            "from",
            "to",
            "length_m",
            "max_speed_mps",
            "base_avg_mps",
            "smart_avg_mps",
        ])?;

        let mut summary = Writer::from_path(dir.join(SUMMARY_FILE))?;
        summary.write_record([
            "group",
            "count",
            "mean_base_s",
            "mean_smart_s",
            "mean_delta_s",
            "median_delta_s",
            "mean_relative_delta",
            "share_improved",
        ])?;

        let mut events = Writer::from_path(dir.join(EVENTS_FILE))?;
        events.write_record(["mode", "time_s", "agent_id", "kind", "node", "edge"])?;

        Ok(Self {
            trips,
            edge_speeds,
            summary,
            events,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_trips(&mut self, rows: &[TripRow]) -> OutputResult<()> {
        for row in rows {
            self.trips.write_record(&[
                row.agent_id.to_string(),
                (row.smart as u8).to_string(),
                row.start_node.to_string(),
                row.end_node.to_string(),
                row.start_time_s.to_string(),
                opt(row.baseline_s),
                row.base_outcome.to_owned(),
                opt(row.base_time_s),
                row.smart_outcome.to_owned(),
                opt(row.smart_time_s),
            ])?;
        }
        Ok(())
    }

    fn write_edge_speeds(&mut self, rows: &[EdgeSpeedRow]) -> OutputResult<()> {
        for row in rows {
            self.edge_speeds.write_record(&[
                row.edge_id.to_string(),
                row.from.to_string(),
                row.to.to_string(),
                row.length_m.to_string(),
                row.max_speed_mps.to_string(),
                opt(row.base_avg_mps),
                opt(row.smart_avg_mps),
            ])?;
        }
        Ok(())
    }

    fn write_summary(&mut self, rows: &[SummaryRow]) -> OutputResult<()> {
        for row in rows {
            self.summary.write_record(&[
                row.group.to_owned(),
                row.count.to_string(),
                row.mean_base_s.to_string(),
                row.mean_smart_s.to_string(),
                row.mean_delta_s.to_string(),
                row.median_delta_s.to_string(),
                row.mean_relative_delta.to_string(),
                row.share_improved.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_event(&mut self, row: &EventRow) -> OutputResult<()> {
        self.events.write_record(&[
            row.mode.as_str().to_owned(),
            row.time_s.to_string(),
            row.agent_id.to_string(),
            row.kind.as_str().to_owned(),
            row.node.to_string(),
            row.edge.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.trips.flush()?;
        self.edge_speeds.flush()?;
        self.summary.flush()?;
        self.events.flush()?;
        Ok(())
    }
}
