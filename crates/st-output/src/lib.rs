//! `st-output` — experiment output writers.
//!
//! | Table             | Row type         | CSV file          |
//! |-------------------|------------------|-------------------|
//! | Per-agent trips   | [`TripRow`]      | `trips.csv`       |
//! | Per-edge speeds   | [`EdgeSpeedRow`] | `edge_speeds.csv` |
//! | Group statistics  | [`SummaryRow`]   | `summary.csv`     |
//! | Event log         | [`EventRow`]     | `events.csv`      |
//!
//! Backends implement [`OutputWriter`].  The event log is fed during a run by
//! [`SimOutputObserver`], which implements `st_sim::SimObserver`; the other
//! tables are written once both runs are done.
//!
//! # Usage
//!
//! ```rust,ignore
//! use st_output::{CsvWriter, OutputWriter, SimOutputObserver, TripRow};
//!
//! let mut writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(&mut writer, SimMode::Base);
//! let base = simulation_run(SimMode::Base, &net, &agents, &mut cache, &config, &mut obs)?;
//! // ... smart run ...
//! writer.write_trips(&TripRow::collect(&population, &base, &smart)?)?;
//! writer.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use crate::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{EdgeSpeedRow, EventKind, EventRow, SummaryRow, TripRow};
pub use writer::OutputWriter;
