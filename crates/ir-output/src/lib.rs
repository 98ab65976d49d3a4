//! `ir-output` — CSV traces of an intent resolution run.
//!
//! | File                  | One row per                                   |
//! |-----------------------|-----------------------------------------------|
//! | `actions_fired.csv`   | handler invocation                            |
//! | `tick_summaries.csv`  | tick                                          |
//! | `actor_snapshots.csv` | live actor, every `output_interval_ticks`     |
//!
//! [`CsvTraceWriter`] implements [`TraceWriter`] and is driven by
//! [`TraceObserver`], which implements `ir_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ir_output::{CsvTraceWriter, TraceObserver};
//!
//! let writer = CsvTraceWriter::new(Path::new("./trace"))?;
//! let mut obs = TraceObserver::new(writer, &config);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("trace error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use crate::csv::CsvTraceWriter;
pub use error::{OutputError, OutputResult};
pub use observer::TraceObserver;
pub use row::{ActionFiredRow, ActorSnapshotRow, TickSummaryRow, execution_columns};
pub use writer::TraceWriter;
