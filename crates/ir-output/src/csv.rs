//! CSV trace backend.
//!
//! Creates three files in the configured output directory:
//! - `actions_fired.csv`
//! - `tick_summaries.csv`
//! - `actor_snapshots.csv`

use std::fs::File;
use std::path::Path;

use csv::{Writer, WriterBuilder};

use crate::writer::TraceWriter;
use crate::{ActionFiredRow, ActorSnapshotRow, OutputResult, TickSummaryRow};

/// Writes a simulation trace to three CSV files.
pub struct CsvTraceWriter {
    actions:   Writer<File>,
    summaries: Writer<File>,
    snapshots: Writer<File>,
    finished:  bool,
}

/// Header rows are written up front so that empty files still carry them.
fn open(dir: &Path, file: &str, headers: &[&str]) -> OutputResult<Writer<File>> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(dir.join(file))?;
    writer.write_record(headers)?;
    Ok(writer)
}

impl CsvTraceWriter {
    /// Create the three CSV files in `dir` and write the header rows.
    /// `dir` must already exist.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        Ok(Self {
            actions:   open(dir, "actions_fired.csv", &ActionFiredRow::HEADERS)?,
            summaries: open(dir, "tick_summaries.csv", &TickSummaryRow::HEADERS)?,
            snapshots: open(dir, "actor_snapshots.csv", &ActorSnapshotRow::HEADERS)?,
            finished:  false,
        })
    }
}

impl TraceWriter for CsvTraceWriter {
    fn write_action(&mut self, row: &ActionFiredRow<'_>) -> OutputResult<()> {
        self.actions.serialize(row)?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.serialize(row)?;
        Ok(())
    }

    fn write_snapshots(&mut self, rows: &[ActorSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.serialize(row)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.actions.flush()?;
        self.summaries.flush()?;
        self.snapshots.flush()?;
        Ok(())
    }
}
