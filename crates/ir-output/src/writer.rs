//! The `TraceWriter` trait implemented by trace backends.

use crate::{ActionFiredRow, ActorSnapshotRow, OutputResult, TickSummaryRow};

/// A sink for the three record kinds a run produces.
///
/// Errors surface to [`TraceObserver`][crate::TraceObserver], which stores the
/// first one for [`take_error`][crate::TraceObserver::take_error].
pub trait TraceWriter {
    fn write_action(&mut self, row: &ActionFiredRow<'_>) -> OutputResult<()>;

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Write a batch of actor snapshots taken at one tick.
    fn write_snapshots(&mut self, rows: &[ActorSnapshotRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
