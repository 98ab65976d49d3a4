//! `TraceObserver<W>` — bridges `SimObserver` to a `TraceWriter`.

use tracing::warn;

use ir_actor::{ActorStore, ResourceKind};
use ir_core::{Tick, TickClock, WorldConfig};
use ir_sim::{ActionFired, SimObserver, TickSummary};

use crate::row::{ActionFiredRow, ActorSnapshotRow, TickSummaryRow, execution_columns};
use crate::writer::TraceWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that records every fired action, every tick summary,
/// and periodic actor snapshots to any [`TraceWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].  Once an error is stored, further writes
/// are skipped.
pub struct TraceObserver<W: TraceWriter> {
    writer:     W,
    clock:      TickClock,
    last_error: Option<OutputError>,
}

impl<W: TraceWriter> TraceObserver<W> {
    /// Create an observer backed by `writer`, using `config` for wall-clock
    /// conversion.
    pub fn new(writer: W, config: &WorldConfig) -> Self {
        Self { writer, clock: config.make_clock(), last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn elapsed_ms(&mut self, tick: Tick) -> u64 {
        self.clock.current_tick = tick;
        self.clock.elapsed_millis()
    }

    fn record(&mut self, write: impl FnOnce(&mut W) -> OutputResult<()>) {
        if self.last_error.is_some() {
            return;
        }
        if let Err(e) = write(&mut self.writer) {
            warn!(error = %e, "trace write failed; further output skipped");
            self.last_error = Some(e);
        }
    }
}

impl<S, A, W: TraceWriter> SimObserver<S, A> for TraceObserver<W> {
    fn on_action_fired(&mut self, event: &ActionFired<'_>) {
        let (outcome, elapsed_ticks, total_ticks) = execution_columns(event.execution);
        let row = ActionFiredRow {
            tick:        event.tick.0,
            actor_id:    event.actor.0,
            actor_name:  event.actor_name,
            action_id:   event.action.0,
            action_name: event.action_name,
            priority:    event.priority,
            outcome,
            elapsed_ticks,
            total_ticks,
        };
        self.record(|w| w.write_action(&row));
    }

    fn on_tick_end(&mut self, s: &TickSummary) {
        let row = TickSummaryRow {
            tick:       s.tick.0,
            elapsed_ms: self.elapsed_ms(s.tick),
            actors:     s.actors as u64,
            intents:    s.intents as u64,
            scheduled:  s.scheduled as u64,
            extended:   s.extended as u64,
            denied:     s.denied as u64,
            halted:     s.halted as u64,
            fired:      s.fired as u64,
            completed:  s.completed as u64,
            reaped:     s.reaped as u64,
            queued:     s.queued as u64,
        };
        self.record(|w| w.write_tick_summary(&row));
    }

    fn on_snapshot(&mut self, tick: Tick, actors: &ActorStore<S, A>, _state: &S) {
        let rows: Vec<ActorSnapshotRow> = actors
            .iter()
            .map(|actor| ActorSnapshotRow {
                tick:      tick.0,
                actor_id:  actor.id().0,
                name:      actor.name().to_owned(),
                stamina:   actor.resources().stamina.current,
                mana:      actor.get_stat(ResourceKind::Mana),
                executing: actor.executing_count() as u32,
            })
            .collect();

        if !rows.is_empty() {
            self.record(|w| w.write_snapshots(&rows));
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        // Flush even after an earlier failure so partial output lands on disk.
        if let Err(e) = self.writer.finish() {
            warn!(error = %e, "trace flush failed");
            self.last_error.get_or_insert(e);
        }
    }
}
