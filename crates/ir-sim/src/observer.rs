//! Simulation observer trait and the per-tick event records it receives.

use ir_actor::{ActorStore, Execution};
use ir_core::{ActionId, ActorId, Tick};

// ── Event records ─────────────────────────────────────────────────────────────

/// One handler invocation during a resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionFired<'a> {
    pub tick:        Tick,
    pub actor:       ActorId,
    pub actor_name:  &'a str,
    pub action:      ActionId,
    pub action_name: &'a str,
    pub priority:    i32,
    pub execution:   Execution,
}

/// Counters for one tick, handed to [`SimObserver::on_tick_end`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickSummary {
    pub tick:      Tick,
    /// Live actors after reaping.
    pub actors:    usize,
    /// Intents applied (external and behavior), including ones that had no
    /// effect.
    pub intents:   usize,
    pub scheduled: usize,
    pub extended:  usize,
    pub denied:    usize,
    /// Running actions stopped by a `Halt` intent or by their own handler.
    pub halted:    usize,
    /// Handler invocations in the resolution pass.
    pub fired:     usize,
    pub completed: usize,
    pub reaped:    usize,
    /// Scheduler slots after the pass, including cancelled ones not yet
    /// retired.
    pub queued:    usize,
}

// ── SimObserver ───────────────────────────────────────────────────────────────

/// Callbacks invoked by [`Sim`][crate::Sim] at key points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl<S, A> SimObserver<S, A> for ProgressPrinter {
///     fn on_tick_end(&mut self, summary: &TickSummary) {
///         if summary.tick.0 % self.interval == 0 {
///             println!("{}: {} fired, {} queued", summary.tick, summary.fired, summary.queued);
///         }
///     }
/// }
/// ```
pub trait SimObserver<S, A> {
    /// Called at the very start of each tick, before upkeep.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after every handler invocation in the resolution pass.
    fn on_action_fired(&mut self, _event: &ActionFired<'_>) {}

    /// Called when the end-of-tick reaping removes a dead actor.
    fn on_actor_removed(&mut self, _tick: Tick, _actor: ActorId, _name: &str) {}

    /// Called at the end of each tick, before the clock advances.
    fn on_tick_end(&mut self, _summary: &TickSummary) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks`
    /// ticks) with read-only access to every actor and the world state.
    fn on_snapshot(&mut self, _tick: Tick, _actors: &ActorStore<S, A>, _state: &S) {}

    /// Called once after the final tick of [`Sim::run`][crate::Sim::run].
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want callbacks.
pub struct NoopObserver;

impl<S, A> SimObserver<S, A> for NoopObserver {}
