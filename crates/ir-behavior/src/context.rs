//! Read-only simulation state passed to every behavior callback.

use ir_actor::ActorStore;
use ir_core::Tick;

/// A read-only snapshot of the simulation passed to every
/// [`BehaviorModel`][crate::BehaviorModel] callback.
///
/// Built once per tick by ir-sim and shared immutably across all actors
/// during the intent phase.
///
/// # Lifetimes
///
/// All borrows live for the duration of one tick's intent phase.  ir-sim
/// never allows mutable access to these structures while `SimContext` is live.
pub struct SimContext<'a, S, A> {
    /// Current simulation tick.
    pub tick: Tick,

    /// Ticks per wall-clock second, for behaviors that reason in seconds.
    pub ticks_per_sec: u32,

    /// The application's world state.
    pub state: &'a S,

    /// Every live actor, for behaviors that inspect other actors.
    pub actors: &'a ActorStore<S, A>,
}

impl<'a, S, A> SimContext<'a, S, A> {
    #[inline]
    pub fn new(tick: Tick, ticks_per_sec: u32, state: &'a S, actors: &'a ActorStore<S, A>) -> Self {
        Self { tick, ticks_per_sec, state, actors }
    }
}
