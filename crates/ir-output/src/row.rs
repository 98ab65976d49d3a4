//! Plain data row types written by trace backends.

use serde::Serialize;

use ir_actor::Execution;

/// One handler invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionFiredRow<'a> {
    pub tick:          u64,
    pub actor_id:      u32,
    pub actor_name:    &'a str,
    pub action_id:     u16,
    pub action_name:   &'a str,
    pub priority:      i32,
    /// `running`, `completed` or `halted`.
    pub outcome:       &'static str,
    pub elapsed_ticks: u32,
    /// Planned length at the time of the visit; grows with extensions.
    pub total_ticks:   u32,
}

impl ActionFiredRow<'_> {
    pub const HEADERS: [&'static str; 9] = [
        "tick", "actor_id", "actor_name", "action_id", "action_name",
        "priority", "outcome", "elapsed_ticks", "total_ticks",
    ];
}

/// Split an [`Execution`] into `(outcome, elapsed_ticks, total_ticks)`.
///
/// `Skipped` never reaches an observer; it maps to `("skipped", 0, 0)`.
pub fn execution_columns(execution: Execution) -> (&'static str, u32, u32) {
    match execution {
        Execution::Running { elapsed_ticks, total_ticks } => ("running", elapsed_ticks, total_ticks),
        Execution::Completed { total_ticks } => ("completed", total_ticks, total_ticks),
        Execution::Halted { elapsed_ticks } => ("halted", elapsed_ticks, elapsed_ticks),
        Execution::Skipped => ("skipped", 0, 0),
    }
}

/// Per-tick counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TickSummaryRow {
    pub tick:       u64,
    pub elapsed_ms: u64,
    pub actors:     u64,
    pub intents:    u64,
    pub scheduled:  u64,
    pub extended:   u64,
    pub denied:     u64,
    pub halted:     u64,
    pub fired:      u64,
    pub completed:  u64,
    pub reaped:     u64,
    pub queued:     u64,
}

impl TickSummaryRow {
    pub const HEADERS: [&'static str; 12] = [
        "tick", "elapsed_ms", "actors", "intents", "scheduled", "extended",
        "denied", "halted", "fired", "completed", "reaped", "queued",
    ];
}

/// One live actor's resources and load at a snapshot tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActorSnapshotRow {
    pub tick:      u64,
    pub actor_id:  u32,
    pub name:      String,
    pub stamina:   u32,
    /// Empty for actors without a mana pool.
    pub mana:      Option<u32>,
    pub executing: u32,
}

impl ActorSnapshotRow {
    pub const HEADERS: [&'static str; 6] = ["tick", "actor_id", "name", "stamina", "mana", "executing"];
}
