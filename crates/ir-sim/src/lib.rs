//! `ir-sim` — tick loop orchestrator for the intent resolution engine.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Upkeep     — advance_cooldowns, then regen, for every live actor.
//!   ② Intents    — BehaviorModel::decide for every live actor
//!                  (parallel with the `parallel` feature).
//!   ③ Apply      — issued intents, then behavior intents in ascending ActorId:
//!                    Act  { action, args } → enqueue_action
//!                    Halt { action }       → action_halt
//!   ④ Resolve    — one scheduler pass (next_in_pass until None), each visit
//!                  → execute_action → handler; then reset().
//!   ⑤ Reap       — BehaviorModel::is_dead → remove_actor (halts first).
//! ```
//!
//! Debug builds additionally check every actor against the scheduler at the
//! end of each tick.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the intent phase on Rayon's thread pool.          |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ir_behavior::NoopBehavior;
//! use ir_core::WorldConfig;
//! use ir_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(WorldConfig::default(), Arena::default(), NoopBehavior)
//!     .actor(knight_builder)
//!     .build()?;
//! sim.issue(ActorId(0), Intent::act(sim.actor(ActorId(0)).unwrap(), "attack", target)?)?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{ActionFired, NoopObserver, SimObserver, TickSummary};
pub use sim::{ActionArgs, Sim, WorldState};
