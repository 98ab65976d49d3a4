//! `ir-behavior` — actor behavior model trait and intent types.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`intent`]  | `Intent<A>` (`Act`, `Halt`)                                     |
//! | [`context`] | `SimContext<'a, S, A>` — read-only tick snapshot                |
//! | [`model`]   | `BehaviorModel` trait, `FnBehavior` closure adapter             |
//! | [`noop`]    | `NoopBehavior` — placeholder that never produces intents        |
//! | [`error`]   | `BehaviorError`, `BehaviorResult<T>`                            |
//!
//! # Design notes
//!
//! The tick loop in ir-sim is split in two:
//!
//! 1. **Intent phase** (optionally parallel): call `BehaviorModel::decide`
//!    for every live actor.  All reads go through `&Actor` and
//!    `&SimContext`; no mutation.
//!
//! 2. **Apply phase** (sequential): feed the collected intents to
//!    `Actor::enqueue_action` / `Actor::action_halt` against the shared
//!    scheduler, in ascending `ActorId` order.
//!
//! This split means `BehaviorModel` only needs to be `Send + Sync`.

pub mod context;
pub mod error;
pub mod intent;
pub mod model;
pub mod noop;


pub use context::SimContext;
pub use error::{BehaviorError, BehaviorResult};
pub use intent::Intent;
pub use model::{BehaviorModel, FnBehavior};
pub use noop::NoopBehavior;
