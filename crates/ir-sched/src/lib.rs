//! `ir-sched` — the shared weighted priority scheduler.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                 |
//! |----------------|----------------------------------------------------------|
//! | [`key`]        | `SlotKey` (index + generation)                           |
//! | [`arena`]      | `SlotArena<T>` — generational arena with LIFO free-list  |
//! | [`scheduler`]  | `Scheduler<T>`, `Dequeued<T>`                            |
//!
//! # Pass model (summary)
//!
//! ```text
//! every tick:
//!   while let Some(d) = scheduler.next_in_pass() { execute(d) }
//!   scheduler.reset()
//! ```
//!
//! Each pass visits every live slot once, highest priority first.  A slot
//! enqueued with weight `n` is visited on `n` consecutive passes unless it is
//! extended (`set_weight`) or cancelled (`cancel`) in between.

pub mod arena;
pub mod key;
pub mod scheduler;

#[cfg(test)]
mod tests;

pub use arena::SlotArena;
pub use key::SlotKey;
pub use scheduler::{Dequeued, Scheduler};
