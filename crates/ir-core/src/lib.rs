//! `ir-core` — foundational types for the intent resolution engine.
//!
//! This crate is a dependency of every other `ir-*` crate.  It has no `ir-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `ActorId`, `ActionId`                                 |
//! | [`time`]        | `Tick`, `TickClock`, `WorldConfig`                    |
//! | [`rng`]         | `ActorRng` (per-actor), `WorldRng` (global)           |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{ActionId, ActorId};
pub use rng::{ActorRng, WorldRng};
pub use time::{Tick, TickClock, WorldConfig};
