//! `ir-actor` — actors, their action catalogues, and the action lifecycle.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                      |
//! |-----------------|---------------------------------------------------------------|
//! | [`resource`]    | `PoolConfig`, `ResourcePool`, `Resources`, `ResourceKind`     |
//! | [`action`]      | `ActionSpec`, `ActionDefinition`, `Handler`, `HandlerCtx`, `ActionCall` |
//! | [`catalogue`]   | `ActionCatalogue` (frozen name → `ActionId` registry)         |
//! | [`actor`]       | `Actor` (admission control + lifecycle), `Admission`, `Execution` |
//! | [`builder`]     | `ActorBuilder` (the only place handlers are bound)            |
//! | [`store`]       | `ActorStore` (actors by id), `ActorRngs` (per-actor RNG)      |
//! | [`loader`]      | JSON `ActorTemplate`s and the `HandlerTable`                  |
//!
//! # Type parameters
//!
//! `S` is the application's world state handed to handlers by `&mut`; `A`
//! is the argument type carried by every queued call.  Neither is inspected
//! here.

pub mod action;
pub mod actor;
pub mod builder;
pub mod catalogue;
pub mod error;
pub mod loader;
pub mod resource;
pub mod store;


pub use action::{ActionCall, ActionDefinition, ActionFlow, ActionSpec, Handler, HandlerCtx, handler};
pub use actor::{Actor, Admission, ExecutingEntry, Execution};
pub use builder::ActorBuilder;
pub use catalogue::ActionCatalogue;
pub use error::{ActorError, ActorResult};
pub use loader::{ActorTemplate, HandlerTable, load_templates_json, load_templates_reader, parse_templates};
pub use resource::{PoolConfig, ResourceKind, ResourcePool, Resources};
pub use store::{ActorRngs, ActorStore};
