//! Actor storage: `ActorStore` (actors by id) and `ActorRngs` (per-actor RNG).
//!
//! # Why two structs?
//!
//! The parallel intent phase needs `&mut ActorRngs` (exclusive access to each
//! actor's RNG) and `&ActorStore` (shared read access to every actor) at the
//! same time.  Keeping the RNGs outside the store lets both borrows coexist:
//!
//! ```ignore
//! // ir-sim intent phase (simplified):
//! let store: &ActorStore<S, A> = &sim.actors;
//! let intents = sim.rngs.inner
//!     .par_iter_mut()
//!     .enumerate()
//!     .filter_map(|(i, rng)| store.get(ActorId(i as u32)).map(|a| behavior.decide(a, &ctx, rng)))
//!     .collect::<Vec<_>>();
//! ```

use ir_core::{ActorId, ActorRng};

use crate::{Actor, ActorBuilder, ActorError, ActorResult};

// ── ActorRngs ─────────────────────────────────────────────────────────────────

/// Per-actor deterministic RNG state, indexed by `ActorId`.
///
/// Grows in lock-step with [`ActorStore`]; a removed actor's RNG stays in
/// place so indices never shift.
pub struct ActorRngs {
    pub inner:   Vec<ActorRng>,
    global_seed: u64,
}

impl ActorRngs {
    pub fn new(global_seed: u64) -> Self {
        Self { inner: Vec::new(), global_seed }
    }

    /// Seed RNGs for every id below `count` that does not have one yet.
    pub fn ensure(&mut self, count: usize) {
        while self.inner.len() < count {
            let id = ActorId(self.inner.len() as u32);
            self.inner.push(ActorRng::new(self.global_seed, id));
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ── ActorStore ────────────────────────────────────────────────────────────────

/// Actors indexed by `ActorId`.
///
/// Ids are handed out sequentially and never reused.  Removal leaves a
/// tombstone, so an `ActorId` held by application state can never start
/// naming a different actor.
pub struct ActorStore<S, A> {
    slots: Vec<Option<Actor<S, A>>>,
    live:  usize,
}

impl<S, A> Default for ActorStore<S, A> {
    fn default() -> Self {
        Self { slots: Vec::new(), live: 0 }
    }
}

impl<S, A> ActorStore<S, A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build `builder` under the next free id and store it.
    pub fn spawn(&mut self, builder: ActorBuilder<S, A>) -> ActorResult<ActorId> {
        let id = ActorId::try_from(self.slots.len()).map_err(|_| ActorError::InvalidAction {
            action: builder.name().to_owned(),
            reason: "actor id space exhausted",
        })?;
        let actor = builder.build(id)?;
        self.slots.push(Some(actor));
        self.live += 1;
        Ok(id)
    }

    /// Take the actor out of the store.  The caller is responsible for
    /// halting its actions first.
    pub fn remove(&mut self, id: ActorId) -> Option<Actor<S, A>> {
        let actor = self.slots.get_mut(id.index())?.take()?;
        self.live -= 1;
        Some(actor)
    }

    #[inline]
    pub fn get(&self, id: ActorId) -> Option<&Actor<S, A>> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    #[inline]
    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor<S, A>> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    #[inline]
    pub fn contains(&self, id: ActorId) -> bool {
        self.get(id).is_some()
    }

    /// Live actors.
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Ids ever issued, live or removed.
    #[inline]
    pub fn id_space(&self) -> usize {
        self.slots.len()
    }

    /// Live actor ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.iter().map(|a| a.id())
    }

    /// Live actors in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Actor<S, A>> + '_ {
        self.slots.iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Actor<S, A>> + '_ {
        self.slots.iter_mut().flatten()
    }
}
