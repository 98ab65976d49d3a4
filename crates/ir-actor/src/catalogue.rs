//! Read-only per-actor action registry.

use rustc_hash::FxHashMap;

use ir_core::ActionId;

use crate::ActionDefinition;

/// Dense `ActionId → ActionDefinition` table with a name index.
///
/// Built once by [`ActorBuilder`][crate::ActorBuilder]; there is no way to
/// add or remove actions afterwards.  `ActionId(i)` is the `i`-th action
/// passed to `add_action`.
pub struct ActionCatalogue<S, A> {
    defs:    Vec<ActionDefinition<S, A>>,
    by_name: FxHashMap<String, ActionId>,
}

impl<S, A> ActionCatalogue<S, A> {
    /// Caller guarantees unique names and `defs.len() <= u16::MAX`.
    pub(crate) fn from_defs(defs: Vec<ActionDefinition<S, A>>) -> Self {
        let by_name = defs
            .iter()
            .enumerate()
            .map(|(i, d)| (d.spec.name.clone(), ActionId(i as u16)))
            .collect();
        Self { defs, by_name }
    }

    #[inline]
    pub fn id(&self, name: &str) -> Option<ActionId> {
        self.by_name.get(name).copied()
    }

    #[inline]
    pub fn get(&self, id: ActionId) -> Option<&ActionDefinition<S, A>> {
        self.defs.get(id.index())
    }

    pub fn by_name(&self, name: &str) -> Option<&ActionDefinition<S, A>> {
        self.id(name).and_then(|id| self.get(id))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// `(id, definition)` in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (ActionId, &ActionDefinition<S, A>)> + '_ {
        self.defs.iter().enumerate().map(|(i, d)| (ActionId(i as u16), d))
    }
}

impl<S, A> std::ops::Index<ActionId> for ActionCatalogue<S, A> {
    type Output = ActionDefinition<S, A>;

    #[inline]
    fn index(&self, id: ActionId) -> &Self::Output {
        &self.defs[id.index()]
    }
}
