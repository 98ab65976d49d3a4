//! Fluent builder for constructing an [`Actor`] with its catalogue in one step.
//!
//! # Usage
//!
//! ```rust
//! use ir_actor::{ActionFlow, ActionSpec, ActorBuilder, HandlerCtx, PoolConfig, handler};
//! use ir_core::ActorId;
//!
//! struct World { hits: u32 }
//!
//! let actor = ActorBuilder::<World, ()>::new("knight")
//!     .stamina(PoolConfig::default_stamina())
//!     .add_action(
//!         ActionSpec::new("attack").stamina(45).duration(1).priority(3),
//!         handler(|ctx: &mut HandlerCtx<'_, World>, _args: &()| {
//!             ctx.state.hits += 1;
//!             ActionFlow::Continue
//!         }),
//!     )
//!     .build(ActorId(0))
//!     .unwrap();
//!
//! assert!(actor.can_act("attack"));
//! ```

use rustc_hash::FxHashSet;

use ir_core::ActorId;

use crate::{
    ActionCatalogue, ActionDefinition, ActionSpec, Actor, ActorError, ActorResult, Handler,
    PoolConfig, Resources,
};

/// Fluent builder for [`Actor`].
///
/// Validation is deferred to [`build`](Self::build) so every problem in a
/// catalogue surfaces as one `ActorError` at construction.
pub struct ActorBuilder<S, A> {
    name:    String,
    stamina: PoolConfig,
    mana:    Option<PoolConfig>,
    actions: Vec<ActionDefinition<S, A>>,
}

impl<S, A> ActorBuilder<S, A> {
    /// Start a builder with the default stamina pool and no mana pool.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name:    name.into(),
            stamina: PoolConfig::default_stamina(),
            mana:    None,
            actions: Vec::new(),
        }
    }

    pub fn stamina(mut self, cfg: PoolConfig) -> Self {
        self.stamina = cfg;
        self
    }

    /// Give the actor a mana pool.  Required for any action with a mana cost.
    pub fn mana(mut self, cfg: PoolConfig) -> Self {
        self.mana = Some(cfg);
        self
    }

    /// Register an action and bind its handler.  The only place handlers are
    /// bound; the catalogue is frozen by `build`.
    pub fn add_action(mut self, spec: ActionSpec, handler: Handler<S, A>) -> Self {
        self.actions.push(ActionDefinition { spec, handler });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validate the catalogue and construct the actor.
    ///
    /// # Errors
    ///
    /// - [`ActorError::InvalidAction`] for an empty name, a zero duration, or
    ///   more actions than `ActionId` can index.
    /// - [`ActorError::DuplicateAction`] if two actions share a name.
    /// - [`ActorError::MissingManaPool`] if an action costs mana and no mana
    ///   pool was configured.
    pub fn build(self, id: ActorId) -> ActorResult<Actor<S, A>> {
        let mut seen = FxHashSet::default();
        for def in &self.actions {
            def.spec.validate()?;
            if !seen.insert(def.spec.name.as_str()) {
                return Err(ActorError::DuplicateAction(def.spec.name.clone()));
            }
            if def.spec.uses_mana() && self.mana.is_none() {
                return Err(ActorError::MissingManaPool(def.spec.name.clone()));
            }
        }
        if self.actions.len() >= u16::MAX as usize {
            return Err(ActorError::InvalidAction {
                action: self.name.clone(),
                reason: "too many actions for one actor",
            });
        }

        let resources = Resources::new(self.stamina, self.mana);
        let catalogue = ActionCatalogue::from_defs(self.actions);
        Ok(Actor::new(id, self.name, resources, catalogue))
    }
}
