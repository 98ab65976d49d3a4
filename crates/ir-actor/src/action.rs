//! Action definitions and the handler calling convention.
//!
//! An [`ActionSpec`] is plain data: costs, timing, priority, and extension
//! rules.  An [`ActionDefinition`] pairs a spec with the [`Handler`] that runs
//! each tick the action is dequeued.  Handlers are bound once, by
//! [`ActorBuilder::add_action`][crate::ActorBuilder::add_action], and never
//! looked up by string afterwards.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use ir_core::{ActionId, ActorId, Tick};

use crate::{ActorError, ActorResult, Resources};

// ── ActionSpec ────────────────────────────────────────────────────────────────

/// Immutable description of one action in an actor's catalogue.
///
/// Deserializes from template JSON; `mana_cost`, `extendable`,
/// `repeats_consumption`, and `asset` are optional there.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionSpec {
    pub name:                String,
    pub stamina_cost:        u32,
    #[serde(default)]
    pub mana_cost:           u32,
    pub cooldown_ticks:      u64,
    /// Scheduler weight at admission.  Must be at least 1.
    pub duration_ticks:      u32,
    /// Higher runs first within a pass.
    pub priority:            i32,
    /// Re-issuing while running adds one tick instead of being ignored.
    #[serde(default)]
    pub extendable:          bool,
    /// Each extension pays the action's costs again.  Ignored unless
    /// `extendable`.
    #[serde(default)]
    pub repeats_consumption: bool,
    /// Opaque display/asset id for the rendering side.
    #[serde(default)]
    pub asset:               Option<String>,
}

impl ActionSpec {
    /// A free, single-tick, priority-0 action with no cooldown.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name:                name.into(),
            stamina_cost:        0,
            mana_cost:           0,
            cooldown_ticks:      0,
            duration_ticks:      1,
            priority:            0,
            extendable:          false,
            repeats_consumption: false,
            asset:               None,
        }
    }

    pub fn stamina(mut self, cost: u32) -> Self {
        self.stamina_cost = cost;
        self
    }

    pub fn mana(mut self, cost: u32) -> Self {
        self.mana_cost = cost;
        self
    }

    pub fn cooldown(mut self, ticks: u64) -> Self {
        self.cooldown_ticks = ticks;
        self
    }

    pub fn duration(mut self, ticks: u32) -> Self {
        self.duration_ticks = ticks;
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Re-issuing while running adds one tick at no cost.
    pub fn extendable_free(mut self) -> Self {
        self.extendable = true;
        self.repeats_consumption = false;
        self
    }

    /// Re-issuing while running adds one tick, re-checked and paid like a
    /// fresh admission (cooldown aside).
    pub fn extendable_charged(mut self) -> Self {
        self.extendable = true;
        self.repeats_consumption = true;
        self
    }

    pub fn asset(mut self, asset: impl Into<String>) -> Self {
        self.asset = Some(asset.into());
        self
    }

    #[inline]
    pub fn uses_mana(&self) -> bool {
        self.mana_cost > 0
    }

    /// `true` if an extension must pass admission and pay costs.
    #[inline]
    pub fn charges_extension(&self) -> bool {
        self.extendable && self.repeats_consumption
    }

    pub(crate) fn validate(&self) -> ActorResult<()> {
        if self.name.trim().is_empty() {
            return Err(ActorError::InvalidAction {
                action: self.name.clone(),
                reason: "name must not be empty",
            });
        }
        if self.duration_ticks == 0 {
            return Err(ActorError::InvalidAction {
                action: self.name.clone(),
                reason: "duration_ticks must be >= 1",
            });
        }
        Ok(())
    }
}

// ── Handler calling convention ────────────────────────────────────────────────

/// What a handler wants after running.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ActionFlow {
    /// Keep occupying the scheduler until the weight runs out.
    #[default]
    Continue,
    /// Stop now, as if `action_halt` had been called.
    Halt,
}

/// Everything a handler may read or touch while it runs.
///
/// `resources` is the executing actor's own pools.  `state` is the
/// application's world state (positions, health, lights, ...), which is
/// opaque to this crate.
pub struct HandlerCtx<'a, S> {
    pub actor:         ActorId,
    pub tick:          Tick,
    /// Ticks executed so far, including this one (1-based).
    pub elapsed_ticks: u32,
    /// Original duration plus any extensions granted so far.
    pub total_ticks:   u32,
    pub resources:     &'a mut Resources,
    pub state:         &'a mut S,
}

impl<S> HandlerCtx<'_, S> {
    /// `true` on the tick the action started.
    #[inline]
    pub fn is_first_tick(&self) -> bool {
        self.elapsed_ticks == 1
    }

    /// `true` on the tick after which the action completes (unless extended
    /// before the next pass).
    #[inline]
    pub fn is_last_tick(&self) -> bool {
        self.elapsed_ticks == self.total_ticks
    }
}

/// Closure run once per dequeue of its action.
pub type Handler<S, A> = Arc<dyn Fn(&mut HandlerCtx<'_, S>, &A) -> ActionFlow + Send + Sync>;

/// Wrap a closure as a [`Handler`].
pub fn handler<S, A, F>(f: F) -> Handler<S, A>
where
    F: Fn(&mut HandlerCtx<'_, S>, &A) -> ActionFlow + Send + Sync + 'static,
{
    Arc::new(f)
}

// ── ActionDefinition ──────────────────────────────────────────────────────────

/// A registered action: spec plus bound handler.
pub struct ActionDefinition<S, A> {
    pub spec:    ActionSpec,
    pub handler: Handler<S, A>,
}

impl<S, A> Clone for ActionDefinition<S, A> {
    fn clone(&self) -> Self {
        Self { spec: self.spec.clone(), handler: Arc::clone(&self.handler) }
    }
}

impl<S, A> fmt::Debug for ActionDefinition<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDefinition")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

// ── ActionCall ────────────────────────────────────────────────────────────────

/// Scheduler payload: which actor runs which action with which arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionCall<A> {
    pub actor:  ActorId,
    pub action: ActionId,
    pub args:   A,
}
