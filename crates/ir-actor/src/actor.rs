//! `Actor<S, A>` — admission control and the per-action lifecycle.
//!
//! # Lifecycle of one (actor, action) pair
//!
//! ```text
//! Idle ──enqueue_action──▶ Admitted ──pass──▶ Executing(k of N) ──k = N──▶ Idle
//!                                               │   ▲
//!                                               │   └─ enqueue_action (extendable): N += 1
//!                                               └─ action_halt / ActionFlow::Halt ──▶ Idle
//! ```
//!
//! While an action occupies the scheduler the actor keeps an
//! [`ExecutingEntry`] holding the slot's [`SlotKey`].  The scheduler owns the
//! slot; the entry is only a handle for extension and cancellation, and
//! every lookup through it tolerates the slot having been retired.
//!
//! # Invariant
//!
//! For every live entry, `elapsed_ticks + scheduler weight == total_ticks`.
//! It holds after admission (0 + N = N), after each execution (one tick moves
//! from weight to elapsed), and after each extension (weight and total both
//! grow by one).  [`Actor::check_consistency`] verifies it.

use tracing::{debug, warn};

use ir_core::{ActionId, ActorId, Tick};
use ir_sched::{Dequeued, Scheduler, SlotKey};

use crate::{
    ActionCall, ActionCatalogue, ActionDefinition, ActionFlow, ActorError, ActorResult,
    HandlerCtx, ResourceKind, Resources,
};

// ── Lifecycle records ─────────────────────────────────────────────────────────

/// Bookkeeping for one action currently occupying the scheduler.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ExecutingEntry {
    pub elapsed_ticks: u32,
    /// Original duration plus extensions.
    pub total_ticks:   u32,
    pub key:           SlotKey,
}

/// Outcome of [`Actor::enqueue_action`].  None of these is an error: an
/// inadmissible intent is simply dropped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Admission {
    /// Admitted, resources charged, slot enqueued.
    Scheduled(SlotKey),
    /// Already running and extendable: one tick added.  `charged` is `true`
    /// when the extension paid the action's costs again.
    Extended { charged: bool },
    /// Already running and not extendable.  Nothing changed.
    AlreadyRunning,
    /// On cooldown or short of resources.  Nothing changed.
    Denied,
}

impl Admission {
    /// `true` if the call changed actor or scheduler state.
    #[inline]
    pub fn took_effect(self) -> bool {
        matches!(self, Admission::Scheduled(_) | Admission::Extended { .. })
    }
}

/// Outcome of [`Actor::execute_action`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Execution {
    /// Handler ran; the action keeps its slot.
    Running { elapsed_ticks: u32, total_ticks: u32 },
    /// Handler ran for the last time; the entry is gone.
    Completed { total_ticks: u32 },
    /// Handler ran and asked to stop early; the slot is cancelled.
    Halted { elapsed_ticks: u32 },
    /// No live entry matched the dequeued slot.  Handler not run.
    Skipped,
}

impl Execution {
    /// `true` if the handler was invoked.
    #[inline]
    pub fn fired(self) -> bool {
        !matches!(self, Execution::Skipped)
    }
}

// ── Actor ─────────────────────────────────────────────────────────────────────

/// One acting entity: resource pools, a frozen action catalogue, per-action
/// cooldown counters, and the executing-entry map.
///
/// Built by [`ActorBuilder`][crate::ActorBuilder].  All scheduler-touching
/// operations take the shared [`Scheduler`] by `&mut`; the actor never
/// stores it.
pub struct Actor<S, A> {
    id:          ActorId,
    name:        String,
    resources:   Resources,
    catalogue:   ActionCatalogue<S, A>,
    /// Ticks since each action's handler last fired, capped at its cooldown.
    since_fired: Vec<u64>,
    /// Indexed by `ActionId`.  `Some` exactly while the action holds a slot.
    executing:   Vec<Option<ExecutingEntry>>,
}

impl<S, A> Actor<S, A> {
    pub(crate) fn new(
        id: ActorId,
        name: String,
        resources: Resources,
        catalogue: ActionCatalogue<S, A>,
    ) -> Self {
        // Every action starts off cooldown.
        let since_fired = catalogue.iter().map(|(_, d)| d.spec.cooldown_ticks).collect();
        let executing = vec![None; catalogue.len()];
        Self { id, name, resources, catalogue, since_fired, executing }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn catalogue(&self) -> &ActionCatalogue<S, A> {
        &self.catalogue
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Current value of a pool, or `None` if the actor has no such pool.
    pub fn get_stat(&self, kind: ResourceKind) -> Option<u32> {
        self.resources.pool(kind).map(|p| p.current)
    }

    /// Resolve an action name.  The fallible counterpart of the name-based
    /// operations below.
    #[inline]
    pub fn action_id(&self, name: &str) -> Option<ActionId> {
        self.catalogue.id(name)
    }

    pub fn executing(&self, action: ActionId) -> Option<&ExecutingEntry> {
        self.executing.get(action.index()).and_then(Option::as_ref)
    }

    pub fn is_executing(&self, name: &str) -> bool {
        self.executing(self.expect_id(name)).is_some()
    }

    /// Number of actions currently holding a scheduler slot.
    pub fn executing_count(&self) -> usize {
        self.executing.iter().flatten().count()
    }

    /// Ticks until `action` is off cooldown; 0 when ready.
    pub fn cooldown_remaining(&self, action: ActionId) -> u64 {
        let cooldown = self.def(action).spec.cooldown_ticks;
        cooldown.saturating_sub(self.since_fired[action.index()])
    }

    // ── Admission control ─────────────────────────────────────────────────

    /// `true` if `name` is off cooldown and affordable right now.
    ///
    /// # Panics
    ///
    /// Panics if the actor has no action called `name`.
    pub fn can_act(&self, name: &str) -> bool {
        self.can_act_id(self.expect_id(name))
    }

    pub fn can_act_id(&self, action: ActionId) -> bool {
        let spec = &self.def(action).spec;
        let on_cooldown = self.since_fired[action.index()] < spec.cooldown_ticks;
        !on_cooldown && self.resources.can_afford(spec.stamina_cost, spec.mana_cost)
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Request that `name` run with `args`.
    ///
    /// # Panics
    ///
    /// Panics if the actor has no action called `name`.
    pub fn enqueue_action(
        &mut self,
        name: &str,
        args: A,
        scheduler: &mut Scheduler<ActionCall<A>>,
    ) -> Admission {
        let action = self.expect_id(name);
        self.enqueue_action_id(action, args, scheduler)
    }

    /// Id-based [`enqueue_action`](Self::enqueue_action).
    ///
    /// - Running and extendable: one more tick (charged again when
    ///   `repeats_consumption`; denied if that charge cannot be paid).
    /// - Running and not extendable: no-op.
    /// - Idle: admission control, then enqueue with weight `duration_ticks`
    ///   and charge the costs once.
    ///
    /// `args` of an extension are discarded; the running call keeps the
    /// arguments it was admitted with.
    pub fn enqueue_action_id(
        &mut self,
        action: ActionId,
        args: A,
        scheduler: &mut Scheduler<ActionCall<A>>,
    ) -> Admission {
        if let Some(entry) = self.executing[action.index()] {
            match scheduler.get_weight(entry.key) {
                Some(weight) if weight > 0 => return self.extend(action, entry, weight, scheduler),
                _ => {
                    // The slot is gone or cancelled underneath us.  Forget
                    // the entry and treat this as a fresh request.
                    warn!(actor = %self.id, action = %self.def(action).spec.name, key = %entry.key,
                          "executing entry had no live slot; dropped");
                    self.executing[action.index()] = None;
                }
            }
        }

        if !self.can_act_id(action) {
            debug!(actor = %self.id, action = %self.def(action).spec.name, "admission denied");
            return Admission::Denied;
        }

        let spec = &self.catalogue[action].spec;
        let (duration, priority) = (spec.duration_ticks, spec.priority);
        let (stamina_cost, mana_cost) = (spec.stamina_cost, spec.mana_cost);

        let key = scheduler.enqueue(ActionCall { actor: self.id, action, args }, priority, duration);
        self.executing[action.index()] = Some(ExecutingEntry {
            elapsed_ticks: 0,
            total_ticks:   duration,
            key,
        });
        let charged = self.resources.consume(stamina_cost, mana_cost);
        debug_assert!(charged, "admitted action could not be charged");
        Admission::Scheduled(key)
    }

    fn extend(
        &mut self,
        action: ActionId,
        entry: ExecutingEntry,
        weight: u32,
        scheduler: &mut Scheduler<ActionCall<A>>,
    ) -> Admission {
        let spec = &self.catalogue[action].spec;
        if !spec.extendable {
            return Admission::AlreadyRunning;
        }

        let charged = spec.charges_extension();
        if charged && !self.resources.consume(spec.stamina_cost, spec.mana_cost) {
            debug!(actor = %self.id, action = %spec.name, "extension denied: resources");
            return Admission::Denied;
        }

        scheduler.set_weight(entry.key, weight + 1);
        if let Some(live) = self.executing[action.index()].as_mut() {
            live.total_ticks += 1;
        }
        debug!(actor = %self.id, action = %spec.name, total = entry.total_ticks + 1, charged,
               "action extended");
        Admission::Extended { charged }
    }

    /// Run one tick of a dequeued action.
    ///
    /// Called by the tick driver for each slot returned in a pass, with the
    /// slot's post-visit weight in `visit.remaining`.  Bumps `elapsed_ticks`,
    /// invokes the handler, resets the action's cooldown counter, and drops
    /// the entry when this was the final tick.
    pub fn execute_action(
        &mut self,
        visit: &Dequeued<ActionCall<A>>,
        tick: Tick,
        state: &mut S,
        scheduler: &mut Scheduler<ActionCall<A>>,
    ) -> Execution {
        let call = &visit.payload;
        debug_assert_eq!(call.actor, self.id, "call dispatched to the wrong actor");
        let action = call.action;

        let Some(entry) = self
            .executing
            .get_mut(action.index())
            .and_then(Option::as_mut)
            .filter(|e| e.key == visit.key)
        else {
            warn!(actor = %self.id, %action, key = %visit.key, "dequeued slot has no executing entry");
            return Execution::Skipped;
        };

        entry.elapsed_ticks += 1;
        debug_assert_eq!(
            entry.elapsed_ticks + visit.remaining,
            entry.total_ticks,
            "elapsed + weight != total for {} {}",
            self.id,
            action,
        );
        let (elapsed_ticks, total_ticks) = (entry.elapsed_ticks, entry.total_ticks);

        let def = &self.catalogue[action];
        let mut ctx = HandlerCtx {
            actor: self.id,
            tick,
            elapsed_ticks,
            total_ticks,
            resources: &mut self.resources,
            state,
        };
        let flow = (def.handler)(&mut ctx, &call.args);
        self.since_fired[action.index()] = 0;

        if visit.is_final() {
            self.executing[action.index()] = None;
            Execution::Completed { total_ticks }
        } else if flow == ActionFlow::Halt {
            self.action_halt_id(action, scheduler);
            Execution::Halted { elapsed_ticks }
        } else {
            Execution::Running { elapsed_ticks, total_ticks }
        }
    }

    /// Stop `name` now.  The slot is cancelled (retired on the scheduler's
    /// next visit, within one pass) and the entry is dropped immediately.
    /// Returns `false` if the action was not running.
    ///
    /// # Panics
    ///
    /// Panics if the actor has no action called `name`.
    pub fn action_halt(&mut self, name: &str, scheduler: &mut Scheduler<ActionCall<A>>) -> bool {
        let action = self.expect_id(name);
        self.action_halt_id(action, scheduler)
    }

    pub fn action_halt_id(
        &mut self,
        action: ActionId,
        scheduler: &mut Scheduler<ActionCall<A>>,
    ) -> bool {
        let Some(entry) = self.executing.get_mut(action.index()).and_then(Option::take) else {
            return false;
        };
        scheduler.cancel(entry.key);
        debug!(actor = %self.id, action = %self.def(action).spec.name,
               elapsed = entry.elapsed_ticks, "action halted");
        true
    }

    /// Halt every running action.  Returns how many were halted.
    pub fn halt_all(&mut self, scheduler: &mut Scheduler<ActionCall<A>>) -> usize {
        let mut halted = 0;
        for slot in self.executing.iter_mut() {
            if let Some(entry) = slot.take() {
                scheduler.cancel(entry.key);
                halted += 1;
            }
        }
        if halted > 0 {
            debug!(actor = %self.id, halted, "all actions halted");
        }
        halted
    }

    // ── Upkeep ────────────────────────────────────────────────────────────

    /// Advance every cooldown counter by one tick.
    pub fn advance_cooldowns(&mut self) {
        for ((_, def), since) in self.catalogue.iter().zip(self.since_fired.iter_mut()) {
            if *since < def.spec.cooldown_ticks {
                *since += 1;
            }
        }
    }

    /// One tick of regeneration for every pool.
    pub fn regen(&mut self) {
        self.resources.regen();
    }

    // ── Diagnostics ───────────────────────────────────────────────────────

    /// Verify every executing entry against the scheduler.
    ///
    /// # Errors
    ///
    /// [`ActorError::Inconsistent`] naming the first entry whose slot is
    /// missing, cancelled, owned by another call, or whose
    /// `elapsed + weight != total`.
    pub fn check_consistency(&self, scheduler: &Scheduler<ActionCall<A>>) -> ActorResult<()> {
        for (i, entry) in self.executing.iter().enumerate() {
            let Some(entry) = entry else { continue };
            let action = ActionId(i as u16);
            let name = &self.def(action).spec.name;

            let weight = scheduler.get_weight(entry.key).ok_or_else(|| {
                ActorError::Inconsistent(format!("{} `{name}`: slot {} is gone", self.id, entry.key))
            })?;
            if weight == 0 {
                return Err(ActorError::Inconsistent(format!(
                    "{} `{name}`: slot {} is cancelled but still tracked",
                    self.id, entry.key
                )));
            }
            if entry.elapsed_ticks + weight != entry.total_ticks {
                return Err(ActorError::Inconsistent(format!(
                    "{} `{name}`: elapsed {} + weight {weight} != total {}",
                    self.id, entry.elapsed_ticks, entry.total_ticks
                )));
            }
            match scheduler.payload(entry.key) {
                Some(call) if call.actor == self.id && call.action == action => {}
                _ => {
                    return Err(ActorError::Inconsistent(format!(
                        "{} `{name}`: slot {} belongs to another call",
                        self.id, entry.key
                    )));
                }
            }
        }
        Ok(())
    }

    // ── Private helpers ───────────────────────────────────────────────────

    #[inline]
    fn def(&self, action: ActionId) -> &ActionDefinition<S, A> {
        &self.catalogue[action]
    }

    fn expect_id(&self, name: &str) -> ActionId {
        match self.catalogue.id(name) {
            Some(id) => id,
            None => panic!("{} ({}) has no action named `{name}`", self.id, self.name),
        }
    }
}
