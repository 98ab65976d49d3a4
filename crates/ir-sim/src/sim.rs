//! The `Sim` struct and its tick loop.

use tracing::{debug, info, trace, warn};

use ir_actor::{
    ActionCall, Actor, ActorBuilder, ActorRngs, ActorStore, Admission, Execution,
};
use ir_behavior::{BehaviorModel, Intent, SimContext};
use ir_core::{ActorId, Tick, TickClock, WorldConfig};
use ir_sched::Scheduler;

use crate::{ActionFired, SimError, SimObserver, SimResult, TickSummary};

// ── Thread-safety bounds ──────────────────────────────────────────────────────
//
// The parallel intent phase shares `&S` and `&Actor<S, A>` across Rayon
// workers and sends intents back, so it needs `S: Sync` and `A: Send + Sync`.
// The sequential build asks for nothing beyond `A: Clone`.

/// Bound on the world state type `S`.  `Sync` under the `parallel` feature.
#[cfg(feature = "parallel")]
pub trait WorldState: Sync {}
#[cfg(feature = "parallel")]
impl<T: Sync> WorldState for T {}

/// Bound on the world state type `S`.  `Sync` under the `parallel` feature.
#[cfg(not(feature = "parallel"))]
pub trait WorldState {}
#[cfg(not(feature = "parallel"))]
impl<T> WorldState for T {}

/// Bound on the call-argument type `A`.  Queued calls are cloned out of the
/// scheduler on every visit; `Send + Sync` is added under `parallel`.
#[cfg(feature = "parallel")]
pub trait ActionArgs: Clone + Send + Sync {}
#[cfg(feature = "parallel")]
impl<T: Clone + Send + Sync> ActionArgs for T {}

/// Bound on the call-argument type `A`.  Queued calls are cloned out of the
/// scheduler on every visit; `Send + Sync` is added under `parallel`.
#[cfg(not(feature = "parallel"))]
pub trait ActionArgs: Clone {}
#[cfg(not(feature = "parallel"))]
impl<T: Clone> ActionArgs for T {}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<S, A, B>` owns the world state, every actor, and the one shared
/// scheduler, and drives the tick loop:
///
/// 1. **Upkeep**: every live actor advances its cooldowns, then regenerates.
/// 2. **Intent phase** (optionally parallel with the `parallel` feature):
///    [`BehaviorModel::decide`] for every live actor.
/// 3. **Apply phase** (sequential): externally issued intents in issue
///    order, then behavior intents in ascending `ActorId` order.
///    `Act` → `enqueue_action`, `Halt` → `action_halt`.
/// 4. **Resolution pass**: the scheduler is drained once, head to tail;
///    each visit runs `execute_action` on the owning actor.
/// 5. **Reaping**: actors for which [`BehaviorModel::is_dead`] holds are
///    removed, their running actions halted first.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<S, A, B: BehaviorModel<S, A>> {
    /// Global configuration (total ticks, seed, tick rate, …).
    pub config: WorldConfig,

    /// Simulation clock — tracks the current tick and maps to wall time.
    pub clock: TickClock,

    /// Application world state.  Handlers mutate it; behaviors read it.
    pub state: S,

    /// Every actor, live or tombstoned, indexed by `ActorId`.
    pub actors: ActorStore<S, A>,

    /// Per-actor deterministic RNGs, separated for the split-borrow pattern.
    pub rngs: ActorRngs,

    /// The shared scheduler.  Every actor operation borrows it from here.
    pub scheduler: Scheduler<ActionCall<A>>,

    /// The behavior model.  Called once per live actor per tick.
    pub behavior: B,

    /// Intents from [`Sim::issue`], applied at the next apply phase.
    pub(crate) pending: Vec<(ActorId, Intent<A>)>,

    #[cfg(feature = "parallel")]
    pub(crate) pool: Option<rayon::ThreadPool>,
}

impl<S, A, B> Sim<S, A, B>
where
    S: WorldState,
    A: ActionArgs,
    B: BehaviorModel<S, A>,
{
    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver<S, A>>(&mut self, observer: &mut O) -> SimResult<()> {
        let end = self.config.end_tick();
        info!(from = %self.clock.current_tick, to = %end, actors = self.actors.len(), "run started");
        while self.clock.current_tick < end {
            self.step(observer)?;
        }
        observer.on_sim_end(self.clock.current_tick);
        info!(clock = %self.clock, actors = self.actors.len(), "run finished");
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver<S, A>>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Run one tick with all observer hooks, then advance the clock.
    pub fn step<O: SimObserver<S, A>>(&mut self, observer: &mut O) -> SimResult<TickSummary> {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        let summary = self.process_tick(now, observer)?;
        observer.on_tick_end(&summary);
        if self.config.output_interval_ticks > 0
            && now.0.is_multiple_of(self.config.output_interval_ticks)
        {
            observer.on_snapshot(now, &self.actors, &self.state);
        }
        self.clock.advance();
        Ok(summary)
    }

    /// Queue an intent for `actor` from outside the behavior model (player
    /// input, scripted events).  Applied at the next apply phase, before any
    /// behavior intents.
    ///
    /// # Errors
    ///
    /// [`SimError::UnknownActor`] if `actor` is not live;
    /// [`SimError::UnknownAction`] if the intent names an action the actor
    /// does not have.
    pub fn issue(&mut self, actor: ActorId, intent: Intent<A>) -> SimResult<()> {
        let target = self.actors.get(actor).ok_or(SimError::UnknownActor(actor))?;
        let action = intent.action();
        if target.catalogue().get(action).is_none() {
            return Err(SimError::UnknownAction { actor, action });
        }
        self.pending.push((actor, intent));
        Ok(())
    }

    /// Add an actor mid-run.  It joins the next tick's upkeep and intent
    /// phase.
    pub fn spawn(&mut self, builder: ActorBuilder<S, A>) -> SimResult<ActorId> {
        let id = self.actors.spawn(builder)?;
        self.rngs.ensure(self.actors.id_space());
        debug!(actor = %id, tick = %self.clock.current_tick, "actor spawned");
        Ok(id)
    }

    /// Remove an actor, halting every action it has in flight first so no
    /// handler ever fires for it again.  Pending issued intents for it are
    /// dropped.
    pub fn remove_actor(&mut self, id: ActorId) -> SimResult<Actor<S, A>> {
        let actor = self.actors.get_mut(id).ok_or(SimError::UnknownActor(id))?;
        let halted = actor.halt_all(&mut self.scheduler);
        self.pending.retain(|(target, _)| *target != id);
        let actor = self.actors.remove(id).ok_or(SimError::UnknownActor(id))?;
        debug!(actor = %id, name = actor.name(), halted, "actor removed");
        Ok(actor)
    }

    #[inline]
    pub fn actor(&self, id: ActorId) -> Option<&Actor<S, A>> {
        self.actors.get(id)
    }

    #[inline]
    pub fn current_tick(&self) -> Tick {
        self.clock.current_tick
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick<O: SimObserver<S, A>>(
        &mut self,
        now:      Tick,
        observer: &mut O,
    ) -> SimResult<TickSummary> {
        let mut summary = TickSummary { tick: now, ..TickSummary::default() };

        // ── Phase 1: upkeep ───────────────────────────────────────────────
        for actor in self.actors.iter_mut() {
            actor.advance_cooldowns();
            actor.regen();
        }

        // ── Phase 2: intent phase (produce) ───────────────────────────────
        let intents = self.compute_intents(now);

        // ── Phase 3: apply phase (consume) ────────────────────────────────
        //
        // External intents first, in issue order; then behavior intents in
        // ascending ActorId order, so results are deterministic even when
        // the intent phase ran in parallel.
        for (actor, intent) in std::mem::take(&mut self.pending) {
            self.apply_intent(actor, intent, &mut summary);
        }
        for (actor, actor_intents) in intents {
            for intent in actor_intents {
                self.apply_intent(actor, intent, &mut summary);
            }
        }

        // ── Phase 4: resolution pass ──────────────────────────────────────
        self.resolve(now, &mut summary, observer);

        // ── Phase 5: reap dead actors ─────────────────────────────────────
        let dead: Vec<ActorId> = self
            .actors
            .ids()
            .filter(|&id| self.actors.get(id).is_some_and(|a| self.behavior.is_dead(a, &self.state)))
            .collect();
        for id in dead {
            let actor = self.remove_actor(id)?;
            observer.on_actor_removed(now, id, actor.name());
            summary.reaped += 1;
        }

        if cfg!(debug_assertions) {
            for actor in self.actors.iter() {
                actor.check_consistency(&self.scheduler)?;
            }
        }

        summary.actors = self.actors.len();
        summary.queued = self.scheduler.slot_count();
        trace!(?summary, "tick complete");
        Ok(summary)
    }

    /// Call `decide` for every live actor.
    ///
    /// With the `parallel` Cargo feature, calls run on Rayon's thread pool
    /// (the builder's pool when `num_threads` is set, the global pool
    /// otherwise).  Either way the result is in ascending `ActorId` order.
    fn compute_intents(&mut self, now: Tick) -> Vec<(ActorId, Vec<Intent<A>>)> {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let actors   = &self.actors;
        let behavior = &self.behavior;
        let rngs     = &mut self.rngs;

        let ctx = SimContext::new(now, self.clock.ticks_per_sec, &self.state, actors);

        #[cfg(not(feature = "parallel"))]
        {
            rngs.inner
                .iter_mut()
                .enumerate()
                .filter_map(|(i, rng)| {
                    let actor = actors.get(ActorId(i as u32))?;
                    let intents = behavior.decide(actor, &ctx, rng);
                    (!intents.is_empty()).then(|| (actor.id(), intents))
                })
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let decide_all = || {
                rngs.inner
                    .par_iter_mut()
                    .enumerate()
                    .filter_map(|(i, rng)| {
                        let actor = actors.get(ActorId(i as u32))?;
                        let intents = behavior.decide(actor, &ctx, rng);
                        (!intents.is_empty()).then(|| (actor.id(), intents))
                    })
                    .collect::<Vec<_>>()
            };
            match &self.pool {
                Some(pool) => pool.install(decide_all),
                None => decide_all(),
            }
        }
    }

    /// Apply one intent during the sequential write phase.
    fn apply_intent(&mut self, actor: ActorId, intent: Intent<A>, summary: &mut TickSummary) {
        let Some(target) = self.actors.get_mut(actor) else {
            warn!(%actor, "intent for a removed actor dropped");
            return;
        };
        let action = intent.action();
        if target.catalogue().get(action).is_none() {
            warn!(%actor, %action, "intent names an unknown action; dropped");
            return;
        }
        summary.intents += 1;

        match intent {
            Intent::Act { action, args } => {
                match target.enqueue_action_id(action, args, &mut self.scheduler) {
                    Admission::Scheduled(_) => summary.scheduled += 1,
                    Admission::Extended { .. } => summary.extended += 1,
                    Admission::Denied => summary.denied += 1,
                    Admission::AlreadyRunning => {}
                }
            }
            Intent::Halt { action } => {
                if target.action_halt_id(action, &mut self.scheduler) {
                    summary.halted += 1;
                }
            }
        }
    }

    /// One full scheduler pass: every slot live at the start of the pass is
    /// visited exactly once.
    fn resolve<O: SimObserver<S, A>>(
        &mut self,
        now:      Tick,
        summary:  &mut TickSummary,
        observer: &mut O,
    ) {
        while let Some(visit) = self.scheduler.next_in_pass() {
            let owner = visit.payload.actor;
            let Some(actor) = self.actors.get_mut(owner) else {
                // Only reachable if an actor left the store without
                // `remove_actor`.  Make sure the slot never comes back.
                warn!(actor = %owner, key = %visit.key, "slot owned by a removed actor cancelled");
                self.scheduler.cancel(visit.key);
                continue;
            };

            let execution = actor.execute_action(&visit, now, &mut self.state, &mut self.scheduler);
            if !execution.fired() {
                continue;
            }
            summary.fired += 1;
            match execution {
                Execution::Completed { .. } => summary.completed += 1,
                Execution::Halted { .. } => summary.halted += 1,
                Execution::Running { .. } | Execution::Skipped => {}
            }

            let spec = &actor.catalogue()[visit.payload.action].spec;
            observer.on_action_fired(&ActionFired {
                tick:        now,
                actor:       owner,
                actor_name:  actor.name(),
                action:      visit.payload.action,
                action_name: &spec.name,
                priority:    spec.priority,
                execution,
            });
        }
        self.scheduler.reset();
    }
}
