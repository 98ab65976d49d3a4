//! Integration tests for ir-sim.

use ir_actor::{ActionFlow, ActionSpec, ActorBuilder, Execution, Handler, HandlerCtx, handler};
use ir_behavior::{BehaviorModel, Intent, NoopBehavior};
use ir_core::{ActorId, Tick, WorldConfig};

use crate::{ActionFired, NoopObserver, Sim, SimBuilder, SimObserver, TickSummary};

// ── Helpers ───────────────────────────────────────────────────────────────────

type Target = Option<ActorId>;

#[derive(Default)]
struct Arena {
    hp:  Vec<i32>,
    log: Vec<(Tick, ActorId, &'static str)>,
}

impl Arena {
    fn with_hp(hp: &[i32]) -> Self {
        Self { hp: hp.to_vec(), log: Vec::new() }
    }

    fn fired(&self, name: &str) -> usize {
        self.log.iter().filter(|(_, _, n)| *n == name).count()
    }
}

fn test_config(total_ticks: u64) -> WorldConfig {
    WorldConfig {
        total_ticks,
        seed: 42,
        num_threads: Some(1),
        ..WorldConfig::default()
    }
}

fn logger(name: &'static str) -> Handler<Arena, Target> {
    handler(move |ctx: &mut HandlerCtx<'_, Arena>, _target: &Target| {
        ctx.state.log.push((ctx.tick, ctx.actor, name));
        ActionFlow::Continue
    })
}

/// attack (p3, 45 stamina, 6-tick cooldown, 10 damage), guard (p9, 2 ticks,
/// paid extensions), walk (p1, 3 ticks, free extensions).
fn fighter(name: &str) -> ActorBuilder<Arena, Target> {
    ActorBuilder::new(name)
        .add_action(
            ActionSpec::new("attack").stamina(45).cooldown(6).priority(3),
            handler(|ctx: &mut HandlerCtx<'_, Arena>, target: &Target| {
                if let Some(t) = target {
                    ctx.state.hp[t.index()] -= 10;
                }
                ctx.state.log.push((ctx.tick, ctx.actor, "attack"));
                ActionFlow::Continue
            }),
        )
        .add_action(
            ActionSpec::new("guard").stamina(10).duration(2).priority(9).extendable_charged(),
            logger("guard"),
        )
        .add_action(
            ActionSpec::new("walk").duration(3).priority(1).extendable_free(),
            logger("walk"),
        )
}

fn duel<B: BehaviorModel<Arena, Target>>(behavior: B, total_ticks: u64) -> Sim<Arena, Target, B> {
    SimBuilder::new(test_config(total_ticks), Arena::with_hp(&[100, 100]), behavior)
        .actor(fighter("knight"))
        .actor(fighter("slime"))
        .build()
        .unwrap()
}

fn issue<B: BehaviorModel<Arena, Target>>(
    sim:    &mut Sim<Arena, Target, B>,
    actor:  ActorId,
    name:   &str,
    target: Target,
) {
    let intent = Intent::act(sim.actor(actor).unwrap(), name, target).unwrap();
    sim.issue(actor, intent).unwrap();
}

fn halt<B: BehaviorModel<Arena, Target>>(sim: &mut Sim<Arena, Target, B>, actor: ActorId, name: &str) {
    let intent = Intent::halt(sim.actor(actor).unwrap(), name).unwrap();
    sim.issue(actor, intent).unwrap();
}

/// Observer that records everything it is told.
#[derive(Default)]
struct Recorder {
    starts:    usize,
    summaries: Vec<TickSummary>,
    fired:     Vec<(Tick, String, String, Execution)>,
    removed:   Vec<(Tick, ActorId, String)>,
    snapshots: Vec<(Tick, usize)>,
    ended:     Option<Tick>,
}

impl<S, A> SimObserver<S, A> for Recorder {
    fn on_tick_start(&mut self, _tick: Tick) {
        self.starts += 1;
    }

    fn on_action_fired(&mut self, e: &ActionFired<'_>) {
        self.fired.push((e.tick, e.actor_name.to_owned(), e.action_name.to_owned(), e.execution));
    }

    fn on_actor_removed(&mut self, tick: Tick, actor: ActorId, name: &str) {
        self.removed.push((tick, actor, name.to_owned()));
    }

    fn on_tick_end(&mut self, summary: &TickSummary) {
        self.summaries.push(*summary);
    }

    fn on_snapshot(&mut self, tick: Tick, actors: &ir_actor::ActorStore<S, A>, _state: &S) {
        self.snapshots.push((tick, actors.len()));
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.ended = Some(final_tick);
    }
}

/// Dies at 0 hp; never decides anything on its own.
struct Mortal;

impl BehaviorModel<Arena, Target> for Mortal {
    fn decide(
        &self,
        _actor: &ir_actor::Actor<Arena, Target>,
        _ctx:   &ir_behavior::SimContext<'_, Arena, Target>,
        _rng:   &mut ir_core::ActorRng,
    ) -> Vec<Intent<Target>> {
        vec![]
    }

    fn is_dead(&self, actor: &ir_actor::Actor<Arena, Target>, state: &Arena) -> bool {
        state.hp[actor.id().index()] <= 0
    }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;
    use crate::SimError;

    #[test]
    fn builds_with_sequential_ids() {
        let sim = duel(NoopBehavior, 10);
        assert_eq!(sim.actors.ids().collect::<Vec<_>>(), vec![ActorId(0), ActorId(1)]);
        assert_eq!(sim.actor(ActorId(1)).unwrap().name(), "slime");
        assert_eq!(sim.rngs.len(), 2);
        assert!(sim.scheduler.is_empty());
    }

    #[test]
    fn invalid_config_errors() {
        let cfg = WorldConfig { ticks_per_sec: 0, ..test_config(10) };
        let result = SimBuilder::<Arena, Target, _>::new(cfg, Arena::default(), NoopBehavior).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn invalid_actor_errors() {
        let broken = fighter("twin").add_action(ActionSpec::new("walk"), logger("walk"));
        let result = SimBuilder::new(test_config(10), Arena::default(), NoopBehavior)
            .actor(broken)
            .build();
        assert!(matches!(result, Err(SimError::Actor(_))));
    }
}

// ── Basic run ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[test]
    fn noop_runs_to_end_tick() {
        let mut sim = duel(NoopBehavior, 10);
        sim.run(&mut NoopObserver).unwrap();
        assert_eq!(sim.clock.current_tick, Tick(10));
    }

    #[test]
    fn run_ticks_advances_clock() {
        let mut sim = duel(NoopBehavior, 100);
        sim.run_ticks(5, &mut NoopObserver).unwrap();
        assert_eq!(sim.current_tick(), Tick(5));
        sim.run_ticks(3, &mut NoopObserver).unwrap();
        assert_eq!(sim.current_tick(), Tick(8));
    }

    #[test]
    fn observer_called_correct_number_of_times() {
        let mut sim = duel(NoopBehavior, 7);
        let mut obs = Recorder::default();
        sim.run(&mut obs).unwrap();
        assert_eq!(obs.starts, 7);
        assert_eq!(obs.summaries.len(), 7);
        assert_eq!(obs.ended, Some(Tick(7)));
        assert!(obs.summaries.iter().all(|s| s.fired == 0 && s.actors == 2));
    }

    #[test]
    fn snapshots_follow_interval() {
        let mut sim = duel(NoopBehavior, 10);
        sim.config.output_interval_ticks = 5;
        let mut obs = Recorder::default();
        sim.run(&mut obs).unwrap();
        assert_eq!(obs.snapshots, vec![(Tick(0), 2), (Tick(5), 2)]);
    }

    #[test]
    fn upkeep_regenerates_before_admission() {
        let mut sim = duel(NoopBehavior, 100);
        issue(&mut sim, ActorId(0), "attack", None);
        sim.step(&mut NoopObserver).unwrap();
        let stamina = |sim: &Sim<Arena, Target, NoopBehavior>| sim.actor(ActorId(0)).unwrap().resources().stamina.current;
        assert_eq!(stamina(&sim), 55);
        sim.step(&mut NoopObserver).unwrap();
        assert_eq!(stamina(&sim), 80);
    }
}

// ── Issued intents ────────────────────────────────────────────────────────────

#[cfg(test)]
mod issue_tests {
    use super::*;
    use crate::SimError;

    #[test]
    fn issued_attack_resolves_same_tick() {
        let mut sim = duel(NoopBehavior, 100);
        issue(&mut sim, ActorId(0), "attack", Some(ActorId(1)));
        let summary = sim.step(&mut NoopObserver).unwrap();

        assert_eq!(summary, TickSummary {
            tick: Tick(0),
            actors: 2,
            intents: 1,
            scheduled: 1,
            fired: 1,
            completed: 1,
            ..TickSummary::default()
        });
        assert_eq!(sim.state.hp, vec![100, 90]);
    }

    #[test]
    fn issue_validates_target() {
        let mut sim = duel(NoopBehavior, 100);
        let intent = Intent::Act { action: ir_core::ActionId(0), args: None };
        assert!(matches!(sim.issue(ActorId(9), intent.clone()), Err(SimError::UnknownActor(_))));

        let bogus = Intent::Halt { action: ir_core::ActionId(42) };
        assert!(matches!(sim.issue(ActorId(0), bogus), Err(SimError::UnknownAction { .. })));
        assert!(sim.issue(ActorId(0), intent).is_ok());
    }

    #[test]
    fn cooldown_denies_repeat() {
        let mut sim = duel(NoopBehavior, 100);
        issue(&mut sim, ActorId(0), "attack", Some(ActorId(1)));
        sim.step(&mut NoopObserver).unwrap();
        issue(&mut sim, ActorId(0), "attack", Some(ActorId(1)));
        let summary = sim.step(&mut NoopObserver).unwrap();
        assert_eq!((summary.denied, summary.fired), (1, 0));
        assert_eq!(sim.state.hp[1], 90);
    }

    #[test]
    fn reissued_guard_extends_by_one_tick() {
        let mut sim = duel(NoopBehavior, 100);
        let mut obs = Recorder::default();

        issue(&mut sim, ActorId(0), "guard", None);
        sim.step(&mut obs).unwrap();
        issue(&mut sim, ActorId(0), "guard", None);
        let s1 = sim.step(&mut obs).unwrap();
        let s2 = sim.step(&mut obs).unwrap();
        let s3 = sim.step(&mut obs).unwrap();

        assert_eq!(s1.extended, 1);
        assert_eq!(s2.completed, 1);
        assert_eq!(s3.fired, 0);
        assert_eq!(sim.state.fired("guard"), 3);
        let executions: Vec<Execution> = obs.fired.iter().map(|f| f.3).collect();
        assert_eq!(executions, vec![
            Execution::Running { elapsed_ticks: 1, total_ticks: 2 },
            Execution::Running { elapsed_ticks: 2, total_ticks: 3 },
            Execution::Completed { total_ticks: 3 },
        ]);
    }

    #[test]
    fn halt_intent_stops_within_the_tick() {
        let mut sim = duel(NoopBehavior, 100);
        issue(&mut sim, ActorId(0), "walk", None);
        sim.step(&mut NoopObserver).unwrap();

        halt(&mut sim, ActorId(0), "walk");
        let summary = sim.step(&mut NoopObserver).unwrap();
        assert_eq!((summary.halted, summary.fired, summary.queued), (1, 0, 0));
        assert_eq!(sim.state.fired("walk"), 1);
    }

    #[test]
    fn higher_priority_resolves_first() {
        let mut sim = duel(NoopBehavior, 100);
        for name in ["walk", "attack", "guard"] {
            issue(&mut sim, ActorId(0), name, None);
        }
        sim.step(&mut NoopObserver).unwrap();
        let order: Vec<&str> = sim.state.log.iter().map(|(_, _, n)| *n).collect();
        assert_eq!(order, vec!["guard", "attack", "walk"]);
    }

    #[test]
    fn equal_priority_actors_alternate_fairly() {
        let mut sim = duel(NoopBehavior, 100);
        issue(&mut sim, ActorId(1), "walk", None);
        issue(&mut sim, ActorId(0), "walk", None);
        sim.run_ticks(4, &mut NoopObserver).unwrap();

        let who: Vec<(u64, u32)> = sim.state.log.iter().map(|(t, a, _)| (t.0, a.0)).collect();
        assert_eq!(who, vec![(0, 1), (0, 0), (1, 1), (1, 0), (2, 1), (2, 0)]);
    }
}

// ── Reaping and removal ───────────────────────────────────────────────────────

#[cfg(test)]
mod removal_tests {
    use super::*;
    use crate::SimError;

    #[test]
    fn dead_actor_reaped_and_never_fires_again() {
        let mut sim = SimBuilder::new(test_config(100), Arena::with_hp(&[100, 10]), Mortal)
            .actor(fighter("knight"))
            .actor(fighter("slime"))
            .build()
            .unwrap();
        let mut obs = Recorder::default();

        issue(&mut sim, ActorId(0), "attack", Some(ActorId(1)));
        issue(&mut sim, ActorId(1), "walk", None);
        let s0 = sim.step(&mut obs).unwrap();
        assert_eq!((s0.fired, s0.reaped, s0.actors), (2, 1, 1));
        assert_eq!(obs.removed, vec![(Tick(0), ActorId(1), "slime".to_owned())]);

        let s1 = sim.step(&mut obs).unwrap();
        assert_eq!((s1.fired, s1.queued), (0, 0));
        assert_eq!(sim.state.fired("walk"), 1);
        assert!(sim.actor(ActorId(1)).is_none());
    }

    #[test]
    fn remove_actor_halts_and_drops_pending() {
        let mut sim = duel(NoopBehavior, 100);
        issue(&mut sim, ActorId(0), "walk", None);
        sim.step(&mut NoopObserver).unwrap();
        issue(&mut sim, ActorId(0), "guard", None);

        let knight = sim.remove_actor(ActorId(0)).unwrap();
        assert_eq!(knight.name(), "knight");
        assert_eq!(knight.executing_count(), 0);
        assert_eq!(sim.scheduler.len(), 0);

        let summary = sim.step(&mut NoopObserver).unwrap();
        assert_eq!((summary.intents, summary.fired), (0, 0));
        assert!(matches!(sim.remove_actor(ActorId(0)), Err(SimError::UnknownActor(_))));
    }

    #[test]
    fn spawn_mid_run() {
        let mut sim = duel(NoopBehavior, 100);
        sim.run_ticks(3, &mut NoopObserver).unwrap();
        sim.state.hp.push(50);
        let id = sim.spawn(fighter("bat")).unwrap();
        assert_eq!(id, ActorId(2));
        assert_eq!(sim.rngs.len(), 3);

        issue(&mut sim, id, "attack", Some(ActorId(0)));
        sim.step(&mut NoopObserver).unwrap();
        assert_eq!(sim.state.hp[0], 90);
    }
}

// ── Behavior-driven runs ──────────────────────────────────────────────────────

#[cfg(test)]
mod behavior_tests {
    use super::*;
    use ir_actor::Actor;
    use ir_behavior::{FnBehavior, SimContext};
    use ir_core::ActorRng;

    #[test]
    fn continuous_reissue_keeps_guard_up() {
        let always_guard = FnBehavior(
            |actor: &Actor<Arena, Target>, _ctx: &SimContext<'_, Arena, Target>, _rng: &mut ActorRng| {
                Intent::act(actor, "guard", None).into_iter().collect()
            },
        );
        let mut sim = duel(always_guard, 10);
        sim.run(&mut NoopObserver).unwrap();

        // Each actor: one guard per tick, never completing.
        assert_eq!(sim.state.fired("guard"), 20);
        let guard = sim.actor(ActorId(0)).unwrap().action_id("guard").unwrap();
        assert_eq!(sim.actor(ActorId(0)).unwrap().executing(guard).unwrap().total_ticks, 11);
    }

    /// Random intents drawn from the per-actor RNG.
    struct Dice;

    impl BehaviorModel<Arena, Target> for Dice {
        fn decide(
            &self,
            actor: &Actor<Arena, Target>,
            ctx:   &SimContext<'_, Arena, Target>,
            rng:   &mut ActorRng,
        ) -> Vec<Intent<Target>> {
            let names = ["attack", "guard", "walk"];
            let mut out = Vec::new();
            if rng.gen_bool(0.5) {
                let target = ctx.actors.ids().find(|&id| id != actor.id());
                out.extend(Intent::act(actor, names[rng.gen_range(0..3)], target));
            }
            if rng.gen_bool(0.1) {
                out.extend(Intent::halt(actor, names[rng.gen_range(0..3)]));
            }
            out
        }
    }

    #[test]
    fn same_seed_same_history() {
        let run = || {
            let mut sim = duel(Dice, 200);
            sim.state.hp = vec![i32::MAX / 2; 2];
            let mut obs = Recorder::default();
            sim.run(&mut obs).unwrap();
            (sim.state.log, obs.summaries)
        };
        let (log_a, sum_a) = run();
        let (log_b, sum_b) = run();
        assert!(!log_a.is_empty());
        assert_eq!(log_a, log_b);
        assert_eq!(sum_a, sum_b);
    }

    #[test]
    fn action_fired_reports_names() {
        let mut sim = duel(NoopBehavior, 10);
        let mut obs = Recorder::default();
        issue(&mut sim, ActorId(1), "attack", None);
        sim.step(&mut obs).unwrap();
        assert_eq!(obs.fired, vec![(
            Tick(0),
            "slime".to_owned(),
            "attack".to_owned(),
            Execution::Completed { total_ticks: 1 }
        )]);
    }
}

// ── Seeded interleavings ──────────────────────────────────────────────────────

#[cfg(test)]
mod interleavings {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    const ACTIONS: [&str; 3] = ["attack", "guard", "walk"];

    /// Random issue / halt / remove / spawn traffic through the public API.
    /// Every step must succeed (debug builds check actor/scheduler
    /// consistency inside `step`) and live entries must equal live slots.
    #[test]
    fn lifecycle_survives_random_traffic() {
        for seed in 0..8u64 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut sim = SimBuilder::new(test_config(1_000), Arena::with_hp(&[1_000; 3]), NoopBehavior)
                .actors((0..3).map(|i| fighter(&format!("f{i}"))))
                .build()
                .unwrap();

            for _ in 0..200 {
                let ids: Vec<ActorId> = sim.actors.ids().collect();
                for _ in 0..rng.gen_range(0..4) {
                    if ids.is_empty() {
                        break;
                    }
                    let who = ids[rng.gen_range(0..ids.len())];
                    let name = ACTIONS[rng.gen_range(0..ACTIONS.len())];
                    if rng.gen_bool(0.2) {
                        halt(&mut sim, who, name);
                    } else {
                        let target = ids.get(rng.gen_range(0..ids.len())).copied();
                        issue(&mut sim, who, name, target);
                    }
                }
                if !ids.is_empty() && rng.gen_bool(0.02) {
                    sim.remove_actor(ids[rng.gen_range(0..ids.len())]).unwrap();
                }
                if rng.gen_bool(0.02) {
                    sim.state.hp.push(1_000);
                    let id = sim.spawn(fighter("late")).unwrap();
                    assert_eq!(id.index() + 1, sim.state.hp.len());
                }

                sim.step(&mut NoopObserver).unwrap();

                let tracked: usize = sim.actors.iter().map(|a| a.executing_count()).sum();
                assert_eq!(tracked, sim.scheduler.len(), "seed {seed}");
            }
        }
    }
}
