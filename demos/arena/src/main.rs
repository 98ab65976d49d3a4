//! arena — a small skirmish driven by the intent resolution engine.
//!
//! Two knights and a mage hold the west side of a grid; four slimes come in
//! from the east.  Every actor picks intents at random each tick; the shared
//! scheduler resolves them by priority, and anything that drops to zero
//! health is reaped at the end of the tick.
//!
//! Output goes to `output/arena/` (three CSV traces plus `standings.json`).
//! Set `RUST_LOG=debug` to watch admission decisions.

mod templates;

use std::fs::File;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use ir_actor::{Actor, ActorBuilder, ActorStore, parse_templates};
use ir_behavior::{BehaviorModel, Intent, SimContext};
use ir_core::{ActorId, ActorRng, Tick, WorldConfig, WorldRng};
use ir_output::{CsvTraceWriter, TraceObserver, TraceWriter};
use ir_sim::{ActionFired, SimBuilder, SimObserver, TickSummary};

use templates::{TEMPLATES_JSON, handlers};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:                  u64 = 7;
const TICKS_PER_SEC:         u32 = 60;
const SIM_SECS:              u64 = 20;
const OUTPUT_INTERVAL_TICKS: u64 = 60;  // snapshot once per simulated second
const ATTACK_COOLDOWN_MS:    u64 = 100;
const START_HEALTH:          i32 = 100;

const ROSTER: [(&str, (i32, i32)); 7] = [
    ("knight", (0, 2)),
    ("knight", (0, 6)),
    ("mage",   (-2, 4)),
    ("slime",  (12, 0)),
    ("slime",  (12, 3)),
    ("slime",  (12, 5)),
    ("slime",  (12, 8)),
];

// ── World state ───────────────────────────────────────────────────────────────

/// Per-actor arena state, indexed by `ActorId`.
#[derive(Debug, Default)]
pub struct Arena {
    pub health:       Vec<i32>,
    pub positions:    Vec<(i32, i32)>,
    pub guarding:     Vec<bool>,
    pub lit:          Vec<bool>,
    pub damage_dealt: Vec<u64>,
}

impl Arena {
    fn push(&mut self, position: (i32, i32)) {
        self.health.push(START_HEALTH);
        self.positions.push(position);
        self.guarding.push(false);
        self.lit.push(false);
        self.damage_dealt.push(0);
    }

    fn alive(&self, id: ActorId) -> bool {
        self.health[id.index()] > 0
    }

    fn distance(&self, a: ActorId, b: ActorId) -> i32 {
        let (pa, pb) = (self.positions[a.index()], self.positions[b.index()]);
        (pa.0 - pb.0).abs().max((pa.1 - pb.1).abs())
    }
}

/// Call arguments shared by every action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    At(ActorId),
    Toward(i32, i32),
    Idle,
}

// ── Behavior model ────────────────────────────────────────────────────────────

/// Pick a random enemy; close the distance, then fight.
struct Skirmish;

impl BehaviorModel<Arena, Order> for Skirmish {
    fn decide(
        &self,
        actor: &Actor<Arena, Order>,
        ctx:   &SimContext<'_, Arena, Order>,
        rng:   &mut ActorRng,
    ) -> Vec<Intent<Order>> {
        let me = actor.id();
        let enemies: Vec<ActorId> = ctx
            .actors
            .iter()
            .filter(|other| (other.name() == "slime") != (actor.name() == "slime"))
            .map(|other| other.id())
            .filter(|&id| ctx.state.alive(id))
            .collect();
        let Some(&target) = rng.choose(&enemies) else {
            return vec![];
        };

        let mut intents = Vec::new();
        let mut want = |name: &str, order: Order| {
            if actor.action_id(name).is_some() {
                intents.extend(Intent::act(actor, name, order));
            }
        };

        let reach = if actor.action_id("cast").is_some() { 5 } else { 1 };
        if ctx.state.distance(me, target) > reach {
            if !actor.is_executing("move") {
                let (x, y) = ctx.state.positions[target.index()];
                want("move", Order::Toward(x, y));
            }
            return intents;
        }

        if rng.gen_bool(0.3) {
            want("guard", Order::Idle);
        }
        if rng.gen_bool(0.1) {
            want("illuminate", Order::Idle);
        }
        want("cast", Order::At(target));
        want("attack", Order::At(target));
        intents
    }

    fn is_dead(&self, actor: &Actor<Arena, Order>, state: &Arena) -> bool {
        !state.alive(actor.id())
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Forwards to the CSV trace and keeps a few totals for the summary.
struct ArenaObserver<W: TraceWriter> {
    trace:  TraceObserver<W>,
    fired:  usize,
    denied: usize,
    fallen: Vec<(Tick, String)>,
}

impl<W: TraceWriter> ArenaObserver<W> {
    fn new(trace: TraceObserver<W>) -> Self {
        Self { trace, fired: 0, denied: 0, fallen: Vec::new() }
    }
}

impl<W: TraceWriter> SimObserver<Arena, Order> for ArenaObserver<W> {
    fn on_action_fired(&mut self, event: &ActionFired<'_>) {
        self.fired += 1;
        SimObserver::<Arena, Order>::on_action_fired(&mut self.trace, event);
    }

    fn on_actor_removed(&mut self, tick: Tick, actor: ActorId, name: &str) {
        info!(%tick, %actor, name, "actor fell");
        self.fallen.push((tick, format!("{name} #{}", actor.0)));
    }

    fn on_tick_end(&mut self, summary: &TickSummary) {
        self.denied += summary.denied;
        SimObserver::<Arena, Order>::on_tick_end(&mut self.trace, summary);
    }

    fn on_snapshot(&mut self, tick: Tick, actors: &ActorStore<Arena, Order>, state: &Arena) {
        self.trace.on_snapshot(tick, actors, state);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        SimObserver::<Arena, Order>::on_sim_end(&mut self.trace, final_tick);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    println!("=== arena — intent resolution demo ===");
    println!("Actors: {}  |  Seconds: {SIM_SECS}  |  Seed: {SEED}", ROSTER.len());
    println!();

    // 1. Config.
    let config = WorldConfig {
        ticks_per_sec:         TICKS_PER_SEC,
        total_ticks:           SIM_SECS * TICKS_PER_SEC as u64,
        seed:                  SEED,
        num_threads:           None,
        output_interval_ticks: OUTPUT_INTERVAL_TICKS,
    };

    // 2. Templates, with the attack cooldown converted from wall time.
    let mut templates = parse_templates(TEMPLATES_JSON)?;
    let attack_cooldown = config.make_clock().ticks_for_millis(ATTACK_COOLDOWN_MS);
    templates
        .iter_mut()
        .flat_map(|t| t.actions.iter_mut())
        .filter(|spec| spec.name == "attack")
        .for_each(|spec| spec.cooldown_ticks = attack_cooldown);
    println!("Loaded {} templates (attack cooldown: {attack_cooldown} ticks)", templates.len());

    // 3. Actors and their arena state, in roster order.  Start positions get
    //    a one-tile jitter from the world RNG.
    let handlers = handlers();
    let mut world_rng = WorldRng::new(SEED);
    let mut arena = Arena::default();
    let mut actors: Vec<ActorBuilder<Arena, Order>> = Vec::with_capacity(ROSTER.len());
    for (name, position) in ROSTER {
        let template = templates
            .iter()
            .find(|t| t.name == name)
            .with_context(|| format!("no template named `{name}`"))?;
        actors.push(template.builder(&handlers)?);
        let (x, y) = position;
        arena.push((x + world_rng.gen_range(-1..=1), y + world_rng.gen_range(-1..=1)));
    }

    // 4. Build sim.
    let mut sim = SimBuilder::new(config.clone(), arena, Skirmish)
        .actors(actors)
        .build()?;

    // 5. Output.
    let out_dir = Path::new("output/arena");
    std::fs::create_dir_all(out_dir)?;
    let writer = CsvTraceWriter::new(out_dir)?;
    let mut obs = ArenaObserver::new(TraceObserver::new(writer, &config));

    // 6. Run.
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.trace.take_error() {
        eprintln!("trace error: {e}");
    }

    // 7. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  handlers fired : {}", obs.fired);
    println!("  denied intents : {}", obs.denied);
    for (tick, who) in &obs.fallen {
        println!("  {tick}: {who} fell");
    }
    println!();

    // 8. Standings.
    println!("{:<4} {:<8} {:>7} {:>8} {:>6} {:>7}", "Id", "Name", "Health", "Stamina", "Mana", "Damage");
    println!("{}", "-".repeat(46));
    let mut standings = Vec::with_capacity(ROSTER.len());
    for (i, (name, _)) in ROSTER.iter().enumerate() {
        let id = ActorId(i as u32);
        let health = sim.state.health[i].max(0);
        let damage = sim.state.damage_dealt[i];
        let (stamina, mana) = match sim.actor(id) {
            Some(actor) => (
                actor.resources().stamina.current.to_string(),
                actor.resources().mana.as_ref().map_or("-".to_owned(), |m| m.current.to_string()),
            ),
            None => ("-".to_owned(), "-".to_owned()),
        };
        println!("{:<4} {:<8} {:>7} {:>8} {:>6} {:>7}", i, name, health, stamina, mana, damage);
        standings.push(serde_json::json!({
            "id": i,
            "name": name,
            "alive": sim.actor(id).is_some(),
            "health": health,
            "damage_dealt": damage,
        }));
    }

    let file = File::create(out_dir.join("standings.json"))?;
    serde_json::to_writer_pretty(file, &standings)?;

    Ok(())
}
