//! Embedded actor templates and the handlers that give them effect.
//!
//! Templates are plain data; every action name they use must be bound in
//! [`handlers`].  Cooldowns are authored in ticks at 60 Hz except `attack`,
//! whose 100 ms cooldown is converted at load time.

use ir_actor::{ActionFlow, HandlerCtx, HandlerTable, handler};
use ir_core::ActorId;

use crate::{Arena, Order};

pub const TEMPLATES_JSON: &str = r#"[
  {
    "name": "knight",
    "stamina": { "max": 100, "regen_per_tick": 25 },
    "actions": [
      { "name": "attack", "stamina_cost": 45, "cooldown_ticks": 0,
        "duration_ticks": 1, "priority": 3, "asset": "slash" },
      { "name": "guard", "stamina_cost": 10, "cooldown_ticks": 0,
        "duration_ticks": 2, "priority": 9,
        "extendable": true, "repeats_consumption": true, "asset": "shield" },
      { "name": "move", "stamina_cost": 5, "cooldown_ticks": 0,
        "duration_ticks": 4, "priority": 1, "extendable": true }
    ]
  },
  {
    "name": "mage",
    "stamina": { "max": 60, "regen_per_tick": 10 },
    "mana":    { "max": 100, "regen_per_tick": 4, "initial": 50 },
    "actions": [
      { "name": "cast", "stamina_cost": 0, "mana_cost": 30,
        "cooldown_ticks": 30, "duration_ticks": 3, "priority": 4, "asset": "fireball" },
      { "name": "illuminate", "stamina_cost": 0, "mana_cost": 5,
        "cooldown_ticks": 0, "duration_ticks": 1, "priority": 2,
        "extendable": true, "repeats_consumption": true },
      { "name": "move", "stamina_cost": 5, "cooldown_ticks": 0,
        "duration_ticks": 4, "priority": 1, "extendable": true }
    ]
  },
  {
    "name": "slime",
    "stamina": { "max": 40, "regen_per_tick": 5 },
    "actions": [
      { "name": "attack", "stamina_cost": 20, "cooldown_ticks": 0,
        "duration_ticks": 1, "priority": 3 },
      { "name": "move", "stamina_cost": 0, "cooldown_ticks": 0,
        "duration_ticks": 6, "priority": 1 }
    ]
  }
]"#;

const MELEE_DAMAGE: i32 = 12;
const SPELL_DAMAGE: i32 = 30;

fn strike(state: &mut Arena, attacker: ActorId, target: ActorId, damage: i32) {
    let Some(hp) = state.health.get_mut(target.index()) else { return };
    if *hp <= 0 {
        return;
    }
    let guarded = state.guarding.get(target.index()).copied().unwrap_or(false);
    let dealt = if guarded { damage / 2 } else { damage };
    *hp -= dealt;
    state.damage_dealt[attacker.index()] += dealt as u64;
}

/// Bind every action name used by [`TEMPLATES_JSON`].
pub fn handlers() -> HandlerTable<Arena, Order> {
    HandlerTable::new()
        .with("attack", handler(|ctx: &mut HandlerCtx<'_, Arena>, order: &Order| {
            if let Order::At(target) = *order {
                strike(ctx.state, ctx.actor, target, MELEE_DAMAGE);
            }
            ActionFlow::Continue
        }))
        // Damage lands when the cast finishes.
        .with("cast", handler(|ctx: &mut HandlerCtx<'_, Arena>, order: &Order| {
            match *order {
                Order::At(target) if ctx.is_last_tick() => {
                    strike(ctx.state, ctx.actor, target, SPELL_DAMAGE);
                    ActionFlow::Continue
                }
                Order::At(_) => ActionFlow::Continue,
                _ => ActionFlow::Halt,
            }
        }))
        .with("guard", handler(|ctx: &mut HandlerCtx<'_, Arena>, _: &Order| {
            ctx.state.guarding[ctx.actor.index()] = !ctx.is_last_tick();
            ActionFlow::Continue
        }))
        .with("illuminate", handler(|ctx: &mut HandlerCtx<'_, Arena>, _: &Order| {
            ctx.state.lit[ctx.actor.index()] = !ctx.is_last_tick();
            ActionFlow::Continue
        }))
        .with("move", handler(|ctx: &mut HandlerCtx<'_, Arena>, order: &Order| {
            let Order::Toward(x, y) = *order else { return ActionFlow::Halt };
            let pos = &mut ctx.state.positions[ctx.actor.index()];
            pos.0 += (x - pos.0).signum();
            pos.1 += (y - pos.1).signum();
            if *pos == (x, y) { ActionFlow::Halt } else { ActionFlow::Continue }
        }))
}
