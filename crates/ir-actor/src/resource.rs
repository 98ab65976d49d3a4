//! Per-actor resource budgets: stamina (always present) and mana (optional).
//!
//! Pools hold whole units.  Costs, regeneration, and caps are all `u32`, so
//! admission checks are exact comparisons with no rounding.

use std::fmt;

use serde::Deserialize;

// ── PoolConfig ────────────────────────────────────────────────────────────────

/// Static description of a pool, as written in actor templates.
///
/// ```json
/// { "max": 100, "regen_per_tick": 25 }
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoolConfig {
    pub max:            u32,
    pub regen_per_tick: u32,
    /// Starting value.  Defaults to `max`.
    #[serde(default)]
    pub initial:        Option<u32>,
}

impl PoolConfig {
    pub const fn new(max: u32, regen_per_tick: u32) -> Self {
        Self { max, regen_per_tick, initial: None }
    }

    /// 100 max, 25 per tick.
    pub const fn default_stamina() -> Self {
        Self::new(100, 25)
    }

    /// 100 max, 20 per tick.
    pub const fn default_mana() -> Self {
        Self::new(100, 20)
    }

    pub fn with_initial(mut self, initial: u32) -> Self {
        self.initial = Some(initial);
        self
    }
}

// ── ResourcePool ──────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ResourcePool {
    pub current:        u32,
    pub max:            u32,
    pub regen_per_tick: u32,
}

impl ResourcePool {
    /// Build a pool from its config.  An `initial` above `max` is clamped.
    pub fn from_config(cfg: PoolConfig) -> Self {
        Self {
            current:        cfg.initial.unwrap_or(cfg.max).min(cfg.max),
            max:            cfg.max,
            regen_per_tick: cfg.regen_per_tick,
        }
    }

    #[inline]
    pub fn can_afford(&self, cost: u32) -> bool {
        self.current >= cost
    }

    /// Deduct `cost`.  Returns `false` and leaves the pool untouched if the
    /// pool cannot cover it.
    pub fn consume(&mut self, cost: u32) -> bool {
        match self.current.checked_sub(cost) {
            Some(left) => {
                self.current = left;
                true
            }
            None => false,
        }
    }

    /// One tick of regeneration, capped at `max`.
    #[inline]
    pub fn regen(&mut self) {
        self.current = self.current.saturating_add(self.regen_per_tick).min(self.max);
    }

    /// Add `amount`, capped at `max`.  For handlers that restore resources.
    pub fn restore(&mut self, amount: u32) {
        self.current = self.current.saturating_add(amount).min(self.max);
    }
}

impl From<PoolConfig> for ResourcePool {
    fn from(cfg: PoolConfig) -> Self {
        Self::from_config(cfg)
    }
}

// ── ResourceKind ──────────────────────────────────────────────────────────────

/// Names a pool for [`Actor::get_stat`][crate::Actor::get_stat].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Stamina,
    Mana,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceKind::Stamina => "stamina",
            ResourceKind::Mana => "mana",
        })
    }
}

// ── Resources ─────────────────────────────────────────────────────────────────

/// All pools owned by one actor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resources {
    pub stamina: ResourcePool,
    pub mana:    Option<ResourcePool>,
}

impl Resources {
    pub fn new(stamina: PoolConfig, mana: Option<PoolConfig>) -> Self {
        Self {
            stamina: stamina.into(),
            mana:    mana.map(ResourcePool::from),
        }
    }

    pub fn pool(&self, kind: ResourceKind) -> Option<&ResourcePool> {
        match kind {
            ResourceKind::Stamina => Some(&self.stamina),
            ResourceKind::Mana => self.mana.as_ref(),
        }
    }

    /// `true` if both costs can be paid.  A zero mana cost never consults
    /// the mana pool, so mana-less actors can still run free actions.
    pub fn can_afford(&self, stamina_cost: u32, mana_cost: u32) -> bool {
        if !self.stamina.can_afford(stamina_cost) {
            return false;
        }
        mana_cost == 0 || self.mana.is_some_and(|m| m.can_afford(mana_cost))
    }

    /// Deduct both costs atomically.  Returns `false` with no change if
    /// either pool falls short.
    pub fn consume(&mut self, stamina_cost: u32, mana_cost: u32) -> bool {
        if !self.can_afford(stamina_cost, mana_cost) {
            return false;
        }
        self.stamina.consume(stamina_cost);
        if mana_cost > 0 {
            if let Some(mana) = self.mana.as_mut() {
                mana.consume(mana_cost);
            }
        }
        true
    }

    pub fn regen(&mut self) {
        self.stamina.regen();
        if let Some(mana) = self.mana.as_mut() {
            mana.regen();
        }
    }
}
