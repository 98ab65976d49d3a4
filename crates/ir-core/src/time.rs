//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter advanced once per
//! simulation step.  Every duration in the engine (cooldowns, action
//! occupancy, regeneration) is an integer number of ticks, so scheduling
//! arithmetic is exact and comparisons are O(1).
//!
//! `TickClock` maps ticks to wall-clock time through a fixed tick rate
//! (default 60 ticks per second).  Catalogues authored in seconds are
//! converted once, at load time, with [`TickClock::ticks_for_millis`].

use std::fmt;

use crate::{CoreError, CoreResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
///
/// Stored as `u64`: at 60 ticks per second a u64 lasts ~9.7 billion years.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── TickClock ─────────────────────────────────────────────────────────────────

/// Tracks the current tick and converts between ticks and wall-clock time.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickClock {
    /// Simulation steps per real second.  Default: 60.
    pub ticks_per_sec: u32,
    /// The current tick — advanced by `TickClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl TickClock {
    pub fn new(ticks_per_sec: u32) -> Self {
        Self { ticks_per_sec, current_tick: Tick::ZERO }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Elapsed wall-clock milliseconds since tick 0.
    #[inline]
    pub fn elapsed_millis(&self) -> u64 {
        self.current_tick.0 * 1_000 / self.ticks_per_sec as u64
    }

    // ── Tick-count helpers ────────────────────────────────────────────────

    /// How many ticks span `millis` milliseconds?  Rounds up, so a 100 ms
    /// cooldown at 60 Hz is 6 ticks, never 5.
    #[inline]
    pub fn ticks_for_millis(&self, millis: u64) -> u64 {
        (millis * self.ticks_per_sec as u64).div_ceil(1_000)
    }

    #[inline]
    pub fn ticks_for_secs(&self, secs: u64) -> u64 {
        secs * self.ticks_per_sec as u64
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(60)
    }
}

impl fmt::Display for TickClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.elapsed_millis();
        write!(f, "{} ({}.{:03}s)", self.current_tick, ms / 1_000, ms % 1_000)
    }
}

// ── WorldConfig ───────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from a JSON file by the application crate and passed to
/// the simulation builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldConfig {
    /// Simulation steps per real second.  Must be non-zero.
    pub ticks_per_sec: u32,

    /// Total ticks to simulate.  For one minute at 60 Hz: 3600.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Worker thread count for the parallel intent phase.  `None` uses all
    /// logical cores.
    pub num_threads: Option<usize>,

    /// Emit observer snapshots every N ticks.  0 disables snapshots.
    pub output_interval_ticks: u64,
}

impl WorldConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `TickClock` pre-configured for this run.
    pub fn make_clock(&self) -> TickClock {
        TickClock::new(self.ticks_per_sec)
    }

    /// Reject configurations the tick loop cannot run.
    pub fn validate(&self) -> CoreResult<()> {
        if self.ticks_per_sec == 0 {
            return Err(CoreError::Config("ticks_per_sec must be > 0".into()));
        }
        if self.num_threads == Some(0) {
            return Err(CoreError::Config("num_threads must be > 0 when set".into()));
        }
        Ok(())
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            ticks_per_sec:         60,
            total_ticks:           3_600,
            seed:                  0,
            num_threads:           None,
            output_interval_ticks: 0,
        }
    }
}
