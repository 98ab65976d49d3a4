//! `SlotKey` — stable, generation-checked handle to a scheduler slot.

use std::fmt;

/// Handle returned by [`Scheduler::enqueue`][crate::Scheduler::enqueue].
///
/// `index` is recycled once the slot retires; `generation` is bumped on every
/// retirement, so a key held past its slot's lifetime never matches the slot
/// that later reuses the same index.  Lookups with a stale key behave exactly
/// like lookups with a key that was never issued.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotKey {
    pub(crate) index:      u32,
    pub(crate) generation: u32,
}

impl SlotKey {
    /// Position in the arena's backing `Vec`.
    #[inline]
    pub fn index(self) -> u32 {
        self.index
    }

    /// How many times `index` had been retired before this key was minted.
    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SlotKey({}v{})", self.index, self.generation)
    }
}
