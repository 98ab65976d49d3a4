//! `Scheduler<T>` — weighted, priority-ordered round-robin over in-flight
//! action occurrences.
//!
//! # Model
//!
//! Every slot carries a payload, a priority, and a *weight*: the number of
//! times it will still be returned before it retires.  Slots are kept in
//! scan order `(priority desc, insertion asc)`.  A cursor walks that order
//! head-to-tail; each visit returns the slot, decrements its weight, and
//! retires it when the weight reaches zero.
//!
//! ```text
//! order:  [ guard p5 w3 ] [ attack p3 w1 ] [ move p1 w2 ]
//!            ^cursor
//! pass 1 → guard(w2), attack(retired), move(w1)
//! pass 2 → guard(w1), move(retired)
//! pass 3 → guard(retired)
//! ```
//!
//! A pass is `len()` calls to [`Scheduler::dequeue`] after a
//! [`reset`][Scheduler::reset]; it returns every live slot exactly once, so a long action never
//! starves a short one of equal or lower priority: weight buys ticks of
//! occupancy, not extra turns within a tick.
//!
//! # Cancellation
//!
//! [`Scheduler::cancel`] (or `set_weight(key, 0)`) leaves the slot in place
//! with weight 0.  The cursor retires such slots silently on its next visit,
//! which is at most one pass away.  Until then `get_weight` reports
//! `Some(0)`; once retired, every lookup with the key misses.  A cancelled
//! slot stops counting toward [`Scheduler::len`] immediately;
//! [`Scheduler::slot_count`] keeps counting it until it is retired.

use tracing::trace;

use crate::{SlotArena, SlotKey};

// ── Slot storage ──────────────────────────────────────────────────────────────

struct Slot<T> {
    payload: T,
    weight:  u32,
}

/// Scan-order record.  Priority is copied here so ordering never touches the
/// arena; insertion order is implied by position among equal priorities.
#[derive(Copy, Clone)]
struct Ordered {
    key:      SlotKey,
    priority: i32,
}

/// A slot returned by [`Scheduler::dequeue`] or [`Scheduler::next_in_pass`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dequeued<T> {
    /// Key of the slot that produced this visit.  Already retired when
    /// `remaining == 0`.
    pub key:       SlotKey,
    pub payload:   T,
    /// Weight left *after* this visit.
    pub remaining: u32,
}

impl<T> Dequeued<T> {
    /// `true` if this visit retired the slot.
    #[inline]
    pub fn is_final(&self) -> bool {
        self.remaining == 0
    }
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

/// Priority-ordered weighted round-robin queue with stable, recyclable keys.
pub struct Scheduler<T> {
    slots:  SlotArena<Slot<T>>,
    order:  Vec<Ordered>,
    cursor: usize,
    /// Slots in `order` with weight > 0.
    live:   usize,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            slots:  SlotArena::new(),
            order:  Vec::new(),
            cursor: 0,
            live:   0,
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `payload` with `priority` (higher runs first) and `weight`
    /// (ticks of occupancy).  Equal priorities keep insertion order.
    ///
    /// A slot inserted behind the cursor mid-pass is first visited on the
    /// next pass; one inserted ahead of it is visited in the current pass.
    /// Enqueuing with `weight == 0` yields a slot that is already cancelled.
    pub fn enqueue(&mut self, payload: T, priority: i32, weight: u32) -> SlotKey {
        let key = self.slots.insert(Slot { payload, weight });
        if weight > 0 {
            self.live += 1;
        }

        // Everything with priority >= ours was inserted earlier or outranks
        // us, so the new slot goes right after that run.
        let pos = self.order.partition_point(|o| o.priority >= priority);
        self.order.insert(pos, Ordered { key, priority });
        if pos < self.cursor {
            self.cursor += 1;
        }
        trace!(%key, priority, weight, pos, "slot enqueued");
        key
    }

    /// Return the next live slot, wrapping to the head when the cursor runs
    /// off the tail.
    ///
    /// Callers are expected to check [`is_empty`][Self::is_empty] first;
    /// `None` is returned only when no live slot remains (every remaining
    /// slot was cancelled and has now been retired).
    ///
    /// After [`reset`][Self::reset], `len()` calls return each live slot
    /// exactly once, provided no slot is cancelled during the pass.  A driver
    /// whose handlers may cancel slots mid-pass should drain with
    /// [`next_in_pass`][Self::next_in_pass] instead.
    pub fn dequeue(&mut self) -> Option<Dequeued<T>>
    where
        T: Clone,
    {
        self.advance(true)
    }

    /// Like [`dequeue`][Self::dequeue] but never wraps: returns `None` once
    /// the cursor has passed the tail.  Draining with this until `None`
    /// visits every slot that was live at the start of the pass exactly once,
    /// even when cancelled slots are retired along the way.
    pub fn next_in_pass(&mut self) -> Option<Dequeued<T>>
    where
        T: Clone,
    {
        self.advance(false)
    }

    /// Rewind the cursor to the head.  Called once per tick boundary after
    /// the driver has drained one full pass.
    #[inline]
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    // ── Weight access ─────────────────────────────────────────────────────

    /// Remaining weight of the slot behind `key`, or `None` if the key is
    /// stale or unknown.  A cancelled slot that has not been visited yet
    /// reports `Some(0)`.
    pub fn get_weight(&self, key: SlotKey) -> Option<u32> {
        self.slots.get(key).map(|s| s.weight)
    }

    /// Overwrite the remaining weight of a live slot.  Returns `false` (and
    /// does nothing) for a stale or unknown key.
    ///
    /// Setting the weight to 0 cancels the slot; it is retired on the
    /// cursor's next visit.
    pub fn set_weight(&mut self, key: SlotKey, weight: u32) -> bool {
        match self.slots.get_mut(key) {
            Some(slot) => {
                match (slot.weight, weight) {
                    (0, w) if w > 0 => self.live += 1,
                    (w, 0) if w > 0 => self.live -= 1,
                    _ => {}
                }
                slot.weight = weight;
                true
            }
            None => false,
        }
    }

    /// Cancel the slot behind `key`.  Equivalent to `set_weight(key, 0)`.
    #[inline]
    pub fn cancel(&mut self, key: SlotKey) -> bool {
        self.set_weight(key, 0)
    }

    /// Payload of a live slot.
    pub fn payload(&self, key: SlotKey) -> Option<&T> {
        self.slots.get(key).map(|s| &s.payload)
    }

    // ── Size ──────────────────────────────────────────────────────────────

    /// Live slots (weight > 0).  One pass is this many `dequeue` calls.
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Physical slot count, including cancelled slots not yet retired.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn contains(&self, key: SlotKey) -> bool {
        self.slots.contains(key)
    }

    /// Current cursor position within the scan order.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of arena indices ever minted.  Stays at the peak number of
    /// simultaneously held slots no matter how many slots have retired.
    #[inline]
    pub fn key_space(&self) -> usize {
        self.slots.capacity_used()
    }

    /// Iterate `(key, payload, weight)` in scan order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotKey, &T, u32)> + '_ {
        self.order.iter().filter_map(move |o| {
            self.slots.get(o.key).map(|s| (o.key, &s.payload, s.weight))
        })
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn advance(&mut self, wrap: bool) -> Option<Dequeued<T>>
    where
        T: Clone,
    {
        loop {
            if self.cursor >= self.order.len() {
                if !wrap || self.order.is_empty() {
                    return None;
                }
                self.cursor = 0;
            }

            let key = self.order[self.cursor].key;
            let Some(slot) = self.slots.get_mut(key) else {
                // Order and arena are only ever edited together; an orphan
                // here means a bug in this file.  Drop it and keep scanning.
                self.order.remove(self.cursor);
                continue;
            };

            if slot.weight == 0 {
                // Cancelled since the last visit: retire without returning.
                self.order.remove(self.cursor);
                self.slots.remove(key);
                trace!(%key, "cancelled slot retired");
                continue;
            }

            slot.weight -= 1;
            let remaining = slot.weight;
            if remaining > 0 {
                let payload = slot.payload.clone();
                self.cursor += 1;
                return Some(Dequeued { key, payload, remaining });
            }

            // Final visit.  Removing from `order` leaves the cursor pointing
            // at the next slot in scan order.
            self.live -= 1;
            self.order.remove(self.cursor);
            if let Some(slot) = self.slots.remove(key) {
                trace!(%key, "slot retired");
                return Some(Dequeued { key, payload: slot.payload, remaining: 0 });
            }
        }
    }
}
