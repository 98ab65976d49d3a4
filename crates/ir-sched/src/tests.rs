//! Unit tests for ir-sched.

use crate::{Dequeued, Scheduler, SlotArena, SlotKey};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Drain one full pass and reset, returning the payloads in visit order.
fn pass<T: Clone>(sched: &mut Scheduler<T>) -> Vec<T> {
    let mut out = Vec::new();
    while let Some(d) = sched.next_in_pass() {
        out.push(d.payload);
    }
    sched.reset();
    out
}

// ── SlotArena ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod arena {
    use super::*;

    #[test]
    fn insert_get_remove() {
        let mut arena = SlotArena::new();
        let a = arena.insert("a");
        let b = arena.insert("b");
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(a), Some(&"a"));
        assert_eq!(arena.remove(b), Some("b"));
        assert_eq!(arena.len(), 1);
        assert!(!arena.contains(b));
        assert!(arena.remove(b).is_none(), "double remove must miss");
    }

    #[test]
    fn freed_index_is_reused_with_new_generation() {
        let mut arena = SlotArena::new();
        let old = arena.insert(1u32);
        arena.remove(old);
        let new = arena.insert(2u32);

        assert_eq!(new.index(), old.index());
        assert_ne!(new.generation(), old.generation());
        assert!(arena.get(old).is_none(), "stale key must not alias the new value");
        assert_eq!(arena.get(new), Some(&2));
        assert_eq!(arena.capacity_used(), 1);
    }

    #[test]
    fn free_list_is_lifo() {
        let mut arena = SlotArena::new();
        let k0 = arena.insert(0);
        let k1 = arena.insert(1);
        let _k2 = arena.insert(2);
        arena.remove(k0);
        arena.remove(k1);
        // Most recently freed index comes back first.
        assert_eq!(arena.insert(10).index(), k1.index());
        assert_eq!(arena.insert(11).index(), k0.index());
    }

    #[test]
    fn stale_get_mut_misses() {
        let mut arena = SlotArena::new();
        let k = arena.insert(5);
        arena.remove(k);
        arena.insert(6);
        assert!(arena.get_mut(k).is_none());
    }

    #[test]
    fn key_display() {
        let mut arena = SlotArena::new();
        let k = arena.insert(());
        assert_eq!(k.to_string(), "SlotKey(0v0)");
    }
}

// ── Scheduler ordering and fairness ───────────────────────────────────────────

#[cfg(test)]
mod ordering {
    use super::*;

    #[test]
    fn equal_priority_pass_is_fifo_and_fair() {
        let mut sched = Scheduler::new();
        for name in ["a", "b", "c", "d"] {
            sched.enqueue(name, 0, 3);
        }
        // Every slot exactly once per pass, in insertion order, three times.
        for _ in 0..3 {
            assert_eq!(pass(&mut sched), vec!["a", "b", "c", "d"]);
        }
        assert!(sched.is_empty());
    }

    #[test]
    fn higher_priority_first() {
        let mut sched = Scheduler::new();
        sched.enqueue(1, 1, 1);
        sched.enqueue(5, 5, 1);
        sched.enqueue(3, 3, 1);
        assert_eq!(pass(&mut sched), vec![5, 3, 1]);
    }

    #[test]
    fn ties_keep_insertion_order_within_priority_band() {
        let mut sched = Scheduler::new();
        sched.enqueue("low-1", 0, 1);
        sched.enqueue("high-1", 9, 1);
        sched.enqueue("low-2", 0, 1);
        sched.enqueue("high-2", 9, 1);
        assert_eq!(pass(&mut sched), vec!["high-1", "high-2", "low-1", "low-2"]);
    }

    #[test]
    fn negative_priorities_sort_last() {
        let mut sched = Scheduler::new();
        sched.enqueue("neg", -4, 1);
        sched.enqueue("zero", 0, 1);
        assert_eq!(pass(&mut sched), vec!["zero", "neg"]);
    }

    #[test]
    fn weight_exhaustion_over_three_cycles() {
        let mut sched = Scheduler::new();
        let key = sched.enqueue("item", 0, 3);

        let mut remaining = Vec::new();
        for _ in 0..3 {
            let d = sched.dequeue().expect("slot is live");
            assert_eq!(d.key, key);
            remaining.push(d.remaining);
            sched.reset();
        }
        assert_eq!(remaining, vec![2, 1, 0]);
        assert!(sched.is_empty());
        assert_eq!(sched.get_weight(key), None);
    }

    #[test]
    fn long_slot_does_not_take_extra_turns() {
        let mut sched = Scheduler::new();
        sched.enqueue("long", 0, 4);
        sched.enqueue("short", 0, 1);
        assert_eq!(pass(&mut sched), vec!["long", "short"]);
        assert_eq!(pass(&mut sched), vec!["long"]);
        assert_eq!(pass(&mut sched), vec!["long"]);
        assert_eq!(pass(&mut sched), vec!["long"]);
        assert!(pass(&mut sched).is_empty());
    }

    #[test]
    fn dequeue_wraps_to_head() {
        let mut sched = Scheduler::new();
        sched.enqueue("a", 0, 3);
        sched.enqueue("b", 0, 3);
        let visits: Vec<(&str, u32)> = (0..3)
            .map(|_| {
                let d = sched.dequeue().unwrap();
                (d.payload, d.remaining)
            })
            .collect();
        assert_eq!(visits, vec![("a", 2), ("b", 2), ("a", 1)]);
    }

    #[test]
    fn final_visit_reports_retirement() {
        let mut sched = Scheduler::new();
        let key = sched.enqueue('x', 0, 1);
        let d: Dequeued<char> = sched.dequeue().unwrap();
        assert!(d.is_final());
        assert_eq!(d.key, key);
        assert!(!sched.contains(key));
    }
}

// ── Mid-pass insertion ────────────────────────────────────────────────────────

#[cfg(test)]
mod mid_pass {
    use super::*;

    #[test]
    fn insert_behind_cursor_waits_for_next_pass() {
        let mut sched = Scheduler::new();
        sched.enqueue("a", 1, 2);
        sched.enqueue("b", 1, 2);

        assert_eq!(sched.next_in_pass().unwrap().payload, "a");
        sched.enqueue("urgent", 5, 1); // sorts ahead of the cursor position
        assert_eq!(sched.next_in_pass().unwrap().payload, "b");
        assert!(sched.next_in_pass().is_none());
        sched.reset();

        assert_eq!(pass(&mut sched), vec!["urgent", "a", "b"]);
    }

    #[test]
    fn insert_ahead_of_cursor_joins_current_pass() {
        let mut sched = Scheduler::new();
        sched.enqueue("a", 5, 1);
        assert_eq!(sched.next_in_pass().unwrap().payload, "a");
        sched.enqueue("z", 1, 1);
        assert_eq!(sched.next_in_pass().unwrap().payload, "z");
        assert!(sched.next_in_pass().is_none());
    }
}

// ── Weight mutation, cancellation, stale keys ─────────────────────────────────

#[cfg(test)]
mod weights {
    use super::*;

    #[test]
    fn extension_adds_one_visit() {
        let mut sched = Scheduler::new();
        let key = sched.enqueue("guard", 0, 2);
        assert_eq!(sched.dequeue().unwrap().remaining, 1);
        sched.reset();

        let w = sched.get_weight(key).unwrap();
        assert!(sched.set_weight(key, w + 1));

        assert_eq!(sched.dequeue().unwrap().remaining, 1);
        sched.reset();
        assert_eq!(sched.dequeue().unwrap().remaining, 0);
        assert!(sched.is_empty());
    }

    #[test]
    fn cancelled_single_slot_gone_after_next_pass() {
        let mut sched = Scheduler::new();
        let key = sched.enqueue("guard", 0, 5);
        sched.dequeue();
        sched.reset();

        assert!(sched.cancel(key));
        assert_eq!(sched.get_weight(key), Some(0));
        assert_eq!(sched.slot_count(), 1, "retirement is lazy");
        assert_eq!(sched.len(), 0);
        assert!(sched.is_empty());

        assert!(pass(&mut sched).is_empty(), "cancelled slot must not be returned");
        assert_eq!(sched.slot_count(), 0);
        assert_eq!(sched.get_weight(key), None);
        assert!(!sched.cancel(key));
    }

    #[test]
    fn cancelled_slot_skipped_without_double_visits() {
        let mut sched = Scheduler::new();
        sched.enqueue("a", 0, 3);
        let b = sched.enqueue("b", 0, 3);
        sched.enqueue("c", 0, 3);
        sched.cancel(b);
        assert_eq!(pass(&mut sched), vec!["a", "c"]);
        assert_eq!(sched.len(), 2);
    }

    #[test]
    fn dequeue_len_times_after_cancel_visits_each_live_slot_once() {
        let mut sched = Scheduler::new();
        sched.enqueue('a', 0, 5);
        let b = sched.enqueue('b', 0, 5);
        sched.cancel(b);
        assert_eq!(sched.len(), 1);
        assert_eq!(sched.slot_count(), 2);

        let visits: Vec<char> = (0..sched.len())
            .filter_map(|_| sched.dequeue())
            .map(|d| d.payload)
            .collect();
        assert_eq!(visits, vec!['a']);
    }

    #[test]
    fn revived_slot_counts_as_live_again() {
        let mut sched = Scheduler::new();
        let key = sched.enqueue("guard", 0, 3);
        sched.cancel(key);
        assert!(sched.is_empty());
        assert!(sched.set_weight(key, 2));
        assert_eq!(sched.len(), 1);
        assert_eq!(pass(&mut sched), vec!["guard"]);
        assert_eq!(pass(&mut sched), vec!["guard"]);
        assert!(sched.is_empty());
        assert_eq!(sched.slot_count(), 0);
    }

    #[test]
    fn dequeue_with_only_cancelled_slots_returns_none() {
        let mut sched = Scheduler::new();
        let a = sched.enqueue(1, 0, 2);
        let b = sched.enqueue(2, 0, 2);
        sched.cancel(a);
        sched.cancel(b);
        assert!(sched.dequeue().is_none());
        assert!(sched.is_empty());
    }

    #[test]
    fn stale_key_never_aliases_recycled_slot() {
        let mut sched = Scheduler::new();
        let old = sched.enqueue("first", 0, 1);
        sched.dequeue();
        sched.reset();
        let new = sched.enqueue("second", 0, 1);

        assert_eq!(old.index(), new.index());
        assert_eq!(sched.get_weight(old), None);
        assert!(!sched.set_weight(old, 9));
        assert_eq!(sched.get_weight(new), Some(1));
        assert_eq!(sched.payload(new), Some(&"second"));
    }

    #[test]
    fn key_space_bounded_by_peak_live_slots() {
        let mut sched = Scheduler::new();
        for i in 0..100 {
            sched.enqueue(i, 0, 1);
            sched.dequeue();
            sched.reset();
        }
        assert_eq!(sched.key_space(), 1);
    }

    #[test]
    fn unknown_key_is_silent() {
        let mut other = Scheduler::new();
        let foreign: SlotKey = other.enqueue((), 0, 1);
        let mut sched: Scheduler<()> = Scheduler::new();
        assert_eq!(sched.get_weight(foreign), None);
        assert!(!sched.set_weight(foreign, 3));
    }
}

// ── Seeded interleavings ──────────────────────────────────────────────────────

#[cfg(test)]
mod interleavings {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    /// Random enqueue / extend / cancel traffic between passes.  Every pass
    /// must visit exactly the slots that were live when it started, in scan
    /// order, with non-increasing priority.
    #[test]
    fn every_pass_visits_live_slots_once_in_priority_order() {
        for seed in 0..20u64 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut sched: Scheduler<i32> = Scheduler::new();
            let mut keys: Vec<SlotKey> = Vec::new();

            for _round in 0..200 {
                for _ in 0..rng.gen_range(0..4) {
                    let priority = rng.gen_range(-2..4);
                    let weight = rng.gen_range(1..5);
                    keys.push(sched.enqueue(priority, priority, weight));
                }
                if !keys.is_empty() && rng.gen_bool(0.3) {
                    let k = keys[rng.gen_range(0..keys.len())];
                    sched.cancel(k);
                }
                if !keys.is_empty() && rng.gen_bool(0.3) {
                    let k = keys[rng.gen_range(0..keys.len())];
                    if let Some(w) = sched.get_weight(k).filter(|&w| w > 0) {
                        sched.set_weight(k, w + 1);
                    }
                }

                let expected: Vec<SlotKey> = sched
                    .iter()
                    .filter(|(_, _, w)| *w > 0)
                    .map(|(k, _, _)| k)
                    .collect();

                let mut visited = Vec::new();
                let mut priorities = Vec::new();
                while let Some(d) = sched.next_in_pass() {
                    visited.push(d.key);
                    priorities.push(d.payload);
                }
                sched.reset();

                assert_eq!(visited, expected, "seed {seed}");
                assert!(
                    priorities.windows(2).all(|w| w[0] >= w[1]),
                    "seed {seed}: priorities out of order: {priorities:?}"
                );
                assert_eq!(sched.slot_count(), sched.len(), "cancelled slots retired by pass end");
                keys.retain(|k| sched.contains(*k));
            }
        }
    }

    /// Same traffic, drained the plain way: `len()` calls to `dequeue` per
    /// pass, then `reset`.
    #[test]
    fn dequeue_len_times_visits_live_slots_once() {
        for seed in 0..20u64 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut sched: Scheduler<i32> = Scheduler::new();
            let mut keys: Vec<SlotKey> = Vec::new();

            for _round in 0..200 {
                for _ in 0..rng.gen_range(0..4) {
                    let priority = rng.gen_range(-2..4);
                    keys.push(sched.enqueue(priority, priority, rng.gen_range(1..5)));
                }
                if !keys.is_empty() && rng.gen_bool(0.4) {
                    let k = keys[rng.gen_range(0..keys.len())];
                    sched.cancel(k);
                }

                let expected: Vec<SlotKey> = sched
                    .iter()
                    .filter(|(_, _, w)| *w > 0)
                    .map(|(k, _, _)| k)
                    .collect();
                assert_eq!(sched.len(), expected.len(), "seed {seed}");

                let visited: Vec<SlotKey> = (0..sched.len())
                    .filter_map(|_| sched.dequeue())
                    .map(|d| d.key)
                    .collect();
                sched.reset();

                assert_eq!(visited, expected, "seed {seed}");
                keys.retain(|k| sched.contains(*k));
            }
        }
    }
}
