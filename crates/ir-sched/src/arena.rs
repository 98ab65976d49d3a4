//! `SlotArena<T>` — generational arena with a LIFO free-list.
//!
//! # Layout
//!
//! ```text
//! entries: [ {gen 0, Some(a)} | {gen 3, None} | {gen 1, Some(c)} ]
//! free:    [ 1 ]
//! ```
//!
//! Removing a value bumps its entry's generation and pushes the index onto
//! `free`.  The next insert pops the most recently freed index, so the key
//! space stays as small as the peak number of simultaneously live values.
//! Every access compares generations, which turns "stale key reused after
//! recycling" into a plain miss instead of silent aliasing.

use crate::SlotKey;

struct Entry<T> {
    generation: u32,
    value:      Option<T>,
}

/// Generational storage backing the scheduler's slots.
pub struct SlotArena<T> {
    entries: Vec<Entry<T>>,
    free:    Vec<u32>,
    len:     usize,
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self { entries: Vec::new(), free: Vec::new(), len: 0 }
    }
}

impl<T> SlotArena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` and return its key.  Reuses the most recently freed
    /// index when one is available.
    pub fn insert(&mut self, value: T) -> SlotKey {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let entry = &mut self.entries[index as usize];
            debug_assert!(entry.value.is_none(), "free-list index {index} is occupied");
            entry.value = Some(value);
            return SlotKey { index, generation: entry.generation };
        }
        let index = u32::try_from(self.entries.len())
            .unwrap_or_else(|_| panic!("SlotArena exceeded u32::MAX live slots"));
        self.entries.push(Entry { generation: 0, value: Some(value) });
        SlotKey { index, generation: 0 }
    }

    /// Remove and return the value behind `key`, retiring the key.
    ///
    /// Returns `None` (and changes nothing) if `key` is stale or unknown.
    pub fn remove(&mut self, key: SlotKey) -> Option<T> {
        let entry = self.entries.get_mut(key.index as usize)?;
        if entry.generation != key.generation {
            return None;
        }
        let value = entry.value.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(key.index);
        self.len -= 1;
        Some(value)
    }

    pub fn get(&self, key: SlotKey) -> Option<&T> {
        self.entries
            .get(key.index as usize)
            .filter(|e| e.generation == key.generation)
            .and_then(|e| e.value.as_ref())
    }

    pub fn get_mut(&mut self, key: SlotKey) -> Option<&mut T> {
        self.entries
            .get_mut(key.index as usize)
            .filter(|e| e.generation == key.generation)
            .and_then(|e| e.value.as_mut())
    }

    #[inline]
    pub fn contains(&self, key: SlotKey) -> bool {
        self.get(key).is_some()
    }

    /// Number of live values.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of indices ever minted (live + free).  Bounded by the peak live
    /// count, never by the total number of inserts.
    #[inline]
    pub fn capacity_used(&self) -> usize {
        self.entries.len()
    }
}
