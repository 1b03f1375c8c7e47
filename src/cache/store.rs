//! Cache Store Module
//!
//! Key to entry mapping. Capacity and expiration are enforced by the caller.

use std::collections::hash_map;
use std::collections::HashMap;

use crate::cache::CacheEntry;

// == Store ==
/// Raw entry storage with a monotonic access counter.
///
/// Keys are also kept in a dense slab so a random key can be drawn by
/// position in O(1). Each entry records its slab slot.
#[derive(Debug)]
pub struct Store<T> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<T>>,
    /// Every key exactly once, `slots[entry.slot] == key`
    slots: Vec<String>,
    /// Last access tick handed out
    tick: u64,
}

impl<T> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Store<T> {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            slots: Vec::new(),
            tick: 0,
        }
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    // == Lookup ==
    /// Returns the entry for `key`, expired or not.
    pub fn lookup(&self, key: &str) -> Option<&CacheEntry<T>> {
        self.entries.get(key)
    }

    pub fn lookup_mut(&mut self, key: &str) -> Option<&mut CacheEntry<T>> {
        self.entries.get_mut(key)
    }

    /// Key stored at slab position `index`.
    pub fn key_at(&self, index: usize) -> Option<&str> {
        self.slots.get(index).map(String::as_str)
    }

    // == Upsert ==
    /// Inserts a fresh entry or refreshes the existing one in place.
    ///
    /// Returns true if the key was new. Does not enforce capacity.
    pub fn upsert(&mut self, key: String, value: T) -> bool {
        let tick = self.next_tick();
        match self.entries.entry(key) {
            hash_map::Entry::Occupied(mut occupied) => {
                occupied.get_mut().refresh(value, tick);
                false
            }
            hash_map::Entry::Vacant(vacant) => {
                let slot = self.slots.len();
                self.slots.push(vacant.key().clone());
                let entry = vacant.insert(CacheEntry::new(value, tick));
                entry.slot = slot;
                true
            }
        }
    }

    // == Touch ==
    /// Marks `key` as most recently used and returns its entry.
    pub fn touch(&mut self, key: &str) -> Option<&CacheEntry<T>> {
        if !self.entries.contains_key(key) {
            return None;
        }
        let tick = self.next_tick();
        let entry = self.entries.get_mut(key)?;
        entry.touch(tick);
        Some(&*entry)
    }

    // == Remove ==
    /// Removes an entry by key. No-op if absent.
    pub fn remove(&mut self, key: &str) -> Option<CacheEntry<T>> {
        let entry = self.entries.remove(key)?;
        self.slots.swap_remove(entry.slot);
        // The former last key now sits in the vacated slot
        if let Some(moved) = self.slots.get(entry.slot) {
            if let Some(moved_entry) = self.entries.get_mut(moved) {
                moved_entry.slot = entry.slot;
            }
        }
        Some(entry)
    }

    /// Removes every entry.
    pub fn remove_all(&mut self) {
        self.entries.clear();
        self.slots.clear();
    }

    /// Keeps only the entries for which `keep` returns true.
    ///
    /// Returns the number of entries removed.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&str, &CacheEntry<T>) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|key, entry| keep(key, entry));
        let removed = before - self.entries.len();

        if removed > 0 {
            self.slots.clear();
            for (slot, (key, entry)) in self.entries.iter_mut().enumerate() {
                entry.slot = slot;
                self.slots.push(key.clone());
            }
        }
        removed
    }

    // == Live Count ==
    /// Raw entry count, expired entries included.
    pub fn live_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CacheEntry<T>)> {
        self.entries.iter()
    }
}
