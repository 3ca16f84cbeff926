//! Batch index
//!
//! Maps keys to their bound slots. Iteration runs in *descending* key order:
//! in a store that grows by appending at increasing ids, writing the highest
//! id first lets the store extend once instead of once per new record.

use std::collections::btree_map::{self, BTreeMap, Entry};
use std::iter::Rev;

use crate::access::proxy::ProxySlot;

/// Descending-order drain over the slots of a batch.
pub type Drain<K, R, A> = Rev<btree_map::IntoValues<K, Box<ProxySlot<K, R, A>>>>;

/// Ordered index of the slots bound in the current batch.
pub struct BatchIndex<K, R, A> {
    slots: BTreeMap<K, Box<ProxySlot<K, R, A>>>,
}

impl<K: Ord, R, A> BatchIndex<K, R, A> {
    /// Create an empty index
    pub fn new() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }

    /// Number of bound slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the batch is empty
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Check if a key is bound
    pub fn contains(&self, key: &K) -> bool {
        self.slots.contains_key(key)
    }

    /// Look up the slot bound to `key`
    pub fn get(&self, key: &K) -> Option<&ProxySlot<K, R, A>> {
        self.slots.get(key).map(|slot| &**slot)
    }

    /// Look up the slot bound to `key` for mutation
    pub fn get_mut(&mut self, key: &K) -> Option<&mut ProxySlot<K, R, A>> {
        self.slots.get_mut(key).map(|slot| &mut **slot)
    }

    /// Insert a slot for a key that is not yet bound.
    ///
    /// # Panics
    /// Panics if `key` is already present; callers must check first.
    pub fn insert(&mut self, key: K, slot: Box<ProxySlot<K, R, A>>) -> &mut ProxySlot<K, R, A> {
        match self.slots.entry(key) {
            Entry::Vacant(entry) => &mut **entry.insert(slot),
            Entry::Occupied(_) => panic!("key inserted twice into batch index"),
        }
    }

    /// Iterate bound slots in descending key order
    pub fn iter(&self) -> impl Iterator<Item = &ProxySlot<K, R, A>> + '_ {
        self.slots.values().rev().map(|slot| &**slot)
    }

    /// Iterate bound slots mutably in descending key order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ProxySlot<K, R, A>> + '_ {
        self.slots.values_mut().rev().map(|slot| &mut **slot)
    }

    /// Iterate bound keys in descending order
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.slots.keys().rev()
    }

    /// Remove every slot, yielding them in descending key order
    pub fn drain(&mut self) -> Drain<K, R, A> {
        std::mem::take(&mut self.slots).into_values().rev()
    }
}

impl<K: Ord, R, A> Default for BatchIndex<K, R, A> {
    fn default() -> Self {
        Self::new()
    }
}
