//! Coalescing of rapid control changes.
//!
//! A knob dragged across a frame may report dozens of values. Only the last
//! one matters, and only once per tick. [`Coalescer`] keeps one pending value
//! per key; `drain` hands each staged key out exactly once, in the order it
//! was first staged.

use std::{collections::HashMap, hash::Hash};

#[derive(Debug, Clone)]
pub struct Coalescer<K, V> {
    pending: HashMap<K, V>,
    /// Keys in first-staged order, for deterministic commits.
    order: Vec<K>,
}

impl<K, V> Default for Coalescer<K, V> {
    fn default() -> Self {
        Self {
            pending: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Clone, V> Coalescer<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `value` for `key`, replacing anything staged before.
    pub fn stage(&mut self, key: K, value: V) {
        if self.pending.insert(key.clone(), value).is_none() {
            self.order.push(key);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Take every staged value, each key once.
    pub fn drain(&mut self) -> Vec<(K, V)> {
        std::mem::take(&mut self.order)
            .into_iter()
            .filter_map(|key| self.pending.remove(&key).map(|value| (key, value)))
            .collect()
    }
}
