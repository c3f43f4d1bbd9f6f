// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty set: keys awaiting a redraw.

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashSet;

/// Insertion-ordered set of dirty keys with generation tracking.
///
/// Keys are reported in the order they were first marked, so a redraw batch
/// lists the entity that started an update before the entities it reached.
/// The generation counter increments on every mutation and can be used to
/// detect whether anything changed since a previous observation.
///
/// # Example
///
/// ```
/// use tangle_dirty::DirtySet;
///
/// let mut dirty = DirtySet::<u32>::new();
/// assert!(dirty.mark(3));
/// assert!(dirty.mark(1));
/// assert!(!dirty.mark(3));
///
/// assert!(dirty.is_dirty(1));
/// assert_eq!(dirty.len(), 2);
///
/// let order: Vec<_> = dirty.drain().collect();
/// assert_eq!(order, [3, 1]);
/// assert!(dirty.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct DirtySet<K>
where
    K: Copy + Eq + Hash,
{
    order: Vec<K>,
    members: HashSet<K>,
    /// Generation counter, incremented on each mutation.
    generation: u64,
}

impl<K> Default for DirtySet<K>
where
    K: Copy + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> DirtySet<K>
where
    K: Copy + Eq + Hash,
{
    /// Creates a new empty dirty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            members: HashSet::new(),
            generation: 0,
        }
    }

    /// Returns the current generation.
    ///
    /// The generation is incremented on every mutation (mark, remove, clear,
    /// drain).
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Marks a key as dirty.
    ///
    /// Returns `true` if the key was newly inserted, `false` if it was already dirty.
    pub fn mark(&mut self, key: K) -> bool {
        self.generation = self.generation.wrapping_add(1);
        if self.members.insert(key) {
            self.order.push(key);
            true
        } else {
            false
        }
    }

    /// Returns `true` if the key is dirty.
    #[must_use]
    pub fn is_dirty(&self, key: K) -> bool {
        self.members.contains(&key)
    }

    /// Returns `true` if nothing is dirty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the number of dirty keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Iterates over the dirty keys in marking order without clearing them.
    pub fn iter(&self) -> impl Iterator<Item = K> + '_ {
        self.order.iter().copied()
    }

    /// Unmarks `key`, for example because its owner was destroyed.
    ///
    /// Returns `true` if the key was dirty.
    pub fn remove_key(&mut self, key: K) -> bool {
        self.generation = self.generation.wrapping_add(1);
        if self.members.remove(&key) {
            self.order.retain(|&k| k != key);
            true
        } else {
            false
        }
    }

    /// Clears all dirty keys.
    pub fn clear(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.order.clear();
        self.members.clear();
    }

    /// Drains all dirty keys in marking order.
    pub fn drain(&mut self) -> impl Iterator<Item = K> + '_ {
        self.generation = self.generation.wrapping_add(1);
        self.members.clear();
        self.order.drain(..)
    }
}
