// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Explainability helpers for propagation.
//!
//! The table itself does not remember which edges fired. Engines that walk
//! it can report each firing to a [`FireTrace`] sink; [`FireLog`] is a small
//! recorder that keeps every record in order, which is enough to answer
//! "why did this property change?" in tests and diagnostics.

use alloc::string::String;
use alloc::vec::Vec;

use crate::Slot;

/// One fired edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FireRecord<K> {
    /// The key whose property changed.
    pub source: K,
    /// The property that changed.
    pub property: String,
    /// The key the edge wrote to.
    pub target: K,
    /// What was written.
    pub slot: Slot,
    /// Propagation depth at which the edge fired (1 for the outermost update).
    pub depth: usize,
}

/// A callback sink for propagation tracing.
pub trait FireTrace<K> {
    /// Called right before the edge `(source, property) → (target, slot)` runs.
    fn fired(&mut self, source: K, property: &str, target: K, slot: &Slot, depth: usize);
}

/// Records every fired edge in order.
#[derive(Clone, Debug)]
pub struct FireLog<K> {
    records: Vec<FireRecord<K>>,
}

impl<K> Default for FireLog<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> FireLog<K> {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Recorded firings, oldest first.
    #[must_use]
    pub fn records(&self) -> &[FireRecord<K>] {
        &self.records
    }

    /// Number of recorded firings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if nothing fired.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Forgets all records.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Deepest depth reached by any record.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.records.iter().map(|r| r.depth).max().unwrap_or(0)
    }
}

impl<K: PartialEq> FireLog<K> {
    /// Records whose target is `key`.
    pub fn targeting(&self, key: K) -> impl Iterator<Item = &FireRecord<K>> + '_ {
        self.records.iter().filter(move |r| r.target == key)
    }
}

impl<K: Copy> FireTrace<K> for FireLog<K> {
    fn fired(&mut self, source: K, property: &str, target: K, slot: &Slot, depth: usize) {
        self.records.push(FireRecord {
            source,
            property: property.into(),
            target,
            slot: slot.clone(),
            depth,
        });
    }
}
