// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dependency table: `(source, property) → (target, slot)` edges.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;

use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;

/// What an edge writes on its target.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Assign the source value to this property of the target.
    Property(String),
    /// Invoke a zero-argument recomputation on the target.
    Recompute(String),
}

impl Slot {
    /// Shorthand for [`Slot::Property`].
    pub fn property(name: impl Into<String>) -> Self {
        Self::Property(name.into())
    }

    /// Shorthand for [`Slot::Recompute`].
    pub fn recompute(name: impl Into<String>) -> Self {
        Self::Recompute(name.into())
    }

    /// The property or method name this slot refers to.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Property(name) | Self::Recompute(name) => name,
        }
    }

    /// Returns `true` for [`Slot::Recompute`].
    #[must_use]
    pub fn is_recompute(&self) -> bool {
        matches!(self, Self::Recompute(_))
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property(name) => f.write_str(name),
            Self::Recompute(name) => write!(f, "{name}()"),
        }
    }
}

/// One registered edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge<K> {
    /// The key that owns the source property.
    pub source: K,
    /// The source property whose change fires this edge.
    pub property: String,
    /// The key that receives the value or recomputation.
    pub target: K,
    /// What is written on `target`.
    pub slot: Slot,
}

/// Error returned when a cycle would be created by adding a dependency.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("adding dependency {from:?}.{property} -> {to:?}.{slot} would create a cycle")]
pub struct CycleError<K: fmt::Debug> {
    /// The key whose property would drive another.
    pub from: K,
    /// The driving property.
    pub property: String,
    /// The key that would be driven.
    pub to: K,
    /// The driven slot.
    pub slot: Slot,
}

/// How to handle cycle detection when adding dependencies.
///
/// A table carries one policy, fixed by
/// [`with_cycle_handling`](DependencyTable::with_cycle_handling) and applied
/// by [`add`](DependencyTable::add). [`add_dependency`](DependencyTable::add_dependency)
/// takes a policy per call for owners that mix them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum CycleHandling {
    /// Panic in debug builds, silently ignore in release builds.
    #[default]
    DebugAssert,
    /// Return an error if a cycle would be created.
    Error,
    /// Silently ignore the dependency if it would create a cycle.
    Ignore,
    /// Allow cycles (skip cycle detection entirely).
    ///
    /// Whoever walks the table is then responsible for bounding recursion.
    Allow,
}

/// Per-key lists of property edges, kept in registration order.
///
/// Edges are stored under their source key. Firing is keyed strictly by the
/// property that changed: [`edges_from`](Self::edges_from) only yields edges
/// registered for that property, in the order they were added, even when the
/// same source registered edges for several properties interleaved.
///
/// # Example
///
/// ```
/// use tangle_dirty::{CycleHandling, DependencyTable, Slot};
///
/// let mut table = DependencyTable::<u32>::new();
/// table.add_dependency(1, "width", 2, Slot::property("width"), CycleHandling::Error).unwrap();
/// table.add_dependency(1, "height", 2, Slot::property("height"), CycleHandling::Error).unwrap();
/// table.add_dependency(1, "width", 3, Slot::recompute("layout"), CycleHandling::Error).unwrap();
///
/// let slots: Vec<_> = table
///     .edges_from(1, "width")
///     .map(|e| (e.target, e.slot.to_string()))
///     .collect();
/// assert_eq!(slots, [(2, "width".to_string()), (3, "layout()".to_string())]);
/// assert!(table.depends_on(3, 1));
/// ```
#[derive(Debug, Clone)]
pub struct DependencyTable<K>
where
    K: Copy + Eq + Hash + fmt::Debug,
{
    /// Edges keyed by source, in registration order.
    forward: HashMap<K, SmallVec<[Edge<K>; 4]>>,
    /// Source keys per target, one entry per edge.
    reverse: HashMap<K, SmallVec<[K; 4]>>,
    handling: CycleHandling,
    edge_count: usize,
}

impl<K> Default for DependencyTable<K>
where
    K: Copy + Eq + Hash + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> DependencyTable<K>
where
    K: Copy + Eq + Hash + fmt::Debug,
{
    /// Creates an empty table with [`CycleHandling::DebugAssert`] as the
    /// default policy for [`add`](Self::add).
    #[must_use]
    pub fn new() -> Self {
        Self::with_cycle_handling(CycleHandling::default())
    }

    /// Creates an empty table whose [`add`](Self::add) uses `handling`.
    #[must_use]
    pub fn with_cycle_handling(handling: CycleHandling) -> Self {
        Self {
            forward: HashMap::new(),
            reverse: HashMap::new(),
            handling,
            edge_count: 0,
        }
    }

    /// The policy used by [`add`](Self::add).
    #[must_use]
    pub fn cycle_handling(&self) -> CycleHandling {
        self.handling
    }

    /// Number of registered edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edge_count
    }

    /// Returns `true` if no edges are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edge_count == 0
    }

    /// Adds an edge using the table's own cycle policy.
    pub fn add(
        &mut self,
        source: K,
        property: &str,
        target: K,
        slot: Slot,
    ) -> Result<bool, CycleError<K>> {
        self.add_dependency(source, property, target, slot, self.handling)
    }

    /// Adds an edge: when `property` of `source` changes, write `slot` on
    /// `target`.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the edge was newly added.
    /// - `Ok(false)` if the edge already existed, or a cycle was ignored.
    /// - `Err(CycleError)` if a cycle would be created and `handling` is `Error`.
    pub fn add_dependency(
        &mut self,
        source: K,
        property: &str,
        target: K,
        slot: Slot,
        handling: CycleHandling,
    ) -> Result<bool, CycleError<K>> {
        if self.contains(source, property, target, &slot) {
            return Ok(false);
        }

        if handling != CycleHandling::Allow
            && self.would_create_cycle(source, property, target, slot.name())
        {
            return match handling {
                CycleHandling::DebugAssert => {
                    debug_assert!(false, "adding dependency would create a cycle");
                    Ok(false)
                }
                CycleHandling::Error => Err(CycleError {
                    from: source,
                    property: property.into(),
                    to: target,
                    slot,
                }),
                CycleHandling::Ignore | CycleHandling::Allow => Ok(false),
            };
        }

        self.forward.entry(source).or_default().push(Edge {
            source,
            property: property.into(),
            target,
            slot,
        });
        self.reverse.entry(target).or_default().push(source);
        self.edge_count += 1;
        Ok(true)
    }

    /// Returns `true` if this exact edge is registered.
    #[must_use]
    pub fn contains(&self, source: K, property: &str, target: K, slot: &Slot) -> bool {
        self.forward.get(&source).is_some_and(|edges| {
            edges
                .iter()
                .any(|e| e.property == property && e.target == target && &e.slot == slot)
        })
    }

    /// Checks whether `(source, property)` is reachable from `(target, name)`.
    fn would_create_cycle(&self, source: K, property: &str, target: K, name: &str) -> bool {
        let mut visited: HashSet<(K, &str)> = HashSet::new();
        let mut stack: Vec<(K, &str)> = Vec::new();
        stack.push((target, name));

        while let Some((key, prop)) = stack.pop() {
            if key == source && prop == property {
                return true;
            }
            if !visited.insert((key, prop)) {
                continue;
            }
            if let Some(edges) = self.forward.get(&key) {
                stack.extend(
                    edges
                        .iter()
                        .filter(|e| e.property == prop)
                        .map(|e| (e.target, e.slot.name())),
                );
            }
        }

        false
    }

    /// Removes one edge. Returns `true` if it existed.
    pub fn remove_dependency(&mut self, source: K, property: &str, target: K, slot: &Slot) -> bool {
        let Some(edges) = self.forward.get_mut(&source) else {
            return false;
        };
        let Some(pos) = edges
            .iter()
            .position(|e| e.property == property && e.target == target && &e.slot == slot)
        else {
            return false;
        };
        // Plain `remove` keeps the remaining edges in registration order.
        edges.remove(pos);
        if edges.is_empty() {
            self.forward.remove(&source);
        }
        if let Some(sources) = self.reverse.get_mut(&target) {
            if let Some(pos) = sources.iter().position(|&k| k == source) {
                sources.remove(pos);
            }
            if sources.is_empty() {
                self.reverse.remove(&target);
            }
        }
        self.edge_count -= 1;
        true
    }

    /// Removes every edge that starts or ends at `key`.
    ///
    /// Returns the number of edges removed.
    pub fn remove_key(&mut self, key: K) -> usize {
        let mut removed = 0;

        if let Some(edges) = self.forward.remove(&key) {
            for edge in &edges {
                if let Some(sources) = self.reverse.get_mut(&edge.target)
                    && let Some(pos) = sources.iter().position(|&k| k == key)
                {
                    sources.remove(pos);
                    if sources.is_empty() {
                        self.reverse.remove(&edge.target);
                    }
                }
            }
            removed += edges.len();
        }

        if let Some(sources) = self.reverse.remove(&key) {
            let mut seen: SmallVec<[K; 4]> = SmallVec::new();
            for source in sources {
                if seen.contains(&source) {
                    continue;
                }
                seen.push(source);
                if let Some(edges) = self.forward.get_mut(&source) {
                    let before = edges.len();
                    edges.retain(|e| e.target != key);
                    removed += before - edges.len();
                    if edges.is_empty() {
                        self.forward.remove(&source);
                    }
                }
            }
        }

        self.edge_count -= removed;
        removed
    }

    /// Edges fired by a change of `property` on `source`, in registration order.
    pub fn edges_from<'a>(
        &'a self,
        source: K,
        property: &'a str,
    ) -> impl Iterator<Item = &'a Edge<K>> + 'a {
        self.edges_of(source)
            .iter()
            .filter(move |e| e.property == property)
    }

    /// All edges registered by `source`, in registration order.
    #[must_use]
    pub fn edges_of(&self, source: K) -> &[Edge<K>] {
        self.forward
            .get(&source)
            .map(|edges| edges.as_slice())
            .unwrap_or(&[])
    }

    /// Returns `true` if a change of `property` on `source` fires anything.
    #[must_use]
    pub fn has_edges_from(&self, source: K, property: &str) -> bool {
        self.edges_from(source, property).next().is_some()
    }

    /// Keys directly driven by `source`, without duplicates.
    pub fn dependents(&self, source: K) -> impl Iterator<Item = K> + '_ {
        let mut seen: SmallVec<[K; 8]> = SmallVec::new();
        for edge in self.edges_of(source) {
            if !seen.contains(&edge.target) {
                seen.push(edge.target);
            }
        }
        seen.into_iter()
    }

    /// Keys that directly drive `target`, without duplicates.
    pub fn dependencies(&self, target: K) -> impl Iterator<Item = K> + '_ {
        let mut seen: SmallVec<[K; 8]> = SmallVec::new();
        if let Some(sources) = self.reverse.get(&target) {
            for &source in sources {
                if !seen.contains(&source) {
                    seen.push(source);
                }
            }
        }
        seen.into_iter()
    }

    /// All keys reachable from `source`, excluding `source` itself.
    ///
    /// Keys are yielded in breadth-first order.
    #[must_use]
    pub fn transitive_dependents(&self, source: K) -> Vec<K> {
        let mut visited: HashSet<K> = HashSet::new();
        visited.insert(source);
        let mut out = Vec::new();
        let mut cursor = 0;
        out.extend(self.dependents(source));
        for &k in &out {
            visited.insert(k);
        }
        while cursor < out.len() {
            let current = out[cursor];
            cursor += 1;
            for next in self.dependents(current) {
                if visited.insert(next) {
                    out.push(next);
                }
            }
        }
        out
    }

    /// Returns `true` if `target` is (transitively) driven by `source`.
    #[must_use]
    pub fn depends_on(&self, target: K, source: K) -> bool {
        target != source && self.transitive_dependents(source).contains(&target)
    }

    /// Iterates over every key that owns at least one edge.
    pub fn sources(&self) -> impl Iterator<Item = K> + '_ {
        self.forward.keys().copied()
    }

    /// Removes all edges.
    pub fn clear(&mut self) {
        self.forward.clear();
        self.reverse.clear();
        self.edge_count = 0;
    }
}
