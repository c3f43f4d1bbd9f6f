// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tangle Dirty: internal dependency edges and redraw tracking.
//!
//! This crate provides the bookkeeping half of a small dataflow engine where
//! one property of an object drives a property (or a recomputation) of the
//! same or another object. It models propagation as a combination of:
//!
//! - **Dependency tables** ([`DependencyTable`]): edges of the form
//!   `(source, property) → (target, slot)`, kept in registration order, with
//!   configurable cycle handling at registration time.
//! - **Slots** ([`Slot`]): what an edge writes on its target, either a plain
//!   property or a zero-argument recomputation.
//! - **Dirty sets** ([`DirtySet`]): insertion-ordered keys that need a redraw,
//!   with a generation counter, drained once per top-level update.
//! - **Fire traces** ([`FireTrace`], [`FireLog`]): optional recording of which
//!   edges fired, for diagnostics and tests.
//!
//! The crate does not execute propagation itself; it only answers "which
//! edges leave this property" and "is this registration safe". The engine
//! that owns the objects walks the table.
//!
//! ## Quick Start
//!
//! ```rust
//! use tangle_dirty::{CycleHandling, DependencyTable, DirtySet, Slot};
//!
//! // A container (1) drives the width of its child rectangle (2), and the
//! // rectangle's width drives a recomputation of its outline.
//! let mut table = DependencyTable::<u32>::new();
//! table
//!     .add_dependency(1, "width", 2, Slot::property("width"), CycleHandling::Error)
//!     .unwrap();
//! table
//!     .add_dependency(2, "width", 2, Slot::recompute("outline"), CycleHandling::Error)
//!     .unwrap();
//!
//! let fired: Vec<_> = table.edges_from(1, "width").map(|e| e.target).collect();
//! assert_eq!(fired, [2]);
//!
//! // The reverse edge would close a loop and is refused.
//! assert!(
//!     table
//!         .add_dependency(2, "width", 1, Slot::property("width"), CycleHandling::Error)
//!         .is_err()
//! );
//!
//! // Entities touched by an update are collected once, in order.
//! let mut redraw = DirtySet::<u32>::new();
//! redraw.mark(2);
//! redraw.mark(1);
//! redraw.mark(2);
//! assert_eq!(redraw.drain().collect::<Vec<_>>(), [2, 1]);
//! ```
//!
//! ## Cycle Detection
//!
//! [`DependencyTable::add_dependency`] supports configurable cycle handling via
//! [`CycleHandling`]:
//!
//! - `DebugAssert` (default): Panics in debug builds, ignores in release.
//! - `Error`: Returns `Err(CycleError)` if a cycle would be created.
//! - `Ignore`: Silently ignores the dependency.
//! - `Allow`: Skips cycle detection entirely.
//!
//! The check works on `(key, property)` nodes. A recomputation slot named
//! `q` is treated as the node `(target, q)`, so loops that run through a
//! recomputation writing some other property are not visible here and must
//! be bounded by the engine at run time.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod set;
mod table;
mod trace;

pub use set::DirtySet;
pub use table::{CycleError, CycleHandling, DependencyTable, Edge, Slot};
pub use trace::{FireLog, FireRecord, FireTrace};
