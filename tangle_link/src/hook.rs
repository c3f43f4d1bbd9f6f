// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Outlet and inlet declarations, and their per-instance hooks.

use core::fmt;

use kurbo::Point;
use smallvec::SmallVec;
use tangle_property::ValueKind;

use crate::link::LinkId;

/// Which way values flow through a hook.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Writable from outside: a link drives the property.
    Inlet,
    /// Readable from outside: the property drives links.
    Outlet,
}

impl Direction {
    /// The direction a link partner must have.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Inlet => Self::Outlet,
            Self::Outlet => Self::Inlet,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Inlet => "inlet",
            Self::Outlet => "outlet",
        })
    }
}

/// One declared endpoint. Its name is the property it reads or writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HookDecl {
    /// Property name.
    pub name: String,
    /// Value type accepted or produced.
    pub kind: ValueKind,
}

/// The outlets and inlets a widget class exposes.
///
/// # Example
///
/// ```
/// use tangle_link::{Direction, HookSet};
/// use tangle_property::ValueKind;
///
/// let value_box = HookSet::new()
///     .inlet("value", ValueKind::Number)
///     .outlet("value", ValueKind::Number);
/// let operator = HookSet::new()
///     .inlet("operand1", ValueKind::Number)
///     .inlet("operand2", ValueKind::Number)
///     .outlet("result", ValueKind::Number)
///     .inherit(&value_box);
///
/// let inlets: Vec<_> = operator.inlets().iter().map(|d| d.name.as_str()).collect();
/// assert_eq!(inlets, ["value", "operand1", "operand2"]);
/// assert!(operator.get(Direction::Outlet, "result").is_some());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HookSet {
    inlets: Vec<HookDecl>,
    outlets: Vec<HookDecl>,
}

impl HookSet {
    /// An empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an inlet, replacing an existing inlet of the same name.
    #[must_use]
    pub fn inlet(self, name: impl Into<String>, kind: ValueKind) -> Self {
        self.declare(Direction::Inlet, name, kind)
    }

    /// Declares an outlet, replacing an existing outlet of the same name.
    #[must_use]
    pub fn outlet(self, name: impl Into<String>, kind: ValueKind) -> Self {
        self.declare(Direction::Outlet, name, kind)
    }

    /// Declares a hook.
    #[must_use]
    pub fn declare(mut self, direction: Direction, name: impl Into<String>, kind: ValueKind) -> Self {
        let decl = HookDecl {
            name: name.into(),
            kind,
        };
        let list = self.list_mut(direction);
        if let Some(existing) = list.iter_mut().find(|d| d.name == decl.name) {
            *existing = decl;
        } else {
            list.push(decl);
        }
        self
    }

    /// This set layered on top of `parent`: parent hooks come first, in their
    /// order, and hooks declared here replace parent hooks of the same name.
    #[must_use]
    pub fn inherit(self, parent: &Self) -> Self {
        let mut merged = parent.clone();
        for decl in self.inlets {
            merged = merged.declare(Direction::Inlet, decl.name, decl.kind);
        }
        for decl in self.outlets {
            merged = merged.declare(Direction::Outlet, decl.name, decl.kind);
        }
        merged
    }

    /// Declared inlets, in order.
    #[must_use]
    pub fn inlets(&self) -> &[HookDecl] {
        &self.inlets
    }

    /// Declared outlets, in order.
    #[must_use]
    pub fn outlets(&self) -> &[HookDecl] {
        &self.outlets
    }

    /// Hooks of one direction.
    #[must_use]
    pub fn list(&self, direction: Direction) -> &[HookDecl] {
        match direction {
            Direction::Inlet => &self.inlets,
            Direction::Outlet => &self.outlets,
        }
    }

    /// Looks up a hook by direction and name.
    #[must_use]
    pub fn get(&self, direction: Direction, name: &str) -> Option<&HookDecl> {
        self.list(direction).iter().find(|d| d.name == name)
    }

    /// Returns `true` if nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inlets.is_empty() && self.outlets.is_empty()
    }

    fn list_mut(&mut self, direction: Direction) -> &mut Vec<HookDecl> {
        match direction {
            Direction::Inlet => &mut self.inlets,
            Direction::Outlet => &mut self.outlets,
        }
    }
}

/// Identifies one hook of one widget.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HookAddr<K> {
    /// The widget exposing the hook.
    pub owner: K,
    /// Inlet or outlet.
    pub direction: Direction,
    /// Property name.
    pub name: String,
}

impl<K> HookAddr<K> {
    /// Address of an inlet.
    pub fn inlet(owner: K, name: impl Into<String>) -> Self {
        Self {
            owner,
            direction: Direction::Inlet,
            name: name.into(),
        }
    }

    /// Address of an outlet.
    pub fn outlet(owner: K, name: impl Into<String>) -> Self {
        Self {
            owner,
            direction: Direction::Outlet,
            name: name.into(),
        }
    }
}

impl<K: fmt::Debug> fmt::Display for HookAddr<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}.{} ({})", self.owner, self.name, self.direction)
    }
}

/// A positioned, stateful hook of one widget instance.
#[derive(Clone, Debug, PartialEq)]
pub struct Hook<K> {
    /// Which hook this is.
    pub addr: HookAddr<K>,
    /// Declared value type.
    pub kind: ValueKind,
    /// Position within its row.
    pub index: usize,
    /// Position in link-map coordinates.
    pub position: Point,
    /// Attached links. An inlet holds at most one.
    pub links: SmallVec<[LinkId; 2]>,
}

impl<K> Hook<K> {
    /// Returns `true` if an inlet already has its link.
    #[must_use]
    pub fn is_occupied(&self) -> bool {
        self.addr.direction == Direction::Inlet && !self.links.is_empty()
    }
}
