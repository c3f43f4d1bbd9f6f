// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Links between an outlet and an inlet.

use core::fmt;

use kurbo::Point;

use crate::error::LinkError;
use crate::hook::{Direction, HookAddr};

/// Identifies a link within one link map.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinkId(pub(crate) u32);

impl LinkId {
    /// Raw value, stable for the lifetime of the map.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "link#{}", self.0)
    }
}

/// Lifecycle of a link.
///
/// ```text
/// Dragging ──release on compatible hook──▶ Attached ──dragged away / endpoint removed──▶ Detached
///     └──────────release elsewhere───────────────────────────────────────────────────▶ Detached
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LinkState {
    /// One end follows the pointer. No widget state changes.
    Dragging,
    /// Both ends sit on hooks; values flow from outlet to inlet.
    Attached,
    /// Terminal.
    Detached,
}

/// A connection between one widget's outlet and another widget's inlet.
///
/// While dragging, exactly one of [`source`](Self::source) and
/// [`target`](Self::target) is set: the end anchored at the hook the drag
/// started from. The other end is a free bullet.
#[derive(Clone, Debug, PartialEq)]
pub struct DependencyLink<K> {
    id: LinkId,
    state: LinkState,
    source: Option<HookAddr<K>>,
    target: Option<HookAddr<K>>,
    /// Bullet at the outlet end.
    pub start_bullet: Point,
    /// Bullet at the inlet end.
    pub end_bullet: Point,
}

impl<K: Clone> DependencyLink<K> {
    /// A new link being dragged out of `origin`, which sits at `at`.
    pub(crate) fn dragging(id: LinkId, origin: HookAddr<K>, at: Point) -> Self {
        let (source, target) = match origin.direction {
            Direction::Outlet => (Some(origin), None),
            Direction::Inlet => (None, Some(origin)),
        };
        Self {
            id,
            state: LinkState::Dragging,
            source,
            target,
            start_bullet: at,
            end_bullet: at,
        }
    }

    /// A link attached straight away.
    pub(crate) fn attached(
        id: LinkId,
        source: HookAddr<K>,
        target: HookAddr<K>,
        start: Point,
        end: Point,
    ) -> Self {
        Self {
            id,
            state: LinkState::Attached,
            source: Some(source),
            target: Some(target),
            start_bullet: start,
            end_bullet: end,
        }
    }

    /// This link's id.
    #[must_use]
    pub fn id(&self) -> LinkId {
        self.id
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// The outlet end, once known.
    #[must_use]
    pub fn source(&self) -> Option<&HookAddr<K>> {
        self.source.as_ref()
    }

    /// The inlet end, once known.
    #[must_use]
    pub fn target(&self) -> Option<&HookAddr<K>> {
        self.target.as_ref()
    }

    /// The hook a dragging link is anchored at.
    #[must_use]
    pub fn origin(&self) -> Option<&HookAddr<K>> {
        match (&self.source, &self.target) {
            (Some(source), None) => Some(source),
            (None, Some(target)) => Some(target),
            _ => None,
        }
    }

    /// Which end follows the pointer while dragging.
    #[must_use]
    pub fn free_end(&self) -> Option<Direction> {
        self.origin().map(|o| o.direction.opposite())
    }

    /// Position of the free bullet while dragging.
    #[must_use]
    pub fn free_bullet(&self) -> Option<Point> {
        self.free_end().map(|end| self.bullet(end))
    }

    /// Position of the bullet at the `end` side.
    #[must_use]
    pub fn bullet(&self, end: Direction) -> Point {
        match end {
            Direction::Outlet => self.start_bullet,
            Direction::Inlet => self.end_bullet,
        }
    }

    pub(crate) fn set_bullet(&mut self, end: Direction, at: Point) {
        match end {
            Direction::Outlet => self.start_bullet = at,
            Direction::Inlet => self.end_bullet = at,
        }
    }

    /// Both ends, for an attached link.
    #[must_use]
    pub fn ends(&self) -> Option<LinkEnds<K>> {
        Some(LinkEnds {
            id: self.id,
            source: self.source.clone()?,
            target: self.target.clone()?,
        })
    }

    /// `Dragging → Attached`, closing the free end on `hook`.
    pub(crate) fn attach(&mut self, hook: HookAddr<K>, at: Point) -> Result<(), LinkError<K>>
    where
        K: fmt::Debug,
    {
        if self.state != LinkState::Dragging {
            return Err(LinkError::InvalidTransition {
                link: self.id,
                from: self.state,
                to: LinkState::Attached,
            });
        }
        self.set_bullet(hook.direction, at);
        match hook.direction {
            Direction::Outlet => self.source = Some(hook),
            Direction::Inlet => self.target = Some(hook),
        }
        self.state = LinkState::Attached;
        Ok(())
    }

    /// Any state → `Detached`.
    pub(crate) fn detach(&mut self) {
        self.state = LinkState::Detached;
    }
}

/// The two ends of an attached link.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LinkEnds<K> {
    /// The link.
    pub id: LinkId,
    /// The outlet that drives it.
    pub source: HookAddr<K>,
    /// The inlet it drives.
    pub target: HookAddr<K>,
}
