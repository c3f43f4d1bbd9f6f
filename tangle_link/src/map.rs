// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The link map: every hook in a diagram, every attached link, and the one
//! link currently being dragged.
//!
//! The map is driven by discrete pointer events in link-map coordinates and
//! reports what happened as [`LinkEvent`]s. It never touches widget state:
//! locking inlets, pushing values, and notifying widgets is up to whoever
//! consumes the events.

use core::fmt;

use kurbo::Point;
use smallvec::SmallVec;
use tangle_property::ValueKind;

use crate::drag::DragState;
use crate::error::LinkError;
use crate::hook::{Direction, Hook, HookAddr, HookSet};
use crate::layout::{SNAPPING_DISTANCE, close_to, hook_position};
use crate::link::{DependencyLink, LinkEnds, LinkId, LinkState};

/// A state transition of a link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkEvent<K: fmt::Debug> {
    /// `Dragging → Attached`, or a programmatic connect.
    Attached(LinkEnds<K>),
    /// `Attached → Detached`.
    Detached(LinkEnds<K>),
    /// `Dragging → Detached`: released away from any usable hook.
    Discarded {
        /// The hook the drag started from.
        origin: HookAddr<K>,
        /// Why the hook under the pointer was refused, if there was one.
        reason: Option<LinkError<K>>,
    },
}

/// Hooks, attached links, and the drag state machine.
///
/// # Example
///
/// ```
/// use kurbo::Point;
/// use tangle_link::{HookAddr, HookSet, LinkEvent, LinkMap};
/// use tangle_property::ValueKind;
///
/// let mut map = LinkMap::<u32>::new();
/// map.register_hooks(1, &HookSet::new().outlet("value", ValueKind::Number), Point::new(0.0, 0.0), 20.0);
/// map.register_hooks(2, &HookSet::new().inlet("value", ValueKind::Number), Point::new(0.0, 100.0), 20.0);
///
/// let outlet = map.hook(&HookAddr::outlet(1, "value")).unwrap().position;
/// let inlet = map.hook(&HookAddr::inlet(2, "value")).unwrap().position;
///
/// map.pointer_down(outlet);
/// map.pointer_move(Point::new(inlet.x + 3.0, inlet.y - 2.0));
/// let event = map.pointer_up(Point::new(inlet.x + 3.0, inlet.y - 2.0));
///
/// assert!(matches!(event, Some(LinkEvent::Attached(_))));
/// assert_eq!(map.links().count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct LinkMap<K>
where
    K: Copy + Eq + fmt::Debug,
{
    hooks: Vec<Hook<K>>,
    links: Vec<DependencyLink<K>>,
    open: Option<DependencyLink<K>>,
    drag: DragState,
    snapping_distance: f64,
    next_id: u32,
}

impl<K> Default for LinkMap<K>
where
    K: Copy + Eq + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> LinkMap<K>
where
    K: Copy + Eq + fmt::Debug,
{
    /// An empty map with the default snapping distance.
    #[must_use]
    pub fn new() -> Self {
        Self::with_snapping_distance(SNAPPING_DISTANCE)
    }

    /// An empty map that snaps within `distance`.
    #[must_use]
    pub fn with_snapping_distance(distance: f64) -> Self {
        Self {
            hooks: Vec::new(),
            links: Vec::new(),
            open: None,
            drag: DragState::default(),
            snapping_distance: distance,
            next_id: 0,
        }
    }

    /// Snap radius around hooks and bullets.
    #[must_use]
    pub fn snapping_distance(&self) -> f64 {
        self.snapping_distance
    }

    // --- hooks -------------------------------------------------------------

    /// Instantiates the hooks of `set` for `owner`, laid out from its
    /// `anchor` and `height`. Does nothing if `owner` already has hooks.
    pub fn register_hooks(&mut self, owner: K, set: &HookSet, anchor: Point, height: f64) {
        if self.hooks.iter().any(|h| h.addr.owner == owner) {
            return;
        }
        for direction in [Direction::Inlet, Direction::Outlet] {
            for (index, decl) in set.list(direction).iter().enumerate() {
                self.hooks.push(Hook {
                    addr: HookAddr {
                        owner,
                        direction,
                        name: decl.name.clone(),
                    },
                    kind: decl.kind,
                    index,
                    position: hook_position(anchor, height, direction, index),
                    links: SmallVec::new(),
                });
            }
        }
    }

    /// Moves the hooks of `owner` after its anchor or height changed.
    /// Bullets of attached links move with them.
    pub fn relayout(&mut self, owner: K, anchor: Point, height: f64) {
        for hook in self.hooks.iter_mut().filter(|h| h.addr.owner == owner) {
            hook.position = hook_position(anchor, height, hook.addr.direction, hook.index);
        }
        for link in &mut self.links {
            for end in [Direction::Outlet, Direction::Inlet] {
                let addr = match end {
                    Direction::Outlet => link.source(),
                    Direction::Inlet => link.target(),
                };
                let Some(addr) = addr else { continue };
                if addr.owner != owner {
                    continue;
                }
                if let Some(hook) = self.hooks.iter().find(|h| h.addr == *addr) {
                    let at = hook.position;
                    link.set_bullet(end, at);
                }
            }
        }
        if let Some(open) = &mut self.open
            && let Some(origin) = open.origin()
            && origin.owner == owner
            && let Some(hook) = self.hooks.iter().find(|h| h.addr == *origin)
        {
            let (end, at) = (origin.direction, hook.position);
            open.set_bullet(end, at);
        }
    }

    /// Detaches every link touching `owner`, discards a drag started from
    /// it, and forgets its hooks.
    pub fn remove_hooks_of(&mut self, owner: K) -> Vec<LinkEvent<K>> {
        let mut events = Vec::new();
        if self
            .open
            .as_ref()
            .and_then(DependencyLink::origin)
            .is_some_and(|o| o.owner == owner)
            && let Some(event) = self.abort()
        {
            events.push(event);
        }
        let touching: Vec<LinkId> = self.links_of(owner);
        for id in touching {
            if let Some(ends) = self.take_link(id).and_then(|l| l.ends()) {
                tracing::debug!(link = %ends.id, ?owner, "link detached with its widget");
                events.push(LinkEvent::Detached(ends));
            }
        }
        self.hooks.retain(|h| h.addr.owner != owner);
        events
    }

    /// All hooks, in registration order.
    pub fn hooks(&self) -> impl Iterator<Item = &Hook<K>> + '_ {
        self.hooks.iter()
    }

    /// Hooks of one widget.
    pub fn hooks_of(&self, owner: K) -> impl Iterator<Item = &Hook<K>> + '_ {
        self.hooks.iter().filter(move |h| h.addr.owner == owner)
    }

    /// Looks up one hook.
    #[must_use]
    pub fn hook(&self, addr: &HookAddr<K>) -> Option<&Hook<K>> {
        self.hooks.iter().find(|h| h.addr == *addr)
    }

    /// First hook within snapping distance of `p`, inlets before outlets.
    #[must_use]
    pub fn hook_at(&self, p: Point) -> Option<&Hook<K>> {
        let near = |h: &&Hook<K>| close_to(p, h.position, self.snapping_distance);
        self.hooks
            .iter()
            .filter(|h| h.addr.direction == Direction::Inlet)
            .find(near)
            .or_else(|| {
                self.hooks
                    .iter()
                    .filter(|h| h.addr.direction == Direction::Outlet)
                    .find(near)
            })
    }

    /// The attached link whose inlet-side bullet is within snapping distance of `p`.
    #[must_use]
    pub fn bullet_at(&self, p: Point) -> Option<LinkId> {
        self.links
            .iter()
            .find(|l| close_to(p, l.end_bullet, self.snapping_distance))
            .map(DependencyLink::id)
    }

    /// Checks whether `a` and `b` may be linked, in either order.
    ///
    /// On success returns `(outlet, inlet)`.
    pub fn validate(
        &self,
        a: &HookAddr<K>,
        b: &HookAddr<K>,
    ) -> Result<(HookAddr<K>, HookAddr<K>), LinkError<K>> {
        let ha = self
            .hook(a)
            .ok_or_else(|| LinkError::UnknownHook(a.clone()))?;
        let hb = self
            .hook(b)
            .ok_or_else(|| LinkError::UnknownHook(b.clone()))?;
        if a.direction == b.direction {
            return Err(LinkError::SameDirection {
                a: a.clone(),
                b: b.clone(),
            });
        }
        if a.owner == b.owner {
            return Err(LinkError::SameWidget { owner: a.owner });
        }
        let (outlet, inlet) = if a.direction == Direction::Outlet {
            (ha, hb)
        } else {
            (hb, ha)
        };
        if !outlet.kind.accepts(inlet.kind) {
            return Err(LinkError::TypeMismatch {
                outlet: outlet.addr.clone(),
                outlet_kind: outlet.kind,
                inlet: inlet.addr.clone(),
                inlet_kind: inlet.kind,
            });
        }
        if let Some(&link) = inlet.links.first() {
            return Err(LinkError::Occupied {
                inlet: inlet.addr.clone(),
                link,
            });
        }
        Ok((outlet.addr.clone(), inlet.addr.clone()))
    }

    /// Hooks the dragged link could attach to right now.
    #[must_use]
    pub fn compatible_hooks(&self) -> Vec<&Hook<K>> {
        let Some(origin) = self.open.as_ref().and_then(DependencyLink::origin) else {
            return Vec::new();
        };
        self.hooks
            .iter()
            .filter(|h| self.validate(origin, &h.addr).is_ok())
            .collect()
    }

    // --- links -------------------------------------------------------------

    /// All attached links, oldest first.
    pub fn links(&self) -> impl Iterator<Item = &DependencyLink<K>> + '_ {
        self.links.iter()
    }

    /// Looks up an attached link.
    #[must_use]
    pub fn link(&self, id: LinkId) -> Option<&DependencyLink<K>> {
        self.links.iter().find(|l| l.id() == id)
    }

    /// Attached links driven by outlet `name` of `owner`, oldest first.
    #[must_use]
    pub fn links_from(&self, owner: K, name: &str) -> Vec<LinkEnds<K>> {
        self.links
            .iter()
            .filter(|l| l.source().is_some_and(|s| s.owner == owner && s.name == name))
            .filter_map(DependencyLink::ends)
            .collect()
    }

    /// The link driving inlet `name` of `owner`.
    #[must_use]
    pub fn link_into(&self, owner: K, name: &str) -> Option<LinkEnds<K>> {
        self.links
            .iter()
            .find(|l| l.target().is_some_and(|t| t.owner == owner && t.name == name))
            .and_then(DependencyLink::ends)
    }

    /// Ids of attached links with an end on `owner`.
    #[must_use]
    pub fn links_of(&self, owner: K) -> Vec<LinkId> {
        self.links
            .iter()
            .filter(|l| {
                l.source().is_some_and(|s| s.owner == owner)
                    || l.target().is_some_and(|t| t.owner == owner)
            })
            .map(DependencyLink::id)
            .collect()
    }

    /// Attaches `a` and `b` directly, in either order.
    pub fn connect(&mut self, a: &HookAddr<K>, b: &HookAddr<K>) -> Result<LinkEnds<K>, LinkError<K>> {
        let (source, target) = self.validate(a, b)?;
        let id = self.allocate_id();
        let start = self.hook(&source).map_or(Point::ZERO, |h| h.position);
        let end = self.hook(&target).map_or(Point::ZERO, |h| h.position);
        let ends = LinkEnds {
            id,
            source: source.clone(),
            target: target.clone(),
        };
        self.insert_attached(DependencyLink::attached(id, source, target, start, end));
        tracing::debug!(link = %ends.id, source = %ends.source, target = %ends.target, "link connected");
        Ok(ends)
    }

    /// Detaches an attached link.
    pub fn disconnect(&mut self, id: LinkId) -> Result<LinkEnds<K>, LinkError<K>> {
        let ends = self
            .take_link(id)
            .and_then(|l| l.ends())
            .ok_or(LinkError::UnknownLink(id))?;
        tracing::debug!(link = %id, "link disconnected");
        Ok(ends)
    }

    // --- dragging ----------------------------------------------------------

    /// The link being dragged, if any.
    #[must_use]
    pub fn open_link(&self) -> Option<&DependencyLink<K>> {
        self.open.as_ref()
    }

    /// Returns `true` while a link is being dragged.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.open.is_some()
    }

    /// Pointer pressed at `p`.
    ///
    /// On the inlet bullet of an attached link, detaches it and starts
    /// dragging that bullet away from the link's outlet. On any other hook,
    /// starts dragging a new link out of it. Otherwise nothing happens.
    pub fn pointer_down(&mut self, p: Point) -> Vec<LinkEvent<K>> {
        let mut events = Vec::new();
        if let Some(stale) = self.abort() {
            events.push(stale);
        }

        if let Some(id) = self.bullet_at(p) {
            let Some(link) = self.take_link(id) else {
                return events;
            };
            let Some(ends) = link.ends() else {
                return events;
            };
            tracing::debug!(link = %id, "link grabbed by its bullet");
            let bullet = link.end_bullet;
            let anchor = link.start_bullet;
            let mut open = DependencyLink::dragging(self.allocate_id(), ends.source.clone(), anchor);
            open.set_bullet(Direction::Inlet, bullet);
            self.open = Some(open);
            self.drag.start(p, bullet);
            events.push(LinkEvent::Detached(ends));
        } else if let Some(hook) = self.hook_at(p) {
            let origin = hook.addr.clone();
            let at = hook.position;
            tracing::debug!(%origin, "link drag started");
            self.open = Some(DependencyLink::dragging(self.allocate_id(), origin, at));
            self.drag.start(p, at);
        }
        events
    }

    /// Pointer moved to `p` while dragging.
    ///
    /// Moves the free bullet and returns the nearest compatible hook it
    /// snapped to. Releasing on that spot attaches to the same hook.
    pub fn pointer_move(&mut self, p: Point) -> Option<HookAddr<K>> {
        let end = self.open.as_ref()?.free_end()?;
        let origin = self.open.as_ref()?.origin()?.clone();
        let follow = self.drag.follow(p).unwrap_or(p);
        let snapped = self.snap_target(&origin, follow);
        let at = snapped.as_ref().map_or(follow, |(_, at)| *at);
        if let Some(open) = &mut self.open {
            open.set_bullet(end, at);
        }
        snapped.map(|(addr, _)| addr)
    }

    /// Pointer released at `p`.
    ///
    /// Attaches the dragged link if its free bullet is on a hook that accepts
    /// it; otherwise discards it, with the reason when a hook refused it.
    pub fn pointer_up(&mut self, p: Point) -> Option<LinkEvent<K>> {
        self.open.as_ref()?;
        self.pointer_move(p);
        let mut link = self.open.take()?;
        self.drag.end();

        let origin = link.origin()?.clone();
        let free = link.free_bullet()?;

        if let Some((addr, at)) = self.snap_target(&origin, free) {
            if let Err(reason) = link.attach(addr, at) {
                return Some(LinkEvent::Discarded {
                    origin,
                    reason: Some(reason),
                });
            }
            let ends = link.ends()?;
            self.insert_attached(link);
            tracing::debug!(link = %ends.id, source = %ends.source, target = %ends.target, "link attached");
            return Some(LinkEvent::Attached(ends));
        }

        link.detach();
        let reason = self
            .hook_at(free)
            .filter(|h| h.addr != origin)
            .and_then(|h| self.validate(&origin, &h.addr).err());
        match &reason {
            Some(reason) => tracing::debug!(%origin, %reason, "link refused"),
            None => tracing::debug!(%origin, "link released away from any hook"),
        }
        Some(LinkEvent::Discarded { origin, reason })
    }

    /// Nearest hook within snapping distance of `p` that accepts a link from `origin`.
    fn snap_target(&self, origin: &HookAddr<K>, p: Point) -> Option<(HookAddr<K>, Point)> {
        self.hooks
            .iter()
            .filter(|h| close_to(p, h.position, self.snapping_distance))
            .filter(|h| self.validate(origin, &h.addr).is_ok())
            .min_by(|a, b| {
                p.distance_squared(a.position)
                    .total_cmp(&p.distance_squared(b.position))
            })
            .map(|h| (h.addr.clone(), h.position))
    }

    /// Drops the link being dragged, if any.
    pub fn abort(&mut self) -> Option<LinkEvent<K>> {
        let mut link = self.open.take()?;
        self.drag.end();
        link.detach();
        let origin = link.origin()?.clone();
        tracing::debug!(%origin, "link drag aborted");
        Some(LinkEvent::Discarded {
            origin,
            reason: None,
        })
    }

    /// Declared type of a hook.
    #[must_use]
    pub fn kind_of(&self, addr: &HookAddr<K>) -> Option<ValueKind> {
        self.hook(addr).map(|h| h.kind)
    }

    fn allocate_id(&mut self) -> LinkId {
        let id = LinkId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    fn insert_attached(&mut self, link: DependencyLink<K>) {
        debug_assert_eq!(link.state(), LinkState::Attached, "only attached links are stored");
        let id = link.id();
        for hook in &mut self.hooks {
            if link.source() == Some(&hook.addr) || link.target() == Some(&hook.addr) {
                hook.links.push(id);
            }
        }
        self.links.push(link);
    }

    fn take_link(&mut self, id: LinkId) -> Option<DependencyLink<K>> {
        let pos = self.links.iter().position(|l| l.id() == id)?;
        let mut link = self.links.remove(pos);
        for hook in &mut self.hooks {
            hook.links.retain(|l| *l != id);
        }
        link.detach();
        Some(link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_boxes() -> LinkMap<u32> {
        let hooks = HookSet::new()
            .inlet("value", ValueKind::Number)
            .outlet("value", ValueKind::Number);
        let mut map = LinkMap::new();
        map.register_hooks(1, &hooks, Point::new(0.0, 0.0), 20.0);
        map.register_hooks(2, &hooks, Point::new(200.0, 0.0), 20.0);
        map
    }

    fn pos(map: &LinkMap<u32>, addr: &HookAddr<u32>) -> Point {
        map.hook(addr).unwrap().position
    }

    #[test]
    fn registering_twice_keeps_the_first_hooks() {
        let mut map = two_boxes();
        map.register_hooks(1, &HookSet::new(), Point::new(50.0, 50.0), 1.0);
        assert_eq!(map.hooks_of(1).count(), 2);
    }

    #[test]
    fn hook_at_prefers_inlets() {
        let mut map = LinkMap::<u32>::new();
        map.register_hooks(1, &HookSet::new().outlet("v", ValueKind::Number), Point::new(0.0, 0.0), 0.0);
        // The outlet row of 1 and the inlet row of 2 coincide.
        map.register_hooks(2, &HookSet::new().inlet("v", ValueKind::Number), Point::new(0.0, 20.0), 0.0);
        let hit = map.hook_at(Point::new(15.0, 10.0)).unwrap();
        assert_eq!(hit.addr, HookAddr::inlet(2, "v"));
    }

    #[test]
    fn validate_normalizes_order() {
        let map = two_boxes();
        let (out, inl) = map
            .validate(&HookAddr::inlet(2, "value"), &HookAddr::outlet(1, "value"))
            .unwrap();
        assert_eq!(out, HookAddr::outlet(1, "value"));
        assert_eq!(inl, HookAddr::inlet(2, "value"));
    }

    #[test]
    fn validate_rejections() {
        let mut map = two_boxes();
        assert!(matches!(
            map.validate(&HookAddr::outlet(1, "value"), &HookAddr::outlet(2, "value")),
            Err(LinkError::SameDirection { .. })
        ));
        assert!(matches!(
            map.validate(&HookAddr::outlet(1, "value"), &HookAddr::inlet(1, "value")),
            Err(LinkError::SameWidget { owner: 1 })
        ));
        assert!(matches!(
            map.validate(&HookAddr::outlet(1, "nope"), &HookAddr::inlet(2, "value")),
            Err(LinkError::UnknownHook(_))
        ));

        let ends = map
            .connect(&HookAddr::outlet(1, "value"), &HookAddr::inlet(2, "value"))
            .unwrap();
        assert_eq!(
            map.validate(&HookAddr::outlet(1, "value"), &HookAddr::inlet(2, "value")),
            Err(LinkError::Occupied {
                inlet: HookAddr::inlet(2, "value"),
                link: ends.id,
            })
        );
    }

    #[test]
    fn outlets_fan_out() {
        let mut map = two_boxes();
        map.register_hooks(3, &HookSet::new().inlet("value", ValueKind::Any), Point::new(400.0, 0.0), 20.0);
        map.connect(&HookAddr::outlet(1, "value"), &HookAddr::inlet(2, "value"))
            .unwrap();
        map.connect(&HookAddr::outlet(1, "value"), &HookAddr::inlet(3, "value"))
            .unwrap();
        let targets: Vec<_> = map
            .links_from(1, "value")
            .into_iter()
            .map(|e| e.target.owner)
            .collect();
        assert_eq!(targets, [2, 3]);
        assert_eq!(map.hook(&HookAddr::outlet(1, "value")).unwrap().links.len(), 2);
    }

    #[test]
    fn release_in_empty_space_discards() {
        let mut map = two_boxes();
        let start = pos(&map, &HookAddr::outlet(1, "value"));
        assert!(map.pointer_down(start).is_empty());
        assert!(map.is_dragging());

        let event = map.pointer_up(Point::new(100.0, 300.0));
        assert_eq!(
            event,
            Some(LinkEvent::Discarded {
                origin: HookAddr::outlet(1, "value"),
                reason: None,
            })
        );
        assert!(!map.is_dragging());
        assert_eq!(map.links().count(), 0);
    }

    #[test]
    fn release_on_incompatible_hook_reports_why() {
        let mut map = two_boxes();
        let start = pos(&map, &HookAddr::outlet(1, "value"));
        let other_outlet = pos(&map, &HookAddr::outlet(2, "value"));
        map.pointer_down(start);
        assert_eq!(map.pointer_move(other_outlet), None);
        let Some(LinkEvent::Discarded { reason, .. }) = map.pointer_up(other_outlet) else {
            panic!("expected a discarded link");
        };
        assert!(matches!(reason, Some(LinkError::SameDirection { .. })));
    }

    #[test]
    fn dragging_from_an_inlet_attaches_to_an_outlet() {
        let mut map = two_boxes();
        let start = pos(&map, &HookAddr::inlet(2, "value"));
        let end = pos(&map, &HookAddr::outlet(1, "value"));
        map.pointer_down(start);
        let Some(LinkEvent::Attached(ends)) = map.pointer_up(end) else {
            panic!("expected an attached link");
        };
        assert_eq!(ends.source, HookAddr::outlet(1, "value"));
        assert_eq!(ends.target, HookAddr::inlet(2, "value"));
        let link = map.link(ends.id).unwrap();
        assert_eq!(link.state(), LinkState::Attached);
        assert_eq!(link.start_bullet, end);
        assert_eq!(link.end_bullet, start);
    }

    #[test]
    fn grabbing_a_bullet_detaches_and_redrags() {
        let mut map = two_boxes();
        let ends = map
            .connect(&HookAddr::outlet(1, "value"), &HookAddr::inlet(2, "value"))
            .unwrap();
        let bullet = map.link(ends.id).unwrap().end_bullet;

        let events = map.pointer_down(bullet);
        assert_eq!(events, [LinkEvent::Detached(ends.clone())]);
        assert!(map.link(ends.id).is_none());
        assert!(!map.hook(&HookAddr::inlet(2, "value")).unwrap().is_occupied());

        let open = map.open_link().unwrap();
        assert_eq!(open.origin(), Some(&HookAddr::outlet(1, "value")));
        assert_eq!(open.free_bullet(), Some(bullet));

        // Dropping it back re-attaches under a new id.
        let Some(LinkEvent::Attached(again)) = map.pointer_up(bullet) else {
            panic!("expected a re-attached link");
        };
        assert_ne!(again.id, ends.id);
        assert_eq!(again.target, ends.target);
    }

    #[test]
    fn move_snaps_to_compatible_hooks() {
        let mut map = two_boxes();
        let start = pos(&map, &HookAddr::outlet(1, "value"));
        let target = pos(&map, &HookAddr::inlet(2, "value"));
        map.pointer_down(start);

        let near = Point::new(target.x + 4.0, target.y + 4.0);
        assert_eq!(map.pointer_move(near), Some(HookAddr::inlet(2, "value")));
        assert_eq!(map.open_link().unwrap().free_bullet(), Some(target));

        let away = Point::new(target.x + 40.0, target.y);
        assert_eq!(map.pointer_move(away), None);
        assert_eq!(map.open_link().unwrap().free_bullet(), Some(away));
    }

    #[test]
    fn compatible_hooks_exclude_own_widget_and_occupied_inlets() {
        let mut map = two_boxes();
        map.register_hooks(3, &HookSet::new().inlet("value", ValueKind::Number), Point::new(400.0, 0.0), 20.0);
        map.connect(&HookAddr::outlet(1, "value"), &HookAddr::inlet(3, "value"))
            .unwrap();

        map.pointer_down(pos(&map, &HookAddr::outlet(1, "value")));
        let addrs: Vec<_> = map.compatible_hooks().into_iter().map(|h| h.addr.clone()).collect();
        assert_eq!(addrs, [HookAddr::inlet(2, "value")]);
    }

    #[test]
    fn relayout_moves_hooks_and_bullets() {
        let mut map = two_boxes();
        let ends = map
            .connect(&HookAddr::outlet(1, "value"), &HookAddr::inlet(2, "value"))
            .unwrap();
        map.relayout(2, Point::new(200.0, 100.0), 40.0);
        let inlet = pos(&map, &HookAddr::inlet(2, "value"));
        assert_eq!(inlet, Point::new(215.0, 90.0));
        assert_eq!(map.link(ends.id).unwrap().end_bullet, inlet);
        assert_eq!(
            map.link(ends.id).unwrap().start_bullet,
            pos(&map, &HookAddr::outlet(1, "value"))
        );
    }

    #[test]
    fn removing_a_widget_detaches_its_links() {
        let mut map = two_boxes();
        let ends = map
            .connect(&HookAddr::outlet(1, "value"), &HookAddr::inlet(2, "value"))
            .unwrap();
        map.pointer_down(pos(&map, &HookAddr::outlet(2, "value")));

        let events = map.remove_hooks_of(2);
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], LinkEvent::Discarded { .. }));
        assert_eq!(events[1], LinkEvent::Detached(ends));
        assert_eq!(map.hooks_of(2).count(), 0);
        assert!(map.hook(&HookAddr::outlet(1, "value")).unwrap().links.is_empty());
        assert!(!map.is_dragging());
    }

    #[test]
    fn disconnect_unknown_link() {
        let mut map = two_boxes();
        assert_eq!(map.disconnect(LinkId(9)), Err(LinkError::UnknownLink(LinkId(9))));
    }
}
