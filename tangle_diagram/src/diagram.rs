// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The diagram: widgets, their dependencies, and their links.

use core::fmt;

use kurbo::Point;
use smallvec::SmallVec;
use tangle_dirty::{CycleHandling, DependencyTable, DirtySet, FireLog, Slot};
use tangle_link::{HookAddr, LinkEnds, LinkEvent, LinkId, LinkMap};
use tangle_property::{Args, ClassId, EntityState, Value, WriteOrigin};

use crate::behavior::SetupCx;
use crate::class::{ClassCatalog, WidgetClass};
use crate::config::DiagramConfig;
use crate::edit::StructuralEdit;
use crate::entity::{Arena, Entity, EntityId};
use crate::error::DiagramError;
use crate::pointer::{PointerEvent, PointerOutcome};
use crate::render::{NullRenderer, Renderer};

/// Property holding a widget's top-left corner, in link-map coordinates.
pub const ANCHOR: &str = "anchor";
/// Property holding a widget's height.
pub const HEIGHT: &str = "height";

/// A live diagram of linked widgets.
///
/// The diagram owns every widget's state. Widgets talk to each other only
/// through internal dependency edges and through links between hooks.
///
/// # Example
///
/// ```
/// use tangle_diagram::{Diagram, WidgetClass};
/// use tangle_dirty::Slot;
/// use tangle_property::{Args, SchemaFragment, Value};
///
/// let mut diagram = Diagram::default();
/// diagram
///     .register(WidgetClass::new("Cell").properties(SchemaFragment::new().mutable("x", 0.0)))
///     .unwrap();
///
/// let a = diagram.spawn("Cell", &Args::new()).unwrap();
/// let b = diagram.spawn("Cell", &Args::new()).unwrap();
/// diagram.add_dependency(a, "x", b, Slot::property("x")).unwrap();
///
/// diagram.apply_update(a, &Args::one("x", 4.0));
/// assert_eq!(diagram.value(b, "x"), Value::Number(4.0));
/// ```
pub struct Diagram {
    pub(crate) config: DiagramConfig,
    pub(crate) catalog: ClassCatalog,
    pub(crate) entities: Arena,
    pub(crate) roots: Vec<EntityId>,
    pub(crate) table: DependencyTable<EntityId>,
    pub(crate) links: LinkMap<EntityId>,
    pub(crate) redraw: DirtySet<EntityId>,
    pub(crate) pending: Vec<StructuralEdit>,
    /// Nesting level of the update in flight. Zero when idle.
    pub(crate) depth: usize,
    pub(crate) renderer: Box<dyn Renderer>,
    pub(crate) trace: Option<FireLog<EntityId>>,
}

impl fmt::Debug for Diagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagram")
            .field("config", &self.config)
            .field("catalog", &self.catalog)
            .field("entities", &self.entities.len())
            .field("roots", &self.roots)
            .field("dependencies", &self.table.len())
            .field("links", &self.links.links().count())
            .field("pending", &self.pending)
            .field("depth", &self.depth)
            .field("renderer", &self.renderer)
            .finish_non_exhaustive()
    }
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new(DiagramConfig::default())
    }
}

impl Diagram {
    /// An empty diagram that discards redraw requests.
    #[must_use]
    pub fn new(config: DiagramConfig) -> Self {
        Self::with_renderer(config, NullRenderer)
    }

    /// An empty diagram that hands redraw requests to `renderer`.
    #[must_use]
    pub fn with_renderer(config: DiagramConfig, renderer: impl Renderer + 'static) -> Self {
        let trace = config.record_trace.then(FireLog::new);
        Self {
            links: LinkMap::with_snapping_distance(config.snapping_distance),
            config,
            catalog: ClassCatalog::new(),
            entities: Arena::default(),
            roots: Vec::new(),
            table: DependencyTable::with_cycle_handling(CycleHandling::Error),
            redraw: DirtySet::new(),
            pending: Vec::new(),
            depth: 0,
            renderer: Box::new(renderer),
            trace,
        }
    }

    /// Replaces the rendering collaborator.
    pub fn set_renderer(&mut self, renderer: impl Renderer + 'static) {
        self.renderer = Box::new(renderer);
    }

    /// The configuration this diagram was built with.
    #[must_use]
    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    // --- classes -----------------------------------------------------------

    /// Registers a widget class.
    pub fn register(&mut self, class: WidgetClass) -> Result<ClassId, DiagramError> {
        self.catalog.register(class)
    }

    /// Registered widget classes.
    #[must_use]
    pub fn catalog(&self) -> &ClassCatalog {
        &self.catalog
    }

    /// Class names of a widget, root class first.
    #[must_use]
    pub fn class_hierarchy(&self, id: EntityId) -> Vec<&str> {
        self.entities
            .get(id)
            .map(|e| self.catalog.hierarchy(e.class))
            .unwrap_or_default()
    }

    // --- widgets -----------------------------------------------------------

    /// Creates a top-level widget of `class`, constructed with `args`.
    pub fn spawn(&mut self, class: &str, args: &Args) -> Result<EntityId, DiagramError> {
        self.insert(None, class, args)
    }

    /// Creates a widget owned by `parent`.
    ///
    /// Children are removed with their parent.
    pub fn spawn_child(
        &mut self,
        parent: EntityId,
        class: &str,
        args: &Args,
    ) -> Result<EntityId, DiagramError> {
        if !self.entities.contains(parent) {
            return Err(DiagramError::UnknownEntity(parent));
        }
        self.insert(Some(parent), class, args)
    }

    fn insert(
        &mut self,
        parent: Option<EntityId>,
        class: &str,
        args: &Args,
    ) -> Result<EntityId, DiagramError> {
        let class_id = self
            .catalog
            .by_name(class)
            .ok_or_else(|| DiagramError::UnknownClass(class.into()))?;
        let schema = self
            .catalog
            .schema(class_id)
            .cloned()
            .ok_or_else(|| DiagramError::UnknownClass(class.into()))?;

        let state = EntityState::construct(schema, args);
        let (anchor, height) = geometry(&state);
        let id = self.entities.insert(Entity {
            class: class_id,
            state,
            parent,
            children: Vec::new(),
            behavior: None,
        });
        match parent.and_then(|p| self.entities.get_mut(p)) {
            Some(p) => p.children.push(id),
            None => self.roots.push(id),
        }
        if let Some(hooks) = self.catalog.hooks(class_id) {
            self.links.register_hooks(id, hooks, anchor, height);
        }
        tracing::debug!(entity = %id, %class, "widget spawned");

        self.enter();
        self.redraw.mark(id);
        let result = self.run_setup(id, class_id);
        self.leave();

        if let Err(err) = result {
            tracing::warn!(entity = %id, %class, %err, "widget setup failed");
            self.remove(id)?;
            return Err(err);
        }
        Ok(id)
    }

    fn run_setup(&mut self, id: EntityId, class: ClassId) -> Result<(), DiagramError> {
        let Some(mut behavior) = self.catalog.make_behavior(class) else {
            return Ok(());
        };
        let result = behavior.setup(&mut SetupCx {
            diagram: self,
            this: id,
        });
        if let Some(entity) = self.entities.get_mut(id) {
            entity.behavior = Some(behavior);
        }
        result?;

        // Recomputations of this widget registered during setup could not
        // run while its behavior was out; run them once now.
        let own: SmallVec<[(String, Slot); 4]> = self
            .table
            .edges_of(id)
            .iter()
            .filter(|e| e.target == id && e.slot.is_recompute())
            .map(|e| (e.property.clone(), e.slot.clone()))
            .collect();
        for (property, slot) in own {
            self.fire_edge(id, &property, id, &slot);
        }
        Ok(())
    }

    /// Removes a widget, its descendants, their links, and their edges.
    ///
    /// While an update is in flight the removal is queued instead.
    pub fn remove(&mut self, id: EntityId) -> Result<(), DiagramError> {
        if !self.entities.contains(id) {
            return Err(DiagramError::UnknownEntity(id));
        }
        if self.depth > 0 {
            self.schedule(StructuralEdit::Remove(id));
            return Ok(());
        }

        let parent = self.parent(id);
        self.enter();
        let mut doomed = Vec::new();
        self.collect_subtree(id, &mut doomed);
        for &e in &doomed {
            for event in self.links.remove_hooks_of(e) {
                if let LinkEvent::Detached(ends) = event {
                    self.on_detached(&ends);
                }
            }
        }
        for &e in doomed.iter().rev() {
            self.table.remove_key(e);
            self.redraw.remove_key(e);
            self.entities.remove(e);
        }
        self.roots.retain(|r| *r != id);
        if let Some(parent) = parent
            && let Some(p) = self.entities.get_mut(parent)
        {
            p.children.retain(|c| *c != id);
            self.redraw.mark(parent);
        }
        tracing::debug!(entity = %id, removed = doomed.len(), "widget removed");
        self.leave();
        Ok(())
    }

    fn collect_subtree(&self, id: EntityId, out: &mut Vec<EntityId>) {
        out.push(id);
        for &child in self.children(id) {
            self.collect_subtree(child, out);
        }
    }

    /// Returns `true` if `id` refers to a live widget.
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entities.contains(id)
    }

    /// Number of live widgets, children included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if the diagram holds no widgets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Top-level widgets, in spawn order.
    #[must_use]
    pub fn roots(&self) -> &[EntityId] {
        &self.roots
    }

    /// Children of a widget, in spawn order.
    #[must_use]
    pub fn children(&self, id: EntityId) -> &[EntityId] {
        self.entities.get(id).map_or(&[], |e| e.children.as_slice())
    }

    /// Owner of a child widget.
    #[must_use]
    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.entities.get(id).and_then(|e| e.parent)
    }

    /// Class of a widget.
    #[must_use]
    pub fn class_of(&self, id: EntityId) -> Option<ClassId> {
        self.entities.get(id).map(|e| e.class)
    }

    /// Class name of a widget.
    #[must_use]
    pub fn class_name(&self, id: EntityId) -> Option<&str> {
        self.state(id).map(EntityState::class_name)
    }

    /// Full state of a widget.
    #[must_use]
    pub fn state(&self, id: EntityId) -> Option<&EntityState> {
        self.entities.get(id).map(|e| &e.state)
    }

    /// One property of a widget.
    #[must_use]
    pub fn get(&self, id: EntityId, name: &str) -> Option<&Value> {
        self.state(id).and_then(|s| s.get(name))
    }

    /// One property of a widget, or [`Value::Null`].
    #[must_use]
    pub fn value(&self, id: EntityId, name: &str) -> Value {
        self.get(id, name).cloned().unwrap_or_default()
    }

    /// Returns `true` if the widget's own interface may edit `name`: it is
    /// mutable and no link drives it.
    #[must_use]
    pub fn is_locally_editable(&self, id: EntityId, name: &str) -> bool {
        self.state(id).is_some_and(|s| s.is_locally_editable(name))
    }

    // --- internal dependencies ---------------------------------------------

    /// Makes `property` of `source` drive `slot` on `target`, then refreshes
    /// the target from the current value.
    ///
    /// Returns `Ok(false)` if the edge already existed. An edge that would
    /// close a loop is refused with [`DiagramError::Cycle`].
    pub fn add_dependency(
        &mut self,
        source: EntityId,
        property: &str,
        target: EntityId,
        slot: Slot,
    ) -> Result<bool, DiagramError> {
        for id in [source, target] {
            if !self.entities.contains(id) {
                return Err(DiagramError::UnknownEntity(id));
            }
        }
        let added = self.table.add(source, property, target, slot.clone())?;
        if added {
            self.enter();
            self.fire_edge(source, property, target, &slot);
            self.leave();
        }
        Ok(added)
    }

    /// Removes one internal dependency.
    pub fn remove_dependency(
        &mut self,
        source: EntityId,
        property: &str,
        target: EntityId,
        slot: &Slot,
    ) -> bool {
        self.table.remove_dependency(source, property, target, slot)
    }

    /// The internal dependency table.
    #[must_use]
    pub fn dependencies(&self) -> &DependencyTable<EntityId> {
        &self.table
    }

    /// Fired edges, when [`DiagramConfig::record_trace`] is on.
    #[must_use]
    pub fn trace(&self) -> Option<&FireLog<EntityId>> {
        self.trace.as_ref()
    }

    // --- links -------------------------------------------------------------

    /// Hooks and links.
    #[must_use]
    pub fn links(&self) -> &LinkMap<EntityId> {
        &self.links
    }

    /// Where a hook is drawn.
    #[must_use]
    pub fn hook_position(&self, addr: &HookAddr<EntityId>) -> Option<Point> {
        self.links.hook(addr).map(|h| h.position)
    }

    /// Links an outlet to an inlet, in either order.
    ///
    /// The inlet is locked against local edits, receives the outlet's current
    /// value, and both widgets are told about the link.
    pub fn connect(
        &mut self,
        a: &HookAddr<EntityId>,
        b: &HookAddr<EntityId>,
    ) -> Result<LinkId, DiagramError> {
        let ends = self.links.connect(a, b)?;
        self.enter();
        self.on_attached(&ends);
        self.leave();
        Ok(ends.id)
    }

    /// Detaches a link, unlocking its inlet.
    ///
    /// The inlet keeps the last value it received.
    pub fn disconnect(&mut self, link: LinkId) -> Result<LinkEnds<EntityId>, DiagramError> {
        let ends = self.links.disconnect(link)?;
        self.enter();
        self.on_detached(&ends);
        self.leave();
        Ok(ends)
    }

    /// Applies a structural edit now, or after the update in flight.
    pub fn schedule(&mut self, edit: StructuralEdit) {
        if self.depth > 0 {
            tracing::debug!(?edit, "structural edit deferred");
            self.pending.push(edit);
            return;
        }
        let result = match &edit {
            StructuralEdit::Remove(id) => self.remove(*id),
            StructuralEdit::Connect { outlet, inlet } => self.connect(outlet, inlet).map(drop),
            StructuralEdit::Disconnect(link) => self.disconnect(*link).map(drop),
        };
        if let Err(err) = result {
            tracing::warn!(?edit, %err, "structural edit failed");
        }
    }

    /// Feeds one pointer event to the link map.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> PointerOutcome {
        let mut outcome = PointerOutcome::default();
        match event {
            PointerEvent::Down(p) => outcome.events = self.links.pointer_down(p),
            PointerEvent::Move(p) => outcome.snapped = self.links.pointer_move(p),
            PointerEvent::Up(p) => outcome.events.extend(self.links.pointer_up(p)),
        }
        if outcome.events.is_empty() {
            return outcome;
        }
        self.enter();
        for event in &outcome.events {
            match event {
                LinkEvent::Attached(ends) => self.on_attached(ends),
                LinkEvent::Detached(ends) => self.on_detached(ends),
                LinkEvent::Discarded { origin, reason } => {
                    tracing::debug!(%origin, ?reason, "dragged link discarded");
                }
            }
        }
        self.leave();
        outcome
    }

    pub(crate) fn on_attached(&mut self, ends: &LinkEnds<EntityId>) {
        let target = ends.target.owner;
        if let Some(entity) = self.entities.get_mut(target) {
            entity.state.set_link_owned(&ends.target.name, true);
        }
        let value = self.value(ends.source.owner, &ends.source.name);
        self.propagate(
            target,
            WriteOrigin::Link,
            &Args::one(ends.target.name.clone(), value),
        );
        self.notify_link(ends, true);
    }

    pub(crate) fn on_detached(&mut self, ends: &LinkEnds<EntityId>) {
        if let Some(entity) = self.entities.get_mut(ends.target.owner) {
            entity.state.set_link_owned(&ends.target.name, false);
        }
        self.notify_link(ends, false);
    }

    fn notify_link(&mut self, ends: &LinkEnds<EntityId>, added: bool) {
        for owner in [ends.source.owner, ends.target.owner] {
            let Some(mut behavior) = self
                .entities
                .get_mut(owner)
                .and_then(|e| e.behavior.take())
            else {
                self.redraw_if_alive(owner);
                continue;
            };
            let args = if added {
                behavior.link_added(owner, ends)
            } else {
                behavior.link_removed(owner, ends)
            };
            if let Some(entity) = self.entities.get_mut(owner) {
                entity.behavior = Some(behavior);
            }
            if args.is_empty() {
                self.redraw_if_alive(owner);
            } else {
                self.propagate(owner, WriteOrigin::Internal, &args);
            }
        }
    }

    fn redraw_if_alive(&mut self, id: EntityId) {
        if self.entities.contains(id) {
            self.redraw.mark(id);
        }
    }

    pub(crate) fn relayout_hooks(&mut self, id: EntityId) {
        if let Some(state) = self.state(id) {
            let (anchor, height) = geometry(state);
            self.links.relayout(id, anchor, height);
        }
    }
}

fn geometry(state: &EntityState) -> (Point, f64) {
    let anchor = state.get(ANCHOR).and_then(Value::as_point).unwrap_or(Point::ZERO);
    let height = state.get(HEIGHT).and_then(Value::as_number).unwrap_or(0.0);
    (anchor, height)
}
