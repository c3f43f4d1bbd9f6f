// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-class widget behavior: the seam to the widget catalogue.

use core::fmt;

use tangle_dirty::Slot;
use tangle_link::LinkEnds;
use tangle_property::{Args, EntityState, UpdateOutcome, Value, WriteOrigin};

use crate::diagram::Diagram;
use crate::edit::StructuralEdit;
use crate::entity::EntityId;
use crate::error::DiagramError;

/// What a widget class does beyond holding properties.
///
/// Every method has a no-op default, so a class that only declares
/// properties and hooks needs no behavior at all.
///
/// Behaviors hold no reference to the diagram. Each hook receives a context
/// scoped to the widget it runs for.
pub trait Behavior: fmt::Debug {
    /// Runs once, right after the widget is constructed.
    ///
    /// This is where children are spawned and internal dependencies are
    /// registered.
    fn setup(&mut self, cx: &mut SetupCx<'_>) -> Result<(), DiagramError> {
        let _ = cx;
        Ok(())
    }

    /// Recomputes derived state for a [`Slot::Recompute`] edge named `method`.
    ///
    /// The returned arguments are applied to this widget as an internal
    /// write. Returning nothing just schedules a redraw.
    fn recompute(&mut self, method: &str, cx: &mut RecomputeCx<'_>) -> Args {
        let _ = (method, cx);
        Args::new()
    }

    /// A link touching this widget was attached.
    ///
    /// The returned arguments are applied to this widget as an internal write.
    fn link_added(&mut self, this: EntityId, link: &LinkEnds<EntityId>) -> Args {
        let _ = (this, link);
        Args::new()
    }

    /// A link touching this widget was detached.
    fn link_removed(&mut self, this: EntityId, link: &LinkEnds<EntityId>) -> Args {
        let _ = (this, link);
        Args::new()
    }
}

/// Creates a fresh behavior for each new widget of a class.
pub type BehaviorFactory = std::rc::Rc<dyn Fn() -> Box<dyn Behavior>>;

/// Context handed to [`Behavior::setup`].
#[derive(Debug)]
pub struct SetupCx<'a> {
    pub(crate) diagram: &'a mut Diagram,
    pub(crate) this: EntityId,
}

impl SetupCx<'_> {
    /// The widget being set up.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.this
    }

    /// Current value of one of this widget's properties.
    #[must_use]
    pub fn value(&self, name: &str) -> Value {
        self.diagram.value(self.this, name)
    }

    /// Spawns a child of this widget.
    pub fn spawn_child(&mut self, class: &str, args: &Args) -> Result<EntityId, DiagramError> {
        self.diagram.spawn_child(self.this, class, args)
    }

    /// Makes `property` of this widget drive `slot` on `target`.
    ///
    /// The target is refreshed from the current value straight away.
    pub fn add_dependency(
        &mut self,
        property: &str,
        target: EntityId,
        slot: Slot,
    ) -> Result<bool, DiagramError> {
        self.diagram.add_dependency(self.this, property, target, slot)
    }

    /// Writes this widget's own properties, as an internal update.
    pub fn update(&mut self, args: &Args) -> UpdateOutcome {
        self.diagram.propagate(self.this, WriteOrigin::Internal, args)
    }
}

/// Context handed to [`Behavior::recompute`].
///
/// Gives read access to the recomputing widget and lets it schedule
/// structural edits, which run after the current update settles.
#[derive(Debug)]
pub struct RecomputeCx<'a> {
    pub(crate) diagram: &'a Diagram,
    pub(crate) this: EntityId,
    pub(crate) edits: Vec<StructuralEdit>,
}

impl RecomputeCx<'_> {
    /// The recomputing widget.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.this
    }

    /// Current value of one of this widget's properties.
    #[must_use]
    pub fn value(&self, name: &str) -> Value {
        self.diagram.value(self.this, name)
    }

    /// This widget's full state.
    #[must_use]
    pub fn state(&self) -> Option<&EntityState> {
        self.diagram.state(self.this)
    }

    /// This widget's children, in spawn order.
    #[must_use]
    pub fn children(&self) -> &[EntityId] {
        self.diagram.children(self.this)
    }

    /// Queues a structural edit for after the current update.
    pub fn schedule(&mut self, edit: StructuralEdit) {
        self.edits.push(edit);
    }
}
