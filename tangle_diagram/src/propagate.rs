// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Update propagation.
//!
//! An update writes one widget, then fans out in two ways: internal
//! dependency edges registered for each changed property fire in
//! registration order, then every link leaving an outlet of a changed
//! property pushes the new value into its inlet. Both recurse through the
//! same entry point.
//!
//! Re-entrancy is tracked with a depth counter. Only the outermost update
//! hands its redraw batch to the renderer and then runs structural edits
//! queued while it was in flight. The counter doubles as a ceiling on
//! nesting, which stops loops the dependency table cannot see.

use smallvec::SmallVec;
use tangle_dirty::{FireTrace, Slot};
use tangle_property::{Args, UpdateOutcome, WriteOrigin};

use crate::behavior::RecomputeCx;
use crate::diagram::{ANCHOR, Diagram, HEIGHT};
use crate::entity::EntityId;
use crate::render::RedrawBatch;

impl Diagram {
    /// Applies `args` to a widget as a local edit, and propagates.
    ///
    /// Keys the widget may not change are dropped and reported in the
    /// outcome; the rest apply. Everything downstream is up to date when
    /// this returns.
    pub fn apply_update(&mut self, id: EntityId, args: &Args) -> UpdateOutcome {
        self.propagate(id, WriteOrigin::Local, args)
    }

    /// Returns `true` while an update is in flight.
    #[must_use]
    pub fn is_propagating(&self) -> bool {
        self.depth > 0
    }

    pub(crate) fn propagate(
        &mut self,
        id: EntityId,
        origin: WriteOrigin,
        args: &Args,
    ) -> UpdateOutcome {
        if self.depth >= self.config.max_propagation_depth {
            tracing::warn!(
                entity = %id,
                depth = self.depth,
                "propagation depth ceiling reached, update dropped"
            );
            return UpdateOutcome::default();
        }
        let Some(entity) = self.entities.get_mut(id) else {
            tracing::warn!(entity = %id, "update for unknown entity");
            return UpdateOutcome::default();
        };

        let outcome = entity.state.update_from(origin, args);
        self.enter();
        let changed: SmallVec<[String; 4]> =
            outcome.changed_keys().map(ToOwned::to_owned).collect();
        if !changed.is_empty() {
            self.redraw.mark(id);
            if changed.iter().any(|k| k == ANCHOR || k == HEIGHT) {
                self.relayout_hooks(id);
            }
        }
        for property in &changed {
            self.fire(id, property);
        }
        for property in &changed {
            self.push_links(id, property);
        }
        self.leave();
        outcome
    }

    pub(crate) fn enter(&mut self) {
        self.depth += 1;
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.flush();
        }
    }

    fn flush(&mut self) {
        if !self.redraw.is_empty() {
            let generation = self.redraw.generation();
            let entities: Vec<EntityId> = self.redraw.drain().collect();
            self.renderer.redraw(&RedrawBatch {
                generation,
                entities,
            });
        }
        if self.pending.is_empty() {
            return;
        }
        let edits = core::mem::take(&mut self.pending);
        tracing::debug!(count = edits.len(), "applying deferred structural edits");
        for edit in edits {
            self.schedule(edit);
        }
    }

    fn fire(&mut self, source: EntityId, property: &str) {
        let edges: SmallVec<[(EntityId, Slot); 4]> = self
            .table
            .edges_from(source, property)
            .map(|e| (e.target, e.slot.clone()))
            .collect();
        for (target, slot) in edges {
            self.fire_edge(source, property, target, &slot);
        }
    }

    pub(crate) fn fire_edge(
        &mut self,
        source: EntityId,
        property: &str,
        target: EntityId,
        slot: &Slot,
    ) {
        tracing::trace!(%source, %property, %target, %slot, "edge fired");
        if let Some(trace) = &mut self.trace {
            trace.fired(source, property, target, slot, self.depth);
        }
        match slot {
            Slot::Property(name) => {
                let value = self.value(source, property);
                self.propagate(target, WriteOrigin::Internal, &Args::one(name.clone(), value));
            }
            Slot::Recompute(method) => self.recompute(target, method),
        }
    }

    fn recompute(&mut self, target: EntityId, method: &str) {
        let Some(mut behavior) = self
            .entities
            .get_mut(target)
            .and_then(|e| e.behavior.take())
        else {
            if self.entities.contains(target) {
                self.redraw.mark(target);
            }
            return;
        };
        let mut cx = RecomputeCx {
            diagram: self,
            this: target,
            edits: Vec::new(),
        };
        let args = behavior.recompute(method, &mut cx);
        let edits = cx.edits;
        if let Some(entity) = self.entities.get_mut(target) {
            entity.behavior = Some(behavior);
        }
        self.pending.extend(edits);
        if args.is_empty() {
            self.redraw.mark(target);
        } else {
            self.propagate(target, WriteOrigin::Internal, &args);
        }
    }

    fn push_links(&mut self, source: EntityId, property: &str) {
        let outgoing = self.links.links_from(source, property);
        if outgoing.is_empty() {
            return;
        }
        let value = self.value(source, property);
        for ends in outgoing {
            tracing::trace!(link = %ends.id, target = %ends.target, "link pushed");
            self.propagate(
                ends.target.owner,
                WriteOrigin::Link,
                &Args::one(ends.target.name.clone(), value.clone()),
            );
        }
    }
}
