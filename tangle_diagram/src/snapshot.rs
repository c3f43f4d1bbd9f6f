// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Saving and restoring diagrams as plain data.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tangle_link::HookAddr;
use tangle_property::{Args, Mutability, WriteOrigin};

use crate::diagram::Diagram;
use crate::entity::EntityId;
use crate::error::DiagramError;

/// A diagram as a tree of widgets plus a list of links.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagramSnapshot {
    /// Top-level widgets, in spawn order.
    pub widgets: Vec<WidgetSnapshot>,
    /// Attached links, oldest first.
    pub links: Vec<LinkSnapshot>,
}

/// One widget and its children.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WidgetSnapshot {
    /// Id at the time of the snapshot.
    pub id: EntityId,
    /// Registered class name.
    pub class_name: String,
    /// Property values. Opaque values are left out.
    pub properties: Args,
    /// Children, in spawn order.
    pub children: Vec<Self>,
}

/// One attached link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSnapshot {
    /// Widget owning the outlet.
    pub source: EntityId,
    /// Outlet name.
    pub outlet: String,
    /// Widget owning the inlet.
    pub target: EntityId,
    /// Inlet name.
    pub inlet: String,
}

impl DiagramSnapshot {
    /// Serializes as JSON.
    pub fn to_json(&self) -> Result<String, DiagramError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses JSON written by [`to_json`](Self::to_json).
    pub fn from_json(json: &str) -> Result<Self, DiagramError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Diagram {
    /// Captures every widget, its properties, and every attached link.
    #[must_use]
    pub fn snapshot(&self) -> DiagramSnapshot {
        DiagramSnapshot {
            widgets: self
                .roots
                .iter()
                .filter_map(|&id| self.snapshot_widget(id))
                .collect(),
            links: self
                .links
                .links()
                .filter_map(|l| l.ends())
                .map(|ends| LinkSnapshot {
                    source: ends.source.owner,
                    outlet: ends.source.name,
                    target: ends.target.owner,
                    inlet: ends.target.name,
                })
                .collect(),
        }
    }

    fn snapshot_widget(&self, id: EntityId) -> Option<WidgetSnapshot> {
        let state = self.state(id)?;
        Some(WidgetSnapshot {
            id,
            class_name: state.class_name().to_owned(),
            properties: state
                .iter()
                .filter(|(_, v)| v.is_serializable())
                .map(|(k, v)| (k.to_owned(), v.clone()))
                .collect(),
            children: self
                .children(id)
                .iter()
                .filter_map(|&c| self.snapshot_widget(c))
                .collect(),
        })
    }

    /// Rebuilds a snapshot on top of this diagram.
    ///
    /// Top-level widgets are spawned with their saved properties as
    /// construction arguments. Children are created by their parent's setup
    /// as usual; saved mutable properties are then applied to them, matched
    /// by position and class. Finally the links are reconnected.
    ///
    /// Returns the new id of every restored widget, keyed by its saved id.
    pub fn restore(
        &mut self,
        snapshot: &DiagramSnapshot,
    ) -> Result<HashMap<EntityId, EntityId>, DiagramError> {
        let mut ids = HashMap::new();
        for widget in &snapshot.widgets {
            let id = self.spawn(&widget.class_name, &widget.properties)?;
            ids.insert(widget.id, id);
            self.restore_children(id, &widget.children, &mut ids);
        }
        for link in &snapshot.links {
            let source = *ids
                .get(&link.source)
                .ok_or(DiagramError::UnknownEntity(link.source))?;
            let target = *ids
                .get(&link.target)
                .ok_or(DiagramError::UnknownEntity(link.target))?;
            self.connect(
                &HookAddr::outlet(source, link.outlet.as_str()),
                &HookAddr::inlet(target, link.inlet.as_str()),
            )?;
        }
        Ok(ids)
    }

    fn restore_children(
        &mut self,
        parent: EntityId,
        saved: &[WidgetSnapshot],
        ids: &mut HashMap<EntityId, EntityId>,
    ) {
        let live = self.children(parent).to_vec();
        if live.len() != saved.len() {
            tracing::warn!(
                entity = %parent,
                live = live.len(),
                saved = saved.len(),
                "restored widget has a different number of children"
            );
        }
        for (id, widget) in live.into_iter().zip(saved) {
            if self.class_name(id) != Some(widget.class_name.as_str()) {
                tracing::warn!(entity = %id, expected = %widget.class_name, "child class differs, skipped");
                continue;
            }
            let mut args = widget.properties.clone();
            if let Some(state) = self.state(id) {
                args.retain(|name, _| {
                    state
                        .mutability(name)
                        .is_none_or(Mutability::is_mutable)
                });
            }
            self.propagate(id, WriteOrigin::Internal, &args);
            ids.insert(widget.id, id);
            self.restore_children(id, &widget.children, ids);
        }
    }
}
