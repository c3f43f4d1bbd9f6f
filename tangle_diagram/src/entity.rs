// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Entity handles and storage.

use core::fmt;

use serde::{Deserialize, Serialize};
use tangle_property::{ClassId, EntityState};

use crate::behavior::Behavior;

/// Identifier for a widget in a diagram.
///
/// A small, copyable handle made of a slot index and a generation counter.
/// Removing a widget frees its slot; when the slot is reused its generation
/// is incremented, so a stale `EntityId` never aliases a different widget.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub(crate) u32, pub(crate) u32);

impl EntityId {
    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Slot index. Unique among live entities.
    #[must_use]
    pub const fn slot(self) -> u32 {
        self.0
    }

    /// Generation of the slot this handle was issued for.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.1
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.0, self.1)
    }
}

#[derive(Debug)]
pub(crate) struct Entity {
    pub(crate) class: ClassId,
    pub(crate) state: EntityState,
    pub(crate) parent: Option<EntityId>,
    pub(crate) children: Vec<EntityId>,
    /// Taken out while one of its hooks runs.
    pub(crate) behavior: Option<Box<dyn Behavior>>,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    entity: Option<Entity>,
}

/// Generational slot storage.
#[derive(Debug, Default)]
pub(crate) struct Arena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl Arena {
    pub(crate) fn insert(&mut self, entity: Entity) -> EntityId {
        self.live += 1;
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.entity = Some(entity);
            return EntityId(idx, slot.generation);
        }
        let idx = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Slot {
            generation: 1,
            entity: Some(entity),
        });
        EntityId(idx, 1)
    }

    pub(crate) fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let slot = self.slots.get_mut(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        let entity = slot.entity.take()?;
        self.free.push(id.0);
        self.live -= 1;
        Some(entity)
    }

    pub(crate) fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slots
            .get(id.idx())
            .filter(|s| s.generation == id.1)
            .and_then(|s| s.entity.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.slots
            .get_mut(id.idx())
            .filter(|s| s.generation == id.1)
            .and_then(|s| s.entity.as_mut())
    }

    pub(crate) fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.live
    }
}
