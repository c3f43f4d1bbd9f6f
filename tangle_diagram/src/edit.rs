// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural edits deferred past an in-flight update.

use tangle_link::{HookAddr, LinkId};

use crate::entity::EntityId;

/// A change to the shape of the diagram.
///
/// Edits requested while an update is propagating are queued and applied,
/// in order, once the outermost update has finished and its redraw has been
/// handed off. Requested while idle, they apply at once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StructuralEdit {
    /// Remove a widget and its descendants.
    Remove(EntityId),
    /// Link an outlet to an inlet.
    Connect {
        /// The driving outlet.
        outlet: HookAddr<EntityId>,
        /// The driven inlet.
        inlet: HookAddr<EntityId>,
    },
    /// Detach a link.
    Disconnect(LinkId),
}
