// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagram errors.

use tangle_dirty::CycleError;
use tangle_link::LinkError;
use tangle_property::{Mutability, RegistryError};

use crate::entity::EntityId;

/// Why a structural diagram operation failed.
///
/// Value updates never fail: rejected keys are reported in the returned
/// [`UpdateOutcome`](tangle_property::UpdateOutcome) instead.
#[derive(Debug, thiserror::Error)]
pub enum DiagramError {
    /// No widget class with this name is registered.
    #[error("unknown widget class `{0}`")]
    UnknownClass(String),
    /// The entity was removed, or never existed.
    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),
    /// An inlet of a widget class does not name a mutable property of its
    /// resolved schema, so incoming values would be dropped.
    #[error("inlet `{inlet}` of class `{class}` is not a mutable property")]
    InletNotWritable {
        /// Class being registered.
        class: String,
        /// Offending inlet.
        inlet: String,
        /// What the schema declares for it; `None` when undeclared.
        found: Option<Mutability>,
    },
    /// A widget class could not be registered.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// An internal dependency would close a loop.
    #[error(transparent)]
    Cycle(#[from] CycleError<EntityId>),
    /// A link was refused.
    #[error(transparent)]
    Link(#[from] LinkError<EntityId>),
    /// A snapshot could not be read or written.
    #[error("snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}
