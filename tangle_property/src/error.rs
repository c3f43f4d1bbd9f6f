// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised while composing schemas and updating state.

use crate::mutability::Mutability;

/// A subclass schema breaks a rule of its parent.
///
/// Raised when a class is composed. A class whose composition fails is never
/// registered.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SchemaCompositionError {
    /// The child declares a property its ancestor made readonly.
    #[error("class `{class}` redeclares readonly property `{property}` of `{declared_in}`")]
    ReadonlyRedeclared {
        /// The class being composed.
        class: String,
        /// The offending property.
        property: String,
        /// The ancestor that declared it readonly.
        declared_in: String,
    },
    /// The child turns an immutable property into a mutable one.
    #[error("class `{class}` widens immutable property `{property}` of `{declared_in}` to mutable")]
    ImmutableWidened {
        /// The class being composed.
        class: String,
        /// The offending property.
        property: String,
        /// The ancestor that last declared it.
        declared_in: String,
    },
}

impl SchemaCompositionError {
    /// The property the error is about.
    #[must_use]
    pub fn property(&self) -> &str {
        match self {
            Self::ReadonlyRedeclared { property, .. } | Self::ImmutableWidened { property, .. } => {
                property
            }
        }
    }
}

/// A runtime update targeted a property that is fixed after construction.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("cannot update {mutability} property `{property}` after construction")]
pub struct MutabilityViolation {
    /// The property that was targeted.
    pub property: String,
    /// Its declared level.
    pub mutability: Mutability,
}

/// Why one key of an update was dropped.
///
/// Rejections never abort the rest of the update.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UpdateRejection {
    /// Class-level rule.
    #[error(transparent)]
    Mutability(#[from] MutabilityViolation),
    /// The property is currently driven by an attached link.
    #[error("property `{property}` is driven by a link and cannot be edited locally")]
    LinkOwned {
        /// The property that was targeted.
        property: String,
    },
}

impl UpdateRejection {
    /// The property that was rejected.
    #[must_use]
    pub fn property(&self) -> &str {
        match self {
            Self::Mutability(v) => &v.property,
            Self::LinkOwned { property } => property,
        }
    }
}

/// Class registration failed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A class with this name is already registered.
    #[error("class `{0}` is already registered")]
    DuplicateClass(String),
    /// The parent id does not belong to this registry.
    #[error("class `{class}` names an unknown parent")]
    UnknownParent {
        /// The class being registered.
        class: String,
    },
    /// No more class ids are available.
    #[error("too many classes registered (max {max})")]
    Full {
        /// The maximum number of classes.
        max: usize,
    },
    /// The class schema does not compose onto its parent.
    #[error(transparent)]
    Composition(#[from] SchemaCompositionError),
}
