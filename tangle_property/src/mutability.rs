// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mutability levels of declared properties.

use core::fmt;

use serde::{Deserialize, Serialize};

/// How freely a declared property may change.
///
/// Levels are ordered from loosest to strictest, so `a < b` means `b` is
/// stricter than `a`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mutability {
    /// Re-defaultable by subclasses and updatable at any time.
    #[default]
    Mutable,
    /// Re-defaultable by subclasses, fixed after construction.
    Immutable,
    /// Fixed at the declaring class; no subclass may redeclare it.
    Readonly,
}

impl Mutability {
    /// Returns `true` for [`Mutability::Mutable`].
    #[must_use]
    #[inline]
    pub fn is_mutable(self) -> bool {
        self == Self::Mutable
    }

    /// Whether a subclass may redeclare a property of this level as `child`.
    ///
    /// Readonly properties cannot be redeclared at all. Other levels may be
    /// kept or narrowed, never widened.
    #[must_use]
    pub fn can_become(self, child: Self) -> bool {
        match self {
            Self::Readonly => false,
            Self::Immutable => child != Self::Mutable,
            Self::Mutable => true,
        }
    }

    /// Lowercase name, as used in configuration and logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mutable => "mutable",
            Self::Immutable => "immutable",
            Self::Readonly => "readonly",
        }
    }
}

impl fmt::Display for Mutability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
