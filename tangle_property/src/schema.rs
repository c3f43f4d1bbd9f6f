// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Schema fragments and their composition along a class chain.
//!
//! Each class declares a [`SchemaFragment`] of its own properties. The
//! fragment is composed onto the parent's [`FlatSchema`] by [`resolve`],
//! a pure function that either returns the flattened schema or reports the
//! first rule the child breaks.

use hashbrown::HashMap;

use crate::error::SchemaCompositionError;
use crate::mutability::Mutability;
use crate::value::Value;

/// One declared property: a default value tagged with a mutability level.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyDecl {
    /// How freely the property may change.
    pub mutability: Mutability,
    /// Default value seeded into every instance.
    pub default: Value,
}

/// The properties a class declares itself, in declaration order.
///
/// # Example
///
/// ```rust
/// use tangle_property::{Mutability, SchemaFragment};
///
/// let fragment = SchemaFragment::new()
///     .readonly("kind", "box")
///     .immutable("operator", "+")
///     .mutable("value", 0.0);
///
/// assert_eq!(fragment.len(), 3);
/// assert_eq!(fragment.get("operator").unwrap().mutability, Mutability::Immutable);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SchemaFragment {
    entries: Vec<(String, PropertyDecl)>,
}

impl SchemaFragment {
    /// Creates an empty fragment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a readonly property.
    #[must_use]
    pub fn readonly(self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.declare(name, Mutability::Readonly, default)
    }

    /// Declares an immutable property.
    #[must_use]
    pub fn immutable(self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.declare(name, Mutability::Immutable, default)
    }

    /// Declares a mutable property.
    #[must_use]
    pub fn mutable(self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.declare(name, Mutability::Mutable, default)
    }

    /// Declares a property. A second declaration of the same name in one
    /// fragment replaces the first and keeps its position.
    #[must_use]
    pub fn declare(
        mut self,
        name: impl Into<String>,
        mutability: Mutability,
        default: impl Into<Value>,
    ) -> Self {
        let name = name.into();
        let decl = PropertyDecl {
            mutability,
            default: default.into(),
        };
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == name) {
            slot.1 = decl;
        } else {
            self.entries.push((name, decl));
        }
        self
    }

    /// Returns the declaration of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyDecl> {
        self.entries
            .iter()
            .find_map(|(k, d)| (k == name).then_some(d))
    }

    /// Iterates over declarations in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyDecl)> + '_ {
        self.entries.iter().map(|(k, d)| (k.as_str(), d))
    }

    /// Number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One entry of a [`FlatSchema`].
#[derive(Clone, Debug, PartialEq)]
pub struct SchemaEntry {
    /// Property name.
    pub name: String,
    /// The effective declaration.
    pub decl: PropertyDecl,
    /// The class whose declaration is in effect.
    pub declared_in: String,
}

/// A fully composed schema: every property a class's instances carry.
///
/// Entries are ordered parent-first: inherited properties keep their
/// ancestor's order, and properties new to a class follow in declaration
/// order.
#[derive(Clone, Debug, PartialEq)]
pub struct FlatSchema {
    class: String,
    entries: Vec<SchemaEntry>,
    index: HashMap<String, usize>,
}

impl FlatSchema {
    /// An empty schema for a root class with no declarations.
    #[must_use]
    pub fn empty(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Name of the class this schema was resolved for.
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Position of `name` in [`entries`](Self::entries).
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Returns the entry for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SchemaEntry> {
        self.index_of(name).map(|i| &self.entries[i])
    }

    /// Returns `true` if `name` is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Declared level of `name`.
    #[must_use]
    pub fn mutability(&self, name: &str) -> Option<Mutability> {
        self.get(name).map(|e| e.decl.mutability)
    }

    /// Default value of `name`.
    #[must_use]
    pub fn default_value(&self, name: &str) -> Option<&Value> {
        self.get(name).map(|e| &e.decl.default)
    }

    /// All entries, parent-first.
    #[must_use]
    pub fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }

    /// Property names, parent-first.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no properties are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, entry: SchemaEntry) {
        self.index.insert(entry.name.clone(), self.entries.len());
        self.entries.push(entry);
    }
}

/// Composes `own` onto `parent` for the class named `class`.
///
/// Fails if `own` redeclares a property that `parent` holds as readonly, or
/// declares as mutable a property that `parent` holds as immutable.
/// Otherwise the child's declarations replace the parent's (value and level)
/// and all other parent entries pass through unchanged.
///
/// # Example
///
/// ```rust
/// use tangle_property::{resolve, Mutability, SchemaCompositionError, SchemaFragment};
///
/// let base = resolve(
///     "Base",
///     None,
///     &SchemaFragment::new().readonly("id", "base").immutable("size", 1.0),
/// )
/// .unwrap();
///
/// let narrowed = resolve("Child", Some(&base), &SchemaFragment::new().readonly("size", 2.0));
/// assert_eq!(narrowed.unwrap().mutability("size"), Some(Mutability::Readonly));
///
/// let widened = resolve("Child", Some(&base), &SchemaFragment::new().mutable("size", 2.0));
/// assert!(matches!(widened, Err(SchemaCompositionError::ImmutableWidened { .. })));
/// ```
pub fn resolve(
    class: &str,
    parent: Option<&FlatSchema>,
    own: &SchemaFragment,
) -> Result<FlatSchema, SchemaCompositionError> {
    let mut flat = match parent {
        Some(parent) => FlatSchema {
            class: class.into(),
            entries: parent.entries.clone(),
            index: parent.index.clone(),
        },
        None => FlatSchema::empty(class),
    };

    for (name, decl) in own.iter() {
        let Some(i) = flat.index_of(name) else {
            flat.push(SchemaEntry {
                name: name.into(),
                decl: decl.clone(),
                declared_in: class.into(),
            });
            continue;
        };

        let inherited = &flat.entries[i];
        if !inherited.decl.mutability.can_become(decl.mutability) {
            let property = name.to_owned();
            let declared_in = inherited.declared_in.clone();
            let class = class.to_owned();
            return Err(match inherited.decl.mutability {
                Mutability::Readonly => SchemaCompositionError::ReadonlyRedeclared {
                    class,
                    property,
                    declared_in,
                },
                _ => SchemaCompositionError::ImmutableWidened {
                    class,
                    property,
                    declared_in,
                },
            });
        }

        flat.entries[i] = SchemaEntry {
            name: name.into(),
            decl: decl.clone(),
            declared_in: class.into(),
        };
    }

    Ok(flat)
}
