// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Class registry with memoized schemas.
//!
//! This module provides [`SchemaRegistry`], which composes each class's
//! schema exactly once, when the class is registered, and hands out shared
//! [`Rc<FlatSchema>`] handles to every instance.

use std::rc::Rc;

use hashbrown::HashMap;

use crate::error::RegistryError;
use crate::schema::{FlatSchema, SchemaFragment, resolve};

/// A compact class identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassId(u16);

impl ClassId {
    /// Returns the raw index of this class.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
struct ClassEntry {
    name: String,
    parent: Option<ClassId>,
    schema: Rc<FlatSchema>,
}

/// Registry of classes and their resolved schemas.
///
/// Classes are registered once at startup, parents before children. A class
/// whose schema fails to compose is rejected and not registered.
///
/// # Example
///
/// ```rust
/// use tangle_property::{Mutability, SchemaFragment, SchemaRegistry};
///
/// let mut registry = SchemaRegistry::new();
/// let base = registry
///     .register("Mobject", None, &SchemaFragment::new().mutable("visible", true))
///     .unwrap();
/// let boxed = registry
///     .register("NumberBox", Some(base), &SchemaFragment::new().mutable("value", 0.0))
///     .unwrap();
///
/// assert_eq!(registry.by_name("NumberBox"), Some(boxed));
/// assert_eq!(registry.hierarchy_names(boxed), ["Mobject", "NumberBox"]);
/// assert_eq!(registry.schema(boxed).unwrap().mutability("visible"), Some(Mutability::Mutable));
/// assert!(registry.is_subclass_of(boxed, base));
/// ```
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    classes: Vec<ClassEntry>,
    by_name: HashMap<String, ClassId>,
}

impl SchemaRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` with its own declarations on top of `parent`.
    pub fn register(
        &mut self,
        name: &str,
        parent: Option<ClassId>,
        own: &SchemaFragment,
    ) -> Result<ClassId, RegistryError> {
        if self.by_name.contains_key(name) {
            return Err(RegistryError::DuplicateClass(name.into()));
        }
        let parent_schema = match parent {
            Some(p) => Some(self.schema(p).ok_or_else(|| RegistryError::UnknownParent {
                class: name.into(),
            })?),
            None => None,
        };
        let raw = u16::try_from(self.classes.len()).map_err(|_| RegistryError::Full {
            max: usize::from(u16::MAX),
        })?;

        let schema = resolve(name, parent_schema.map(|s| &**s), own)?;
        let id = ClassId(raw);
        self.classes.push(ClassEntry {
            name: name.into(),
            parent,
            schema: Rc::new(schema),
        });
        self.by_name.insert(name.into(), id);
        Ok(id)
    }

    /// Returns the number of registered classes.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if no classes are registered.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Looks up a class by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    /// Returns the name of a class.
    #[must_use]
    pub fn name(&self, id: ClassId) -> Option<&str> {
        self.classes.get(id.index()).map(|c| c.name.as_str())
    }

    /// Returns the parent of a class.
    #[must_use]
    pub fn parent(&self, id: ClassId) -> Option<ClassId> {
        self.classes.get(id.index()).and_then(|c| c.parent)
    }

    /// Returns the shared resolved schema of a class.
    #[must_use]
    pub fn schema(&self, id: ClassId) -> Option<&Rc<FlatSchema>> {
        self.classes.get(id.index()).map(|c| &c.schema)
    }

    /// Ancestry of a class, root first, ending with `id` itself.
    #[must_use]
    pub fn hierarchy(&self, id: ClassId) -> Vec<ClassId> {
        let mut chain = Vec::new();
        let mut current = self.classes.get(id.index()).map(|_| id);
        while let Some(c) = current {
            chain.push(c);
            current = self.parent(c);
        }
        chain.reverse();
        chain
    }

    /// Class names of [`hierarchy`](Self::hierarchy).
    #[must_use]
    pub fn hierarchy_names(&self, id: ClassId) -> Vec<&str> {
        self.hierarchy(id)
            .into_iter()
            .filter_map(|c| self.name(c))
            .collect()
    }

    /// Returns `true` if `id` is `ancestor` or derives from it.
    #[must_use]
    pub fn is_subclass_of(&self, id: ClassId, ancestor: ClassId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.parent(c);
        }
        false
    }

    /// Iterates over all registered classes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &str)> + '_ {
        self.classes.iter().enumerate().map(|(i, c)| {
            #[expect(clippy::cast_possible_truncation, reason = "ids are checked on insert")]
            let id = ClassId(i as u16);
            (id, c.name.as_str())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Mutability, SchemaCompositionError};

    fn registry() -> (SchemaRegistry, ClassId) {
        let mut registry = SchemaRegistry::new();
        let base = registry
            .register(
                "Mobject",
                None,
                &SchemaFragment::new()
                    .readonly("screen_event_handler", "self")
                    .mutable("visible", true),
            )
            .unwrap();
        (registry, base)
    }

    #[test]
    fn schema_is_shared_between_lookups() {
        let (registry, base) = registry();
        let a = Rc::clone(registry.schema(base).unwrap());
        let b = Rc::clone(registry.schema(base).unwrap());
        assert!(Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let (mut registry, _) = registry();
        let err = registry
            .register("Mobject", None, &SchemaFragment::new())
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateClass("Mobject".into()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let (mut registry, _) = registry();
        let err = registry
            .register("Orphan", Some(ClassId(42)), &SchemaFragment::new())
            .unwrap_err();
        assert!(matches!(err, RegistryError::UnknownParent { .. }));
    }

    #[test]
    fn composition_failure_registers_nothing() {
        let (mut registry, base) = registry();
        let err = registry
            .register(
                "Bad",
                Some(base),
                &SchemaFragment::new().mutable("screen_event_handler", "other"),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Composition(SchemaCompositionError::ReadonlyRedeclared { .. })
        ));
        assert_eq!(registry.by_name("Bad"), None);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn hierarchy_is_root_first() {
        let (mut registry, base) = registry();
        let linkable = registry
            .register(
                "Linkable",
                Some(base),
                &SchemaFragment::new().immutable("links_editable", false),
            )
            .unwrap();
        let op = registry
            .register(
                "BinaryOperatorBox",
                Some(linkable),
                &SchemaFragment::new().immutable("operator", "+"),
            )
            .unwrap();

        assert_eq!(registry.hierarchy(op), vec![base, linkable, op]);
        assert_eq!(
            registry.hierarchy_names(op),
            ["Mobject", "Linkable", "BinaryOperatorBox"]
        );
        assert!(registry.is_subclass_of(op, base));
        assert!(registry.is_subclass_of(op, op));
        assert!(!registry.is_subclass_of(base, op));
        assert_eq!(
            registry.schema(op).unwrap().mutability("operator"),
            Some(Mutability::Immutable)
        );
        assert_eq!(registry.iter().count(), 3);
    }
}
