// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widget classes: schema, hooks, and behavior, composed along a parent chain.

use core::fmt;
use std::rc::Rc;

use tangle_link::{Direction, HookSet};
use tangle_property::{
    ClassId, FlatSchema, Mutability, RegistryError, SchemaFragment, SchemaRegistry, ValueKind,
    resolve,
};

use crate::behavior::{Behavior, BehaviorFactory};
use crate::error::DiagramError;

/// Declaration of one widget class.
///
/// ```
/// use tangle_diagram::WidgetClass;
/// use tangle_property::{SchemaFragment, ValueKind};
///
/// let number_box = WidgetClass::new("NumberBox")
///     .extends("Linkable")
///     .properties(SchemaFragment::new().mutable("value", 0.0).mutable("editable", true))
///     .inlet("value", ValueKind::Number)
///     .outlet("value", ValueKind::Number);
/// assert_eq!(number_box.name(), "NumberBox");
/// ```
pub struct WidgetClass {
    name: String,
    parent: Option<String>,
    properties: SchemaFragment,
    hooks: HookSet,
    behavior: Option<BehaviorFactory>,
}

impl fmt::Debug for WidgetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetClass")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("properties", &self.properties)
            .field("hooks", &self.hooks)
            .field("behavior", &self.behavior.is_some())
            .finish()
    }
}

impl WidgetClass {
    /// A root class with no properties, hooks, or behavior.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            properties: SchemaFragment::new(),
            hooks: HookSet::new(),
            behavior: None,
        }
    }

    /// Inherits from the class registered as `parent`.
    #[must_use]
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// This class's own property declarations.
    #[must_use]
    pub fn properties(mut self, properties: SchemaFragment) -> Self {
        self.properties = properties;
        self
    }

    /// Declares an inlet.
    #[must_use]
    pub fn inlet(mut self, name: impl Into<String>, kind: ValueKind) -> Self {
        self.hooks = self.hooks.declare(Direction::Inlet, name, kind);
        self
    }

    /// Declares an outlet.
    #[must_use]
    pub fn outlet(mut self, name: impl Into<String>, kind: ValueKind) -> Self {
        self.hooks = self.hooks.declare(Direction::Outlet, name, kind);
        self
    }

    /// Gives the class a behavior. Without one, the parent's is used.
    #[must_use]
    pub fn behavior<F, B>(mut self, factory: F) -> Self
    where
        F: Fn() -> B + 'static,
        B: Behavior + 'static,
    {
        self.behavior = Some(Rc::new(move || Box::new(factory()) as Box<dyn Behavior>));
        self
    }

    /// Class name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent class name.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }
}

struct ClassInfo {
    hooks: HookSet,
    behavior: Option<BehaviorFactory>,
}

/// Every registered widget class, with resolved schemas and hooks.
#[derive(Default)]
pub struct ClassCatalog {
    registry: SchemaRegistry,
    /// Indexed by [`ClassId::index`].
    info: Vec<ClassInfo>,
}

impl fmt::Debug for ClassCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassCatalog")
            .field("registry", &self.registry)
            .field("classes", &self.info.len())
            .finish_non_exhaustive()
    }
}

impl ClassCatalog {
    /// An empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `class` on top of its parent.
    ///
    /// Fails if the name is taken, the parent is unknown, the schema does
    /// not compose onto the parent's, or an inlet (own or inherited) is not a
    /// mutable property of the resolved schema.
    pub fn register(&mut self, class: WidgetClass) -> Result<ClassId, DiagramError> {
        if self.registry.by_name(&class.name).is_some() {
            return Err(RegistryError::DuplicateClass(class.name).into());
        }
        let parent = match &class.parent {
            Some(name) => Some(
                self.registry
                    .by_name(name)
                    .ok_or_else(|| DiagramError::UnknownClass(name.clone()))?,
            ),
            None => None,
        };
        let (hooks, behavior) = match parent.and_then(|p| self.info.get(p.index())) {
            Some(inherited) => (
                class.hooks.inherit(&inherited.hooks),
                class.behavior.or_else(|| inherited.behavior.clone()),
            ),
            None => (class.hooks, class.behavior),
        };
        // The registry keeps whatever it accepts, so inlets are checked first.
        // A schema that does not compose is reported by `register` below.
        let parent_schema = parent.and_then(|p| self.registry.schema(p));
        if let Ok(schema) = resolve(&class.name, parent_schema.map(|s| &**s), &class.properties) {
            check_inlets(&class.name, &schema, &hooks)?;
        }
        let id = self
            .registry
            .register(&class.name, parent, &class.properties)?;

        debug_assert_eq!(id.index(), self.info.len(), "class ids are dense");
        self.info.push(ClassInfo { hooks, behavior });
        tracing::debug!(class = %class.name, "widget class registered");
        Ok(id)
    }

    /// Looks up a class by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<ClassId> {
        self.registry.by_name(name)
    }

    /// Name of a class.
    #[must_use]
    pub fn name(&self, id: ClassId) -> Option<&str> {
        self.registry.name(id)
    }

    /// Resolved schema of a class.
    #[must_use]
    pub fn schema(&self, id: ClassId) -> Option<&Rc<FlatSchema>> {
        self.registry.schema(id)
    }

    /// Resolved hooks of a class, parent hooks first.
    #[must_use]
    pub fn hooks(&self, id: ClassId) -> Option<&HookSet> {
        self.info.get(id.index()).map(|i| &i.hooks)
    }

    /// The underlying schema registry.
    #[must_use]
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Names of `id` and its ancestors, root first.
    #[must_use]
    pub fn hierarchy(&self, id: ClassId) -> Vec<&str> {
        self.registry.hierarchy_names(id)
    }

    pub(crate) fn make_behavior(&self, id: ClassId) -> Option<Box<dyn Behavior>> {
        self.info
            .get(id.index())
            .and_then(|i| i.behavior.as_ref())
            .map(|factory| factory())
    }
}

fn check_inlets(class: &str, schema: &FlatSchema, hooks: &HookSet) -> Result<(), DiagramError> {
    for decl in hooks.inlets() {
        let found = schema.mutability(&decl.name);
        if found != Some(Mutability::Mutable) {
            return Err(DiagramError::InletNotWritable {
                class: class.into(),
                inlet: decl.name.clone(),
                found,
            });
        }
    }
    Ok(())
}
