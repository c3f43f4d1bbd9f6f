// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-instance property state.
//!
//! [`EntityState`] holds the live values of one instance. Declared
//! properties are stored densely, in schema order, next to a shared handle
//! to the class schema. Keys the schema does not know are kept in a small
//! sorted side table, the way they arrive in updates.
//!
//! # Write rules
//!
//! - Construction is the one privileged pass: every declared property,
//!   whatever its level, may take its value from the construction arguments.
//! - Afterwards only `mutable` properties accept writes. Other writes are
//!   dropped with a warning and reported in [`UpdateOutcome::rejected`].
//! - A property driven by an attached link rejects [`WriteOrigin::Local`]
//!   writes until the link is detached.
//! - Writing a value equal to the current one succeeds but is reported as
//!   unchanged, so nothing downstream fires for it.

use std::rc::Rc;

use smallvec::SmallVec;

use crate::args::Args;
use crate::error::{MutabilityViolation, UpdateRejection};
use crate::mutability::Mutability;
use crate::schema::FlatSchema;
use crate::value::Value;

/// Where a write comes from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum WriteOrigin {
    /// The instance's own interface, e.g. a user typing into a box.
    #[default]
    Local,
    /// An internal dependency edge or a recomputation.
    Internal,
    /// An attached link pushing an outlet value.
    Link,
}

/// One accepted key of an update.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyChange {
    /// The property written.
    pub property: String,
    /// Its value before the write.
    pub old: Value,
    /// `false` if the new value equals the old one.
    pub changed: bool,
}

/// Result of applying an update to one instance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateOutcome {
    /// Accepted keys, in update order.
    pub changes: Vec<PropertyChange>,
    /// Dropped keys, in update order.
    pub rejected: Vec<UpdateRejection>,
}

impl UpdateOutcome {
    /// Names of the properties whose value actually changed.
    pub fn changed_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.changes
            .iter()
            .filter(|c| c.changed)
            .map(|c| c.property.as_str())
    }

    /// Returns `true` if any property changed value.
    #[must_use]
    pub fn any_changed(&self) -> bool {
        self.changes.iter().any(|c| c.changed)
    }

    /// Returns `true` if `property` changed value.
    #[must_use]
    pub fn changed(&self, property: &str) -> bool {
        self.changes
            .iter()
            .any(|c| c.changed && c.property == property)
    }

    /// Returns `true` if `property` was rejected.
    #[must_use]
    pub fn was_rejected(&self, property: &str) -> bool {
        self.rejected.iter().any(|r| r.property() == property)
    }

    /// Appends the changes and rejections of `other`.
    pub fn merge(&mut self, other: Self) {
        self.changes.extend(other.changes);
        self.rejected.extend(other.rejected);
    }
}

/// The live property values of one instance.
///
/// # Example
///
/// ```rust
/// use std::rc::Rc;
/// use tangle_property::{resolve, Args, EntityState, SchemaFragment, Value};
///
/// let schema = Rc::new(
///     resolve(
///         "BinaryOperatorBox",
///         None,
///         &SchemaFragment::new().immutable("operator", "+").mutable("result", 0.0),
///     )
///     .unwrap(),
/// );
///
/// let mut minus = EntityState::construct(Rc::clone(&schema), &Args::one("operator", "-"));
/// assert_eq!(minus.get("operator"), Some(&Value::from("-")));
///
/// let outcome = minus.update(&Args::new().with("operator", "*").with("result", 3.0));
/// assert_eq!(minus.get("operator"), Some(&Value::from("-")));
/// assert_eq!(minus.get("result"), Some(&Value::Number(3.0)));
/// assert!(outcome.was_rejected("operator"));
/// assert!(outcome.changed("result"));
/// ```
#[derive(Clone, Debug)]
pub struct EntityState {
    schema: Rc<FlatSchema>,
    /// Values of declared properties, in schema order.
    values: Vec<Value>,
    /// Undeclared keys, sorted by name for binary search lookup.
    extras: SmallVec<[(String, Value); 4]>,
    /// Properties currently driven by a link.
    link_owned: SmallVec<[String; 2]>,
}

impl EntityState {
    /// Seeds every property from `schema`, then applies `args` as the
    /// privileged construction pass.
    #[must_use]
    pub fn construct(schema: Rc<FlatSchema>, args: &Args) -> Self {
        let values = schema
            .entries()
            .iter()
            .map(|e| e.decl.default.assign())
            .collect();
        let mut state = Self {
            schema,
            values,
            extras: SmallVec::new(),
            link_owned: SmallVec::new(),
        };
        for (name, value) in args.iter() {
            state.store(name, value);
        }
        state
    }

    /// The shared class schema.
    #[must_use]
    pub fn schema(&self) -> &Rc<FlatSchema> {
        &self.schema
    }

    /// Name of the class this state was constructed for.
    #[must_use]
    pub fn class_name(&self) -> &str {
        self.schema.class()
    }

    /// Returns the value of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self.schema.index_of(name) {
            Some(i) => self.values.get(i),
            None => self
                .find_extra(name)
                .ok()
                .map(|i| &self.extras[i].1),
        }
    }

    /// Returns the value of `name`, or [`Value::Null`] if it is absent.
    #[must_use]
    pub fn value(&self, name: &str) -> Value {
        self.get(name).cloned().unwrap_or_default()
    }

    /// Returns `true` if `name` has a value.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Effective level of `name`. Undeclared keys are mutable.
    #[must_use]
    pub fn mutability(&self, name: &str) -> Option<Mutability> {
        self.schema.mutability(name).or_else(|| {
            self.find_extra(name)
                .ok()
                .map(|_| Mutability::Mutable)
        })
    }

    /// Whether the instance's own interface may edit `name`: it is mutable
    /// and no link currently drives it.
    #[must_use]
    pub fn is_locally_editable(&self, name: &str) -> bool {
        self.mutability(name).is_some_and(Mutability::is_mutable) && !self.is_link_owned(name)
    }

    /// Marks `name` as driven by a link, or releases it.
    ///
    /// Returns the previous ownership.
    pub fn set_link_owned(&mut self, name: &str, owned: bool) -> bool {
        let pos = self.link_owned.iter().position(|k| k == name);
        match (pos, owned) {
            (Some(_), true) => true,
            (Some(i), false) => {
                self.link_owned.remove(i);
                true
            }
            (None, true) => {
                self.link_owned.push(name.into());
                false
            }
            (None, false) => false,
        }
    }

    /// Returns `true` if a link drives `name`.
    #[must_use]
    pub fn is_link_owned(&self, name: &str) -> bool {
        self.link_owned.iter().any(|k| k == name)
    }

    /// Applies a local update.
    pub fn update(&mut self, args: &Args) -> UpdateOutcome {
        self.update_from(WriteOrigin::Local, args)
    }

    /// Applies an update from `origin`, key by key.
    ///
    /// Rejected keys are dropped and logged; every other key proceeds.
    pub fn update_from(&mut self, origin: WriteOrigin, args: &Args) -> UpdateOutcome {
        let mut outcome = UpdateOutcome::default();
        for (name, value) in args.iter() {
            match self.check_write(origin, name) {
                Ok(()) => outcome.changes.push(self.store(name, value)),
                Err(rejection) => {
                    tracing::warn!(
                        class = %self.schema.class(),
                        property = %name,
                        ?origin,
                        "{rejection}"
                    );
                    outcome.rejected.push(rejection);
                }
            }
        }
        outcome
    }

    /// Copies every mutable property of `other` into this state.
    ///
    /// Values are assigned, so copy-on-assign values are duplicated.
    pub fn copy_from(&mut self, other: &Self) -> UpdateOutcome {
        let args: Args = other
            .iter()
            .filter(|(name, _)| other.mutability(name).is_some_and(Mutability::is_mutable))
            .map(|(name, value)| (name.to_owned(), value.clone()))
            .collect();
        self.update_from(WriteOrigin::Internal, &args)
    }

    /// Iterates over all properties: declared ones in schema order, then
    /// undeclared ones by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.schema
            .names()
            .zip(self.values.iter())
            .chain(self.extras.iter().map(|(k, v)| (k.as_str(), v)))
    }

    /// All properties as an argument list.
    #[must_use]
    pub fn to_args(&self) -> Args {
        self.iter()
            .map(|(k, v)| (k.to_owned(), v.clone()))
            .collect()
    }

    /// Number of properties, declared and undeclared.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len() + self.extras.len()
    }

    /// Returns `true` if the state holds no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_write(&self, origin: WriteOrigin, name: &str) -> Result<(), UpdateRejection> {
        if let Some(mutability) = self.schema.mutability(name)
            && !mutability.is_mutable()
        {
            return Err(MutabilityViolation {
                property: name.into(),
                mutability,
            }
            .into());
        }
        if origin == WriteOrigin::Local && self.is_link_owned(name) {
            return Err(UpdateRejection::LinkOwned {
                property: name.into(),
            });
        }
        Ok(())
    }

    #[inline]
    fn find_extra(&self, name: &str) -> Result<usize, usize> {
        self.extras
            .binary_search_by(|(k, _)| k.as_str().cmp(name))
    }

    fn store(&mut self, name: &str, value: &Value) -> PropertyChange {
        let new = value.assign();
        let old = match self.schema.index_of(name) {
            Some(i) => std::mem::replace(&mut self.values[i], new),
            None => match self.find_extra(name) {
                Ok(i) => std::mem::replace(&mut self.extras[i].1, new),
                Err(i) => {
                    self.extras.insert(i, (name.into(), new));
                    return PropertyChange {
                        property: name.into(),
                        old: Value::Null,
                        changed: true,
                    };
                }
            },
        };
        let changed = self.get(name) != Some(&old);
        PropertyChange {
            property: name.into(),
            old,
            changed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SchemaFragment, resolve};
    use crate::value::ErasedValue;
    use kurbo::Vec2;
    use std::cell::Cell;

    fn schema() -> Rc<FlatSchema> {
        Rc::new(
            resolve(
                "Slider",
                None,
                &SchemaFragment::new()
                    .readonly("kind", "slider")
                    .immutable("track_length", 100.0)
                    .mutable("value", 0.0)
                    .mutable("offset", Vec2::ZERO),
            )
            .unwrap(),
        )
    }

    #[test]
    fn construction_may_set_every_level() {
        let state = EntityState::construct(
            schema(),
            &Args::new()
                .with("kind", "knob")
                .with("track_length", 200.0)
                .with("value", 3.0),
        );
        assert_eq!(state.get("kind"), Some(&Value::from("knob")));
        assert_eq!(state.get("track_length"), Some(&Value::Number(200.0)));
        assert_eq!(state.get("value"), Some(&Value::Number(3.0)));
    }

    #[test]
    fn later_writes_to_fixed_levels_are_rejected_without_aborting() {
        let mut state = EntityState::construct(schema(), &Args::new());
        let outcome = state.update(
            &Args::new()
                .with("kind", "other")
                .with("value", 5.0)
                .with("track_length", 1.0),
        );

        assert_eq!(state.get("kind"), Some(&Value::from("slider")));
        assert_eq!(state.get("track_length"), Some(&Value::Number(100.0)));
        assert_eq!(state.get("value"), Some(&Value::Number(5.0)));
        assert_eq!(outcome.rejected.len(), 2);
        assert_eq!(
            outcome.rejected[0],
            UpdateRejection::Mutability(MutabilityViolation {
                property: "kind".into(),
                mutability: Mutability::Readonly,
            })
        );
        assert_eq!(outcome.changed_keys().collect::<Vec<_>>(), ["value"]);
    }

    #[test]
    fn internal_and_link_writes_obey_class_levels_too() {
        let mut state = EntityState::construct(schema(), &Args::new());
        for origin in [WriteOrigin::Internal, WriteOrigin::Link] {
            let outcome = state.update_from(origin, &Args::one("track_length", 5.0));
            assert!(outcome.was_rejected("track_length"));
        }
    }

    #[test]
    fn unchanged_writes_are_accepted_but_flagged() {
        let mut state = EntityState::construct(schema(), &Args::one("value", 2.0));
        let outcome = state.update(&Args::one("value", 2.0));
        assert_eq!(outcome.changes.len(), 1);
        assert!(!outcome.changes[0].changed);
        assert!(!outcome.any_changed());
    }

    #[test]
    fn undeclared_keys_are_appended() {
        let mut state = EntityState::construct(schema(), &Args::new());
        let outcome = state.update(&Args::new().with("zeta", 1.0).with("alpha", true));
        assert!(outcome.changed("zeta"));
        assert_eq!(outcome.changes[0].old, Value::Null);
        assert_eq!(state.mutability("alpha"), Some(Mutability::Mutable));
        let names: Vec<_> = state.iter().map(|(k, _)| k).collect();
        assert_eq!(
            names,
            ["kind", "track_length", "value", "offset", "alpha", "zeta"]
        );
        assert_eq!(state.len(), 6);
    }

    #[test]
    fn link_ownership_blocks_local_writes_only() {
        let mut state = EntityState::construct(schema(), &Args::new());
        assert!(state.is_locally_editable("value"));
        assert!(!state.set_link_owned("value", true));
        assert!(!state.is_locally_editable("value"));

        let local = state.update(&Args::one("value", 4.0));
        assert_eq!(
            local.rejected,
            [UpdateRejection::LinkOwned {
                property: "value".into()
            }]
        );
        assert_eq!(state.get("value"), Some(&Value::Number(0.0)));

        let pushed = state.update_from(WriteOrigin::Link, &Args::one("value", 4.0));
        assert!(pushed.changed("value"));

        assert!(state.set_link_owned("value", false));
        assert!(state.is_locally_editable("value"));
        assert!(!state.is_locally_editable("track_length"));
        assert!(!state.is_locally_editable("missing"));
    }

    #[test]
    fn copy_on_assign_values_are_not_aliased() {
        let a_schema = schema();
        let shared = ErasedValue::by_value(Cell::new(1_i32));
        let mut a = EntityState::construct(Rc::clone(&a_schema), &Args::one("payload", shared));
        let mut b = EntityState::construct(a_schema, &Args::new());

        b.copy_from(&a);
        let in_b = b.get("payload").and_then(Value::as_erased).unwrap();
        in_b.downcast_ref::<Cell<i32>>().unwrap().set(9);

        let in_a = a.get("payload").and_then(Value::as_erased).unwrap();
        assert_eq!(in_a.downcast_ref::<Cell<i32>>().unwrap().get(), 1);

        a.update(&Args::one("offset", Vec2::new(1.0, 1.0)));
        assert_eq!(b.get("offset"), Some(&Value::Vector(Vec2::ZERO)));
    }

    #[test]
    fn copy_from_skips_fixed_properties() {
        let s = schema();
        let source = EntityState::construct(
            Rc::clone(&s),
            &Args::new().with("kind", "knob").with("value", 8.0),
        );
        let mut target = EntityState::construct(s, &Args::new());
        let outcome = target.copy_from(&source);
        assert!(outcome.rejected.is_empty());
        assert_eq!(target.get("kind"), Some(&Value::from("slider")));
        assert_eq!(target.get("value"), Some(&Value::Number(8.0)));
    }

    #[test]
    fn instances_share_one_schema() {
        let s = schema();
        let a = EntityState::construct(Rc::clone(&s), &Args::new());
        let b = EntityState::construct(Rc::clone(&s), &Args::new());
        assert!(Rc::ptr_eq(a.schema(), b.schema()));
        assert_eq!(a.class_name(), "Slider");
    }
}
