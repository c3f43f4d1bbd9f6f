// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tangle Property: class-composed property schemas and per-instance state.
//!
//! This crate provides the property half of a diagram widget engine. Every
//! widget class declares its properties with a default value and a
//! [`Mutability`] level; the declarations of a class are composed onto those
//! of its parent once, when the class is registered, and the composed schema
//! is shared by every instance.
//!
//! ## Core Concepts
//!
//! ### Mutability levels
//!
//! - **readonly** - fixed at the declaring class; no subclass may redeclare it
//! - **immutable** - subclasses may re-default it, instances fix it at construction
//! - **mutable** - may be re-defaulted and updated at any time
//!
//! Subclasses may narrow a level (mutable → immutable) but never widen it.
//! Violations are [`SchemaCompositionError`]s, raised by [`resolve`] when the
//! class is composed, not when an instance is built.
//!
//! ### Instance state
//!
//! [`EntityState`] seeds its values from the schema, applies construction
//! arguments in one privileged pass, then validates each later write. Bad
//! writes are dropped and logged, never fatal. Composite values are stored
//! by value; opaque values follow their own [`ErasedValue`] tag.
//!
//! ## Quick Start
//!
//! ```rust
//! use tangle_property::{Args, EntityState, SchemaFragment, SchemaRegistry, Value};
//!
//! let mut registry = SchemaRegistry::new();
//! let mobject = registry
//!     .register(
//!         "Mobject",
//!         None,
//!         &SchemaFragment::new()
//!             .readonly("screen_event_handler", "self")
//!             .mutable("visible", true),
//!     )
//!     .unwrap();
//! let operator_box = registry
//!     .register(
//!         "BinaryOperatorBox",
//!         Some(mobject),
//!         &SchemaFragment::new()
//!             .immutable("operator", "+")
//!             .mutable("result", 0.0),
//!     )
//!     .unwrap();
//!
//! let schema = registry.schema(operator_box).unwrap().clone();
//! let mut state = EntityState::construct(schema, &Args::new());
//! assert_eq!(state.get("operator"), Some(&Value::from("+")));
//!
//! // Fixed after construction: the write is dropped, the call does not fail.
//! let outcome = state.update(&Args::one("operator", "-"));
//! assert!(outcome.was_rejected("operator"));
//! assert_eq!(state.get("operator"), Some(&Value::from("+")));
//! ```
//!
//! ## Logging
//!
//! Rejected writes are reported through `tracing` at `warn` level. The crate
//! never installs a subscriber.

mod args;
mod error;
mod mutability;
mod registry;
mod schema;
mod state;
mod value;

pub use args::Args;
pub use error::{MutabilityViolation, RegistryError, SchemaCompositionError, UpdateRejection};
pub use mutability::Mutability;
pub use registry::{ClassId, SchemaRegistry};
pub use schema::{FlatSchema, PropertyDecl, SchemaEntry, SchemaFragment, resolve};
pub use state::{EntityState, PropertyChange, UpdateOutcome, WriteOrigin};
pub use value::{ErasedValue, Rgba, Value, ValueKind};

pub use kurbo::{Point, Rect, Vec2};
