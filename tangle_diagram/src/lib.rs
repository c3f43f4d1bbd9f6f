// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tangle Diagram: a live dataflow diagram of linkable widgets.
//!
//! This crate ties the pieces together. Widgets are instances of registered
//! [`WidgetClass`]es, each with a schema-governed property state, a set of
//! typed hooks, and an optional [`Behavior`]. Widgets influence each other
//! in two ways:
//!
//! - **Internal dependencies**, registered by code: "this property of me
//!   drives that property (or recomputation) of my child".
//! - **Links**, drawn by the user: an outlet of one widget drives an inlet
//!   of another.
//!
//! [`Diagram::apply_update`] writes one widget and brings everything
//! downstream up to date before returning. Redraw requests are batched, one
//! [`RedrawBatch`] per top-level update, and handed to a [`Renderer`].
//! Structural edits requested while an update is in flight
//! ([`StructuralEdit`]) wait until it has finished.
//!
//! ## Quick Start
//!
//! ```rust
//! use tangle_diagram::{Behavior, Diagram, RecomputeCx, SetupCx, DiagramError, WidgetClass};
//! use tangle_dirty::Slot;
//! use tangle_link::HookAddr;
//! use tangle_property::{Args, SchemaFragment, Value, ValueKind};
//!
//! #[derive(Debug)]
//! struct Doubler;
//!
//! impl Behavior for Doubler {
//!     fn setup(&mut self, cx: &mut SetupCx<'_>) -> Result<(), DiagramError> {
//!         let me = cx.id();
//!         cx.add_dependency("input", me, Slot::recompute("double"))?;
//!         Ok(())
//!     }
//!
//!     fn recompute(&mut self, _method: &str, cx: &mut RecomputeCx<'_>) -> Args {
//!         let input = cx.value("input").as_number().unwrap_or(0.0);
//!         Args::one("output", input * 2.0)
//!     }
//! }
//!
//! let mut diagram = Diagram::default();
//! diagram
//!     .register(
//!         WidgetClass::new("Source")
//!             .properties(SchemaFragment::new().mutable("value", 0.0))
//!             .outlet("value", ValueKind::Number),
//!     )
//!     .unwrap();
//! diagram
//!     .register(
//!         WidgetClass::new("Doubler")
//!             .properties(SchemaFragment::new().mutable("input", 0.0).mutable("output", 0.0))
//!             .inlet("input", ValueKind::Number)
//!             .behavior(|| Doubler),
//!     )
//!     .unwrap();
//!
//! let source = diagram.spawn("Source", &Args::new()).unwrap();
//! let doubler = diagram.spawn("Doubler", &Args::new()).unwrap();
//! diagram
//!     .connect(&HookAddr::outlet(source, "value"), &HookAddr::inlet(doubler, "input"))
//!     .unwrap();
//!
//! diagram.apply_update(source, &Args::one("value", 21.0));
//! assert_eq!(diagram.value(doubler, "output"), Value::Number(42.0));
//!
//! // The link owns the inlet now.
//! assert!(!diagram.is_locally_editable(doubler, "input"));
//! ```
//!
//! ## Cycles
//!
//! Internal dependencies that would close a loop are refused when they are
//! registered ([`DiagramError::Cycle`]). Loops the table cannot see, such as
//! a recomputation writing a property that drives it again, are cut off at
//! run time by [`DiagramConfig::max_propagation_depth`].

mod behavior;
mod class;
mod config;
mod diagram;
mod edit;
mod entity;
mod error;
mod pointer;
mod propagate;
mod render;
mod snapshot;
mod ticker;

pub use behavior::{Behavior, BehaviorFactory, RecomputeCx, SetupCx};
pub use class::{ClassCatalog, WidgetClass};
pub use config::DiagramConfig;
pub use diagram::{ANCHOR, Diagram, HEIGHT};
pub use edit::StructuralEdit;
pub use entity::EntityId;
pub use error::DiagramError;
pub use pointer::{PointerEvent, PointerOutcome};
pub use render::{NullRenderer, RedrawBatch, RedrawLog, Renderer};
pub use snapshot::{DiagramSnapshot, LinkSnapshot, WidgetSnapshot};
pub use ticker::Ticker;
