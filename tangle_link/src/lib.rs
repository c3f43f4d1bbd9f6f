// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tangle Link: typed outlet/inlet hooks and the drag-to-link state machine.
//!
//! A widget class declares which of its properties can be read from outside
//! (outlets) and which can be driven from outside (inlets), each with a
//! [`ValueKind`](tangle_property::ValueKind). Every widget instance gets a
//! row of positioned [`Hook`]s for them. The user draws a
//! [`DependencyLink`] by pressing on a hook, dragging, and releasing on a
//! compatible hook of another widget.
//!
//! - **Declarations** ([`HookSet`]): inherited along the class chain, with
//!   subclass hooks replacing parent hooks of the same name.
//! - **Geometry** ([`hook_position`], [`close_to`]): inlets above the widget,
//!   outlets below, snapping within [`SNAPPING_DISTANCE`].
//! - **Links** ([`DependencyLink`], [`LinkState`]): `Dragging → Attached →
//!   Detached`, or `Dragging → Detached` when released elsewhere.
//! - **The map** ([`LinkMap`]): turns pointer events into [`LinkEvent`]s and
//!   enforces the linking rules (opposite directions, different widgets,
//!   compatible types, one link per inlet).
//!
//! The map knows nothing about widget state. Whoever consumes its events
//! locks driven inlets, pushes values across, and tells widgets about links.
//!
//! ## Quick Start
//!
//! ```rust
//! use kurbo::Point;
//! use tangle_link::{HookAddr, HookSet, LinkError, LinkEvent, LinkMap};
//! use tangle_property::ValueKind;
//!
//! let slider = HookSet::new().outlet("value", ValueKind::Number);
//! let label = HookSet::new().inlet("text", ValueKind::Text);
//! let number = HookSet::new().inlet("value", ValueKind::Number);
//!
//! let mut map = LinkMap::<u32>::new();
//! map.register_hooks(1, &slider, Point::new(0.0, 0.0), 30.0);
//! map.register_hooks(2, &label, Point::new(200.0, 0.0), 30.0);
//! map.register_hooks(3, &number, Point::new(0.0, 200.0), 30.0);
//!
//! let out = HookAddr::outlet(1, "value");
//!
//! // Types must agree.
//! let refused = map.connect(&out, &HookAddr::inlet(2, "text"));
//! assert!(matches!(refused, Err(LinkError::TypeMismatch { .. })));
//!
//! // Drag from the slider's outlet onto the number box's inlet.
//! let start = map.hook(&out).unwrap().position;
//! let end = map.hook(&HookAddr::inlet(3, "value")).unwrap().position;
//! map.pointer_down(start);
//! assert_eq!(map.pointer_move(end), Some(HookAddr::inlet(3, "value")));
//! let Some(LinkEvent::Attached(ends)) = map.pointer_up(end) else {
//!     panic!("expected an attached link");
//! };
//! assert_eq!(ends.source, out);
//! assert_eq!(map.link_into(3, "value").map(|e| e.id), Some(ends.id));
//! ```

pub mod drag;

mod error;
mod hook;
mod layout;
mod link;
mod map;

pub use error::LinkError;
pub use hook::{Direction, Hook, HookAddr, HookDecl, HookSet};
pub use layout::{
    BULLET_RADIUS, HOOK_HORIZONTAL_SPACING, HOOK_INSET_X, HOOK_RADIUS, IO_LIST_OFFSET,
    SNAPPING_DISTANCE, close_to, hook_position,
};
pub use link::{DependencyLink, LinkEnds, LinkId, LinkState};
pub use map::{LinkEvent, LinkMap};
