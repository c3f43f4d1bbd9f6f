// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Discrete pointer events from the gesture collaborator.

use kurbo::Point;
use tangle_link::{HookAddr, LinkEvent};

use crate::entity::EntityId;

/// One pointer event, already translated into link-map coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PointerEvent {
    /// Button pressed.
    Down(Point),
    /// Pointer moved.
    Move(Point),
    /// Button released.
    Up(Point),
}

impl PointerEvent {
    /// Where the event happened.
    #[must_use]
    pub fn position(self) -> Point {
        match self {
            Self::Down(p) | Self::Move(p) | Self::Up(p) => p,
        }
    }
}

/// What a pointer event did to the links.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointerOutcome {
    /// Link transitions, in the order they were applied.
    pub events: Vec<LinkEvent<EntityId>>,
    /// The hook the dragged bullet snapped to, for hover feedback.
    pub snapped: Option<HookAddr<EntityId>>,
}
