// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hook geometry.
//!
//! Inlets sit in a row just above a widget, outlets in a row just below it.
//! Positions are in link-map coordinates, the frame pointer events arrive in.

use kurbo::Point;

use crate::hook::Direction;

/// Vertical gap between a widget and its rows of hooks.
pub const IO_LIST_OFFSET: f64 = 10.0;
/// Horizontal inset of the first hook from the widget's anchor.
pub const HOOK_INSET_X: f64 = 15.0;
/// Horizontal distance between neighboring hooks.
pub const HOOK_HORIZONTAL_SPACING: f64 = 22.0;
/// Radius of a drawn hook.
pub const HOOK_RADIUS: f64 = 9.0;
/// Radius of a drawn link bullet.
pub const BULLET_RADIUS: f64 = 7.0;
/// Default snap radius around hooks and bullets.
pub const SNAPPING_DISTANCE: f64 = 10.0;

/// Position of the `index`-th hook of `direction` on a widget whose top-left
/// corner is `anchor` and whose height is `height`.
///
/// ```
/// use kurbo::Point;
/// use tangle_link::{Direction, hook_position};
///
/// let anchor = Point::new(100.0, 200.0);
/// assert_eq!(hook_position(anchor, 40.0, Direction::Inlet, 0), Point::new(115.0, 190.0));
/// assert_eq!(hook_position(anchor, 40.0, Direction::Outlet, 1), Point::new(137.0, 250.0));
/// ```
#[must_use]
pub fn hook_position(anchor: Point, height: f64, direction: Direction, index: usize) -> Point {
    let x = anchor.x + HOOK_INSET_X + HOOK_HORIZONTAL_SPACING * index as f64;
    let y = match direction {
        Direction::Inlet => anchor.y - IO_LIST_OFFSET,
        Direction::Outlet => anchor.y + height + IO_LIST_OFFSET,
    };
    Point::new(x, y)
}

/// Returns `true` if `a` and `b` are at most `distance` apart.
#[must_use]
#[inline]
pub fn close_to(a: Point, b: Point, distance: f64) -> bool {
    a.distance_squared(b) <= distance * distance
}
