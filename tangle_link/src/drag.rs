// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bullet drag state: where a dragged link bullet should be drawn.
//!
//! ## Usage
//!
//! 1) When a bullet is grabbed, call [`DragState::start`] with the pointer
//!    position and the bullet's position at that moment.
//! 2) On each move event, call [`DragState::follow`] to get the bullet's new
//!    position. The bullet keeps its offset to the pointer, so grabbing it
//!    slightly off-center does not make it jump.
//! 3) End the drag with [`DragState::end`].
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use tangle_link::drag::DragState;
//!
//! let mut drag = DragState::default();
//!
//! // Grab a bullet drawn at (100, 50) with the pointer at (103, 52).
//! drag.start(Point::new(103.0, 52.0), Point::new(100.0, 50.0));
//! assert!(drag.is_dragging());
//!
//! // Moving the pointer by (10, -5) moves the bullet by the same amount.
//! let bullet = drag.follow(Point::new(113.0, 47.0)).unwrap();
//! assert_eq!(bullet, Point::new(110.0, 45.0));
//! ```

use kurbo::{Point, Vec2};

/// Tracks one bullet drag.
#[derive(Debug, Clone, Default, Copy)]
pub struct DragState {
    /// Pointer position when the drag started.
    pub start_pos: Option<Point>,
    /// Bullet position when the drag started.
    pub grab_pos: Option<Point>,
}

impl DragState {
    /// Starts a drag with the pointer at `pointer` and the bullet at `bullet`.
    pub fn start(&mut self, pointer: Point, bullet: Point) {
        self.start_pos = Some(pointer);
        self.grab_pos = Some(bullet);
    }

    /// Offset of `current_pos` from the drag start.
    pub fn total_offset(&self, current_pos: Point) -> Option<Vec2> {
        self.start_pos.map(|start| current_pos - start)
    }

    /// Where the bullet is with the pointer at `pos`.
    ///
    /// Positions are absolute, so skipped or coalesced move events do not
    /// accumulate drift.
    pub fn follow(&self, pos: Point) -> Option<Point> {
        let offset = self.total_offset(pos)?;
        self.grab_pos.map(|grab| grab + offset)
    }

    /// Ends the drag and resets state.
    pub fn end(&mut self) {
        *self = Self::default();
    }

    /// Returns `true` while a drag is active.
    pub fn is_dragging(&self) -> bool {
        self.start_pos.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_state_does_not_follow() {
        let drag = DragState::default();
        assert!(!drag.is_dragging());
        assert_eq!(drag.follow(Point::new(1.0, 1.0)), None);
        assert_eq!(drag.total_offset(Point::new(1.0, 1.0)), None);
    }

    #[test]
    fn skipped_moves_do_not_drift() {
        let mut drag = DragState::default();
        drag.start(Point::new(0.0, 0.0), Point::new(2.0, 2.0));

        // Only the latest pointer position matters, not the path taken.
        assert_eq!(drag.follow(Point::new(8.0, 7.0)), Some(Point::new(10.0, 9.0)));
        assert_eq!(
            drag.total_offset(Point::new(8.0, 7.0)),
            Some(Vec2::new(8.0, 7.0))
        );
    }

    #[test]
    fn bullet_keeps_its_grab_offset() {
        let mut drag = DragState::default();
        drag.start(Point::new(20.0, 20.0), Point::new(15.0, 18.0));

        assert_eq!(drag.follow(Point::new(30.0, 10.0)), Some(Point::new(25.0, 8.0)));
        assert_eq!(drag.follow(Point::new(20.0, 20.0)), Some(Point::new(15.0, 18.0)));
    }

    #[test]
    fn restart_replaces_previous_drag() {
        let mut drag = DragState::default();
        drag.start(Point::new(0.0, 0.0), Point::new(0.0, 0.0));
        assert!(drag.follow(Point::new(10.0, 10.0)).is_some());

        drag.start(Point::new(50.0, 60.0), Point::new(40.0, 40.0));
        assert_eq!(drag.start_pos, Some(Point::new(50.0, 60.0)));
        assert_eq!(drag.follow(Point::new(55.0, 65.0)), Some(Point::new(45.0, 45.0)));
    }

    #[test]
    fn end_resets_everything() {
        let mut drag = DragState::default();
        drag.start(Point::new(10.0, 20.0), Point::new(10.0, 20.0));
        drag.end();

        assert!(!drag.is_dragging());
        assert!(drag.grab_pos.is_none());
    }
}
