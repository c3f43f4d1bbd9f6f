// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cooperative play/pause driver for timed behaviors.

use tangle_property::{Args, UpdateOutcome};

use crate::diagram::Diagram;
use crate::entity::EntityId;

/// Advances one numeric property of a widget over time.
///
/// The driving control (a play/pause button) is disabled from the moment it
/// is pressed until the transition it started has [settled](Self::settle).
/// Presses in between are ignored, so ticks never overlap.
///
/// ```
/// use tangle_diagram::{Diagram, Ticker, WidgetClass};
/// use tangle_property::{Args, SchemaFragment, Value};
///
/// let mut diagram = Diagram::default();
/// diagram
///     .register(WidgetClass::new("Clock").properties(SchemaFragment::new().mutable("t", 0.0)))
///     .unwrap();
/// let clock = diagram.spawn("Clock", &Args::new()).unwrap();
///
/// let mut ticker = Ticker::new(clock, "t", 2.0);
/// assert!(ticker.press());
/// assert!(!ticker.press(), "ignored until settled");
/// ticker.settle();
///
/// ticker.tick(&mut diagram, 0.5);
/// assert_eq!(diagram.value(clock, "t"), Value::Number(1.0));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Ticker {
    target: EntityId,
    property: String,
    /// Units per second.
    rate: f64,
    limit: Option<f64>,
    playing: bool,
    enabled: bool,
}

impl Ticker {
    /// A paused ticker advancing `property` of `target` by `rate` per second.
    #[must_use]
    pub fn new(target: EntityId, property: impl Into<String>, rate: f64) -> Self {
        Self {
            target,
            property: property.into(),
            rate,
            limit: None,
            playing: false,
            enabled: true,
        }
    }

    /// Pauses automatically once the property reaches `limit`.
    #[must_use]
    pub fn with_limit(mut self, limit: f64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns `true` while playing.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Returns `true` if the control accepts presses.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Toggles play/pause and disables the control.
    ///
    /// Returns `false`, doing nothing, while the control is disabled.
    pub fn press(&mut self) -> bool {
        if !self.enabled {
            tracing::debug!(target_entity = %self.target, "press ignored while transitioning");
            return false;
        }
        self.playing = !self.playing;
        self.enabled = false;
        true
    }

    /// The transition started by the last press finished.
    pub fn settle(&mut self) {
        self.enabled = true;
    }

    /// Advances by `dt` seconds while playing.
    ///
    /// Returns `None` when paused or when the property is not a number.
    pub fn tick(&mut self, diagram: &mut Diagram, dt: f64) -> Option<UpdateOutcome> {
        if !self.playing {
            return None;
        }
        let current = diagram.value(self.target, &self.property).as_number()?;
        let mut next = current + self.rate * dt;
        if let Some(limit) = self.limit {
            let reached = if self.rate >= 0.0 {
                next >= limit
            } else {
                next <= limit
            };
            if reached {
                next = limit;
                self.playing = false;
            }
        }
        Some(diagram.apply_update(self.target, &Args::one(self.property.clone(), next)))
    }
}

#[cfg(test)]
mod tests {
    use tangle_property::{SchemaFragment, Value};

    use super::*;
    use crate::WidgetClass;

    fn clock() -> (Diagram, EntityId) {
        let mut diagram = Diagram::default();
        diagram
            .register(WidgetClass::new("Clock").properties(SchemaFragment::new().mutable("t", 0.0)))
            .unwrap();
        let id = diagram.spawn("Clock", &Args::new()).unwrap();
        (diagram, id)
    }

    #[test]
    fn paused_ticker_does_nothing() {
        let (mut diagram, id) = clock();
        let mut ticker = Ticker::new(id, "t", 1.0);
        assert!(ticker.tick(&mut diagram, 1.0).is_none());
        assert_eq!(diagram.value(id, "t"), Value::Number(0.0));
    }

    #[test]
    fn pause_needs_a_settled_control() {
        let (mut diagram, id) = clock();
        let mut ticker = Ticker::new(id, "t", 1.0);
        ticker.press();
        assert!(!ticker.is_enabled());
        assert!(!ticker.press());
        assert!(ticker.is_playing());

        ticker.tick(&mut diagram, 1.0);
        ticker.settle();
        assert!(ticker.press());
        assert!(!ticker.is_playing());
        assert!(ticker.tick(&mut diagram, 1.0).is_none());
        assert_eq!(diagram.value(id, "t"), Value::Number(1.0));
    }

    #[test]
    fn limit_clamps_and_pauses() {
        let (mut diagram, id) = clock();
        let mut ticker = Ticker::new(id, "t", 4.0).with_limit(5.0);
        ticker.press();
        ticker.tick(&mut diagram, 1.0);
        ticker.tick(&mut diagram, 1.0);
        assert_eq!(diagram.value(id, "t"), Value::Number(5.0));
        assert!(!ticker.is_playing());
    }

    #[test]
    fn non_numeric_property_is_skipped() {
        let (mut diagram, id) = clock();
        let mut ticker = Ticker::new(id, "missing", 1.0);
        ticker.press();
        assert!(ticker.tick(&mut diagram, 1.0).is_none());
    }
}
