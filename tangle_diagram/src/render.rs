// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The rendering collaborator.

use core::cell::RefCell;
use core::fmt;
use std::rc::Rc;

use crate::entity::EntityId;

/// Widgets to redraw after one top-level update.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RedrawBatch {
    /// Increments once per batch handed off.
    pub generation: u64,
    /// Widgets whose properties changed, in the order they first changed.
    pub entities: Vec<EntityId>,
}

/// Receives redraw requests. Drawing itself is up to the implementor.
pub trait Renderer: fmt::Debug {
    /// Called at most once per top-level update, never with an empty batch.
    fn redraw(&mut self, batch: &RedrawBatch);
}

/// Discards every batch.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn redraw(&mut self, _batch: &RedrawBatch) {}
}

/// Keeps every batch it receives.
///
/// Clones share one log, so a clone kept outside the diagram sees what the
/// diagram's copy received.
///
/// ```
/// use tangle_diagram::{Diagram, DiagramConfig, RedrawLog};
///
/// let log = RedrawLog::default();
/// let diagram = Diagram::with_renderer(DiagramConfig::default(), log.clone());
/// assert!(log.is_empty());
/// # drop(diagram);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RedrawLog {
    batches: Rc<RefCell<Vec<RedrawBatch>>>,
}

impl RedrawLog {
    /// Copies of all batches received so far.
    #[must_use]
    pub fn batches(&self) -> Vec<RedrawBatch> {
        self.batches.borrow().clone()
    }

    /// Removes and returns all batches received so far.
    pub fn take(&self) -> Vec<RedrawBatch> {
        core::mem::take(&mut *self.batches.borrow_mut())
    }

    /// Number of batches received.
    #[must_use]
    pub fn len(&self) -> usize {
        self.batches.borrow().len()
    }

    /// Returns `true` if no batch was received.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.batches.borrow().is_empty()
    }
}

impl Renderer for RedrawLog {
    fn redraw(&mut self, batch: &RedrawBatch) {
        self.batches.borrow_mut().push(batch.clone());
    }
}
