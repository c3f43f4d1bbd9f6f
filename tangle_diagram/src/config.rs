// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagram configuration.

use serde::{Deserialize, Serialize};
use tangle_link::SNAPPING_DISTANCE;

/// Tunables of a [`Diagram`](crate::Diagram).
///
/// Every field has a default, so partial JSON is fine:
///
/// ```
/// use tangle_diagram::DiagramConfig;
///
/// let config = DiagramConfig::from_json(r#"{ "max_propagation_depth": 8 }"#).unwrap();
/// assert_eq!(config.max_propagation_depth, 8);
/// assert_eq!(config.snapping_distance, 10.0);
/// assert!(!config.record_trace);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    /// How deeply updates may nest before further writes are dropped.
    ///
    /// This bounds loops the dependency table cannot see, such as a
    /// recomputation that writes a property which drives it again.
    pub max_propagation_depth: usize,
    /// Hook snap radius, in link-map coordinates.
    pub snapping_distance: f64,
    /// Keep a log of every fired internal edge.
    pub record_trace: bool,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            max_propagation_depth: 64,
            snapping_distance: SNAPPING_DISTANCE,
            record_trace: false,
        }
    }
}

impl DiagramConfig {
    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes this configuration as JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
