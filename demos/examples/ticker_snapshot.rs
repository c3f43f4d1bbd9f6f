// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animating a property with a ticker, then saving and restoring the diagram.
//!
//! Run:
//! - `cargo run -p tangle_demos --example ticker_snapshot`

use tangle_diagram::{
    Diagram, DiagramConfig, DiagramError, DiagramSnapshot, Ticker, WidgetClass,
};
use tangle_dirty::Slot;
use tangle_link::HookAddr;
use tangle_property::{Args, SchemaFragment, ValueKind};
use tracing_subscriber::EnvFilter;

fn catalogue(diagram: &mut Diagram) -> Result<(), DiagramError> {
    diagram.register(
        WidgetClass::new("Clock")
            .properties(SchemaFragment::new().mutable("t", 0.0).mutable("phase", 0.0))
            .outlet("t", ValueKind::Number),
    )?;
    diagram.register(
        WidgetClass::new("Gauge")
            .properties(SchemaFragment::new().mutable("level", 0.0))
            .inlet("level", ValueKind::Number),
    )?;
    Ok(())
}

fn main() -> Result<(), DiagramError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = DiagramConfig::from_json(r#"{ "max_propagation_depth": 16, "record_trace": true }"#)?;
    let mut diagram = Diagram::new(config);
    catalogue(&mut diagram)?;

    let clock = diagram.spawn("Clock", &Args::new())?;
    let gauge = diagram.spawn("Gauge", &Args::new())?;
    diagram.add_dependency(clock, "t", clock, Slot::property("phase"))?;
    diagram.connect(&HookAddr::outlet(clock, "t"), &HookAddr::inlet(gauge, "level"))?;

    let mut ticker = Ticker::new(clock, "t", 4.0).with_limit(3.0);
    ticker.press();
    ticker.settle();
    while ticker.is_playing() {
        ticker.tick(&mut diagram, 0.25);
        tracing::info!(t = %diagram.value(clock, "t"), level = %diagram.value(gauge, "level"), "tick");
    }

    if let Some(trace) = diagram.trace() {
        tracing::info!(fired = trace.len(), deepest = trace.max_depth(), "trace");
    }

    let json = diagram.snapshot().to_json()?;
    tracing::info!(%json, "saved");

    let mut restored = Diagram::default();
    catalogue(&mut restored)?;
    let ids = restored.restore(&DiagramSnapshot::from_json(&json)?)?;
    if let Some(&new_gauge) = ids.get(&gauge) {
        tracing::info!(
            level = %restored.value(new_gauge, "level"),
            links = restored.links().links().count(),
            "restored"
        );
    }
    Ok(())
}
