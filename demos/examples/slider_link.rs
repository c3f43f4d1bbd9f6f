// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dragging a link from a slider into a number box.
//!
//! A slider's `value` outlet is linked to a number box's `value` inlet with
//! pointer events alone. Moving the slider then drives the number box, whose
//! text field is disabled for as long as the link holds it.
//!
//! Run:
//! - `cargo run -p tangle_demos --example slider_link`
//! - `RUST_LOG=debug cargo run -p tangle_demos --example slider_link` to see
//!   every fired edge and link transition.

use kurbo::Point;
use tangle_diagram::{
    Behavior, Diagram, DiagramConfig, DiagramError, EntityId, PointerEvent, RecomputeCx,
    RedrawBatch, Renderer, SetupCx, WidgetClass,
};
use tangle_dirty::Slot;
use tangle_link::{HookAddr, LinkEnds};
use tangle_property::{Args, SchemaFragment, ValueKind};
use tracing_subscriber::EnvFilter;

/// Logs every batch instead of drawing it.
#[derive(Debug, Default)]
struct LogRenderer;

impl Renderer for LogRenderer {
    fn redraw(&mut self, batch: &RedrawBatch) {
        tracing::info!(
            generation = batch.generation,
            widgets = batch.entities.len(),
            "redraw"
        );
    }
}

#[derive(Debug)]
struct Slider;

impl Behavior for Slider {
    fn setup(&mut self, cx: &mut SetupCx<'_>) -> Result<(), DiagramError> {
        let me = cx.id();
        cx.add_dependency("position", me, Slot::recompute("value"))?;
        Ok(())
    }

    fn recompute(&mut self, _method: &str, cx: &mut RecomputeCx<'_>) -> Args {
        let num = |name: &str| cx.value(name).as_number().unwrap_or(0.0);
        let track = num("track_length");
        let position = num("position").clamp(0.0, track);
        Args::one("value", num("min") + (num("max") - num("min")) * position / track)
    }
}

#[derive(Debug)]
struct NumberBox;

impl Behavior for NumberBox {
    fn setup(&mut self, cx: &mut SetupCx<'_>) -> Result<(), DiagramError> {
        let me = cx.id();
        cx.add_dependency("value", me, Slot::recompute("format"))?;
        Ok(())
    }

    fn recompute(&mut self, _method: &str, cx: &mut RecomputeCx<'_>) -> Args {
        Args::one("text", cx.value("value").to_string())
    }

    fn link_added(&mut self, this: EntityId, link: &LinkEnds<EntityId>) -> Args {
        Args::one("editable", link.target.owner != this)
    }

    fn link_removed(&mut self, _this: EntityId, _link: &LinkEnds<EntityId>) -> Args {
        Args::one("editable", true)
    }
}

fn main() -> Result<(), DiagramError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut diagram = Diagram::with_renderer(DiagramConfig::default(), LogRenderer);
    diagram.register(WidgetClass::new("Mobject").properties(
        SchemaFragment::new()
            .mutable("anchor", Point::ZERO)
            .mutable("height", 30.0),
    ))?;
    diagram.register(
        WidgetClass::new("Slider")
            .extends("Mobject")
            .properties(
                SchemaFragment::new()
                    .immutable("min", 0.0)
                    .immutable("max", 10.0)
                    .immutable("track_length", 100.0)
                    .mutable("position", 0.0)
                    .mutable("value", 0.0),
            )
            .outlet("value", ValueKind::Number)
            .behavior(|| Slider),
    )?;
    diagram.register(
        WidgetClass::new("NumberBox")
            .extends("Mobject")
            .properties(
                SchemaFragment::new()
                    .mutable("value", 0.0)
                    .mutable("text", "0")
                    .mutable("editable", true),
            )
            .inlet("value", ValueKind::Number)
            .outlet("value", ValueKind::Number)
            .behavior(|| NumberBox),
    )?;

    let slider = diagram.spawn("Slider", &Args::one("anchor", Point::new(0.0, 0.0)))?;
    let number = diagram.spawn("NumberBox", &Args::one("anchor", Point::new(0.0, 120.0)))?;

    let from = HookAddr::outlet(slider, "value");
    let to = HookAddr::inlet(number, "value");
    let (Some(start), Some(end)) = (diagram.hook_position(&from), diagram.hook_position(&to))
    else {
        return Ok(());
    };

    // Press on the outlet, drag halfway, then release next to the inlet.
    let near_inlet = Point::new(end.x + 3.0, end.y - 2.0);
    for event in [
        PointerEvent::Down(start),
        PointerEvent::Move(start.midpoint(end)),
        PointerEvent::Move(near_inlet),
        PointerEvent::Up(near_inlet),
    ] {
        let outcome = diagram.handle_pointer(event);
        if let Some(hook) = &outcome.snapped {
            tracing::info!(%hook, "snapped");
        }
        for link_event in &outcome.events {
            tracing::info!(?link_event, "link");
        }
    }

    for position in [25.0, 70.0, 140.0] {
        diagram.apply_update(slider, &Args::one("position", position));
        tracing::info!(
            slider = %diagram.value(slider, "value"),
            text = %diagram.value(number, "text"),
            editable = %diagram.value(number, "editable"),
            "moved slider to {position}"
        );
    }

    // Local edits to a linked inlet are refused.
    let outcome = diagram.apply_update(number, &Args::one("value", 1.0));
    tracing::info!(rejected = outcome.rejected.len(), "typed into the number box");

    Ok(())
}
