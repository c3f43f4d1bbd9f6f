// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small widget catalogue shared by the integration tests.

#![allow(dead_code, reason = "each test binary uses a different part")]

use tangle_diagram::{
    Behavior, Diagram, DiagramConfig, DiagramError, EntityId, RecomputeCx, RedrawLog, SetupCx,
    StructuralEdit, WidgetClass,
};
use tangle_dirty::Slot;
use tangle_link::LinkEnds;
use tangle_property::{Args, Point, SchemaFragment, Value, ValueKind};

/// Shows a number; its text field is disabled while a link drives it.
#[derive(Debug, Default)]
pub struct NumberBoxBehavior;

impl Behavior for NumberBoxBehavior {
    fn setup(&mut self, cx: &mut SetupCx<'_>) -> Result<(), DiagramError> {
        let me = cx.id();
        cx.add_dependency("value", me, Slot::recompute("format"))?;
        Ok(())
    }

    fn recompute(&mut self, _method: &str, cx: &mut RecomputeCx<'_>) -> Args {
        Args::one("text", cx.value("value").to_string())
    }

    fn link_added(&mut self, this: EntityId, link: &LinkEnds<EntityId>) -> Args {
        if link.target.owner == this {
            Args::one("editable", false)
        } else {
            Args::new()
        }
    }

    fn link_removed(&mut self, this: EntityId, link: &LinkEnds<EntityId>) -> Args {
        if link.target.owner == this {
            Args::one("editable", true)
        } else {
            Args::new()
        }
    }
}

/// Maps a drag position along its track onto `[min, max]`.
#[derive(Debug, Default)]
pub struct SliderBehavior;

impl Behavior for SliderBehavior {
    fn setup(&mut self, cx: &mut SetupCx<'_>) -> Result<(), DiagramError> {
        let me = cx.id();
        cx.add_dependency("position", me, Slot::recompute("value"))?;
        Ok(())
    }

    fn recompute(&mut self, _method: &str, cx: &mut RecomputeCx<'_>) -> Args {
        let num = |name: &str| cx.value(name).as_number().unwrap_or(0.0);
        let (min, max, track) = (num("min"), num("max"), num("track_length"));
        if track <= 0.0 {
            return Args::new();
        }
        let position = num("position").clamp(0.0, track);
        Args::one("value", min + (max - min) * position / track)
    }
}

/// Combines two operands with its fixed operator.
#[derive(Debug, Default)]
pub struct OperatorBehavior;

impl Behavior for OperatorBehavior {
    fn setup(&mut self, cx: &mut SetupCx<'_>) -> Result<(), DiagramError> {
        let me = cx.id();
        cx.add_dependency("operand1", me, Slot::recompute("compute"))?;
        cx.add_dependency("operand2", me, Slot::recompute("compute"))?;
        Ok(())
    }

    fn recompute(&mut self, _method: &str, cx: &mut RecomputeCx<'_>) -> Args {
        let a = cx.value("operand1").as_number().unwrap_or(0.0);
        let b = cx.value("operand2").as_number().unwrap_or(0.0);
        let result = match cx.value("operator").as_text() {
            Some("-") => a - b,
            Some("*") => a * b,
            Some("/") => a / b,
            _ => a + b,
        };
        Args::one("result", result)
    }
}

/// Owns one bar whose width follows its own.
#[derive(Debug, Default)]
pub struct ContainerBehavior;

impl Behavior for ContainerBehavior {
    fn setup(&mut self, cx: &mut SetupCx<'_>) -> Result<(), DiagramError> {
        let bar = cx.spawn_child("Bar", &Args::new())?;
        cx.add_dependency("width", bar, Slot::property("width"))?;
        cx.add_dependency("style", bar, Slot::property("style"))?;
        Ok(())
    }
}

/// Describes its own width.
#[derive(Debug, Default)]
pub struct BarBehavior;

impl Behavior for BarBehavior {
    fn setup(&mut self, cx: &mut SetupCx<'_>) -> Result<(), DiagramError> {
        let me = cx.id();
        cx.add_dependency("width", me, Slot::recompute("outline"))?;
        Ok(())
    }

    fn recompute(&mut self, _method: &str, cx: &mut RecomputeCx<'_>) -> Args {
        Args::one("outline", format!("{}px", cx.value("width")))
    }
}

/// Bumps `b` from `a`, while `b` drives `a`: a loop through a recomputation.
#[derive(Debug, Default)]
pub struct EchoBehavior;

impl Behavior for EchoBehavior {
    fn setup(&mut self, cx: &mut SetupCx<'_>) -> Result<(), DiagramError> {
        let me = cx.id();
        cx.add_dependency("b", me, Slot::property("a"))?;
        cx.add_dependency("a", me, Slot::recompute("bump"))?;
        Ok(())
    }

    fn recompute(&mut self, _method: &str, cx: &mut RecomputeCx<'_>) -> Args {
        Args::one("b", cx.value("a").as_number().unwrap_or(0.0) + 1.0)
    }
}

/// Spawns two cells and removes them all when `clear` turns on.
#[derive(Debug, Default)]
pub struct JanitorBehavior;

impl Behavior for JanitorBehavior {
    fn setup(&mut self, cx: &mut SetupCx<'_>) -> Result<(), DiagramError> {
        cx.spawn_child("Cell", &Args::new())?;
        cx.spawn_child("Cell", &Args::new())?;
        let me = cx.id();
        cx.add_dependency("clear", me, Slot::recompute("sweep"))?;
        Ok(())
    }

    fn recompute(&mut self, _method: &str, cx: &mut RecomputeCx<'_>) -> Args {
        if cx.value("clear") != Value::Bool(true) {
            return Args::new();
        }
        for child in cx.children().to_vec() {
            cx.schedule(StructuralEdit::Remove(child));
        }
        Args::one("swept", true)
    }
}

/// Registers every fixture class.
pub fn register_catalogue(diagram: &mut Diagram) {
    let classes = [
        WidgetClass::new("Mobject").properties(
            SchemaFragment::new()
                .readonly("screen_event_handler", "self")
                .mutable("anchor", Point::ZERO)
                .mutable("height", 30.0)
                .mutable("visible", true),
        ),
        WidgetClass::new("Linkable")
            .extends("Mobject")
            .properties(SchemaFragment::new().immutable("links_editable", false)),
        WidgetClass::new("NumberBox")
            .extends("Linkable")
            .properties(
                SchemaFragment::new()
                    .mutable("value", 0.0)
                    .mutable("text", "0")
                    .mutable("editable", true),
            )
            .inlet("value", ValueKind::Number)
            .outlet("value", ValueKind::Number)
            .behavior(|| NumberBoxBehavior),
        WidgetClass::new("Slider")
            .extends("Linkable")
            .properties(
                SchemaFragment::new()
                    .mutable("min", 0.0)
                    .mutable("max", 10.0)
                    .mutable("track_length", 100.0)
                    .mutable("position", 0.0)
                    .mutable("value", 0.0),
            )
            .outlet("value", ValueKind::Number)
            .behavior(|| SliderBehavior),
        WidgetClass::new("BinaryOperatorBox")
            .extends("Linkable")
            .properties(
                SchemaFragment::new()
                    .immutable("operator", "+")
                    .mutable("operand1", 0.0)
                    .mutable("operand2", 0.0)
                    .mutable("result", 0.0),
            )
            .inlet("operand1", ValueKind::Number)
            .inlet("operand2", ValueKind::Number)
            .outlet("result", ValueKind::Number)
            .behavior(|| OperatorBehavior),
        WidgetClass::new("Label")
            .extends("Linkable")
            .properties(SchemaFragment::new().mutable("text", ""))
            .inlet("text", ValueKind::Text),
        WidgetClass::new("Bar")
            .extends("Mobject")
            .properties(
                SchemaFragment::new()
                    .mutable("width", 0.0)
                    .mutable("outline", "")
                    .mutable("style", Value::Null),
            )
            .behavior(|| BarBehavior),
        WidgetClass::new("Container")
            .extends("Mobject")
            .properties(
                SchemaFragment::new()
                    .mutable("width", 100.0)
                    .mutable("style", Value::Null),
            )
            .behavior(|| ContainerBehavior),
        WidgetClass::new("Echo")
            .properties(SchemaFragment::new().mutable("a", 0.0).mutable("b", 0.0))
            .behavior(|| EchoBehavior),
        WidgetClass::new("Cell").properties(SchemaFragment::new().mutable("x", 0.0)),
        WidgetClass::new("Janitor")
            .properties(
                SchemaFragment::new()
                    .mutable("clear", false)
                    .mutable("swept", false),
            )
            .behavior(|| JanitorBehavior),
    ];
    for class in classes {
        diagram.register(class).expect("fixture classes compose");
    }
}

/// A diagram with the fixture catalogue and a shared redraw log.
pub fn diagram() -> (Diagram, RedrawLog) {
    diagram_with(DiagramConfig::default())
}

/// Like [`diagram`], with a custom configuration.
pub fn diagram_with(config: DiagramConfig) -> (Diagram, RedrawLog) {
    let log = RedrawLog::default();
    let mut diagram = Diagram::with_renderer(config, log.clone());
    register_catalogue(&mut diagram);
    (diagram, log)
}

/// Spawns a widget at `anchor`.
pub fn spawn_at(diagram: &mut Diagram, class: &str, anchor: Point) -> EntityId {
    diagram
        .spawn(class, &Args::one("anchor", anchor))
        .expect("fixture class spawns")
}
