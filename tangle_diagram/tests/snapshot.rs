// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Saving a diagram and rebuilding it elsewhere.

mod common;

use common::{diagram, spawn_at};
use tangle_diagram::{DiagramError, DiagramSnapshot, LinkSnapshot};
use tangle_link::HookAddr;
use tangle_property::{Args, ErasedValue, Point, Value};

#[test]
fn round_trip_through_json() {
    let (mut d, _) = diagram();
    let slider = spawn_at(&mut d, "Slider", Point::new(0.0, 0.0));
    let number = spawn_at(&mut d, "NumberBox", Point::new(0.0, 100.0));
    let container = d.spawn("Container", &Args::one("width", 42.0)).unwrap();
    d.connect(&HookAddr::outlet(slider, "value"), &HookAddr::inlet(number, "value"))
        .unwrap();
    d.apply_update(slider, &Args::one("position", 70.0));
    // Opaque values cannot be saved and are left out.
    d.apply_update(container, &Args::one("style", ErasedValue::by_reference(3_u8)));

    let snapshot = d.snapshot();
    assert_eq!(snapshot.widgets.len(), 3);
    assert_eq!(snapshot.widgets[2].children.len(), 1);
    assert!(!snapshot.widgets[2].properties.contains("style"));
    assert_eq!(
        snapshot.links,
        [LinkSnapshot {
            source: slider,
            outlet: "value".into(),
            target: number,
            inlet: "value".into(),
        }]
    );

    let json = snapshot.to_json().unwrap();
    let parsed = DiagramSnapshot::from_json(&json).unwrap();
    assert_eq!(parsed, snapshot);

    let (mut fresh, _) = diagram();
    let ids = fresh.restore(&parsed).unwrap();
    assert_eq!(ids.len(), 4);

    let new_slider = ids[&slider];
    let new_number = ids[&number];
    let new_container = ids[&container];
    assert_eq!(fresh.value(new_number, "value"), Value::Number(7.0));
    assert_eq!(fresh.value(new_number, "text"), Value::from("7"));
    assert!(!fresh.is_locally_editable(new_number, "value"));
    assert_eq!(
        fresh.hook_position(&HookAddr::inlet(new_number, "value")),
        Some(Point::new(15.0, 90.0))
    );

    let bar = fresh.children(new_container)[0];
    assert_eq!(fresh.value(bar, "outline"), Value::from("42px"));

    // The restored link is live.
    fresh.apply_update(new_slider, &Args::one("position", 30.0));
    assert_eq!(fresh.value(new_number, "value"), Value::Number(3.0));
}

#[test]
fn readonly_values_come_back_through_construction() {
    let (mut d, _) = diagram();
    let minus = d
        .spawn("BinaryOperatorBox", &Args::one("operator", "-"))
        .unwrap();

    let (mut fresh, _) = diagram();
    let ids = fresh.restore(&d.snapshot()).unwrap();
    assert_eq!(fresh.value(ids[&minus], "operator"), Value::from("-"));
}

#[test]
fn links_to_missing_widgets_are_refused() {
    let (mut d, _) = diagram();
    let slider = spawn_at(&mut d, "Slider", Point::new(0.0, 0.0));
    let number = spawn_at(&mut d, "NumberBox", Point::new(0.0, 100.0));
    d.connect(&HookAddr::outlet(slider, "value"), &HookAddr::inlet(number, "value"))
        .unwrap();
    let mut snapshot = d.snapshot();
    snapshot.widgets.retain(|w| w.id != number);

    let (mut fresh, _) = diagram();
    assert!(matches!(
        fresh.restore(&snapshot),
        Err(DiagramError::UnknownEntity(id)) if id == number
    ));
}

#[test]
fn malformed_json_is_an_error() {
    assert!(matches!(
        DiagramSnapshot::from_json("{ \"widgets\": 3 }"),
        Err(DiagramError::Snapshot(_))
    ));
}
