// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Class chains composed through the registry, and instances built from them.

use tangle_property::{
    Args, EntityState, Mutability, RegistryError, SchemaCompositionError, SchemaFragment,
    SchemaRegistry, Value,
};

fn catalogue() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();
    let mobject = registry
        .register(
            "Mobject",
            None,
            &SchemaFragment::new()
                .readonly("screen_event_handler", "self")
                .mutable("anchor", tangle_property::Point::ZERO)
                .mutable("visible", true),
        )
        .unwrap();
    let linkable = registry
        .register(
            "Linkable",
            Some(mobject),
            &SchemaFragment::new().immutable("links_editable", false),
        )
        .unwrap();
    registry
        .register(
            "BinaryOperatorBox",
            Some(linkable),
            &SchemaFragment::new()
                .immutable("operator", "+")
                .mutable("operand1", 0.0)
                .mutable("operand2", 0.0)
                .mutable("result", 0.0),
        )
        .unwrap();
    registry
}

#[test]
fn ancestor_levels_survive_every_descendant() {
    let registry = catalogue();
    for name in ["Mobject", "Linkable", "BinaryOperatorBox"] {
        let id = registry.by_name(name).unwrap();
        let schema = registry.schema(id).unwrap();
        assert_eq!(
            schema.mutability("screen_event_handler"),
            Some(Mutability::Readonly)
        );
        if name != "Mobject" {
            assert_ne!(schema.mutability("links_editable"), Some(Mutability::Mutable));
        }
    }
}

#[test]
fn operator_defaults_and_stays_fixed() {
    let registry = catalogue();
    let id = registry.by_name("BinaryOperatorBox").unwrap();
    let schema = registry.schema(id).unwrap();

    let mut a = EntityState::construct(schema.clone(), &Args::new());
    let mut b = EntityState::construct(schema.clone(), &Args::new());
    for state in [&mut a, &mut b] {
        assert_eq!(state.get("operator"), Some(&Value::from("+")));
        let outcome = state.update(&Args::one("operator", "-"));
        assert!(outcome.was_rejected("operator"));
        assert_eq!(state.get("operator"), Some(&Value::from("+")));
    }
}

#[test]
fn broken_subclasses_are_refused_at_registration() {
    let mut registry = catalogue();
    let op = registry.by_name("BinaryOperatorBox").unwrap();

    let widened = registry.register(
        "LooseOperator",
        Some(op),
        &SchemaFragment::new().mutable("operator", "-"),
    );
    assert!(matches!(
        widened,
        Err(RegistryError::Composition(
            SchemaCompositionError::ImmutableWidened { .. }
        ))
    ));

    let redeclared = registry.register(
        "Handler",
        Some(op),
        &SchemaFragment::new().readonly("screen_event_handler", "other"),
    );
    let Err(RegistryError::Composition(err)) = redeclared else {
        panic!("expected a composition error");
    };
    assert_eq!(
        err.to_string(),
        "class `Handler` redeclares readonly property `screen_event_handler` of `Mobject`"
    );

    // Narrowing is fine.
    let narrowed = registry.register(
        "Minus",
        Some(op),
        &SchemaFragment::new().readonly("operator", "-"),
    );
    assert!(narrowed.is_ok());
}

#[test]
fn construction_args_are_the_one_write_to_fixed_properties() {
    let registry = catalogue();
    let id = registry.by_name("BinaryOperatorBox").unwrap();
    let schema = registry.schema(id).unwrap().clone();

    let mut times = EntityState::construct(schema, &Args::one("operator", "*"));
    assert_eq!(times.get("operator"), Some(&Value::from("*")));
    for attempt in ["+", "-", "*"] {
        times.update(&Args::one("operator", attempt));
        assert_eq!(times.get("operator"), Some(&Value::from("*")));
    }
}
