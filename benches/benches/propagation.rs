// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for update propagation through `tangle_diagram`.

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Point;
use tangle_diagram::{Diagram, DiagramConfig, EntityId, WidgetClass};
use tangle_dirty::{CycleHandling, DependencyTable, Slot};
use tangle_link::{HookAddr, HookSet, LinkMap};
use tangle_property::{Args, SchemaFragment, ValueKind};

fn cell_diagram(max_depth: usize) -> Diagram {
    let mut diagram = Diagram::new(DiagramConfig {
        max_propagation_depth: max_depth,
        ..DiagramConfig::default()
    });
    diagram
        .register(
            WidgetClass::new("Cell")
                .properties(SchemaFragment::new().mutable("x", 0.0).mutable("anchor", Point::ZERO))
                .inlet("x", ValueKind::Number)
                .outlet("x", ValueKind::Number),
        )
        .expect("Cell registers");
    diagram
}

fn spawn_cells(diagram: &mut Diagram, n: usize) -> Vec<EntityId> {
    (0..n)
        .map(|_| diagram.spawn("Cell", &Args::new()).expect("Cell spawns"))
        .collect()
}

fn chain(n: usize) -> (Diagram, EntityId) {
    let mut diagram = cell_diagram(n + 8);
    let cells = spawn_cells(&mut diagram, n);
    for pair in cells.windows(2) {
        diagram
            .add_dependency(pair[0], "x", pair[1], Slot::property("x"))
            .expect("chain is acyclic");
    }
    (diagram, cells[0])
}

fn star(n: usize) -> (Diagram, EntityId) {
    let mut diagram = cell_diagram(8);
    let cells = spawn_cells(&mut diagram, n + 1);
    for &leaf in &cells[1..] {
        diagram
            .add_dependency(cells[0], "x", leaf, Slot::property("x"))
            .expect("star is acyclic");
    }
    (diagram, cells[0])
}

fn linked_chain(n: usize) -> (Diagram, EntityId) {
    let mut diagram = cell_diagram(n + 8);
    let cells = spawn_cells(&mut diagram, n);
    for pair in cells.windows(2) {
        diagram
            .connect(&HookAddr::outlet(pair[0], "x"), &HookAddr::inlet(pair[1], "x"))
            .expect("free inlet");
    }
    (diagram, cells[0])
}

fn bench_propagation(c: &mut Criterion) {
    let mut group = c.benchmark_group("propagation");

    for n in [8_usize, 64, 256] {
        let (mut diagram, head) = chain(n);
        let mut x = 0.0;
        group.bench_function(BenchmarkId::new("chain", n), |b| {
            b.iter(|| {
                x += 1.0;
                black_box(diagram.apply_update(head, &Args::one("x", x)))
            });
        });

        let (mut diagram, hub) = star(n);
        let mut x = 0.0;
        group.bench_function(BenchmarkId::new("star", n), |b| {
            b.iter(|| {
                x += 1.0;
                black_box(diagram.apply_update(hub, &Args::one("x", x)))
            });
        });

        let (mut diagram, head) = linked_chain(n);
        let mut x = 0.0;
        group.bench_function(BenchmarkId::new("linked_chain", n), |b| {
            b.iter(|| {
                x += 1.0;
                black_box(diagram.apply_update(head, &Args::one("x", x)))
            });
        });
    }

    group.bench_function("unchanged_write", |b| {
        let (mut diagram, head) = chain(64);
        let args = Args::one("x", 1.0);
        diagram.apply_update(head, &args);
        b.iter(|| black_box(diagram.apply_update(head, &args)));
    });

    group.finish();
}

fn bench_tables(c: &mut Criterion) {
    let mut group = c.benchmark_group("tables");

    group.bench_function("dependency_table/add_checked/256", |b| {
        b.iter_batched(
            || DependencyTable::<u32>::with_cycle_handling(CycleHandling::Error),
            |mut table| {
                for i in 0..256_u32 {
                    let _ = table.add_dependency(i, "x", i + 1, Slot::property("x"), CycleHandling::Error);
                }
                black_box(table)
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("link_map/hook_at/64_widgets", |b| {
        let hooks = HookSet::new()
            .inlet("a", ValueKind::Number)
            .inlet("b", ValueKind::Number)
            .outlet("out", ValueKind::Number);
        let mut map = LinkMap::<u32>::new();
        for i in 0..64_u32 {
            let anchor = Point::new(f64::from(i % 8) * 120.0, f64::from(i / 8) * 80.0);
            map.register_hooks(i, &hooks, anchor, 30.0);
        }
        let probe = Point::new(7.0 * 120.0 + 37.0, 7.0 * 80.0 - 10.0);
        b.iter(|| black_box(map.hook_at(black_box(probe))));
    });

    group.finish();
}

criterion_group!(benches, bench_propagation, bench_tables);
criterion_main!(benches);
