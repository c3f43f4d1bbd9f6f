// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for schema composition and entity state in `tangle_property`.

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tangle_property::{
    Args, ClassId, EntityState, SchemaFragment, SchemaRegistry, Value, WriteOrigin,
};

fn fragment(level: usize, width: usize) -> SchemaFragment {
    (0..width).fold(SchemaFragment::new(), |f, i| {
        f.mutable(format!("p{level}_{i}"), Value::Number(i as f64))
    })
}

fn hierarchy(depth: usize, width: usize) -> (SchemaRegistry, ClassId) {
    let mut registry = SchemaRegistry::new();
    let mut parent = None;
    for level in 0..depth {
        let id = registry
            .register(&format!("Class{level}"), parent, &fragment(level, width))
            .expect("fresh names compose");
        parent = Some(id);
    }
    (registry, parent.expect("depth is non-zero"))
}

fn bench_schema(c: &mut Criterion) {
    let mut group = c.benchmark_group("schema/register");
    for depth in [2_usize, 8, 16] {
        group.bench_function(BenchmarkId::new("hierarchy", depth), |b| {
            b.iter(|| black_box(hierarchy(depth, 8)));
        });
    }
    group.finish();

    let (registry, leaf) = hierarchy(8, 8);
    let schema = registry.schema(leaf).expect("leaf exists").clone();

    let mut group = c.benchmark_group("schema/state");
    group.bench_function("construct/64", |b| {
        let args = Args::one("p7_0", 1.0).with("p0_3", 2.0);
        b.iter(|| black_box(EntityState::construct(schema.clone(), &args)));
    });

    group.bench_function("lookup/first_level", |b| {
        let state = EntityState::construct(schema.clone(), &Args::new());
        b.iter(|| black_box(state.get(black_box("p0_0"))));
    });

    group.bench_function("lookup/last_level", |b| {
        let state = EntityState::construct(schema.clone(), &Args::new());
        b.iter(|| black_box(state.get(black_box("p7_7"))));
    });

    group.bench_function("update/4_keys", |b| {
        b.iter_batched(
            || EntityState::construct(schema.clone(), &Args::new()),
            |mut state| {
                let args = Args::new()
                    .with("p0_0", 10.0)
                    .with("p3_1", 11.0)
                    .with("p5_2", 12.0)
                    .with("p7_3", 13.0);
                black_box(state.update_from(WriteOrigin::Local, &args));
                black_box(state)
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_schema);
criterion_main!(benches);
