use criterion::{Criterion, black_box, criterion_group, criterion_main};
use worlds::prelude::*;

fn layout_benchmark(c: &mut Criterion) {
    c.bench_function("generate 32x32", |b| {
        b.iter(|| generate(black_box(32), black_box(32), black_box(50.0)))
    });

    c.bench_function("generate 128x128", |b| {
        b.iter(|| generate(black_box(128), black_box(128), black_box(50.0)))
    });
}

fn plan_benchmark(c: &mut Criterion) {
    let mut stage = Stage::new();
    let handles = generate(32, 32, 50.0)
        .unwrap()
        .install(&mut stage)
        .unwrap();
    let plan = MotionPlan::default();
    let mut rng = SeededRandom::new(0);

    c.bench_function("plan 32x32", |b| {
        b.iter(|| plan.build(&handles, black_box(160.0), &mut rng))
    });
}

fn stage_benchmark(c: &mut Criterion) {
    let mut stage = Stage::new();
    let handles = generate(32, 32, 50.0)
        .unwrap()
        .install(&mut stage)
        .unwrap();
    let timeline = MotionPlan::default()
        .build(&handles, 160.0, &mut SeededRandom::new(0))
        .unwrap();
    for (node, action) in timeline.into_assignments() {
        stage.apply_action(node, action).unwrap();
    }

    c.bench_function("stage frame", |b| {
        b.iter(|| stage.advance(black_box(1.0 / 60.0)))
    });
}

criterion_group!(benches, layout_benchmark, plan_benchmark, stage_benchmark);
criterion_main!(benches);
