//! Criterion benchmarks for a full field tick and for actuation calls.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use furrow_bench::{planted_field, reference_profile, stress_profile};
use furrow_engine::Field;

/// Benchmark: one tick of an unplanted 100x100 field.
fn bench_step_bare_10k(c: &mut Criterion) {
    let mut field = Field::new(reference_profile(42)).unwrap();

    c.bench_function("step_bare_10k", |b| {
        b.iter(|| {
            let m = field.step();
            black_box(&m);
        });
    });
}

/// Benchmark: one tick of a fully planted 100x100 field with pests.
fn bench_step_planted_10k(c: &mut Criterion) {
    let mut field = planted_field(reference_profile(42)).unwrap();

    c.bench_function("step_planted_10k", |b| {
        b.iter(|| {
            let m = field.step();
            black_box(&m);
        });
    });
}

/// Benchmark: one tick of a fully planted 316x316 field.
fn bench_step_planted_100k(c: &mut Criterion) {
    let mut field = planted_field(stress_profile(42)).unwrap();

    let mut group = c.benchmark_group("stress");
    group.sample_size(10);
    group.bench_function("step_planted_100k", |b| {
        b.iter(|| {
            let m = field.step();
            black_box(&m);
        });
    });
    group.finish();
}

/// Benchmark: irrigating one cell (local add plus a full diffusion pass).
fn bench_irrigation_10k(c: &mut Criterion) {
    let mut field = Field::new(reference_profile(7)).unwrap();

    c.bench_function("irrigation_10k", |b| {
        b.iter(|| {
            field.apply_irrigation(black_box(50), black_box(50), 0.0).unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_step_bare_10k,
    bench_step_planted_10k,
    bench_step_planted_100k,
    bench_irrigation_10k
);
criterion_main!(benches);
