//! Criterion micro-benchmarks for lattice kernels.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use furrow_bench::scatter_grid;
use furrow_space::Torus8;

/// Benchmark: build the neighbour table of a 100x100 torus.
fn bench_torus_new_10k(c: &mut Criterion) {
    c.bench_function("torus_new_10k", |b| {
        b.iter(|| {
            let t = Torus8::new(black_box(100), black_box(100)).unwrap();
            black_box(&t);
        });
    });
}

/// Benchmark: one diffusion pass over 10K cells.
fn bench_diffuse_10k(c: &mut Criterion) {
    let torus = Torus8::new(100, 100).unwrap();
    let values = scatter_grid(torus.shape(), 42);

    c.bench_function("diffuse_10k", |b| {
        b.iter(|| {
            let out = torus.diffuse(black_box(&values), 0.12);
            black_box(&out);
        });
    });
}

/// Benchmark: weighted neighbour sum over 10K cells.
fn bench_neighbour_sum_10k(c: &mut Criterion) {
    let torus = Torus8::new(100, 100).unwrap();
    let weights = scatter_grid(torus.shape(), 3).map(|v| if *v > 50.0 { 1.0 } else { 0.0 });

    c.bench_function("neighbour_sum_10k", |b| {
        b.iter(|| {
            let out = torus.neighbour_sum(black_box(&weights));
            black_box(&out);
        });
    });
}

criterion_group!(
    benches,
    bench_torus_new_10k,
    bench_diffuse_10k,
    bench_neighbour_sum_10k
);
criterion_main!(benches);
