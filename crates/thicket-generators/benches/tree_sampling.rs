//! Criterion micro-benchmarks for the tree priors and oldest-first
//! reconstruction.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use thicket_generators::{BirthDeathRates, BirthDeathSerialSampling, Coalescent};
use thicket_test_utils::{seeded_rng, trees};

/// 100 serially sampled leaves with ages spread over `[0, 5)`.
fn serial_leaves() -> Vec<(String, f64)> {
    trees::taxon_names(100)
        .into_iter()
        .enumerate()
        .map(|(i, name)| (name, (i % 50) as f64 * 0.1))
        .collect()
}

fn bench_coalescent_100(c: &mut Criterion) {
    let names = trees::taxon_names(100);
    let mut rng = seeded_rng(42);
    c.bench_function("coalescent_100", |b| {
        b.iter(|| {
            let tree = Coalescent::simulate(names.clone(), 10.0, &mut rng).unwrap();
            black_box(tree);
        });
    });
}

fn bench_coalescent_density_100(c: &mut Criterion) {
    let tree = Coalescent::simulate(trees::taxon_names(100), 10.0, &mut seeded_rng(1)).unwrap();
    c.bench_function("coalescent_density_100", |b| {
        b.iter(|| black_box(Coalescent::tree_log_density(black_box(&tree), 10.0).unwrap()));
    });
}

fn bench_birth_death_100(c: &mut Criterion) {
    let leaves = serial_leaves();
    let rates = BirthDeathRates::new(2.0, 0.5, 0.3, 0.2).unwrap();
    let mut rng = seeded_rng(42);
    c.bench_function("birth_death_serial_100", |b| {
        b.iter(|| {
            let tree =
                BirthDeathSerialSampling::simulate(leaves.clone(), &rates, 10.0, &mut rng).unwrap();
            black_box(tree);
        });
    });
}

fn bench_reconstruct_caterpillar_200(c: &mut Criterion) {
    let tree = trees::caterpillar(200, 0.5);
    c.bench_function("reconstruct_caterpillar_200", |b| {
        b.iter(|| {
            let mut t = tree.clone();
            thicket_tree::reconstruct_oldest_first(&mut t).unwrap();
            black_box(t);
        });
    });
}

criterion_group!(
    benches,
    bench_coalescent_100,
    bench_coalescent_density_100,
    bench_birth_death_100,
    bench_reconstruct_caterpillar_200
);
criterion_main!(benches);
