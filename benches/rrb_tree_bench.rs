//! Benchmark for RrbTree vs standard Vec.
//!
//! Compares append, random access, random insert, split and join of the
//! RRB-Tree against the corresponding `Vec` operations.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use lambars_rrb::persistent::{MutableRrbTree, RrbTree};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

const SIZES: [usize; 3] = [100, 1000, 10000];

// =============================================================================
// append Benchmark
// =============================================================================

fn benchmark_append(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("append");

    for size in SIZES {
        group.bench_with_input(BenchmarkId::new("RrbTree", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut tree = RrbTree::new();
                for index in 0..size {
                    tree = tree.append(black_box(index));
                }
                black_box(tree)
            });
        });

        group.bench_with_input(
            BenchmarkId::new("MutableRrbTree", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut tree = MutableRrbTree::new();
                    for index in 0..size {
                        tree.append(black_box(index));
                    }
                    black_box(tree)
                });
            },
        );

        group.bench_with_input(BenchmarkId::new("Vec", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut vector = Vec::new();
                for index in 0..size {
                    vector.push(black_box(index));
                }
                black_box(vector)
            });
        });
    }

    group.finish();
}

// =============================================================================
// get Benchmark (Sequential Access)
// =============================================================================

fn benchmark_get(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("get");

    for size in SIZES {
        let strict: RrbTree<usize> = (0..size).collect();
        let (left, right) = strict.split(size / 3).unwrap_or_default();
        let relaxed = left.join(&right);
        let vector: Vec<usize> = (0..size).collect();

        for (name, tree) in [("RrbTree/strict", &strict), ("RrbTree/relaxed", &relaxed)] {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |bencher, &size| {
                bencher.iter(|| {
                    let mut sum = 0;
                    for index in 0..size {
                        if let Some(&value) = tree.get(black_box(index)) {
                            sum += value;
                        }
                    }
                    black_box(sum)
                });
            });
        }

        group.bench_with_input(BenchmarkId::new("Vec", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut sum = 0;
                for index in 0..size {
                    if let Some(&value) = vector.get(black_box(index)) {
                        sum += value;
                    }
                }
                black_box(sum)
            });
        });
    }

    group.finish();
}

// =============================================================================
// insert Benchmark (Random Positions)
// =============================================================================

fn benchmark_random_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("random_insert");

    for size in SIZES {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let positions: Vec<usize> = (0..size).map(|length| rng.random_range(0..=length)).collect();

        group.bench_with_input(
            BenchmarkId::new("MutableRrbTree", size),
            &positions,
            |bencher, positions| {
                bencher.iter(|| {
                    let mut tree = MutableRrbTree::new();
                    for (item, &position) in positions.iter().enumerate() {
                        let _ = tree.insert(position, black_box(item));
                    }
                    black_box(tree)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("Vec", size),
            &positions,
            |bencher, positions| {
                bencher.iter(|| {
                    let mut vector = Vec::new();
                    for (item, &position) in positions.iter().enumerate() {
                        vector.insert(position, black_box(item));
                    }
                    black_box(vector)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// split / join Benchmark
// =============================================================================

fn benchmark_split_join(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("split_join");

    for size in SIZES {
        let tree: RrbTree<usize> = (0..size).collect();
        let vector: Vec<usize> = (0..size).collect();

        group.bench_with_input(BenchmarkId::new("RrbTree", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let (left, right) = tree.split(black_box(size / 2)).unwrap_or_default();
                black_box(right.join(&left))
            });
        });

        group.bench_with_input(BenchmarkId::new("Vec", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut left = vector.clone();
                let right = left.split_off(black_box(size / 2));
                let mut joined = right;
                joined.extend_from_slice(&left);
                black_box(joined)
            });
        });
    }

    group.finish();
}

// =============================================================================
// Iteration Benchmark
// =============================================================================

fn benchmark_iteration(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("iteration");

    for size in SIZES {
        let tree: RrbTree<usize> = (0..size).collect();

        group.bench_with_input(BenchmarkId::new("RrbTree", size), &tree, |bencher, tree| {
            bencher.iter(|| black_box(tree.iter().sum::<usize>()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_append,
    benchmark_get,
    benchmark_random_insert,
    benchmark_split_join,
    benchmark_iteration
);

criterion_main!(benches);
