//! Benchmark for PersistentMap against the standard library maps.
//!
//! Compares the overlay representation with HashMap and the ordered
//! representation with BTreeMap for common operations, and exercises the
//! quadratic overlay size scan at growing chain lengths.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use permap::PersistentMap;
use std::collections::{BTreeMap, HashMap};

// =============================================================================
// add Benchmark
// =============================================================================

fn benchmark_add(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("add");

    for size in [100, 1000, 10000] {
        group.bench_with_input(
            BenchmarkId::new("PersistentMap/overlay", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut map = PersistentMap::new();
                    for index in 0..size {
                        map = map.add(black_box(index), black_box(index * 2));
                    }
                    black_box(map)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("PersistentMap/ordered", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut map = PersistentMap::ordered();
                    for index in 0..size {
                        map = map.add(black_box(index), black_box(index * 2));
                    }
                    black_box(map)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut map = BTreeMap::new();
                    for index in 0..size {
                        map.insert(black_box(index), black_box(index * 2));
                    }
                    black_box(map)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("HashMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut map = HashMap::new();
                    for index in 0..size {
                        map.insert(black_box(index), black_box(index * 2));
                    }
                    black_box(map)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// get Benchmark
// =============================================================================

fn benchmark_get(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("get");

    for size in [100, 1000] {
        let mut ordered = PersistentMap::ordered();
        let mut overlay = PersistentMap::new();
        let mut standard = BTreeMap::new();
        for index in 0..size {
            ordered = ordered.add(index, index * 2);
            overlay = overlay.add(index, index * 2);
            standard.insert(index, index * 2);
        }

        group.bench_with_input(
            BenchmarkId::new("PersistentMap/ordered", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut sum = 0;
                    for key in 0..size {
                        if let Ok(&value) = ordered.get(&black_box(key)) {
                            sum += value;
                        }
                    }
                    black_box(sum)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("PersistentMap/overlay", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut sum = 0;
                    for key in 0..size {
                        if let Ok(&value) = overlay.get(&black_box(key)) {
                            sum += value;
                        }
                    }
                    black_box(sum)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut sum = 0;
                    for key in 0..size {
                        if let Some(&value) = standard.get(&black_box(key)) {
                            sum += value;
                        }
                    }
                    black_box(sum)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// len Benchmark (the overlay scan is quadratic by design)
// =============================================================================

fn benchmark_len(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("len");

    for size in [100, 400, 1600] {
        let mut overlay = PersistentMap::new();
        let mut ordered = PersistentMap::ordered();
        for index in 0..size {
            overlay = overlay.add(index, index);
            ordered = ordered.add(index, index);
        }

        group.bench_with_input(
            BenchmarkId::new("PersistentMap/overlay", size),
            &size,
            |bencher, _| bencher.iter(|| black_box(overlay.len())),
        );

        group.bench_with_input(
            BenchmarkId::new("PersistentMap/ordered", size),
            &size,
            |bencher, _| bencher.iter(|| black_box(ordered.len())),
        );
    }

    group.finish();
}

// =============================================================================
// keys Benchmark
// =============================================================================

fn benchmark_keys(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("keys");

    for size in [100, 1000] {
        let mut ordered = PersistentMap::ordered();
        for index in 0..size {
            ordered = ordered.add(index, index);
        }

        group.bench_with_input(
            BenchmarkId::new("PersistentMap/ordered", size),
            &size,
            |bencher, _| {
                bencher.iter(|| {
                    let keys: Vec<i32> = ordered.keys().collect();
                    black_box(keys)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_add,
    benchmark_get,
    benchmark_len,
    benchmark_keys
);
criterion_main!(benches);
