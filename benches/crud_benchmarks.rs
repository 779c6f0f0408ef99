use avl_osmap::{AllocationStrategy, AvlTreeMap, Options};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::BTreeMap;

const N: usize = 10_000;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // Use a simple LCG for deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

/// Every allocation strategy with child counts off, labelled for reports.
fn strategies() -> [(&'static str, Options); 3] {
    [
        ("Direct", Options::new().allocation(AllocationStrategy::Direct)),
        ("Pool", Options::new().allocation(AllocationStrategy::Pool)),
        ("Arena", Options::new().allocation(AllocationStrategy::arena())),
    ]
}

fn build(options: Options, keys: &[i64]) -> AvlTreeMap<i64, i64> {
    let mut map = AvlTreeMap::with_options(options);
    for &k in keys {
        map.insert(k, k);
    }
    map
}

// ─── Map Benchmarks ─────────────────────────────────────────────────────────

fn bench_insert(c: &mut Criterion, group_name: &str, keys: &[i64]) {
    let mut group = c.benchmark_group(group_name);

    for (name, options) in strategies() {
        group.bench_function(BenchmarkId::new(name, N), |b| b.iter(|| build(options, keys)));
    }
    group.bench_function(BenchmarkId::new("Direct+counts", N), |b| {
        b.iter(|| build(Options::new().count_children(true), keys));
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut map = BTreeMap::new();
            for &k in keys {
                map.insert(k, k);
            }
            map
        });
    });

    group.finish();
}

fn bench_map_insert_ordered(c: &mut Criterion) {
    bench_insert(c, "map_insert_ordered", &ordered_keys(N));
}

fn bench_map_insert_random(c: &mut Criterion) {
    bench_insert(c, "map_insert_random", &random_keys(N));
}

fn bench_map_get_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let avl_map = build(Options::new(), &keys);
    let bt_map: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();

    let mut group = c.benchmark_group("map_get_random");

    group.bench_function(BenchmarkId::new("AvlTreeMap", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for &k in &keys {
                if let Some(&v) = avl_map.get(&k) {
                    sum = sum.wrapping_add(v);
                }
            }
            sum
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for &k in &keys {
                if let Some(&v) = bt_map.get(&k) {
                    sum = sum.wrapping_add(v);
                }
            }
            sum
        });
    });

    group.finish();
}

fn bench_map_remove_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("map_remove_random");

    for (name, options) in strategies() {
        let template = build(options, &keys);
        group.bench_function(BenchmarkId::new(name, N), |b| {
            b.iter_batched(
                || template.clone(),
                |mut map| {
                    for k in &keys {
                        map.remove(k);
                    }
                    map
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    let template: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter_batched(
            || template.clone(),
            |mut map| {
                for k in &keys {
                    map.remove(k);
                }
                map
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_map_at(c: &mut Criterion) {
    let keys = random_keys(N);
    let counted = build(Options::new().count_children(true), &keys);
    let uncounted = build(Options::new(), &keys);
    let bt_map: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    let positions: Vec<usize> = random_keys(1_000).into_iter().map(|k| k as usize % counted.len()).collect();

    let mut group = c.benchmark_group("map_at");

    group.bench_function(BenchmarkId::new("AvlTreeMap+counts", N), |b| {
        b.iter(|| positions.iter().map(|&p| *counted.at(p).1).fold(0i64, i64::wrapping_add));
    });

    group.bench_function(BenchmarkId::new("AvlTreeMap", N), |b| {
        b.iter(|| positions.iter().map(|&p| *uncounted.at(p).1).fold(0i64, i64::wrapping_add));
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            positions
                .iter()
                .filter_map(|&p| bt_map.values().nth(p))
                .fold(0i64, |acc, &v| acc.wrapping_add(v))
        });
    });

    group.finish();
}

fn bench_map_delete_while_iterating(c: &mut Criterion) {
    let keys = ordered_keys(N);
    let mut group = c.benchmark_group("map_delete_while_iterating");

    for (name, options) in strategies() {
        let template = build(options, &keys);
        group.bench_function(BenchmarkId::new(name, N), |b| {
            b.iter_batched(
                || template.clone(),
                |mut map| {
                    map.retain(|k, _| k % 2 == 0);
                    map
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    let template: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter_batched(
            || template.clone(),
            |mut map| {
                map.retain(|k, _| k % 2 == 0);
                map
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(map_insert_benches, bench_map_insert_ordered, bench_map_insert_random,);

criterion_group!(map_lookup_benches, bench_map_get_random, bench_map_at,);

criterion_group!(map_remove_benches, bench_map_remove_random, bench_map_delete_while_iterating,);

criterion_main!(map_insert_benches, map_lookup_benches, map_remove_benches,);
