// Benchmarks for tree construction and containment queries
//
// - keyed_insert: scaffold lookup vs full scan, building from scratch
// - ordered_insert: five-case merge with random values
// - containment: MPTT interval check vs walking the subtree

use criterion::{
    black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput,
};
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

use hierarchy::keyed::KeyedTree;
use hierarchy::keyed::Lookup;
use hierarchy::keyed::TreeConfig;
use hierarchy::order::NaturalOrder;
use hierarchy::ordered::OrderedTree;
use hierarchy::policy::ValuePolicy;

/// The parent of `n` is `n / 10`; 0 is the root.
#[derive(Clone, Copy)]
struct Decimal;

impl ValuePolicy for Decimal {
    type Key = u64;
    type Value = u64;

    fn key_of(&self, value: &u64) -> u64 {
        *value
    }

    fn inferred_parent_key(&self, value: &u64) -> Option<u64> {
        if *value == 0 { None } else { Some(*value / 10) }
    }

    fn synthesize_parent(&self, key: &u64, _hint: Option<&u64>) -> Option<u64> {
        Some(*key)
    }
}

// =============================================================================
// Benchmark Helpers
// =============================================================================

/// Breadth-first decimal keys, so every parent exists before its children.
fn decimal_values(count: usize) -> Vec<u64> {
    (1..=count as u64).collect()
}

fn build_keyed(values: &[u64], lookup: Lookup) -> KeyedTree<Decimal> {
    let mut tree = KeyedTree::with_root_value(Decimal, 0)
        .with_config(TreeConfig::default().with_lookup(lookup));
    for &value in values {
        tree.insert_in_place(value).unwrap();
    }
    tree
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_keyed_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("keyed_insert");

    for size in [100, 1_000, 5_000] {
        let values = decimal_values(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("Indexed", size), &values, |b, values| {
            b.iter(|| black_box(build_keyed(values, Lookup::Indexed)))
        });

        if size <= 1_000 {
            group.bench_with_input(BenchmarkId::new("Scan", size), &values, |b, values| {
                b.iter(|| black_box(build_keyed(values, Lookup::Scan)))
            });
        }
    }

    group.finish();
}

fn bench_ordered_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("ordered_insert");

    for size in [100, 1_000] {
        let mut rng = StdRng::seed_from_u64(42);
        let values: Vec<i64> = (0..size).map(|_| rng.gen_range(0..1_000_000)).collect();
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("merge", size), &values, |b, values| {
            b.iter(|| {
                black_box(OrderedTree::from_values(NaturalOrder, values.iter().copied()).unwrap())
            })
        });
    }

    group.finish();
}

fn bench_containment(c: &mut Criterion) {
    let mut group = c.benchmark_group("containment");
    let tree = build_keyed(&decimal_values(5_000), Lookup::Indexed);
    let indexed = tree.build_index();

    group.bench_function("mptt", |b| {
        b.iter(|| black_box(indexed.contains(black_box(&1), black_box(&1999))))
    });

    group.bench_function("traversal", |b| {
        b.iter(|| {
            let subtree = tree.find_by_key(black_box(&1)).unwrap();
            black_box(subtree.includes_value(black_box(&1999)))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_keyed_insert, bench_ordered_insert, bench_containment);
criterion_main!(benches);
