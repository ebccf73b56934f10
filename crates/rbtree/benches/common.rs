use std::collections::BTreeSet;
use std::hint::black_box;
use std::time::{Duration, Instant};

use bench::{apply_medium_runtime_config, apply_small_runtime_config, default_rng, distinct_keys};
use criterion::measurement::Measurement;
use criterion::{BenchmarkGroup, BenchmarkId};
use rand::Rng;

use rbtree::RbTree;

const SIZES: [usize; 4] = [1_000, 16_000, 64_000, 256_000];
const OPS_PER_ITER: usize = 200;
const KEY_SPREAD: u64 = 4;

/// The slice of set behavior the workloads need, so `RbTree` and `BTreeSet`
/// run the same code.
pub trait KeySet {
    fn build() -> Self;
    fn add(&mut self, key: u64);
    fn has(&self, key: u64) -> bool;
    fn take(&mut self, key: u64) -> Option<u64>;
    fn export(&self, dest: &mut [u64]) -> usize;
    fn size(&self) -> usize;
}

impl KeySet for RbTree<u64> {
    fn build() -> Self {
        RbTree::new().expect("empty tree allocation")
    }

    fn add(&mut self, key: u64) {
        let _ = black_box(self.insert(key));
    }

    fn has(&self, key: u64) -> bool {
        self.contains(&key)
    }

    fn take(&mut self, key: u64) -> Option<u64> {
        self.remove(&key)
    }

    fn export(&self, dest: &mut [u64]) -> usize {
        self.to_array(dest)
    }

    fn size(&self) -> usize {
        self.len()
    }
}

impl KeySet for BTreeSet<u64> {
    fn build() -> Self {
        BTreeSet::new()
    }

    fn add(&mut self, key: u64) {
        black_box(self.insert(key));
    }

    fn has(&self, key: u64) -> bool {
        self.contains(&key)
    }

    fn take(&mut self, key: u64) -> Option<u64> {
        BTreeSet::take(self, &key)
    }

    fn export(&self, dest: &mut [u64]) -> usize {
        let mut written = 0;
        for (slot, &key) in dest.iter_mut().zip(self.iter()) {
            *slot = key;
            written += 1;
        }
        written
    }

    fn size(&self) -> usize {
        self.len()
    }
}

fn filled<S: KeySet>(keys: &[u64]) -> S {
    let mut set = S::build();
    for &k in keys {
        set.add(k);
    }
    set
}

pub fn bench_build<S, T>(group: &mut BenchmarkGroup<'_, T>, label: &str)
where
    T: Measurement<Value = Duration>,
    S: KeySet,
{
    for &size in &SIZES {
        apply_medium_runtime_config(group);
        let keys = distinct_keys(&mut default_rng(), size, KEY_SPREAD);
        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter(|| {
                let set = filled::<S>(&keys);
                black_box(set.size())
            })
        });
    }
}

pub fn bench_read<S, T>(group: &mut BenchmarkGroup<'_, T>, label: &str)
where
    T: Measurement<Value = Duration>,
    S: KeySet,
{
    for &size in &SIZES {
        apply_small_runtime_config(group);
        let mut rng = default_rng();
        let keys = distinct_keys(&mut rng, size, KEY_SPREAD);
        let set = filled::<S>(&keys);
        let probes: Vec<u64> = (0..OPS_PER_ITER)
            .map(|_| rng.random_range(0..size as u64 * KEY_SPREAD))
            .collect();

        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter(|| {
                let mut hits = 0;
                for &k in &probes {
                    hits += usize::from(set.has(black_box(k)));
                }
                black_box(hits)
            })
        });
    }
}

pub fn bench_churn<S, T>(group: &mut BenchmarkGroup<'_, T>, label: &str)
where
    T: Measurement<Value = Duration>,
    S: KeySet,
{
    for &size in &SIZES {
        apply_small_runtime_config(group);
        let mut rng = default_rng();
        let keys = distinct_keys(&mut rng, size, KEY_SPREAD);
        let mut set = filled::<S>(&keys);

        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for _ in 0..iters {
                    let victims: Vec<u64> = (0..OPS_PER_ITER)
                        .map(|_| keys[rng.random_range(0..keys.len())])
                        .collect();
                    let start = Instant::now();
                    for &k in &victims {
                        if let Some(k) = set.take(k) {
                            set.add(k);
                        }
                    }
                    black_box(set.size());
                    total += start.elapsed();
                }
                total
            })
        });
    }
}

pub fn bench_export<S, T>(group: &mut BenchmarkGroup<'_, T>, label: &str)
where
    T: Measurement<Value = Duration>,
    S: KeySet,
{
    for &size in &SIZES {
        apply_small_runtime_config(group);
        let keys = distinct_keys(&mut default_rng(), size, KEY_SPREAD);
        let set = filled::<S>(&keys);
        let mut dest = vec![0_u64; size];

        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter(|| black_box(set.export(&mut dest)))
        });
    }
}

pub fn bench_all_build<T: Measurement<Value = Duration>>(group: &mut BenchmarkGroup<'_, T>) {
    bench_build::<RbTree<u64>, T>(group, "rbtree");
    bench_build::<BTreeSet<u64>, T>(group, "std_btree_set");
}

pub fn bench_all_read<T: Measurement<Value = Duration>>(group: &mut BenchmarkGroup<'_, T>) {
    bench_read::<RbTree<u64>, T>(group, "rbtree");
    bench_read::<BTreeSet<u64>, T>(group, "std_btree_set");
}

pub fn bench_all_churn<T: Measurement<Value = Duration>>(group: &mut BenchmarkGroup<'_, T>) {
    bench_churn::<RbTree<u64>, T>(group, "rbtree");
    bench_churn::<BTreeSet<u64>, T>(group, "std_btree_set");
}

pub fn bench_all_export<T: Measurement<Value = Duration>>(group: &mut BenchmarkGroup<'_, T>) {
    bench_export::<RbTree<u64>, T>(group, "rbtree");
    bench_export::<BTreeSet<u64>, T>(group, "std_btree_set");
}
