use std::time::Duration;

use criterion::BenchmarkGroup;
use criterion::measurement::Measurement;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const SMALL_RUNTIME_SAMPLE_SIZE: usize = 15;
const SMALL_RUNTIME_WARM_UP_MS: u64 = 100;
const SMALL_RUNTIME_MEASURE_MS: u64 = 200;
const MEDIUM_RUNTIME_SAMPLE_SIZE: usize = 15;
const MEDIUM_RUNTIME_WARM_UP_MS: u64 = 500;
const MEDIUM_RUNTIME_MEASURE_MS: u64 = 1000;
const RNG_SEED: u64 = 0x5EED_2026;

pub fn apply_small_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.sample_size(SMALL_RUNTIME_SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(SMALL_RUNTIME_WARM_UP_MS));
    group.measurement_time(Duration::from_millis(SMALL_RUNTIME_MEASURE_MS));
}

pub fn apply_medium_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.sample_size(MEDIUM_RUNTIME_SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(MEDIUM_RUNTIME_WARM_UP_MS));
    group.measurement_time(Duration::from_millis(MEDIUM_RUNTIME_MEASURE_MS));
}

pub fn default_rng() -> StdRng {
    StdRng::seed_from_u64(RNG_SEED)
}

/// `n` distinct keys in random order, drawn from `0..n * spread`.
pub fn distinct_keys<R: Rng + ?Sized>(rng: &mut R, n: usize, spread: u64) -> Vec<u64> {
    let spread = spread.max(1);
    let mut keys: Vec<u64> = (0..n as u64)
        .map(|i| i * spread + rng.random_range(0..spread))
        .collect();
    keys.shuffle(rng);
    keys
}
