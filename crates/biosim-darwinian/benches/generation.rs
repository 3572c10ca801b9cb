//! Darwinian Performance Benchmarks
//!
//! - Full generation (lifetime, history record, reproduction)
//! - Reproduction alone, across population sizes

use biosim_darwinian::{EvolutionaryLoop, SimulationConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

fn config(population_size: usize) -> SimulationConfig {
    SimulationConfig {
        population_size,
        ..SimulationConfig::default()
    }
}

// ============ GENERATION BENCHMARKS ============

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation");
    group.measurement_time(Duration::from_secs(10));

    for size in [50usize, 100, 400].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("step", size), size, |b, &size| {
            let mut sim = EvolutionaryLoop::from_config(config(size)).unwrap();
            b.iter(|| black_box(sim.step_generation()));
        });
    }

    group.finish();
}

// ============ REPRODUCTION BENCHMARKS ============

fn bench_evolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("evolve");

    for size in [100usize, 1000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("population", size), size, |b, &size| {
            let mut sim = EvolutionaryLoop::from_config(config(size)).unwrap();
            b.iter(|| black_box(sim.evolve_population()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_generation, bench_evolve);
criterion_main!(benches);
