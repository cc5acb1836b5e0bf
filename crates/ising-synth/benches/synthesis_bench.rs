//! Benchmarks for compressed Ising synthesis
//!
//! Run with: cargo bench -p ising-synth

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use ising_synth::{IsingCircuit, IsingParams, ShiftOperator};

/// Benchmark full circuit synthesis over growing schedules
fn bench_synthesis(c: &mut Criterion) {
    let mut group = c.benchmark_group("synthesis");

    for steps in &[200_usize, 2400, 24000] {
        group.bench_with_input(BenchmarkId::new("n4_half_sweep", steps), steps, |b, &l| {
            let params = IsingParams::new(4, 1.0, 2.0, l, l as f64 / 10.0);
            b.iter(|| IsingCircuit::from_params(black_box(params)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark applying the basis shift to a state vector
fn bench_shift(c: &mut Criterion) {
    let mut group = c.benchmark_group("basis_shift");

    for m in &[4_u32, 10, 16] {
        group.bench_with_input(BenchmarkId::new("apply_up", m), m, |b, &m| {
            let shift = ShiftOperator::up(m).unwrap();
            let mut amps = vec![0.0_f64; shift.dimension()];
            amps[0] = 1.0;
            b.iter(|| shift.apply_to(black_box(&mut amps)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_synthesis, bench_shift);
criterion_main!(benches);
