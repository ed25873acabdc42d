//! Benchmarks for the reduction passes
//!
//! Run with: cargo bench -p lightopt-compile

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use lightopt_compile::{CxReduction, HadamardReduction, PassManagerBuilder, RzReduction};
use lightopt_ir::{Circuit, QubitId};
use std::f64::consts::PI;

/// Layers rich in reducible patterns: H pairs, conjugated phases, CX pairs
/// and Rz runs separated by CX controls.
fn reducible(num_qubits: u32, layers: usize) -> Circuit {
    let mut circuit = Circuit::with_size("bench", num_qubits);
    for layer in 0..layers {
        for i in 0..num_qubits {
            circuit.h(QubitId(i)).unwrap();
            circuit.s(QubitId(i)).unwrap();
            circuit.h(QubitId(i)).unwrap();
            circuit.rz(PI / 8.0, QubitId(i)).unwrap();
        }
        let offset = (layer % 2) as u32;
        for i in (offset..num_qubits.saturating_sub(1)).step_by(2) {
            circuit.cx(QubitId(i), QubitId(i + 1)).unwrap();
            circuit.cx(QubitId(i), QubitId(i + 1)).unwrap();
        }
        for i in 0..num_qubits {
            circuit.rz(PI / 16.0, QubitId(i)).unwrap();
        }
    }
    circuit
}

/// Benchmark each pass on its own
fn bench_single_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_pass");

    for layers in &[10, 100] {
        let circuit = reducible(10, *layers);

        group.bench_with_input(BenchmarkId::new("hadamard", layers), &circuit, |b, circuit| {
            b.iter_batched(
                || circuit.dag().clone(),
                |mut dag| black_box(HadamardReduction.apply(&mut dag).unwrap()),
                BatchSize::SmallInput,
            );
        });
        group.bench_with_input(BenchmarkId::new("rz", layers), &circuit, |b, circuit| {
            b.iter_batched(
                || circuit.dag().clone(),
                |mut dag| black_box(RzReduction.apply(&mut dag).unwrap()),
                BatchSize::SmallInput,
            );
        });
        group.bench_with_input(BenchmarkId::new("cx", layers), &circuit, |b, circuit| {
            b.iter_batched(
                || circuit.dag().clone(),
                |mut dag| black_box(CxReduction.apply(&mut dag).unwrap()),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark the full light schedule
fn bench_light_schedule(c: &mut Criterion) {
    let mut group = c.benchmark_group("light_schedule");

    for num_qubits in &[5, 10, 20] {
        let circuit = reducible(*num_qubits, 20);
        let (pm, _) = PassManagerBuilder::new().build();

        group.bench_with_input(
            BenchmarkId::new("two_rounds", num_qubits),
            &circuit,
            |b, circuit| {
                b.iter_batched(
                    || circuit.dag().clone(),
                    |mut dag| {
                        pm.run(&mut dag, &mut Default::default()).unwrap();
                        dag
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_single_pass, bench_light_schedule);
criterion_main!(benches);
