//! Benchmarks for circuit building
//!
//! Run with: cargo bench -p qcat-ir

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qcat_ir::{Circuit, ClbitId, McxMode, QubitId};
use std::f64::consts::PI;

/// Benchmark appending single gates
fn bench_gate_addition(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate_addition");

    group.bench_function("h_gate", |b| {
        let mut circuit = Circuit::new(10);
        b.iter(|| {
            circuit.h(black_box(QubitId(0))).unwrap();
        });
    });

    group.bench_function("rx_gate", |b| {
        let mut circuit = Circuit::new(10);
        b.iter(|| {
            circuit
                .rx(black_box(PI / 4.0), black_box(QubitId(0)))
                .unwrap();
        });
    });

    group.bench_function("cx_gate", |b| {
        let mut circuit = Circuit::new(10);
        b.iter(|| {
            circuit
                .cx(black_box(QubitId(0)), black_box(QubitId(1)))
                .unwrap();
        });
    });

    group.bench_function("rejected_gate", |b| {
        let mut circuit = Circuit::new(10);
        b.iter(|| black_box(circuit.h(black_box(QubitId(10))).is_err()));
    });

    group.finish();
}

/// Benchmark GHZ state circuit creation
fn bench_ghz_circuit(c: &mut Criterion) {
    let mut group = c.benchmark_group("ghz_circuit");

    for num_qubits in &[3, 10, 50, 100] {
        group.bench_with_input(
            BenchmarkId::new("create", num_qubits),
            num_qubits,
            |b, &n| {
                b.iter(|| {
                    let mut circuit = Circuit::with_size("ghz", n, n);
                    circuit.h(QubitId(0)).unwrap();
                    for i in 0..n - 1 {
                        circuit.cx(QubitId(i), QubitId(i + 1)).unwrap();
                    }
                    for i in 0..n {
                        circuit.measure_to(QubitId(i), ClbitId(i)).unwrap();
                    }
                    black_box(circuit)
                });
            },
        );
    }

    group.finish();
}

/// Benchmark multi-controlled gates, which copy their operand lists
fn bench_multi_controlled(c: &mut Criterion) {
    let mut group = c.benchmark_group("multi_controlled");

    for controls in &[2u32, 4, 8] {
        let ctrl: Vec<QubitId> = (0..*controls).map(QubitId).collect();
        let target = QubitId(*controls);
        let ancillas: Vec<QubitId> = (controls + 1..2 * controls).map(QubitId).collect();

        group.bench_with_input(BenchmarkId::new("mcx", controls), &ctrl, |b, ctrl| {
            let mut circuit = Circuit::new(2 * controls);
            b.iter(|| {
                circuit.mcx(black_box(ctrl), target).unwrap();
            });
        });

        group.bench_with_input(BenchmarkId::new("mct_vchain", controls), &ctrl, |b, ctrl| {
            let mut circuit = Circuit::new(2 * controls);
            b.iter(|| {
                circuit
                    .mct(black_box(ctrl), target, &ancillas, McxMode::VChain)
                    .unwrap();
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_gate_addition,
    bench_ghz_circuit,
    bench_multi_controlled
);
criterion_main!(benches);
