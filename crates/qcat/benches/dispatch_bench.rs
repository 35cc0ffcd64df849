//! Benchmarks for translation and cached dispatch
//!
//! Run with: cargo bench -p qcat

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qcat::{Circuit, ExecuteOptions, Provider, QCircuit, QubitId};

const PROVIDERS: [Provider; 3] = [Provider::Ibm, Provider::Google, Provider::Braket];

/// Layered circuit mixing native and matrix-backed gates
fn layered(n: u32) -> Circuit {
    let mut circuit = Circuit::new(n);
    for layer in 0..5 {
        for i in 0..n {
            circuit.h(QubitId(i)).unwrap();
            circuit.rx(0.1 * f64::from(layer), QubitId(i)).unwrap();
        }
        for i in (0..n - 1).step_by(2) {
            circuit.cx(QubitId(i), QubitId(i + 1)).unwrap();
            circuit.crz(0.3, QubitId(i + 1), QubitId(i)).unwrap();
        }
    }
    circuit.measure_all().unwrap();
    circuit
}

/// Benchmark uncached translation per provider
fn bench_translate(c: &mut Criterion) {
    let mut group = c.benchmark_group("translate");

    for num_qubits in &[4, 16, 64] {
        let qc = QCircuit::from(layered(*num_qubits));
        for provider in PROVIDERS {
            group.bench_with_input(
                BenchmarkId::new(provider.as_str(), num_qubits),
                &qc,
                |b, qc| {
                    b.iter(|| black_box(qc.translate(black_box(provider)).unwrap()));
                },
            );
        }
    }

    group.finish();
}

/// Benchmark draw on a warm cache against a provider switch every call
fn bench_cached_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");

    group.bench_function("draw_cached", |b| {
        let mut qc = QCircuit::from(layered(8));
        b.iter(|| black_box(qc.draw(Provider::Ibm).unwrap()));
    });

    group.bench_function("draw_alternating", |b| {
        let mut qc = QCircuit::from(layered(8));
        let mut flip = false;
        b.iter(|| {
            flip = !flip;
            let provider = if flip { Provider::Ibm } else { Provider::Google };
            black_box(qc.draw(provider).unwrap())
        });
    });

    group.finish();
}

/// Benchmark end-to-end sampling on the local simulator
fn bench_execute(c: &mut Criterion) {
    let mut group = c.benchmark_group("execute");
    group.sample_size(20);

    let options = ExecuteOptions::new().with_repetitions(1000).with_seed(7);
    for provider in PROVIDERS {
        group.bench_function(provider.as_str(), |b| {
            let mut qc = QCircuit::from(layered(8));
            b.iter(|| black_box(qc.execute(provider, &options).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_translate, bench_cached_dispatch, bench_execute);
criterion_main!(benches);
