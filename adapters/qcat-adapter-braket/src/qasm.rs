//! Braket OpenQASM emission.
//!
//! Gate-set gates are written by their Braket names. Matrix gates use the
//! `#pragma braket unitary` extension and measurements become a
//! `#pragma braket result probability` over the measured qubits.

use std::fmt::Write;

use num_complex::Complex64;
use qcat_hal::NativeCircuit;

use crate::native::{BraketCircuit, BraketGate};

/// Emit `circuit` as a Braket OpenQASM 3 program.
///
/// A circuit without measurements gets no result pragma.
pub fn emit(circuit: &BraketCircuit) -> String {
    let mut out = String::from("OPENQASM 3.0;\n");
    let _ = writeln!(out, "qubit[{}] q;", circuit.num_qubits());

    for inst in circuit.instructions() {
        let operands = operand_list(&inst.target);
        match &inst.gate {
            BraketGate::Named { name, params, .. } if params.is_empty() => {
                let _ = writeln!(out, "{name} {operands};");
            }
            BraketGate::Named { name, params, .. } => {
                let _ = writeln!(out, "{name}({}) {operands};", angle_list(params));
            }
            BraketGate::Unitary { matrix, .. } => {
                let rows: Vec<String> = matrix
                    .matrix()
                    .rows()
                    .into_iter()
                    .map(|row| {
                        let entries: Vec<String> = row.iter().map(complex_literal).collect();
                        format!("[{}]", entries.join(", "))
                    })
                    .collect();
                let _ = writeln!(
                    out,
                    "#pragma braket unitary([{}]) {operands}",
                    rows.join(", ")
                );
            }
        }
    }

    if circuit.has_measurements() {
        let _ = writeln!(
            out,
            "#pragma braket result probability {}",
            operand_list(&circuit.measured_qubits())
        );
    }
    out
}

fn operand_list(qubits: &[usize]) -> String {
    qubits
        .iter()
        .map(|q| format!("q[{q}]"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn angle_list(params: &[f64]) -> String {
    params
        .iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Braket's complex literal: `re`, `im` + `im`, or `re±imim`.
fn complex_literal(value: &Complex64) -> String {
    let (re, im) = (value.re, value.im);
    if im == 0.0 {
        re.to_string()
    } else if re == 0.0 {
        format!("{im}im")
    } else if im < 0.0 {
        format!("{re}-{}im", -im)
    } else {
        format!("{re}+{im}im")
    }
}
