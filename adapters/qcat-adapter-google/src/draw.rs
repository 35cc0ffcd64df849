//! Cirq-style text drawing.

use qcat_hal::{TextDiagram, format_params};
use qcat_ir::OperationKind as K;

use crate::native::{CirqCircuit, CirqGate, CirqOperation, NamedQubit};

const CONTROL: &str = "@";

/// Render `circuit` with one wire per named qubit.
pub fn draw(circuit: &CirqCircuit) -> String {
    let labels = circuit.qubits().iter().map(ToString::to_string).collect();
    let mut diagram = TextDiagram::new(labels);

    for op in circuit.operations() {
        let cells = match op {
            CirqOperation::Gate { gate, qubits } => gate_cells(circuit, gate, qubits),
            CirqOperation::Measure { qubits, key } => qubits
                .iter()
                .enumerate()
                .filter_map(|(i, q)| {
                    let text = if i == 0 { format!("M('{key}')") } else { "M".to_string() };
                    row(circuit, q).map(|r| (r, text))
                })
                .collect(),
        };
        diagram.push(cells);
    }
    diagram.render()
}

fn row(circuit: &CirqCircuit, qubit: &NamedQubit) -> Option<usize> {
    circuit.qubits().iter().position(|q| q == qubit)
}

fn gate_cells(circuit: &CirqCircuit, gate: &CirqGate, qubits: &[NamedQubit]) -> Vec<(usize, String)> {
    let controls = gate.num_controls();
    qubits
        .iter()
        .enumerate()
        .filter_map(|(i, q)| {
            let text = if i < controls {
                CONTROL.to_string()
            } else {
                target_label(gate, i - controls)
            };
            row(circuit, q).map(|r| (r, text))
        })
        .collect()
}

/// Label of the `position`-th non-control operand.
fn target_label(gate: &CirqGate, position: usize) -> String {
    match gate {
        CirqGate::ControlledX { .. } => "X".to_string(),
        CirqGate::Named { kind, name } => match kind {
            K::Cx | K::Ccx => "X".to_string(),
            K::Cz => CONTROL.to_string(),
            K::Swap | K::Cswap => "×".to_string(),
            K::Iswap => "iSwap".to_string(),
            _ => (*name).to_string(),
        },
        CirqGate::Matrix { kind, name, params, .. } => {
            if position > 0 {
                return format!("#{}", position + 1);
            }
            let angles: &[f64] = match kind {
                K::Mcp => &params[..params.len().min(1)],
                _ => params,
            };
            format!("{}{}", title(name), format_params(angles))
        }
    }
}

fn title(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
