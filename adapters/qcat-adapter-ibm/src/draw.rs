//! Qiskit-style text drawing.

use qcat_hal::{NativeCircuit, TextDiagram, format_params};
use qcat_ir::OperationKind as K;

use crate::native::{IbmCircuit, IbmGate, IbmInstruction};

const CONTROL: &str = "■";

/// Render `circuit` with one `q_i` wire per qubit.
pub fn draw(circuit: &IbmCircuit) -> String {
    let labels = (0..circuit.num_qubits()).map(|q| format!("q_{q}")).collect();
    let mut diagram = TextDiagram::new(labels);

    for inst in circuit.instructions() {
        match inst {
            IbmInstruction::Gate { gate, qubits } => diagram.push(cells(gate, qubits)),
            IbmInstruction::Measure { qubit, clbit } => {
                diagram.push(vec![(*qubit as usize, format!("M(c{clbit})"))]);
            }
        }
    }
    diagram.render()
}

fn cells(gate: &IbmGate, qubits: &[u32]) -> Vec<(usize, String)> {
    let controls = gate.num_controls();
    let targets = if gate.is_multi_controlled_x() { 1 } else { usize::MAX };
    let label = target_label(gate);

    qubits
        .iter()
        .enumerate()
        .take(controls.saturating_add(targets))
        .map(|(i, &q)| {
            let text = if i < controls { CONTROL.to_string() } else { label.clone() };
            (q as usize, text)
        })
        .collect()
}

fn target_label(gate: &IbmGate) -> String {
    let base = match gate.kind() {
        K::Cx | K::Ccx | K::C3x | K::C4x => "X",
        K::Mcx | K::McxGrayCode | K::McxRecursive | K::McxVchain => "X",
        K::Cy => "Y",
        K::Cz => CONTROL,
        K::Ch => "H",
        K::Csx | K::C3sx | K::Sx => "√X",
        K::Sxd => "√Xdg",
        K::Crx => "Rx",
        K::Cry => "Ry",
        K::Crz => "Rz",
        K::Cphase | K::Cu1 | K::Mcp => "P",
        K::Cu3 => "U3",
        K::Cu => "U",
        K::Swap | K::Cswap => "X",
        _ => return format!("{}{}", title(gate.name()), format_params(gate.angles())),
    };
    format!("{base}{}", format_params(gate.angles()))
}

fn title(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
