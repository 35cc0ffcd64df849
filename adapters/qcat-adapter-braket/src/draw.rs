//! Braket-style ASCII drawing.

use qcat_hal::{DiagramStyle, NativeCircuit, TextDiagram, format_params};

use crate::native::{BraketCircuit, BraketGate, ResultType};

const CONTROL: &str = "C";

/// Render `circuit` in ASCII with one `q{i}` wire per qubit and the result
/// types in a final column.
pub fn draw(circuit: &BraketCircuit) -> String {
    let labels = (0..circuit.num_qubits()).map(|q| format!("q{q}")).collect();
    let mut diagram = TextDiagram::new(labels).with_style(DiagramStyle::ASCII);

    for inst in circuit.instructions() {
        let controls = inst.gate.num_controls();
        let label = target_label(&inst.gate);
        let cells = inst
            .target
            .iter()
            .enumerate()
            .map(|(i, &q)| {
                let text = if i < controls { CONTROL.to_string() } else { label.clone() };
                (q, text)
            })
            .collect();
        diagram.push(cells);
    }

    for ResultType::Probability { targets } in circuit.result_types() {
        diagram.push(targets.iter().map(|&q| (q, "Probability".to_string())).collect());
    }
    diagram.render()
}

fn target_label(gate: &BraketGate) -> String {
    match gate {
        BraketGate::Unitary { .. } => "U".to_string(),
        BraketGate::Named { name, params, .. } => {
            let base = match *name {
                "cnot" | "ccnot" => "X",
                "cy" => "Y",
                "cz" => "Z",
                "cswap" => "SWAP",
                "cphaseshift" => "PHASE",
                other => return format!("{}{}", other.to_uppercase(), format_params(params)),
            };
            format!("{base}{}", format_params(params))
        }
    }
}
