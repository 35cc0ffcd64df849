//! OpenQASM 3 emission for Qiskit Runtime submission.
//!
//! Gates from `stdgates.inc` are emitted by name. The rest become gate
//! modifiers (`inv @`, `ctrl(n) @`) or an inline `gate` definition placed
//! ahead of the register declarations.

use std::f64::consts::FRAC_PI_2;
use std::fmt::Write;

use qcat_hal::NativeCircuit;
use qcat_ir::OperationKind as K;

use crate::error::{IbmError, IbmResult};
use crate::native::{IbmCircuit, IbmGate, IbmInstruction};

/// Inline definitions in dependency order.
const DEFINITIONS: &[(&str, &str)] = &[
    (
        "iswap",
        "gate iswap a, b { s a; s b; h a; cx a, b; cx b, a; h b; }",
    ),
    ("dcx", "gate dcx a, b { cx a, b; cx b, a; }"),
    (
        "rxx",
        "gate rxx(theta) a, b { h a; h b; cx a, b; rz(theta) b; cx a, b; h a; h b; }",
    ),
    (
        "ryy",
        "gate ryy(theta) a, b { rx(pi/2) a; rx(pi/2) b; cx a, b; rz(theta) b; cx a, b; rx(-pi/2) a; rx(-pi/2) b; }",
    ),
    ("rzz", "gate rzz(theta) a, b { cx a, b; rz(theta) b; cx a, b; }"),
    (
        "rzx",
        "gate rzx(theta) a, b { h b; cx a, b; rz(theta) b; cx a, b; h b; }",
    ),
    (
        "ecr",
        "gate ecr a, b { rzx(pi/4) a, b; x a; rzx(-pi/4) a, b; }",
    ),
    (
        "rccx",
        "gate rccx a, b, c { u2(0, pi) c; u1(pi/4) c; cx b, c; u1(-pi/4) c; cx a, c; u1(pi/4) c; cx b, c; u1(-pi/4) c; u2(0, pi) c; }",
    ),
    (
        "rcccx",
        "gate rcccx a, b, c, d { u2(0, pi) d; u1(pi/4) d; cx c, d; u1(-pi/4) d; u2(0, pi) d; cx a, d; u1(pi/4) d; cx b, d; u1(-pi/4) d; cx a, d; u1(pi/4) d; cx b, d; u1(-pi/4) d; u2(0, pi) d; u1(pi/4) d; cx c, d; u1(-pi/4) d; u2(0, pi) d; }",
    ),
];

/// Emit `circuit` as an OpenQASM 3 program.
pub fn emit(circuit: &IbmCircuit) -> IbmResult<String> {
    let mut body = String::new();
    let mut used: Vec<&'static str> = Vec::new();

    for inst in circuit.instructions() {
        match inst {
            IbmInstruction::Gate { gate, qubits } => {
                let (head, operands) = statement(gate, qubits)?;
                if let Some(def) = definition_for(gate.kind()) {
                    used.push(def);
                    if def == "ecr" {
                        used.push("rzx");
                    }
                }
                let operands: Vec<String> = operands.iter().map(|q| format!("q[{q}]")).collect();
                let _ = writeln!(body, "{head} {};", operands.join(", "));
            }
            IbmInstruction::Measure { qubit, clbit } => {
                let _ = writeln!(body, "c[{clbit}] = measure q[{qubit}];");
            }
        }
    }

    let mut out = String::from("OPENQASM 3.0;\ninclude \"stdgates.inc\";\n");
    for (name, def) in DEFINITIONS {
        if used.contains(name) {
            out.push_str(def);
            out.push('\n');
        }
    }
    let _ = writeln!(out, "qubit[{}] q;", circuit.num_qubits());
    if circuit.num_clbits() > 0 {
        let _ = writeln!(out, "bit[{}] c;", circuit.num_clbits());
    }
    out.push_str(&body);
    Ok(out)
}

fn definition_for(kind: K) -> Option<&'static str> {
    match kind {
        K::Iswap => Some("iswap"),
        K::Dcx => Some("dcx"),
        K::Rxx => Some("rxx"),
        K::Ryy => Some("ryy"),
        K::Rzz => Some("rzz"),
        K::Rzx => Some("rzx"),
        K::Ecr => Some("ecr"),
        K::Rccx => Some("rccx"),
        K::Rc3x => Some("rcccx"),
        _ => None,
    }
}

fn angles(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(f64::to_string).collect();
    format!("({})", parts.join(", "))
}

/// Gate head and the operands it applies to.
fn statement<'a>(gate: &IbmGate, qubits: &'a [u32]) -> IbmResult<(String, &'a [u32])> {
    let p = gate.angles();
    let arg = |i: usize| {
        p.get(i).copied().ok_or_else(|| {
            IbmError::CircuitError(format!("'{}' is missing parameter {i}", gate.name()))
        })
    };

    let head = match gate.kind() {
        K::I => "id".to_string(),
        K::Sxd => "inv @ sx".to_string(),
        K::U => format!("U{}", angles(p)),
        K::R => {
            let (theta, phi) = (arg(0)?, arg(1)?);
            format!("U{}", angles(&[theta, phi - FRAC_PI_2, FRAC_PI_2 - phi]))
        }
        K::Cu1 => format!("cp{}", angles(p)),
        K::Cu3 => format!("ctrl @ U{}", angles(p)),
        K::Csx => "ctrl @ sx".to_string(),
        K::C3x => "ctrl(3) @ x".to_string(),
        K::C3sx => "ctrl(3) @ sx".to_string(),
        K::C4x => "ctrl(4) @ x".to_string(),
        K::Mcx | K::McxGrayCode | K::McxRecursive | K::McxVchain => {
            let n = gate.num_controls();
            let operands = qubits.get(..=n).ok_or_else(|| {
                IbmError::CircuitError(format!("'{}' needs {} operands", gate.name(), n + 1))
            })?;
            return Ok((format!("ctrl({n}) @ x"), operands));
        }
        K::Mcp => format!("ctrl({}) @ p({})", gate.num_controls(), arg(0)?),
        K::Measure | K::MeasureAll | K::Mct => {
            return Err(IbmError::CircuitError(format!(
                "'{}' is not a gate instruction",
                gate.name()
            )));
        }
        _ if p.is_empty() => gate.name().to_string(),
        _ => format!("{}{}", gate.name(), angles(p)),
    };
    Ok((head, qubits))
}
