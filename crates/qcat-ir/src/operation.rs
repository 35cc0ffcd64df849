//! Operation catalog and operation records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::IrError;
use crate::qubit::{ClbitId, QubitId};

/// Every gate and measurement kind the IR can express.
///
/// The discriminants are stable numeric codes; measurements live in the
/// 100 range so new gate kinds can be appended below them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum OperationKind {
    X = 1,
    Y = 2,
    Z = 3,
    Cx = 4,
    Ccx = 5,
    /// Multi-controlled X with ancillas and a decomposition mode.
    Mct = 6,
    H = 7,
    Cy = 8,
    Cz = 9,
    I = 10,
    /// Toffoli up to relative phases.
    Rccx = 11,
    /// Three-control Toffoli up to relative phases.
    Rc3x = 12,
    Rxx = 13,
    Rx = 14,
    /// Rotation by theta about the axis cos(phi) X + sin(phi) Y.
    R = 15,
    P = 16,
    /// Multi-controlled phase.
    Mcp = 17,
    Mcx = 18,
    McxGrayCode = 19,
    McxRecursive = 20,
    McxVchain = 21,
    Dcx = 22,
    Ch = 23,
    Csx = 24,
    Cswap = 25,
    Cphase = 26,
    Crx = 27,
    Cry = 28,
    Crz = 29,
    Cu = 30,
    Cu1 = 31,
    Cu3 = 32,
    C3x = 33,
    C3sx = 34,
    C4x = 35,
    Ry = 36,
    Ryy = 37,
    Rz = 38,
    Rzz = 39,
    Rzx = 40,
    Ecr = 41,
    S = 42,
    Sdg = 43,
    Swap = 44,
    Iswap = 45,
    Sx = 46,
    Sxd = 47,
    T = 48,
    Td = 49,
    U = 50,
    U1 = 51,
    U2 = 52,
    U3 = 53,
    Measure = 100,
    MeasureAll = 101,
}

impl OperationKind {
    /// All kinds in code order.
    pub const ALL: [OperationKind; 55] = [
        Self::X,
        Self::Y,
        Self::Z,
        Self::Cx,
        Self::Ccx,
        Self::Mct,
        Self::H,
        Self::Cy,
        Self::Cz,
        Self::I,
        Self::Rccx,
        Self::Rc3x,
        Self::Rxx,
        Self::Rx,
        Self::R,
        Self::P,
        Self::Mcp,
        Self::Mcx,
        Self::McxGrayCode,
        Self::McxRecursive,
        Self::McxVchain,
        Self::Dcx,
        Self::Ch,
        Self::Csx,
        Self::Cswap,
        Self::Cphase,
        Self::Crx,
        Self::Cry,
        Self::Crz,
        Self::Cu,
        Self::Cu1,
        Self::Cu3,
        Self::C3x,
        Self::C3sx,
        Self::C4x,
        Self::Ry,
        Self::Ryy,
        Self::Rz,
        Self::Rzz,
        Self::Rzx,
        Self::Ecr,
        Self::S,
        Self::Sdg,
        Self::Swap,
        Self::Iswap,
        Self::Sx,
        Self::Sxd,
        Self::T,
        Self::Td,
        Self::U,
        Self::U1,
        Self::U2,
        Self::U3,
        Self::Measure,
        Self::MeasureAll,
    ];

    /// Stable numeric code.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Look up a kind by its numeric code.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.code() == code)
    }

    /// Lower-case mnemonic.
    pub fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
            Self::Cx => "cx",
            Self::Ccx => "ccx",
            Self::Mct => "mct",
            Self::H => "h",
            Self::Cy => "cy",
            Self::Cz => "cz",
            Self::I => "i",
            Self::Rccx => "rccx",
            Self::Rc3x => "rc3x",
            Self::Rxx => "rxx",
            Self::Rx => "rx",
            Self::R => "r",
            Self::P => "p",
            Self::Mcp => "mcp",
            Self::Mcx => "mcx",
            Self::McxGrayCode => "mcx_gray_code",
            Self::McxRecursive => "mcx_recursive",
            Self::McxVchain => "mcx_vchain",
            Self::Dcx => "dcx",
            Self::Ch => "ch",
            Self::Csx => "csx",
            Self::Cswap => "cswap",
            Self::Cphase => "cphase",
            Self::Crx => "crx",
            Self::Cry => "cry",
            Self::Crz => "crz",
            Self::Cu => "cu",
            Self::Cu1 => "cu1",
            Self::Cu3 => "cu3",
            Self::C3x => "c3x",
            Self::C3sx => "c3sx",
            Self::C4x => "c4x",
            Self::Ry => "ry",
            Self::Ryy => "ryy",
            Self::Rz => "rz",
            Self::Rzz => "rzz",
            Self::Rzx => "rzx",
            Self::Ecr => "ecr",
            Self::S => "s",
            Self::Sdg => "sdg",
            Self::Swap => "swap",
            Self::Iswap => "iswap",
            Self::Sx => "sx",
            Self::Sxd => "sxd",
            Self::T => "t",
            Self::Td => "td",
            Self::U => "u",
            Self::U1 => "u1",
            Self::U2 => "u2",
            Self::U3 => "u3",
            Self::Measure => "measure",
            Self::MeasureAll => "measure_all",
        }
    }

    /// Number of qubits the gate acts on, or `None` when the arity comes
    /// from the control count (multi-controlled kinds) or the circuit width
    /// (`measure_all`).
    pub fn num_qubits(self) -> Option<u32> {
        match self {
            Self::X
            | Self::Y
            | Self::Z
            | Self::H
            | Self::I
            | Self::Rx
            | Self::Ry
            | Self::Rz
            | Self::R
            | Self::P
            | Self::S
            | Self::Sdg
            | Self::Sx
            | Self::Sxd
            | Self::T
            | Self::Td
            | Self::U
            | Self::U1
            | Self::U2
            | Self::U3
            | Self::Measure => Some(1),

            Self::Cx
            | Self::Cy
            | Self::Cz
            | Self::Ch
            | Self::Csx
            | Self::Cphase
            | Self::Crx
            | Self::Cry
            | Self::Crz
            | Self::Cu
            | Self::Cu1
            | Self::Cu3
            | Self::Rxx
            | Self::Ryy
            | Self::Rzz
            | Self::Rzx
            | Self::Dcx
            | Self::Ecr
            | Self::Swap
            | Self::Iswap => Some(2),

            Self::Ccx | Self::Rccx | Self::Cswap => Some(3),
            Self::C3x | Self::C3sx | Self::Rc3x => Some(4),
            Self::C4x => Some(5),

            Self::Mct
            | Self::Mcp
            | Self::Mcx
            | Self::McxGrayCode
            | Self::McxRecursive
            | Self::McxVchain
            | Self::MeasureAll => None,
        }
    }

    /// Number of real parameters stored on the operation.
    ///
    /// For the multi-controlled kinds this includes the trailing control
    /// count (and the dirty-ancilla flag for `mcx_vchain`).
    pub fn num_params(self) -> usize {
        match self {
            Self::Rx
            | Self::Ry
            | Self::Rz
            | Self::P
            | Self::U1
            | Self::Rxx
            | Self::Ryy
            | Self::Rzz
            | Self::Rzx
            | Self::Crx
            | Self::Cry
            | Self::Crz
            | Self::Cphase
            | Self::Cu1
            | Self::Mcx
            | Self::McxGrayCode
            | Self::McxRecursive => 1,
            Self::R | Self::U2 | Self::Mcp | Self::McxVchain => 2,
            Self::U | Self::U3 | Self::Cu3 => 3,
            Self::Cu => 4,
            _ => 0,
        }
    }

    /// Whether this is one of the measurement sentinels.
    pub fn is_measurement(self) -> bool {
        matches!(self, Self::Measure | Self::MeasureAll)
    }

    /// Whether the arity is set by a stored control count.
    pub fn is_multi_controlled(self) -> bool {
        matches!(
            self,
            Self::Mct
                | Self::Mcp
                | Self::Mcx
                | Self::McxGrayCode
                | Self::McxRecursive
                | Self::McxVchain
        )
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OperationKind {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name() == lower)
            .ok_or_else(|| IrError::UnknownOperation(s.to_string()))
    }
}

/// Decomposition mode of a multi-controlled X.
///
/// The mode never changes the gate's unitary; backends that synthesize the
/// gate themselves use it to choose an ancilla strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum McxMode {
    #[default]
    NoAncilla,
    Recursion,
    VChain,
    VChainDirty,
}

impl McxMode {
    /// Mode name as accepted by IBM-style tooling.
    pub fn name(self) -> &'static str {
        match self {
            Self::NoAncilla => "noancilla",
            Self::Recursion => "recursion",
            Self::VChain => "v-chain",
            Self::VChainDirty => "v-chain-dirty",
        }
    }
}

impl fmt::Display for McxMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One IR record: a gate or measurement applied to qubits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// What is applied.
    pub kind: OperationKind,
    /// Qubit groups. Position encodes role: controls before targets.
    pub qubit_args: Vec<Vec<QubitId>>,
    /// Real parameters, including any trailing control count.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<f64>,
    /// Classical bits written by a measurement.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classical_args: Vec<ClbitId>,
    /// Decomposition mode, only set for `mct`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<McxMode>,
}

impl Operation {
    /// Create an operation with the given qubit groups and parameters.
    pub fn new(kind: OperationKind, qubit_args: Vec<Vec<QubitId>>, params: Vec<f64>) -> Self {
        Self {
            kind,
            qubit_args,
            params,
            classical_args: vec![],
            mode: None,
        }
    }

    /// Attach classical bits.
    #[must_use]
    pub fn with_classical(mut self, clbits: Vec<ClbitId>) -> Self {
        self.classical_args = clbits;
        self
    }

    /// Attach a multi-controlled X decomposition mode.
    #[must_use]
    pub fn with_mode(mut self, mode: McxMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// All qubits in argument order, groups flattened.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.qubit_args.iter().flatten().copied()
    }

    /// Stored control count for the multi-controlled kinds.
    pub fn control_count(&self) -> Option<usize> {
        let raw = match self.kind {
            OperationKind::Mct => return self.qubit_args.first().map(Vec::len),
            OperationKind::Mcx
            | OperationKind::McxGrayCode
            | OperationKind::McxRecursive
            | OperationKind::McxVchain => self.params.first(),
            OperationKind::Mcp => self.params.get(1),
            _ => return None,
        };
        raw.map(|n| *n as usize)
    }

    /// Qubits the gate's unitary acts on, controls first then target.
    ///
    /// Ancillas of the multi-controlled kinds are excluded, and so are the
    /// measurement sentinels.
    pub fn gate_qubits(&self) -> Vec<QubitId> {
        match self.kind {
            OperationKind::Mct => self
                .qubit_args
                .iter()
                .take(2)
                .flatten()
                .copied()
                .collect(),
            OperationKind::Mcx
            | OperationKind::McxGrayCode
            | OperationKind::McxRecursive
            | OperationKind::McxVchain
            | OperationKind::Mcp => {
                let n = self.control_count().unwrap_or(0);
                self.qubits().take(n + 1).collect()
            }
            OperationKind::Measure | OperationKind::MeasureAll => vec![],
            _ => self.qubits().collect(),
        }
    }

    /// Ancilla qubits of the multi-controlled kinds.
    pub fn ancillas(&self) -> Vec<QubitId> {
        match self.kind {
            OperationKind::Mct => self.qubit_args.get(2).cloned().unwrap_or_default(),
            OperationKind::Mcx
            | OperationKind::McxGrayCode
            | OperationKind::McxRecursive
            | OperationKind::McxVchain => {
                let n = self.control_count().unwrap_or(0);
                self.qubits().skip(n + 1).collect()
            }
            _ => vec![],
        }
    }

    /// Parameters that feed the unitary, i.e. without control counts or
    /// ancilla flags.
    pub fn gate_params(&self) -> &[f64] {
        match self.kind {
            OperationKind::Mcp => &self.params[..self.params.len().min(1)],
            OperationKind::Mcx
            | OperationKind::McxGrayCode
            | OperationKind::McxRecursive
            | OperationKind::McxVchain
            | OperationKind::Mct => &[],
            _ => &self.params,
        }
    }

    /// Whether this is a measurement sentinel.
    pub fn is_measurement(&self) -> bool {
        self.kind.is_measurement()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.params.is_empty() {
            let params: Vec<String> = self.params.iter().map(|p| format!("{p:.4}")).collect();
            write!(f, "({})", params.join(", "))?;
        }
        let qubits: Vec<String> = self.qubits().map(|q| q.to_string()).collect();
        if !qubits.is_empty() {
            write!(f, " {}", qubits.join(", "))?;
        }
        if !self.classical_args.is_empty() {
            let clbits: Vec<String> = self.classical_args.iter().map(|c| c.to_string()).collect();
            write!(f, " -> {}", clbits.join(", "))?;
        }
        Ok(())
    }
}
