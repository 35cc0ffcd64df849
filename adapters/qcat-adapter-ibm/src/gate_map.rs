//! Operation kind to Qiskit instruction table.
//!
//! Every gate kind has a Qiskit counterpart, so the table has no custom
//! entries. `mct` is the sentinel resolved by the translator.

use std::sync::LazyLock;

use qcat_hal::{GateMap, Provider};
use qcat_ir::OperationKind as K;

use crate::native::IbmGate;

static GATE_MAP: LazyLock<GateMap<IbmGate>> = LazyLock::new(build);

/// The IBM gate map.
pub fn gate_map() -> &'static GateMap<IbmGate> {
    &GATE_MAP
}

fn build() -> GateMap<IbmGate> {
    GateMap::<IbmGate>::builder(Provider::Ibm)
        // Pauli and Clifford
        .native(K::I, |p| IbmGate::new(K::I, "id", p))
        .native(K::X, |p| IbmGate::new(K::X, "x", p))
        .native(K::Y, |p| IbmGate::new(K::Y, "y", p))
        .native(K::Z, |p| IbmGate::new(K::Z, "z", p))
        .native(K::H, |p| IbmGate::new(K::H, "h", p))
        .native(K::S, |p| IbmGate::new(K::S, "s", p))
        .native(K::Sdg, |p| IbmGate::new(K::Sdg, "sdg", p))
        .native(K::T, |p| IbmGate::new(K::T, "t", p))
        .native(K::Td, |p| IbmGate::new(K::Td, "tdg", p))
        .native(K::Sx, |p| IbmGate::new(K::Sx, "sx", p))
        .native(K::Sxd, |p| IbmGate::new(K::Sxd, "sxdg", p))
        // Rotations
        .native(K::Rx, |p| IbmGate::new(K::Rx, "rx", p))
        .native(K::Ry, |p| IbmGate::new(K::Ry, "ry", p))
        .native(K::Rz, |p| IbmGate::new(K::Rz, "rz", p))
        .native(K::R, |p| IbmGate::new(K::R, "r", p))
        .native(K::P, |p| IbmGate::new(K::P, "p", p))
        .native(K::U, |p| IbmGate::new(K::U, "u", p))
        .native(K::U1, |p| IbmGate::new(K::U1, "u1", p))
        .native(K::U2, |p| IbmGate::new(K::U2, "u2", p))
        .native(K::U3, |p| IbmGate::new(K::U3, "u3", p))
        // Two-qubit
        .native(K::Cx, |p| IbmGate::new(K::Cx, "cx", p))
        .native(K::Cy, |p| IbmGate::new(K::Cy, "cy", p))
        .native(K::Cz, |p| IbmGate::new(K::Cz, "cz", p))
        .native(K::Ch, |p| IbmGate::new(K::Ch, "ch", p))
        .native(K::Csx, |p| IbmGate::new(K::Csx, "csx", p))
        .native(K::Crx, |p| IbmGate::new(K::Crx, "crx", p))
        .native(K::Cry, |p| IbmGate::new(K::Cry, "cry", p))
        .native(K::Crz, |p| IbmGate::new(K::Crz, "crz", p))
        .native(K::Cphase, |p| IbmGate::new(K::Cphase, "cp", p))
        .native(K::Cu1, |p| IbmGate::new(K::Cu1, "cu1", p))
        .native(K::Cu3, |p| IbmGate::new(K::Cu3, "cu3", p))
        .native(K::Cu, |p| IbmGate::new(K::Cu, "cu", p))
        .native(K::Swap, |p| IbmGate::new(K::Swap, "swap", p))
        .native(K::Iswap, |p| IbmGate::new(K::Iswap, "iswap", p))
        .native(K::Dcx, |p| IbmGate::new(K::Dcx, "dcx", p))
        .native(K::Ecr, |p| IbmGate::new(K::Ecr, "ecr", p))
        .native(K::Rxx, |p| IbmGate::new(K::Rxx, "rxx", p))
        .native(K::Ryy, |p| IbmGate::new(K::Ryy, "ryy", p))
        .native(K::Rzz, |p| IbmGate::new(K::Rzz, "rzz", p))
        .native(K::Rzx, |p| IbmGate::new(K::Rzx, "rzx", p))
        // Three qubits and more
        .native(K::Ccx, |p| IbmGate::new(K::Ccx, "ccx", p))
        .native(K::Cswap, |p| IbmGate::new(K::Cswap, "cswap", p))
        .native(K::Rccx, |p| IbmGate::new(K::Rccx, "rccx", p))
        .native(K::Rc3x, |p| IbmGate::new(K::Rc3x, "rcccx", p))
        .native(K::C3x, |p| IbmGate::new(K::C3x, "mcx", p))
        .native(K::C3sx, |p| IbmGate::new(K::C3sx, "c3sx", p))
        .native(K::C4x, |p| IbmGate::new(K::C4x, "mcx", p))
        .native(K::Mcx, |p| IbmGate::new(K::Mcx, "mcx", p))
        .native(K::McxGrayCode, |p| IbmGate::new(K::McxGrayCode, "mcx_gray", p))
        .native(K::McxRecursive, |p| {
            IbmGate::new(K::McxRecursive, "mcx_recursive", p)
        })
        .native(K::McxVchain, |p| IbmGate::new(K::McxVchain, "mcx_vchain", p))
        .native(K::Mcp, |p| IbmGate::new(K::Mcp, "mcphase", p))
        .sentinels()
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcat_hal::GateEntry;

    #[test]
    fn test_every_kind_is_covered() {
        let map = gate_map();
        for kind in K::ALL {
            assert!(map.supports(kind), "{kind} missing from the IBM gate map");
        }
        assert!(map.custom_kinds().is_empty());
    }

    #[test]
    fn test_native_names() {
        let GateEntry::Native(ctor) = gate_map().get(K::Cphase).unwrap() else {
            panic!("cphase should be native");
        };
        let gate = ctor(&[0.3]);
        assert_eq!(gate.name(), "cp");
        assert_eq!(gate.params(), &[0.3]);
    }

    #[test]
    fn test_mct_is_sentinel() {
        assert!(matches!(
            gate_map().get(K::Mct).unwrap(),
            GateEntry::MultiControlledX
        ));
    }
}
