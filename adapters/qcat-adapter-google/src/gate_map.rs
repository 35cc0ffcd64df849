//! Operation kind to Cirq gate table.
//!
//! Cirq's library covers the Paulis, H, S, T, the CNOT/CZ/Toffoli family
//! and the swaps. Everything else is a matrix gate. ECR has no entry.

use std::sync::LazyLock;

use qcat_hal::{GateMap, Provider};
use qcat_ir::OperationKind as K;

use crate::native::CirqGate;

/// Kinds realized as matrix gates.
const CUSTOM: &[K] = &[
    K::Sdg,
    K::Td,
    K::Sx,
    K::Sxd,
    K::Rx,
    K::Ry,
    K::Rz,
    K::R,
    K::P,
    K::U,
    K::U1,
    K::U2,
    K::U3,
    K::Cy,
    K::Ch,
    K::Csx,
    K::Crx,
    K::Cry,
    K::Crz,
    K::Cphase,
    K::Cu,
    K::Cu1,
    K::Cu3,
    K::Rxx,
    K::Ryy,
    K::Rzz,
    K::Rzx,
    K::Dcx,
    K::Rccx,
    K::Rc3x,
    K::C3x,
    K::C3sx,
    K::C4x,
    K::Mcp,
];

static GATE_MAP: LazyLock<GateMap<CirqGate>> = LazyLock::new(build);

/// The Google gate map.
pub fn gate_map() -> &'static GateMap<CirqGate> {
    &GATE_MAP
}

fn build() -> GateMap<CirqGate> {
    GateMap::<CirqGate>::builder(Provider::Google)
        .native(K::I, |_| CirqGate::named(K::I, "I"))
        .native(K::X, |_| CirqGate::named(K::X, "X"))
        .native(K::Y, |_| CirqGate::named(K::Y, "Y"))
        .native(K::Z, |_| CirqGate::named(K::Z, "Z"))
        .native(K::H, |_| CirqGate::named(K::H, "H"))
        .native(K::S, |_| CirqGate::named(K::S, "S"))
        .native(K::T, |_| CirqGate::named(K::T, "T"))
        .native(K::Cx, |_| CirqGate::named(K::Cx, "CNOT"))
        .native(K::Cz, |_| CirqGate::named(K::Cz, "CZ"))
        .native(K::Ccx, |_| CirqGate::named(K::Ccx, "TOFFOLI"))
        .native(K::Swap, |_| CirqGate::named(K::Swap, "SWAP"))
        .native(K::Iswap, |_| CirqGate::named(K::Iswap, "ISWAP"))
        .native(K::Cswap, |_| CirqGate::named(K::Cswap, "FREDKIN"))
        .multi_controlled_x(K::Mcx)
        .multi_controlled_x(K::McxGrayCode)
        .multi_controlled_x(K::McxRecursive)
        .multi_controlled_x(K::McxVchain)
        .custom_all(CUSTOM)
        .sentinels()
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcat_hal::{GateEntry, HalError};

    #[test]
    fn test_ecr_is_omitted() {
        let err = gate_map().get(K::Ecr).unwrap_err();
        assert!(matches!(
            err,
            HalError::UnsupportedOperation {
                kind: K::Ecr,
                provider: Provider::Google
            }
        ));
    }

    #[test]
    fn test_everything_but_ecr_is_covered() {
        let map = gate_map();
        for kind in K::ALL {
            assert_eq!(map.supports(kind), kind != K::Ecr, "{kind}");
        }
        assert_eq!(map.custom_kinds().len(), CUSTOM.len());
    }

    #[test]
    fn test_entry_categories() {
        let map = gate_map();
        assert!(matches!(map.get(K::Cx).unwrap(), GateEntry::Native(_)));
        assert!(matches!(map.get(K::Rz).unwrap(), GateEntry::Custom(_)));
        assert!(matches!(
            map.get(K::McxGrayCode).unwrap(),
            GateEntry::MultiControlledX
        ));
        assert!(matches!(map.get(K::MeasureAll).unwrap(), GateEntry::MeasureAll));
    }
}
