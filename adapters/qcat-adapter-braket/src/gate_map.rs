//! Operation kind to Braket gate table.

use std::sync::LazyLock;

use qcat_hal::{GateMap, Provider};
use qcat_ir::OperationKind as K;

use crate::native::BraketGate;

/// Kinds submitted as unitary pragmas.
const CUSTOM: &[K] = &[
    K::U,
    K::U2,
    K::U3,
    K::Cu,
    K::Cu3,
    K::Crx,
    K::Cry,
    K::Crz,
    K::Ch,
    K::Csx,
    K::Rzx,
    K::R,
    K::Dcx,
    K::Rccx,
    K::Rc3x,
    K::C3x,
    K::C3sx,
    K::C4x,
    K::Mcp,
    K::Mcx,
    K::McxGrayCode,
    K::McxRecursive,
    K::McxVchain,
];

static GATE_MAP: LazyLock<GateMap<BraketGate>> = LazyLock::new(build);

/// The Braket gate map.
pub fn gate_map() -> &'static GateMap<BraketGate> {
    &GATE_MAP
}

fn build() -> GateMap<BraketGate> {
    GateMap::<BraketGate>::builder(Provider::Braket)
        .native(K::I, |p| BraketGate::named(K::I, "i", p))
        .native(K::X, |p| BraketGate::named(K::X, "x", p))
        .native(K::Y, |p| BraketGate::named(K::Y, "y", p))
        .native(K::Z, |p| BraketGate::named(K::Z, "z", p))
        .native(K::H, |p| BraketGate::named(K::H, "h", p))
        .native(K::S, |p| BraketGate::named(K::S, "s", p))
        .native(K::Sdg, |p| BraketGate::named(K::Sdg, "si", p))
        .native(K::T, |p| BraketGate::named(K::T, "t", p))
        .native(K::Td, |p| BraketGate::named(K::Td, "ti", p))
        .native(K::Sx, |p| BraketGate::named(K::Sx, "v", p))
        .native(K::Sxd, |p| BraketGate::named(K::Sxd, "vi", p))
        .native(K::Rx, |p| BraketGate::named(K::Rx, "rx", p))
        .native(K::Ry, |p| BraketGate::named(K::Ry, "ry", p))
        .native(K::Rz, |p| BraketGate::named(K::Rz, "rz", p))
        .native(K::P, |p| BraketGate::named(K::P, "phaseshift", p))
        .native(K::U1, |p| BraketGate::named(K::U1, "phaseshift", p))
        .native(K::Cx, |p| BraketGate::named(K::Cx, "cnot", p))
        .native(K::Cy, |p| BraketGate::named(K::Cy, "cy", p))
        .native(K::Cz, |p| BraketGate::named(K::Cz, "cz", p))
        .native(K::Cphase, |p| BraketGate::named(K::Cphase, "cphaseshift", p))
        .native(K::Cu1, |p| BraketGate::named(K::Cu1, "cphaseshift", p))
        .native(K::Ccx, |p| BraketGate::named(K::Ccx, "ccnot", p))
        .native(K::Swap, |p| BraketGate::named(K::Swap, "swap", p))
        .native(K::Iswap, |p| BraketGate::named(K::Iswap, "iswap", p))
        .native(K::Cswap, |p| BraketGate::named(K::Cswap, "cswap", p))
        .native(K::Rxx, |p| BraketGate::named(K::Rxx, "xx", p))
        .native(K::Ryy, |p| BraketGate::named(K::Ryy, "yy", p))
        .native(K::Rzz, |p| BraketGate::named(K::Rzz, "zz", p))
        .native(K::Ecr, |p| BraketGate::named(K::Ecr, "ecr", p))
        .custom_all(CUSTOM)
        .sentinels()
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcat_hal::GateEntry;

    #[test]
    fn test_every_kind_covered() {
        let map = gate_map();
        for kind in K::ALL {
            assert!(map.supports(kind), "{kind}");
        }
        assert_eq!(map.custom_kinds().len(), CUSTOM.len());
    }

    #[test]
    fn test_braket_names() {
        let map = gate_map();
        let GateEntry::Native(ctor) = map.get(K::Cu1).unwrap() else {
            panic!("cu1 should be native");
        };
        assert_eq!(ctor(&[0.5]).name(), "cphaseshift");
        assert!(matches!(map.get(K::Mcx).unwrap(), GateEntry::Custom(_)));
        assert!(matches!(map.get(K::Mct).unwrap(), GateEntry::MultiControlledX));
    }
}
