//! Braket device ARNs and names.

/// Rigetti Ankaa-3 (84 qubits, superconducting).
pub const RIGETTI_ANKAA_3: &str = "arn:aws:braket:us-west-1::device/qpu/rigetti/Ankaa-3";

/// IonQ Aria (25 qubits, trapped-ion).
pub const IONQ_ARIA: &str = "arn:aws:braket:us-east-1::device/qpu/ionq/Aria-1";

/// IonQ Aria 2 (25 qubits, trapped-ion).
pub const IONQ_ARIA_2: &str = "arn:aws:braket:us-east-1::device/qpu/ionq/Aria-2";

/// IonQ Forte (36 qubits, trapped-ion).
pub const IONQ_FORTE: &str = "arn:aws:braket:us-east-1::device/qpu/ionq/Forte-1";

/// IQM Garnet (20 qubits, superconducting).
pub const IQM_GARNET: &str = "arn:aws:braket:eu-north-1::device/qpu/iqm/Garnet";

/// SV1 state vector simulator.
pub const SV1: &str = "arn:aws:braket:::device/quantum-simulator/amazon/sv1";

/// TN1 tensor network simulator.
pub const TN1: &str = "arn:aws:braket:::device/quantum-simulator/amazon/tn1";

/// DM1 density matrix simulator.
pub const DM1: &str = "arn:aws:braket:::device/quantum-simulator/amazon/dm1";

/// Device used when none is requested.
pub const DEFAULT_DEVICE: &str = SV1;

/// Qubit limit of a known device.
pub fn max_qubits(device_arn: &str) -> Option<usize> {
    match device_arn {
        RIGETTI_ANKAA_3 => Some(84),
        IONQ_ARIA | IONQ_ARIA_2 => Some(25),
        IONQ_FORTE => Some(36),
        IQM_GARNET => Some(20),
        SV1 => Some(34),
        TN1 => Some(50),
        DM1 => Some(17),
        _ => None,
    }
}

/// Map a friendly device name to its ARN.
pub fn arn_for_name(name: &str) -> Option<&'static str> {
    match name.to_lowercase().as_str() {
        "rigetti" | "ankaa" | "ankaa-3" | "ankaa3" => Some(RIGETTI_ANKAA_3),
        "ionq" | "aria" | "aria-1" => Some(IONQ_ARIA),
        "aria-2" => Some(IONQ_ARIA_2),
        "forte" | "forte-1" => Some(IONQ_FORTE),
        "iqm-garnet" | "garnet" => Some(IQM_GARNET),
        "sv1" | "braket-sv1" => Some(SV1),
        "tn1" | "braket-tn1" => Some(TN1),
        "dm1" | "braket-dm1" => Some(DM1),
        _ => None,
    }
}

/// Resolve a requested device, an ARN or a friendly name, to an ARN.
///
/// No request means [`DEFAULT_DEVICE`]; unknown names yield `None`.
pub fn resolve(device: Option<&str>) -> Option<String> {
    match device {
        None => Some(DEFAULT_DEVICE.to_string()),
        Some(arn) if arn.starts_with("arn:aws:braket:") => Some(arn.to_string()),
        Some(name) => arn_for_name(name).map(str::to_string),
    }
}

/// Region encoded in a device ARN. Managed simulators carry none.
pub fn region_from_arn(device_arn: &str) -> Option<&str> {
    // arn:aws:braket:<region>::device/<type>/<provider>/<device>
    device_arn.split(':').nth(3).filter(|r| !r.is_empty())
}

/// Provider segment of a device ARN.
pub fn provider_from_arn(device_arn: &str) -> &str {
    device_arn.split('/').nth(2).unwrap_or("unknown")
}
