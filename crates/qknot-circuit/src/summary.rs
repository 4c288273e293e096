//! Canonical circuit summaries and content signatures.

use std::collections::BTreeMap;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::circuit::Circuit;
use crate::error::{CircuitError, CircuitResult};
use crate::planner::ClosureMethod;
use crate::transpile::OptimizationLevel;

/// Gate names counted as two-qubit operations.
pub const TWO_QUBIT_GATE_NAMES: &[&str] = &[
    "cx", "cz", "cp", "swap", "ecr", "rzz", "rxx", "ryy", "iswap", "crx", "cry", "crz",
];

/// Number of hex characters kept from the digest.
const SIGNATURE_LEN: usize = 16;

/// Metrics of a transpiled circuit plus its signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CircuitSummary {
    pub depth: usize,
    pub size: usize,
    pub width: u32,
    pub num_qubits: u32,
    pub num_clbits: u32,
    pub two_qubit_gate_count: usize,
    pub measurement_count: usize,
    /// Gate name to count, sorted by name.
    pub operation_counts: BTreeMap<String, usize>,
    /// First 16 hex characters of SHA-256 over the canonical payload.
    pub signature: String,
}

/// The exact payload hashed into the signature.
#[derive(Serialize)]
struct SignaturePayload<'a> {
    braid_word: &'a str,
    closure_method: ClosureMethod,
    optimization_level: OptimizationLevel,
    depth: usize,
    size: usize,
    width: u32,
    num_qubits: u32,
    num_clbits: u32,
    two_qubit_gate_count: usize,
    measurement_count: usize,
    operation_counts: &'a BTreeMap<String, usize>,
}

impl CircuitSummary {
    /// Summarize a transpiled circuit compiled from the given inputs.
    pub fn from_transpiled(
        circuit: &Circuit,
        braid_word: &str,
        closure_method: ClosureMethod,
        optimization_level: OptimizationLevel,
    ) -> CircuitResult<Self> {
        let operation_counts = circuit.count_ops();
        let two_qubit_gate_count = count_two_qubit_gates(&operation_counts);
        let measurement_count = operation_counts.get("measure").copied().unwrap_or(0);

        let payload = SignaturePayload {
            braid_word,
            closure_method,
            optimization_level,
            depth: circuit.depth(),
            size: circuit.size(),
            width: circuit.width(),
            num_qubits: circuit.num_qubits(),
            num_clbits: circuit.num_clbits(),
            two_qubit_gate_count,
            measurement_count,
            operation_counts: &operation_counts,
        };
        let signature = compute_signature(&payload)?;

        Ok(Self {
            depth: payload.depth,
            size: payload.size,
            width: payload.width,
            num_qubits: payload.num_qubits,
            num_clbits: payload.num_clbits,
            two_qubit_gate_count,
            measurement_count,
            operation_counts,
            signature,
        })
    }
}

/// Sum the counts of known two-qubit gate names.
pub fn count_two_qubit_gates(operation_counts: &BTreeMap<String, usize>) -> usize {
    operation_counts
        .iter()
        .filter(|(name, _)| TWO_QUBIT_GATE_NAMES.contains(&name.as_str()))
        .map(|(_, count)| count)
        .sum()
}

/// Hash the key-sorted compact JSON form of `payload`.
fn compute_signature<T: Serialize>(payload: &T) -> CircuitResult<String> {
    // Round-tripping through `Value` sorts object keys.
    let value =
        serde_json::to_value(payload).map_err(|e| CircuitError::Serialization(e.to_string()))?;
    let canonical =
        serde_json::to_string(&value).map_err(|e| CircuitError::Serialization(e.to_string()))?;

    let digest = Sha256::digest(canonical.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    Ok(hex[..SIGNATURE_LEN].to_string())
}
