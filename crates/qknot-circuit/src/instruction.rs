//! Circuit instructions.

use serde::{Deserialize, Serialize};

use crate::gate::Gate;
use crate::qubit::{ClbitId, QubitId};

/// What an instruction does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// A unitary gate.
    Gate(Gate),
    /// Measure qubits into classical bits.
    Measure,
}

/// A gate or measurement with its operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The operation.
    pub kind: InstructionKind,
    /// Qubit operands, in gate order (control first).
    pub qubits: Vec<QubitId>,
    /// Classical bit operands (measurements only).
    pub clbits: Vec<ClbitId>,
}

impl Instruction {
    /// A one-qubit gate.
    pub fn single_qubit_gate(gate: Gate, qubit: QubitId) -> Self {
        Self {
            kind: InstructionKind::Gate(gate),
            qubits: vec![qubit],
            clbits: vec![],
        }
    }

    /// A two-qubit gate.
    pub fn two_qubit_gate(gate: Gate, q1: QubitId, q2: QubitId) -> Self {
        Self {
            kind: InstructionKind::Gate(gate),
            qubits: vec![q1, q2],
            clbits: vec![],
        }
    }

    /// Measure one qubit into one classical bit.
    pub fn measure(qubit: QubitId, clbit: ClbitId) -> Self {
        Self {
            kind: InstructionKind::Measure,
            qubits: vec![qubit],
            clbits: vec![clbit],
        }
    }

    /// Operation name (`measure` for measurements).
    pub fn name(&self) -> &'static str {
        match &self.kind {
            InstructionKind::Gate(gate) => gate.name(),
            InstructionKind::Measure => "measure",
        }
    }

    /// The gate, if this is a gate instruction.
    pub fn as_gate(&self) -> Option<&Gate> {
        match &self.kind {
            InstructionKind::Gate(gate) => Some(gate),
            InstructionKind::Measure => None,
        }
    }

    /// Whether this instruction and `other` share a qubit or classical bit.
    pub fn overlaps(&self, other: &Instruction) -> bool {
        self.qubits.iter().any(|q| other.qubits.contains(q))
            || self.clbits.iter().any(|c| other.clbits.contains(c))
    }
}
