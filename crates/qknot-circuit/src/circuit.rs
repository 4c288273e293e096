//! High-level circuit builder.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CircuitError, CircuitResult};
use crate::gate::Gate;
use crate::instruction::Instruction;
use crate::qubit::{ClbitId, QubitId};

/// A flat, ordered list of instructions over fixed-size registers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    name: String,
    num_qubits: u32,
    num_clbits: u32,
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create an empty circuit with the given register sizes.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            num_clbits,
            instructions: Vec::new(),
        }
    }

    /// Circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Number of classical bits.
    pub fn num_clbits(&self) -> u32 {
        self.num_clbits
    }

    /// Instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Replace the instruction list, keeping registers.
    pub(crate) fn with_instructions(&self, instructions: Vec<Instruction>) -> Self {
        Self {
            name: self.name.clone(),
            num_qubits: self.num_qubits,
            num_clbits: self.num_clbits,
            instructions,
        }
    }

    /// Append an instruction after checking its operands.
    pub fn apply(&mut self, instruction: Instruction) -> CircuitResult<&mut Self> {
        for (i, qubit) in instruction.qubits.iter().enumerate() {
            if qubit.0 >= self.num_qubits {
                return Err(CircuitError::QubitOutOfRange {
                    qubit: *qubit,
                    num_qubits: self.num_qubits,
                });
            }
            if instruction.qubits[..i].contains(qubit) {
                return Err(CircuitError::DuplicateQubit {
                    qubit: *qubit,
                    gate_name: instruction.name().to_string(),
                });
            }
        }
        for clbit in &instruction.clbits {
            if clbit.0 >= self.num_clbits {
                return Err(CircuitError::ClbitOutOfRange {
                    clbit: *clbit,
                    num_clbits: self.num_clbits,
                });
            }
        }
        self.instructions.push(instruction);
        Ok(self)
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> CircuitResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(Gate::H, qubit))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> CircuitResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(Gate::X, qubit))
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> CircuitResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(Gate::Sdg, qubit))
    }

    /// Apply CNOT gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> CircuitResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(Gate::CX, control, target))
    }

    /// Apply controlled-phase gate.
    pub fn cp(&mut self, theta: f64, control: QubitId, target: QubitId) -> CircuitResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(Gate::CP(theta), control, target))
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> CircuitResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(Gate::Swap, q1, q2))
    }

    /// Measure a qubit into a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> CircuitResult<&mut Self> {
        self.apply(Instruction::measure(qubit, clbit))
    }

    /// Number of instructions.
    pub fn size(&self) -> usize {
        self.instructions.len()
    }

    /// Total register width (qubits + classical bits).
    pub fn width(&self) -> u32 {
        self.num_qubits + self.num_clbits
    }

    /// Length of the longest path through the circuit, counting every
    /// instruction as one layer on each wire it touches.
    pub fn depth(&self) -> usize {
        let mut qubit_layers = vec![0usize; self.num_qubits as usize];
        let mut clbit_layers = vec![0usize; self.num_clbits as usize];

        for inst in &self.instructions {
            let start = inst
                .qubits
                .iter()
                .map(|q| qubit_layers[q.0 as usize])
                .chain(inst.clbits.iter().map(|c| clbit_layers[c.0 as usize]))
                .max()
                .unwrap_or(0);
            let layer = start + 1;
            for q in &inst.qubits {
                qubit_layers[q.0 as usize] = layer;
            }
            for c in &inst.clbits {
                clbit_layers[c.0 as usize] = layer;
            }
        }

        qubit_layers
            .into_iter()
            .chain(clbit_layers)
            .max()
            .unwrap_or(0)
    }

    /// Operation counts keyed by name, sorted by name.
    pub fn count_ops(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for inst in &self.instructions {
            *counts.entry(inst.name().to_string()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chains() {
        let mut circuit = Circuit::with_size("bell", 2, 1);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .measure(QubitId(1), ClbitId(0))
            .unwrap();
        assert_eq!(circuit.size(), 3);
        assert_eq!(circuit.width(), 3);
        assert_eq!(circuit.depth(), 3);
    }

    #[test]
    fn test_depth_counts_parallel_gates_once() {
        let mut circuit = Circuit::with_size("layers", 3, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.h(QubitId(1)).unwrap();
        circuit.h(QubitId(2)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        assert_eq!(circuit.depth(), 2);
    }

    #[test]
    fn test_rejects_out_of_range_and_duplicates() {
        let mut circuit = Circuit::with_size("bad", 2, 1);
        assert!(matches!(
            circuit.h(QubitId(2)),
            Err(CircuitError::QubitOutOfRange { .. })
        ));
        assert!(matches!(
            circuit.cx(QubitId(1), QubitId(1)),
            Err(CircuitError::DuplicateQubit { .. })
        ));
        assert!(matches!(
            circuit.measure(QubitId(0), ClbitId(1)),
            Err(CircuitError::ClbitOutOfRange { .. })
        ));
        assert_eq!(circuit.size(), 0);
    }

    #[test]
    fn test_count_ops_sorted_by_name() {
        let mut circuit = Circuit::with_size("ops", 2, 1);
        circuit.x(QubitId(0)).unwrap();
        circuit.h(QubitId(0)).unwrap();
        circuit.cp(0.3, QubitId(0), QubitId(1)).unwrap();
        circuit.h(QubitId(1)).unwrap();
        circuit.measure(QubitId(0), ClbitId(0)).unwrap();
        let names: Vec<_> = circuit.count_ops().into_iter().collect();
        assert_eq!(
            names,
            vec![
                ("cp".to_string(), 1),
                ("h".to_string(), 2),
                ("measure".to_string(), 1),
                ("x".to_string(), 1),
            ]
        );
    }
}
