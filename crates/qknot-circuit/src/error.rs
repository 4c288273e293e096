//! Error types for the circuit crate.

use qknot_braid::BraidError;
use thiserror::Error;

use crate::qubit::{ClbitId, QubitId};

/// Errors raised while planning, transpiling, or summarizing circuits.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum CircuitError {
    /// The closure method is neither `trace` nor `plat`.
    #[error("Closure method must be either 'trace' or 'plat'.")]
    InvalidClosureMethod(String),

    /// The optimization level is outside `0..=3`.
    #[error("Optimization level must be between 0 and 3.")]
    InvalidOptimizationLevel(i64),

    /// The root of unity is zero, which leaves the phase angle undefined.
    #[error("Root of unity must be a positive integer.")]
    InvalidRootOfUnity,

    /// The braid word failed parsing or validation.
    #[error(transparent)]
    Braid(#[from] BraidError),

    /// A gate addressed a qubit outside the circuit.
    #[error("Qubit {qubit} is out of range for a {num_qubits}-qubit circuit")]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// Circuit width in qubits.
        num_qubits: u32,
    },

    /// A measurement addressed a classical bit outside the circuit.
    #[error("Classical bit {clbit} is out of range for a circuit with {num_clbits} classical bits")]
    ClbitOutOfRange {
        /// The offending classical bit.
        clbit: ClbitId,
        /// Circuit width in classical bits.
        num_clbits: u32,
    },

    /// A multi-qubit gate was given the same qubit twice.
    #[error("Duplicate qubit {qubit} in '{gate_name}'")]
    DuplicateQubit {
        /// The repeated qubit.
        qubit: QubitId,
        /// Name of the gate.
        gate_name: String,
    },

    /// The signature payload could not be serialized.
    #[error("Failed to serialize circuit summary: {0}")]
    Serialization(String),
}

impl CircuitError {
    /// Whether the caller supplied the bad value (as opposed to an internal fault).
    pub fn is_input_error(&self) -> bool {
        match self {
            CircuitError::InvalidClosureMethod(_)
            | CircuitError::InvalidOptimizationLevel(_)
            | CircuitError::InvalidRootOfUnity => true,
            CircuitError::Braid(e) => e.is_input_error(),
            CircuitError::QubitOutOfRange { .. }
            | CircuitError::ClbitOutOfRange { .. }
            | CircuitError::DuplicateQubit { .. }
            | CircuitError::Serialization(_) => false,
        }
    }
}

/// Result type for circuit operations.
pub type CircuitResult<T> = Result<T, CircuitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_classification() {
        assert!(CircuitError::InvalidClosureMethod("loop".into()).is_input_error());
        assert!(CircuitError::InvalidOptimizationLevel(9).is_input_error());
        assert!(CircuitError::Braid(BraidError::EmptyInput).is_input_error());
        assert!(
            !CircuitError::QubitOutOfRange {
                qubit: QubitId(7),
                num_qubits: 3
            }
            .is_input_error()
        );
    }

    #[test]
    fn test_braid_error_is_transparent() {
        let err = CircuitError::from(BraidError::TooFewDistinctGenerators);
        assert_eq!(
            err.to_string(),
            "Braid word must include at least two distinct generators before execution."
        );
    }

    #[test]
    fn test_range_error_display() {
        let err = CircuitError::QubitOutOfRange {
            qubit: QubitId(4),
            num_qubits: 3,
        };
        assert_eq!(err.to_string(), "Qubit q4 is out of range for a 3-qubit circuit");
    }
}
