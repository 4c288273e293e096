//! Gate set used by braid circuits.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;

/// Phase angles closer than this to a multiple of 2π are treated as zero.
pub const ANGLE_EPSILON: f64 = 1e-10;

/// Gates the planner and transpiler work with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    /// Hadamard.
    H,
    /// Pauli-X.
    X,
    /// S-dagger (phase -π/2).
    Sdg,
    /// Controlled-X.
    CX,
    /// Controlled-phase with angle in radians.
    CP(f64),
    /// SWAP.
    Swap,
}

impl Gate {
    /// Lowercase gate name as used in operation counts and OpenQASM.
    pub fn name(&self) -> &'static str {
        match self {
            Gate::H => "h",
            Gate::X => "x",
            Gate::Sdg => "sdg",
            Gate::CX => "cx",
            Gate::CP(_) => "cp",
            Gate::Swap => "swap",
        }
    }

    /// Number of qubits the gate acts on.
    pub fn num_qubits(&self) -> u32 {
        match self {
            Gate::H | Gate::X | Gate::Sdg => 1,
            Gate::CX | Gate::CP(_) | Gate::Swap => 2,
        }
    }

    /// Whether two consecutive applications on the same operands are the identity.
    pub fn is_self_inverse(&self) -> bool {
        matches!(self, Gate::H | Gate::X | Gate::CX | Gate::Swap)
    }

    /// Angle parameter, if the gate has one.
    pub fn angle(&self) -> Option<f64> {
        match self {
            Gate::CP(theta) => Some(*theta),
            _ => None,
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gate::CP(theta) => write!(f, "cp({theta})"),
            other => f.write_str(other.name()),
        }
    }
}

/// Whether an angle is equivalent to zero modulo 2π.
pub fn is_trivial_angle(theta: f64) -> bool {
    let reduced = theta.rem_euclid(TAU);
    reduced < ANGLE_EPSILON || TAU - reduced < ANGLE_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_gate_names_and_arity() {
        assert_eq!(Gate::H.name(), "h");
        assert_eq!(Gate::CP(0.5).name(), "cp");
        assert_eq!(Gate::Sdg.num_qubits(), 1);
        assert_eq!(Gate::Swap.num_qubits(), 2);
    }

    #[test]
    fn test_self_inverse_set() {
        assert!(Gate::CX.is_self_inverse());
        assert!(!Gate::Sdg.is_self_inverse());
        assert!(!Gate::CP(PI).is_self_inverse());
    }

    #[test]
    fn test_trivial_angle() {
        assert!(is_trivial_angle(0.0));
        assert!(is_trivial_angle(2.0 * PI));
        assert!(is_trivial_angle(-4.0 * PI));
        assert!(!is_trivial_angle(PI / 5.0));
    }
}
