//! Braid-to-circuit planning.
//!
//! Qubit 0 is the ancilla and qubits `1..=strand_count` carry the strands.
//! Each braid token becomes a controlled-phase gadget between the ancilla and
//! the two strands the generator crosses; the closure method frames the
//! ancilla with opening and closing gates before the single measurement.

use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;

use qknot_braid::{BraidAnalysis, BraidToken, DEFAULT_ROOT_OF_UNITY, validate_braid};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::circuit::Circuit;
use crate::error::{CircuitError, CircuitResult};
use crate::qubit::{ClbitId, QubitId};

const ANCILLA: QubitId = QubitId(0);

/// How the ancilla measurement is framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClosureMethod {
    /// Hadamard before and after the braid.
    #[default]
    Trace,
    /// Bit flip and Hadamard before; inverse phase and Hadamard after.
    Plat,
}

impl ClosureMethod {
    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClosureMethod::Trace => "trace",
            ClosureMethod::Plat => "plat",
        }
    }
}

impl fmt::Display for ClosureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClosureMethod {
    type Err = CircuitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trace" => Ok(ClosureMethod::Trace),
            "plat" => Ok(ClosureMethod::Plat),
            other => Err(CircuitError::InvalidClosureMethod(other.to_string())),
        }
    }
}

/// Structural circuit intent for one braid word.
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitPlan {
    /// Space-normalized braid word the plan was built from.
    pub braid_word: String,
    /// Closure framing.
    pub closure_method: ClosureMethod,
    /// Root of unity `r`; the gadget angle is `2π / r`.
    pub root_of_unity: u32,
    /// Gadget angle in radians.
    pub theta: f64,
    /// The logical (untranspiled) circuit.
    pub circuit: Circuit,
}

impl CircuitPlan {
    /// Total qubits (ancilla plus strands).
    pub fn num_qubits(&self) -> u32 {
        self.circuit.num_qubits()
    }
}

/// Build a plan from an already-validated analysis.
pub fn plan_circuit(
    analysis: &BraidAnalysis,
    closure_method: ClosureMethod,
    root_of_unity: u32,
) -> CircuitResult<CircuitPlan> {
    if root_of_unity == 0 {
        return Err(CircuitError::InvalidRootOfUnity);
    }

    let theta = TAU / f64::from(root_of_unity);
    let mut circuit = Circuit::with_size("knot_braid", analysis.required_qubits, 1);

    match closure_method {
        ClosureMethod::Trace => {
            circuit.h(ANCILLA)?;
        }
        ClosureMethod::Plat => {
            circuit.x(ANCILLA)?.h(ANCILLA)?;
        }
    }

    for token in &analysis.parsed_braid {
        apply_generator(&mut circuit, token, theta)?;
    }

    match closure_method {
        ClosureMethod::Trace => {
            circuit.h(ANCILLA)?;
        }
        ClosureMethod::Plat => {
            circuit.sdg(ANCILLA)?.h(ANCILLA)?;
        }
    }

    circuit.measure(ANCILLA, ClbitId(0))?;

    debug!(
        qubits = circuit.num_qubits(),
        instructions = circuit.size(),
        closure = %closure_method,
        "planned braid circuit"
    );

    Ok(CircuitPlan {
        braid_word: analysis.parsed_braid.to_string(),
        closure_method,
        root_of_unity,
        theta,
        circuit,
    })
}

/// Validate a braid word and plan it with the default root of unity.
pub fn plan_braid_word(braid_word: &str, closure_method: ClosureMethod) -> CircuitResult<CircuitPlan> {
    let analysis = validate_braid(braid_word)?;
    plan_circuit(&analysis, closure_method, DEFAULT_ROOT_OF_UNITY)
}

/// Entangling gadget for one token.
///
/// Odd generators conjugate an ancilla-controlled phase by CX on the strand
/// pair; even generators add a Hadamard frame on the first strand.
fn apply_generator(circuit: &mut Circuit, token: &BraidToken, theta: f64) -> CircuitResult<()> {
    let data_a = QubitId(token.generator);
    let data_b = QubitId(token.generator + 1);
    let phase = if token.inverse { -theta } else { theta };

    if token.generator % 2 == 1 {
        circuit
            .cx(data_a, data_b)?
            .cp(phase, ANCILLA, data_a)?
            .cx(data_a, data_b)?;
    } else {
        circuit
            .h(data_a)?
            .cx(data_b, data_a)?
            .cp(phase, ANCILLA, data_b)?
            .cx(data_b, data_a)?
            .h(data_a)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::Gate;
    use crate::instruction::InstructionKind;
    use std::f64::consts::PI;

    #[test]
    fn test_closure_method_parse() {
        assert_eq!("trace".parse::<ClosureMethod>().unwrap(), ClosureMethod::Trace);
        assert_eq!("plat".parse::<ClosureMethod>().unwrap(), ClosureMethod::Plat);
        let err = "loop".parse::<ClosureMethod>().unwrap_err();
        assert_eq!(err.to_string(), "Closure method must be either 'trace' or 'plat'.");
    }

    #[test]
    fn test_trace_plan_layout() {
        let plan = plan_braid_word("s1 s2 s1", ClosureMethod::Trace).unwrap();
        assert_eq!(plan.num_qubits(), 4);
        assert_eq!(plan.circuit.num_clbits(), 1);
        assert!((plan.theta - 2.0 * PI / 5.0).abs() < 1e-12);

        let insts = plan.circuit.instructions();
        assert_eq!(insts.first().map(|i| i.name()), Some("h"));
        let last = insts.last().unwrap();
        assert_eq!(last.kind, InstructionKind::Measure);
        assert_eq!(last.qubits, vec![QubitId(0)]);

        // 1 open + 3 (s1) + 5 (s2) + 3 (s1) + 1 close + measure
        assert_eq!(plan.circuit.size(), 14);
    }

    #[test]
    fn test_plat_framing() {
        let plan = plan_braid_word("s1 s2 s1", ClosureMethod::Plat).unwrap();
        let names: Vec<_> = plan.circuit.instructions().iter().map(|i| i.name()).collect();
        assert_eq!(&names[..2], &["x", "h"]);
        assert_eq!(&names[names.len() - 3..], &["sdg", "h", "measure"]);
    }

    #[test]
    fn test_inverse_token_negates_phase() {
        let plan = plan_braid_word("s1^-1 s2 s1", ClosureMethod::Trace).unwrap();
        let first_cp = plan
            .circuit
            .instructions()
            .iter()
            .find_map(|i| match i.as_gate() {
                Some(Gate::CP(theta)) => Some(*theta),
                _ => None,
            })
            .unwrap();
        assert!(first_cp < 0.0);
    }

    #[test]
    fn test_even_generator_uses_hadamard_frame() {
        let plan = plan_braid_word("s1 s2 s1", ClosureMethod::Trace).unwrap();
        let s2_gadget = &plan.circuit.instructions()[4..9];
        let names: Vec<_> = s2_gadget.iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["h", "cx", "cp", "cx", "h"]);
        assert_eq!(s2_gadget[0].qubits, vec![QubitId(2)]);
        assert_eq!(s2_gadget[1].qubits, vec![QubitId(3), QubitId(2)]);
        assert_eq!(s2_gadget[2].qubits, vec![QubitId(0), QubitId(3)]);
    }

    #[test]
    fn test_rejects_invalid_braid() {
        assert!(matches!(
            plan_braid_word("s1 s1 s1", ClosureMethod::Trace),
            Err(CircuitError::Braid(_))
        ));
    }
}
