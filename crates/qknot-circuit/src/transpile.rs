//! Transpilation seam and the built-in peephole transpiler.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::circuit::Circuit;
use crate::error::{CircuitError, CircuitResult};
use crate::gate::{Gate, is_trivial_angle};
use crate::instruction::{Instruction, InstructionKind};

/// Transpiler optimization level, `0..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct OptimizationLevel(u8);

impl OptimizationLevel {
    /// Highest supported level.
    pub const MAX: u8 = 3;

    /// Validate a raw level.
    pub fn new(level: i64) -> CircuitResult<Self> {
        match u8::try_from(level) {
            Ok(l) if l <= Self::MAX => Ok(Self(l)),
            _ => Err(CircuitError::InvalidOptimizationLevel(level)),
        }
    }

    /// The level as an integer.
    pub fn get(&self) -> u8 {
        self.0
    }
}

impl Default for OptimizationLevel {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

impl TryFrom<i64> for OptimizationLevel {
    type Error = CircuitError;

    fn try_from(level: i64) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<OptimizationLevel> for u8 {
    fn from(level: OptimizationLevel) -> Self {
        level.0
    }
}

impl fmt::Display for OptimizationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Something that lowers a logical circuit into the circuit whose metrics
/// are summarized and dispatched.
pub trait Transpiler: Send + Sync {
    /// Short identifier for logs.
    fn name(&self) -> &str;

    /// Transpile `circuit` at `level`.
    fn transpile(&self, circuit: &Circuit, level: OptimizationLevel) -> CircuitResult<Circuit>;
}

/// Peephole transpiler over the planner's gate set.
///
/// Level 0 returns the circuit unchanged. Higher levels repeatedly cancel
/// adjacent self-inverse pairs and merge adjacent controlled-phase gates on
/// identical operands until nothing changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTranspiler;

impl LocalTranspiler {
    /// Create the transpiler.
    pub fn new() -> Self {
        Self
    }

    /// One rewrite round. Returns the rewritten list and whether anything changed.
    fn rewrite_once(instructions: &[Instruction]) -> (Vec<Instruction>, bool) {
        let mut slots: Vec<Option<Instruction>> = instructions.iter().cloned().map(Some).collect();
        let mut changed = false;

        for i in 0..slots.len() {
            let Some(first) = slots[i].clone() else {
                continue;
            };
            let InstructionKind::Gate(first_gate) = first.kind else {
                continue;
            };

            // The next live instruction touching any operand of `first`.
            let Some(j) = (i + 1..slots.len())
                .find(|&j| slots[j].as_ref().is_some_and(|next| next.overlaps(&first)))
            else {
                continue;
            };
            let Some(second) = slots[j].as_ref() else {
                continue;
            };
            if second.qubits != first.qubits {
                continue;
            }
            let InstructionKind::Gate(second_gate) = second.kind else {
                continue;
            };

            match (first_gate, second_gate) {
                (a, b) if a.is_self_inverse() && a == b => {
                    slots[i] = None;
                    slots[j] = None;
                    changed = true;
                }
                (Gate::CP(a), Gate::CP(b)) => {
                    let merged = a + b;
                    slots[i] = None;
                    slots[j] = if is_trivial_angle(merged) {
                        None
                    } else {
                        Some(Instruction::two_qubit_gate(
                            Gate::CP(merged),
                            first.qubits[0],
                            first.qubits[1],
                        ))
                    };
                    changed = true;
                }
                _ => {}
            }
        }

        (slots.into_iter().flatten().collect(), changed)
    }
}

impl Transpiler for LocalTranspiler {
    fn name(&self) -> &str {
        "local"
    }

    fn transpile(&self, circuit: &Circuit, level: OptimizationLevel) -> CircuitResult<Circuit> {
        if level.get() == 0 {
            return Ok(circuit.clone());
        }

        // Every change removes at least one instruction, so this terminates.
        let mut instructions = circuit.instructions().to_vec();
        let mut rounds = 0usize;
        loop {
            rounds += 1;
            let (next, changed) = Self::rewrite_once(&instructions);
            instructions = next;
            if !changed {
                break;
            }
        }
        debug!(rounds, level = %level, "local transpile converged");

        Ok(circuit.with_instructions(instructions))
    }
}
