//! qknot Circuit Planning
//!
//! Turns validated braid words into quantum circuits and summarizes the
//! transpiled result.
//!
//! # Overview
//!
//! [`plan_circuit`] lays out one ancilla plus one qubit per strand and applies
//! a controlled-phase gadget per braid token, framed by the chosen
//! [`ClosureMethod`]. A [`Transpiler`] lowers the plan (the built-in
//! [`LocalTranspiler`] does peephole cancellation), and [`CircuitSummary`]
//! records depth, size, gate counts, and a 16-hex-character signature.
//! [`emit_qasm3`] serializes circuits for remote execution.
//!
//! # Example
//!
//! ```rust
//! use qknot_braid::validate_braid;
//! use qknot_circuit::{ClosureMethod, LocalTranspiler, OptimizationLevel, compile_braid_circuit};
//!
//! let analysis = validate_braid("s1 s2^-1 s1").unwrap();
//! let compiled = compile_braid_circuit(
//!     &analysis,
//!     ClosureMethod::Trace,
//!     OptimizationLevel::default(),
//!     &LocalTranspiler::new(),
//! )
//! .unwrap();
//!
//! assert_eq!(compiled.summary.num_qubits, 4);
//! assert_eq!(compiled.summary.measurement_count, 1);
//! ```

pub mod circuit;
pub mod compile;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod planner;
pub mod qasm;
pub mod qubit;
pub mod summary;
pub mod transpile;

pub use circuit::Circuit;
pub use compile::{CompiledCircuit, compile_braid_circuit};
pub use error::{CircuitError, CircuitResult};
pub use gate::Gate;
pub use instruction::{Instruction, InstructionKind};
pub use planner::{CircuitPlan, ClosureMethod, plan_braid_word, plan_circuit};
pub use qasm::emit_qasm3;
pub use qubit::{ClbitId, QubitId};
pub use summary::{CircuitSummary, TWO_QUBIT_GATE_NAMES};
pub use transpile::{LocalTranspiler, OptimizationLevel, Transpiler};
