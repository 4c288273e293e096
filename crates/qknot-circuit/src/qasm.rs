//! OpenQASM 3 emitter.

use std::fmt::Write;

use crate::circuit::Circuit;
use crate::gate::Gate;
use crate::instruction::{Instruction, InstructionKind};

/// Emit a circuit as OpenQASM 3 source.
pub fn emit_qasm3(circuit: &Circuit) -> String {
    let mut out = String::new();
    out.push_str("OPENQASM 3.0;\n");
    out.push_str("include \"stdgates.inc\";\n\n");

    if circuit.num_qubits() > 0 {
        let _ = writeln!(out, "qubit[{}] q;", circuit.num_qubits());
    }
    if circuit.num_clbits() > 0 {
        let _ = writeln!(out, "bit[{}] c;", circuit.num_clbits());
    }
    if circuit.num_qubits() > 0 || circuit.num_clbits() > 0 {
        out.push('\n');
    }

    for instruction in circuit.instructions() {
        emit_instruction(&mut out, instruction);
    }
    out
}

fn emit_instruction(out: &mut String, instruction: &Instruction) {
    let qubits = instruction
        .qubits
        .iter()
        .map(|q| format!("q[{}]", q.0))
        .collect::<Vec<_>>()
        .join(", ");

    match &instruction.kind {
        InstructionKind::Gate(Gate::CP(theta)) => {
            let _ = writeln!(out, "cp({}) {qubits};", format_angle(*theta));
        }
        InstructionKind::Gate(gate) => {
            let _ = writeln!(out, "{} {qubits};", gate.name());
        }
        InstructionKind::Measure => {
            for (q, c) in instruction.qubits.iter().zip(&instruction.clbits) {
                let _ = writeln!(out, "c[{}] = measure q[{}];", c.0, q.0);
            }
        }
    }
}

/// Full-precision angle with a decimal point so it parses as a float literal.
fn format_angle(theta: f64) -> String {
    let s = format!("{theta:?}");
    if s.contains('.') || s.contains('e') { s } else { format!("{s}.0") }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{ClosureMethod, plan_braid_word};

    #[test]
    fn test_emit_header_and_registers() {
        let plan = plan_braid_word("s1 s2 s1", ClosureMethod::Trace).unwrap();
        let qasm = emit_qasm3(&plan.circuit);
        assert!(qasm.starts_with("OPENQASM 3.0;\ninclude \"stdgates.inc\";\n"));
        assert!(qasm.contains("qubit[4] q;"));
        assert!(qasm.contains("bit[1] c;"));
        assert!(qasm.contains("cx q[1], q[2];"));
        assert!(qasm.contains("cp(1.2566370614359172) q[0], q[1];"));
        assert!(qasm.trim_end().ends_with("c[0] = measure q[0];"));
    }

    #[test]
    fn test_emit_negative_angle() {
        let plan = plan_braid_word("s1^-1 s2 s1", ClosureMethod::Plat).unwrap();
        let qasm = emit_qasm3(&plan.circuit);
        assert!(qasm.contains("cp(-1.2566370614359172) q[0], q[1];"));
        assert!(qasm.contains("sdg q[0];"));
    }
}
