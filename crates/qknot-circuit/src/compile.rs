//! Plan, transpile, and summarize in one step.

use qknot_braid::{BraidAnalysis, DEFAULT_ROOT_OF_UNITY};
use tracing::debug;

use crate::circuit::Circuit;
use crate::error::CircuitResult;
use crate::planner::{CircuitPlan, ClosureMethod, plan_circuit};
use crate::summary::CircuitSummary;
use crate::transpile::{OptimizationLevel, Transpiler};

/// A planned braid circuit after transpilation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledCircuit {
    /// Logical plan.
    pub plan: CircuitPlan,
    /// Transpiled circuit that is summarized and dispatched.
    pub transpiled: Circuit,
    /// Metrics and signature of `transpiled`.
    pub summary: CircuitSummary,
}

/// Compile a validated braid analysis with the default root of unity.
pub fn compile_braid_circuit(
    analysis: &BraidAnalysis,
    closure_method: ClosureMethod,
    optimization_level: OptimizationLevel,
    transpiler: &dyn Transpiler,
) -> CircuitResult<CompiledCircuit> {
    let plan = plan_circuit(analysis, closure_method, DEFAULT_ROOT_OF_UNITY)?;
    let transpiled = transpiler.transpile(&plan.circuit, optimization_level)?;
    let summary = CircuitSummary::from_transpiled(
        &transpiled,
        &plan.braid_word,
        closure_method,
        optimization_level,
    )?;

    debug!(
        transpiler = transpiler.name(),
        depth = summary.depth,
        size = summary.size,
        signature = %summary.signature,
        "compiled braid circuit"
    );

    Ok(CompiledCircuit {
        plan,
        transpiled,
        summary,
    })
}
