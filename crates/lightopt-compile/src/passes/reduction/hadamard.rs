//! Hadamard gate reduction.

use lightopt_ir::{CircuitDag, StandardGate};
use tracing::debug;

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;
use crate::reduction::{Reduction, ReductionReport};
use crate::scanner::{Transition, scan_windows};

use super::{is_h, record};

/// Hadamard reduction pass.
///
/// Runs four rewrites, each over the graph left by the previous one:
///
/// 1. `H · H = I` on adjacent nodes of a wire
/// 2. `H · P · H = P† · H · P†` for a phase gate `P`
/// 3. `(H ⊗ H) · CX · (H ⊗ H) = CX` with control and target swapped
/// 4. `H · P · CX · P† · H = P† · CX · P` on the CX target wire
///
/// A phase gate is S, S† or Rz(±π/2). Only exact sequences match: any other
/// gate in between on the wire breaks the pattern.
pub struct HadamardReduction;

impl HadamardReduction {
    /// Name reported by this pass.
    pub const NAME: &'static str = "hadamard_reduction";

    /// Reduce the Hadamard count of `dag` in place.
    pub fn apply(&self, dag: &mut CircuitDag) -> CompileResult<ReductionReport> {
        let mut reduction = Reduction::new(Self::NAME, dag);

        cancel_adjacent(&mut reduction)?;
        reduction.commit()?;
        conjugate_phase(&mut reduction)?;
        reduction.commit()?;
        flip_cx(&mut reduction)?;
        reduction.commit()?;
        conjugate_controlled_phase(&mut reduction)?;

        reduction.finish()
    }
}

/// Delete both ends of every wire edge joining two Hadamards.
fn cancel_adjacent(reduction: &mut Reduction<'_>) -> CompileResult<()> {
    let (dag, batch) = reduction.parts();
    let mut pairs = 0usize;

    for (source, dest, _) in dag.edges()? {
        if batch.is_deleted(source) || batch.is_deleted(dest) {
            continue;
        }
        if is_h(dag, source) && is_h(dag, dest) {
            batch.delete(source);
            batch.delete(dest);
            pairs += 1;
        }
    }

    debug!("Cancelled {} adjacent H pairs", pairs);
    Ok(())
}

/// `H P H` → `P† H P†`.
fn conjugate_phase(reduction: &mut Reduction<'_>) -> CompileResult<()> {
    let (dag, batch) = reduction.parts();
    let mut rewritten = 0usize;

    for qubit in dag.qubits() {
        let nodes = dag.nodes_on_wire(qubit, true)?;
        let matches = scan_windows(&nodes, |window, node| {
            let Some(inst) = dag.get_instruction(node) else {
                return Transition::Reject;
            };
            match window.len() {
                0 if inst.gate.is_h() => Transition::Start,
                1 if inst.gate.is_phase_gate() => Transition::Extend,
                2 if inst.gate.is_h() => Transition::Complete,
                _ => Transition::Reject,
            }
        });

        for found in matches {
            let &[first, phase, last] = found.as_slice() else {
                continue;
            };
            let Some(inverse) = dag.instruction(phase)?.gate.inverse() else {
                continue;
            };
            batch.substitute(first, inverse.clone());
            batch.substitute(phase, StandardGate::H);
            batch.substitute(last, inverse);
            rewritten += 1;
        }
    }

    debug!("Rewrote {} H-P-H sequences", rewritten);
    Ok(())
}

/// Remove the four Hadamards around a CX and reverse it.
fn flip_cx(reduction: &mut Reduction<'_>) -> CompileResult<()> {
    let (dag, batch) = reduction.parts();
    let mut flipped = 0usize;

    for (node, inst) in dag.topological_ops() {
        if !inst.gate.is_cx() {
            continue;
        }
        let mut around = dag.predecessors(node)?;
        around.extend(dag.successors(node)?);

        let all_free_h = around
            .iter()
            .all(|&n| is_h(dag, n) && !batch.is_deleted(n));
        if around.len() == 4 && all_free_h {
            for n in around {
                batch.delete(n);
            }
            batch.reverse(node);
            flipped += 1;
        }
    }

    debug!("Reversed {} CX gates enclosed by Hadamards", flipped);
    Ok(())
}

/// `H P CX P† H` → `P† CX P` when the scanned wire is the CX target.
fn conjugate_controlled_phase(reduction: &mut Reduction<'_>) -> CompileResult<()> {
    let (dag, batch) = reduction.parts();
    let mut rewritten = 0usize;

    for qubit in dag.qubits() {
        let nodes = dag.nodes_on_wire(qubit, true)?;
        let matches = scan_windows(&nodes, |window, node| {
            let Some(inst) = dag.get_instruction(node) else {
                return Transition::Reject;
            };
            match window.len() {
                0 if inst.gate.is_h() => Transition::Start,
                1 if inst.gate.is_phase_gate() => Transition::Extend,
                2 if inst.cx_operands().is_some_and(|(_, t)| t == qubit) => Transition::Extend,
                3 if dag
                    .get_instruction(window[1])
                    .and_then(|phase| phase.gate.inverse())
                    .is_some_and(|inverse| inverse == inst.gate) =>
                {
                    Transition::Extend
                }
                4 if inst.gate.is_h() => Transition::Complete,
                _ => Transition::Reject,
            }
        });

        for found in matches {
            let &[first, phase, _, phase_inverse, last] = found.as_slice() else {
                continue;
            };
            let (Some(p), Some(p_inverse)) = (
                dag.instruction(phase)?.gate.inverse(),
                dag.instruction(phase_inverse)?.gate.inverse(),
            ) else {
                continue;
            };
            batch.delete(first);
            batch.delete(last);
            batch.substitute(phase, p);
            batch.substitute(phase_inverse, p_inverse);
            rewritten += 1;
        }
    }

    debug!("Rewrote {} H-P-CX-P'-H sequences", rewritten);
    Ok(())
}

impl Pass for HadamardReduction {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let report = self.apply(dag)?;
        record(properties, report);
        Ok(())
    }
}
