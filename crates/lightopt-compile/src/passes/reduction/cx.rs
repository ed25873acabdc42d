//! CX cancellation through commuting gates.

use lightopt_ir::{CircuitDag, Instruction, NodeIndex, QubitId};
use tracing::debug;

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;
use crate::reduction::{Reduction, ReductionReport};

use super::{is_h, record};

/// CX reduction pass.
///
/// Cancels a CX against a later identical CX when it commutes with every
/// gate in between on both of its wires. Commutation rules:
///
/// - CX gates sharing a control commute
/// - CX gates sharing a target commute
/// - on the target wire of a nearest-neighbour CX(c, t), the block
///   `H · CX(t, x) · H` with `x > t` and `x ≠ c` commutes
///
/// Only CX gates whose wires are at most two apart are considered. Pairs
/// found while scanning a wire are removed before the next wire is scanned.
pub struct CxReduction;

impl CxReduction {
    /// Name reported by this pass.
    pub const NAME: &'static str = "cx_reduction";

    /// Cancel commuting CX pairs in `dag` in place.
    pub fn apply(&self, dag: &mut CircuitDag) -> CompileResult<ReductionReport> {
        let mut reduction = Reduction::new(Self::NAME, dag);
        let wires: Vec<QubitId> = reduction.dag().qubits().collect();
        let mut cancelled = 0usize;

        for wire in wires {
            let (dag, batch) = reduction.parts();
            let nodes = dag.nodes_on_wire(wire, true)?;

            for (pos, &node) in nodes.iter().enumerate() {
                if batch.is_deleted(node) {
                    continue;
                }
                let Some((control, target)) =
                    dag.get_instruction(node).and_then(Instruction::cx_operands)
                else {
                    continue;
                };
                if !(1..=2).contains(&control.distance(target)) {
                    continue;
                }

                let other = if wire == control { target } else { control };
                let other_nodes = dag.nodes_on_wire(other, true)?;
                let Some(other_pos) = other_nodes.iter().position(|&n| n == node) else {
                    continue;
                };

                let origin = (control, target);
                let along_wire = find_partner(dag, &nodes[pos + 1..], wire, origin);
                let along_other = find_partner(dag, &other_nodes[other_pos + 1..], other, origin);
                match (along_wire, along_other) {
                    (Some(a), Some(b)) if a == b && !batch.is_deleted(a) => {
                        batch.delete(node);
                        batch.delete(a);
                        cancelled += 1;
                    }
                    _ => {}
                }
            }

            reduction.commit()?;
        }

        debug!("Cancelled {} CX pairs", cancelled);
        reduction.finish()
    }
}

/// Walk `rest` on `wire` and return the first CX identical to `origin` that
/// the origin commutes up to, or `None` when a gate blocks it.
fn find_partner(
    dag: &CircuitDag,
    rest: &[NodeIndex],
    wire: QubitId,
    origin: (QubitId, QubitId),
) -> Option<NodeIndex> {
    let (control, target) = origin;
    let on_control = wire == control;

    let mut k = 0;
    while k < rest.len() {
        let inst = dag.get_instruction(rest[k])?;
        if let Some((c, t)) = inst.cx_operands() {
            if (c, t) == origin {
                return Some(rest[k]);
            }
            let shares_role = if on_control { c == control } else { t == target };
            if !shares_role {
                return None;
            }
            k += 1;
            continue;
        }
        if !on_control && control.distance(target) == 1 && hadamard_block(dag, &rest[k..], origin) {
            k += 3;
            continue;
        }
        return None;
    }
    None
}

/// `H · CX(t, x) · H` on the origin's target wire `t`, with `x > t` and `x`
/// distinct from the origin's control.
fn hadamard_block(dag: &CircuitDag, rest: &[NodeIndex], origin: (QubitId, QubitId)) -> bool {
    let (control, target) = origin;
    let &[first, middle, last, ..] = rest else {
        return false;
    };
    is_h(dag, first)
        && is_h(dag, last)
        && dag
            .get_instruction(middle)
            .and_then(Instruction::cx_operands)
            .is_some_and(|(c, t)| c == target && t > c && t != control)
}

impl Pass for CxReduction {
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
