//! Rz rotation merging.

use lightopt_ir::{CircuitDag, NodeIndex, QubitId, StandardGate};
use tracing::debug;

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;
use crate::reduction::{Reduction, ReductionReport};
use crate::scanner::scan_anchored;

use super::record;

/// Rz reduction pass.
///
/// Moves each Rz forward along its wire through gates it commutes with and
/// merges it into the next Rz it meets: `Rz(a) … Rz(b)` becomes
/// `… Rz(a + b)`. An Rz on wire `w` commutes with:
///
/// - `H · CX · H` where the CX target is `w` (a CZ in disguise)
/// - `CX · Rz · CX` where both CX target `w` and are adjacent on their
///   shared control wire
/// - a CX whose control is `w`
///
/// Merged angles are summed without reduction modulo 2π.
pub struct RzReduction;

impl RzReduction {
    /// Name reported by this pass.
    pub const NAME: &'static str = "rz_reduction";

    /// Merge commuting Rz rotations in `dag` in place.
    pub fn apply(&self, dag: &mut CircuitDag) -> CompileResult<ReductionReport> {
        let mut reduction = Reduction::new(Self::NAME, dag);
        let (dag, batch) = reduction.parts();
        let mut merged = 0usize;

        for qubit in dag.qubits() {
            let nodes = dag.nodes_on_wire(qubit, true)?;
            scan_anchored(nodes.len(), |anchor| {
                let angle = rz_angle(dag, nodes[anchor])?;
                let partner = find_partner(dag, &nodes, anchor, qubit)?;
                let partner_angle = rz_angle(dag, nodes[partner])?;

                batch.delete(nodes[anchor]);
                batch.substitute(nodes[partner], StandardGate::Rz(partner_angle + angle));
                merged += 1;
                Some(partner)
            });
        }

        debug!("Merged {} Rz pairs", merged);
        reduction.finish()
    }
}

fn rz_angle(dag: &CircuitDag, node: NodeIndex) -> Option<f64> {
    dag.get_instruction(node)?.gate.as_standard()?.rz_angle()
}

/// Position of the Rz the anchor can be moved onto, if any.
fn find_partner(
    dag: &CircuitDag,
    nodes: &[NodeIndex],
    anchor: usize,
    wire: QubitId,
) -> Option<usize> {
    let mut k = anchor + 1;
    while k < nodes.len() {
        if commuting_block(dag, &nodes[k..], wire) {
            k += 3;
            continue;
        }
        let inst = dag.get_instruction(nodes[k])?;
        if inst.cx_operands().is_some_and(|(c, _)| c == wire) {
            k += 1;
            continue;
        }
        return inst.gate.is_rz().then_some(k);
    }
    None
}

/// Whether the next three nodes form a block an Rz on `wire` commutes with.
fn commuting_block(dag: &CircuitDag, rest: &[NodeIndex], wire: QubitId) -> bool {
    let &[first, middle, last, ..] = rest else {
        return false;
    };
    let (Some(a), Some(b), Some(c)) = (
        dag.get_instruction(first),
        dag.get_instruction(middle),
        dag.get_instruction(last),
    ) else {
        return false;
    };

    if a.gate.is_h() && c.gate.is_h() {
        return b.cx_operands().is_some_and(|(_, target)| target == wire);
    }
    match (a.cx_operands(), b.gate.is_rz(), c.cx_operands()) {
        // Nothing may sit between the two CX on the control wire either.
        (Some((c1, t1)), true, Some((c2, t2))) => {
            t1 == wire
                && t2 == wire
                && c1 == c2
                && dag.predecessor_on_wire(last, c2) == Some(first)
        }
        _ => false,
    }
}

impl Pass for RzReduction {
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
