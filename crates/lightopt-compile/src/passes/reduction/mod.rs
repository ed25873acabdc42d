//! Gate-count reduction passes.
//!
//! Each pass recognizes short gate sequences that have a cheaper equivalent
//! and rewrites them in place. Rewrites only delete nodes, substitute gates
//! or swap CX operands; no node or wire is ever added.

mod cx;
mod hadamard;
mod rz;


pub use cx::CxReduction;
pub use hadamard::HadamardReduction;
pub use rz::RzReduction;

use lightopt_ir::{CircuitDag, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::pass::Pass;
use crate::property::PropertySet;
use crate::reduction::{ReductionLog, ReductionReport};

/// Identifies one of the reduction passes in a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReductionKind {
    /// [`HadamardReduction`].
    Hadamard,
    /// [`RzReduction`].
    Rz,
    /// [`CxReduction`].
    Cx,
}

impl ReductionKind {
    /// The light optimization schedule.
    pub const LIGHT_SCHEDULE: [ReductionKind; 8] = [
        ReductionKind::Hadamard,
        ReductionKind::Cx,
        ReductionKind::Rz,
        ReductionKind::Cx,
        ReductionKind::Hadamard,
        ReductionKind::Rz,
        ReductionKind::Cx,
        ReductionKind::Rz,
    ];

    /// Instantiate the pass.
    pub fn pass(self) -> Box<dyn Pass> {
        match self {
            ReductionKind::Hadamard => Box::new(HadamardReduction),
            ReductionKind::Rz => Box::new(RzReduction),
            ReductionKind::Cx => Box::new(CxReduction),
        }
    }

    /// Run the pass directly on a DAG.
    pub fn apply(self, dag: &mut CircuitDag) -> crate::CompileResult<ReductionReport> {
        match self {
            ReductionKind::Hadamard => HadamardReduction.apply(dag),
            ReductionKind::Rz => RzReduction.apply(dag),
            ReductionKind::Cx => CxReduction.apply(dag),
        }
    }
}

/// Append a report to the run's [`ReductionLog`].
fn record(properties: &mut PropertySet, report: ReductionReport) {
    properties.update_or_default(|log: &mut ReductionLog| log.push(report));
}

fn is_h(dag: &CircuitDag, node: NodeIndex) -> bool {
    matches!(dag.get_instruction(node), Some(inst) if inst.gate.is_h())
}
