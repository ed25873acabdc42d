//! Wire-local pattern scanning and batched graph rewrites.
//!
//! The reduction passes never mutate the graph while they walk it. A scan
//! collects matches over a snapshot of one wire's gate sequence, the pass
//! records the resulting edits in a [`RewriteBatch`], and the batch is
//! applied once the scan is over. Node indices are stable, so every index
//! recorded during the scan is still valid when the batch runs.

use lightopt_ir::{CircuitDag, Gate, NodeIndex};
use rustc_hash::FxHashSet;

use crate::error::CompileResult;

/// Decision of a windowed scan at one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Drop the current window and open a new one with this node.
    Start,
    /// Append this node to the window.
    Extend,
    /// Append this node and record the window as a match.
    Complete,
    /// Drop the window. The node is offered again against an empty window.
    Reject,
}

/// Scan `nodes` left to right with a growing candidate window.
///
/// `step` sees the current window and the next node and decides how the
/// window evolves. A completed window is returned as a match and the scan
/// continues with an empty window, so matches never overlap. After a
/// `Reject` of a non-empty window the same node is re-evaluated once as a
/// potential start. An `Extend` on an empty window behaves like `Start`.
pub fn scan_windows<F>(nodes: &[NodeIndex], mut step: F) -> Vec<Vec<NodeIndex>>
where
    F: FnMut(&[NodeIndex], NodeIndex) -> Transition,
{
    let mut matches = Vec::new();
    let mut window: Vec<NodeIndex> = Vec::new();

    for &node in nodes {
        loop {
            match step(&window, node) {
                Transition::Start => {
                    window.clear();
                    window.push(node);
                }
                Transition::Extend => window.push(node),
                Transition::Complete => {
                    window.push(node);
                    matches.push(std::mem::take(&mut window));
                }
                Transition::Reject => {
                    if !window.is_empty() {
                        window.clear();
                        continue;
                    }
                }
            }
            break;
        }
    }

    matches
}

/// Scan positions `0..len` with a per-anchor forward search.
///
/// `search(i)` returns the position of the last node it consumed when it
/// found a match; scanning resumes right after it. `None` advances by one.
/// Positions inside a consumed span are never offered as anchors.
pub fn scan_anchored<F>(len: usize, mut search: F)
where
    F: FnMut(usize) -> Option<usize>,
{
    let mut i = 0;
    while i < len {
        i = match search(i) {
            Some(last) => last.max(i) + 1,
            None => i + 1,
        };
    }
}

/// Pending graph edits collected during a scan.
///
/// Applied in a fixed order: deletions, then substitutions, then qarg
/// reversals, each in recording order.
#[derive(Debug, Default)]
pub struct RewriteBatch {
    deleted: FxHashSet<NodeIndex>,
    deletions: Vec<NodeIndex>,
    substitutions: Vec<(NodeIndex, Gate)>,
    reversals: Vec<NodeIndex>,
}

impl RewriteBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a node for removal. Scheduling the same node twice is a no-op.
    pub fn delete(&mut self, node: NodeIndex) {
        if self.deleted.insert(node) {
            self.deletions.push(node);
        }
    }

    /// Schedule a gate replacement for a node.
    pub fn substitute(&mut self, node: NodeIndex, gate: impl Into<Gate>) {
        self.substitutions.push((node, gate.into()));
    }

    /// Schedule a control/target swap for a two-qubit node.
    pub fn reverse(&mut self, node: NodeIndex) {
        self.reversals.push(node);
    }

    /// Check whether a node is already scheduled for removal.
    #[inline]
    pub fn is_deleted(&self, node: NodeIndex) -> bool {
        self.deleted.contains(&node)
    }

    /// Number of scheduled deletions.
    pub fn num_deletions(&self) -> usize {
        self.deletions.len()
    }

    /// Number of scheduled substitutions.
    pub fn num_substitutions(&self) -> usize {
        self.substitutions.len()
    }

    /// Check whether nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty() && self.substitutions.is_empty() && self.reversals.is_empty()
    }

    /// Apply every scheduled edit to `dag` and leave the batch empty.
    ///
    /// Stops at the first structural error; edits applied before it stay.
    pub fn apply(&mut self, dag: &mut CircuitDag) -> CompileResult<()> {
        for node in self.deletions.drain(..) {
            dag.remove_op(node)?;
        }
        self.deleted.clear();
        for (node, gate) in self.substitutions.drain(..) {
            dag.substitute_node(node, gate)?;
        }
        for node in self.reversals.drain(..) {
            dag.reverse_qargs(node)?;
        }
        Ok(())
    }
}
