//! DAG-based circuit representation.

use std::collections::BTreeMap;

use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex as PetNodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::Gate;
use crate::instruction::Instruction;
use crate::qubit::QubitId;

/// Node index type for the circuit DAG.
///
/// Indices are stable: removing a node never renumbers the others, so an
/// index collected during a scan stays valid until that exact node is removed.
pub type NodeIndex = PetNodeIndex<u32>;

/// A node in the circuit DAG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DagNode {
    /// Input node for a wire.
    In(QubitId),
    /// Output node for a wire.
    Out(QubitId),
    /// Operation node containing an instruction.
    Op(Instruction),
}

impl DagNode {
    /// Check if this is an operation node.
    #[inline]
    pub fn is_op(&self) -> bool {
        matches!(self, DagNode::Op(_))
    }

    /// Get the instruction if this is an operation node.
    #[inline]
    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            DagNode::Op(inst) => Some(inst),
            _ => None,
        }
    }
}

/// An edge in the circuit DAG: one step along a qubit wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DagEdge {
    /// The wire this edge belongs to.
    pub wire: QubitId,
}

/// DAG-based circuit representation.
///
/// The circuit is represented as a directed acyclic graph where:
/// - Nodes are either input nodes, output nodes, or operation nodes
/// - Each wire has exactly one input and one output node
/// - The nodes touching a wire form a single path from its input to its output
/// - An operation on `k` wires has exactly one incoming and one outgoing
///   edge per wire
///
/// The graph is a [`StableDiGraph`]: removed nodes leave a vacant slot
/// instead of moving the last node into their index.
///
/// ## Performance
///
/// The DAG maintains a `wire_front` index that maps each wire to the
/// last node before the output node, so `apply()` appends in O(1) per wire.
#[derive(Debug, Clone)]
pub struct CircuitDag {
    /// The underlying graph.
    graph: StableDiGraph<DagNode, DagEdge, u32>,
    /// Wires in insertion order; all iteration over wires follows this order.
    wires: Vec<QubitId>,
    /// Map from qubit to its input node.
    qubit_inputs: FxHashMap<QubitId, NodeIndex>,
    /// Map from qubit to its output node.
    qubit_outputs: FxHashMap<QubitId, NodeIndex>,
    /// Wire front: maps each wire to the node just before the output node.
    wire_front: FxHashMap<QubitId, NodeIndex>,
}

impl CircuitDag {
    /// Create a new empty circuit DAG.
    pub fn new() -> Self {
        Self {
            graph: StableDiGraph::default(),
            wires: Vec::new(),
            qubit_inputs: FxHashMap::default(),
            qubit_outputs: FxHashMap::default(),
            wire_front: FxHashMap::default(),
        }
    }

    /// Create a DAG with wires `q0..q{n-1}` and no operations.
    pub fn with_qubits(num_qubits: u32) -> Self {
        let mut dag = Self::new();
        for i in 0..num_qubits {
            dag.add_qubit(QubitId(i));
        }
        dag
    }

    /// Add a qubit to the circuit. Adding an existing qubit is a no-op.
    pub fn add_qubit(&mut self, qubit: QubitId) {
        if self.qubit_inputs.contains_key(&qubit) {
            return;
        }
        let in_node = self.graph.add_node(DagNode::In(qubit));
        let out_node = self.graph.add_node(DagNode::Out(qubit));
        self.graph.add_edge(in_node, out_node, DagEdge { wire: qubit });
        self.wires.push(qubit);
        self.qubit_inputs.insert(qubit, in_node);
        self.qubit_outputs.insert(qubit, out_node);
        self.wire_front.insert(qubit, in_node);
    }

    /// Append an instruction at the end of every wire it touches.
    #[allow(clippy::needless_pass_by_value, clippy::cast_possible_truncation)]
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<NodeIndex> {
        let gate_name = instruction.name().to_string();

        // Validate gate arity matches qubit count
        let expected = instruction.gate.num_qubits() as usize;
        let got = instruction.qubits.len();
        if expected != got {
            return Err(IrError::QubitCountMismatch {
                gate_name,
                expected: expected as u32,
                got: got as u32,
            });
        }

        for &qubit in &instruction.qubits {
            if !self.qubit_inputs.contains_key(&qubit) {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: Some(gate_name),
                });
            }
        }

        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: Some(gate_name),
                });
            }
        }

        let qubits = instruction.qubits.clone();
        let op_node = self.graph.add_node(DagNode::Op(instruction));

        for qubit in qubits {
            let out_node = self.qubit_outputs[&qubit];
            let prev_node = self.wire_front[&qubit];

            let eid = self
                .graph
                .edges_directed(prev_node, Direction::Outgoing)
                .find(|e| e.weight().wire == qubit && e.target() == out_node)
                .map(|e| e.id())
                .ok_or_else(|| {
                    IrError::InvalidDag(format!(
                        "Missing edge from predecessor to output for qubit wire {qubit:?}"
                    ))
                })?;
            self.graph.remove_edge(eid);
            self.graph.add_edge(prev_node, op_node, DagEdge { wire: qubit });
            self.graph.add_edge(op_node, out_node, DagEdge { wire: qubit });
            self.wire_front.insert(qubit, op_node);
        }

        Ok(op_node)
    }

    /// Iterate over operations in topological order.
    pub fn topological_ops(&self) -> impl Iterator<Item = (NodeIndex, &Instruction)> {
        petgraph::algo::toposort(&self.graph, None)
            .expect("DAG must be acyclic: cycle detected in circuit graph")
            .into_iter()
            .filter_map(|idx| match &self.graph[idx] {
                DagNode::Op(inst) => Some((idx, inst)),
                _ => None,
            })
    }

    /// All node indices, wire boundaries included, in index order.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Operation node indices in index order.
    pub fn op_nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph
            .node_indices()
            .filter(|&idx| self.graph[idx].is_op())
    }

    /// All wire edges as `(source, dest, wire)`.
    ///
    /// Wires are visited in insertion order and each wire is walked from its
    /// input to its output, so the result is deterministic.
    pub fn edges(&self) -> IrResult<Vec<(NodeIndex, NodeIndex, QubitId)>> {
        let mut edges = Vec::with_capacity(self.graph.edge_count());
        for &qubit in &self.wires {
            let path = self.nodes_on_wire(qubit, false)?;
            edges.extend(path.windows(2).map(|pair| (pair[0], pair[1], qubit)));
        }
        Ok(edges)
    }

    /// The nodes along a wire, in order.
    ///
    /// With `only_ops` the input and output boundary nodes are left out.
    pub fn nodes_on_wire(&self, qubit: QubitId, only_ops: bool) -> IrResult<Vec<NodeIndex>> {
        let mut current = self
            .qubit_inputs
            .get(&qubit)
            .copied()
            .ok_or(IrError::QubitNotFound {
                qubit,
                gate_name: None,
            })?;
        let out_node = self.qubit_outputs[&qubit];

        let mut nodes = Vec::new();
        if !only_ops {
            nodes.push(current);
        }
        let max_steps = self.graph.node_count();
        let mut steps = 0;
        while current != out_node {
            let Some(next) = self.successor_on_wire(current, qubit) else {
                return Err(IrError::InvalidDag(format!(
                    "Wire for qubit {qubit:?} is broken: no outgoing edge from node {current:?}"
                )));
            };
            current = next;
            if current != out_node || !only_ops {
                nodes.push(current);
            }
            steps += 1;
            if steps > max_steps {
                return Err(IrError::InvalidDag(format!(
                    "Wire for qubit {qubit:?} has too many steps (possible infinite loop)"
                )));
            }
        }
        Ok(nodes)
    }

    /// The node feeding `node` on `qubit`'s wire.
    #[inline]
    pub fn predecessor_on_wire(&self, node: NodeIndex, qubit: QubitId) -> Option<NodeIndex> {
        self.graph
            .edges_directed(node, Direction::Incoming)
            .find(|e| e.weight().wire == qubit)
            .map(|e| e.source())
    }

    /// The node fed by `node` on `qubit`'s wire.
    #[inline]
    pub fn successor_on_wire(&self, node: NodeIndex, qubit: QubitId) -> Option<NodeIndex> {
        self.graph
            .edges_directed(node, Direction::Outgoing)
            .find(|e| e.weight().wire == qubit)
            .map(|e| e.target())
    }

    /// Predecessors of a node, one per wire it touches, in qarg order.
    pub fn predecessors(&self, node: NodeIndex) -> IrResult<Vec<NodeIndex>> {
        Ok(self
            .wires_of(node)?
            .into_iter()
            .filter_map(|qubit| self.predecessor_on_wire(node, qubit))
            .collect())
    }

    /// Successors of a node, one per wire it touches, in qarg order.
    pub fn successors(&self, node: NodeIndex) -> IrResult<Vec<NodeIndex>> {
        Ok(self
            .wires_of(node)?
            .into_iter()
            .filter_map(|qubit| self.successor_on_wire(node, qubit))
            .collect())
    }

    fn wires_of(&self, node: NodeIndex) -> IrResult<Vec<QubitId>> {
        match self.graph.node_weight(node) {
            Some(DagNode::Op(inst)) => Ok(inst.qubits.clone()),
            Some(DagNode::In(qubit) | DagNode::Out(qubit)) => Ok(vec![*qubit]),
            None => Err(IrError::NodeNotFound(node)),
        }
    }

    /// Check whether `node` is a live operation node.
    #[inline]
    pub fn contains_op(&self, node: NodeIndex) -> bool {
        self.graph.node_weight(node).is_some_and(DagNode::is_op)
    }

    /// Get an instruction by node index.
    #[inline]
    pub fn get_instruction(&self, node: NodeIndex) -> Option<&Instruction> {
        self.graph.node_weight(node).and_then(|n| n.instruction())
    }

    /// Get an instruction, reporting why it is unavailable.
    pub fn instruction(&self, node: NodeIndex) -> IrResult<&Instruction> {
        match self.graph.node_weight(node) {
            Some(DagNode::Op(inst)) => Ok(inst),
            Some(_) => Err(IrError::NotAnOperation(node)),
            None => Err(IrError::NodeNotFound(node)),
        }
    }

    fn instruction_mut(&mut self, node: NodeIndex) -> IrResult<&mut Instruction> {
        match self.graph.node_weight_mut(node) {
            Some(DagNode::Op(inst)) => Ok(inst),
            Some(_) => Err(IrError::NotAnOperation(node)),
            None => Err(IrError::NodeNotFound(node)),
        }
    }

    /// Remove an operation node, splicing its predecessor and successor
    /// together on every wire it touched.
    pub fn remove_op(&mut self, node: NodeIndex) -> IrResult<Instruction> {
        let qubits = self.instruction(node)?.qubits.clone();

        let mut splices = Vec::with_capacity(qubits.len());
        for qubit in qubits {
            let pred = self.predecessor_on_wire(node, qubit);
            let succ = self.successor_on_wire(node, qubit);
            let (Some(pred), Some(succ)) = (pred, succ) else {
                return Err(IrError::InvalidDag(format!(
                    "Operation {node:?} is not connected on wire {qubit:?}"
                )));
            };
            splices.push((pred, succ, qubit));
        }

        let Some(DagNode::Op(instruction)) = self.graph.remove_node(node) else {
            return Err(IrError::NodeNotFound(node));
        };

        for (pred, succ, qubit) in splices {
            if self.wire_front.get(&qubit) == Some(&node) {
                self.wire_front.insert(qubit, pred);
            }
            self.graph.add_edge(pred, succ, DagEdge { wire: qubit });
        }

        Ok(instruction)
    }

    /// Replace the gate of an operation node in place, keeping its wires.
    ///
    /// Returns the gate that was replaced.
    #[allow(clippy::cast_possible_truncation)]
    pub fn substitute_node(&mut self, node: NodeIndex, gate: impl Into<Gate>) -> IrResult<Gate> {
        let gate = gate.into();
        let inst = self.instruction_mut(node)?;
        if gate.num_qubits() as usize != inst.qubits.len() {
            return Err(IrError::QubitCountMismatch {
                gate_name: gate.name().to_string(),
                expected: gate.num_qubits(),
                got: inst.qubits.len() as u32,
            });
        }
        Ok(std::mem::replace(&mut inst.gate, gate))
    }

    /// Reverse the operand order of an operation node in place.
    ///
    /// For a CX this swaps control and target. Wire edges are untouched.
    pub fn reverse_qargs(&mut self, node: NodeIndex) -> IrResult<()> {
        self.instruction_mut(node)?.qubits.reverse();
        Ok(())
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.wires.len()
    }

    /// Get the number of operations.
    ///
    /// Computed as total nodes minus input and output nodes (2 per qubit).
    #[inline]
    pub fn num_ops(&self) -> usize {
        self.graph
            .node_count()
            .saturating_sub(2 * self.qubit_inputs.len())
    }

    /// Count operations by gate name.
    pub fn count_ops(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for weight in self.graph.node_weights() {
            if let DagNode::Op(inst) = weight {
                *counts.entry(inst.name().to_string()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Calculate the circuit depth.
    pub fn depth(&self) -> usize {
        let mut depths: FxHashMap<NodeIndex, usize> =
            FxHashMap::with_capacity_and_hasher(self.graph.node_count(), Default::default());
        let mut max_depth = 0usize;

        for node in petgraph::algo::toposort(&self.graph, None)
            .expect("DAG must be acyclic: cycle detected in circuit graph")
        {
            let max_pred_depth = self
                .graph
                .edges_directed(node, Direction::Incoming)
                .map(|e| depths.get(&e.source()).copied().unwrap_or(0))
                .max()
                .unwrap_or(0);

            let node_depth = if self.graph[node].is_op() {
                max_pred_depth + 1
            } else {
                max_pred_depth
            };

            max_depth = max_depth.max(node_depth);
            depths.insert(node, node_depth);
        }

        max_depth
    }

    /// Iterate over qubits in insertion order.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.wires.iter().copied()
    }

    /// Get the input node for a qubit (O(1) lookup).
    #[inline]
    pub fn qubit_input_node(&self, qubit: QubitId) -> Option<NodeIndex> {
        self.qubit_inputs.get(&qubit).copied()
    }

    /// Get the output node for a qubit (O(1) lookup).
    #[inline]
    pub fn qubit_output_node(&self, qubit: QubitId) -> Option<NodeIndex> {
        self.qubit_outputs.get(&qubit).copied()
    }

    /// Verify the structural integrity of the DAG.
    ///
    /// Checks that:
    /// - The graph is acyclic
    /// - Every wire is a single path from its In node to its Out node
    /// - Every operation has exactly one incoming and one outgoing edge per
    ///   qubit it acts on, and no others
    pub fn verify_integrity(&self) -> IrResult<()> {
        if petgraph::algo::is_cyclic_directed(&self.graph) {
            return Err(IrError::InvalidDag("Graph contains a cycle".into()));
        }

        for &qubit in &self.wires {
            if !self.qubit_outputs.contains_key(&qubit) {
                return Err(IrError::InvalidDag(format!(
                    "Qubit {qubit:?} has an In node but no Out node"
                )));
            }
            // Walks In -> Out and fails on a broken or looping wire.
            self.nodes_on_wire(qubit, false)?;
        }

        for node in self.graph.node_indices() {
            let DagNode::Op(inst) = &self.graph[node] else {
                continue;
            };
            let incoming = self.graph.edges_directed(node, Direction::Incoming).count();
            let outgoing = self.graph.edges_directed(node, Direction::Outgoing).count();
            if incoming != inst.qubits.len() || outgoing != inst.qubits.len() {
                return Err(IrError::InvalidDag(format!(
                    "Operation {node:?} ({}) has in/out degree {incoming}/{outgoing}, expected {}",
                    inst.name(),
                    inst.qubits.len()
                )));
            }
            for &qubit in &inst.qubits {
                if self.predecessor_on_wire(node, qubit).is_none()
                    || self.successor_on_wire(node, qubit).is_none()
                {
                    return Err(IrError::InvalidDag(format!(
                        "Operation {node:?} is not connected on wire {qubit:?}"
                    )));
                }
            }
        }

        Ok(())
    }
}

impl Default for CircuitDag {
    fn default() -> Self {
        Self::new()
    }
}
