//! Lightopt Circuit Intermediate Representation
//!
//! This crate provides the graph data model the lightopt reduction passes
//! operate on.
//!
//! # Overview
//!
//! A circuit is a DAG (Directed Acyclic Graph) of gate operations over an
//! ordered set of wires. Each wire has an input and an output boundary node
//! and the gates touching it form a single path between them. The graph is
//! backed by a stable-index arena, so a [`NodeIndex`] stays valid while
//! other nodes are removed.
//!
//! # Core Components
//!
//! - **Qubits**: [`QubitId`] identifies a wire
//! - **Gates**: [`StandardGate`] for the gates the passes understand and
//!   [`CustomGate`] for opaque user-defined operations
//! - **Instructions**: [`Instruction`] combining a gate with its operands
//! - **DAG**: [`CircuitDag`] with the in-place rewrite primitives
//! - **Circuit**: [`Circuit`] high-level builder API
//!
//! # Example
//!
//! ```rust
//! use lightopt_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell_state", 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.depth(), 2);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Z` | 1 | Pauli gates |
//! | `S`, `Sdg` | 1 | S and S-dagger gates |
//! | `T`, `Tdg` | 1 | T and T-dagger gates |
//! | `Rz` | 1 | Rotation about Z |
//! | `CX` | 2 | Controlled-NOT (CNOT) |

pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use dag::{CircuitDag, DagEdge, DagNode, NodeIndex};
pub use error::{IrError, IrResult};
pub use gate::{CustomGate, Gate, StandardGate};
pub use instruction::Instruction;
pub use qubit::QubitId;
