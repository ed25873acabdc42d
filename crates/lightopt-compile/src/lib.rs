//! Lightopt Peephole Reduction Passes
//!
//! This crate rewrites a [`CircuitDag`](lightopt_ir::CircuitDag) in place to
//! reduce its number of Hadamard, Rz and CX gates while keeping the unitary
//! it implements unchanged up to a global phase.
//!
//! # Architecture
//!
//! ```text
//! Input CircuitDag
//!       │
//!       ▼
//! ┌─────────────┐
//! │ PassManager │ ◄── PropertySet (ReductionLog)
//! └─────────────┘
//!       │
//!       ├── HadamardReduction
//!       ├── CxReduction
//!       └── RzReduction      (light schedule, repeated per round)
//!       │
//!       ▼
//! Reduced CircuitDag
//! ```
//!
//! Every pass scans wires with the shared [`scanner`] and collects its
//! edits in a [`RewriteBatch`](scanner::RewriteBatch) that is applied after
//! the scan, so no node is touched while it is still being matched.
//!
//! # Example
//!
//! ```rust
//! use lightopt_compile::{PassManagerBuilder, ReductionLog};
//! use lightopt_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("example", 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.h(QubitId(1)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.h(QubitId(0)).unwrap();
//! circuit.h(QubitId(1)).unwrap();
//!
//! let (pm, mut props) = PassManagerBuilder::new().build();
//! let mut dag = circuit.into_dag();
//! pm.run(&mut dag, &mut props).unwrap();
//!
//! assert_eq!(dag.num_ops(), 1);
//! let log = props.get::<ReductionLog>().unwrap();
//! assert_eq!(log.total_removed(), 4);
//! ```
//!
//! # Running a single pass
//!
//! ```rust
//! use lightopt_compile::passes::RzReduction;
//! use lightopt_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("rz", 1);
//! circuit.rz(0.25, QubitId(0)).unwrap();
//! circuit.rz(0.5, QubitId(0)).unwrap();
//!
//! let mut dag = circuit.into_dag();
//! let report = RzReduction.apply(&mut dag).unwrap();
//! assert_eq!(report.get("rz").unwrap().after, 1);
//! ```

pub mod error;
pub mod manager;
pub mod pass;
pub mod property;
pub mod reduction;
pub mod scanner;
pub mod unitary;

// Built-in passes
pub mod passes;

pub use error::{CompileError, CompileResult};
pub use manager::{PassManager, PassManagerBuilder};
pub use pass::{Pass, PassKind};
pub use passes::{CxReduction, HadamardReduction, ReductionKind, RzReduction};
pub use property::PropertySet;
pub use reduction::{GateCountChange, Reduction, ReductionLog, ReductionReport};
