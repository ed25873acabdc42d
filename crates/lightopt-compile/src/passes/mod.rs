//! Built-in passes.
//!
//! All passes are target-agnostic peephole rewrites that operate purely on
//! the DAG structure.

pub mod reduction;

pub use reduction::{CxReduction, HadamardReduction, ReductionKind, RzReduction};
