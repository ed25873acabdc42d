//! Error types for the IR crate.

use crate::dag::NodeIndex;
use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit not found in circuit.
    #[error("Qubit {qubit:?} not found in circuit{}", format_gate_context(.gate_name))]
    QubitNotFound {
        /// The qubit that was not found.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Node is not (or no longer) part of the DAG.
    #[error("Node {0:?} not found in circuit DAG")]
    NodeNotFound(NodeIndex),

    /// Node exists but is a wire boundary, not an operation.
    #[error("Node {0:?} is a wire boundary, not an operation")]
    NotAnOperation(NodeIndex),

    /// Invalid DAG structure.
    #[error("Invalid DAG structure: {0}")]
    InvalidDag(String),

    /// Gate requires different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// Duplicate qubit in operation.
    #[error("Duplicate qubit {qubit:?} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_gate_context() {
        let err = IrError::QubitNotFound {
            qubit: QubitId(7),
            gate_name: Some("cx".into()),
        };
        assert_eq!(
            err.to_string(),
            "Qubit QubitId(7) not found in circuit (gate: cx)"
        );

        let err = IrError::QubitCountMismatch {
            gate_name: "h".into(),
            expected: 1,
            got: 2,
        };
        assert_eq!(err.to_string(), "Gate 'h' requires 1 qubits, got 2");
    }
}
