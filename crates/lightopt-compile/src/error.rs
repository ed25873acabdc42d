//! Error types for the reduction passes.

use lightopt_ir::IrError;
use thiserror::Error;

/// Errors that can occur while running reduction passes.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// Structural error from the circuit graph.
    #[error("IR error: {0}")]
    Ir(#[from] IrError),

    /// A pass changed the unitary the circuit implements.
    #[error("Pass '{pass}' changed the circuit unitary")]
    EquivalenceViolation {
        /// Name of the offending pass.
        pass: String,
    },

    /// The circuit is too wide for dense unitary simulation.
    #[error("Circuit has {qubits} qubits, equivalence check supports at most {max}")]
    TooManyQubits {
        /// Number of qubits in the circuit.
        qubits: usize,
        /// Largest supported width.
        max: usize,
    },

    /// A custom gate has no matrix, so its unitary is unknown.
    #[error("Gate '{0}' has no known unitary")]
    OpaqueGate(String),

    /// A custom gate matrix does not have `(2^n)^2` entries for its arity.
    #[error("Gate '{gate}' matrix has {actual} entries, expected {expected}")]
    MatrixSizeMismatch {
        /// Name of the custom gate.
        gate: String,
        /// Entries required by the gate's arity.
        expected: usize,
        /// Entries actually present.
        actual: usize,
    },

    /// Failed to serialize a report.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;

#[cfg(test)]
mod tests {
    use super::*;
    use lightopt_ir::QubitId;

    #[test]
    fn test_ir_error_converts() {
        let ir = IrError::QubitNotFound {
            qubit: QubitId(3),
            gate_name: None,
        };
        let err: CompileError = ir.into();
        assert!(matches!(err, CompileError::Ir(_)));
        assert!(err.to_string().starts_with("IR error: Qubit QubitId(3)"));
    }

    #[test]
    fn test_too_many_qubits_message() {
        let err = CompileError::TooManyQubits {
            qubits: 20,
            max: 10,
        };
        assert_eq!(
            err.to_string(),
            "Circuit has 20 qubits, equivalence check supports at most 10"
        );
    }
}
