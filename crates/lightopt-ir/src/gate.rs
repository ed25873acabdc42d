//! Quantum gate types.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// Standard gates with known semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Hadamard gate.
    H,
    /// Pauli-X gate.
    X,
    /// Pauli-Z gate.
    Z,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// Rotation around the Z axis by the given angle in radians.
    Rz(f64),
    /// Controlled-X (CNOT) gate. Operands are `[control, target]`.
    CX,
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::H => "h",
            StandardGate::X => "x",
            StandardGate::Z => "z",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::Rz(_) => "rz",
            StandardGate::CX => "cx",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::H
            | StandardGate::X
            | StandardGate::Z
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::Rz(_) => 1,

            StandardGate::CX => 2,
        }
    }

    /// The operator inverse of this gate.
    pub fn inverse(&self) -> StandardGate {
        match self {
            StandardGate::H => StandardGate::H,
            StandardGate::X => StandardGate::X,
            StandardGate::Z => StandardGate::Z,
            StandardGate::S => StandardGate::Sdg,
            StandardGate::Sdg => StandardGate::S,
            StandardGate::T => StandardGate::Tdg,
            StandardGate::Tdg => StandardGate::T,
            StandardGate::Rz(theta) => StandardGate::Rz(-theta),
            StandardGate::CX => StandardGate::CX,
        }
    }

    /// Whether this is a ±90° phase gate: S, S-dagger or Rz(±π/2).
    ///
    /// The Rz angle is compared with `==` against π/2. An angle that is
    /// only numerically close (for example accumulated from several merges)
    /// is not recognised.
    #[allow(clippy::float_cmp)]
    pub fn is_phase_gate(&self) -> bool {
        match self {
            StandardGate::S | StandardGate::Sdg => true,
            StandardGate::Rz(theta) => theta.abs() == FRAC_PI_2,
            StandardGate::H
            | StandardGate::X
            | StandardGate::Z
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::CX => false,
        }
    }

    /// Rotation angle, if this is an Rz gate.
    #[inline]
    pub fn rz_angle(&self) -> Option<f64> {
        match self {
            StandardGate::Rz(theta) => Some(*theta),
            _ => None,
        }
    }
}

/// A user-defined gate the optimizer treats as opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomGate {
    /// The name of the gate.
    pub name: String,
    /// The number of qubits it operates on.
    pub num_qubits: u32,
    /// Optional unitary matrix (row-major, 2^n × 2^n).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matrix: Option<Vec<Complex64>>,
}

impl CustomGate {
    /// Create a new custom gate.
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            matrix: None,
        }
    }

    /// Add a unitary matrix to the gate.
    ///
    /// # Panics
    ///
    /// Panics if `matrix.len()` does not equal `(2^num_qubits)^2`.
    #[must_use]
    pub fn with_matrix(mut self, matrix: Vec<Complex64>) -> Self {
        let dim = 1usize << self.num_qubits;
        assert_eq!(
            matrix.len(),
            dim * dim,
            "Matrix length {} does not match expected {} for {}-qubit gate",
            matrix.len(),
            dim * dim,
            self.num_qubits,
        );
        self.matrix = Some(matrix);
        self
    }
}

/// A quantum gate, either standard or custom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    /// A standard gate with known semantics.
    Standard(StandardGate),
    /// An opaque user-defined gate.
    Custom(CustomGate),
}

impl Gate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            Gate::Standard(g) => g.name(),
            Gate::Custom(g) => &g.name,
        }
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            Gate::Standard(g) => g.num_qubits(),
            Gate::Custom(g) => g.num_qubits,
        }
    }

    /// Get the standard gate, if this is one.
    #[inline]
    pub fn as_standard(&self) -> Option<&StandardGate> {
        match self {
            Gate::Standard(g) => Some(g),
            Gate::Custom(_) => None,
        }
    }

    /// The operator inverse, if known. Custom gates have none.
    pub fn inverse(&self) -> Option<Gate> {
        match self {
            Gate::Standard(g) => Some(Gate::Standard(g.inverse())),
            Gate::Custom(_) => None,
        }
    }

    /// Check if this is a Hadamard gate.
    #[inline]
    pub fn is_h(&self) -> bool {
        matches!(self, Gate::Standard(StandardGate::H))
    }

    /// Check if this is a CNOT gate.
    #[inline]
    pub fn is_cx(&self) -> bool {
        matches!(self, Gate::Standard(StandardGate::CX))
    }

    /// Check if this is an Rz gate.
    #[inline]
    pub fn is_rz(&self) -> bool {
        matches!(self, Gate::Standard(StandardGate::Rz(_)))
    }

    /// See [`StandardGate::is_phase_gate`].
    #[inline]
    pub fn is_phase_gate(&self) -> bool {
        self.as_standard().is_some_and(StandardGate::is_phase_gate)
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Gate::Standard(gate)
    }
}

impl From<CustomGate> for Gate {
    fn from(gate: CustomGate) -> Self {
        Gate::Custom(gate)
    }
}
