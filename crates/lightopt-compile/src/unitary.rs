//! Unitary matrix utilities for equivalence checking.
//!
//! Builds the dense `2^n × 2^n` unitary of a circuit and compares two
//! circuits up to a global phase. This is exponential in the number of
//! qubits and only meant for tests and small-circuit sanity checks.
//!
//! Basis ordering is little-endian: the wire at position `k` in
//! [`CircuitDag::qubits`] is bit `k` of the basis index. Custom gate
//! matrices follow the same convention over their own operand list.

use lightopt_ir::{CircuitDag, Gate, Instruction, QubitId, StandardGate};
use num_complex::Complex64;
use std::f64::consts::PI;

use crate::error::{CompileError, CompileResult};

/// Tolerance for floating point comparisons.
const EPSILON: f64 = 1e-9;

/// Widest circuit accepted by [`circuit_unitary`].
pub const MAX_QUBITS: usize = 10;

/// A 2x2 unitary matrix in row-major order.
#[derive(Debug, Clone, Copy)]
pub struct Unitary2x2 {
    /// The matrix elements in row-major order: [[a, b], [c, d]].
    pub data: [Complex64; 4],
}

impl Unitary2x2 {
    /// Create a new 2x2 unitary matrix.
    pub fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self { data: [a, b, c, d] }
    }

    fn diagonal(a: Complex64, d: Complex64) -> Self {
        let zero = Complex64::new(0.0, 0.0);
        Self::new(a, zero, zero, d)
    }

    /// Create a Hadamard matrix.
    pub fn h() -> Self {
        let s = 1.0 / 2.0_f64.sqrt();
        Self::new(
            Complex64::new(s, 0.0),
            Complex64::new(s, 0.0),
            Complex64::new(s, 0.0),
            Complex64::new(-s, 0.0),
        )
    }

    /// Create a Pauli-X matrix.
    pub fn x() -> Self {
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        Self::new(zero, one, one, zero)
    }

    /// Create a diagonal phase matrix diag(1, e^{iλ}).
    pub fn phase(lambda: f64) -> Self {
        Self::diagonal(Complex64::new(1.0, 0.0), Complex64::from_polar(1.0, lambda))
    }

    /// Create an RZ rotation matrix diag(e^{-iθ/2}, e^{iθ/2}).
    pub fn rz(theta: f64) -> Self {
        Self::diagonal(
            Complex64::from_polar(1.0, -theta / 2.0),
            Complex64::from_polar(1.0, theta / 2.0),
        )
    }

    /// Matrix of a single-qubit standard gate. `None` for CX.
    pub fn for_gate(gate: &StandardGate) -> Option<Self> {
        let matrix = match gate {
            StandardGate::H => Self::h(),
            StandardGate::X => Self::x(),
            StandardGate::Z => Self::phase(PI),
            StandardGate::S => Self::phase(PI / 2.0),
            StandardGate::Sdg => Self::phase(-PI / 2.0),
            StandardGate::T => Self::phase(PI / 4.0),
            StandardGate::Tdg => Self::phase(-PI / 4.0),
            StandardGate::Rz(theta) => Self::rz(*theta),
            StandardGate::CX => return None,
        };
        Some(matrix)
    }
}

/// Dense unitary of a whole circuit, row-major.
#[derive(Debug, Clone)]
pub struct CircuitUnitary {
    dim: usize,
    data: Vec<Complex64>,
    qubits: Vec<QubitId>,
}

impl CircuitUnitary {
    fn identity(qubits: Vec<QubitId>) -> Self {
        let dim = 1usize << qubits.len();
        let mut data = vec![Complex64::new(0.0, 0.0); dim * dim];
        for i in 0..dim {
            data[i * dim + i] = Complex64::new(1.0, 0.0);
        }
        Self { dim, data, qubits }
    }

    /// Matrix dimension (`2^num_qubits`).
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Element at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.data[row * self.dim + col]
    }

    /// Wires in basis-bit order.
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    fn bit(&self, qubit: QubitId) -> CompileResult<usize> {
        self.qubits
            .iter()
            .position(|&q| q == qubit)
            .ok_or(CompileError::Ir(lightopt_ir::IrError::QubitNotFound {
                qubit,
                gate_name: None,
            }))
    }

    /// Left-multiply by a single-qubit operator on basis bit `bit`.
    fn apply_1q(&mut self, matrix: &Unitary2x2, bit: usize) {
        let [a, b, c, d] = matrix.data;
        let mask = 1usize << bit;
        for row in (0..self.dim).filter(|r| r & mask == 0) {
            let partner = row | mask;
            for col in 0..self.dim {
                let lo = self.data[row * self.dim + col];
                let hi = self.data[partner * self.dim + col];
                self.data[row * self.dim + col] = a * lo + b * hi;
                self.data[partner * self.dim + col] = c * lo + d * hi;
            }
        }
    }

    /// Left-multiply by CX: swap rows that differ in the target bit when the
    /// control bit is set.
    fn apply_cx(&mut self, control: usize, target: usize) {
        let control_mask = 1usize << control;
        let target_mask = 1usize << target;
        for row in 0..self.dim {
            if row & control_mask != 0 && row & target_mask == 0 {
                let partner = row | target_mask;
                for col in 0..self.dim {
                    self.data.swap(row * self.dim + col, partner * self.dim + col);
                }
            }
        }
    }

    /// Left-multiply by an arbitrary `k`-qubit operator on `bits`.
    ///
    /// `matrix` must hold `(2^k)^2` entries.
    fn apply_dense(&mut self, matrix: &[Complex64], bits: &[usize]) {
        let local_dim = 1usize << bits.len();
        let op_mask: usize = bits.iter().map(|b| 1usize << b).sum();
        let spread = |local: usize| -> usize {
            bits.iter()
                .enumerate()
                .filter(|(k, _)| local & (1 << k) != 0)
                .map(|(_, b)| 1usize << b)
                .sum()
        };
        let offsets: Vec<usize> = (0..local_dim).map(spread).collect();

        let mut gathered = vec![Complex64::new(0.0, 0.0); local_dim];
        for base in (0..self.dim).filter(|r| r & op_mask == 0) {
            for col in 0..self.dim {
                for (k, offset) in offsets.iter().enumerate() {
                    gathered[k] = self.data[(base | offset) * self.dim + col];
                }
                for (i, offset) in offsets.iter().enumerate() {
                    let row = &matrix[i * local_dim..(i + 1) * local_dim];
                    self.data[(base | offset) * self.dim + col] =
                        row.iter().zip(&gathered).map(|(m, v)| m * v).sum();
                }
            }
        }
    }

    fn apply(&mut self, inst: &Instruction) -> CompileResult<()> {
        match &inst.gate {
            Gate::Standard(StandardGate::CX) => {
                let control = self.bit(inst.qubits[0])?;
                let target = self.bit(inst.qubits[1])?;
                self.apply_cx(control, target);
            }
            Gate::Standard(gate) => {
                if let Some(matrix) = Unitary2x2::for_gate(gate) {
                    let bit = self.bit(inst.qubits[0])?;
                    self.apply_1q(&matrix, bit);
                }
            }
            Gate::Custom(custom) => {
                let matrix = custom
                    .matrix
                    .as_ref()
                    .ok_or_else(|| CompileError::OpaqueGate(custom.name.clone()))?;
                let local_dim = 1usize << inst.qubits.len();
                if matrix.len() != local_dim * local_dim {
                    return Err(CompileError::MatrixSizeMismatch {
                        gate: custom.name.clone(),
                        expected: local_dim * local_dim,
                        actual: matrix.len(),
                    });
                }
                let bits = inst
                    .qubits
                    .iter()
                    .map(|&q| self.bit(q))
                    .collect::<CompileResult<Vec<_>>>()?;
                self.apply_dense(matrix, &bits);
            }
        }
        Ok(())
    }

    /// Check whether `self` equals `other` times a global phase.
    pub fn equivalent_up_to_phase(&self, other: &Self) -> bool {
        if self.qubits != other.qubits {
            return false;
        }
        let Some(pivot) = self.data.iter().position(|v| v.norm() > EPSILON) else {
            return other.data.iter().all(|v| v.norm() <= EPSILON);
        };
        let phase = other.data[pivot] / self.data[pivot];
        if (phase.norm() - 1.0).abs() > EPSILON {
            return false;
        }
        self.data
            .iter()
            .zip(&other.data)
            .all(|(a, b)| (a * phase - b).norm() <= EPSILON)
    }
}

/// Compute the dense unitary of a circuit.
///
/// Fails with [`CompileError::TooManyQubits`] above [`MAX_QUBITS`] and with
/// [`CompileError::OpaqueGate`] for a custom gate without a matrix.
pub fn circuit_unitary(dag: &CircuitDag) -> CompileResult<CircuitUnitary> {
    if dag.num_qubits() > MAX_QUBITS {
        return Err(CompileError::TooManyQubits {
            qubits: dag.num_qubits(),
            max: MAX_QUBITS,
        });
    }

    let mut unitary = CircuitUnitary::identity(dag.qubits().collect());
    for (_, inst) in dag.topological_ops() {
        unitary.apply(inst)?;
    }
    Ok(unitary)
}

/// Check whether two circuits implement the same unitary up to global phase.
///
/// Circuits over different wire sets are never equivalent.
pub fn equivalent_up_to_phase(a: &CircuitDag, b: &CircuitDag) -> CompileResult<bool> {
    let ua = circuit_unitary(a)?;
    let ub = circuit_unitary(b)?;
    Ok(ua.equivalent_up_to_phase(&ub))
}
