//! Qubit identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a qubit (wire) within a circuit.
///
/// Ids are dense: a circuit with `n` qubits uses `QubitId(0)..QubitId(n)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl QubitId {
    /// Distance between two wire indices.
    ///
    /// Used by the commutation rules that only hold for nearby wires.
    #[inline]
    pub fn distance(self, other: QubitId) -> u32 {
        self.0.abs_diff(other.0)
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(QubitId(3).to_string(), "q3");
    }

    #[test]
    fn test_distance_is_symmetric() {
        assert_eq!(QubitId(0).distance(QubitId(2)), 2);
        assert_eq!(QubitId(2).distance(QubitId(0)), 2);
        assert_eq!(QubitId(4).distance(QubitId(4)), 0);
    }
}
