//! Error handling logic

use std::fmt;
use thiserror::Error;

/// Global index of a qubit within a circuit.
/// Registers hand these out; the simulator maps index `k` to bit `k`
/// of the basis-state index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QubitId(pub usize);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q({})", self.0)
    }
}

/// Result type for circuit construction, simulation and analysis.
pub type Result<T> = std::result::Result<T, CoherenceError>;

/// Errors raised while building circuits, simulating them or reading their counts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoherenceError {
    /// An operation is inconsistent with the circuit it is added to
    #[error("Invalid operation: {message}")]
    InvalidOperation {
        /// Invalid operation message
        message: String,
    },

    /// A qubit index outside the circuit's quantum registers
    #[error("Qubit {qubit} out of range for circuit with {num_qubits} qubits")]
    QubitOutOfRange { qubit: QubitId, num_qubits: usize },

    /// A classical bit index outside the circuit's classical registers
    #[error("Classical bit {clbit} out of range for circuit with {num_clbits} classical bits")]
    ClbitOutOfRange { clbit: usize, num_clbits: usize },

    /// An index past the end of a named register
    #[error("Index {index} out of range for register '{register}' of size {size}")]
    RegisterIndexOutOfRange { register: String, index: usize, size: usize },

    /// Statevector would not fit the simulator
    #[error("Circuit uses {requested} qubits, simulator supports at most {max}")]
    TooManyQubits { requested: usize, max: usize },

    /// State vector lost its normalisation
    #[error("Incoherence: {message}")]
    Incoherence {
        /// Normalisation failure message
        message: String,
    },

    /// The circuit never writes a classical bit, so there is nothing to count
    #[error("Circuit contains no measurements; no counts to report")]
    NoMeasurements,

    #[error("Shot count must be positive, got {0}")]
    InvalidShots(usize),

    /// Counts mapping holds no shots
    #[error("Counts are empty; cannot derive outcome ratios")]
    EmptyCounts,

    /// A counts key is not a binary string of the expected width
    #[error("Invalid bit-string '{bits}': expected {expected_len} binary digits")]
    InvalidBitString { bits: String, expected_len: usize },

    /// The outcome distribution could not be sampled
    #[error("Sampling failed: {message}")]
    Sampling {
        /// Sampling failure message
        message: String,
    },
}
