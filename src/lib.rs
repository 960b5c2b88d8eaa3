// src/lib.rs

//! `qcoherence` - the being/seeming coherence protocol on a statevector simulator
//!
//! An eight-qubit circuit (three "being", three "seeming", two "coherence"
//! qubits) is built from Hadamard, controlled-rotation and Toffoli gates,
//! executed for a number of shots, and its measurement counts are read as a
//! handful of coherence metrics with a small narrative attached.

pub mod core;
pub mod operations;
pub mod circuits;
pub mod simulation;
pub mod validation;
pub mod therapy;
pub mod config;

// Re-export the most common types for easier top-level use
pub use crate::core::{CoherenceError, QubitId, Result, StateVector};
pub use operations::{Gate, Operation};
pub use circuits::{Circuit, CircuitBuilder, ClassicalRegister, QuantumRegister};
pub use simulation::{Backend, Counts, Simulator};
pub use therapy::{Metrics, SessionOutcome, TherapyEngine};
pub use config::{OutputFormat, SessionConfig};

// Example 1: Bell pair
// Two qubits entangled with H and CX only ever read back equal.
/// ```
/// use qcoherence::{CircuitBuilder, QubitId, Simulator, CoherenceError};
///
/// let mut circuit = CircuitBuilder::new().qreg("q", 2).creg("c", 2).build()?;
/// circuit
///     .h(QubitId(0))?
///     .cx(QubitId(0), QubitId(1))?
///     .measure(QubitId(0), 0)?
///     .measure(QubitId(1), 1)?;
///
/// let counts = Simulator::with_seed(42).run(&circuit, 1000)?;
/// println!("{}", counts);
///
/// assert_eq!(counts.total(), 1000);
/// assert_eq!(counts.get("00") + counts.get("11"), 1000);
/// # Ok::<(), CoherenceError>(())
/// ```
#[doc(hidden)]
const _: () = ();

// Example 2: One therapy session
// Runs the full protocol and prints the dashboard.
/// ```
/// use qcoherence::{Simulator, TherapyEngine, CoherenceError};
/// use qcoherence::therapy::Dashboard;
///
/// let mut engine = TherapyEngine::new(Simulator::with_seed(7));
/// let outcome = engine.run_session(512)?;
/// println!("{}", Dashboard::new(&outcome.metrics));
///
/// let m = &outcome.metrics;
/// assert!((m.groundedness + m.transcendence + m.dynamic_balance - 1.0).abs() < 1e-12);
/// assert_eq!(engine.coherence_history().len(), 1);
/// # Ok::<(), CoherenceError>(())
/// ```
#[doc(hidden)]
const _: () = ();
