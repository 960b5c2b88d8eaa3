// src/simulation/engine.rs
use crate::core::{CoherenceError, QubitId, Result, StateVector};
use crate::operations::{Gate, Matrix2, Operation};
use num_complex::Complex;
use num_traits::Zero;
use rand::distr::{Bernoulli, Distribution};
use rand::rngs::StdRng;

/// Largest register the dense engine will allocate (2^24 amplitudes, 256 MiB).
pub const MAX_QUBITS: usize = 24;

/// Dense statevector engine: owns the amplitudes of every qubit in a circuit
/// and evolves them one operation at a time.
/// (Internal visibility)
pub(crate) struct SimulationEngine {
    state: StateVector,
}

impl SimulationEngine {
    /// Initializes the engine in |0...0⟩ over `num_qubits` qubits.
    pub(crate) fn init(num_qubits: usize) -> Result<Self> {
        if num_qubits == 0 {
            return Err(CoherenceError::InvalidOperation {
                message: "Cannot initialize simulation engine with zero qubits".to_string(),
            });
        }
        if num_qubits > MAX_QUBITS {
            return Err(CoherenceError::TooManyQubits { requested: num_qubits, max: MAX_QUBITS });
        }
        Ok(Self { state: StateVector::zero_state(num_qubits) })
    }

    // Test hook for starting from an arbitrary state
    #[cfg(test)]
    pub(crate) fn set_state(&mut self, state: StateVector) -> Result<()> {
        if state.dim() != self.state.dim() {
            Err(CoherenceError::InvalidOperation {
                message: format!("Cannot set state: provided dimension {} does not match engine dimension {}", state.dim(), self.state.dim()),
            })
        } else {
            self.state = state;
            Ok(())
        }
    }

    pub(crate) fn state(&self) -> &StateVector {
        &self.state
    }

    /// Applies a unitary operation. Measurement and reset need a random source
    /// and go through [`SimulationEngine::measure`] and [`SimulationEngine::reset`].
    pub(crate) fn apply_operation(&mut self, op: &Operation) -> Result<()> {
        match op {
            Operation::Gate { target, gate } => {
                let target = self.index(target)?;
                self.apply_controlled_gate(&[], target, &gate.matrix());
            }
            Operation::Controlled { controls, target, gate } => {
                let target = self.index(target)?;
                let controls = controls.iter().map(|c| self.index(c)).collect::<Result<Vec<_>>>()?;
                if controls.contains(&target) {
                    return Err(CoherenceError::InvalidOperation {
                        message: "Control and target qubits cannot be the same for controlled operation".to_string(),
                    });
                }
                self.apply_controlled_gate(&controls, target, &gate.matrix());
            }
            Operation::Barrier => {}
            Operation::Measure { .. } | Operation::Reset { .. } => {
                return Err(CoherenceError::InvalidOperation {
                    message: "Measure and reset are not unitary and cannot be passed to apply_operation".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Projective measurement of one qubit: draws the outcome from its Born
    /// probability, collapses and renormalises the state, returns the bit.
    pub(crate) fn measure(&mut self, qubit: &QubitId, rng: &mut StdRng) -> Result<bool> {
        let qubit = self.index(qubit)?;
        let p_one = self.state.probability_of_one(qubit).clamp(0.0, 1.0);
        let coin = Bernoulli::new(p_one).map_err(|e| CoherenceError::Sampling { message: e.to_string() })?;
        let outcome = coin.sample(rng);
        self.collapse(qubit, outcome, if outcome { p_one } else { 1.0 - p_one })?;
        Ok(outcome)
    }

    /// Measures the qubit and flips it back to |0⟩ if it read `1`.
    pub(crate) fn reset(&mut self, qubit: &QubitId, rng: &mut StdRng) -> Result<()> {
        if self.measure(qubit, rng)? {
            let target = self.index(qubit)?;
            self.apply_controlled_gate(&[], target, &Gate::X.matrix());
        }
        Ok(())
    }

    fn collapse(&mut self, qubit: usize, outcome: bool, probability: f64) -> Result<()> {
        if probability <= f64::EPSILON {
            return Err(CoherenceError::Incoherence {
                message: format!("Measured outcome {} on qubit {} has zero probability", outcome as u8, qubit),
            });
        }
        let mask = 1usize << qubit;
        let scale = 1.0 / probability.sqrt();
        for (i, amp) in self.state.vector_mut().iter_mut().enumerate() {
            if (i & mask != 0) == outcome {
                *amp *= scale;
            } else {
                *amp = Complex::zero();
            }
        }
        Ok(())
    }

    fn index(&self, qubit: &QubitId) -> Result<usize> {
        if qubit.0 < self.state.num_qubits() {
            Ok(qubit.0)
        } else {
            Err(CoherenceError::QubitOutOfRange { qubit: *qubit, num_qubits: self.state.num_qubits() })
        }
    }

    /// Applies a 2x2 matrix to `target` on the subspace where every control bit is set.
    /// With no controls this is a plain single-qubit gate.
    fn apply_controlled_gate(&mut self, controls: &[usize], target: usize, matrix: &Matrix2) {
        let t_mask = 1usize << target;
        let c_mask = controls.iter().fold(0usize, |acc, c| acc | (1 << c));
        let amps = self.state.vector_mut();

        // Visit each pair (|..0..>, |..1..>) on the target bit once, via its 0-side index
        for i0 in 0..amps.len() {
            if i0 & t_mask != 0 || i0 & c_mask != c_mask {
                continue;
            }
            let i1 = i0 | t_mask;
            let psi_0 = amps[i0];
            let psi_1 = amps[i1];
            amps[i0] = matrix[0][0] * psi_0 + matrix[0][1] * psi_1;
            amps[i1] = matrix[1][0] * psi_0 + matrix[1][1] * psi_1;
        }
    }
}
