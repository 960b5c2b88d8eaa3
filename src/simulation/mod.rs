// src/simulation/mod.rs

//! Executes a [`Circuit`] for a number of shots and reports [`Counts`].
//!
//! [`Backend`] is the seam between the protocol and whatever produces
//! measurement statistics. [`Simulator`] is the built-in backend: a dense
//! statevector engine with Born-rule sampling.

mod results;
pub(crate) mod engine;

pub use engine::MAX_QUBITS;
pub use results::Counts;

use crate::circuits::Circuit;
use crate::core::{CoherenceError, Result};
use crate::operations::Operation;
use crate::validation::{check_normalization, validate_counts};
use engine::SimulationEngine;
use rand::SeedableRng;
use rand::distr::{Distribution, weighted::WeightedIndex};
use rand::rngs::StdRng;
use tracing::{debug, info};

/// Anything that turns a circuit and a shot count into measurement counts.
pub trait Backend {
    /// Human-readable backend name, used in logs and reports.
    fn name(&self) -> &str;

    /// Runs `circuit` `shots` times and tallies the classical bit-strings.
    fn execute(&self, circuit: &Circuit, shots: usize) -> Result<Counts>;
}

/// Statevector simulator backend.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    /// Seed for the sampling PRNG. `None` draws a fresh seed per execution.
    seed: Option<u64>,
}

impl Simulator {
    /// Creates a new Simulator with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a simulator whose executions are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Runs a simulation of the provided circuit.
    ///
    /// Circuits whose measurements are all terminal are evolved once and the
    /// final distribution is sampled `shots` times. Circuits with resets or
    /// gates after a measurement run one trajectory per shot.
    ///
    /// # Returns
    /// * `Ok(Counts)` with exactly `shots` entries in total.
    /// * `Err(CoherenceError)` for zero shots, circuits without measurements,
    ///   oversized circuits or a state that lost its normalisation.
    pub fn run(&self, circuit: &Circuit, shots: usize) -> Result<Counts> {
        if shots == 0 {
            return Err(CoherenceError::InvalidShots(shots));
        }
        if !circuit.has_measurements() {
            return Err(CoherenceError::NoMeasurements);
        }

        let seed = self.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        info!(seed, shots, qubits = circuit.num_qubits(), ops = circuit.len(), "executing circuit");

        let counts = if circuit.has_mid_circuit_effects() {
            debug!("circuit has mid-circuit effects; sampling one trajectory per shot");
            self.run_trajectories(circuit, shots, &mut rng)?
        } else {
            self.run_sampled(circuit, shots, &mut rng)?
        };

        validate_counts(&counts, circuit.num_clbits())?;
        debug!(distinct = counts.len(), "execution finished");
        Ok(counts)
    }

    /// Evolve once, then draw every shot from the final Born distribution.
    fn run_sampled(&self, circuit: &Circuit, shots: usize, rng: &mut StdRng) -> Result<Counts> {
        let mut engine = SimulationEngine::init(circuit.num_qubits())?;
        // clbit -> qubit it was last written from
        let mut clbit_sources: Vec<Option<usize>> = vec![None; circuit.num_clbits()];

        for op in circuit.operations() {
            match op {
                Operation::Measure { qubit, clbit } => clbit_sources[*clbit] = Some(qubit.0),
                _ => engine.apply_operation(op)?,
            }
        }
        check_normalization(engine.state(), None)?;

        let probabilities = engine.state().probabilities();
        let dist = WeightedIndex::new(&probabilities).map_err(|e| CoherenceError::Sampling { message: e.to_string() })?;

        let mut tally = vec![0usize; probabilities.len()];
        for _ in 0..shots {
            tally[dist.sample(rng)] += 1;
        }

        let mut counts = Counts::new();
        for (basis, &count) in tally.iter().enumerate().filter(|(_, c)| **c > 0) {
            let clbits: Vec<bool> = clbit_sources
                .iter()
                .map(|source| source.is_some_and(|q| basis & (1 << q) != 0))
                .collect();
            counts.record(bit_string(&clbits), count);
        }
        Ok(counts)
    }

    /// Re-run the whole circuit for each shot, collapsing on measure and reset.
    fn run_trajectories(&self, circuit: &Circuit, shots: usize, rng: &mut StdRng) -> Result<Counts> {
        let mut counts = Counts::new();
        for _ in 0..shots {
            let mut engine = SimulationEngine::init(circuit.num_qubits())?;
            let mut clbits = vec![false; circuit.num_clbits()];
            for op in circuit.operations() {
                match op {
                    Operation::Measure { qubit, clbit } => clbits[*clbit] = engine.measure(qubit, rng)?,
                    Operation::Reset { qubit } => engine.reset(qubit, rng)?,
                    _ => engine.apply_operation(op)?,
                }
            }
            check_normalization(engine.state(), None)?;
            counts.record(bit_string(&clbits), 1);
        }
        Ok(counts)
    }
}

impl Backend for Simulator {
    fn name(&self) -> &str {
        "statevector_simulator"
    }

    fn execute(&self, circuit: &Circuit, shots: usize) -> Result<Counts> {
        self.run(circuit, shots)
    }
}

/// Renders classical bits with bit 0 as the rightmost character.
fn bit_string(clbits: &[bool]) -> String {
    clbits.iter().rev().map(|&b| if b { '1' } else { '0' }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::CircuitBuilder;
    use crate::core::QubitId;

    fn q(i: usize) -> QubitId {
        QubitId(i)
    }

    #[test]
    fn bit_string_puts_clbit_zero_last() {
        assert_eq!(bit_string(&[true, false, false]), "001");
        assert_eq!(bit_string(&[false, true, true]), "110");
    }

    #[test]
    fn zero_shots_rejected() -> Result<()> {
        let mut circuit = CircuitBuilder::new().qreg("q", 1).creg("c", 1).build()?;
        circuit.measure(q(0), 0)?;
        assert_eq!(Simulator::new().run(&circuit, 0), Err(CoherenceError::InvalidShots(0)));
        Ok(())
    }

    #[test]
    fn circuit_without_measurements_rejected() -> Result<()> {
        let mut circuit = CircuitBuilder::new().qreg("q", 1).creg("c", 1).build()?;
        circuit.h(q(0))?;
        assert_eq!(Simulator::new().run(&circuit, 10), Err(CoherenceError::NoMeasurements));
        Ok(())
    }

    #[test]
    fn unmeasured_clbits_read_zero() -> Result<()> {
        let mut circuit = CircuitBuilder::new().qreg("q", 1).creg("c", 3).build()?;
        circuit.x(q(0))?.measure(q(0), 1)?;
        let counts = Simulator::with_seed(1).run(&circuit, 50)?;
        assert_eq!(counts.get("010"), 50);
        Ok(())
    }

    #[test]
    fn sampled_and_trajectory_paths_agree_on_deterministic_circuit() -> Result<()> {
        let mut plain = CircuitBuilder::new().qreg("q", 2).creg("c", 2).build()?;
        plain.x(q(1))?.measure(q(0), 0)?.measure(q(1), 1)?;

        let mut with_reset = CircuitBuilder::new().qreg("q", 2).creg("c", 2).build()?;
        with_reset.reset(q(0))?.x(q(1))?.measure(q(0), 0)?.measure(q(1), 1)?;

        let sim = Simulator::with_seed(3);
        assert_eq!(sim.run(&plain, 20)?.get("10"), 20);
        assert_eq!(sim.run(&with_reset, 20)?.get("10"), 20);
        Ok(())
    }

    #[test]
    fn backend_trait_delegates_to_run() -> Result<()> {
        let mut circuit = CircuitBuilder::new().qreg("q", 1).creg("c", 1).build()?;
        circuit.h(q(0))?.measure(q(0), 0)?;
        let sim = Simulator::with_seed(5);
        let backend: &dyn Backend = &sim;
        assert_eq!(backend.name(), "statevector_simulator");
        assert_eq!(backend.execute(&circuit, 64)?, sim.run(&circuit, 64)?);
        Ok(())
    }
}
