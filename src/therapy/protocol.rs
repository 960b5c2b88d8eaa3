// src/therapy/protocol.rs

//! The being/seeming coherence protocol: a fixed gate sequence over three
//! registers, executed on a [`Backend`] and read back as [`Metrics`].

use super::analysis::{Metrics, analyze};
use crate::circuits::{Circuit, ClassicalRegister, QuantumRegister};
use crate::core::{GOLDEN_REDUCTION, PHI, PHI_CONJ, PI, Result};
use crate::simulation::{Backend, Counts, Simulator};
use serde::Serialize;
use tracing::{debug, info};

/// Shots per session unless configured otherwise.
pub const DEFAULT_SHOTS: usize = 1024;
/// Anxiety level before any recovery.
pub const INITIAL_ANXIETY: f64 = 0.5;

/// Counts and metrics of one executed session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionOutcome {
    pub counts: Counts,
    pub metrics: Metrics,
}

/// Builds and runs the coherence circuit.
///
/// Qubits are laid out as `being[0..3]`, `seeming[0..3]`, `coherence[0..2]`
/// (global indices 0-7), all measured into the 8-bit `measurement` register.
/// Each step method appends to the current circuit and returns it.
pub struct TherapyEngine<B: Backend = Simulator> {
    backend: B,
    circuit: Circuit,
    being: QuantumRegister,
    seeming: QuantumRegister,
    coherence: QuantumRegister,
    measurement: ClassicalRegister,
    default_shots: usize,
    anxiety_level: f64,
    coherence_history: Vec<f64>,
}

impl<B: Backend> TherapyEngine<B> {
    /// Creates an engine with an empty circuit over the protocol's registers.
    pub fn new(backend: B) -> Self {
        let being = QuantumRegister::new("being", 0, 3);
        let seeming = QuantumRegister::new("seeming", 3, 3);
        let coherence = QuantumRegister::new("coherence", 6, 2);
        let measurement = ClassicalRegister::new("measurement", 0, 8);
        let circuit = blank_circuit(&being, &seeming, &coherence, &measurement);
        Self {
            backend,
            circuit,
            being,
            seeming,
            coherence,
            measurement,
            default_shots: DEFAULT_SHOTS,
            anxiety_level: INITIAL_ANXIETY,
            coherence_history: Vec::new(),
        }
    }

    /// Shots used by [`TherapyEngine::emergency_recovery`].
    pub fn with_default_shots(mut self, shots: usize) -> Self {
        self.default_shots = shots;
        self
    }

    /// Puts being and seeming in superposition and tilts the coherence pair by φ⁻¹.
    pub fn initialize_states(&mut self) -> Result<&Circuit> {
        for q in self.being.qubits().chain(self.seeming.qubits()) {
            self.circuit.h(q)?;
        }
        for q in self.coherence.qubits() {
            self.circuit.ry(PHI_CONJ, q)?;
        }
        Ok(&self.circuit)
    }

    /// Entangles being with seeming, and both with the first coherence qubit.
    pub fn create_entanglement(&mut self) -> Result<&Circuit> {
        let (b, s, c) = (&self.being, &self.seeming, &self.coherence);
        self.circuit
            .cx(b.try_qubit(0)?, s.try_qubit(0)?)?
            .crx(PHI_CONJ, b.try_qubit(1)?, s.try_qubit(1)?)?
            .ccx(b.try_qubit(2)?, s.try_qubit(2)?, c.try_qubit(0)?)?;
        Ok(&self.circuit)
    }

    /// Phase φ on the first qubit of each register, −φ⁻¹ on being1 and seeming1.
    pub fn apply_golden_phases(&mut self) -> Result<&Circuit> {
        let (b, s, c) = (&self.being, &self.seeming, &self.coherence);
        self.circuit
            .u1(PHI, b.try_qubit(0)?)?
            .u1(PHI, s.try_qubit(0)?)?
            .u1(PHI, c.try_qubit(0)?)?
            .u1(-PHI_CONJ, b.try_qubit(1)?)?
            .u1(-PHI_CONJ, s.try_qubit(1)?)?;
        Ok(&self.circuit)
    }

    /// Fracture detection, golden repair and stabilisation of the middle qubits.
    pub fn kintsugi_repair(&mut self) -> Result<&Circuit> {
        let (b, s, c) = (&self.being, &self.seeming, &self.coherence);
        self.circuit
            .ccx(b.try_qubit(0)?, s.try_qubit(0)?, c.try_qubit(0)?)?
            .cry(PHI_CONJ, c.try_qubit(0)?, c.try_qubit(1)?)?
            .cu3(PI / 4.0, 0.0, PI / 2.0, c.try_qubit(1)?, b.try_qubit(1)?)?
            .cu3(PI / 4.0, 0.0, PI / 2.0, c.try_qubit(1)?, s.try_qubit(1)?)?;
        Ok(&self.circuit)
    }

    /// Measures being into bits 0-2, seeming into 3-5 and coherence into 6-7.
    pub fn measure_states(&mut self) -> Result<&Circuit> {
        self.circuit
            .measure_register(&self.being, &self.measurement, 0)?
            .measure_register(&self.seeming, &self.measurement, 3)?
            .measure_register(&self.coherence, &self.measurement, 6)?;
        Ok(&self.circuit)
    }

    /// Appends the full protocol to the current circuit, executes it and analyses the counts.
    ///
    /// The session's coherence score is appended to the history.
    pub fn run_session(&mut self, shots: usize) -> Result<SessionOutcome> {
        self.initialize_states()?;
        self.create_entanglement()?;
        self.apply_golden_phases()?;
        self.kintsugi_repair()?;
        self.measure_states()?;
        debug!(ops = self.circuit.len(), depth = self.circuit.depth(), "protocol circuit assembled");

        let counts = self.backend.execute(&self.circuit, shots)?;
        let metrics = analyze(&counts)?;
        self.coherence_history.push(metrics.coherence_score);
        info!(
            backend = self.backend.name(),
            shots,
            coherence = metrics.coherence_score,
            state = %metrics.quantum_state,
            "session complete"
        );
        Ok(SessionOutcome { counts, metrics })
    }

    /// Starts over from a stabilising prelude and runs a fresh session.
    ///
    /// The new circuit resets being and seeming, puts being0 in superposition,
    /// rotates seeming0 by π/4 and places a barrier before the protocol.
    /// The anxiety level is reduced by the golden factor.
    pub fn emergency_recovery(&mut self) -> Result<SessionOutcome> {
        info!("applying emergency decoherence recovery protocol");
        self.circuit = blank_circuit(&self.being, &self.seeming, &self.coherence, &self.measurement);
        self.circuit
            .reset_register(&self.being)?
            .reset_register(&self.seeming)?
            .h(self.being.try_qubit(0)?)?
            .ry(PI / 4.0, self.seeming.try_qubit(0)?)?
            .barrier()?;

        self.anxiety_level *= GOLDEN_REDUCTION;
        info!(anxiety = self.anxiety_level, "anxiety level reduced");

        self.run_session(self.default_shots)
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn anxiety_level(&self) -> f64 {
        self.anxiety_level
    }

    /// Coherence scores of every session run so far, oldest first.
    pub fn coherence_history(&self) -> &[f64] {
        &self.coherence_history
    }

    pub fn being(&self) -> &QuantumRegister {
        &self.being
    }

    pub fn seeming(&self) -> &QuantumRegister {
        &self.seeming
    }

    pub fn coherence(&self) -> &QuantumRegister {
        &self.coherence
    }
}

fn blank_circuit(
    being: &QuantumRegister,
    seeming: &QuantumRegister,
    coherence: &QuantumRegister,
    measurement: &ClassicalRegister,
) -> Circuit {
    Circuit::with_registers(vec![being.clone(), seeming.clone(), coherence.clone()], vec![measurement.clone()])
}
