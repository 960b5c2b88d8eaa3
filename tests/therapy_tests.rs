// tests/therapy_tests.rs

use approx::assert_abs_diff_eq;
use qcoherence::therapy::{Dashboard, INITIAL_ANXIETY, SessionReport};
use qcoherence::{Backend, CoherenceError, Operation, Simulator, TherapyEngine};

const GOLDEN_REDUCTION: f64 = 0.618;

#[test]
fn test_full_session_on_simulator() -> Result<(), CoherenceError> {
    let mut engine = TherapyEngine::new(Simulator::with_seed(1234));
    let outcome = engine.run_session(1024)?;

    assert_eq!(outcome.counts.total(), 1024);
    assert!(outcome.counts.iter().all(|(bits, _)| bits.len() == 8 && bits.chars().all(|c| c == '0' || c == '1')));

    let m = &outcome.metrics;
    assert_abs_diff_eq!(m.groundedness + m.transcendence + m.dynamic_balance, 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(m.coherence_score, 0.5 * m.transcendence + 0.3 * m.dynamic_balance, epsilon = 1e-12);
    assert!((0.0..=0.5).contains(&m.coherence_score));

    let (top, _) = outcome.counts.most_frequent().expect("non-empty counts");
    assert_eq!(m.most_frequent, top);
    assert_eq!(engine.coherence_history(), &[m.coherence_score]);
    Ok(())
}

#[test]
fn test_protocol_circuit_shape() -> Result<(), CoherenceError> {
    let mut engine = TherapyEngine::new(Simulator::new());
    engine.run_session(16)?;

    let circuit = engine.circuit();
    assert_eq!(circuit.num_qubits(), 8);
    assert_eq!(circuit.num_clbits(), 8);
    assert_eq!(circuit.qregs().iter().map(|r| r.name()).collect::<Vec<_>>(), ["being", "seeming", "coherence"]);
    assert_eq!(circuit.cregs()[0].name(), "measurement");
    // Measurements are terminal, so the sampled path is used.
    assert!(!circuit.has_mid_circuit_effects());
    let measures = circuit.operations().iter().filter(|op| matches!(op, Operation::Measure { .. })).count();
    assert_eq!(measures, 8);
    Ok(())
}

#[test]
fn test_same_seed_same_session() -> Result<(), CoherenceError> {
    let a = TherapyEngine::new(Simulator::with_seed(77)).run_session(300)?;
    let b = TherapyEngine::new(Simulator::with_seed(77)).run_session(300)?;
    assert_eq!(a, b);
    Ok(())
}

#[test]
fn test_emergency_recovery_on_simulator() -> Result<(), CoherenceError> {
    let mut engine = TherapyEngine::new(Simulator::with_seed(8)).with_default_shots(128);
    engine.run_session(128)?;
    let recovered = engine.emergency_recovery()?;

    assert_eq!(recovered.counts.total(), 128);
    assert_abs_diff_eq!(engine.anxiety_level(), INITIAL_ANXIETY * GOLDEN_REDUCTION, epsilon = 1e-12);
    assert_eq!(engine.coherence_history().len(), 2);
    assert!(engine.circuit().has_mid_circuit_effects());

    engine.emergency_recovery()?;
    assert_abs_diff_eq!(
        engine.anxiety_level(),
        INITIAL_ANXIETY * GOLDEN_REDUCTION * GOLDEN_REDUCTION,
        epsilon = 1e-12
    );
    Ok(())
}

#[test]
fn test_dashboard_and_report_render() -> Result<(), CoherenceError> {
    let mut engine = TherapyEngine::new(Simulator::with_seed(21));
    let outcome = engine.run_session(256)?;

    let text = Dashboard::new(&outcome.metrics).to_string();
    assert!(text.contains("Coherence Score: "));
    assert!(text.contains(&format!("Current State: {}", outcome.metrics.quantum_state)));
    assert!(text.contains(&format!("Recommended Action: {}", outcome.metrics.recommended_action)));

    let report = SessionReport::new(
        engine.backend().name(),
        256,
        false,
        engine.anxiety_level(),
        &outcome.metrics,
        &outcome.counts,
    );
    let json: serde_json::Value = serde_json::to_value(&report).expect("report serializes");
    assert_eq!(json["backend"], "statevector_simulator");
    assert_eq!(json["anxiety_level"], 0.5);
    let total: u64 = json["counts"].as_object().expect("counts object").values().filter_map(|v| v.as_u64()).sum();
    assert_eq!(total, 256);
    Ok(())
}

#[test]
fn test_sampled_coherence_marginals() -> Result<(), CoherenceError> {
    let mut engine = TherapyEngine::new(Simulator::with_seed(4242));
    let outcome = engine.run_session(20_000)?;

    // Clbit k sits at character 7 - k: coherence1 is char 0, coherence0 char 1.
    let ones_at = |pos: usize| -> f64 {
        let hits: usize = outcome
            .counts
            .iter()
            .filter(|(bits, _)| bits.as_bytes()[pos] == b'1')
            .map(|(_, n)| n)
            .sum();
        hits as f64 / outcome.counts.total() as f64
    };
    assert_abs_diff_eq!(ones_at(1), 0.398, epsilon = 0.02);
    assert_abs_diff_eq!(ones_at(0), 0.189, epsilon = 0.02);
    // being1 (clbit 1) carries the RX and U3 phases
    assert_abs_diff_eq!(ones_at(6), 0.554, epsilon = 0.02);
    Ok(())
}
