// src/therapy/analysis.rs

//! Turns measurement counts into coherence metrics and their narrative.

use crate::core::{CoherenceError, Result};
use crate::simulation::Counts;
use crate::validation::{check_bit_string, validate_counts};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of every outcome: being (3) + seeming (3) + coherence (2).
pub const OUTCOME_WIDTH: usize = 8;

const ALL_ZEROS: &str = "00000000";
const ALL_ONES: &str = "11111111";

/// The three poems, from most to least coherent.
pub const POETRY: [&str; 3] = [
    "I am and seem, a quantum dream / Superposed in life's great stream",
    "Collapse the waveform, gold appears / In broken places, light adheres",
    "Being dances, seeming flows / Which is real? Nobody knows",
];

/// Reading of the most frequent outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateInterpretation {
    #[serde(rename = "Integrated Self")]
    IntegratedSelf,
    #[serde(rename = "Performative Overload")]
    PerformativeOverload,
    #[serde(rename = "Authentic Overexposure")]
    AuthenticOverexposure,
    #[serde(rename = "Golden Coherence")]
    GoldenCoherence,
    #[serde(rename = "Healthy Oscillation")]
    HealthyOscillation,
}

impl fmt::Display for StateInterpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StateInterpretation::IntegratedSelf => "Integrated Self",
            StateInterpretation::PerformativeOverload => "Performative Overload",
            StateInterpretation::AuthenticOverexposure => "Authentic Overexposure",
            StateInterpretation::GoldenCoherence => "Golden Coherence",
            StateInterpretation::HealthyOscillation => "Healthy Oscillation",
        };
        f.write_str(text)
    }
}

/// What to do after a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecommendedAction {
    #[serde(rename = "Continue current therapeutic trajectory")]
    ContinueTrajectory,
    #[serde(rename = "Apply golden ratio phase correction")]
    GoldenPhaseCorrection,
    #[serde(rename = "Emergency decoherence protocol needed")]
    EmergencyProtocol,
}

impl fmt::Display for RecommendedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RecommendedAction::ContinueTrajectory => "Continue current therapeutic trajectory",
            RecommendedAction::GoldenPhaseCorrection => "Apply golden ratio phase correction",
            RecommendedAction::EmergencyProtocol => "Emergency decoherence protocol needed",
        };
        f.write_str(text)
    }
}

/// Scalar metrics of one session.
///
/// `groundedness + transcendence + dynamic_balance == 1` and
/// `coherence_score = 0.5·transcendence + 0.3·dynamic_balance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub coherence_score: f64,
    /// Ratio of all-zeros outcomes.
    pub groundedness: f64,
    /// Ratio of all-ones outcomes.
    pub transcendence: f64,
    /// Ratio of every other outcome.
    pub dynamic_balance: f64,
    pub therapeutic_poem: String,
    pub recommended_action: RecommendedAction,
    pub quantum_state: StateInterpretation,
    /// The outcome `quantum_state` was read from.
    pub most_frequent: String,
}

impl Metrics {
    /// Copy with every ratio rounded to three decimals, for reporting.
    pub fn rounded(&self) -> Metrics {
        Metrics {
            coherence_score: round3(self.coherence_score),
            groundedness: round3(self.groundedness),
            transcendence: round3(self.transcendence),
            dynamic_balance: round3(self.dynamic_balance),
            ..self.clone()
        }
    }

    /// `true` when the reported (three-decimal) coherence score falls below `threshold`.
    pub fn is_low_coherence(&self, threshold: f64) -> bool {
        round3(self.coherence_score) < threshold
    }
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

/// Derives the session metrics from counts of 8-bit outcomes.
///
/// # Errors
/// * `EmptyCounts` when no shots were recorded.
/// * `InvalidBitString` when a key is not 8 binary digits.
pub fn analyze(counts: &Counts) -> Result<Metrics> {
    validate_counts(counts, OUTCOME_WIDTH)?;

    let groundedness = counts.ratio(ALL_ZEROS);
    let transcendence = counts.ratio(ALL_ONES);
    let dynamic_balance = 1.0 - (groundedness + transcendence);
    let coherence_score = coherence_score(transcendence, dynamic_balance);

    let (most_frequent, _) = counts.most_frequent().ok_or(CoherenceError::EmptyCounts)?;

    Ok(Metrics {
        coherence_score,
        groundedness,
        transcendence,
        dynamic_balance,
        therapeutic_poem: select_poem(coherence_score).to_string(),
        recommended_action: recommend_action(transcendence, dynamic_balance),
        quantum_state: interpret_state(most_frequent)?,
        most_frequent: most_frequent.to_string(),
    })
}

/// `0.5·P(all ones) + 0.3·P(mixed)`.
pub fn coherence_score(transcendence: f64, dynamic_balance: f64) -> f64 {
    0.5 * transcendence + 0.3 * dynamic_balance
}

pub fn select_poem(coherence_score: f64) -> &'static str {
    if coherence_score > 0.7 {
        POETRY[0]
    } else if coherence_score > 0.4 {
        POETRY[1]
    } else {
        POETRY[2]
    }
}

pub fn recommend_action(transcendence: f64, dynamic_balance: f64) -> RecommendedAction {
    if transcendence > 0.3 {
        RecommendedAction::ContinueTrajectory
    } else if dynamic_balance > 0.6 {
        RecommendedAction::GoldenPhaseCorrection
    } else {
        RecommendedAction::EmergencyProtocol
    }
}

/// Reads an 8-character outcome by string position: characters 0..3 are
/// the being group, 3..6 the seeming group, 6..8 the coherence pair.
pub fn interpret_state(bits: &str) -> Result<StateInterpretation> {
    check_bit_string(bits, OUTCOME_WIDTH)?;
    let (being, rest) = bits.split_at(3);
    let (seeming, coherence) = rest.split_at(3);

    let interpretation = if being == seeming {
        StateInterpretation::IntegratedSelf
    } else if being == "000" && seeming == "111" {
        StateInterpretation::PerformativeOverload
    } else if being == "111" && seeming == "000" {
        StateInterpretation::AuthenticOverexposure
    } else if coherence == "11" {
        StateInterpretation::GoldenCoherence
    } else {
        StateInterpretation::HealthyOscillation
    };
    Ok(interpretation)
}
