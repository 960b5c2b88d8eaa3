// src/therapy/mod.rs

//! The coherence protocol built on top of the circuit and simulation layers:
//! circuit construction ([`protocol`]), reading counts as metrics
//! ([`analysis`]) and text/JSON output ([`dashboard`]).

pub mod analysis;
pub mod dashboard;
pub mod protocol;

pub use analysis::{
    Metrics, OUTCOME_WIDTH, POETRY, RecommendedAction, StateInterpretation, analyze, coherence_score, interpret_state,
    recommend_action, select_poem,
};
pub use dashboard::{Dashboard, Histogram, RunReport, SessionReport, ratio_bar};
pub use protocol::{DEFAULT_SHOTS, INITIAL_ANXIETY, SessionOutcome, TherapyEngine};
