// src/core/mod.rs

//! Core data structures and types

pub mod error;
pub mod state;

pub use error::{CoherenceError, QubitId, Result};
pub use state::StateVector;

pub mod constants;
pub use constants::golden::{GOLDEN_REDUCTION, PHI, PHI_CONJ, PI}; // Re-export
