// src/config.rs

//! Session configuration

use crate::core::{CoherenceError, Result};
use crate::therapy::DEFAULT_SHOTS;

/// How a session is reported on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Dashboard, most frequent state and histogram.
    #[default]
    Text,
    /// A single JSON document per session.
    Json,
}

/// Configuration for a therapy session run
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Number of measurement shots per session
    ///
    /// Default: 1024
    pub shots: usize,

    /// Random number generator seed for reproducibility
    ///
    /// If None, the simulator draws a fresh seed (and logs it).
    pub seed: Option<u64>,

    /// Coherence score below which the emergency protocol runs
    ///
    /// Default: 0.4
    pub emergency_threshold: f64,

    /// Run the emergency protocol when coherence is low
    ///
    /// Default: true
    pub emergency_enabled: bool,

    /// Number of outcomes listed in the text histogram
    ///
    /// Default: 10
    pub histogram_top: usize,

    /// Print the circuit diagram before executing
    ///
    /// Default: false
    pub show_circuit: bool,

    pub output: OutputFormat,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            shots: DEFAULT_SHOTS,
            seed: None,
            emergency_threshold: 0.4,
            emergency_enabled: true,
            histogram_top: 10,
            show_circuit: false,
            output: OutputFormat::Text,
        }
    }
}

impl SessionConfig {
    /// Rejects settings the simulator or the analysis cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.shots == 0 {
            return Err(CoherenceError::InvalidShots(self.shots));
        }
        if !(0.0..=1.0).contains(&self.emergency_threshold) {
            return Err(CoherenceError::InvalidOperation {
                message: format!("Emergency threshold must lie in [0, 1], got {}", self.emergency_threshold),
            });
        }
        Ok(())
    }
}
