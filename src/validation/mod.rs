// src/validation/mod.rs

//! Sanity checks on simulator state and on the counts it reports.

use crate::core::{CoherenceError, Result, StateVector};
use crate::simulation::Counts;

const DEFAULT_NORM_TOLERANCE: f64 = 1e-9;

/// Checks if the state vector is normalized (sum of squared amplitudes ≈ 1.0).
///
/// # Arguments
/// * `state` - The `StateVector` to check.
/// * `tolerance` - Allowed deviation from 1.0. Defaults to 1e-9.
///
/// # Returns
/// * `Ok(())` if normalized within tolerance.
/// * `Err(CoherenceError::Incoherence)` if normalization fails.
pub fn check_normalization(state: &StateVector, tolerance: Option<f64>) -> Result<()> {
    let effective_tolerance = tolerance.unwrap_or(DEFAULT_NORM_TOLERANCE);
    let norm_sq = state.norm_sqr();
    if (norm_sq - 1.0).abs() > effective_tolerance {
        Err(CoherenceError::Incoherence {
            message: format!("State vector normalization failed. Sum(|c_i|^2) = {} (Deviation > {})", norm_sq, effective_tolerance),
        })
    } else {
        Ok(())
    }
}

/// Checks that counts hold at least one shot and that every key is a binary
/// string of `width` characters.
pub fn validate_counts(counts: &Counts, width: usize) -> Result<()> {
    if counts.total() == 0 {
        return Err(CoherenceError::EmptyCounts);
    }
    for (bits, _) in counts.iter() {
        check_bit_string(bits, width)?;
    }
    Ok(())
}

/// Checks a single outcome key.
pub fn check_bit_string(bits: &str, width: usize) -> Result<()> {
    if bits.len() == width && bits.bytes().all(|b| b == b'0' || b == b'1') {
        Ok(())
    } else {
        Err(CoherenceError::InvalidBitString { bits: bits.to_string(), expected_len: width })
    }
}
